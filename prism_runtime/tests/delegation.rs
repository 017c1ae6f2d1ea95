mod common;

use common::*;
use prism_access::{calls, AccessStrategy, DIAMOND_CUT_ROLE};
use prism_core::error::ErrorKind;
use prism_core::{FacetCut, FacetCutAction, InterfaceId, RoleId};
use prism_runtime::cut::diamond_cut_call;
use prism_runtime::Runtime;
use serde_json::json;

/// A diamond using `strategy` and a local-strategy authority diamond.
fn setup(strategy: AccessStrategy) -> (Runtime, prism_core::Address, prism_core::Address) {
    let mut runtime = Runtime::new();
    let diamond = deploy(&mut runtime, strategy, true).diamond;
    let authority = deploy(&mut runtime, AccessStrategy::Local, false).diamond;
    (runtime, diamond, authority)
}

#[test]
fn test_delegate_answer_is_or_ed_with_local_store() {
    let (mut runtime, diamond, authority) = setup(AccessStrategy::Combined);
    let role = RoleId::from_name("MINTER");
    let principal = addr(0x77);

    runtime
        .transact(tx(owner(), authority, calls::grant_role(&role, &principal).unwrap()))
        .unwrap();
    let query = calls::has_role(&role, &principal).unwrap();
    assert_eq!(runtime.view(addr(1), diamond, &query).unwrap(), json!(false));

    let receipt = runtime
        .transact(tx(owner(), diamond, calls::add_delegate(&authority).unwrap()))
        .unwrap();
    assert_eq!(receipt.events.len(), 1);
    assert_eq!(runtime.view(addr(1), diamond, &query).unwrap(), json!(true));
    assert_eq!(
        runtime
            .view(addr(1), diamond, &calls::is_delegate(&authority).unwrap())
            .unwrap(),
        json!(true)
    );

    runtime
        .transact(tx(owner(), diamond, calls::remove_delegate(&authority).unwrap()))
        .unwrap();
    assert_eq!(runtime.view(addr(1), diamond, &query).unwrap(), json!(false));

    // a local grant still counts once the delegate is gone
    runtime
        .transact(tx(owner(), diamond, calls::grant_role(&role, &principal).unwrap()))
        .unwrap();
    assert_eq!(runtime.view(addr(1), diamond, &query).unwrap(), json!(true));
}

#[test]
fn test_delegate_add_and_remove_are_idempotent() {
    let (mut runtime, diamond, authority) = setup(AccessStrategy::Delegating);

    let first = runtime
        .transact(tx(owner(), diamond, calls::add_delegate(&authority).unwrap()))
        .unwrap();
    let second = runtime
        .transact(tx(owner(), diamond, calls::add_delegate(&authority).unwrap()))
        .unwrap();
    assert_eq!(first.events.len(), 1);
    assert!(second.events.is_empty());

    let delegates = runtime
        .view(addr(1), diamond, &calls::get_delegates())
        .unwrap();
    assert_eq!(delegates, json!([authority]));

    let removed = runtime
        .transact(tx(owner(), diamond, calls::remove_delegate(&authority).unwrap()))
        .unwrap();
    let removed_again = runtime
        .transact(tx(owner(), diamond, calls::remove_delegate(&authority).unwrap()))
        .unwrap();
    assert_eq!(removed.events.len(), 1);
    assert!(removed_again.events.is_empty());
}

#[test]
fn test_delegated_role_authorizes_cuts() {
    let (mut runtime, diamond, authority) = setup(AccessStrategy::Delegating);
    let upgrader = addr(0x55);
    let module_a = deploy_module(&mut runtime, Tagged("A"));
    let cut = FacetCut::new(module_a, FacetCutAction::Add, vec![target()], InterfaceId::NONE);
    let cut_call = diamond_cut_call(&[cut], None).unwrap();

    let err = runtime
        .transact(tx(upgrader, diamond, cut_call.clone()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    runtime
        .transact(tx(owner(), authority, calls::grant_role(&DIAMOND_CUT_ROLE, &upgrader).unwrap()))
        .unwrap();
    runtime
        .transact(tx(owner(), diamond, calls::add_delegate(&authority).unwrap()))
        .unwrap();
    runtime.transact(tx(upgrader, diamond, cut_call)).unwrap();

    let receipt = runtime
        .transact(tx(addr(9), diamond, prism_core::Calldata::new(target())))
        .unwrap();
    assert_eq!(receipt.output, json!("A"));
}

#[test]
fn test_only_delegate_admin_adds_delegates() {
    let (mut runtime, diamond, authority) = setup(AccessStrategy::Combined);
    let err = runtime
        .transact(tx(addr(9), diamond, calls::add_delegate(&authority).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[test]
fn test_delegate_changes_are_gated() {
    let (mut runtime, diamond, authority) = setup(AccessStrategy::Combined);
    runtime.transact(tx(owner(), diamond, calls::disable())).unwrap();
    let err = runtime
        .transact(tx(owner(), diamond, calls::add_delegate(&authority).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Gate);
}

#[test]
fn test_diamond_cannot_delegate_to_itself() {
    let (mut runtime, diamond, _authority) = setup(AccessStrategy::Combined);
    let err = runtime
        .transact(tx(owner(), diamond, calls::add_delegate(&diamond).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Module);
    assert_eq!(
        runtime.view(addr(1), diamond, &calls::get_delegates()).unwrap(),
        json!([])
    );

    let role = RoleId::from_name("MINTER");
    let held = runtime
        .view(addr(1), diamond, &calls::has_role(&role, &addr(0x77)).unwrap())
        .unwrap();
    assert_eq!(held, json!(false));
}

#[test]
fn test_delegate_must_answer_membership_queries() {
    let (mut runtime, diamond, _authority) = setup(AccessStrategy::Combined);
    let module_a = deploy_module(&mut runtime, Tagged("A"));
    let err = runtime
        .transact(tx(owner(), diamond, calls::add_delegate(&module_a).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Module);
    assert!(err.to_string().contains("does not answer hasRole"));

    // a caller without the admin role still gets an authorization failure
    let role = RoleId::from_name("MINTER");
    let err = runtime
        .transact(tx(addr(9), diamond, calls::grant_role(&role, &addr(9)).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}
