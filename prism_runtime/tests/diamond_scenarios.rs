mod common;

use common::*;
use prism_access::{calls, AccessStrategy, DIAMOND_CUT_ROLE};
use prism_core::abi;
use prism_core::error::{CutError, Error, ErrorKind};
use prism_core::interfaces::{IACCESS_CONTROL, IDIAMOND_LOUPE, IDISABLEABLE};
use prism_core::{Event, FacetCut, FacetCutAction, InterfaceId, RoleId, Selector};
use prism_runtime::cut::diamond_cut_call;
use prism_runtime::loupe::calls as loupe;
use prism_runtime::{registry, DiamondArgs, Runtime};
use serde_json::json;

fn add_target(facet: prism_core::Address) -> FacetCut {
    FacetCut::new(facet, FacetCutAction::Add, vec![target()], InterfaceId::NONE)
}

#[test]
fn test_remove_then_readd_with_init() {
    prism_core::test_utils::init_test_logging();
    let mut runtime = Runtime::new();
    let diamond = runtime.deploy_diamond(DiamondArgs::new(owner())).unwrap();
    let module_a = deploy_module(&mut runtime, Tagged("A"));
    let module_b = deploy_module(&mut runtime, SentinelReader);
    let init = deploy_module(&mut runtime, SentinelInit);
    let call = prism_core::Calldata::new(target());

    runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[add_target(module_a)], None).unwrap()))
        .unwrap();
    let receipt = runtime.transact(tx(addr(7), diamond, call.clone())).unwrap();
    assert_eq!(receipt.output, json!("A"));

    let remove = FacetCut::remove(vec![target()], InterfaceId::NONE);
    runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[remove], None).unwrap()))
        .unwrap();
    let err = runtime.transact(tx(addr(7), diamond, call.clone())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Routing);
    assert!(matches!(err, Error::FunctionNotFound(s) if s == target()));

    let init_call = (init, sentinel_call(42, false));
    runtime
        .transact(tx(
            owner(),
            diamond,
            diamond_cut_call(&[add_target(module_b)], Some(&init_call)).unwrap(),
        ))
        .unwrap();
    let receipt = runtime.transact(tx(addr(7), diamond, call)).unwrap();
    assert_eq!(receipt.output, json!(42));
}

#[test]
fn test_failed_init_leaves_registry_identical() {
    let mut runtime = Runtime::new();
    let diamond = runtime.deploy_diamond(DiamondArgs::new(owner())).unwrap();
    let module_a = deploy_module(&mut runtime, Tagged("A"));
    let module_b = deploy_module(&mut runtime, Tagged("B"));
    let extra = deploy_module(&mut runtime, SentinelReader);
    let init = deploy_module(&mut runtime, SentinelInit);
    runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[add_target(module_a)], None).unwrap()))
        .unwrap();

    let before = serde_json::to_vec(runtime.storage_of(&diamond).unwrap()).unwrap();
    let events_before = runtime.event_log().len();

    let batch = vec![
        FacetCut::new(module_b, FacetCutAction::Replace, vec![target()], InterfaceId::NONE),
        FacetCut::new(
            extra,
            FacetCutAction::Add,
            vec![Selector::from_u32(0x55667788)],
            InterfaceId::from_u32(0x55667788),
        ),
        FacetCut::remove(vec![Selector::from_u32(0x55667788)], InterfaceId::NONE),
    ];
    let init_call = (init, sentinel_call(7, true));
    let err = runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&batch, Some(&init_call)).unwrap()))
        .unwrap_err();

    assert!(matches!(err, Error::Cut(CutError::InitReverted { .. })));
    let after = serde_json::to_vec(runtime.storage_of(&diamond).unwrap()).unwrap();
    assert_eq!(before, after);
    assert_eq!(runtime.event_log().len(), events_before);

    let receipt = runtime
        .transact(tx(addr(7), diamond, prism_core::Calldata::new(target())))
        .unwrap();
    assert_eq!(receipt.output, json!("A"));
}

#[test]
fn test_replace_with_serving_module_is_rejected() {
    let mut runtime = Runtime::new();
    let diamond = runtime.deploy_diamond(DiamondArgs::new(owner())).unwrap();
    let module_a = deploy_module(&mut runtime, Tagged("A"));
    runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[add_target(module_a)], None).unwrap()))
        .unwrap();

    let same = FacetCut::new(module_a, FacetCutAction::Replace, vec![target()], InterfaceId::NONE);
    let err = runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[same], None).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RegistryPrecondition);
    assert!(err.to_string().contains("same function"));
}

#[test]
fn test_cut_requires_diamond_cut_role() {
    let mut runtime = Runtime::new();
    let diamond = runtime.deploy_diamond(DiamondArgs::new(owner())).unwrap();
    let module_a = deploy_module(&mut runtime, Tagged("A"));

    let err = runtime
        .transact(tx(addr(7), diamond, diamond_cut_call(&[add_target(module_a)], None).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(registry::facet_address(runtime.storage_of(&diamond).unwrap(), &target())
        .unwrap()
        .is_none());
}

#[test]
fn test_cut_event_records_null_init() {
    let mut runtime = Runtime::new();
    let diamond = runtime.deploy_diamond(DiamondArgs::new(owner())).unwrap();
    let module_a = deploy_module(&mut runtime, Tagged("A"));
    let receipt = runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[add_target(module_a)], None).unwrap()))
        .unwrap();

    assert_eq!(receipt.events.len(), 1);
    match &receipt.events[0].event {
        Event::DiamondCut {
            cuts,
            init,
            calldata,
        } => {
            assert_eq!(cuts, &vec![add_target(module_a)]);
            assert!(init.is_zero());
            assert!(calldata.is_none());
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(receipt.events[0].emitter, diamond);
}

#[test]
fn test_loupe_through_diamond() {
    let mut runtime = Runtime::new();
    let deployment = deploy(&mut runtime, AccessStrategy::Local, true);
    let diamond = deployment.diamond;

    let facets: Vec<prism_core::FacetInfo> =
        abi::decode_output(runtime.view(addr(7), diamond, &loupe::facets()).unwrap()).unwrap();
    let system = runtime.system_modules();
    let addresses: Vec<_> = facets.iter().map(|f| f.facet_address).collect();
    assert_eq!(
        addresses,
        vec![system.cut, system.loupe, deployment.access, deployment.gate.unwrap()]
    );

    let served = runtime
        .view(addr(7), diamond, &loupe::facet_address(&prism_core::interfaces::GRANT_ROLE).unwrap())
        .unwrap();
    assert_eq!(abi::decode_output::<prism_core::Address>(served).unwrap(), deployment.access);

    let unknown = runtime
        .view(addr(7), diamond, &loupe::facet_address(&target()).unwrap())
        .unwrap();
    assert!(abi::decode_output::<prism_core::Address>(unknown).unwrap().is_zero());

    for id in [*IDIAMOND_LOUPE, *IACCESS_CONTROL, *IDISABLEABLE] {
        let supported = runtime
            .view(addr(7), diamond, &loupe::supports_interface(&id).unwrap())
            .unwrap();
        assert_eq!(supported, json!(true));
    }
    let none = runtime
        .view(addr(7), diamond, &loupe::supports_interface(&InterfaceId::NONE).unwrap())
        .unwrap();
    assert_eq!(none, json!(false));
}

#[test]
fn test_admin_reassignment_scenario() {
    let mut runtime = Runtime::new();
    let diamond = deploy(&mut runtime, AccessStrategy::Local, true).diamond;
    let p1 = addr(0x11);
    let p2 = addr(0x22);
    let x = RoleId::from_name("X");
    let y = RoleId::from_name("Y");

    runtime
        .transact(tx(owner(), diamond, calls::grant_role(&x, &p1).unwrap()))
        .unwrap();
    runtime
        .transact(tx(owner(), diamond, calls::set_role_admin(&x, &y).unwrap()))
        .unwrap();

    let err = runtime
        .transact(tx(p1, diamond, calls::grant_role(&x, &p2).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    runtime
        .transact(tx(owner(), diamond, calls::grant_role(&y, &p1).unwrap()))
        .unwrap();
    let receipt = runtime
        .transact(tx(p1, diamond, calls::grant_role(&x, &p2).unwrap()))
        .unwrap();
    assert_eq!(receipt.events.len(), 1);
    assert_eq!(
        receipt.events[0].event,
        Event::RoleGranted {
            role: x,
            account: p2,
            sender: p1,
        }
    );

    let again = runtime
        .transact(tx(p1, diamond, calls::grant_role(&x, &p2).unwrap()))
        .unwrap();
    assert!(again.events.is_empty());
    assert_eq!(again.output, json!(false));
}

#[test]
fn test_view_cannot_mutate() {
    let mut runtime = Runtime::new();
    let diamond = deploy(&mut runtime, AccessStrategy::Local, true).diamond;
    let role = RoleId::from_name("MINTER");

    let err = runtime
        .view(owner(), diamond, &calls::grant_role(&role, &addr(2)).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::StaticCallViolation));
    let held = runtime
        .view(owner(), diamond, &calls::has_role(&role, &addr(2)).unwrap())
        .unwrap();
    assert_eq!(held, json!(false));
}

#[test]
fn test_gate_is_advisory() {
    let mut runtime = Runtime::new();
    let diamond = deploy(&mut runtime, AccessStrategy::Local, true).diamond;
    let module_a = deploy_module(&mut runtime, Tagged("A"));
    runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[add_target(module_a)], None).unwrap()))
        .unwrap();

    let first = runtime.transact(tx(owner(), diamond, calls::disable())).unwrap();
    let second = runtime.transact(tx(owner(), diamond, calls::disable())).unwrap();
    assert_eq!(first.events.len() + second.events.len(), 1);
    assert_eq!(runtime.view(addr(7), diamond, &calls::disabled()).unwrap(), json!(true));
    assert_eq!(runtime.view(addr(7), diamond, &calls::enabled()).unwrap(), json!(false));

    // routing continues while disabled
    let receipt = runtime
        .transact(tx(addr(7), diamond, prism_core::Calldata::new(target())))
        .unwrap();
    assert_eq!(receipt.output, json!("A"));

    // gated operations refuse before checking anything else
    let err = runtime
        .transact(tx(addr(7), diamond, diamond_cut_call(&[], None).unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Gate);
    let err = runtime
        .transact(tx(
            owner(),
            diamond,
            calls::grant_role(&DIAMOND_CUT_ROLE, &addr(7)).unwrap(),
        ))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Gate);

    runtime.transact(tx(owner(), diamond, calls::enable())).unwrap();
    runtime
        .transact(tx(
            owner(),
            diamond,
            calls::grant_role(&DIAMOND_CUT_ROLE, &addr(7)).unwrap(),
        ))
        .unwrap();
}

#[test]
fn test_gate_requires_disabler_role() {
    let mut runtime = Runtime::new();
    let diamond = deploy(&mut runtime, AccessStrategy::Local, true).diamond;
    let err = runtime
        .transact(tx(addr(7), diamond, calls::disable()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[test]
fn test_installed_modules_do_not_share_namespaces() {
    let mut runtime = Runtime::new();
    let deployment = deploy(&mut runtime, AccessStrategy::Combined, true);
    let diamond = deployment.diamond;
    assert!(runtime.layout_conflicts(&diamond).unwrap().is_empty());

    #[derive(Debug)]
    struct Rogue;

    impl prism_core::Module for Rogue {
        fn name(&self) -> &str {
            "rogue"
        }

        fn selectors(&self) -> Vec<Selector> {
            vec![Selector::from_u32(0xdeadbeef)]
        }

        fn storage_layout(&self) -> Vec<prism_core::Namespace> {
            vec![prism_core::Namespace::new("prism.access.roles.shadow")]
        }

        fn execute(
            &self,
            _ctx: &mut prism_core::CallContext<'_>,
            _calldata: &prism_core::Calldata,
        ) -> prism_core::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    let rogue = deploy_module(&mut runtime, Rogue);
    let cut = FacetCut::new(
        rogue,
        FacetCutAction::Add,
        vec![Selector::from_u32(0xdeadbeef)],
        InterfaceId::NONE,
    );
    runtime
        .transact(tx(owner(), diamond, diamond_cut_call(&[cut], None).unwrap()))
        .unwrap();

    let conflicts = runtime.layout_conflicts(&diamond).unwrap();
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].second_owner.starts_with("rogue@"));
}
