//! Ordered transaction sequencer.
//!
//! A [`Sequencer`] owns a [`Runtime`] inside one task and executes the
//! transactions it receives strictly one at a time, in arrival order. A
//! batch is a confirmation unit: its transactions run back to back in the
//! order given, each committing or reverting on its own, with nothing from
//! other submitters interleaved.

use std::sync::Arc;

use prism_core::abi::Calldata;
use prism_core::error::{Error, Result};
use prism_core::event::EventLog;
use prism_core::id::Address;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::runtime::{Receipt, Runtime, Transaction};
use crate::stats::ExecutionStats;

enum Command {
    Submit {
        tx: Transaction,
        reply: oneshot::Sender<Result<Receipt>>,
    },
    Batch {
        txs: Vec<Transaction>,
        reply: oneshot::Sender<Vec<Result<Receipt>>>,
    },
    View {
        from: Address,
        to: Address,
        calldata: Calldata,
        reply: oneshot::Sender<Result<Value>>,
    },
}

pub struct Sequencer {
    runtime: Runtime,
    command_rx: mpsc::Receiver<Command>,
}

/// Cloneable submission handle.
#[derive(Clone)]
pub struct SequencerHandle {
    command_tx: mpsc::Sender<Command>,
    event_log: Arc<EventLog>,
    stats: Arc<ExecutionStats>,
}

fn stopped() -> Error {
    Error::Sequencer("sequencer has stopped".to_string())
}

impl Sequencer {
    /// Create a sequencer over `runtime` with a queue of `channel_capacity`
    /// pending commands.
    pub fn new(runtime: Runtime, channel_capacity: usize) -> (Self, SequencerHandle) {
        let (command_tx, command_rx) = mpsc::channel(channel_capacity);
        let handle = SequencerHandle {
            command_tx,
            event_log: runtime.event_log(),
            stats: runtime.stats(),
        };
        debug!("Creating new sequencer");
        (
            Self {
                runtime,
                command_rx,
            },
            handle,
        )
    }

    /// Create a sequencer and run it on the current tokio runtime. The join
    /// handle yields the [`Runtime`] once every handle has been dropped.
    pub fn spawn(runtime: Runtime, channel_capacity: usize) -> (SequencerHandle, JoinHandle<Runtime>) {
        let (sequencer, handle) = Self::new(runtime, channel_capacity);
        (handle, tokio::spawn(sequencer.run()))
    }

    /// Execute commands until every handle is dropped, then hand back the
    /// runtime.
    pub async fn run(mut self) -> Runtime {
        info!("Starting sequencer loop");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                Command::Submit { tx, reply } => {
                    let _ = reply.send(self.runtime.transact(tx));
                }
                Command::Batch { txs, reply } => {
                    debug!("Executing batch of {} transaction(s)", txs.len());
                    let receipts: Vec<_> = txs
                        .into_iter()
                        .map(|tx| self.runtime.transact(tx))
                        .collect();
                    let _ = reply.send(receipts);
                }
                Command::View {
                    from,
                    to,
                    calldata,
                    reply,
                } => {
                    let _ = reply.send(self.runtime.view(from, to, &calldata));
                }
            }
        }

        info!("Sequencer shutting down");
        self.runtime
    }
}

impl SequencerHandle {
    /// Execute `tx` after everything submitted before it.
    pub async fn submit(&self, tx: Transaction) -> Result<Receipt> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Submit { tx, reply })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())?
    }

    /// Execute `txs` back to back in the given order. Each transaction
    /// reports its own outcome.
    pub async fn submit_batch(&self, txs: Vec<Transaction>) -> Result<Vec<Result<Receipt>>> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Batch { txs, reply })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())
    }

    /// Read-only call, ordered after everything submitted before it.
    pub async fn view(&self, from: Address, to: Address, calldata: Calldata) -> Result<Value> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::View {
                from,
                to,
                calldata,
                reply,
            })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())?
    }

    pub fn event_log(&self) -> Arc<EventLog> {
        self.event_log.clone()
    }

    pub fn stats(&self) -> Arc<ExecutionStats> {
        self.stats.clone()
    }
}
