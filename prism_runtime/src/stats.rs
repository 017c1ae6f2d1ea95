//! Per-module execution statistics.

use std::time::Duration;

use dashmap::DashMap;
use prism_core::id::Address;

/// Counters for the code at one address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleStats {
    /// Frames that ran this code.
    pub calls: u64,
    /// Frames that failed.
    pub failures: u64,
    /// Wall time spent in those frames, nested calls included.
    pub execution_time: Duration,
}

/// Execution counters keyed by code address. Shared with readers while the
/// runtime is owned by a sequencer task.
#[derive(Debug, Default)]
pub struct ExecutionStats {
    modules: DashMap<Address, ModuleStats>,
}

impl ExecutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished frame of the code at `code_address`.
    pub fn record(&self, code_address: Address, elapsed: Duration, succeeded: bool) {
        let mut stats = self.modules.entry(code_address).or_default();
        stats.calls += 1;
        if !succeeded {
            stats.failures += 1;
        }
        stats.execution_time += elapsed;
    }

    pub fn get(&self, code_address: &Address) -> Option<ModuleStats> {
        self.modules.get(code_address).map(|s| *s)
    }

    /// Total frames run across every address.
    pub fn total_calls(&self) -> u64 {
        self.modules.iter().map(|entry| entry.calls).sum()
    }

    pub fn reset(&self) {
        self.modules.clear();
    }
}
