use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::strategies::StrategyKind;

/// Engine configuration. Read once when the engine is built; immutable for
/// the lifetime of the engine, like the original's process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hard cap on loop iterations per render, shared across all strategies
    /// and nesting depths. `-1` means unlimited.
    pub max_loops: i64,
    /// Which loop functions get registered at all. A name missing here is
    /// not reachable, not merely a no-op.
    pub enabled: HashSet<StrategyKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_loops: 100,
            enabled: StrategyKind::ALL.iter().copied().collect(),
        }
    }
}

impl Config {
    pub fn unlimited(&self) -> bool {
        self.max_loops < 0
    }

    /// Consume one iteration from the budget. Returns false (without
    /// mutating the counter) once the cap is reached; strategies must call
    /// this before any per-iteration expansion work.
    pub fn try_consume(&self, ctx: &ExecutionContext) -> bool {
        if !self.unlimited() && ctx.loops() >= self.max_loops as u64 {
            return false;
        }
        ctx.bump();
        true
    }

    /// `"<loops>"` when unlimited, `"<loops>/<max>"` otherwise.
    pub fn report(&self, ctx: &ExecutionContext) -> String {
        if self.unlimited() {
            ctx.loops().to_string()
        } else {
            format!("{}/{}", ctx.loops(), self.max_loops)
        }
    }
}
