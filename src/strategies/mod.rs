//! The closed set of loop functions and the name → handler table built once
//! from configuration.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::errors::Result;
use crate::frame::{Frame, RawFragment};
use crate::LoopEngine;

/// The five loop functions. Closed set; dispatch goes through [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    While,
    DoWhile,
    Loop,
    ForArgs,
    ForNumArgs,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::While,
        StrategyKind::DoWhile,
        StrategyKind::Loop,
        StrategyKind::ForArgs,
        StrategyKind::ForNumArgs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::While => "while",
            StrategyKind::DoWhile => "dowhile",
            StrategyKind::Loop => "loop",
            StrategyKind::ForArgs => "forargs",
            StrategyKind::ForNumArgs => "fornumargs",
        }
    }

    /// Whether this strategy writes loop variables, and therefore requires
    /// the external variable store to be present at registration time.
    pub fn needs_variables(self) -> bool {
        matches!(
            self,
            StrategyKind::Loop | StrategyKind::ForArgs | StrategyKind::ForNumArgs
        )
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown loop function: {s}"))
    }
}

/// One iteration strategy, callable through the registry.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn call(
        &self,
        engine: &LoopEngine,
        frame: &dyn Frame,
        args: &[RawFragment],
        ctx: &ExecutionContext,
    ) -> Result<String>;
}

/// Name → handler table, built once at engine construction from the enabled
/// set. Strategies left out of the table are unreachable.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<&'static str, Arc<dyn Strategy>>>,
}

impl Registry {
    /// Build the table from config. When no variable store was wired in,
    /// the variable-binding strategies are dropped regardless of config,
    /// the same way the original refuses to register them without its
    /// Variables dependency.
    pub fn from_config(config: &crate::config::Config, vars_available: bool) -> Self {
        let mut map: HashMap<&'static str, Arc<dyn Strategy>> = HashMap::new();
        for handler in builtins::all() {
            let kind = handler.kind();
            if !config.enabled.contains(&kind) {
                continue;
            }
            if kind.needs_variables() && !vars_available {
                tracing::debug!(strategy = %kind, "not registered: no variable store");
                continue;
            }
            map.insert(kind.name(), handler);
        }
        Self {
            inner: Arc::new(map),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.inner.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }
}

pub mod builtins {
    use super::*;
    use crate::engine;

    pub(super) fn all() -> Vec<Arc<dyn Strategy>> {
        vec![
            Arc::new(While),
            Arc::new(DoWhile),
            Arc::new(Loop),
            Arc::new(ForArgs),
            Arc::new(ForNumArgs),
        ]
    }

    /// `#while: | condition | body` — condition checked before each pass.
    pub struct While;
    impl Strategy for While {
        fn kind(&self) -> StrategyKind {
            StrategyKind::While
        }
        fn call(
            &self,
            engine: &LoopEngine,
            _frame: &dyn Frame,
            args: &[RawFragment],
            ctx: &ExecutionContext,
        ) -> Result<String> {
            engine::perform_while(engine, args, ctx, false)
        }
    }

    /// `#dowhile: | condition | body` — condition checked after each pass.
    pub struct DoWhile;
    impl Strategy for DoWhile {
        fn kind(&self) -> StrategyKind {
            StrategyKind::DoWhile
        }
        fn call(
            &self,
            engine: &LoopEngine,
            _frame: &dyn Frame,
            args: &[RawFragment],
            ctx: &ExecutionContext,
        ) -> Result<String> {
            engine::perform_while(engine, args, ctx, true)
        }
    }

    /// `#loop: var | start | count | body`
    pub struct Loop;
    impl Strategy for Loop {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Loop
        }
        fn call(
            &self,
            engine: &LoopEngine,
            _frame: &dyn Frame,
            args: &[RawFragment],
            ctx: &ExecutionContext,
        ) -> Result<String> {
            engine::perform_loop(engine, args, ctx)
        }
    }

    /// `#forargs: filter | keyVar | valVar | body`
    pub struct ForArgs;
    impl Strategy for ForArgs {
        fn kind(&self) -> StrategyKind {
            StrategyKind::ForArgs
        }
        fn call(
            &self,
            engine: &LoopEngine,
            frame: &dyn Frame,
            args: &[RawFragment],
            _ctx: &ExecutionContext,
        ) -> Result<String> {
            engine::perform_forargs_entry(engine, frame, args)
        }
    }

    /// `#fornumargs: keyVar | valVar | body`
    pub struct ForNumArgs;
    impl Strategy for ForNumArgs {
        fn kind(&self) -> StrategyKind {
            StrategyKind::ForNumArgs
        }
        fn call(
            &self,
            engine: &LoopEngine,
            frame: &dyn Frame,
            args: &[RawFragment],
            _ctx: &ExecutionContext,
        ) -> Result<String> {
            engine::perform_fornumargs_entry(engine, frame, args)
        }
    }
}
