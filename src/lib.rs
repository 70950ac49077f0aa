//! `loopex` — a bounded template-loop expansion engine.
//!
//! Five loop functions (`while`, `dowhile`, `loop`, `forargs`,
//! `fornumargs`) repeatedly expand raw template fragments against a mutable
//! variable environment, under one hard iteration budget shared across every
//! loop (nested ones included) of a render. Budget exhaustion is reported
//! in-band: the truncated output gets an error-wrapped notice appended and
//! is returned normally.
//!
//! The host supplies the collaborators at their interfaces: [`Fragment`]
//! expansion, a [`Frame`] exposing caller-argument views, a
//! [`VariableStore`], and [`Messages`] lookup. A minimal MediaWiki-flavoured
//! host lives in [`template`] for standalone use and the CLI.

pub mod config;
pub mod context;
pub mod errors;
pub mod frame;
pub mod messages;
pub mod strategies;
pub mod template;
pub mod vars;

mod engine;
mod parser;

use std::rc::Rc;

pub use config::Config;
pub use context::ExecutionContext;
pub use errors::{Error, Result};
pub use frame::{EmptyFrame, Fragment, Frame, Literal, RawFragment};
pub use messages::{DefaultMessages, Messages};
pub use strategies::{Registry, StrategyKind};
pub use vars::{MemoryVars, VarHandle, VariableStore};

/// The loop engine: configuration, the strategy table built from it, and the
/// host collaborators resolved once at construction.
pub struct LoopEngine {
    config: Config,
    registry: Registry,
    messages: Rc<dyn Messages>,
    vars: Option<VarHandle>,
}

impl LoopEngine {
    /// Engine without a variable store. Only `while` / `dowhile` can be
    /// registered; the variable-binding strategies are dropped even when
    /// config enables them.
    pub fn new(config: Config) -> Self {
        let registry = Registry::from_config(&config, false);
        Self {
            config,
            registry,
            messages: Rc::new(DefaultMessages),
            vars: None,
        }
    }

    /// Engine with all five strategies available (subject to config).
    pub fn with_vars(config: Config, vars: VarHandle) -> Self {
        let registry = Registry::from_config(&config, true);
        Self {
            config,
            registry,
            messages: Rc::new(DefaultMessages),
            vars: Some(vars),
        }
    }

    /// Replace the default overflow-message lookup with the host's own.
    pub fn with_messages(mut self, messages: Rc<dyn Messages>) -> Self {
        self.messages = messages;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether `name` is a registered (enabled and supported) loop function.
    pub fn enabled(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Dispatch one loop-function invocation. `args` are raw fragments; the
    /// strategy expands only what it needs, when it needs it.
    pub fn call(
        &self,
        name: &str,
        frame: &dyn Frame,
        args: &[RawFragment],
        ctx: &ExecutionContext,
    ) -> Result<String> {
        let strategy = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        tracing::debug!(function = name, loops = ctx.loops(), "dispatch");
        strategy.call(self, frame, args, ctx)
    }

    /// Host hook: a top-level render finished; clear the loop counter.
    pub fn render_finished(&self, ctx: &ExecutionContext) {
        ctx.reset();
    }

    /// Diagnostic line for the host's limit report.
    pub fn limit_report(&self, ctx: &ExecutionContext) -> String {
        format!("loop count: {}\n", self.config.report(ctx))
    }

    /// Trim and forward a binding to the variable store. Engines whose
    /// registry includes a variable-binding strategy always have a store;
    /// the `None` arm exists only because that is enforced at registration
    /// time, not in the type.
    pub(crate) fn bind_variable(&self, name: &str, value: &str) {
        if let Some(vars) = &self.vars {
            vars.borrow_mut().set(name.trim(), value.trim());
        }
    }

    /// Accumulated output plus the error-wrapped limit notice. The sole
    /// termination signal for budget exhaustion; returned, never raised.
    pub(crate) fn overflow_notice(&self, output: String, ctx: &ExecutionContext) -> String {
        tracing::warn!(loops = %self.config.report(ctx), "loop budget exhausted");
        let mut out = output;
        if !out.trim().is_empty() {
            out.push('\n');
        }
        out.push_str(&format!(
            "<div class=\"error\">{}</div>",
            self.messages.loop_limit()
        ));
        out
    }
}

/// Render template source with a default-configured engine, an in-memory
/// variable store and no caller-supplied arguments.
pub fn render(source: &str) -> Result<String> {
    template::TemplateHost::new(Config::default()).render(source, Vec::new())
}
