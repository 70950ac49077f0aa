use std::rc::Rc;

use crate::errors::Result;

/// An opaque handle to unevaluated template source.
///
/// Expansion carries no caching guarantee: the engine calls `expand` exactly
/// as many times as the loop semantics require, and any side effects in the
/// source re-run on every call. Host-level failures propagate unchanged.
pub trait Fragment {
    fn expand(&self) -> Result<String>;
}

/// A raw (not yet expanded) fragment handle, as passed to the strategies.
/// `Rc`, not `Arc`: evaluation is single-threaded and fragments routinely
/// capture shared host state.
pub type RawFragment = Rc<dyn Fragment>;

/// The invocation scope a strategy runs in: fragment arguments supplied by
/// the caller, viewed either by explicit string name or by integer position
/// (negative positions included).
pub trait Frame {
    /// Whether this expansion happens inside a caller-supplied-argument
    /// context at all. Argument iteration outside one yields nothing.
    fn is_template(&self) -> bool {
        false
    }

    /// Arguments keyed by explicit string name.
    fn named_args(&self) -> Vec<(String, RawFragment)> {
        Vec::new()
    }

    /// Arguments keyed by integer position. Callers may return these in any
    /// order; the engine sorts ascending before iterating.
    fn numbered_args(&self) -> Vec<(i64, RawFragment)> {
        Vec::new()
    }
}

/// A frame with no caller-supplied arguments (top-level page context).
#[derive(Debug, Default)]
pub struct EmptyFrame;

impl Frame for EmptyFrame {}

/// A fragment whose source is already a plain string.
pub struct Literal(pub String);

impl Literal {
    pub fn raw(s: impl Into<String>) -> RawFragment {
        Rc::new(Literal(s.into()))
    }
}

impl Fragment for Literal {
    fn expand(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Expand an optional argument slot, trimming the result; a missing slot
/// expands to the empty string.
pub(crate) fn expand_trimmed(frag: Option<&RawFragment>) -> Result<String> {
    match frag {
        Some(f) => Ok(f.expand()?.trim().to_string()),
        None => Ok(String::new()),
    }
}
