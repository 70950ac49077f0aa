use std::cell::Cell;

/// Per-render loop counter, shared by every strategy invocation (nested ones
/// included) within one top-level render.
///
/// Interior mutability: fragment expansion may recursively re-enter the
/// engine while an outer loop still holds a reference to the same context,
/// so the counter lives in a `Cell` rather than behind `&mut`.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    loops: Cell<u64>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loops performed so far in this render.
    pub fn loops(&self) -> u64 {
        self.loops.get()
    }

    pub(crate) fn bump(&self) {
        self.loops.set(self.loops.get() + 1);
    }

    /// Zero the counter. The host calls this when a render finishes; the
    /// context is never carried across renders.
    pub fn reset(&self) {
        self.loops.set(0);
    }
}
