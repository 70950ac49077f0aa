use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The single capability the engine needs from the external variable
/// subsystem: scope a named string value so later fragment expansions in the
/// same render can see it. Last write wins.
pub trait VariableStore {
    fn set(&mut self, name: &str, value: &str);
}

/// Shared handle to whichever store the host wired in. Engines built without
/// one simply never register the variable-binding strategies.
pub type VarHandle = Rc<RefCell<dyn VariableStore>>;

/// In-memory store used by the bundled template host (and tests) in place of
/// a full external variables subsystem.
#[derive(Debug, Default)]
pub struct MemoryVars {
    values: HashMap<String, String>,
}

impl MemoryVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl VariableStore for MemoryVars {
    fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}
