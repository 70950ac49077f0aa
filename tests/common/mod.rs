#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use loopex::{
    Config, Fragment, Frame, Literal, LoopEngine, RawFragment, Result, VariableStore,
};

/// Raw fragment over a fixed string.
pub fn lit(s: &str) -> RawFragment {
    Literal::raw(s)
}

/// Raw fragment backed by a closure, so tests can observe how often the
/// engine re-expands it and feed it changing values.
pub struct FnFragment<F: Fn() -> String>(pub F);

impl<F: Fn() -> String> Fragment for FnFragment<F> {
    fn expand(&self) -> Result<String> {
        Ok((self.0)())
    }
}

pub fn dynamic(f: impl Fn() -> String + 'static) -> RawFragment {
    Rc::new(FnFragment(f))
}

/// Fragment yielding each element of `values` in turn on successive
/// expansions, then empty strings forever.
pub fn sequence(values: &[&str]) -> RawFragment {
    let values: Vec<String> = values.iter().map(|s| s.to_string()).collect();
    let next = RefCell::new(0usize);
    dynamic(move || {
        let i = *next.borrow();
        *next.borrow_mut() += 1;
        values.get(i).cloned().unwrap_or_default()
    })
}

/// Fragment that fails expansion after `ok_expansions` successful ones,
/// standing in for a host-level fault mid-loop.
pub struct FailAfter {
    pub ok_expansions: RefCell<u32>,
    pub value: String,
}

impl Fragment for FailAfter {
    fn expand(&self) -> Result<String> {
        let mut left = self.ok_expansions.borrow_mut();
        if *left == 0 {
            return Err(loopex::Error::Expand("host fault".into()));
        }
        *left -= 1;
        Ok(self.value.clone())
    }
}

pub fn fail_after(ok_expansions: u32, value: &str) -> RawFragment {
    Rc::new(FailAfter {
        ok_expansions: RefCell::new(ok_expansions),
        value: value.to_string(),
    })
}

/// Frame with a fixed set of caller-supplied arguments. Integer names feed
/// the positional-numeric view (returned unsorted, as supplied, since the
/// engine must sort); the rest feed the named view in supplied order.
pub struct TestFrame {
    args: Vec<(String, String)>,
}

impl TestFrame {
    pub fn empty() -> Self {
        Self { args: Vec::new() }
    }

    pub fn with_args(pairs: &[(&str, &str)]) -> Self {
        Self {
            args: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Frame for TestFrame {
    fn is_template(&self) -> bool {
        !self.args.is_empty()
    }

    fn named_args(&self) -> Vec<(String, RawFragment)> {
        self.args
            .iter()
            .filter(|(name, _)| name.parse::<i64>().is_err())
            .map(|(name, value)| (name.clone(), lit(value)))
            .collect()
    }

    fn numbered_args(&self) -> Vec<(i64, RawFragment)> {
        self.args
            .iter()
            .filter_map(|(name, value)| name.parse::<i64>().ok().map(|key| (key, lit(value))))
            .collect()
    }
}

/// Variable store that records every bind in order and keeps the latest
/// value per name.
#[derive(Default)]
pub struct RecordingVars {
    pub log: Vec<(String, String)>,
}

impl RecordingVars {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.log
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl VariableStore for RecordingVars {
    fn set(&mut self, name: &str, value: &str) {
        self.log.push((name.to_string(), value.to_string()));
    }
}

pub fn recording_vars() -> Rc<RefCell<RecordingVars>> {
    Rc::new(RefCell::new(RecordingVars::default()))
}

/// Engine over a recording store, with the given iteration budget.
pub fn engine(max_loops: i64) -> (LoopEngine, Rc<RefCell<RecordingVars>>) {
    let vars = recording_vars();
    let config = Config {
        max_loops,
        ..Config::default()
    };
    (LoopEngine::with_vars(config, vars.clone()), vars)
}

pub const OVERFLOW_MARKER: &str =
    "<div class=\"error\">Maximum number of loops have been performed</div>";
