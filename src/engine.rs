//! The four loop algorithms and their shared helpers.
//!
//! Behavior notes that apply throughout:
//! - "truthy" for loop conditions means non-empty after trimming;
//! - condition and body fragments are re-expanded fresh on every pass, so
//!   side effects in them repeat;
//! - the iteration budget is consumed *before* any per-iteration expansion,
//!   and exhaustion is reported in-band via the overflow notice, never as an
//!   error.

use itertools::Itertools;

use crate::context::ExecutionContext;
use crate::errors::Result;
use crate::frame::{expand_trimmed, Frame, RawFragment};
use crate::LoopEngine;

/// `#while` / `#dowhile`: args are `[unused, condition, body]`. Slot 0 is a
/// historical placeholder and always ignored.
pub(crate) fn perform_while(
    engine: &LoopEngine,
    args: &[RawFragment],
    ctx: &ExecutionContext,
    post_test: bool,
) -> Result<String> {
    let raw_cond = args.get(1);
    let raw_body = args.get(2);

    if !post_test && expand_trimmed(raw_cond)?.is_empty() {
        // pre-test loop, condition false from the start
        return Ok(String::new());
    }

    let mut output = String::new();
    loop {
        if !engine.config().try_consume(ctx) {
            return Ok(engine.overflow_notice(output, ctx));
        }
        output.push_str(&expand_trimmed(raw_body)?);

        if expand_trimmed(raw_cond)?.is_empty() {
            return Ok(output);
        }
    }
}

/// `#loop`: args are `[var, start, count, body]`, all optional. A negative
/// count iterates downward; the walk performs exactly `|count|` iterations
/// unless the budget trips first.
pub(crate) fn perform_loop(
    engine: &LoopEngine,
    args: &[RawFragment],
    ctx: &ExecutionContext,
) -> Result<String> {
    let var_name = expand_trimmed(args.first())?;
    let start = int_prefix(&expand_trimmed(args.get(1))?);
    let count = int_prefix(&expand_trimmed(args.get(2))?);
    let raw_body = args.get(3);

    if count == 0 {
        // no loops to perform, and no budget consumed
        return Ok(String::new());
    }

    let end = start.saturating_add(count);
    let mut i = start;
    let mut output = String::new();

    while i != end {
        if !engine.config().try_consume(ctx) {
            return Ok(engine.overflow_notice(output, ctx));
        }
        engine.bind_variable(&var_name, &i.to_string());
        output.push_str(&expand_trimmed(raw_body)?);

        if i < end {
            i += 1;
        } else {
            i -= 1;
        }
    }
    Ok(output)
}

/// `#forargs`: args are `[filter, keyVar, valVar, body]`. An empty or purely
/// numeric filter selects the positional-numeric argument view; anything
/// else selects the named view and prefix-filters it.
pub(crate) fn perform_forargs_entry(
    engine: &LoopEngine,
    frame: &dyn Frame,
    args: &[RawFragment],
) -> Result<String> {
    let filter = expand_trimmed(args.first())?;
    let func_args = if args.is_empty() { args } else { &args[1..] };

    let template_args = if is_numeric_filter(&filter) {
        numeric_view(frame)
    } else {
        frame.named_args()
    };
    perform_forargs(engine, frame, func_args, template_args, &filter)
}

/// `#fornumargs`: args are `[keyVar, valVar, body]`, or with a leading
/// placeholder slot when four or more are supplied (pre-0.4 calling
/// convention). Always iterates the positional-numeric view, unfiltered.
pub(crate) fn perform_fornumargs_entry(
    engine: &LoopEngine,
    frame: &dyn Frame,
    args: &[RawFragment],
) -> Result<String> {
    let func_args = if args.len() > 3 { &args[1..] } else { args };
    perform_forargs(engine, frame, func_args, numeric_view(frame), "")
}

/// Shared core of `#forargs` / `#fornumargs`.
///
/// No budget check here: iteration count is bounded by the arity of the
/// caller-supplied arguments, not by the global loop budget.
fn perform_forargs(
    engine: &LoopEngine,
    frame: &dyn Frame,
    func_args: &[RawFragment],
    template_args: Vec<(String, RawFragment)>,
    prefix: &str,
) -> Result<String> {
    if !frame.is_template() {
        // not called within a template instance
        return Ok(String::new());
    }

    let key_var = expand_trimmed(func_args.first())?;
    let val_var = expand_trimmed(func_args.get(1))?;
    let raw_body = func_args.get(2);

    let mut output = String::new();
    for (arg_name, arg_val) in template_args {
        if !prefix.is_empty() && !arg_name.starts_with(prefix) {
            continue;
        }
        if key_var != val_var {
            // argument name, minus the filter prefix
            engine.bind_variable(&key_var, &arg_name[prefix.len()..]);
        }
        engine.bind_variable(&val_var, &arg_val.expand()?);

        output.push_str(&expand_trimmed(raw_body)?);
    }
    Ok(output)
}

/// The positional-numeric argument view: integer keys only, ascending
/// (negative keys first), keys stringified for prefix matching.
fn numeric_view(frame: &dyn Frame) -> Vec<(String, RawFragment)> {
    frame
        .numbered_args()
        .into_iter()
        .sorted_by_key(|(key, _)| *key)
        .map(|(key, frag)| (key.to_string(), frag))
        .collect()
}

/// Empty, or a digit run with no leading zero (`^([1-9][0-9]*)?$`).
fn is_numeric_filter(filter: &str) -> bool {
    let mut chars = filter.chars();
    match chars.next() {
        None => true,
        Some('1'..='9') => chars.all(|c| c.is_ascii_digit()),
        Some(_) => false,
    }
}

/// Permissive C-style string-to-integer coercion: optional sign, then the
/// longest leading digit run; anything else (including overflow) is 0.
pub(crate) fn int_prefix(s: &str) -> i64 {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let parsed = digits[..end].parse::<i64>().unwrap_or(0);
    if negative {
        -parsed
    } else {
        parsed
    }
}
