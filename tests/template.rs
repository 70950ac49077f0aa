mod common;

use common::OVERFLOW_MARKER;
use loopex::template::TemplateHost;
use loopex::{Config, Error, StrategyKind};

fn host(max_loops: i64) -> TemplateHost {
    TemplateHost::new(Config {
        max_loops,
        ..Config::default()
    })
}

fn args(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn counted_loop_renders_each_index() {
    let out = host(100)
        .render("{{#loop:i|1|3|[{{#var:i}}]}}", Vec::new())
        .unwrap();
    assert_eq!(out, "[1][2][3]");
}

#[test]
fn counted_loop_descends_on_negative_count() {
    let out = host(100)
        .render("{{#loop:i|5|-3|({{#var:i}})}}", Vec::new())
        .unwrap();
    assert_eq!(out, "(5)(4)(3)");
}

#[test]
fn while_terminates_by_mutating_a_variable() {
    let out = host(100)
        .render(
            "{{#vardefine:go|y}}{{#while:|{{#var:go}}|X{{#vardefine:go|}}}}",
            Vec::new(),
        )
        .unwrap();
    assert_eq!(out, "X");
}

#[test]
fn dowhile_renders_body_once_on_false_condition() {
    let out = host(100).render("{{#dowhile:||X}}", Vec::new()).unwrap();
    assert_eq!(out, "X");
}

#[test]
fn var_falls_back_to_default_argument() {
    let out = host(100)
        .render("{{#var:missing|fallback}}", Vec::new())
        .unwrap();
    assert_eq!(out, "fallback");
}

#[test]
fn runaway_render_ends_with_the_notice() {
    let (text, report) = host(3)
        .render_with_report("{{#while:|1|x}}", Vec::new())
        .unwrap();
    assert_eq!(text, format!("xxx\n{OVERFLOW_MARKER}"));
    assert_eq!(report, "loop count: 3/3\n");
}

#[test]
fn nested_loops_share_the_budget_and_each_depth_reports() {
    // outer iteration 1 consumes 1, its inner loop 3 more; outer iteration 2
    // consumes the last slot, so its inner loop trips immediately, and then
    // the outer loop trips too
    let (text, report) = host(5)
        .render_with_report("{{#loop:i|0|3|{{#loop:j|0|3|x}}}}", Vec::new())
        .unwrap();
    assert_eq!(text, format!("xxx{OVERFLOW_MARKER}\n{OVERFLOW_MARKER}"));
    assert_eq!(report, "loop count: 5/5\n");
}

#[test]
fn forargs_over_supplied_named_arguments() {
    let out = host(100)
        .render(
            "{{#forargs:x|k|v|{{#var:k}}={{#var:v}};}}",
            args(&[("x1", "A"), ("y1", "C"), ("x2", "B")]),
        )
        .unwrap();
    assert_eq!(out, "1=A;2=B;");
}

#[test]
fn fornumargs_over_supplied_positional_arguments() {
    let out = host(100)
        .render(
            "{{#fornumargs:k|v|({{#var:k}}:{{#var:v}})}}",
            args(&[("1", "a"), ("3", "b"), ("-1", "c")]),
        )
        .unwrap();
    assert_eq!(out, "(-1:c)(1:a)(3:b)");
}

#[test]
fn argument_iteration_at_top_level_yields_nothing() {
    let out = host(100)
        .render("{{#fornumargs:k|v|never}}", Vec::new())
        .unwrap();
    assert_eq!(out, "");
}

#[test]
fn disabled_function_is_a_hard_error() {
    let mut config = Config::default();
    config.enabled.remove(&StrategyKind::Loop);
    let host = TemplateHost::new(config);
    let err = host.render("{{#loop:i|1|3|x}}", Vec::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownFunction(name) if name == "loop"));
}

#[test]
fn unknown_function_is_a_hard_error() {
    let err = host(100).render("{{#bogus}}", Vec::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownFunction(name) if name == "bogus"));
}

#[test]
fn convenience_render_uses_defaults() {
    let out = loopex::render("a{{#loop:i|0|2|-}}z").unwrap();
    assert_eq!(out, "a--z");
}

#[test]
fn fresh_context_per_render() {
    let host = host(3);
    let (_, first) = host
        .render_with_report("{{#loop:i|0|3|x}}", Vec::new())
        .unwrap();
    assert_eq!(first, "loop count: 3/3\n");
    // a new render starts from a zeroed counter
    let (text, second) = host
        .render_with_report("{{#loop:i|0|3|y}}", Vec::new())
        .unwrap();
    assert_eq!(text, "yyy");
    assert_eq!(second, "loop count: 3/3\n");
}
