//! Minimal MediaWiki-flavoured template host.
//!
//! Just enough front end to drive the loop engine standalone: literal text
//! plus nestable `{{#name:arg1|arg2|…}}` invocations. Besides the five loop
//! functions, the host provides `#var` (read a variable, optional default in
//! the second argument) and `#vardefine` (write), so loop conditions can
//! terminate by mutating state.
//!
//! Arguments stay unparsed-until-needed at the node level: each argument is
//! a node list wrapped in a [`Fragment`] that re-renders on every `expand`
//! call. Nothing is cached, so side effects inside loop bodies and
//! conditions repeat per iteration, which the loop semantics rely on.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Config;
use crate::context::ExecutionContext;
use crate::errors::Result;
use crate::frame::{expand_trimmed, Fragment, Frame, Literal, RawFragment};
use crate::parser::Scanner;
use crate::vars::{MemoryVars, VariableStore};
use crate::LoopEngine;

/// Parsed template node.
#[derive(Debug, Clone)]
pub enum Node {
    Text(String),
    /// `{{#name:arg|arg|…}}`. Argument node lists are shared so lazy
    /// fragments can hold them without cloning the tree.
    Invoke {
        name: String,
        args: Vec<Rc<Vec<Node>>>,
    },
}

/// Parse template source into a node list.
///
/// `|` and `}}` are plain text outside invocations; inside an invocation
/// they split arguments and close it. Anything that is not `{{#` is literal.
pub fn parse(source: &str) -> Result<Vec<Node>> {
    let mut scanner = Scanner::new(source);
    parse_seq(&mut scanner, false)
}

fn parse_seq(p: &mut Scanner, in_args: bool) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut text = String::new();
    loop {
        if p.eof() || (in_args && (p.peek_str("|") || p.peek_str("}}"))) {
            break;
        }
        if p.peek_str("{{#") {
            if !text.is_empty() {
                nodes.push(Node::Text(std::mem::take(&mut text)));
            }
            nodes.push(parse_invoke(p)?);
            continue;
        }
        if let Some(c) = p.bump() {
            text.push(c);
        }
    }
    if !text.is_empty() {
        nodes.push(Node::Text(text));
    }
    Ok(nodes)
}

fn parse_invoke(p: &mut Scanner) -> Result<Node> {
    p.expect_str("{{#")?;
    let name = p.parse_identifier()?;
    let mut args = Vec::new();
    if p.consume_char(':') {
        loop {
            args.push(Rc::new(parse_seq(p, true)?));
            if !p.consume_char('|') {
                break;
            }
        }
    }
    p.expect_str("}}")?;
    Ok(Node::Invoke { name, args })
}

struct HostInner {
    engine: LoopEngine,
    vars: Rc<RefCell<MemoryVars>>,
}

/// Standalone render driver: owns the engine, an in-memory variable store,
/// and the per-render lifecycle (fresh context, limit report, reset).
pub struct TemplateHost {
    inner: Rc<HostInner>,
}

impl TemplateHost {
    pub fn new(config: Config) -> Self {
        let vars = Rc::new(RefCell::new(MemoryVars::new()));
        let engine = LoopEngine::with_vars(config, vars.clone());
        Self {
            inner: Rc::new(HostInner { engine, vars }),
        }
    }

    pub fn engine(&self) -> &LoopEngine {
        &self.inner.engine
    }

    /// Render `source` with the given caller-supplied arguments. Argument
    /// names that parse as integers populate the positional-numeric view;
    /// the rest are named. An empty argument list renders in top-level page
    /// context (`forargs` / `fornumargs` yield nothing there).
    pub fn render(&self, source: &str, args: Vec<(String, String)>) -> Result<String> {
        self.render_with_report(source, args).map(|(text, _)| text)
    }

    /// Like [`render`](Self::render), also returning the loop-limit report
    /// line captured before the end-of-render reset.
    pub fn render_with_report(
        &self,
        source: &str,
        args: Vec<(String, String)>,
    ) -> Result<(String, String)> {
        let nodes = parse(source)?;
        let ctx = Rc::new(ExecutionContext::new());
        let frame = Rc::new(TemplateFrame {
            host: self.inner.clone(),
            ctx: ctx.clone(),
            args: Rc::new(args),
        });
        let text = render_nodes(&nodes, &frame)?;
        let report = self.inner.engine.limit_report(&ctx);
        self.inner.engine.render_finished(&ctx);
        Ok((text, report))
    }
}

/// One template-invocation scope: caller args plus the shared render state
/// every lazily expanded fragment needs to reach.
struct TemplateFrame {
    host: Rc<HostInner>,
    ctx: Rc<ExecutionContext>,
    args: Rc<Vec<(String, String)>>,
}

impl Frame for TemplateFrame {
    fn is_template(&self) -> bool {
        !self.args.is_empty()
    }

    fn named_args(&self) -> Vec<(String, RawFragment)> {
        self.args
            .iter()
            .filter(|(name, _)| name.parse::<i64>().is_err())
            .map(|(name, value)| (name.clone(), Literal::raw(value.clone())))
            .collect()
    }

    fn numbered_args(&self) -> Vec<(i64, RawFragment)> {
        self.args
            .iter()
            .filter_map(|(name, value)| {
                name.parse::<i64>()
                    .ok()
                    .map(|key| (key, Literal::raw(value.clone())))
            })
            .collect()
    }
}

/// A raw invocation argument: re-renders its node list on every expansion.
struct NodeFragment {
    nodes: Rc<Vec<Node>>,
    frame: Rc<TemplateFrame>,
}

impl Fragment for NodeFragment {
    fn expand(&self) -> Result<String> {
        render_nodes(&self.nodes, &self.frame)
    }
}

fn render_nodes(nodes: &[Node], frame: &Rc<TemplateFrame>) -> Result<String> {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Invoke { name, args } => out.push_str(&invoke(name, args, frame)?),
        }
    }
    Ok(out)
}

fn invoke(name: &str, args: &[Rc<Vec<Node>>], frame: &Rc<TemplateFrame>) -> Result<String> {
    let frags: Vec<RawFragment> = args
        .iter()
        .map(|nodes| {
            Rc::new(NodeFragment {
                nodes: nodes.clone(),
                frame: frame.clone(),
            }) as RawFragment
        })
        .collect();

    match name {
        "var" => {
            let var_name = expand_trimmed(frags.first())?;
            // borrow must end before a default argument gets expanded: the
            // default may itself run #vardefine
            let current = frame
                .host
                .vars
                .borrow()
                .get(&var_name)
                .map(str::to_string);
            match current {
                Some(value) => Ok(value),
                None => expand_trimmed(frags.get(1)),
            }
        }
        "vardefine" => {
            let var_name = expand_trimmed(frags.first())?;
            let value = expand_trimmed(frags.get(1))?;
            frame.host.vars.borrow_mut().set(&var_name, &value);
            Ok(String::new())
        }
        _ => frame
            .host
            .engine
            .call(name, frame.as_ref(), &frags, &frame.ctx),
    }
}
