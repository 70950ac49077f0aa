use clap::Parser;
use loopex::template::TemplateHost;
use loopex::{Config, StrategyKind};

/// Render a loop-template snippet from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Template source text, e.g. '{{#loop:i|1|3|[{{#var:i}}]}}'
    template: Option<String>,
    /// Read the template source from a file instead
    #[arg(long, conflicts_with = "template")]
    file: Option<std::path::PathBuf>,
    /// Iteration budget for the render; -1 means unlimited
    #[arg(long, default_value_t = 100)]
    max_loops: i64,
    /// Disable a loop function (repeatable)
    #[arg(long, value_name = "NAME")]
    disable: Vec<StrategyKind>,
    /// Caller-supplied template argument as name=value (repeatable);
    /// integer names land in the positional view
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    args: Vec<String>,
    /// Caller-supplied arguments as a JSON object of strings
    #[arg(long, value_name = "JSON")]
    args_json: Option<String>,
    /// Print the loop-limit report to stderr after rendering
    #[arg(long)]
    report: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let source = match (&args.template, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("cannot read {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("no template given (pass source text or --file)");
            std::process::exit(1);
        }
    };

    let mut config = Config {
        max_loops: args.max_loops,
        ..Config::default()
    };
    for kind in &args.disable {
        config.enabled.remove(kind);
    }

    let mut template_args = Vec::new();
    for pair in &args.args {
        match pair.split_once('=') {
            Some((name, value)) => template_args.push((name.to_string(), value.to_string())),
            None => {
                eprintln!("bad --arg '{pair}': expected name=value");
                std::process::exit(1);
            }
        }
    }
    if let Some(json) = &args.args_json {
        let map: std::collections::BTreeMap<String, String> = match serde_json::from_str(json) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("invalid --args-json: {e}");
                std::process::exit(1);
            }
        };
        template_args.extend(map);
    }

    let host = TemplateHost::new(config);
    match host.render_with_report(&source, template_args) {
        Ok((text, report)) => {
            println!("{text}");
            if args.report {
                eprint!("{report}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
