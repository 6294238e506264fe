use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mix_syntax::{Parser as LineParser, ParserConfig};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Parse MIX instruction lines and print their canonical form"
)]
struct Opts {
    /// JSON parser config (see ParserConfig)
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    /// Accept lowercase mnemonics
    #[arg(long)]
    case_insensitive: bool,
    /// Print the parsed structure as JSON instead of the canonical line
    #[arg(long)]
    json: bool,
    #[arg(value_name = "LINE", required = true)]
    lines: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let mut cfg = match &opts.config {
        Some(path) => {
            let txt = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            ParserConfig::from_json(&txt).with_context(|| format!("parsing {path}"))?
        }
        None => ParserConfig::default(),
    };
    cfg.case_insensitive |= opts.case_insensitive;

    let parser = LineParser::new(cfg);
    let mut failed = 0usize;
    for line in &opts.lines {
        match parser.parse_line(line) {
            Ok(ins) if opts.json => println!("{}", serde_json::to_string(&ins)?),
            Ok(ins) => println!("{:<24} ; {}", ins.to_string(), ins.category()),
            Err(e) => {
                eprintln!("{line:?}: error: {e}");
                failed += 1;
            }
        }
    }

    anyhow::ensure!(failed == 0, "{failed} of {} lines failed to parse", opts.lines.len());
    Ok(())
}
