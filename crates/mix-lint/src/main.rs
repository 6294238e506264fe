use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mix_lint::{check_report, dump, format_source, load_config, load_source, mnemonic_table};
use mix_syntax::mnemonic::{Categories, Category};
use mix_syntax::parse_program;

#[derive(Parser, Debug)]
#[command(author, version, about = "Checker and formatter for MIX instruction files", long_about=None)]
struct Cli {
    /// JSON parser config (keys: case_insensitive, collapse_spaces, skip_blank_lines)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Accept lowercase mnemonics
    #[arg(long, global = true)]
    case_insensitive: bool,
    /// Accept runs of spaces and leading/trailing blanks
    #[arg(long, global = true)]
    collapse_spaces: bool,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report every invalid line; exits non-zero if any
    Check {
        /// Instruction file, `-` for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Rewrite every line in canonical form
    Fmt {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Only verify the file is already canonical
        #[arg(long)]
        check: bool,
    },
    /// Emit every parsed line as JSON
    Dump {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List the mnemonic table
    Mnemonics {
        /// Restrict to these categories. Repeat flag to add several.
        #[arg(long = "category", value_enum, num_args = 1..)]
        categories: Vec<CategoryArg>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg { OnlyName, Field, NonField, Arg }

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::OnlyName => Category::OnlyName,
            CategoryArg::Field => Category::Field,
            CategoryArg::NonField => Category::NonField,
            CategoryArg::Arg => Category::Arg,
        }
    }
}

fn write_or_print(out: Option<PathBuf>, text: &str) -> Result<()> {
    if let Some(path) = out { std::fs::write(path, text)?; } else { print!("{}", text); }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref(), cli.case_insensitive, cli.collapse_spaces)?;

    match cli.cmd {
        Command::Check { input, format } => {
            let src = load_source(&input)?;
            let name = src.display_name();
            let program = parse_program(&src.text, &cfg);
            let report = check_report(&name, &program);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    for d in &report.diagnostics { eprint!("{}", d.render()); }
                    let s = &report.summary;
                    println!("{name}: {} lines, {} ok, {} errors", s.lines, s.instructions, s.errors);
                }
            }
            anyhow::ensure!(report.diagnostics.is_empty(), "{} invalid line(s) in {name}", report.diagnostics.len());
        }
        Command::Fmt { input, out, check } => {
            let src = load_source(&input)?;
            let formatted = format_source(&src.text, &cfg)?;
            if check {
                anyhow::ensure!(!formatted.changed, "{} is not in canonical form", src.display_name());
                info!(file = %src.display_name(), "already canonical");
            } else {
                write_or_print(out, &formatted.text)?;
            }
        }
        Command::Dump { input, out } => {
            let src = load_source(&input)?;
            let program = parse_program(&src.text, &cfg);
            let json = serde_json::to_string_pretty(&dump(&src.display_name(), &program))?;
            write_or_print(out, &format!("{json}\n"))?;
        }
        Command::Mnemonics { categories, format } => {
            let filter = if categories.is_empty() {
                Categories::all()
            } else {
                categories.into_iter().map(Category::from).collect()
            };
            let table = mnemonic_table(filter);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
                OutputFormat::Text => {
                    for m in &table { println!("{:<6} {}", m.mnemonic, m.category); }
                }
            }
        }
    }

    Ok(())
}
