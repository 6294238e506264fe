use serde::Serialize;

use mix_syntax::mnemonic::{listing, Categories, Category};
use mix_syntax::program::{parse_program, ParsedLine, Program, Summary};
use mix_syntax::{ErrorKind, LineError, ParsedInstruction, ParserConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub kind: ErrorKind,
    pub message: String,
    pub source: String,
}

impl Diagnostic {
    /// `file:line:col: error: message`, then the line with a caret under
    /// the offending column.
    pub fn render(&self) -> String {
        let gutter = self.line.to_string().len();
        format!(
            "{}:{}:{}: error: {}\n {:>gutter$} |\n {} | {}\n {:>gutter$} | {:>col$}\n",
            self.file,
            self.line,
            self.column,
            self.message,
            "",
            self.line,
            self.source,
            "",
            "^",
            col = self.column,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub file: String,
    pub summary: Summary,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineOut {
    pub line: usize,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<ParsedInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MnemonicOut {
    pub mnemonic: String,
    pub category: Category,
}

fn diagnostic(file: &str, l: &ParsedLine) -> Option<Diagnostic> {
    let e = l.result.as_ref().err()?;
    Some(Diagnostic {
        file: file.to_string(),
        line: l.number,
        column: e.column(),
        kind: e.kind(),
        message: e.to_string(),
        source: l.source.clone(),
    })
}

pub fn diagnostics(file: &str, program: &Program) -> Vec<Diagnostic> {
    program.lines.iter().filter_map(|l| diagnostic(file, l)).collect()
}

pub fn check_report(file: &str, program: &Program) -> Report {
    Report {
        file: file.to_string(),
        summary: program.summary(),
        diagnostics: diagnostics(file, program),
    }
}

pub fn dump(file: &str, program: &Program) -> Vec<LineOut> {
    program
        .lines
        .iter()
        .map(|l| {
            let ins = l.result.as_ref().ok().copied();
            LineOut {
                line: l.number,
                source: l.source.clone(),
                instruction: ins,
                canonical: ins.map(|i| i.to_string()),
                error: diagnostic(file, l),
            }
        })
        .collect()
}

/// Canonical rewrite of a whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    /// `false` when the input already was `text`, byte for byte.
    pub changed: bool,
}

pub fn format_source(source: &str, cfg: &ParserConfig) -> Result<Formatted, LineError> {
    let text = parse_program(source, cfg).render()?;
    let changed = text != source;
    Ok(Formatted { text, changed })
}

pub fn mnemonic_table(filter: Categories) -> Vec<MnemonicOut> {
    listing(filter)
        .into_iter()
        .map(|m| MnemonicOut {
            mnemonic: m.to_string(),
            category: m.category(),
        })
        .collect()
}
