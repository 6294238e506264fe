use std::collections::BTreeMap;
use std::thread;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::error::{LineError, ParseError};
use crate::instruction::ParsedInstruction;
use crate::mnemonic::Category;
use crate::parser::Parser;

/// One source line together with its parse outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub number: usize, // 1-based
    pub source: String,
    pub result: Result<ParsedInstruction, ParseError>,
}

/// A whole text, parsed line by line. A bad line never stops the ones
/// after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub lines: Vec<ParsedLine>,
    /// Line count of the source text, skipped blank lines included.
    pub source_lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub lines: usize,
    pub instructions: usize,
    pub errors: usize,
    pub by_category: BTreeMap<Category, usize>,
}

impl Program {
    pub fn instructions(&self) -> impl Iterator<Item = (usize, &ParsedInstruction)> + '_ {
        self.lines
            .iter()
            .filter_map(|l| l.result.as_ref().ok().map(|ins| (l.number, ins)))
    }

    pub fn errors(&self) -> impl Iterator<Item = LineError> + '_ {
        self.lines.iter().filter_map(|l| {
            l.result.as_ref().err().map(|e| LineError {
                line: l.number,
                source: e.clone(),
            })
        })
    }

    pub fn is_ok(&self) -> bool {
        self.lines.iter().all(|l| l.result.is_ok())
    }

    pub fn summary(&self) -> Summary {
        let mut s = Summary {
            lines: self.lines.len(),
            ..Summary::default()
        };
        for (_, ins) in self.instructions() {
            s.instructions += 1;
            *s.by_category.entry(ins.category()).or_default() += 1;
        }
        s.errors = s.lines - s.instructions;
        s
    }

    /// Canonical text of every line, one per line. Skipped blank lines come
    /// back as empty lines. Fails on the first bad line so a partially
    /// rendered file is never produced.
    pub fn render(&self) -> Result<String, LineError> {
        let mut out = String::new();
        let mut next = 1;
        for l in &self.lines {
            for _ in next..l.number {
                out.push('\n');
            }
            match &l.result {
                Ok(ins) => {
                    out.push_str(&ins.to_string());
                    out.push('\n');
                }
                Err(e) => {
                    return Err(LineError {
                        line: l.number,
                        source: e.clone(),
                    })
                }
            }
            next = l.number + 1;
        }
        for _ in next..=self.source_lines {
            out.push('\n');
        }
        Ok(out)
    }
}

fn numbered_lines<'a>(text: &'a str, cfg: &ParserConfig) -> Vec<(usize, &'a str)> {
    let skip_blank = cfg.skip_blank_lines;
    text.lines()
        .enumerate()
        .filter(|(_, l)| !(skip_blank && l.trim().is_empty()))
        .map(|(i, l)| (i + 1, l))
        .collect()
}

fn log_outcome(program: &Program) {
    let summary = program.summary();
    if summary.errors > 0 {
        warn!(errors = summary.errors, lines = summary.lines, "program has invalid lines");
    } else {
        debug!(lines = summary.lines, "program parsed");
    }
}

/// Parses every line of `text` independently.
pub fn parse_program(text: &str, cfg: &ParserConfig) -> Program {
    let parser = Parser::new(*cfg);
    let lines = numbered_lines(text, cfg)
        .into_iter()
        .map(|(number, source)| ParsedLine {
            number,
            source: source.to_string(),
            result: parser.parse_line(source),
        })
        .collect();
    let program = Program {
        lines,
        source_lines: text.lines().count(),
    };
    log_outcome(&program);
    program
}

/// Threads actually spawned: never more than one per line, nor more than
/// `limit`.
fn worker_count(requested: usize, lines: usize, limit: usize) -> usize {
    requested.min(lines).min(limit).max(1)
}

/// Same result as [`parse_program`], with lines split across `workers`
/// scoped threads. Output keeps source order. The thread count is capped by
/// the line count and the available parallelism.
pub fn parse_program_parallel(text: &str, cfg: &ParserConfig, workers: usize) -> Program {
    let parser = Parser::new(*cfg);
    let numbered = numbered_lines(text, cfg);
    let limit = thread::available_parallelism().map_or(1, |n| n.get());
    let workers = worker_count(workers, numbered.len(), limit);
    debug!(workers, lines = numbered.len(), "parsing in parallel");
    let chunk = numbered.len().div_ceil(workers).max(1);

    let lines = thread::scope(|scope| {
        let handles: Vec<_> = numbered
            .chunks(chunk)
            .map(|part| {
                scope.spawn(move || {
                    part.iter()
                        .map(|&(number, source)| ParsedLine {
                            number,
                            source: source.to_string(),
                            result: parser.parse_line(source),
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    });

    let program = Program {
        lines,
        source_lines: text.lines().count(),
    };
    log_outcome(&program);
    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "LDA 2000,1(0:5)\n\nADD 4000,1\nJLE 10,1\nFOO 1,1\nHALT\n";

    #[test]
    fn keeps_going_after_errors() {
        let p = parse_program(SOURCE, &ParserConfig::default());
        assert_eq!(p.lines.len(), 5);
        let errs: Vec<(usize, ErrorKind)> = p.errors().map(|e| (e.line, e.source.kind())).collect();
        assert_eq!(errs, vec![(3, ErrorKind::OperandRange), (5, ErrorKind::UnknownMnemonic)]);
        let numbers: Vec<usize> = p.instructions().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 4, 6]);
        assert!(!p.is_ok());
    }

    #[test]
    fn blank_lines_can_be_kept() {
        let cfg = ParserConfig {
            skip_blank_lines: false,
            ..ParserConfig::default()
        };
        let p = parse_program(SOURCE, &cfg);
        assert_eq!(p.lines.len(), 6);
        assert_eq!(p.lines[1].result.as_ref().unwrap_err().kind(), ErrorKind::MalformedOperand);
    }

    #[test]
    fn summary_counts_categories() {
        let s = parse_program(SOURCE, &ParserConfig::default()).summary();
        assert_eq!(s.lines, 5);
        assert_eq!(s.instructions, 3);
        assert_eq!(s.errors, 2);
        assert_eq!(s.by_category.get(&Category::Field), Some(&1));
        assert_eq!(s.by_category.get(&Category::NonField), Some(&1));
        assert_eq!(s.by_category.get(&Category::OnlyName), Some(&1));
        assert_eq!(s.by_category.get(&Category::Arg), None);
    }

    #[test]
    fn render_refuses_bad_programs() {
        let p = parse_program(SOURCE, &ParserConfig::default());
        assert_eq!(p.render().unwrap_err().line, 3);

        let p = parse_program("LDA 0002,1\nHALT", &ParserConfig::default());
        assert_eq!(p.render().unwrap(), "LDA 2,1\nHALT\n");
    }

    #[test]
    fn render_keeps_blank_lines() {
        let cfg = ParserConfig::default();
        let p = parse_program("NOP\n\n  \nJL 010,1\n\n", &cfg);
        assert_eq!(p.source_lines, 5);
        assert_eq!(p.render().unwrap(), "NOP\n\n\nJL 10,1\n\n");

        assert_eq!(parse_program("\nHALT", &cfg).render().unwrap(), "\nHALT\n");
        assert_eq!(parse_program("", &cfg).render().unwrap(), "");
    }

    #[test]
    fn worker_count_is_bounded() {
        assert_eq!(worker_count(0, 10, 8), 1);
        assert_eq!(worker_count(4, 10, 8), 4);
        assert_eq!(worker_count(500, 10, 8), 8);
        assert_eq!(worker_count(500, 3, 8), 3);
        assert_eq!(worker_count(500, 0, 8), 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let text: String = (0..200).map(|i| format!("ST{} {},{}\n", i % 5 + 1, i * 7, i % 6)).collect();
        let cfg = ParserConfig::default();
        let seq = parse_program(&text, &cfg);
        for workers in [0, 1, 3, 8, 500] {
            assert_eq!(parse_program_parallel(&text, &cfg, workers), seq);
        }
    }
}
