use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use mix_syntax::ParserConfig;

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    /// Name used in diagnostics; `-` reads as `<stdin>`.
    pub fn display_name(&self) -> String {
        if self.path.as_os_str() == "-" {
            "<stdin>".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}

/// Reads a whole instruction file, or stdin when `path` is `-`.
pub fn load_source(path: &Path) -> Result<SourceFile> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    Ok(SourceFile {
        path: path.to_path_buf(),
        text,
    })
}

/// Config file (if any) with command-line overrides applied on top.
pub fn load_config(path: Option<&Path>, case_insensitive: bool, collapse_spaces: bool) -> Result<ParserConfig> {
    let mut cfg = match path {
        Some(p) => {
            let txt = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            ParserConfig::from_json(&txt).with_context(|| format!("invalid config {}", p.display()))?
        }
        None => ParserConfig::default(),
    };
    cfg.case_insensitive |= case_insensitive;
    cfg.collapse_spaces |= collapse_spaces;
    Ok(cfg)
}
