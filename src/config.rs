use serde::{Deserialize, Serialize};

/// Knobs for the line parser. `Default` is the strict grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub case_insensitive: bool, // accept `ld1 2000,3` by upper-casing letters
    pub collapse_spaces: bool,  // allow more than one space after the mnemonic
    pub skip_blank_lines: bool, // batch parsing only
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            collapse_spaces: false,
            skip_blank_lines: true,
        }
    }
}

impl ParserConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ParserConfig::from_json(r#"{ "case_insensitive": true }"#).unwrap();
        assert!(cfg.case_insensitive);
        assert!(!cfg.collapse_spaces);
        assert!(cfg.skip_blank_lines);
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(ParserConfig::from_json(r#"{ "case_insensitive": "yes" }"#).is_err());
    }
}
