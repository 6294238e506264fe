pub mod report;
pub mod source;

// Re-export commonly used types/functions for the CLI
pub use report::{
    check_report, diagnostics, dump, format_source, mnemonic_table, Diagnostic, Formatted, LineOut, MnemonicOut, Report,
};
pub use source::{load_config, load_source, SourceFile};
