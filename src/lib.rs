pub mod config;
pub mod error;
pub mod instruction;
pub mod mnemonic;
pub mod operand;
pub mod parser;
pub mod program;
pub mod token;

pub use config::ParserConfig;
pub use error::{ErrorKind, LineError, ParseError};
pub use instruction::ParsedInstruction;
pub use mnemonic::{Category, Mnemonic, Register};
pub use operand::{Address, ArgSpec, Argument, FieldSpec, Fields, Index, Operand};
pub use parser::{parse_line, Parser};
pub use program::{parse_program, parse_program_parallel, ParsedLine, Program, Summary};
