//! Error taxonomy for the generation pipeline.
//!
//! Every variant aborts the run; nothing here is retried or downgraded to a
//! warning. I/O and configuration failures are reported through `anyhow` at
//! the binary edge with the offending path attached as context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The source file is not syntactically valid Go.
    #[error("syntax error at line {line}, column {column}")]
    Parse { line: usize, column: usize },

    /// A type expression outside the supported grammar (identifier, qualified
    /// identifier, pointer, slice, map).
    #[error("unsupported type expression `{text}` ({kind}) at line {line}, column {column}")]
    Unsupported {
        kind: String,
        text: String,
        line: usize,
        column: usize,
    },

    /// The finishing pass could not analyze or format the draft.
    #[error("format: {message}")]
    Format { message: String },

    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

pub type Result<T> = std::result::Result<T, Error>;
