use std::io;
use thiserror::Error;

/// Custom error types for the phrase generator
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Substitution error: {0}")]
    Substitution(String),

    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),
}

impl GrammarError {
    /// Build an `InvalidGrammar` error out of collected diagnostics
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let joined = diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        GrammarError::InvalidGrammar(joined)
    }
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// A message collected while parsing, merging or binding a grammar.
///
/// Diagnostics never abort the surrounding operation; they are appended to a
/// list owned by the caller and kept until it is cleared.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("The nonterminal \"{0}\" doesn't exist.")]
    MissingStart(String),

    #[error("Recursive expansion of \"{0}\" is detected.")]
    RecursiveExpansion(String),

    #[error("The local nonterminal \"{0}\" is not found.")]
    MissingLocal(String),

    #[error("The nonterminal \"{0}\" is already defined.")]
    Duplicate(String),
}
