//! Phrase-Gen is a weighted random phrase generator.
//!
//! Phrases are described by a small grammar language where each nonterminal
//! is assigned alternatives, optionally weighted, that can reference other
//! nonterminals, define inline rules and post-process their output with
//! regex substitutions.
//!
//! # Example
//!
//! ```rust
//! use phrase_gen::{Generator, Syntax};
//!
//! let syntax = Syntax::parse(r#"
//!     main = {greeting}, {subject}!
//!     greeting = Hello | "Good morning" 2
//!     subject = world | Rust programmers
//! "#);
//! assert!(syntax.diagnostics().is_empty());
//!
//! let mut generator = Generator::from_syntax(syntax);
//! assert_eq!(generator.combination_count(), 4);
//!
//! let phrase = generator.generate();
//! assert!(phrase.ends_with('!'));
//! ```

mod binder;
pub mod char_feeder;
pub mod generator;
pub mod grammar;
pub mod multi;
pub mod parser;
pub mod random;
pub mod sampling;
pub mod substitution;
pub mod utils;

pub use generator::{DEFAULT_START, Generator, GeneratorConfig, Syntax};
pub use grammar::{ExternalContext, Grammar, NIL_PHRASE, Options, Part, ProductionRule, Text};
pub use multi::{GrammarId, MultiGrammar};
pub use random::{RandomSource, RngSource};
pub use substitution::{FnTransform, RegexCompiler, SubstitutionCompiler, TextTransform};
pub use utils::{Diagnostic, GrammarError, Result};
