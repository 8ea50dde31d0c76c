//! The public front of the library: parsed sources and the phrase generator.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::grammar::{ExternalContext, Grammar};
use crate::multi::{GrammarId, MultiGrammar};
use crate::parser;
use crate::random::{RandomSource, RngSource, default_random};
use crate::substitution::{RegexCompiler, SubstitutionCompiler};
use crate::utils::{Diagnostic, GrammarError, Result};

/// The start nonterminal used when none is given
pub const DEFAULT_START: &str = "main";

/// Generator settings, loadable from JSON
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Nonterminal every added grammar is bound to
    pub start_symbol: String,
    /// Select every alternative uniformly
    pub equalize: bool,
    /// Seed for a reproducible random source
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            start_symbol: DEFAULT_START.to_string(),
            equalize: false,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A parsed grammar source together with the diagnostics it produced.
///
/// Several sources can be merged into one syntax; local nonterminals stay
/// private to the source that defines them.
#[derive(Debug, Clone, Default)]
pub struct Syntax {
    grammar: Grammar,
    diagnostics: Vec<Diagnostic>,
}

impl Syntax {
    /// Parse `src` using the regex substitution engine
    pub fn parse(src: &str) -> Self {
        Self::parse_with(src, &RegexCompiler)
    }

    /// Parse `src`, compiling substitutions with `compiler`
    pub fn parse_with(src: &str, compiler: &dyn SubstitutionCompiler) -> Self {
        let (grammar, diagnostics) = parser::parse(src, compiler);
        Syntax {
            grammar,
            diagnostics,
        }
    }

    /// Parse a grammar file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let src = fs::read_to_string(path)?;
        Ok(Self::parse(&src))
    }

    /// Parse `src` and merge it in. Returns false if new diagnostics appeared.
    pub fn add_text(&mut self, src: &str) -> bool {
        self.merge(Syntax::parse(src))
    }

    /// Parse `src` with `compiler` and merge it in
    pub fn add_text_with(&mut self, src: &str, compiler: &dyn SubstitutionCompiler) -> bool {
        self.merge(Syntax::parse_with(src, compiler))
    }

    /// Merge `other` in, overwriting nonterminals defined in both.
    ///
    /// `other`'s diagnostics are carried over. Returns false if it had any or
    /// if an overwrite was reported.
    pub fn merge(&mut self, other: Syntax) -> bool {
        let before = self.diagnostics.len();
        self.diagnostics.extend(other.diagnostics);
        self.grammar.merge(other.grammar, &mut self.diagnostics);
        self.diagnostics.len() == before
    }

    /// Diagnostics of every merged source, in order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True if any source produced a diagnostic
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    pub fn clear(&mut self) {
        self.grammar.clear();
        self.diagnostics.clear();
    }

    /// The merged grammar, unbound
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Split into the grammar and its diagnostics
    pub fn into_parts(self) -> (Grammar, Vec<Diagnostic>) {
        (self.grammar, self.diagnostics)
    }
}

/// Generates phrases from one or more bound syntaxes
pub struct Generator {
    grammars: MultiGrammar,
    diagnostics: Vec<Diagnostic>,
    random: Box<dyn RandomSource>,
    start_symbol: String,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("grammars", &self.grammars)
            .field("diagnostics", &self.diagnostics)
            .field("start_symbol", &self.start_symbol)
            .finish_non_exhaustive()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::with_random(default_random())
    }
}

impl Generator {
    /// An empty generator with an entropy-seeded random source
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator drawing from `random`
    pub fn with_random(random: Box<dyn RandomSource>) -> Self {
        Generator {
            grammars: MultiGrammar::new(),
            diagnostics: Vec::new(),
            random,
            start_symbol: DEFAULT_START.to_string(),
        }
    }

    /// A generator using `config`.
    ///
    /// A configured seed gives a reproducible `StdRng`.
    pub fn with_config(config: GeneratorConfig) -> Self {
        let random: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => default_random(),
        };
        let mut generator = Self::with_random(random);
        generator.start_symbol = config.start_symbol;
        generator.grammars.equalize_chance(config.equalize);
        generator
    }

    /// A generator holding `syntax` bound to `main`
    pub fn from_syntax(syntax: Syntax) -> Self {
        let mut generator = Self::new();
        generator.add(syntax);
        generator
    }

    /// Parse `src` and hold it bound to `main`, if it is valid
    pub fn from_text(src: &str) -> Self {
        Self::from_syntax(Syntax::parse(src))
    }

    /// Add `syntax` bound to the configured start symbol
    pub fn add(&mut self, syntax: Syntax) -> Option<GrammarId> {
        let start = self.start_symbol.clone();
        self.add_with_start(syntax, &start)
    }

    /// Add `syntax` bound to `start`.
    ///
    /// A syntax with diagnostics isn't added; its diagnostics are kept here.
    pub fn add_with_start(&mut self, syntax: Syntax, start: &str) -> Option<GrammarId> {
        let (grammar, diagnostics) = syntax.into_parts();
        if !diagnostics.is_empty() {
            self.diagnostics.extend(diagnostics);
            return None;
        }
        self.grammars.add(grammar, start, &mut self.diagnostics)
    }

    /// Add `syntax` bound to `start`, failing with the diagnostics this call
    /// produced. They are also kept in [`Generator::diagnostics`].
    pub fn try_add_with_start(&mut self, syntax: Syntax, start: &str) -> Result<GrammarId> {
        let before = self.diagnostics.len();
        self.add_with_start(syntax, start)
            .ok_or_else(|| GrammarError::from_diagnostics(&self.diagnostics[before..]))
    }

    /// Parse `src` and add it bound to the configured start symbol
    pub fn add_text(&mut self, src: &str) -> Option<GrammarId> {
        self.add(Syntax::parse(src))
    }

    /// Remove a syntax. Returns false if `id` isn't held
    pub fn remove(&mut self, id: GrammarId) -> bool {
        self.grammars.remove(id)
    }

    /// Generate a phrase, or `"nil"` if nothing has been added
    pub fn generate(&mut self) -> String {
        self.generate_with_context(&ExternalContext::new())
    }

    /// Generate a phrase, resolving undefined nonterminals from `context`
    pub fn generate_with_context(&mut self, context: &ExternalContext) -> String {
        self.grammars.generate(context, self.random.as_mut())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    /// Drop every syntax and diagnostic
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.grammars.clear();
    }

    pub fn equalize_chance(&mut self, enable: bool) {
        self.grammars.equalize_chance(enable);
    }

    /// Number of syntaxes held
    pub fn syntax_count(&self) -> usize {
        self.grammars.len()
    }

    pub fn weight(&self) -> f64 {
        self.grammars.weight()
    }

    /// Distinct phrases over all syntaxes, saturating at `u64::MAX`
    pub fn combination_count(&self) -> u64 {
        self.grammars.combination_count()
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    /// Replace the random source
    pub fn set_random(&mut self, random: Box<dyn RandomSource>) {
        self.random = random;
    }
}
