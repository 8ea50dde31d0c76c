use std::collections::HashMap;

use crate::random::RandomSource;
use crate::sampling::Sampler;
use crate::substitution::{Substitutions, TextTransform};
use crate::utils::Diagnostic;

/// Values for nonterminals the grammar doesn't define, supplied per generation
pub type ExternalContext = HashMap<String, String>;

/// What [`Grammar::generate`] returns when the grammar isn't bound
pub const NIL_PHRASE: &str = "nil";

/// Names starting with this character are local to the source they appear in
pub const LOCAL_PREFIX: char = '_';

/// Is `name` a local nonterminal?
pub fn is_local_nonterminal(name: &str) -> bool {
    name.starts_with(LOCAL_PREFIX)
}

/// Stable index of a named rule inside its grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(pub(crate) usize);

/// Where a rule stands in the current binding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum BindState {
    #[default]
    Unbound,
    InProgress,
    Bound(u32),
}

/// One piece of a text
#[derive(Debug, Clone)]
pub enum Part {
    /// Copied verbatim
    Literal(String),
    /// A reference to a nonterminal. `target` is set by binding when the name
    /// is defined in the same grammar; otherwise the external context is used.
    Expansion {
        name: String,
        target: Option<RuleId>,
    },
    /// An inline rule owned by the text
    Anonymous(Box<ProductionRule>),
}

/// One alternative of an options list
#[derive(Debug, Clone)]
pub struct Text {
    /// Pieces concatenated in order
    pub(crate) parts: Vec<Part>,
    /// Product of the expansions' weights, set by binding
    pub(crate) computed_weight: f64,
    /// Explicit weight from the source, replacing `computed_weight`
    pub(crate) weight_override: Option<f64>,
    /// Product of the expansions' combination counts
    pub(crate) combinations: u64,
}

impl Default for Text {
    fn default() -> Self {
        Text {
            parts: Vec::new(),
            computed_weight: 1.0,
            weight_override: None,
            combinations: 1,
        }
    }
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text. Empty strings are dropped.
    pub fn push_literal(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.is_empty() {
            self.parts.push(Part::Literal(s));
        }
    }

    /// Append a reference to the nonterminal `name`
    pub fn push_expansion(&mut self, name: impl Into<String>) {
        self.parts.push(Part::Expansion {
            name: name.into(),
            target: None,
        });
    }

    /// Append an inline rule
    pub fn push_anonymous(&mut self, rule: ProductionRule) {
        self.parts.push(Part::Anonymous(Box::new(rule)));
    }

    /// The pieces of the text
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Fix the weight instead of deriving it from the parts
    pub fn set_weight_override(&mut self, weight: Option<f64>) {
        self.weight_override = weight;
    }

    /// The override if set, otherwise the weight computed by binding
    pub fn weight(&self) -> f64 {
        self.weight_override.unwrap_or(self.computed_weight)
    }

    pub fn combination_count(&self) -> u64 {
        self.combinations
    }
}

/// Weighted alternatives.
///
/// `cumulative[i]` is the sum of the weights of `texts[0..=i]`. Before binding
/// every alternative counts as weight 1.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub(crate) texts: Vec<Text>,
    pub(crate) cumulative: Vec<f64>,
    /// Ignore weights when selecting
    pub(crate) equalized: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alternative, counted as weight 1 until bound
    pub fn push(&mut self, text: Text) {
        let total = self.weight() + 1.0;
        self.texts.push(text);
        self.cumulative.push(total);
    }

    /// Select alternatives uniformly instead of by weight
    pub fn equalize(&mut self, enable: bool) {
        self.equalized = enable;
    }

    pub fn is_equalized(&self) -> bool {
        self.equalized
    }

    pub fn texts(&self) -> &[Text] {
        &self.texts
    }

    /// Sum of the alternatives' weights
    pub fn weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Sum of the alternatives' combination counts, saturating
    pub fn combination_count(&self) -> u64 {
        self.texts
            .iter()
            .fold(0u64, |sum, t| sum.saturating_add(t.combination_count()))
    }
}

/// The right-hand side of an assignment: alternatives plus substitutions
#[derive(Debug, Clone, Default)]
pub struct ProductionRule {
    pub(crate) options: Options,
    /// Applied in order to the selected alternative's output
    pub(crate) substitutions: Substitutions,
    /// Explicit weight, replacing the options' total
    pub(crate) weight_override: Option<f64>,
    pub(crate) state: BindState,
}

impl ProductionRule {
    pub fn new(options: Options, substitutions: Substitutions) -> Self {
        ProductionRule {
            options,
            substitutions,
            weight_override: None,
            state: BindState::Unbound,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    /// Append a substitution applied after the previous ones
    pub fn push_substitution(&mut self, transform: Box<dyn TextTransform>) {
        self.substitutions.push(transform);
    }

    /// Fix the weight instead of using the options' total
    pub fn set_weight_override(&mut self, weight: Option<f64>) {
        self.weight_override = weight;
    }

    /// The override if set, otherwise the options' total
    pub fn weight(&self) -> f64 {
        self.weight_override.unwrap_or_else(|| self.options.weight())
    }

    pub fn combination_count(&self) -> u64 {
        self.options.combination_count()
    }

    /// Forget every link made by a previous binding, recursively
    pub(crate) fn reset_binding(&mut self) {
        self.state = BindState::Unbound;
        for text in &mut self.options.texts {
            for part in &mut text.parts {
                match part {
                    Part::Expansion { target, .. } => *target = None,
                    Part::Anonymous(rule) => rule.reset_binding(),
                    Part::Literal(_) => {}
                }
            }
        }
    }
}

/// The compiled assignments of one or more grammar sources.
///
/// Named rules live in an arena indexed by [`RuleId`]; expansions link to
/// rules by index, so cloning a grammar keeps every link valid in the copy.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    /// Named rules, indexed by [`RuleId`]
    pub(crate) rules: Vec<ProductionRule>,
    /// `names[i]` is the name of `rules[i]`
    pub(crate) names: Vec<String>,
    pub(crate) index: HashMap<String, RuleId>,
    /// Rule of the last successful binding
    pub(crate) start: Option<RuleId>,
    /// Binding pass counter, 0 before the first pass
    pub(crate) epoch: u32,
}

impl Grammar {
    /// Create a new empty grammar
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an assignment. A name that is already defined keeps its first rule.
    ///
    /// Local nonterminals are accepted like any other name. Call
    /// [`Grammar::fix_local_nonterminals`] once the source is complete to
    /// inline and drop them; the parser does this for parsed sources.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        mut rule: ProductionRule,
    ) -> std::result::Result<(), Diagnostic> {
        let name = name.into();
        self.start = None;
        if self.index.contains_key(&name) {
            return Err(Diagnostic::Duplicate(name));
        }
        rule.reset_binding();
        self.push_rule(name, rule);
        Ok(())
    }

    /// Move every assignment of `other` into this grammar. A name defined in
    /// both is overwritten by `other`'s rule and reported.
    pub fn merge(&mut self, other: Grammar, diagnostics: &mut Vec<Diagnostic>) {
        self.start = None;
        for (name, mut rule) in other.names.into_iter().zip(other.rules) {
            rule.reset_binding();
            match self.index.get(&name) {
                Some(&id) => {
                    tracing::warn!(nonterminal = %name, "merge overwrites an existing nonterminal");
                    self.rules[id.0] = rule;
                    diagnostics.push(Diagnostic::Duplicate(name));
                }
                None => self.push_rule(name, rule),
            }
        }
    }

    fn push_rule(&mut self, name: String, rule: ProductionRule) {
        let id = RuleId(self.rules.len());
        self.rules.push(rule);
        self.names.push(name.clone());
        self.index.insert(name, id);
    }

    /// Generate a phrase, or [`NIL_PHRASE`] if the grammar isn't bound
    pub fn generate(&self, context: &ExternalContext, random: &mut dyn RandomSource) -> String {
        self.generate_with(context, random, false)
    }

    /// Generate a phrase; `equalize_all` selects every alternative uniformly
    pub fn generate_with(
        &self,
        context: &ExternalContext,
        random: &mut dyn RandomSource,
        equalize_all: bool,
    ) -> String {
        match self.start {
            Some(id) => Sampler::new(self, context, random, equalize_all).rule(&self.rules[id.0]),
            None => NIL_PHRASE.to_string(),
        }
    }

    /// Has the grammar been bound successfully?
    pub fn is_valid(&self) -> bool {
        self.start.is_some()
    }

    /// Weight of the start rule, 0 if unbound
    pub fn weight(&self) -> f64 {
        self.start_rule().map_or(0.0, ProductionRule::weight)
    }

    /// Number of distinct phrases, 0 if unbound
    pub fn combination_count(&self) -> u64 {
        self.start_rule().map_or(0, ProductionRule::combination_count)
    }

    /// Name of the nonterminal the grammar is bound to
    pub fn start_symbol(&self) -> Option<&str> {
        self.start.map(|id| self.names[id.0].as_str())
    }

    fn start_rule(&self) -> Option<&ProductionRule> {
        self.start.map(|id| &self.rules[id.0])
    }

    /// Is `name` assigned in this grammar?
    pub fn has_nonterminal(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The rule assigned to `name`
    pub fn rule(&self, name: &str) -> Option<&ProductionRule> {
        self.index.get(name).map(|id| &self.rules[id.0])
    }

    pub(crate) fn rule_by_id(&self, id: RuleId) -> &ProductionRule {
        &self.rules[id.0]
    }

    /// Names of every assignment, in definition order
    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of assignments
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Drop every assignment and the binding
    pub fn clear(&mut self) {
        *self = Grammar::default();
    }
}
