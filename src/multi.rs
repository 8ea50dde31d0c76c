//! Weighted aggregation of independently bound grammars.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::grammar::{ExternalContext, Grammar, NIL_PHRASE};
use crate::random::RandomSource;
use crate::sampling::select_index;
use crate::utils::Diagnostic;

/// Identity of a grammar added to a [`MultiGrammar`].
///
/// Identities are drawn from one process-wide counter, so they increase
/// monotonically and are never reused, even across aggregators or after
/// removal or `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrammarId(NonZeroU64);

/// Next identity to hand out, shared by every aggregator in the process
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl GrammarId {
    fn next() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        GrammarId(NonZeroU64::new(id).unwrap_or(NonZeroU64::MAX))
    }

    /// The numeric value, never 0
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for GrammarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bound grammars chosen between in proportion to their weights
#[derive(Debug, Clone, Default)]
pub struct MultiGrammar {
    /// Bound grammars in insertion order
    grammars: Vec<Grammar>,
    /// `cumulative[i]` is the total weight of `grammars[0..=i]`
    cumulative: Vec<f64>,
    /// Identity of each grammar, ascending
    ids: Vec<GrammarId>,
    /// Select alternatives inside every grammar uniformly
    equalize: bool,
}

impl MultiGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `grammar` to `start` and hold it.
    ///
    /// Returns `None`, with the reasons in `diagnostics`, if binding fails.
    pub fn add(
        &mut self,
        mut grammar: Grammar,
        start: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<GrammarId> {
        if !grammar.bind(start, diagnostics) {
            return None;
        }
        let id = GrammarId::next();

        self.cumulative.push(self.weight() + grammar.weight());
        self.grammars.push(grammar);
        self.ids.push(id);
        tracing::debug!(id = id.get(), start, total_weight = self.weight(), "grammar added");
        Some(id)
    }

    /// Drop the grammar with identity `id`; false if it isn't held.
    pub fn remove(&mut self, id: GrammarId) -> bool {
        let Ok(idx) = self.ids.binary_search(&id) else {
            return false;
        };
        self.ids.remove(idx);
        self.grammars.remove(idx);
        self.cumulative.pop();

        let mut sum = if idx > 0 { self.cumulative[idx - 1] } else { 0.0 };
        for (total, grammar) in self.cumulative[idx..].iter_mut().zip(&self.grammars[idx..]) {
            sum += grammar.weight();
            *total = sum;
        }
        tracing::debug!(id = id.get(), remaining = self.grammars.len(), "grammar removed");
        true
    }

    /// Generate a phrase from one of the grammars, or [`NIL_PHRASE`] if
    /// there are none.
    pub fn generate(&self, context: &ExternalContext, random: &mut dyn RandomSource) -> String {
        match select_index(&self.cumulative, false, random) {
            Some(i) => self.grammars[i].generate_with(context, random, self.equalize),
            None => NIL_PHRASE.to_string(),
        }
    }

    /// Select every alternative of every held grammar uniformly
    pub fn equalize_chance(&mut self, enable: bool) {
        self.equalize = enable;
    }

    pub fn is_equalized(&self) -> bool {
        self.equalize
    }

    /// Number of grammars held
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Identities of the held grammars, ascending
    pub fn ids(&self) -> &[GrammarId] {
        &self.ids
    }

    /// Total weight of the held grammars
    pub fn weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Sum of the held grammars' combination counts, saturating
    pub fn combination_count(&self) -> u64 {
        self.grammars
            .iter()
            .fold(0u64, |sum, g| sum.saturating_add(g.combination_count()))
    }

    /// Drop every grammar and reset equalization
    pub fn clear(&mut self) {
        self.grammars.clear();
        self.cumulative.clear();
        self.ids.clear();
        self.equalize = false;
    }
}
