//! Weighted selection and phrase assembly over a bound grammar.

use crate::grammar::{ExternalContext, Grammar, Options, Part, ProductionRule, Text};
use crate::random::RandomSource;

/// Pick an index from a cumulative weight table.
///
/// Uniform over the entries when `equalized`, otherwise proportional to the
/// weights; the first entry not below the scaled sample wins. No sample is
/// drawn when there is at most one candidate.
pub fn select_index(
    cumulative: &[f64],
    equalized: bool,
    random: &mut dyn RandomSource,
) -> Option<usize> {
    let last = cumulative.len().checked_sub(1)?;
    if last == 0 {
        return Some(0);
    }
    let u = random.next_unit();
    let index = if equalized {
        (u * cumulative.len() as f64) as usize
    } else {
        let target = u * cumulative[last];
        cumulative.partition_point(|&w| w < target)
    };
    Some(index.min(last))
}

/// Walks a bound grammar to build one phrase
pub(crate) struct Sampler<'a> {
    grammar: &'a Grammar,
    context: &'a ExternalContext,
    random: &'a mut dyn RandomSource,
    equalize_all: bool,
}

impl<'a> Sampler<'a> {
    pub(crate) fn new(
        grammar: &'a Grammar,
        context: &'a ExternalContext,
        random: &'a mut dyn RandomSource,
        equalize_all: bool,
    ) -> Self {
        Sampler {
            grammar,
            context,
            random,
            equalize_all,
        }
    }

    pub(crate) fn rule(&mut self, rule: &ProductionRule) -> String {
        let text = self.options(&rule.options);
        rule.substitutions.apply(text)
    }

    fn options(&mut self, options: &Options) -> String {
        let equalized = options.equalized || self.equalize_all;
        match select_index(&options.cumulative, equalized, &mut *self.random) {
            Some(i) => self.text(&options.texts[i]),
            None => String::new(),
        }
    }

    fn text(&mut self, text: &Text) -> String {
        let mut s = String::new();
        for part in &text.parts {
            match part {
                Part::Literal(literal) => s.push_str(literal),
                Part::Anonymous(rule) => s.push_str(&self.rule(rule)),
                Part::Expansion {
                    target: Some(id), ..
                } => {
                    let grammar = self.grammar;
                    s.push_str(&self.rule(grammar.rule_by_id(*id)));
                }
                Part::Expansion { name, target: None } => match self.context.get(name) {
                    Some(value) => s.push_str(value),
                    None => s.push_str(name),
                },
            }
        }
        s
    }
}
