//! Resolves expansions, detects recursion, and computes weights and
//! combination counts.

use std::collections::HashMap;

use crate::grammar::{
    BindState, Grammar, Options, Part, ProductionRule, RuleId, Text, is_local_nonterminal,
};
use crate::utils::Diagnostic;

impl Grammar {
    /// Bind the grammar to `start`.
    ///
    /// Only the rules reachable from `start` are visited. On failure the
    /// grammar keeps its content but stays invalid. Binding again is allowed.
    pub fn bind(&mut self, start: &str, diagnostics: &mut Vec<Diagnostic>) -> bool {
        let Some(&start_id) = self.index.get(start) else {
            self.start = None;
            diagnostics.push(Diagnostic::MissingStart(start.to_string()));
            return false;
        };

        self.next_epoch();
        let before = diagnostics.len();
        let mut binder = Binder {
            rules: &mut self.rules,
            index: &self.index,
            epoch: self.epoch,
            diagnostics,
        };
        binder.bind_named(start_id);
        let bound = binder.diagnostics.len() == before;

        self.start = bound.then_some(start_id);
        if bound {
            tracing::debug!(
                start,
                weight = self.weight(),
                combinations = self.combination_count(),
                "grammar bound"
            );
        }
        bound
    }

    fn next_epoch(&mut self) {
        if self.epoch == u32::MAX {
            for rule in &mut self.rules {
                rule.state = BindState::Unbound;
            }
            self.epoch = 0;
        }
        self.epoch += 1;
    }

    /// Inline every reference to a local nonterminal as an anonymous rule,
    /// then drop the local assignments.
    ///
    /// Parsed sources are already fixed. Grammars assembled with
    /// [`Grammar::insert`] need this call before they are merged or bound;
    /// a local name left in place would leak into the merged grammar.
    /// Missing and recursive locals are reported in `diagnostics`.
    pub fn fix_local_nonterminals(&mut self, diagnostics: &mut Vec<Diagnostic>) {
        let grammar: &Grammar = self;
        let mut fixer = LocalFixer {
            grammar,
            resolved: HashMap::new(),
            stack: Vec::new(),
            diagnostics,
        };
        let mut fixed = Vec::new();
        for (i, name) in grammar.names.iter().enumerate() {
            if is_local_nonterminal(name) {
                continue;
            }
            let mut rule = grammar.rules[i].clone();
            if fixer.inline_rule(&mut rule) {
                fixed.push((i, rule));
            }
        }
        for (i, rule) in fixed {
            self.rules[i] = rule;
        }

        let rules = std::mem::take(&mut self.rules);
        let names = std::mem::take(&mut self.names);
        self.index.clear();
        self.start = None;
        for (name, rule) in names.into_iter().zip(rules) {
            if !is_local_nonterminal(&name) {
                let id = RuleId(self.rules.len());
                self.rules.push(rule);
                self.index.insert(name.clone(), id);
                self.names.push(name);
            }
        }
    }
}

struct Binder<'a> {
    rules: &'a mut [ProductionRule],
    index: &'a HashMap<String, RuleId>,
    epoch: u32,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl Binder<'_> {
    /// Returns false only when the rule is already being bound (recursion).
    fn bind_named(&mut self, id: RuleId) -> bool {
        match self.rules[id.0].state {
            BindState::InProgress => return false,
            BindState::Bound(epoch) if epoch == self.epoch => return true,
            _ => {}
        }

        self.rules[id.0].state = BindState::InProgress;
        let mut options = std::mem::take(&mut self.rules[id.0].options);
        self.bind_options(&mut options);
        let rule = &mut self.rules[id.0];
        rule.options = options;
        rule.state = BindState::Bound(self.epoch);
        true
    }

    fn bind_options(&mut self, options: &mut Options) {
        let mut sum = 0.0;
        options.cumulative.clear();
        for text in &mut options.texts {
            self.bind_text(text);
            sum += text.weight();
            options.cumulative.push(sum);
        }
    }

    fn bind_text(&mut self, text: &mut Text) {
        let mut weight = 1.0;
        let mut combinations: u64 = 1;
        for part in &mut text.parts {
            match part {
                Part::Literal(_) => {}
                Part::Anonymous(rule) => {
                    self.bind_options(&mut rule.options);
                    weight *= rule.weight();
                    combinations = combinations.saturating_mul(rule.combination_count());
                }
                Part::Expansion { name, target } => {
                    *target = None;
                    let Some(&id) = self.index.get(name.as_str()) else {
                        continue;
                    };
                    if self.bind_named(id) {
                        *target = Some(id);
                        let rule = &self.rules[id.0];
                        weight *= rule.weight();
                        combinations = combinations.saturating_mul(rule.combination_count());
                    } else {
                        self.diagnostics
                            .push(Diagnostic::RecursiveExpansion(name.clone()));
                    }
                }
            }
        }
        text.computed_weight = weight;
        text.combinations = combinations;
    }
}

enum LocalError {
    Missing,
    Recursive,
}

struct LocalFixer<'a> {
    grammar: &'a Grammar,
    resolved: HashMap<String, ProductionRule>,
    stack: Vec<String>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl LocalFixer<'_> {
    /// Returns whether anything in `rule` was replaced.
    fn inline_rule(&mut self, rule: &mut ProductionRule) -> bool {
        let mut changed = false;
        for text in &mut rule.options.texts {
            for part in &mut text.parts {
                let local = match part {
                    Part::Expansion { name, .. } if is_local_nonterminal(name.as_str()) => {
                        match self.resolve(name) {
                            Ok(local) => Some(local),
                            Err(LocalError::Missing) => {
                                self.diagnostics.push(Diagnostic::MissingLocal(name.clone()));
                                None
                            }
                            Err(LocalError::Recursive) => {
                                self.diagnostics
                                    .push(Diagnostic::RecursiveExpansion(name.clone()));
                                None
                            }
                        }
                    }
                    Part::Anonymous(inner) => {
                        changed |= self.inline_rule(inner);
                        None
                    }
                    _ => None,
                };
                if let Some(local) = local {
                    *part = Part::Anonymous(Box::new(local));
                    changed = true;
                }
            }
        }
        changed
    }

    /// A copy of the local rule `name` with its own local references inlined
    fn resolve(&mut self, name: &str) -> std::result::Result<ProductionRule, LocalError> {
        if let Some(rule) = self.resolved.get(name) {
            return Ok(rule.clone());
        }
        if self.stack.iter().any(|n| n == name) {
            return Err(LocalError::Recursive);
        }
        let grammar = self.grammar;
        let mut rule = grammar.rule(name).ok_or(LocalError::Missing)?.clone();
        self.stack.push(name.to_string());
        self.inline_rule(&mut rule);
        self.stack.pop();
        self.resolved.insert(name.to_string(), rule.clone());
        Ok(rule)
    }
}
