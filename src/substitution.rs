use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::utils::{GrammarError, Result};

/// A post-processing step applied to the text produced by a production rule
pub trait TextTransform: Send + Sync + fmt::Debug {
    /// Transform generated text
    fn apply(&self, text: &str) -> String;

    /// Get the name of this transform
    fn name(&self) -> &str;

    /// Clone this transform as a box
    fn clone_box(&self) -> Box<dyn TextTransform>;
}

impl Clone for Box<dyn TextTransform> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Builds the transform for one `~ /pattern/replacement/[g]` directive.
///
/// A failure is reported by the parser as a diagnostic at the directive.
pub trait SubstitutionCompiler {
    fn compile(
        &self,
        pattern: &str,
        replacement: &str,
        global: bool,
    ) -> Result<Box<dyn TextTransform>>;
}

impl<F> SubstitutionCompiler for F
where
    F: Fn(&str, &str, bool) -> Result<Box<dyn TextTransform>>,
{
    fn compile(
        &self,
        pattern: &str,
        replacement: &str,
        global: bool,
    ) -> Result<Box<dyn TextTransform>> {
        self(pattern, replacement, global)
    }
}

/// The substitutions of a production rule, applied in declaration order
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    transforms: Vec<Box<dyn TextTransform>>,
}

impl Substitutions {
    pub fn new() -> Self {
        Substitutions {
            transforms: Vec::new(),
        }
    }

    /// Append a transform to the chain
    pub fn push(&mut self, transform: Box<dyn TextTransform>) {
        self.transforms.push(transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run every transform over `text`
    pub fn apply(&self, text: String) -> String {
        self.transforms
            .iter()
            .fold(text, |acc, transform| transform.apply(&acc))
    }
}

/// Regex find/replace, replacing the first match or every match
#[derive(Debug, Clone)]
pub struct RegexSubstitution {
    regex: Regex,
    replacement: String,
    global: bool,
}

impl RegexSubstitution {
    /// Compile `pattern`. The replacement may refer to captures as `$1` or `${name}`.
    pub fn new(pattern: &str, replacement: &str, global: bool) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| GrammarError::Substitution(e.to_string()))?;
        Ok(RegexSubstitution {
            regex,
            replacement: replacement.to_string(),
            global,
        })
    }
}

impl TextTransform for RegexSubstitution {
    fn apply(&self, text: &str) -> String {
        if self.global {
            self.regex
                .replace_all(text, self.replacement.as_str())
                .into_owned()
        } else {
            self.regex
                .replace(text, self.replacement.as_str())
                .into_owned()
        }
    }

    fn name(&self) -> &str {
        self.regex.as_str()
    }

    fn clone_box(&self) -> Box<dyn TextTransform> {
        Box::new(self.clone())
    }
}

/// The default compiler, producing [`RegexSubstitution`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCompiler;

impl SubstitutionCompiler for RegexCompiler {
    fn compile(
        &self,
        pattern: &str,
        replacement: &str,
        global: bool,
    ) -> Result<Box<dyn TextTransform>> {
        Ok(Box::new(RegexSubstitution::new(pattern, replacement, global)?))
    }
}

/// A transform backed by a closure, for custom substitution engines
#[derive(Clone)]
pub struct FnTransform {
    name: String,
    func: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl FnTransform {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        FnTransform {
            name: name.to_string(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for FnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform")
            .field("name", &self.name)
            .finish()
    }
}

impl TextTransform for FnTransform {
    fn apply(&self, text: &str) -> String {
        (self.func)(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clone_box(&self) -> Box<dyn TextTransform> {
        Box::new(self.clone())
    }
}
