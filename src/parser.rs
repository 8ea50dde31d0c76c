//! Recursive-descent parser for the phrase grammar language.
//!
//! ```text
//! start           = space_nl_opt, { assignment, space_nl_opt }, EOF ;
//! assignment      = nonterminal, space_opt, [ weight, space_opt ], ( "=" | ":=" ),
//!                   space_one_nl_opt, production_rule, ( "\n" | EOF ) ;
//! nonterminal     = { [A-Za-z0-9_.] }+ ;
//! weight          = ( digits, [ "." ] | ".", digit ), [ digits ] ;
//! production_rule = options, { "~", space_one_nl_opt, sep, pattern, sep, [ replacement ], sep, [ "g" ], space_opt } ;
//! options         = text, space_opt, { "|", space_one_nl_opt, text, space_opt } ;
//! text            = quoted, space_opt, [ weight ] | bare ;
//! expansion       = "{", ( "(" | ")" | "=" rule | ":=" rule | "*" comment | name ), "}" ;
//! ```
//!
//! A parse error is recorded as a diagnostic and parsing resumes at the next
//! line that doesn't continue the failed assignment.

use crate::char_feeder::CharFeeder;
use crate::grammar::{Grammar, Options, ProductionRule, Text};
use crate::substitution::{SubstitutionCompiler, Substitutions, TextTransform};
use crate::utils::Diagnostic;

/// Parse `src` into a grammar, collecting diagnostics.
///
/// Local nonterminals are inlined and removed before the grammar is returned.
pub fn parse(src: &str, compiler: &dyn SubstitutionCompiler) -> (Grammar, Vec<Diagnostic>) {
    Parser::new(src.chars(), compiler).parse()
}

#[derive(Debug)]
struct ParseError {
    line: usize,
    column: usize,
    message: String,
}

impl From<ParseError> for Diagnostic {
    fn from(e: ParseError) -> Self {
        Diagnostic::Parse {
            line: e.line,
            column: e.column,
            message: e.message,
        }
    }
}

type ParseResult<T> = std::result::Result<T, ParseError>;

fn is_nonterminal_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Parser over any character source
pub struct Parser<'c, I: Iterator<Item = char>> {
    feeder: CharFeeder<I>,
    compiler: &'c dyn SubstitutionCompiler,
}

impl<'c, I: Iterator<Item = char>> Parser<'c, I> {
    pub fn new(source: I, compiler: &'c dyn SubstitutionCompiler) -> Self {
        Parser {
            feeder: CharFeeder::new(source),
            compiler,
        }
    }

    /// Parse every assignment up to the end of the source
    pub fn parse(mut self) -> (Grammar, Vec<Diagnostic>) {
        let mut grammar = Grammar::new();
        let mut diagnostics = Vec::new();
        while !self.feeder.is_end() {
            if let Err(e) = self.parse_assignment(&mut grammar) {
                tracing::debug!(line = e.line, column = e.column, message = %e.message, "parse error");
                diagnostics.push(e.into());
                self.recover();
            }
        }
        grammar.fix_local_nonterminals(&mut diagnostics);
        (grammar, diagnostics)
    }

    /// Skip to the newline ending the failed assignment. A newline right
    /// after `|`, `~` or `=` continues the assignment.
    fn recover(&mut self) {
        let mut continued = false;
        while !self.feeder.is_end() {
            let c = self.feeder.getc();
            if c == '\n' {
                if continued {
                    continued = false;
                } else {
                    break;
                }
            } else if c != ' ' && c != '\t' {
                continued = matches!(c, '|' | '~' | '=');
            }
            self.feeder.advance();
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> ParseResult<T> {
        Err(ParseError {
            line: self.feeder.line(),
            column: self.feeder.column(),
            message: message.into(),
        })
    }

    /// Skip spaces, tabs and `{* comments }`, and newlines if `newlines`
    fn skip_space_with(&mut self, newlines: bool) -> ParseResult<()> {
        while !self.feeder.is_end() {
            let c = self.feeder.getc();
            if c == '{' && self.feeder.nextc() == '*' {
                self.skip_comment()?;
                continue;
            }
            if !(c == ' ' || c == '\t' || (newlines && c == '\n')) {
                break;
            }
            self.feeder.advance();
        }
        Ok(())
    }

    fn skip_space(&mut self) -> ParseResult<()> {
        self.skip_space_with(false)
    }

    fn skip_space_nl(&mut self) -> ParseResult<()> {
        self.skip_space_with(true)
    }

    /// Skip spaces and at most one newline
    fn skip_space_one_nl(&mut self) -> ParseResult<()> {
        self.skip_space()?;
        if self.feeder.getc() == '\n' {
            self.feeder.advance();
            self.skip_space()?;
        }
        Ok(())
    }

    /// Skip a `{* ... }` comment starting at the current `{`
    fn skip_comment(&mut self) -> ParseResult<()> {
        self.feeder.advance();
        self.feeder.advance();
        while !self.feeder.is_end() && self.feeder.getc() != '}' {
            self.feeder.advance();
        }
        if self.feeder.is_end() {
            return self.error("The end of the comment is expected.");
        }
        self.feeder.advance();
        Ok(())
    }

    fn parse_assignment(&mut self, grammar: &mut Grammar) -> ParseResult<()> {
        self.skip_space_nl()?;
        if self.feeder.is_end() {
            return Ok(());
        }
        let nonterminal = self.parse_nonterminal()?;
        self.skip_space()?;
        let weight = self.parse_weight()?;
        self.skip_space()?;
        let equalized = self.parse_operator()?;
        self.skip_space_one_nl()?;
        let mut rule = self.parse_production_rule(None)?;
        rule.set_weight_override(weight);
        if !self.feeder.is_end() && self.feeder.getc() != '\n' {
            return self.error("The end of the text or \"\\n\" is expected.");
        }
        if equalized {
            rule.options_mut().equalize(true);
        }
        if let Err(duplicate) = grammar.insert(nonterminal, rule) {
            return self.error(duplicate.to_string());
        }
        Ok(())
    }

    fn parse_nonterminal(&mut self) -> ParseResult<String> {
        let mut name = String::new();
        while !self.feeder.is_end() && is_nonterminal_char(self.feeder.getc()) {
            name.push(self.feeder.getc());
            self.feeder.advance();
        }
        if name.is_empty() {
            return self.error("A nonterminal \"[A-Za-z0-9_.]+\" is expected.");
        }
        Ok(name)
    }

    /// An optional decimal weight such as `2`, `2.`, `2.5` or `.5`
    fn parse_weight(&mut self) -> ParseResult<Option<f64>> {
        let mut s = String::new();
        let c = self.feeder.getc();
        if c == '.' {
            self.feeder.advance();
            if !self.feeder.getc().is_ascii_digit() {
                return self.error("A number is expected. (\".\" is not a number.)");
            }
            s.push('.');
        } else if c.is_ascii_digit() {
            while self.feeder.getc().is_ascii_digit() {
                s.push(self.feeder.getc());
                self.feeder.advance();
            }
            if self.feeder.getc() == '.' {
                s.push('.');
                self.feeder.advance();
            }
        } else {
            return Ok(None);
        }
        while self.feeder.getc().is_ascii_digit() {
            s.push(self.feeder.getc());
            self.feeder.advance();
        }
        match s.parse::<f64>() {
            Ok(weight) => Ok(Some(weight)),
            Err(_) => self.error(format!("The weight \"{}\" is not a number.", s)),
        }
    }

    /// `=` or `:=`; returns whether the alternatives are equalized
    fn parse_operator(&mut self) -> ParseResult<bool> {
        match self.feeder.getc() {
            '=' => {
                self.feeder.advance();
                Ok(false)
            }
            ':' => {
                self.feeder.advance();
                if self.feeder.getc() != '=' {
                    return self.error("\"=\" is expected.");
                }
                self.feeder.advance();
                Ok(true)
            }
            _ => self.error("\"=\" or \":=\" is expected."),
        }
    }

    /// Options followed by substitutions, then `terminator` if one is given
    fn parse_production_rule(&mut self, terminator: Option<char>) -> ParseResult<ProductionRule> {
        let options = self.parse_options()?;
        let substitutions = self.parse_substitutions()?;
        if let Some(t) = terminator {
            self.skip_space_nl()?;
            if self.feeder.is_end() || self.feeder.getc() != t {
                return self.error(format!("\"{}\" is expected.", t));
            }
            self.feeder.advance();
        }
        Ok(ProductionRule::new(options, substitutions))
    }

    fn parse_options(&mut self) -> ParseResult<Options> {
        let mut options = Options::new();
        options.push(self.parse_text()?);
        self.skip_space()?;
        while self.feeder.getc() == '|' {
            self.feeder.advance();
            self.skip_space_one_nl()?;
            options.push(self.parse_text()?);
            self.skip_space()?;
        }
        Ok(options)
    }

    fn parse_text(&mut self) -> ParseResult<Text> {
        if self.feeder.is_end() {
            return self.error("A text is expected.");
        }
        match self.feeder.getc() {
            ' ' | '\t' | '\n' | '|' | '~' | '}' => self.error("A text is expected."),
            '"' | '\'' | '`' => self.parse_quoted_text(),
            _ => self.parse_bare_text(),
        }
    }

    fn parse_quoted_text(&mut self) -> ParseResult<Text> {
        let mut text = Text::new();
        let mut s = String::new();
        let quote = self.feeder.getc();
        self.feeder.advance();
        while !self.feeder.is_end() && self.feeder.getc() != quote {
            if self.feeder.getc() == '{' {
                self.parse_expansion(&mut text, &mut s)?;
            } else {
                s.push(self.feeder.getc());
                self.feeder.advance();
            }
        }
        if self.feeder.is_end() {
            return self.error(format!("The end of the {0}quoted text{0} is expected.", quote));
        }
        text.push_literal(s);
        self.feeder.advance();
        self.skip_space()?;
        text.set_weight_override(self.parse_weight()?);
        Ok(text)
    }

    /// Unquoted text up to a newline, `|`, `~`, `}` or the end. Trailing
    /// spaces are dropped; a comment doesn't end the trailing run.
    fn parse_bare_text(&mut self) -> ParseResult<Text> {
        let mut text = Text::new();
        let mut s = String::new();
        let mut spaces = String::new();
        loop {
            let c = self.feeder.getc();
            if self.feeder.is_end() || matches!(c, '\n' | '|' | '~' | '}') {
                break;
            }
            match c {
                ' ' | '\t' => {
                    spaces.push(c);
                    self.feeder.advance();
                }
                '{' if self.feeder.nextc() == '*' => self.skip_comment()?,
                '{' => {
                    s.push_str(&spaces);
                    spaces.clear();
                    self.parse_expansion(&mut text, &mut s)?;
                }
                _ => {
                    s.push_str(&spaces);
                    spaces.clear();
                    s.push(c);
                    self.feeder.advance();
                }
            }
        }
        text.push_literal(s);
        Ok(text)
    }

    /// Parse a `{...}` at the current `{`. Literal characters go to `s`,
    /// which is flushed into `text` before any non-literal part.
    fn parse_expansion(&mut self, text: &mut Text, s: &mut String) -> ParseResult<()> {
        self.feeder.advance();
        let c = self.feeder.getc();
        if self.feeder.nextc() == '}' && (c == '(' || c == ')') {
            self.feeder.advance();
            self.feeder.advance();
            s.push(if c == '(' { '{' } else { '}' });
            return Ok(());
        }

        if c == '=' || (c == ':' && self.feeder.nextc() == '=') {
            if c == ':' {
                self.feeder.advance();
            }
            self.feeder.advance();
            self.skip_space_nl()?;
            text.push_literal(std::mem::take(s));
            let mut rule = self.parse_production_rule(Some('}'))?;
            if c == ':' {
                rule.options_mut().equalize(true);
            }
            text.push_anonymous(rule);
            return Ok(());
        }

        let is_comment = c == '*';
        let mut is_nonterminal = c != '}' && !is_comment;
        let mut name = String::new();
        while !self.feeder.is_end() {
            let c = self.feeder.getc();
            self.feeder.advance();
            if c == '}' {
                if is_nonterminal {
                    text.push_literal(std::mem::take(s));
                    text.push_expansion(name);
                } else if !is_comment {
                    s.push_str(&name);
                }
                return Ok(());
            }
            is_nonterminal = is_nonterminal && is_nonterminal_char(c);
            if !is_comment {
                name.push(c);
            }
        }
        self.error("The end of the brace expansion is expected.")
    }

    fn parse_substitutions(&mut self) -> ParseResult<Substitutions> {
        let mut substitutions = Substitutions::new();
        while self.feeder.getc() == '~' {
            self.feeder.advance();
            self.skip_space_one_nl()?;
            if self.feeder.is_end() {
                return self.error("Unexpected EOT.");
            }
            let sep = self.feeder.getc();
            if sep == '{' {
                return self.error("\"{\" isn't allowable as a separator.");
            }
            if !sep.is_ascii() {
                return self.error("The separator must be a 7 bit character.");
            }
            if sep.is_ascii_control() {
                return self.error("The separator must be a printable character.");
            }
            self.feeder.advance();

            let pattern = self.parse_pattern(sep, false)?;
            let replacement = self.parse_pattern(sep, true)?;
            let global = self.feeder.getc() == 'g';
            if global {
                self.feeder.advance();
            }
            match self.compiler.compile(&pattern, &replacement, global) {
                Ok(transform) => {
                    tracing::trace!(transform = transform.name(), global, "substitution compiled");
                    substitutions.push(transform);
                }
                Err(e) => return self.error(e.to_string()),
            }
            self.skip_space()?;
        }
        Ok(substitutions)
    }

    /// Characters up to the next `sep`, which is consumed
    fn parse_pattern(&mut self, sep: char, allow_empty: bool) -> ParseResult<String> {
        let mut pattern = String::new();
        while !self.feeder.is_end() && self.feeder.getc() != sep {
            pattern.push(self.feeder.getc());
            self.feeder.advance();
        }
        if !allow_empty && pattern.is_empty() {
            return self.error("A nonempty pattern is expected.");
        }
        if self.feeder.is_end() {
            return self.error("Unexpected EOT.");
        }
        self.feeder.advance();
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{ExternalContext, NIL_PHRASE, Part};
    use crate::substitution::RegexCompiler;
    use pretty_assertions::assert_eq;

    /// Parse, bind to `main` and generate with the first alternative everywhere
    fn first_phrase(src: &str) -> (String, Vec<Diagnostic>) {
        let (mut grammar, mut diagnostics) = parse(src, &RegexCompiler);
        if diagnostics.is_empty() {
            grammar.bind("main", &mut diagnostics);
        }
        let mut random = || 0.0;
        let phrase = if diagnostics.is_empty() {
            grammar.generate(&ExternalContext::new(), &mut random)
        } else {
            NIL_PHRASE.to_string()
        };
        (phrase, diagnostics)
    }

    fn assert_phrase(src: &str, expected: &str) {
        let (phrase, diagnostics) = first_phrase(src);
        assert_eq!(diagnostics, Vec::new());
        assert_eq!(phrase, expected);
    }

    fn single_error(src: &str) -> String {
        let (_, diagnostics) = parse(src, &RegexCompiler);
        assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
        diagnostics[0].to_string()
    }

    #[test]
    fn test_simple_assignments() {
        assert_phrase("main=Hello World.", "Hello World.");
        assert_phrase("main =Hello World.", "Hello World.");
        assert_phrase("main= Hello World.", "Hello World.");
        assert_phrase("main=\nHello World.", "Hello World.");
        assert_phrase("main := Hello World.", "Hello World.");
    }

    #[test]
    fn test_trailing_spaces_and_comments() {
        assert_phrase("main = Hello World.    {* --}\n        {* --- }\n ", "Hello World.");
        assert_phrase("\n   {* --- }\n\n\n   main = Hello World.", "Hello World.");
        assert_phrase("main = Hello{* x } World", "Hello World");
    }

    #[test]
    fn test_assignment_order() {
        assert_phrase("main = {sub}\nsub = A\n", "A");
        assert_phrase("sub = A\nmain = {sub}\n", "A");
    }

    #[test]
    fn test_comments_everywhere() {
        let src = r#"
            {* comment } main 	{* comment } =  	{* comment }
                {* comment } text1 	{* comment } | 	{* comment }
                {* comment } "text2" 	{* comment } ~  	{* comment }
                {* comment } /A/Z/ 	{* comment }
                {* comment }
                {* comment } sub 	{* comment } :=  	{* comment }
                {* comment } 'text3' 	{* comment } | 	{* comment }
                {* comment } `text4` 	{* comment }
        "#;
        assert_phrase(src, "text1");
    }

    #[test]
    fn test_quoted_text_weights() {
        let (grammar, diagnostics) = parse("main = text1 | \"text2\" 2.1\n", &RegexCompiler);
        assert!(diagnostics.is_empty());
        let texts = grammar.rule("main").unwrap().options().texts();
        assert_eq!(texts[1].weight(), 2.1);

        let (grammar, _) = parse("main = a | \"b\" .32 | 'c' 12345678901.\n", &RegexCompiler);
        let texts = grammar.rule("main").unwrap().options().texts();
        assert_eq!(texts[1].weight(), 0.32);
        assert_eq!(texts[2].weight(), 12345678901.0);
    }

    #[test]
    fn test_weight_of_only_a_period() {
        let msg = single_error("main = text1 | \"text2\" .\n");
        assert!(msg.contains("A number is expected. (\".\" is not a number.)"), "{}", msg);
    }

    #[test]
    fn test_bare_text_alternatives() {
        let (grammar, diagnostics) = parse("main = \ttext1 \t|  \n    te|xt2\n", &RegexCompiler);
        assert!(diagnostics.is_empty());
        assert_eq!(grammar.rule("main").unwrap().options().texts().len(), 3);
    }

    #[test]
    fn test_empty_texts() {
        let src = "main = \t'' | \"\" | `` | {} | '' | {*\n comment }\"\" |\n    '{* comment }' |\n``";
        let (mut grammar, mut diagnostics) = parse(src, &RegexCompiler);
        assert_eq!(diagnostics, Vec::new());
        assert!(grammar.bind("main", &mut diagnostics));
        assert_eq!(grammar.combination_count(), 8);
    }

    #[test]
    fn test_non_nonterminal_braces_are_literal() {
        assert_phrase("main = \"  {\"\n{'`|~ \t}  \"", "  \"\n{'`|~ \t  ");
    }

    #[test]
    fn test_nonterminal_names() {
        assert_phrase("main = \"-+{AAA}+=\"\nAAA = ZZZ\n", "-+ZZZ+=");
        assert_phrase("main = \"-+{1}+=\"\n1 = ZZZ\n", "-+ZZZ+=");
        assert_phrase(
            "main = {0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_.}\n\
             0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_. = 9\n",
            "9",
        );
    }

    #[test]
    fn test_brace_escapes() {
        assert_phrase("main = \"-+{(}+={)}|-\"", "-+{+=}|-");
        assert_phrase(
            "main = \"A{(}B{\"}C{|}D{~}E{)}F{{}G{*x}H\"",
            "A{B\"C|D~E}F{GH",
        );
    }

    #[test]
    fn test_comment_expansion() {
        assert_phrase("main = \"-+{*comment}+=\"\ncomment = ZZZ\n", "-++=");
    }

    #[test]
    fn test_anonymous_rules() {
        assert_phrase("main = \"-+{= A | B | C }+=\"", "-+A+=");
        assert_phrase("main = \"-+{:=1|2|3~/1/9/~|2|8|}+=\"", "-+9+=");
        assert_phrase("main = \"-+{=\n   A | B | C\n}+=\"", "-+A+=");

        let (grammar, _) = parse("main = x{:= a | b }y\n", &RegexCompiler);
        let parts = grammar.rule("main").unwrap().options().texts()[0].parts();
        assert_eq!(parts.len(), 3);
        match &parts[1] {
            Part::Anonymous(rule) => assert!(rule.options().is_equalized()),
            other => panic!("Expected anonymous rule, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_expansion_emits_name() {
        assert_phrase("main = \"-+{AAA}+=\"", "-+AAA+=");
    }

    #[test]
    fn test_substitution_directives() {
        let (grammar, diagnostics) =
            parse("main = 1 | 2 | 3~|A|C|g~/B/D/ ~ \"C\"\"", &RegexCompiler);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(grammar.rule("main").unwrap().substitutions().len(), 3);
    }

    #[test]
    fn test_substitution_errors() {
        let msg = single_error("main = 1 | 2 | 3 ~ ~A~B~1");
        assert!(msg.contains("The end of the text or \"\\n\" is expected."), "{}", msg);

        let msg = single_error("main = 1 | 2 | 3 ~ あAあBあ");
        assert!(msg.contains("The separator must be a 7 bit character."), "{}", msg);

        let msg = single_error("main = 1 ~ {a{b{");
        assert!(msg.contains("\"{\" isn't allowable as a separator."), "{}", msg);

        let msg = single_error("main = 1 ~ //b/");
        assert!(msg.contains("A nonempty pattern is expected."), "{}", msg);

        let msg = single_error("main = 1 ~ /a/b");
        assert!(msg.contains("Unexpected EOT."), "{}", msg);

        let msg = single_error("main = 1 ~ /(a/b/");
        assert!(msg.contains("Substitution error"), "{}", msg);
    }

    #[test]
    fn test_error_position() {
        let (_, diagnostics) = parse("main = A\nsub = B |\n\nx = y\n", &RegexCompiler);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::Parse {
                line: 3,
                column: 1,
                message: "A text is expected.".to_string(),
            }]
        );
    }

    #[test]
    fn test_recovery_resumes_at_next_assignment() {
        let (grammar, diagnostics) = parse(
            "main = {A} |\n\nA = A1 | A2\nbad\nB = B1 ~ /x/\n  y/\nC = C1\n",
            &RegexCompiler,
        );
        assert_eq!(diagnostics.len(), 2, "{:?}", diagnostics);
        assert!(grammar.has_nonterminal("A"));
        assert!(grammar.has_nonterminal("C"));
        assert!(!grammar.has_nonterminal("main"));
    }

    #[test]
    fn test_continuation_lines_are_skipped() {
        let (grammar, diagnostics) =
            parse("main 1.x = a |\n  x | y\nnext = z\n", &RegexCompiler);
        assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
        assert!(!grammar.has_nonterminal("main"));
        assert!(grammar.has_nonterminal("next"));
    }

    #[test]
    fn test_operator_errors() {
        let msg = single_error("main : A\n");
        assert!(msg.contains("\"=\" is expected."), "{}", msg);
        let msg = single_error("main A\n");
        assert!(msg.contains("\"=\" or \":=\" is expected."), "{}", msg);
        let msg = single_error("= A\n");
        assert!(msg.contains("A nonterminal"), "{}", msg);
    }

    #[test]
    fn test_nonterminal_weight() {
        let (grammar, _) = parse("main 10 = A | B | C\nsub 10.5= A\n", &RegexCompiler);
        assert_eq!(grammar.rule("main").unwrap().weight(), 10.0);
        assert_eq!(grammar.rule("sub").unwrap().weight(), 10.5);
    }

    #[test]
    fn test_redefined_nonterminal() {
        let (grammar, diagnostics) = parse("main = {A}\nA = 1 | 2 | 3\nA = 4 | 5 | 6\n", &RegexCompiler);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .to_string()
            .contains("The nonterminal \"A\" is already defined."));
        assert_eq!(grammar.rule("A").unwrap().options().texts().len(), 3);
    }

    #[test]
    fn test_unclosed_constructs() {
        let msg = single_error("\n   {*\n");
        assert!(msg.contains("The end of the comment is expected."), "{}", msg);
        let msg = single_error("main = A\n{*\n");
        assert!(msg.contains("The end of the comment is expected."), "{}", msg);
        let msg = single_error("main = \"abc\n");
        assert!(msg.contains("quoted text"), "{}", msg);
        let msg = single_error("main = a{b\n");
        assert!(msg.contains("The end of the brace expansion is expected."), "{}", msg);
        let msg = single_error("main = {= a | b \n");
        assert!(msg.contains("\"}\" is expected."), "{}", msg);
    }
}
