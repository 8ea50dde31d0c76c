use phrase_gen::random::sequence_random;
use phrase_gen::{
    Diagnostic, ExternalContext, FnTransform, Generator, GeneratorConfig, GrammarError, Syntax,
    TextTransform,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;

fn first_choice_generator(src: &str) -> Generator {
    let mut generator = Generator::with_random(Box::new(|| 0.0));
    let id = generator.add_text(src);
    assert!(id.is_some(), "{:?}", generator.diagnostics());
    generator
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        {{* A greeting grammar }}
        main = {{greeting}}, {{subject}}.
        greeting = Hello | Hi
        subject = world | "Rust programmers"
        "#
    )
    .unwrap();

    let syntax = Syntax::from_file(file.path()).unwrap();
    assert!(syntax.diagnostics().is_empty(), "{:?}", syntax.diagnostics());

    let mut generator = Generator::from_syntax(syntax);
    assert_eq!(generator.combination_count(), 4);
    let expected: HashSet<&str> = [
        "Hello, world.",
        "Hello, Rust programmers.",
        "Hi, world.",
        "Hi, Rust programmers.",
    ]
    .into_iter()
    .collect();
    for _ in 0..50 {
        let phrase = generator.generate();
        assert!(expected.contains(phrase.as_str()), "{}", phrase);
    }
}

#[test]
fn test_missing_file() {
    let result = Syntax::from_file("/nonexistent/grammar.txt");
    assert!(matches!(result, Err(GrammarError::Io(_))));
}

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"start_symbol": "sentence", "equalize": true, "seed": 3}}"#).unwrap();

    let config = GeneratorConfig::from_file(file.path()).unwrap();
    let mut generator = Generator::with_config(config);
    assert!(generator.add_text("sentence = a | \"b\" 99\n").is_some());
    generator.set_random(Box::new(|| 0.4));
    assert_eq!(generator.generate(), "a");
}

#[test]
fn test_literal_escapes() {
    let mut generator = first_choice_generator(r#"main = "A{(}B{"}C{|}D{~}E{)}F{{}G{*x}H""#);
    assert_eq!(generator.generate(), "A{B\"C|D~E}F{GH");
}

#[test]
fn test_local_priority_over_context() {
    let mut generator = first_choice_generator("main = {A} {B} {C}\nA = head\nC = tail\n");
    let context: ExternalContext = [("B", "body"), ("C", "foot")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(generator.generate_with_context(&context), "head body tail");
}

#[test]
fn test_local_nonterminals_are_private_to_their_source() {
    let mut syntax = Syntax::parse("main = {_sub}-{shared}\n_sub = one\nshared = s1\n");
    assert!(!syntax.add_text("other = {_sub}\n_sub = two\nshared = s2\n"));
    assert_eq!(
        syntax.diagnostics(),
        &[Diagnostic::Duplicate("shared".to_string())]
    );
    assert!(!syntax.grammar().has_nonterminal("_sub"));
    syntax.clear_diagnostics();

    let mut generator = Generator::with_random(Box::new(|| 0.0));
    assert!(generator.add(syntax.clone()).is_some());
    assert_eq!(generator.generate(), "one-s2");

    assert!(generator.add_with_start(syntax, "other").is_some());
    assert_eq!(generator.syntax_count(), 2);
}

#[test]
fn test_custom_substitution_compiler() {
    let compiler = |pattern: &str, _: &str, _: bool| -> phrase_gen::Result<Box<dyn TextTransform>> {
        match pattern {
            "upper" => Ok(Box::new(FnTransform::new("upper", |s| s.to_uppercase()))),
            other => Err(GrammarError::Substitution(format!("unknown transform {}", other))),
        }
    };

    let syntax = Syntax::parse_with("main = shout ~ /upper//\n", &compiler);
    assert!(syntax.diagnostics().is_empty());
    let mut generator = Generator::from_syntax(syntax);
    assert_eq!(generator.generate(), "SHOUT");

    let syntax = Syntax::parse_with("main = shout ~ /lower//\n", &compiler);
    assert_eq!(syntax.diagnostics().len(), 1);
    assert_eq!(
        syntax.diagnostics()[0].to_string(),
        "line 1, column 24: Substitution error: unknown transform lower"
    );
}

#[test]
fn test_add_text_with_custom_compiler() {
    let compiler = |pattern: &str, _: &str, _: bool| -> phrase_gen::Result<Box<dyn TextTransform>> {
        Ok(Box::new(FnTransform::new(pattern, |s| s.chars().rev().collect())))
    };

    let mut syntax = Syntax::parse("main = {word}\n");
    assert!(syntax.add_text_with("word = abc ~ /reverse//\n", &compiler));
    assert!(!syntax.add_text_with("word = xyz ~ /reverse//\n", &compiler));
    assert_eq!(
        syntax.diagnostics(),
        &[Diagnostic::Duplicate("word".to_string())]
    );
    assert_eq!(
        syntax.grammar().rule("word").unwrap().substitutions().len(),
        1
    );
    syntax.clear_diagnostics();

    let mut generator = Generator::from_syntax(syntax);
    assert_eq!(generator.generate(), "zyx");
}

#[test]
#[should_panic(expected = "transform failed")]
fn test_panicking_transform_propagates() {
    let compiler = |_: &str, _: &str, _: bool| -> phrase_gen::Result<Box<dyn TextTransform>> {
        Ok(Box::new(FnTransform::new("boom", |_: &str| -> String {
            panic!("transform failed")
        })))
    };

    let syntax = Syntax::parse_with("main = a | b ~ /x//\n", &compiler);
    assert!(syntax.diagnostics().is_empty());
    let mut generator = Generator::from_syntax(syntax);
    generator.generate();
}

#[test]
fn test_recursive_grammar_is_rejected() {
    let mut generator = Generator::new();
    assert_eq!(generator.add_text("main={A}\nA={B}\nB={C}\nC={B}\n"), None);
    assert_eq!(
        generator.diagnostics(),
        &[Diagnostic::RecursiveExpansion("B".to_string())]
    );
    assert_eq!(generator.generate(), "nil");
}

#[test]
fn test_parse_errors_do_not_hide_later_assignments() {
    let syntax = Syntax::parse("main = {A} | {B}\nA : a\nB = b\nC = }\nD = d\n");
    let messages: Vec<String> = syntax.diagnostics().iter().map(|d| d.to_string()).collect();
    assert_eq!(messages.len(), 2, "{:?}", messages);
    assert!(messages[0].contains("\"=\" is expected."));
    assert!(messages[1].contains("A text is expected."));
    assert!(syntax.grammar().has_nonterminal("main"));
    assert!(syntax.grammar().has_nonterminal("D"));
}

#[test]
fn test_aggregated_generators() {
    let mut generator = Generator::with_random(Box::new(sequence_random(vec![0.9])));
    let id1 = generator.add_text("main = \"1\" 2 | 2 | 3").unwrap();
    let id2 = generator.add_text("main = A | \"B\" 3 | C").unwrap();
    let id3 = generator.add_text("main = あ | い | \"う\" 4").unwrap();
    assert!(id1 < id2 && id2 < id3);
    assert_eq!(generator.syntax_count(), 3);
    assert_eq!(generator.combination_count(), 9);
    assert_eq!(generator.weight(), 15.0);
    assert_eq!(generator.generate(), "う");

    assert!(generator.remove(id2));
    assert!(!generator.remove(id2));
    assert_eq!(generator.weight(), 10.0);
}

#[test]
fn test_equalized_aggregate() {
    let mut generator = Generator::new();
    generator.add_text("main = {A} | {B}\nA = a1 | a2 | a3 | a4\nB = b\n");
    generator.equalize_chance(true);
    generator.set_random(Box::new(sequence_random(vec![0.6, 0.0])));
    assert_eq!(generator.generate(), "b");
}
