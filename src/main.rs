use clap::Parser;
use phrase_gen::{ExternalContext, Generator, GeneratorConfig, GrammarError, Syntax};
use std::path::PathBuf;
use std::process;

/// Weighted random phrase generator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grammar files, merged in order
    #[arg(required = true)]
    grammar_files: Vec<PathBuf>,

    /// The nonterminal to start from
    #[arg(short, long)]
    start: Option<String>,

    /// Number of phrases to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Select every alternative with equal chance
    #[arg(short, long)]
    equalize: bool,

    /// External context entry, used for undefined nonterminals
    #[arg(short, long = "context", value_name = "KEY=VALUE", value_parser = parse_context_entry)]
    context: Vec<(String, String)>,

    /// JSON generator configuration; command line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the syntax count, weight and combination count instead of phrases
    #[arg(long)]
    stats: bool,
}

fn parse_context_entry(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got \"{}\"", s)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> phrase_gen::Result<()> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(start) = cli.start {
        config.start_symbol = start;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.equalize |= cli.equalize;

    let mut syntax = Syntax::default();
    for path in &cli.grammar_files {
        tracing::debug!(path = %path.display(), "loading grammar");
        syntax.merge(Syntax::from_file(path)?);
    }
    if syntax.has_errors() {
        return Err(GrammarError::from_diagnostics(syntax.diagnostics()));
    }

    let start = config.start_symbol.clone();
    let mut generator = Generator::with_config(config);
    generator.try_add_with_start(syntax, &start)?;

    if cli.stats {
        println!("syntaxes: {}", generator.syntax_count());
        println!("weight: {}", generator.weight());
        println!("combinations: {}", generator.combination_count());
        return Ok(());
    }

    let context: ExternalContext = cli.context.into_iter().collect();
    for _ in 0..cli.count {
        println!("{}", generator.generate_with_context(&context));
    }

    Ok(())
}
