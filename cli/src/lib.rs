//! Command-line interface for ragline.
//!
//! Three subcommands: `search` ranks corpus snippets for a query without
//! generating, `query` runs the full retrieval-augmented answer flow, and
//! `completion` emits shell completion scripts. A corpus file is plain
//! text, one snippet per line; blank lines are skipped.

mod error;

pub use error::CliError;
pub use error::Result;

use std::io;
use std::path::Path;
use std::path::PathBuf;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use ragline_core::config::RaglineConfig;
use ragline_core::corpus::SnippetCorpus;
use ragline_core::embedding::provider_from_config;
use ragline_core::generation::generator_from_config;
use ragline_core::pipeline::RagPipeline;
use ragline_core::retrieval::Retriever;
use tracing::info;

/// Retrieval-augmented question answering over a snippet corpus.
#[derive(Debug, Parser)]
#[command(name = "ragline", version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to ~/.ragline/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank the nearest snippets for a query without generating
    Search(SearchArgs),
    /// Answer a question grounded in the nearest snippet
    Query(QueryArgs),
    /// Generate shell completion scripts
    Completion(CompletionArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Corpus file, one snippet per line
    #[arg(long, value_name = "FILE")]
    pub corpus: PathBuf,

    /// Number of snippets to return (defaults to the configured top_k)
    #[arg(short = 'k', long = "top-k", value_name = "N")]
    pub top_k: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// The query text
    pub query: String,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Corpus file, one snippet per line
    #[arg(long, value_name = "FILE")]
    pub corpus: PathBuf,

    /// Show the retrieved snippet alongside the answer
    #[arg(long)]
    pub show_context: bool,

    /// The question to answer
    pub question: String,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Read a corpus file: one snippet per line, blank lines skipped.
pub fn load_corpus(path: &Path) -> Result<SnippetCorpus> {
    let raw = std::fs::read_to_string(path)?;
    let snippets: Vec<String> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if snippets.is_empty() {
        return Err(CliError::EmptyCorpus(path.to_path_buf()));
    }
    Ok(SnippetCorpus::new(snippets))
}

pub async fn run_search(config: &RaglineConfig, args: &SearchArgs) -> Result<()> {
    let corpus = load_corpus(&args.corpus)?;
    let embedder = provider_from_config(&config.embedding)?;
    info!("embedding {} snippets with {}", corpus.len(), embedder.model_id());

    let retriever = Retriever::build(embedder, corpus).await?;
    let k = args.top_k.unwrap_or(config.retrieval.top_k);
    let hits = retriever.retrieve_k(&args.query, k).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        for hit in &hits {
            println!("{:>10.4}  [{}] {}", hit.distance, hit.position, hit.text);
        }
    }
    Ok(())
}

pub async fn run_query(config: &RaglineConfig, args: &QueryArgs) -> Result<()> {
    let corpus = load_corpus(&args.corpus)?;
    let embedder = provider_from_config(&config.embedding)?;
    let generator = generator_from_config(&config.generation)?;

    let pipeline = RagPipeline::build(embedder, generator, corpus).await?;
    let answer = pipeline.answer(&args.question).await?;

    if args.show_context {
        println!("[context {}] {}", answer.context.position, answer.context.text);
        println!();
    }
    println!("{}", answer.text);
    Ok(())
}

pub fn run_completion(args: &CompletionArgs) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(args.shell, &mut command, name, &mut io::stdout());
}
