//! # docq
//!
//! Retrieval-augmented question answering over a local vector index.
//!
//! docq embeds your question, pulls the closest chunks out of a persisted
//! LanceDB index, and hands them to a hosted chat model to answer from,
//! with the sources cited.
//!
//! ## Usage
//!
//! ```bash
//! # Ask a question against the index in ./chroma
//! docq "What is the capital of France?"
//!
//! # Use a different index and skip the model call
//! docq "deployment checklist" --index ./docs-index --no-llm
//! ```

use clap::Parser;
use docq::commands::{self, ask::AskArgs};
use docq::exit_codes::EXIT_ERROR;

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let mut log_builder = env_logger::Builder::from_default_env();
    if verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
}

/// Main CLI structure
#[derive(Parser)]
#[command(name = "docq")]
#[command(about = "Retrieval-augmented answers from your document index", long_about = None)]
#[command(version)]
struct Cli {
    /// The query text
    #[arg(value_name = "QUERY")]
    query: String,
    /// Index directory (defaults to the configured path, then `chroma`)
    #[arg(long, value_name = "PATH")]
    index: Option<String>,
    /// Number of chunks to retrieve
    #[arg(long, short = 'k', value_name = "COUNT")]
    top_k: Option<usize>,
    /// Minimum relevance score of the best match (0.0-1.0)
    #[arg(long, value_name = "SCORE")]
    threshold: Option<f32>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
    /// Skip the model call and show retrieved context only
    #[arg(long)]
    no_llm: bool,
    /// Enable verbose output
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let args = AskArgs {
        query: cli.query,
        index_path: cli.index,
        top_k: cli.top_k,
        threshold: cli.threshold,
        json: cli.json,
        no_llm: cli.no_llm,
        verbose: cli.verbose,
    };

    let exit_code = match commands::ask::execute(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Query error: {}", e);
            EXIT_ERROR
        }
    };
    std::process::exit(exit_code);
}
