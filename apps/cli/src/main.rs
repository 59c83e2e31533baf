use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studyforge_core::{
    CancelToken, ClientConfig, DocumentExtractor, FlashcardGenerator, GenerationProgress,
    GenerationRequest, Limits, OpenAiClient,
};

#[derive(Parser)]
#[command(name = "studyforge")]
#[command(about = "Turn documents into flashcards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and normalize the text of a document
    Extract {
        /// Path to a .pdf, .docx, or .txt file
        path: PathBuf,
    },
    /// Generate flashcards from a document or from raw text
    Generate {
        /// Document to read the topic text from
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Topic text given directly
        #[arg(short, long)]
        text: Option<String>,
        /// Deck name used to anchor the cards to a subject
        #[arg(short, long)]
        deck: Option<String>,
        /// Number of cards to request (1 to 50)
        #[arg(short, long, default_value_t = 10)]
        count: u32,
        /// Use the advanced model tier
        #[arg(short, long)]
        advanced: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let cancel = CancelToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    match cli.command {
        Commands::Extract { path } => extract(&path, &cancel).await,
        Commands::Generate {
            file,
            text,
            deck,
            count,
            advanced,
        } => generate(file, text, deck, count, advanced, &cancel).await,
    }
}

fn spawn_ctrl_c_handler(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("cancellation requested");
            cancel.cancel();
        }
    });
}

async fn extract(path: &PathBuf, cancel: &CancelToken) -> Result<()> {
    let extractor = DocumentExtractor::new(Limits::default());
    let extracted = extractor
        .extract_text(path, cancel)
        .await
        .with_context(|| format!("could not extract {}", path.display()))?;

    eprintln!("{}: {} chars", extracted.source_name, extracted.char_count);
    println!("{}", extracted.text);
    Ok(())
}

async fn generate(
    file: Option<PathBuf>,
    text: Option<String>,
    deck: Option<String>,
    count: u32,
    advanced: bool,
    cancel: &CancelToken,
) -> Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;
    let limits = Limits::default();

    let topic_text = match (file, text) {
        (Some(path), None) => {
            let extractor = DocumentExtractor::new(limits.clone());
            let extracted = extractor
                .extract_text(&path, cancel)
                .await
                .with_context(|| format!("could not extract {}", path.display()))?;
            match limits.truncate_to_accepted(&extracted.text) {
                Cow::Borrowed(_) => extracted.text,
                Cow::Owned(truncated) => {
                    tracing::warn!(
                        original = extracted.char_count,
                        accepted = truncated.chars().count(),
                        "document over the accepted budget; truncating"
                    );
                    truncated
                }
            }
        }
        (None, Some(text)) => text,
        _ => bail!("exactly one of --file or --text is required"),
    };

    let client = OpenAiClient::new(ClientConfig::default());
    let mut request = GenerationRequest::new(topic_text, count).with_advanced_tier(advanced);
    if let Some(deck) = deck {
        request = request.with_deck_name(deck);
    }

    let generator =
        FlashcardGenerator::new(client, limits).with_progress(Box::new(report_progress));
    let cards = generator.generate(&api_key, &request, cancel).await?;

    tracing::info!(cards = cards.len(), "generation finished");
    println!("{}", serde_json::to_string_pretty(&cards)?);
    Ok(())
}

fn report_progress(progress: GenerationProgress) {
    match progress {
        GenerationProgress::SummarizingChunk { current, total } => {
            tracing::info!("summarizing chunk {current}/{total}");
        }
        GenerationProgress::CondensingSummary => tracing::info!("condensing combined summary"),
        GenerationProgress::GeneratingFlashcards => tracing::info!("generating flashcards"),
    }
}
