use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use genlex::config::{self, Config};
use genlex::output::{terminal, SavedReport};
use genlex::pipeline::{self, OutputPaths};
use genlex::sentiment::traits::SentimentClassifier;
use genlex::text::normalizer::Normalizer;

/// genlex: lexical and sentiment analytics for generated text.
///
/// Compares text produced under different prompting strategies by topic:
/// n-gram frequencies, TF-IDF term importance, and average sentiment.
#[derive(Parser)]
#[command(name = "genlex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RankArgs {
    /// Entries kept per n-gram arity (default: GENLEX_TOP_N or 20)
    #[arg(long)]
    top_n: Option<usize>,

    /// Minimum count for frequency entries (default: GENLEX_MIN_FREQ or 2)
    #[arg(long)]
    min_freq: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count normalized n-gram frequencies per topic
    Freq {
        /// Generated-text JSON document
        input: PathBuf,
        /// Where to write the frequency report
        output: PathBuf,
        #[command(flatten)]
        rank: RankArgs,
    },

    /// Score TF-IDF term importance per topic
    Tfidf {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        rank: RankArgs,
    },

    /// Average sentiment per topic
    Sentiment { input: PathBuf, output: PathBuf },

    /// Run all three analyses, writing <stem>_term_freq/_tfidf/_sentiment.json
    All {
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Skip sentiment classification
        #[arg(long)]
        skip_sentiment: bool,

        #[command(flatten)]
        rank: RankArgs,
    },

    /// Display a saved report in the terminal
    Show {
        report: PathBuf,

        /// Terms shown per arity (default: 10)
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Download the ONNX sentiment model (~270 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("genlex=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Freq { input, output, rank } => {
            let params = analysis_params(&Config::load()?, &rank);
            let normalizer = Normalizer::english();
            let report = pipeline::run_frequency(&input, &output, &params, &normalizer)?;
            println!("Frequency report ({} entries) saved to {}", report.len(), output.display());
        }

        Commands::Tfidf { input, output, rank } => {
            let params = analysis_params(&Config::load()?, &rank);
            let normalizer = Normalizer::english();
            let report = pipeline::run_tfidf(&input, &output, &params, &normalizer)?;
            println!("TF-IDF report ({} entries) saved to {}", report.len(), output.display());
        }

        Commands::Sentiment { input, output } => {
            let config = Config::load()?;
            config.require_classifier()?;
            let classifier = create_classifier(&config)?;
            let report = pipeline::run_sentiment(&input, &output, classifier.as_ref()).await?;
            println!("Sentiment report ({} entries) saved to {}", report.len(), output.display());
        }

        Commands::All {
            input,
            out_dir,
            skip_sentiment,
            rank,
        } => {
            let config = Config::load()?;
            let params = analysis_params(&config, &rank);
            let paths = OutputPaths::for_input(&input, out_dir.as_deref());

            // Validate the classifier before spending time on the n-gram runs.
            let classifier = if skip_sentiment {
                None
            } else {
                config.require_classifier()?;
                Some(create_classifier(&config)?)
            };

            let normalizer = Normalizer::english();

            println!("Counting n-gram frequencies...");
            pipeline::run_frequency(&input, &paths.frequency, &params, &normalizer)?;
            println!("  Saved {}", paths.frequency.display());

            println!("Scoring TF-IDF terms...");
            pipeline::run_tfidf(&input, &paths.tfidf, &params, &normalizer)?;
            println!("  Saved {}", paths.tfidf.display());

            if let Some(classifier) = classifier {
                println!("Classifying sentiment...");
                pipeline::run_sentiment(&input, &paths.sentiment, classifier.as_ref()).await?;
                println!("  Saved {}", paths.sentiment.display());
            }

            println!("\n{}", "Analysis complete.".bold());
        }

        Commands::Show { report, limit } => match SavedReport::load(&report)? {
            SavedReport::Sentiment(r) => terminal::display_sentiment_report(&r),
            SavedReport::Frequency(r) => {
                terminal::display_ngram_report("Term Frequency", &r, limit, |v| v.to_string())
            }
            SavedReport::Tfidf(r) => {
                terminal::display_ngram_report("TF-IDF", &r, limit, |v| format!("{v:.3}"))
            }
        },

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX sentiment model...");
            println!("  Destination: {}", model_dir.display());

            genlex::sentiment::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `genlex sentiment` or `genlex all`.");
        }
    }

    Ok(())
}

/// Environment parameters with CLI overrides applied.
fn analysis_params(config: &Config, rank: &RankArgs) -> config::AnalysisParams {
    let mut params = config.params.clone();
    if let Some(top_n) = rank.top_n {
        params.top_n = top_n;
    }
    if let Some(min_freq) = rank.min_freq {
        params.min_freq = min_freq;
    }
    params
}

/// Construct the configured classifier once; it is reused for every topic.
fn create_classifier(config: &Config) -> Result<Box<dyn SentimentClassifier>> {
    match config.classifier_backend {
        config::ClassifierBackend::Onnx => {
            info!("Using local ONNX sentiment classifier");
            let classifier =
                genlex::sentiment::onnx::OnnxSentimentClassifier::load(&config.model_dir)?;
            Ok(Box::new(classifier))
        }
        config::ClassifierBackend::Inference => {
            info!(model = %config.inference_model, "Using hosted inference sentiment classifier");
            let classifier = genlex::sentiment::inference::InferenceApiClassifier::new(
                &config.inference_url,
                &config.inference_model,
                config.hf_api_token.clone(),
            );
            Ok(Box::new(classifier))
        }
    }
}
