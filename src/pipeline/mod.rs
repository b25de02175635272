// Analysis runs: load a generated-text document, run one analysis over
// every topic, save the report next to it.
//
// Each run is file-in, file-out and independent of the others, so the CLI
// can run one analysis or all three over the same input.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::AnalysisParams;
use crate::corpus::{load_corpus, TopicCorpus};
use crate::error::Result;
use crate::ngrams::table::{FrequencyTable, TfidfScoreTable};
use crate::report::TopicReport;
use crate::sentiment::summary::{summarize_by_topic, SentimentSummary};
use crate::sentiment::traits::SentimentClassifier;
use crate::text::normalizer::Normalizer;

/// Where a full run writes its three reports.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub frequency: PathBuf,
    pub tfidf: PathBuf,
    pub sentiment: PathBuf,
}

impl OutputPaths {
    /// `<out_dir>/<input stem>_{term_freq,tfidf,sentiment}.json`.
    /// Without `out_dir` the reports land beside the input.
    pub fn for_input(input: &Path, out_dir: Option<&Path>) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string());
        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        Self {
            frequency: dir.join(format!("{stem}_term_freq.json")),
            tfidf: dir.join(format!("{stem}_tfidf.json")),
            sentiment: dir.join(format!("{stem}_sentiment.json")),
        }
    }
}

/// Count n-gram frequencies for every topic in `input` and save to `output`.
pub fn run_frequency(
    input: &Path,
    output: &Path,
    params: &AnalysisParams,
    normalizer: &Normalizer,
) -> Result<TopicReport<FrequencyTable>> {
    let corpus = load_corpus(input)?;
    let report = params.frequency_counter().count_by_topic(normalizer, &corpus)?;
    report.save(output)?;
    info!(output = %output.display(), topics = corpus.topics().len(), "Frequency report saved");
    Ok(report)
}

/// Score TF-IDF terms for every topic in `input` and save to `output`.
pub fn run_tfidf(
    input: &Path,
    output: &Path,
    params: &AnalysisParams,
    normalizer: &Normalizer,
) -> Result<TopicReport<TfidfScoreTable>> {
    let corpus = load_corpus(input)?;
    let pb = spinner(&corpus, "Scoring TF-IDF");
    let result = params.tfidf_scorer().score_by_topic(normalizer, &corpus);
    pb.finish_and_clear();

    let report = result?;
    report.save(output)?;
    info!(output = %output.display(), topics = corpus.topics().len(), "TF-IDF report saved");
    Ok(report)
}

/// Summarize sentiment for every topic in `input` and save to `output`.
pub async fn run_sentiment(
    input: &Path,
    output: &Path,
    classifier: &dyn SentimentClassifier,
) -> Result<TopicReport<SentimentSummary>> {
    let corpus = load_corpus(input)?;
    let pb = spinner(&corpus, "Classifying sentiment");
    let result = summarize_by_topic(classifier, &corpus).await;
    pb.finish_and_clear();

    let report = result?;
    report.save(output)?;
    info!(output = %output.display(), topics = corpus.topics().len(), "Sentiment report saved");
    Ok(report)
}

fn spinner(corpus: &TopicCorpus, action: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .expect("valid template"),
    );
    pb.set_message(format!("{action} over {} topics", corpus.topics().len()));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
