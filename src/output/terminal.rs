// Colored terminal output for n-gram and sentiment reports.

use colored::Colorize;

use crate::corpus::ALL_TOPICS;
use crate::ngrams::table::NgramTable;
use crate::report::TopicReport;
use crate::sentiment::summary::SentimentSummary;

/// Display the top `limit` terms per arity for every topic.
pub fn display_ngram_report<V>(
    title: &str,
    report: &TopicReport<NgramTable<V>>,
    limit: usize,
    format_value: impl Fn(&V) -> String,
) {
    if report.is_empty() {
        println!("Report is empty.");
        return;
    }

    println!("\n{}", format!("=== {title} ({} entries) ===", report.len()).bold());

    for (topic, table) in report.iter() {
        println!("\n  {}", topic_heading(topic));

        for (arity, terms) in table.iter() {
            if terms.is_empty() {
                println!("    {}-grams: {}", arity, "(none)".dimmed());
                continue;
            }
            let shown: Vec<String> = terms
                .iter()
                .take(limit)
                .map(|(term, value)| format!("{} {}", term, format_value(value).dimmed()))
                .collect();
            println!("    {}-grams: {}", arity, shown.join(", "));
        }
    }
    println!();
}

/// Display per-topic sentiment averages.
pub fn display_sentiment_report(report: &TopicReport<SentimentSummary>) {
    if report.is_empty() {
        println!("Report is empty.");
        return;
    }

    println!("\n{}", format!("=== Sentiment ({} entries) ===", report.len()).bold());
    println!();
    println!(
        "  {:<32} {:>8}  {:>8}  {:>8}",
        "Topic".dimmed(),
        "Pos".dimmed(),
        "Overall".dimmed(),
        "Neg".dimmed(),
    );
    println!("  {}", "-".repeat(62).dimmed());

    for (topic, summary) in report.iter() {
        let name = super::truncate_chars(topic, 30);
        println!(
            "  {:<32} {:>8.3}  {}  {:>8.3}",
            if topic == ALL_TOPICS {
                name.bold().to_string()
            } else {
                name
            },
            summary.avg_pos,
            colorize_direction(summary.avg_all),
            summary.avg_neg,
        );
    }
    println!();
}

fn topic_heading(topic: &str) -> colored::ColoredString {
    if topic == ALL_TOPICS {
        topic.bold().underline()
    } else {
        topic.bold()
    }
}

/// Green for net-positive, red for net-negative.
fn colorize_direction(value: f64) -> colored::ColoredString {
    let text = format!("{value:>8.3}");
    if value > 0.0 {
        text.green()
    } else if value < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}
