//! Plain-text rendering of an analysis report

use danmu_classifiers::{AnalysisReport, ClassificationSource};
use danmu_core::SentimentClass;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// Summary counts, a sentiment bar per class and the ranked terms
pub fn text_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "video:    {}", report.video_id);
    let _ = writeln!(
        out,
        "comments: {} ({} unique)",
        report.total_count, report.unique_count
    );
    let _ = writeln!(out, "source:   {}", describe_source(&report.source));
    let _ = writeln!(out);

    for class in SentimentClass::PRECEDENCE {
        let share = report.summary.share(class);
        let filled = ((share / 100.0) * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "{:<10} {:>6} {:>6.1}% {}",
            report.language.label(class),
            report.summary.count(class),
            share,
            "#".repeat(filled.min(BAR_WIDTH))
        );
    }

    if !report.terms.is_empty() {
        let _ = writeln!(out);
        for (rank, term) in report.terms.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {} ({})", rank + 1, term.term, term.weight);
        }
    }

    out
}

fn describe_source(source: &ClassificationSource) -> String {
    match source {
        ClassificationSource::Local => "keyword lexicon".to_string(),
        ClassificationSource::Remote { provider, model } => format!("{provider} ({model})"),
        ClassificationSource::Fallback { reason } => {
            format!("keyword lexicon (fallback: {reason})")
        }
    }
}
