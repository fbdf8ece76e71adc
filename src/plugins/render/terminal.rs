//! Plain-text rendering of a [`RenderedView`] for the terminal shell.

use std::fmt::Write as _;

use super::detect::{ClassificationView, RenderedView};
use super::types::StandardsResponse;

/// RFC 3339 timestamps in local time; anything else verbatim.
fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

/// `shariah_review` becomes `Shariah review`.
fn capitalize(word: &str) -> String {
    let word = word.replace(['_', '-'], " ");
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn bullets(out: &mut String, indent: &str, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "{indent}- {item}");
    }
}

pub fn to_terminal(view: &RenderedView) -> String {
    match view {
        RenderedView::Markdown { text } => text.clone(),
        RenderedView::Classification(view) => classification(view),
        RenderedView::Pipeline(response) => pipeline(response),
        RenderedView::ParseError { message } => format!("[!] {message}"),
    }
}

fn classification(view: &ClassificationView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Most Likely Standard: {}", view.most_likely_standard);
    let _ = writeln!(out);
    let _ = writeln!(out, "Standard Probabilities");

    let width = view
        .rows
        .iter()
        .map(|r| r.standard.chars().count())
        .max()
        .unwrap_or(0)
        .max("Standard".len());
    let _ = writeln!(out, "  {:<width$}  {:>11}  Reason", "Standard", "Probability");
    for row in &view.rows {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>11}  {}",
            row.standard, row.percent, row.reason
        );
    }

    if !view.key_features.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Key Features");
        bullets(&mut out, "  ", &view.key_features);
    }
    if let Some(explanation) = &view.detailed_explanation {
        let _ = writeln!(out);
        let _ = writeln!(out, "Detailed Explanation");
        let _ = writeln!(out, "{explanation}");
    }
    if let Some(timestamp) = &view.timestamp {
        let _ = writeln!(out);
        let _ = writeln!(out, "{timestamp}");
    }
    out.trim_end().to_string()
}

fn pipeline(data: &StandardsResponse) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Audit Trail Summary");
    let _ = writeln!(
        out,
        "  - Start Time: {}",
        format_timestamp(&data.audit_trail.start_time)
    );
    let _ = writeln!(
        out,
        "  - Input Length: {} characters",
        data.audit_trail.input_length
    );
    let _ = writeln!(
        out,
        "  - Pipeline Stages: {}",
        data.audit_trail.pipeline_stages.join(" → ")
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Pipeline Stages");
    for (name, stage) in data.pipeline_stages.iter() {
        let _ = writeln!(out, "  {}", capitalize(name));
        let _ = writeln!(out, "    Timestamp: {}", format_timestamp(&stage.timestamp));
        let _ = writeln!(out, "    Quality Score: {}%", stage.quality_score);
        if !stage.notes.is_empty() {
            let _ = writeln!(out, "    Notes:");
            bullets(&mut out, "      ", &stage.notes);
        }
        if !stage.processing_steps.is_empty() {
            let _ = writeln!(out, "    Processing Steps:");
            bullets(&mut out, "      ", &stage.processing_steps);
        }
    }

    let mut assessments = data.detailed_assessment.iter().peekable();
    if assessments.peek().is_some() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Detailed Assessment");
        for (role, assessment) in assessments {
            let _ = writeln!(out, "  {} Assessment", capitalize(role));
            let _ = writeln!(out, "    Strengths");
            bullets(&mut out, "      ", &assessment.strengths);
            let _ = writeln!(out, "    Weaknesses");
            bullets(&mut out, "      ", &assessment.weaknesses);
            let _ = writeln!(out, "    Areas of Improvement");
            bullets(&mut out, "      ", &assessment.improvements);
        }
    }

    if !data.enhancements.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Enhancements and Recommendations");
        for (i, enhancement) in data.enhancements.iter().enumerate() {
            let _ = writeln!(out, "  Improvement {}: {}", i + 1, enhancement.improvement);
            let _ = writeln!(out, "    Recommendation: {}", enhancement.recommendation);
        }
    }

    if let Some(summary) = &data.final_summary {
        let _ = writeln!(out);
        let _ = writeln!(out, "Final Process Summary");
        let _ = writeln!(
            out,
            "  Completion Time: {}",
            format_timestamp(&summary.completion_time)
        );
        let _ = writeln!(
            out,
            "  Average Quality Score: {}%",
            summary.average_quality_score
        );
        let _ = writeln!(
            out,
            "  Total Processing Time: {} seconds",
            summary.total_processing_time
        );
    }

    let standard = &data.enhanced_standard;
    let _ = writeln!(out);
    let _ = writeln!(out, "Enhanced Standard");
    let _ = writeln!(out, "  {}", standard.title);
    for section in &standard.sections {
        let _ = writeln!(out, "  {}", section.title);
        bullets(&mut out, "    ", &section.clauses);
    }
    if !standard.definitions.is_empty() {
        let _ = writeln!(out, "  Definitions");
        for def in &standard.definitions {
            let _ = writeln!(out, "    {}: {}", def.term, def.definition);
        }
    }

    out.trim_end().to_string()
}
