//! Text (terminal) reporter with colors and formatting

use crate::generate::{Comparison, GenerationRun};
use crate::models::{Reason, Verdict};
use crate::similarity::{Metric, ScoreReport, SimilarityScores};
use crate::validate::{FileReport, ValidationSummary};
use console::style;
use std::fmt::Write;

const RULE: &str = "──────────────────────────────────────";

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", style(title).bold());
    let _ = writeln!(out, "{}", style(RULE).dim());
}

fn verdict_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::Accept => style(verdict).green().bold().to_string(),
        Verdict::Reject => style(verdict).red().bold().to_string(),
    }
}

fn reason_line(reason: &Reason) -> String {
    let tag = if reason.is_rejecting() {
        style(format!("[{}]", reason.kind)).red().to_string()
    } else {
        style("[warning]".to_string()).yellow().to_string()
    };
    format!("{} {} {}", tag, style(&reason.rule).dim(), reason.message)
}

fn render_file(out: &mut String, file: &FileReport) {
    let status = if file.passed() {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    let _ = writeln!(
        out,
        "{}  {}  ({} records: {} accepted, {} rejected, {} warnings)",
        status,
        file.path,
        file.records.len(),
        file.accepted_count(),
        file.rejected_count(),
        file.warning_count()
    );

    for record in &file.records {
        let flagged = !record.accepted() || record.warnings().next().is_some();
        if !flagged {
            continue;
        }
        let _ = writeln!(
            out,
            "  {:>4}  {}  {}",
            style(format!("L{}", record.line)).dim(),
            verdict_label(record.verdict),
            record.id.as_deref().unwrap_or("<no id>")
        );
        for reason in &record.reasons {
            let _ = writeln!(out, "          {}", reason_line(reason));
        }
    }

    for dup in &file.duplicate_ids {
        let lines: Vec<String> = dup.lines.iter().map(|l| l.to_string()).collect();
        let _ = writeln!(
            out,
            "  {} duplicate id {} on lines {}",
            style("[duplicate]").red(),
            dup.id,
            lines.join(", ")
        );
    }
}

/// Per-file pass/fail with every rejected or flagged record.
pub fn render_validation(summary: &ValidationSummary) -> String {
    let mut out = String::new();
    header(&mut out, "Card Validation");
    for file in &summary.files {
        render_file(&mut out, file);
    }
    let overall = if summary.passed() {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    let _ = writeln!(
        out,
        "\n{} {} file(s), {} record(s), {} rejected",
        overall,
        summary.files.len(),
        summary.total_records(),
        summary.total_rejected()
    );
    out
}

fn format_score(score: f64) -> String {
    let text = format!("{:.4}", score);
    if score >= 0.9 {
        style(text).green().to_string()
    } else if score >= 0.7 {
        style(text).yellow().to_string()
    } else {
        style(text).red().to_string()
    }
}

fn render_scores(out: &mut String, scores: &SimilarityScores, headline: Metric) {
    for metric in Metric::all() {
        let marker = if *metric == headline { "*" } else { " " };
        let _ = writeln!(
            out,
            " {} {:<16} {}",
            marker,
            metric.name(),
            format_score(scores.get(*metric))
        );
    }
}

fn render_run_summary(out: &mut String, run: &GenerationRun) {
    let _ = writeln!(
        out,
        "Stream: {}  Seed mode: {}  Seed: {}",
        style(run.stream).cyan(),
        style(run.seed_mode).cyan(),
        run.seed
    );
    let _ = writeln!(
        out,
        "Corpus lines: {}  Cards: {}  Seed letters: {}  Surprisal: {:.3} bits",
        run.corpus_lines, run.cards, run.seed_chars, run.surprisal
    );
    let _ = writeln!(
        out,
        "Score ({}): {}",
        run.metric,
        style(format!("{:.6}", run.score)).bold()
    );
}

/// Generated lines plus scores.
pub fn render_generation(run: &GenerationRun) -> String {
    let mut out = String::new();
    header(&mut out, "Generation");
    render_run_summary(&mut out, run);
    out.push('\n');
    render_scores(&mut out, &run.scores, run.metric);
    let _ = writeln!(out, "\n{}", style("GENERATED").bold());
    for line in &run.lines {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

/// Normal vs neutral side by side.
pub fn render_comparison(cmp: &Comparison) -> String {
    let mut out = String::new();
    header(&mut out, "Seed Mode Comparison");
    let _ = writeln!(
        out,
        "Stream: {}  Seed: {}  Metric: {}\n",
        style(cmp.normal.stream).cyan(),
        cmp.normal.seed,
        cmp.normal.metric
    );
    let _ = writeln!(out, "  {:<16} {:>10} {:>10}", "", "normal", "neutral");
    for metric in Metric::all() {
        let _ = writeln!(
            out,
            "  {:<16} {:>10.6} {:>10.6}",
            metric.name(),
            cmp.normal.scores.get(*metric),
            cmp.neutral.scores.get(*metric)
        );
    }
    let delta = format!("{:+.6}", cmp.delta);
    let delta = if cmp.delta == 0.0 {
        style(delta).dim().to_string()
    } else {
        style(delta).bold().to_string()
    };
    let _ = writeln!(out, "\nDelta (normal - neutral): {}", delta);
    for (label, run) in [("GENERATED (normal)", &cmp.normal), ("GENERATED (neutral)", &cmp.neutral)] {
        let _ = writeln!(out, "\n{}", style(label).bold());
        for line in &run.lines {
            let _ = writeln!(out, "  {}", line);
        }
    }
    out
}

pub fn render_score(report: &ScoreReport) -> String {
    let mut out = String::new();
    header(&mut out, "Similarity");
    let _ = writeln!(out, "Reference: {}", report.reference);
    let _ = writeln!(out, "Generated: {}\n", report.generated);
    render_scores(&mut out, &report.scores, report.metric);
    out
}
