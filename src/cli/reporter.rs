// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::triangulate::{Decision, FaceReport, RunSummary};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished (or stopped) run
    pub fn report_summary(file: &str, summary: &RunSummary, faces: usize, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Triangulated:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        if summary.is_complete() {
            println!(
                "{} {}",
                "✅".green(),
                format!("Processed all {} quads", summary.total).green().bold()
            );
        } else {
            println!(
                "{} {}",
                "⏸".yellow(),
                format!(
                    "Stopped after {} of {} quads",
                    summary.processed(),
                    summary.total
                )
                .yellow()
                .bold()
            );
        }

        println!("\n{}", "Decisions:".bold());
        Self::print_count("Kept as quad", summary.kept, false);
        Self::print_count("Cut 0-2", summary.cut_a, false);
        Self::print_count("Cut 1-3", summary.cut_b, false);
        Self::print_count("Skipped", summary.skipped, true);
        if !summary.is_complete() {
            Self::print_count("Untouched", summary.remaining(), false);
        }

        println!(
            "\n  {} {}",
            "Faces:".bright_black(),
            faces.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// One line per evaluated face, used by dry runs
    pub fn report_face(report: &FaceReport) {
        let evaluation = &report.evaluation;
        let label = format!("{:<24}", report.decision().to_string());
        let decision = match evaluation.decision {
            Decision::KeepQuad => label.green(),
            Decision::Cut(_) => label.cyan(),
            Decision::AbortDegenerate(_) => label.red(),
        };
        let distances = match evaluation.distances {
            Some((a, b)) => format!("0-2: {a:.4}  1-3: {b:.4}"),
            None => String::new(),
        };
        println!(
            "  {} {} {} {}",
            format!("[{:>4}/{}] face {:<6}", report.position, report.total, report.face)
                .bright_black(),
            decision,
            format!("center {:.4}", evaluation.center_distance).bright_black(),
            distances.bright_black()
        );
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    fn print_count(name: &str, count: usize, alarming: bool) {
        let value = count.to_string();
        let value = if count == 0 {
            value.bright_black()
        } else if alarming {
            value.red()
        } else {
            value.cyan()
        };
        println!("  {} {}", format!("{}:", name).bright_black(), value);
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
