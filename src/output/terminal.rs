//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::config::StatisticMode;
use crate::result::EventReport;

/// Most events listed individually before the list is elided.
const MAX_LISTED_EVENTS: usize = 20;

/// Format an EventReport for human-readable terminal output.
pub fn format_report(report: &EventReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);
    let meta = &report.metadata;

    output.push_str("coactivation\n");
    output.push_str(&sep);
    output.push_str("\n\n");

    output.push_str(&format!(
        "  Series: {} time points, {} nodes, {} edges\n",
        meta.time_points, meta.nodes, meta.edges
    ));
    output.push_str(&format!(
        "  Statistic: {}\n",
        format_statistic(report.statistic)
    ));
    output.push_str(&format!(
        "  Null model: {} trials ({}), pool of {}\n",
        report.null.num_trials, report.null_policy, report.null.pool_size
    ));
    output.push_str(&format!(
        "  Critical p-value: {} (RSS above ~{:.3})\n",
        report.critical_p_value, report.null.critical_rss
    ));
    if let Some(cutoff) = report.histogram_threshold {
        output.push_str(&format!("  Edge cutoff: {:.4}\n", cutoff));
    }
    output.push('\n');

    if report.has_events() {
        let label = format!(
            "\u{26A1} {} event{} detected",
            report.num_events(),
            if report.num_events() == 1 { "" } else { "s" }
        );
        output.push_str(&format!("  {}\n\n", label.green().bold()));

        for event in report.events.iter().take(MAX_LISTED_EVENTS) {
            let frames = if event.start == event.end {
                format!("{}", event.start)
            } else {
                format!("{}-{}", event.start, event.end)
            };
            output.push_str(&format!(
                "    frames {:<12} peak {:>5}  RSS {:.3}\n",
                frames, event.peak, event.peak_rss
            ));
        }
        if report.num_events() > MAX_LISTED_EVENTS {
            output.push_str(&format!(
                "    ... {} more\n",
                report.num_events() - MAX_LISTED_EVENTS
            ));
        }
    } else {
        output.push_str(&format!("  {}\n", "\u{2013} No significant frames".yellow().bold()));
    }
    output.push('\n');

    if report.preflight.has_warnings() {
        output.push_str("    Warnings:\n");
        for description in report.preflight.descriptions() {
            output.push_str(&format!("      {} {}\n", "\u{26A0}".yellow(), description));
        }
        output.push('\n');
    }

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Runtime: {:.2}s ({:.2}s null model)\n",
        meta.runtime_secs, meta.null_model_secs
    ));

    output
}

fn format_statistic(mode: StatisticMode) -> &'static str {
    match mode {
        StatisticMode::ZScored => "z-scored",
        StatisticMode::AreaUnderCurve => "area under curve",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::make_report;

    #[test]
    fn test_format_with_events() {
        let output = format_report(&make_report(true));
        assert!(output.contains("coactivation"));
        assert!(output.contains("2 events detected"));
        assert!(output.contains("frames 3-5"));
        assert!(output.contains("Node 2 is constant"));
    }

    #[test]
    fn test_format_without_events() {
        let output = format_report(&make_report(false));
        assert!(output.contains("No significant frames"));
        assert!(!output.contains("frames 3-5"));
    }
}
