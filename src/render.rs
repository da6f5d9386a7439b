//! Terminal rendering for the CLI

use crate::address::shorten_address;
use crate::draw::{DrawMode, DrawOutcome};
use crate::processing::AddressReport;
use crate::winners::{explorer_url, share_text, share_url};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while waiting on the network.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn render_report(report: &AddressReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} / {} {}\n",
        "Valid addresses:".bright_cyan(),
        report.valid_addresses.len().to_string().bright_white().bold(),
        "Total entries:".bright_cyan(),
        report.total_entries.to_string().bright_white()
    ));

    if !report.names.is_empty() {
        out.push_str(&format!(
            "{} {} (Resolved: {})\n",
            "SuiNS names:".bright_cyan(),
            report.names.len(),
            report.resolved.len()
        ));
    }

    if !report.resolved.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Address").add_attribute(Attribute::Bold),
            ]);
        for r in &report.resolved {
            table.add_row(vec![
                Cell::new(r.name.as_str()).fg(TableColor::Blue),
                Cell::new(shorten_address(&r.address)),
            ]);
        }
        out.push_str(&format!("{}\n{}\n", "Resolved SuiNS Names:".bright_green(), table));
    }

    for warning in &report.warnings {
        out.push_str(&format!("{} {}\n", "⚠ Warning:".yellow().bold(), warning));
    }

    out
}

pub fn render_outcome(outcome: &DrawOutcome, explorer_base: &str) -> String {
    let mut out = String::new();

    let title = match outcome.mode {
        DrawMode::DryRun => "Selected Winners (dry run) 🎉",
        DrawMode::OnChain => "Selected Winners 🎉",
    };
    out.push_str(&format!("{}\n", title.bright_magenta().bold()));

    if outcome.winners.is_empty() {
        out.push_str(&format!("{}\n", "No winners reported by the transaction.".yellow()));
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").add_attribute(Attribute::Bold),
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Address").add_attribute(Attribute::Bold),
            ]);
        for (i, winner) in outcome.winners.iter().enumerate() {
            table.add_row(vec![
                Cell::new(format!("Winner #{}", i + 1)),
                Cell::new(winner.name.as_deref().unwrap_or("-")).fg(TableColor::Blue),
                Cell::new(shorten_address(&winner.address)),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    if let Some(digest) = &outcome.digest {
        out.push_str(&format!("\n{}\n", "Transaction Details".bright_cyan().bold()));
        out.push_str(&format!("  Digest:   {}\n", digest.bright_white()));
        out.push_str(&format!(
            "  Explorer: {}\n",
            explorer_url(explorer_base, digest).underline()
        ));
    }

    if !outcome.winners.is_empty() {
        out.push_str(&format!("\n{}\n", "Share Results".bright_cyan().bold()));
        out.push_str(&share_text(&outcome.winners));
        out.push('\n');
        out.push_str(&format!("{}\n", share_url(&outcome.winners).dimmed()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SuiAddress;
    use crate::processing::Warning;
    use crate::winners::Winner;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_report_summary_line() {
        plain();
        let report = AddressReport {
            total_entries: 3,
            valid_addresses: vec![SuiAddress::new([1; 32]), SuiAddress::new([2; 32])],
            warnings: vec![Warning::DuplicateEntries(vec!["a.sui".to_string()])],
            ..Default::default()
        };
        let text = render_report(&report);
        assert!(text.contains("Valid addresses: 2 / Total entries: 3"));
        assert!(text.contains("Duplicate entries detected: a.sui."));
    }

    #[test]
    fn test_outcome_with_digest() {
        plain();
        let outcome = DrawOutcome {
            mode: DrawMode::OnChain,
            digest: Some("Dig3st".to_string()),
            winners: vec![Winner {
                address: SuiAddress::new([1; 32]),
                timestamp: chrono::Utc::now(),
                name: Some("alice.sui".to_string()),
            }],
        };
        let text = render_outcome(&outcome, "https://testnet.suivision.xyz/txblock");
        assert!(text.contains("Winner #1"));
        assert!(text.contains("alice.sui"));
        assert!(text.contains("https://testnet.suivision.xyz/txblock/Dig3st"));
        assert!(text.contains("👑 alice.sui"));
    }
}
