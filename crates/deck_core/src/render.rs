//! Report rendering and export
//!
//! Turns a [`DeckReport`] into the console listing and, optionally, a JSON
//! document on disk.

use crate::types::{DeckReport, ResolvedCardEntry};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

static UNSAFE_FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9A-Za-z\x{4e00}-\x{9fff}_ \-]+").expect("valid regex"));

/// Number of deck code characters used when no deck name is given
const CODE_STEM_LEN: usize = 12;

/// Render the human readable report
pub fn render_text(report: &DeckReport) -> String {
    let mut lines = vec![format!("Deck format: {}", report.format)];
    if !report.heroes.is_empty() {
        let heroes: Vec<&str> = report.heroes.iter().map(|h| h.summary.as_str()).collect();
        lines.push(format!("Hero: {}", heroes.join(" / ")));
    }

    lines.push(String::new());
    lines.push("Main deck:".to_string());
    for card in &report.cards {
        push_card(&mut lines, card, "  - ", "       ");
    }

    if !report.sideboards.is_empty() {
        lines.push(String::new());
        lines.push("Sideboards:".to_string());
        for sideboard in &report.sideboards {
            lines.push(format!("  * Sideboard for {}:", sideboard.owner_name));
            for card in &sideboard.cards {
                push_card(&mut lines, card, "      - ", "           ");
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_card(lines: &mut Vec<String>, card: &ResolvedCardEntry, bullet: &str, indent: &str) {
    lines.push(format!("{}{}", bullet, card.summary));
    for extra in &card.derived_summaries {
        lines.push(format!("{}{}", indent, extra));
    }
}

/// Make a string usable as a file stem
///
/// Characters outside ASCII letters, digits, `_`, `-`, space and CJK
/// ideographs are replaced with `_`; spaces become underscores.
pub fn safe_filename(name: &str, fallback: &str) -> String {
    let mut candidate = name.trim();
    if candidate.is_empty() {
        candidate = fallback.trim();
    }
    if candidate.is_empty() {
        candidate = "deck";
    }

    let cleaned = UNSAFE_FILENAME_RE
        .replace_all(candidate, "_")
        .trim()
        .replace(' ', "_");

    if !cleaned.is_empty() {
        cleaned
    } else if !fallback.is_empty() {
        fallback.to_string()
    } else {
        "deck".to_string()
    }
}

#[derive(Serialize)]
struct PersistedReport<'a> {
    #[serde(flatten)]
    report: &'a DeckReport,
    name: &'a str,
}

/// Write the report as pretty JSON into `dir` and return the file path
///
/// The file stem comes from `deck_name`, or from the start of the deck code
/// when no name is given.
pub fn write_report_json(
    report: &DeckReport,
    deck_name: Option<&str>,
    dir: &Path,
) -> Result<PathBuf> {
    let code_stem: String = report.deck_code.chars().take(CODE_STEM_LEN).collect();
    let deck_name = deck_name.filter(|name| !name.is_empty());
    let stem = safe_filename(deck_name.unwrap_or(""), &code_stem);
    let path = dir.join(format!("{}.json", stem));

    let payload = PersistedReport {
        report,
        name: deck_name.unwrap_or(&stem),
    };
    let json = serde_json::to_string_pretty(&payload).context("Failed to serialize deck report")?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Saved deck report to {}", path.display());
    Ok(path)
}
