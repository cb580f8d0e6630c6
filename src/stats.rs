//! Corpus, index, and vocabulary overview.
//!
//! Used by `academy stats` to confirm that the configured curriculum loaded
//! and that the index and vocabulary tables look the way they should.

use anyhow::Result;
use std::time::UNIX_EPOCH;

use academy_search_core::index::EntryKind;
use academy_search_core::resolver::QueryResolver;

use crate::config::Config;
use crate::dispatch::parse_minutes;
use crate::format::format_minutes;

/// Per-module breakdown row.
struct ModuleStats {
    number: String,
    title: String,
    sections: usize,
    minutes: u32,
    tools: usize,
}

/// Print the summary to stdout.
pub fn run_stats(config: &Config, resolver: &QueryResolver) -> Result<()> {
    print!("{}", render_stats(config, resolver));
    Ok(())
}

pub fn render_stats(config: &Config, resolver: &QueryResolver) -> String {
    let corpus = resolver.corpus();
    let vocab = resolver.vocabulary();
    let entries = resolver.entries();
    let count = |kind: EntryKind| entries.iter().filter(|e| e.kind == kind).count();

    let (size, modified) = match std::fs::metadata(&config.corpus.path) {
        Ok(meta) => {
            let modified = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| format_ts_relative(d.as_secs() as i64))
                .unwrap_or_else(|| "unknown".to_string());
            (format_bytes(meta.len()), modified)
        }
        Err(_) => ("n/a".to_string(), "n/a".to_string()),
    };

    let mut out = String::new();
    out.push_str("Academy Search — Stats\n");
    out.push_str("======================\n\n");
    out.push_str(&format!("  Corpus:      {}\n", config.corpus.path.display()));
    out.push_str(&format!("  Size:        {}\n", size));
    out.push_str(&format!("  Modified:    {}\n\n", modified));

    out.push_str(&format!("  Modules:     {}\n", corpus.modules.len()));
    out.push_str(&format!("  Sections:    {}\n", corpus.section_count()));
    out.push_str(&format!("  Tools:       {}\n\n", corpus.tools.len()));

    out.push_str(&format!(
        "  Index:       {} entries ({} modules, {} sections, {} tools)\n",
        entries.len(),
        count(EntryKind::Module),
        count(EntryKind::Section),
        count(EntryKind::Tool)
    ));
    out.push_str(&format!(
        "  Threshold:   {:.2}\n",
        resolver.confidence_threshold()
    ));
    out.push_str(&format!(
        "  Vocabulary:  {} corrections, {} synonym groups, {} phrases, {} tool keyword sets\n",
        vocab.spell_corrections.len(),
        vocab.command_synonyms.len(),
        vocab.common_phrases.len(),
        vocab.tool_keywords.len()
    ));
    out.push_str(&format!(
        "  Source:      {}\n",
        match &config.vocabulary.path {
            Some(p) => p.display().to_string(),
            None => "built-in".to_string(),
        }
    ));

    let rows: Vec<ModuleStats> = corpus
        .modules
        .iter()
        .map(|m| {
            let mut tools: Vec<&str> = m
                .sections
                .iter()
                .flat_map(|s| s.tools.iter().map(String::as_str))
                .collect();
            tools.sort_unstable();
            tools.dedup();
            ModuleStats {
                number: m.number.clone(),
                title: m.title.clone(),
                sections: m.sections.len(),
                minutes: m
                    .sections
                    .iter()
                    .filter_map(|s| s.duration.as_deref().and_then(parse_minutes))
                    .sum(),
                tools: tools.len(),
            }
        })
        .collect();

    if !rows.is_empty() {
        out.push_str("\n  By module:\n");
        out.push_str(&format!(
            "  {:<4} {:<28} {:>8} {:>9} {:>6}\n",
            "NUM", "TITLE", "SECTIONS", "TIME", "TOOLS"
        ));
        out.push_str(&format!("  {}\n", "-".repeat(59)));
        for r in &rows {
            out.push_str(&format!(
                "  {:<4} {:<28} {:>8} {:>9} {:>6}\n",
                r.number,
                r.title,
                r.sections,
                format_minutes(r.minutes),
                r.tools
            ));
        }
    }

    out.push('\n');
    out
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
