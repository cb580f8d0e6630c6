//! Common-phrase shortcuts.
//!
//! Curated phrases map straight to content ids, skipping fuzzy search for
//! the questions people ask most often.

use tracing::warn;

use crate::models::Corpus;
use crate::result::{section_result, tool_result, SearchResult};
use crate::vocabulary::PhraseMapping;

/// Confidence assigned to every phrase-table answer.
pub const PHRASE_CONFIDENCE: f64 = 0.95;

/// Resolve `query` against the phrase table.
///
/// Phrases are tried in table order and must appear as substrings of the
/// normalized query. For a matching phrase the candidates are tried as a
/// section id (in order), then as a tool id. Ids that resolve to nothing
/// are skipped and the scan moves on to the next phrase; `None` hands the
/// query on to fuzzy search.
pub fn resolve_phrase(
    query: &str,
    phrases: &[PhraseMapping],
    corpus: &Corpus,
) -> Option<SearchResult> {
    for mapping in phrases {
        if !query.contains(&mapping.phrase) {
            continue;
        }

        if let Some((module, section)) = mapping.ids.iter().find_map(|id| corpus.section(id)) {
            return Some(section_result(module, section, PHRASE_CONFIDENCE));
        }
        if let Some(tool) = mapping.ids.iter().find_map(|id| corpus.tool(id)) {
            return Some(tool_result(corpus, tool, PHRASE_CONFIDENCE));
        }

        warn!(phrase = %mapping.phrase, ids = ?mapping.ids, "phrase maps to no known content");
    }
    None
}
