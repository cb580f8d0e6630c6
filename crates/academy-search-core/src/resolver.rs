//! Natural-language query resolution.
//!
//! [`QueryResolver`] owns the corpus, vocabulary, fuzzy index, and query
//! history. A query runs through a fixed cascade and the first stage that
//! produces an answer wins:
//!
//! | Stage | Trigger | Confidence |
//! |-------|---------|------------|
//! | help | a help phrase appears in the query | 1.0 |
//! | module | `module 2`, `phase 02` | 1.0 |
//! | section | `section 01.2`, `cat 01.2` | 1.0 |
//! | tool | a tool keyword appears in the query | 1.0 |
//! | phrase | a common phrase appears in the query | 0.95 |
//! | fuzzy | best fuzzy hit clears the confidence gate | `1 − score` |
//!
//! All stages look at the normalized query (see [`crate::normalize`]).
//! History records the query as typed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::fuzzy::{FuzzyHit, FuzzyOptions, FuzzySearch, WeightedFieldIndex, DEFAULT_THRESHOLD};
use crate::history::{QueryHistory, QueryHistoryEntry, DEFAULT_MAX_HISTORY};
use crate::index::{EntryKind, IndexBuilder, IndexEntry, DEFAULT_PREVIEW_CHARS};
use crate::models::Corpus;
use crate::normalize::normalize;
use crate::phrases::resolve_phrase;
use crate::result::{
    help_result, module_result, section_result, tool_result, MatchDetails, SearchResult,
};
use crate::vocabulary::Vocabulary;

static MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:module|phase)\s*(\d+)").expect("valid module regex"));

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:section|cat)\s*(\d+\.\d+)").expect("valid section regex"));

/// Default maximum number of autocomplete suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Minimum partial-query length (in chars) before suggestions are offered.
const MIN_SUGGESTION_CHARS: usize = 2;

/// Number of candidate titles reported in [`MatchDetails::fuzzy_matches`].
const FUZZY_MATCHES_REPORTED: usize = 3;

/// Tuning knobs for a [`QueryResolver`], decoupled from application config.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOptions {
    /// Fuzzy distance threshold in `[0, 1]`; lower is stricter.
    pub confidence_threshold: f64,
    pub max_history: usize,
    pub suggestion_limit: usize,
    /// Section body chars copied into the index.
    pub preview_chars: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_THRESHOLD,
            max_history: DEFAULT_MAX_HISTORY,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Resolves free-form questions about a curriculum into [`SearchResult`]s.
///
/// The fuzzy backend is pluggable through `M`; the default is
/// [`WeightedFieldIndex`].
pub struct QueryResolver<M: FuzzySearch = WeightedFieldIndex> {
    corpus: Corpus,
    vocabulary: Vocabulary,
    index: M,
    threshold: f64,
    history: QueryHistory,
    suggestion_limit: usize,
    preview_chars: usize,
}

impl<M: FuzzySearch> QueryResolver<M> {
    pub fn new(corpus: Corpus, vocabulary: Vocabulary) -> Self {
        Self::with_options(corpus, vocabulary, ResolverOptions::default())
    }

    pub fn with_options(corpus: Corpus, vocabulary: Vocabulary, options: ResolverOptions) -> Self {
        let threshold = clamp_threshold(options.confidence_threshold);
        let index = build_index::<M>(&corpus, &vocabulary, threshold, options.preview_chars);
        Self {
            corpus,
            vocabulary,
            index,
            threshold,
            history: QueryHistory::new(options.max_history),
            suggestion_limit: options.suggestion_limit.max(1),
            preview_chars: options.preview_chars,
        }
    }

    /// Resolve `query`, recording it in history either way.
    pub fn parse_query(&mut self, query: &str) -> Option<SearchResult> {
        let normalized = self.normalize(query);
        let result = if normalized.is_empty() {
            None
        } else {
            self.resolve(&normalized)
        };

        match &result {
            Some(r) => {
                debug!(query, kind = r.kind.as_str(), confidence = r.confidence, "resolved query");
                self.history.record(query, Some(r.kind.as_str()));
            }
            None => {
                debug!(query, normalized = %normalized, "no match");
                self.history.record(query, None);
            }
        }
        result
    }

    fn resolve(&self, normalized: &str) -> Option<SearchResult> {
        if self.is_help_query(normalized) {
            return Some(help_result());
        }
        if let Some(r) = self.match_module_pattern(normalized) {
            return Some(r);
        }
        if let Some(r) = self.match_section_pattern(normalized) {
            return Some(r);
        }
        if let Some(r) = self.match_tool_keyword(normalized) {
            return Some(r);
        }
        if let Some(r) = resolve_phrase(normalized, &self.vocabulary.common_phrases, &self.corpus) {
            return Some(r);
        }
        self.fuzzy_resolve(normalized)
    }

    fn is_help_query(&self, query: &str) -> bool {
        self.vocabulary
            .help_phrases
            .iter()
            .any(|p| query.contains(p.as_str()))
    }

    fn match_module_pattern(&self, query: &str) -> Option<SearchResult> {
        let digits = MODULE_RE.captures(query)?.get(1)?.as_str();
        let number = format!("{:0>2}", digits);
        let module = self.corpus.module_by_number(&number)?;
        Some(module_result(module, 1.0))
    }

    fn match_section_pattern(&self, query: &str) -> Option<SearchResult> {
        let id = SECTION_RE.captures(query)?.get(1)?.as_str();
        let (module, section) = self.corpus.section(id)?;
        Some(section_result(module, section, 1.0))
    }

    fn match_tool_keyword(&self, query: &str) -> Option<SearchResult> {
        for entry in &self.vocabulary.tool_keywords {
            if !entry.keywords.iter().any(|k| query.contains(k.as_str())) {
                continue;
            }
            match self.corpus.tool(&entry.tool_id) {
                Some(tool) => return Some(tool_result(&self.corpus, tool, 1.0)),
                None => warn!(tool_id = %entry.tool_id, "tool keyword names unknown tool"),
            }
        }
        None
    }

    fn fuzzy_resolve(&self, query: &str) -> Option<SearchResult> {
        let hits = self.index.search(query, None);
        let best = hits.first()?;
        let confidence = 1.0 - best.score;
        if confidence < 1.0 - self.threshold {
            debug!(id = %best.item.id, confidence, "best fuzzy hit below confidence gate");
            return None;
        }

        let mut result = self.result_for_entry(best.item, confidence)?;
        result.match_details = Some(match_details(best, &hits));
        Some(result)
    }

    fn result_for_entry(&self, entry: &IndexEntry, confidence: f64) -> Option<SearchResult> {
        match entry.kind {
            EntryKind::Section => {
                let id = entry.section_id.as_deref()?;
                let (module, section) = self.corpus.section(id)?;
                Some(section_result(module, section, confidence))
            }
            EntryKind::Module => {
                let module = self.corpus.module_by_id(&entry.id)?;
                Some(module_result(module, confidence))
            }
            EntryKind::Tool => {
                let tool = self.corpus.tool(&entry.id)?;
                Some(tool_result(&self.corpus, tool, confidence))
            }
            EntryKind::Content => None,
        }
    }

    /// Up to `suggestion_limit` distinct completions for a partial query.
    ///
    /// Sources, in order: top fuzzy hits phrased by kind, modules whose
    /// title or number contains the input, tools whose name contains it,
    /// then matching concepts. Inputs shorter than two chars get nothing.
    pub fn get_suggestions(&self, partial: &str) -> Vec<String> {
        let needle = partial.trim().to_lowercase();
        if needle.chars().count() < MIN_SUGGESTION_CHARS {
            return Vec::new();
        }

        let mut suggestions: Vec<String> = Vec::new();

        for hit in self.index.search(&needle, Some(self.suggestion_limit)) {
            let title = &hit.item.title;
            match hit.item.kind {
                EntryKind::Module => suggestions.push(format!("Tell me about {}", title)),
                EntryKind::Section => suggestions.push(format!("Explain {}", title)),
                EntryKind::Tool => suggestions.push(format!("How do I use {}?", title)),
                EntryKind::Content => {}
            }
        }

        for module in &self.corpus.modules {
            if module.title.to_lowercase().contains(&needle) || module.number.contains(&needle) {
                suggestions.push(format!("Tell me about module {}", module.number));
                suggestions.push(format!("What is {}?", module.title));
            }
        }

        for tool in &self.corpus.tools {
            if tool.name.to_lowercase().contains(&needle) {
                suggestions.push(format!("How do I use {}?", tool.name));
                suggestions.push(format!("What is {}?", tool.name));
            }
        }

        for concept in &self.vocabulary.concepts {
            if concept.name.contains(&needle) {
                suggestions.push(concept.query.clone());
            }
        }

        let mut unique: Vec<String> = Vec::with_capacity(self.suggestion_limit);
        for s in suggestions {
            if !unique.contains(&s) {
                unique.push(s);
                if unique.len() == self.suggestion_limit {
                    break;
                }
            }
        }
        unique
    }

    /// Set the fuzzy threshold (clamped to `[0, 1]`) and rebuild the index.
    /// `NaN` is ignored.
    pub fn set_confidence_threshold(&mut self, threshold: f64) {
        if threshold.is_nan() {
            warn!("ignoring NaN confidence threshold");
            return;
        }
        self.threshold = clamp_threshold(threshold);
        self.rebuild_index();
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.threshold
    }

    /// Copy of the history, newest first.
    pub fn query_history(&self) -> Vec<QueryHistoryEntry> {
        self.history.entries().to_vec()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn context_aware_suggestions(&self, query: &str) -> Vec<String> {
        self.history.context_suggestions(query)
    }

    /// Rebuild the index from the current corpus and vocabulary.
    pub fn rebuild_index(&mut self) {
        self.index = build_index::<M>(
            &self.corpus,
            &self.vocabulary,
            self.threshold,
            self.preview_chars,
        );
    }

    /// Swap in a new corpus and rebuild. History is kept.
    pub fn replace_corpus(&mut self, corpus: Corpus) {
        self.corpus = corpus;
        self.rebuild_index();
    }

    /// Normalize `raw` with this resolver's vocabulary.
    pub fn normalize(&self, raw: &str) -> String {
        normalize(raw, &self.vocabulary)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The indexed entries, in index order.
    pub fn entries(&self) -> &[IndexEntry] {
        self.index.entries()
    }
}

fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        return DEFAULT_THRESHOLD;
    }
    let clamped = threshold.clamp(0.0, 1.0);
    if clamped != threshold {
        warn!(requested = threshold, clamped, "confidence threshold out of range");
    }
    clamped
}

fn build_index<M: FuzzySearch>(
    corpus: &Corpus,
    vocabulary: &Vocabulary,
    threshold: f64,
    preview_chars: usize,
) -> M {
    let entries = IndexBuilder::new(vocabulary)
        .preview_chars(preview_chars)
        .build(corpus);
    info!(entries = entries.len(), threshold, "built search index");
    M::build(
        entries,
        FuzzyOptions {
            threshold,
            stop_words: vocabulary.stop_words.clone(),
            ..FuzzyOptions::default()
        },
    )
}

fn match_details(best: &FuzzyHit<'_>, hits: &[FuzzyHit<'_>]) -> MatchDetails {
    let mut matched_terms: Vec<String> = Vec::new();
    for m in &best.matches {
        if !matched_terms.contains(&m.value) {
            matched_terms.push(m.value.clone());
        }
    }
    MatchDetails {
        matched_terms,
        score: best.score,
        fuzzy_matches: hits
            .iter()
            .take(FUZZY_MATCHES_REPORTED)
            .map(|h| h.item.title.clone())
            .collect(),
    }
}
