//! Weighted multi-field fuzzy matching over index entries.
//!
//! The resolver talks to the matcher only through the [`FuzzySearch`] trait,
//! so a different approximate-matching backend can be dropped in without
//! touching resolution logic. The bundled implementation is
//! [`WeightedFieldIndex`].
//!
//! # Scoring
//!
//! 1. Lower-case and whitespace-split the query. Tokens shorter than
//!    `min_match_len` chars and stop words are ignored.
//! 2. For each token `t` and field `f`, `d(t, f)` is the best edit distance
//!    between `t` and any substring of the field text (for list fields, of
//!    any element), divided by `t`'s length and capped at `1.0`.
//! 3. The pair matches when `d(t, f) <= threshold`.
//! 4. `quality = Σ_t Σ_f [match] · w_f · (1 − d(t, f)) / (|T| · Σ_f w_f)`,
//!    and `score = 1 − quality` (`0.0` is a perfect hit).
//! 5. Entries with at least one matching pair are returned, best score
//!    first, ties in index order.
//!
//! A larger threshold can only add matching pairs, so an entry's score never
//! rises and the candidate set never shrinks as the threshold grows.

use std::collections::HashSet;

use serde::Serialize;

use crate::index::IndexEntry;
use crate::levenshtein::substring_distance;

/// Default distance threshold (lower = stricter).
pub const DEFAULT_THRESHOLD: f64 = 0.4;
/// Default minimum token length, in chars.
pub const DEFAULT_MIN_MATCH_LEN: usize = 2;

/// A searchable field of an [`IndexEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Keywords,
    Content,
    Synonyms,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Keywords, Field::Content, Field::Synonyms];
}

/// Relative importance of each field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub title: f64,
    pub keywords: f64,
    pub content: f64,
    pub synonyms: f64,
}

impl FieldWeights {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title,
            Field::Keywords => self.keywords,
            Field::Content => self.content,
            Field::Synonyms => self.synonyms,
        }
    }

    pub fn total(&self) -> f64 {
        self.title + self.keywords + self.content + self.synonyms
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 0.40,
            keywords: 0.35,
            content: 0.20,
            synonyms: 0.05,
        }
    }
}

/// Build-time options for a fuzzy index.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOptions {
    /// Maximum normalized distance for a token to count as matching a field.
    pub threshold: f64,
    pub min_match_len: usize,
    pub weights: FieldWeights,
    pub stop_words: Vec<String>,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_match_len: DEFAULT_MIN_MATCH_LEN,
            weights: FieldWeights::default(),
            stop_words: Vec::new(),
        }
    }
}

/// One (token, field) pair that matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMatch {
    pub field: Field,
    /// The query token.
    pub term: String,
    /// The field value (or list element) the token matched in.
    pub value: String,
    /// Normalized distance in `[0, 1]`.
    pub distance: f64,
}

/// A ranked candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyHit<'a> {
    pub item: &'a IndexEntry,
    /// `0.0` is an exact hit, `1.0` no match at all.
    pub score: f64,
    pub matches: Vec<FieldMatch>,
}

/// Approximate search over a fixed set of entries.
///
/// Implementations are built wholesale from a list of entries and never
/// mutated incrementally; changing options means building a new index.
pub trait FuzzySearch {
    /// Build an index over `entries`.
    fn build(entries: Vec<IndexEntry>, options: FuzzyOptions) -> Self
    where
        Self: Sized;

    /// Ranked best-effort candidates for `query`, best first. `limit`
    /// truncates the list.
    fn search(&self, query: &str, limit: Option<usize>) -> Vec<FuzzyHit<'_>>;

    /// The indexed entries, in index order.
    fn entries(&self) -> &[IndexEntry];

    fn options(&self) -> &FuzzyOptions;
}

/// Field text pre-split into chars for the distance routine.
struct PreparedText {
    raw: String,
    chars: Vec<char>,
}

impl PreparedText {
    fn new(text: &str) -> Self {
        let raw = text.to_lowercase();
        let chars = raw.chars().collect();
        Self { raw, chars }
    }
}

struct PreparedEntry {
    title: PreparedText,
    keywords: Vec<PreparedText>,
    content: PreparedText,
    synonyms: Vec<PreparedText>,
}

impl PreparedEntry {
    fn new(entry: &IndexEntry) -> Self {
        Self {
            title: PreparedText::new(&entry.title),
            keywords: entry.keywords.iter().map(|k| PreparedText::new(k)).collect(),
            content: PreparedText::new(&entry.content),
            synonyms: entry.synonyms.iter().map(|s| PreparedText::new(s)).collect(),
        }
    }

    fn texts(&self, field: Field) -> &[PreparedText] {
        match field {
            Field::Title => std::slice::from_ref(&self.title),
            Field::Keywords => &self.keywords,
            Field::Content => std::slice::from_ref(&self.content),
            Field::Synonyms => &self.synonyms,
        }
    }
}

/// The bundled [`FuzzySearch`] implementation; see the module docs for the
/// scoring rules.
pub struct WeightedFieldIndex {
    entries: Vec<IndexEntry>,
    prepared: Vec<PreparedEntry>,
    stop_words: HashSet<String>,
    options: FuzzyOptions,
}

impl WeightedFieldIndex {
    fn query_tokens(&self, query: &str) -> Vec<Vec<char>> {
        let mut tokens: Vec<Vec<char>> = Vec::new();
        for word in query.to_lowercase().split_whitespace() {
            if word.chars().count() < self.options.min_match_len || self.stop_words.contains(word) {
                continue;
            }
            let chars: Vec<char> = word.chars().collect();
            if !tokens.contains(&chars) {
                tokens.push(chars);
            }
        }
        tokens
    }

    /// Best (distance, value) for `token` across the texts of one field.
    fn best_in_field<'p>(token: &[char], texts: &'p [PreparedText]) -> Option<(f64, &'p str)> {
        let mut best: Option<(f64, &str)> = None;
        for text in texts {
            let d = substring_distance(token, &text.chars) as f64 / token.len() as f64;
            let d = d.min(1.0);
            if best.map_or(true, |(b, _)| d < b) {
                best = Some((d, text.raw.as_str()));
            }
        }
        best
    }
}

impl FuzzySearch for WeightedFieldIndex {
    fn build(entries: Vec<IndexEntry>, options: FuzzyOptions) -> Self {
        let prepared = entries.iter().map(PreparedEntry::new).collect();
        let stop_words = options.stop_words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            entries,
            prepared,
            stop_words,
            options,
        }
    }

    fn search(&self, query: &str, limit: Option<usize>) -> Vec<FuzzyHit<'_>> {
        let tokens = self.query_tokens(query);
        let total_weight = self.options.weights.total();
        if tokens.is_empty() || total_weight <= 0.0 {
            return Vec::new();
        }
        let denominator = tokens.len() as f64 * total_weight;

        let mut hits: Vec<FuzzyHit<'_>> = Vec::new();
        for (entry, prepared) in self.entries.iter().zip(&self.prepared) {
            let mut quality = 0.0;
            let mut matches = Vec::new();

            for token in &tokens {
                for field in Field::ALL {
                    let weight = self.options.weights.get(field);
                    let Some((d, value)) = Self::best_in_field(token, prepared.texts(field)) else {
                        continue;
                    };
                    if d <= self.options.threshold {
                        quality += weight * (1.0 - d);
                        matches.push(FieldMatch {
                            field,
                            term: token.iter().collect(),
                            value: value.to_string(),
                            distance: d,
                        });
                    }
                }
            }

            if !matches.is_empty() {
                let score = (1.0 - quality / denominator).clamp(0.0, 1.0);
                hits.push(FuzzyHit {
                    item: entry,
                    score,
                    matches,
                });
            }
        }

        // stable: equal scores keep index order
        hits.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(limit) = limit {
            hits.truncate(limit);
        }
        hits
    }

    fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    fn options(&self) -> &FuzzyOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;
    use crate::testing::sample_corpus;
    use crate::vocabulary::Vocabulary;

    fn index_with(threshold: f64) -> WeightedFieldIndex {
        let vocab = Vocabulary::default();
        let entries = IndexBuilder::new(&vocab).build(&sample_corpus());
        WeightedFieldIndex::build(
            entries,
            FuzzyOptions {
                threshold,
                stop_words: vocab.stop_words.clone(),
                ..FuzzyOptions::default()
            },
        )
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((FieldWeights::default().total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_title_ranks_first() {
        let index = index_with(DEFAULT_THRESHOLD);
        let hits = index.search("multi agent architecture", None);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].item.id, "03.1");
        assert!(hits[0].score < 0.1, "score was {}", hits[0].score);
    }

    #[test]
    fn test_typo_tolerated() {
        let index = index_with(DEFAULT_THRESHOLD);
        let hits = index.search("certificaton", Some(3));
        assert_eq!(hits[0].item.id, "05.2");
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn test_scores_sorted_and_bounded() {
        let index = index_with(DEFAULT_THRESHOLD);
        let hits = index.search("parallel agents dashboard", None);
        for w in hits.windows(2) {
            assert!(w[0].score <= w[1].score);
        }
        for h in &hits {
            assert!((0.0..=1.0).contains(&h.score));
        }
    }

    #[test]
    fn test_limit() {
        let index = index_with(DEFAULT_THRESHOLD);
        assert!(index.search("agent", Some(2)).len() <= 2);
    }

    #[test]
    fn test_short_and_stop_tokens_ignored() {
        let index = index_with(DEFAULT_THRESHOLD);
        assert!(index.search("a", None).is_empty());
        assert!(index.search("tell me about the", None).is_empty());
        assert!(index.search("   ", None).is_empty());
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = WeightedFieldIndex::build(Vec::new(), FuzzyOptions::default());
        assert!(index.search("cursor", None).is_empty());
    }

    #[test]
    fn test_matches_record_terms() {
        let index = index_with(DEFAULT_THRESHOLD);
        let hits = index.search("certification", Some(1));
        let m = &hits[0].matches;
        assert!(m.iter().any(|fm| fm.field == Field::Title && fm.term == "certification"));
        assert!(m.iter().all(|fm| fm.distance <= DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_threshold_never_hurts_scores() {
        let strict = index_with(0.1);
        let loose = index_with(0.6);
        for q in ["orchestraton", "debuging workflow", "mindsets", "video asset"] {
            let s = strict.search(q, None);
            let l = loose.search(q, None);
            assert!(l.len() >= s.len(), "{}", q);
            if let (Some(a), Some(b)) = (s.first(), l.first()) {
                assert!(b.score <= a.score + 1e-12, "{}", q);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let index = index_with(DEFAULT_THRESHOLD);
        let a: Vec<(String, f64)> = index
            .search("context window", None)
            .iter()
            .map(|h| (h.item.id.clone(), h.score))
            .collect();
        let b: Vec<(String, f64)> = index
            .search("context window", None)
            .iter()
            .map(|h| (h.item.id.clone(), h.score))
            .collect();
        assert_eq!(a, b);
    }
}
