//! Search index construction.
//!
//! Flattens a [`Corpus`] into a uniform list of [`IndexEntry`] values, one per
//! module, section, and tool, each carrying synthesized keywords and
//! synonyms. The builder is a pure function of the corpus and vocabulary; it
//! never fails, and an empty corpus yields an empty index.
//!
//! # Keywords
//!
//! | Kind | Keywords |
//! |------|----------|
//! | module | number, title, subtitle, their words, `module`, `phase` |
//! | section | id, title, title words, extracted domain terms, `section` |
//! | tool | id, name, name words, category, tier, `tool` |

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::models::{Corpus, Module, Section, Tool};
use crate::vocabulary::Vocabulary;

/// Default number of body characters kept in a section entry's content.
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Discriminant of an [`IndexEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Module,
    Section,
    Tool,
    Content,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Module => "module",
            EntryKind::Section => "section",
            EntryKind::Tool => "tool",
            EntryKind::Content => "content",
        }
    }
}

/// One searchable item derived from the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub id: String,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    pub synonyms: Vec<String>,
}

/// Builds [`IndexEntry`] lists from a corpus using one vocabulary.
pub struct IndexBuilder<'a> {
    vocabulary: &'a Vocabulary,
    term_patterns: Vec<Regex>,
    preview_chars: usize,
}

impl<'a> IndexBuilder<'a> {
    /// Create a builder. Term patterns that fail to compile are skipped
    /// with a warning; callers that need strict validation should use
    /// [`Vocabulary::compile_term_patterns`] up front.
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        let term_patterns = vocabulary
            .term_patterns
            .iter()
            .filter_map(|p| {
                match regex::RegexBuilder::new(p).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(pattern = %p, error = %e, "skipping invalid term pattern");
                        None
                    }
                }
            })
            .collect();
        Self {
            vocabulary,
            term_patterns,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Override the section preview length (in chars).
    pub fn preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Flatten the corpus: every module followed by its sections, then every
    /// tool.
    pub fn build(&self, corpus: &Corpus) -> Vec<IndexEntry> {
        let mut entries = Vec::with_capacity(
            corpus.modules.len() + corpus.section_count() + corpus.tools.len(),
        );
        for module in &corpus.modules {
            entries.push(self.module_entry(module));
            for section in &module.sections {
                entries.push(self.section_entry(module, section));
            }
        }
        for tool in &corpus.tools {
            entries.push(self.tool_entry(tool));
        }
        entries
    }

    fn module_entry(&self, module: &Module) -> IndexEntry {
        let title = module.title.to_lowercase();
        let subtitle = module.subtitle.to_lowercase();

        let mut keywords = vec![module.number.clone(), title.clone(), subtitle.clone()];
        keywords.extend(title.split_whitespace().map(str::to_string));
        keywords.extend(subtitle.split_whitespace().map(str::to_string));
        keywords.push("module".into());
        keywords.push("phase".into());

        IndexEntry {
            id: module.id.clone(),
            kind: EntryKind::Module,
            module_id: None,
            section_id: None,
            title: module.title.clone(),
            content: format!("{} {} {}", module.title, module.subtitle, module.objective),
            keywords: finish_keywords(keywords, &module.id, &module.title),
            tools: Vec::new(),
            synonyms: self.synonyms_for(&module.title),
        }
    }

    fn section_entry(&self, module: &Module, section: &Section) -> IndexEntry {
        let title = section.title.to_lowercase();

        let mut keywords = vec![section.id.clone(), title.clone()];
        keywords.extend(title.split_whitespace().map(str::to_string));
        keywords.extend(self.extract_key_terms(&section.content));
        keywords.push("section".into());

        IndexEntry {
            id: section.id.clone(),
            kind: EntryKind::Section,
            module_id: Some(module.id.clone()),
            section_id: Some(section.id.clone()),
            title: section.title.clone(),
            content: format!(
                "{} {}",
                section.title,
                content_preview(&section.content, self.preview_chars)
            ),
            keywords: finish_keywords(keywords, &section.id, &section.title),
            tools: section.tools.clone(),
            synonyms: self.synonyms_for(&section.title),
        }
    }

    fn tool_entry(&self, tool: &Tool) -> IndexEntry {
        let name = tool.name.to_lowercase();

        let mut keywords = vec![tool.id.clone(), name.clone()];
        keywords.extend(name.split_whitespace().map(str::to_string));
        keywords.push(tool.category.to_lowercase());
        keywords.push(tool.tier.as_str().to_string());
        keywords.push("tool".into());

        IndexEntry {
            id: tool.id.clone(),
            kind: EntryKind::Tool,
            module_id: None,
            section_id: None,
            title: tool.name.clone(),
            content: format!("{} {} {}", tool.name, tool.description, tool.category),
            keywords: finish_keywords(keywords, &tool.id, &tool.name),
            tools: Vec::new(),
            synonyms: self.synonyms_for(&tool.name),
        }
    }

    /// Unique, lower-cased domain terms found in `content`, in pattern order.
    pub fn extract_key_terms(&self, content: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for pattern in &self.term_patterns {
            for m in pattern.find_iter(content) {
                let term = m.as_str().to_lowercase();
                if !terms.contains(&term) {
                    terms.push(term);
                }
            }
        }
        terms
    }

    /// Synonyms triggered by substrings of `text` (case-insensitive).
    pub fn synonyms_for(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut synonyms: Vec<String> = Vec::new();
        for trigger in &self.vocabulary.synonym_triggers {
            if lower.contains(&trigger.trigger) {
                for s in &trigger.synonyms {
                    if !synonyms.contains(s) {
                        synonyms.push(s.clone());
                    }
                }
            }
        }
        synonyms
    }
}

/// Strip markdown punctuation, keep the first `max_chars` chars, lower-case.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    content
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`'))
        .take(max_chars)
        .collect::<String>()
        .to_lowercase()
}

/// Drop empty and duplicate keywords, keeping first occurrences. Falls back
/// to the id and lower-cased title so the list is never empty.
fn finish_keywords(keywords: Vec<String>, id: &str, title: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for k in keywords {
        if !k.is_empty() && !out.contains(&k) {
            out.push(k);
        }
    }
    if out.is_empty() {
        for k in [id.to_string(), title.to_lowercase()] {
            if !k.is_empty() && !out.contains(&k) {
                out.push(k);
            }
        }
    }
    if out.is_empty() {
        out.push(id.to_string());
    }
    out
}
