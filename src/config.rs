//! Configuration parsing and validation.
//!
//! Academy Search is configured via a TOML file (default:
//! `config/academy.toml`). Every field has a default, so an empty file is a
//! valid configuration. See `config/academy.example.toml` for all settings.
//!
//! # Example
//!
//! ```toml
//! [corpus]
//! path = "./data/curriculum.json"
//!
//! [search]
//! confidence_threshold = 0.4
//! max_history = 50
//! suggestion_limit = 5
//! preview_chars = 500
//!
//! [vocabulary]
//! path = "./config/vocabulary.toml"
//! ```
//!
//! # Validation
//!
//! [`load_config`] rejects zero-valued limits. An out-of-range
//! `confidence_threshold` is clamped to `[0.0, 1.0]` with a warning.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use academy_search_core::resolver::ResolverOptions;
use academy_search_core::vocabulary::Vocabulary;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Curriculum JSON file.
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
        }
    }
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("./data/curriculum.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Fuzzy distance threshold; lower is stricter.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    /// Section body chars copied into the search index.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            max_history: default_max_history(),
            suggestion_limit: default_suggestion_limit(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_confidence_threshold() -> f64 {
    0.4
}
fn default_max_history() -> usize {
    50
}
fn default_suggestion_limit() -> usize {
    5
}
fn default_preview_chars() -> usize {
    500
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VocabularyConfig {
    /// Optional TOML file overriding the built-in vocabulary tables.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Defaults for every section. Used when no config file exists.
    pub fn minimal() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            search: SearchConfig::default(),
            vocabulary: VocabularyConfig::default(),
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            confidence_threshold: self.search.confidence_threshold,
            max_history: self.search.max_history,
            suggestion_limit: self.search.suggestion_limit,
            preview_chars: self.search.preview_chars,
        }
    }
}

/// Read, parse, and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&mut config)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields [`Config::minimal`].
/// A file that exists but fails to parse or validate is still an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::minimal());
    }
    load_config(path)
}

fn validate(config: &mut Config) -> Result<()> {
    let threshold = config.search.confidence_threshold;
    if threshold.is_nan() {
        anyhow::bail!("search.confidence_threshold must be a number");
    }
    if !(0.0..=1.0).contains(&threshold) {
        let clamped = threshold.clamp(0.0, 1.0);
        warn!(
            requested = threshold,
            clamped, "search.confidence_threshold out of range, clamping"
        );
        config.search.confidence_threshold = clamped;
    }

    if config.search.max_history < 1 {
        anyhow::bail!("search.max_history must be >= 1");
    }
    if config.search.suggestion_limit < 1 {
        anyhow::bail!("search.suggestion_limit must be >= 1");
    }
    if config.search.preview_chars < 1 {
        anyhow::bail!("search.preview_chars must be >= 1");
    }

    Ok(())
}

/// The vocabulary named by the config, or the built-in tables.
///
/// Tables missing from the override file keep their defaults. Term patterns
/// are compiled up front so a bad regex fails here rather than being skipped
/// at index time.
pub fn load_vocabulary(config: &Config) -> Result<Vocabulary> {
    let Some(path) = &config.vocabulary.path else {
        return Ok(Vocabulary::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read vocabulary file: {}", path.display()))?;
    let mut vocabulary: Vocabulary = toml::from_str(&content)
        .with_context(|| format!("Failed to parse vocabulary file: {}", path.display()))?;

    vocabulary
        .compile_term_patterns()
        .with_context(|| format!("Invalid vocabulary file: {}", path.display()))?;
    normalize_vocabulary(&mut vocabulary)
        .with_context(|| format!("Invalid vocabulary file: {}", path.display()))?;

    Ok(vocabulary)
}

/// Lower-case every key matched against the (lower-cased) query and reject
/// blank ones. An empty key is a substring of every query.
fn normalize_vocabulary(vocabulary: &mut Vocabulary) -> Result<()> {
    for phrase in &mut vocabulary.help_phrases {
        lower_key("help_phrases", phrase)?;
    }
    for word in &mut vocabulary.stop_words {
        lower_key("stop_words", word)?;
    }
    for entry in &mut vocabulary.spell_corrections {
        lower_key("spell_corrections.misspelling", &mut entry.misspelling)?;
        lower_key("spell_corrections.correction", &mut entry.correction)?;
    }
    for group in &mut vocabulary.command_synonyms {
        lower_key("command_synonyms.canonical", &mut group.canonical)?;
        for synonym in &mut group.synonyms {
            lower_key("command_synonyms.synonyms", synonym)?;
        }
    }
    for mapping in &mut vocabulary.common_phrases {
        lower_key("common_phrases.phrase", &mut mapping.phrase)?;
    }
    for entry in &mut vocabulary.tool_keywords {
        for keyword in &mut entry.keywords {
            lower_key("tool_keywords.keywords", keyword)?;
        }
    }
    for trigger in &mut vocabulary.synonym_triggers {
        lower_key("synonym_triggers.trigger", &mut trigger.trigger)?;
    }
    for concept in &mut vocabulary.concepts {
        lower_key("concepts.name", &mut concept.name)?;
    }
    if vocabulary.term_patterns.iter().any(|p| p.is_empty()) {
        anyhow::bail!("term_patterns entries must be non-empty");
    }
    Ok(())
}

fn lower_key(table: &str, value: &mut String) -> Result<()> {
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() {
        anyhow::bail!("{} entries must be non-empty", table);
    }
    if lowered != *value {
        warn!(table, from = %value, to = %lowered, "lower-casing vocabulary entry");
        *value = lowered;
    }
    Ok(())
}
