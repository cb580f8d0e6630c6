//! Curriculum loading.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use academy_search_core::models::Corpus;
use academy_search_core::resolver::QueryResolver;

use crate::config::{load_vocabulary, Config};

/// Read and parse the curriculum JSON file.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read curriculum file: {}", path.display()))?;
    let corpus = Corpus::from_json(&content)
        .with_context(|| format!("Invalid curriculum file: {}", path.display()))?;

    if corpus.is_empty() {
        warn!(path = %path.display(), "curriculum has no modules or tools");
    }
    info!(
        modules = corpus.modules.len(),
        sections = corpus.section_count(),
        tools = corpus.tools.len(),
        "loaded curriculum"
    );
    Ok(corpus)
}

/// Load the configured corpus and vocabulary and build a resolver over them.
pub fn build_resolver(config: &Config) -> Result<QueryResolver> {
    let corpus = load_corpus(&config.corpus.path)?;
    let vocabulary = load_vocabulary(config)?;
    Ok(QueryResolver::with_options(
        corpus,
        vocabulary,
        config.resolver_options(),
    ))
}
