//! Result synthesis.
//!
//! Turns a resolved module, section, tool, or help request into a uniform
//! [`SearchResult`]. Synthesis never fails; confidence passes through
//! unchanged.

use serde::Serialize;

use crate::models::{Corpus, Module, Section, Tool};

/// What a [`SearchResult`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Module,
    Section,
    Tool,
    Help,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Module => "module",
            ResultKind::Section => "section",
            ResultKind::Tool => "tool",
            ResultKind::Help => "help",
        }
    }
}

/// Diagnostics attached to fuzzy-resolved results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetails {
    /// Distinct field values the query matched in, first occurrence first.
    pub matched_terms: Vec<String>,
    /// Raw fuzzy score of the accepted hit (`0.0` is exact).
    pub score: f64,
    /// Titles of the top three candidates.
    pub fuzzy_matches: Vec<String>,
}

/// A resolved answer to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub kind: ResultKind,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<Module>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<Tool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_sections: Vec<Section>,
    pub suggestions: Vec<String>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_details: Option<MatchDetails>,
}

pub fn module_result(module: &Module, confidence: f64) -> SearchResult {
    let section_list = module
        .sections
        .iter()
        .map(|s| format!("  {}: {}", s.id, s.title))
        .collect::<Vec<_>>()
        .join("\n");

    SearchResult {
        kind: ResultKind::Module,
        title: format!("📚 {}", module.title),
        content: format!(
            "{}\n\n{}\n\n**Duration:** {}\n**Sections:**\n{}",
            module.subtitle, module.objective, module.duration, section_list
        ),
        module: Some(module.clone()),
        section: None,
        tool: None,
        related_sections: Vec::new(),
        suggestions: module
            .sections
            .iter()
            .take(3)
            .map(|s| format!("Tell me about {}", s.title))
            .collect(),
        confidence,
        match_details: None,
    }
}

/// Section result with the full body. Related sections are the immediate
/// neighbours within the owning module.
pub fn section_result(module: &Module, section: &Section, confidence: f64) -> SearchResult {
    let position = module.sections.iter().position(|s| s.id == section.id);

    let (related_sections, next) = match position {
        Some(i) => {
            let start = i.saturating_sub(1);
            let end = (i + 2).min(module.sections.len());
            let related: Vec<Section> = module.sections[start..end]
                .iter()
                .filter(|s| s.id != section.id)
                .cloned()
                .collect();
            (related, module.sections.get(i + 1))
        }
        None => (Vec::new(), None),
    };

    let mut suggestions = vec![format!("cat {}", section.id)];
    if let Some(first) = related_sections.first() {
        suggestions.push(format!("Tell me about {}", first.title));
    }
    if let Some(next) = next {
        suggestions.push(format!("Next: {}", next.title));
    }

    SearchResult {
        kind: ResultKind::Section,
        title: format!("📖 {}", section.title),
        content: section.content.clone(),
        module: Some(module.clone()),
        section: Some(section.clone()),
        tool: None,
        related_sections,
        suggestions,
        confidence,
        match_details: None,
    }
}

/// Tool result. Related sections are the first three sections (corpus order)
/// that list the tool.
pub fn tool_result(corpus: &Corpus, tool: &Tool, confidence: f64) -> SearchResult {
    let related_sections: Vec<Section> = corpus
        .sections_using_tool(&tool.id)
        .take(3)
        .cloned()
        .collect();
    let suggestions = related_sections
        .iter()
        .take(2)
        .map(|s| format!("Learn about {}", s.title))
        .collect();

    SearchResult {
        kind: ResultKind::Tool,
        title: format!("🔧 {}", tool.name),
        content: format!(
            "{}\n\n**Category:** {}\n**Tier:** {}",
            tool.description,
            tool.category,
            tool.tier.label()
        ),
        module: None,
        section: None,
        tool: Some(tool.clone()),
        related_sections,
        suggestions,
        confidence,
        match_details: None,
    }
}

const HELP_BODY: &str = r#"You can ask me naturally about the curriculum:

**About Modules:**
- "What is the shift mindset?"
- "Tell me about module 2"
- "Explain the environment setup"

**About Tools:**
- "How do I use Cursor?"
- "What is Claude Code?"
- "Tell me about APEX Intel"

**About Concepts:**
- "Explain orchestration"
- "What are context windows?"
- "Tell me about the cost-quality-speed triangle"

**Navigation:**
- "Show me section 01.2"
- "What tools do I need for module 3?"
- "How do I set up debugging?"

**Configuration:**
- "What is CLAUDE.md?"
- "How do I configure Cursor?"
- "Explain AGENTS.md"

**Fuzzy Matching Features:**
- Typo tolerance (e.g., "cursr" → "cursor")
- Synonym support (e.g., "show", "display", "view")
- Partial matching (e.g., "modul 1" → "module 1")

Try asking naturally!"#;

pub fn help_result() -> SearchResult {
    SearchResult {
        kind: ResultKind::Help,
        title: "🤖 Natural Language Help".to_string(),
        content: HELP_BODY.to_string(),
        module: None,
        section: None,
        tool: None,
        related_sections: Vec::new(),
        suggestions: vec![
            "What is the shift mindset?".to_string(),
            "How do I use Cursor?".to_string(),
            "Tell me about module 1".to_string(),
            "Explain orchestration".to_string(),
        ],
        confidence: 1.0,
        match_details: None,
    }
}
