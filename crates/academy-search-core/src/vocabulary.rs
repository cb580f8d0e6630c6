//! Hand-curated vocabulary tables that tune the resolver to one corpus.
//!
//! Every table is ordered: iteration order decides which rule wins when more
//! than one applies, so tables are `Vec`s rather than maps. All tables can be
//! overridden from a TOML file (see the `academy-search` crate's config);
//! fields missing from the override fall back to the built-in defaults.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A misspelling and the word that replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellCorrection {
    pub misspelling: String,
    pub correction: String,
}

/// A canonical command word and the words that mean the same thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub canonical: String,
    pub synonyms: Vec<String>,
}

/// A query phrase mapped to candidate section, tool, or module ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseMapping {
    pub phrase: String,
    pub ids: Vec<String>,
}

/// Keywords that name a tool outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolKeywords {
    pub tool_id: String,
    pub keywords: Vec<String>,
}

/// Synonyms attached to an index entry whose title contains `trigger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymTrigger {
    pub trigger: String,
    pub synonyms: Vec<String>,
}

/// A named concept offered as an autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub query: String,
}

/// All tables consumed by the index builder, normalizer, and resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub spell_corrections: Vec<SpellCorrection>,
    pub command_synonyms: Vec<SynonymGroup>,
    pub common_phrases: Vec<PhraseMapping>,
    pub tool_keywords: Vec<ToolKeywords>,
    pub synonym_triggers: Vec<SynonymTrigger>,
    /// Regex sources matched case-insensitively against section bodies.
    pub term_patterns: Vec<String>,
    pub help_phrases: Vec<String>,
    /// Query tokens ignored by the fuzzy index.
    pub stop_words: Vec<String>,
    pub concepts: Vec<Concept>,
}

impl Vocabulary {
    /// Compile `term_patterns` case-insensitively, failing on the first
    /// invalid pattern.
    pub fn compile_term_patterns(&self) -> Result<Vec<Regex>> {
        self.term_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("Invalid term pattern: {}", p))
            })
            .collect()
    }

    /// Look up the correction for an exact misspelling.
    pub fn correction_for(&self, word: &str) -> Option<&str> {
        self.spell_corrections
            .iter()
            .find(|c| c.misspelling == word)
            .map(|c| c.correction.as_str())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn corrections(pairs: &[(&str, &str)]) -> Vec<SpellCorrection> {
    pairs
        .iter()
        .map(|(m, c)| SpellCorrection {
            misspelling: m.to_string(),
            correction: c.to_string(),
        })
        .collect()
}

fn synonym_groups(groups: &[(&str, &[&str])]) -> Vec<SynonymGroup> {
    groups
        .iter()
        .map(|(canonical, synonyms)| SynonymGroup {
            canonical: canonical.to_string(),
            synonyms: strings(synonyms),
        })
        .collect()
}

fn phrases(entries: &[(&str, &[&str])]) -> Vec<PhraseMapping> {
    entries
        .iter()
        .map(|(phrase, ids)| PhraseMapping {
            phrase: phrase.to_string(),
            ids: strings(ids),
        })
        .collect()
}

fn tool_keywords(entries: &[(&str, &[&str])]) -> Vec<ToolKeywords> {
    entries
        .iter()
        .map(|(tool_id, keywords)| ToolKeywords {
            tool_id: tool_id.to_string(),
            keywords: strings(keywords),
        })
        .collect()
}

fn triggers(entries: &[(&str, &[&str])]) -> Vec<SynonymTrigger> {
    entries
        .iter()
        .map(|(trigger, synonyms)| SynonymTrigger {
            trigger: trigger.to_string(),
            synonyms: strings(synonyms),
        })
        .collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            spell_corrections: corrections(&[
                ("modul", "module"),
                ("modle", "module"),
                ("secton", "section"),
                ("sectin", "section"),
                ("orchestrtion", "orchestration"),
                ("orchestraton", "orchestration"),
                ("cursr", "cursor"),
                ("curser", "cursor"),
                ("shft", "shift"),
                ("shif", "shift"),
                ("mindst", "mindset"),
                ("configration", "configuration"),
                ("configuraton", "configuration"),
                ("debuging", "debugging"),
                ("debuggin", "debugging"),
                ("envronment", "environment"),
                ("enviroment", "environment"),
                ("synhesis", "synthesis"),
                ("syntesis", "synthesis"),
                ("practicm", "practicum"),
                ("practicom", "practicum"),
                ("cloude", "claude"),
                ("claud", "claude"),
                ("gemni", "gemini"),
                ("gemin", "gemini"),
                ("notebok", "notebook"),
                ("notbook", "notebook"),
                ("orchestrtor", "orchestrator"),
                ("orchestrater", "orchestrator"),
            ]),
            command_synonyms: synonym_groups(&[
                ("show", &["display", "view", "see", "open", "load", "get"]),
                (
                    "tell",
                    &["explain", "describe", "what is", "how does", "info about"],
                ),
                ("find", &["search", "look for", "locate", "where is"]),
                ("help", &["assist", "support", "guide", "how to", "how do i"]),
                ("use", &["utilize", "work with", "setup", "configure"]),
                ("setup", &["install", "configure", "prepare", "initialize"]),
                ("learn", &["study", "understand", "master", "explore"]),
            ]),
            common_phrases: phrases(&[
                ("shift mindset", &["00.1", "00.2", "00.3"]),
                ("mindset", &["00.1", "00.2", "00.3"]),
                ("three mindsets", &["00.1"]),
                ("context window", &["00.2"]),
                ("cost quality speed", &["00.3"]),
                ("cost-quality-speed", &["00.3"]),
                ("triangle", &["00.3"]),
                ("cursor", &["cursor", "01.1", "01.4"]),
                ("claude", &["claude-code", "01.1"]),
                ("gemini", &["gemini", "01.2"]),
                ("gpt", &["gpt-5-2", "01.3"]),
                ("openai", &["gpt-5-2", "openai-codex", "01.3"]),
                ("debug", &["01.3", "01.4"]),
                ("debugging", &["01.3", "01.4"]),
                ("notebooklm", &["notebooklm", "01.4", "02.4"]),
                ("notebook", &["notebooklm", "01.4", "02.4"]),
                ("imagen", &["imagen-3", "01.5"]),
                ("veo", &["veo-3-1", "01.5"]),
                ("stitch", &["google-stitch", "01.5"]),
                ("configuration", &["02.1", "02.2", "02.3", "02.4"]),
                ("claude.md", &["02.2"]),
                ("cursorrules", &["02.3"]),
                ("agents.md", &["02.4"]),
                ("orchestration", &["02.4", "03"]),
                ("chat prompts", &["02.1"]),
                ("prompts", &["02.1"]),
            ]),
            tool_keywords: tool_keywords(&[
                ("cursor", &["cursor", "editor"]),
                (
                    "claude-code",
                    &["claude", "claude code", "anthropic", "reasoning"],
                ),
                ("gemini", &["gemini", "apex intel", "google", "multimodal"]),
                ("gpt-5-2", &["gpt", "gpt-5", "gpt-5.2", "openai", "debug"]),
                ("openai-codex", &["codex", "openai codex", "cloud"]),
                ("antigravity", &["antigravity", "google ide"]),
                ("codemachine", &["codemachine", "orchestrator"]),
                ("notebooklm", &["notebooklm", "notebook", "research"]),
                ("apex-stitch", &["stitch", "apex stitch", "design"]),
                ("opencode", &["opencode", "open code", "open-source"]),
                ("imagen-3", &["imagen", "image", "images"]),
                ("veo-3-1", &["veo", "video"]),
            ]),
            synonym_triggers: triggers(&[
                ("cursor", &["editor", "ide", "code editor"]),
                ("claude", &["anthropic", "ai assistant", "claude code"]),
                ("gemini", &["google", "google ai", "bard"]),
                ("gpt", &["openai", "chatgpt", "gpt-5"]),
                ("debug", &["debugging", "troubleshoot", "fix"]),
                ("config", &["configuration", "setup", "settings"]),
            ]),
            term_patterns: strings(&[
                r"\b\w+ mindset\b",
                r"\bcontext window\b",
                r"\b\w+ agent\b",
                r"\b\w+ orchestration\b",
                r"\bClaude\b",
                r"\bCursor\b",
                r"\bGemini\b",
                r"\bGPT\b",
                r"\bAPI\b",
                r"\bdebug\w*\b",
                r"\bconfiguration\b",
                r"\bCLAUDE\.md\b",
                r"\bAGENTS\.md\b",
            ]),
            help_phrases: strings(&[
                "help",
                "what can i ask",
                "what can you do",
                "how do i use",
                "how to use",
                "commands",
                "what questions",
            ]),
            stop_words: strings(&[
                "a", "about", "an", "and", "are", "can", "describe", "display", "do", "does",
                "explain", "for", "get", "how", "i", "in", "info", "is", "it", "load", "me",
                "my", "of", "on", "open", "please", "see", "show", "tell", "the", "to",
                "view", "what", "where", "which", "with", "you",
            ]),
            concepts: vec![
                Concept {
                    name: "shift mindset".into(),
                    query: "What is the shift mindset?".into(),
                },
                Concept {
                    name: "context windows".into(),
                    query: "What are context windows?".into(),
                },
                Concept {
                    name: "orchestration".into(),
                    query: "Explain orchestration".into(),
                },
                Concept {
                    name: "claude.md".into(),
                    query: "What is CLAUDE.md?".into(),
                },
                Concept {
                    name: "cursorrules".into(),
                    query: "How do I configure Cursor?".into(),
                },
                Concept {
                    name: "agents.md".into(),
                    query: "Explain AGENTS.md".into(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_compile() {
        let vocab = Vocabulary::default();
        let patterns = vocab.compile_term_patterns().unwrap();
        assert_eq!(patterns.len(), vocab.term_patterns.len());
        assert!(patterns[4].is_match("working with claude today"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let vocab = Vocabulary {
            term_patterns: vec!["(unclosed".into()],
            ..Vocabulary::default()
        };
        let err = vocab.compile_term_patterns().unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_correction_lookup() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.correction_for("cursr"), Some("cursor"));
        assert_eq!(vocab.correction_for("cursor"), None);
    }

    #[test]
    fn test_phrase_order_preserved() {
        let vocab = Vocabulary::default();
        let shift = vocab
            .common_phrases
            .iter()
            .position(|p| p.phrase == "shift mindset")
            .unwrap();
        let mindset = vocab
            .common_phrases
            .iter()
            .position(|p| p.phrase == "mindset")
            .unwrap();
        assert!(shift < mindset);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{ "help_phrases": ["assist me"] }"#;
        let vocab: Vocabulary = serde_json::from_str(json).unwrap();
        assert_eq!(vocab.help_phrases, vec!["assist me".to_string()]);
        assert_eq!(vocab.spell_corrections, Vocabulary::default().spell_corrections);
    }
}
