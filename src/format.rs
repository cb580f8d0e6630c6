//! Terminal rendering of resolver results.
//!
//! Human-readable output goes to stdout; `--json` callers serialize
//! [`SearchResult`] directly instead of using this module.

use academy_search_core::result::{ResultKind, SearchResult};

/// Natural-language examples shown whenever a query goes unanswered.
pub const EXAMPLE_QUERIES: [&str; 5] = [
    "What is the shift mindset?",
    "Tell me about module 2",
    "How do I use Cursor?",
    "Explain orchestration",
    "What tools do I need for module 3?",
];

/// Render a resolved query for the terminal.
///
/// Modules get a `mount` hint, sections a `cat` hint, tools a list of the
/// sections that use them. Suggestions, when present, close the output.
pub fn format_result(result: &SearchResult) -> String {
    let mut out = match result.kind {
        ResultKind::Help => result.content.clone(),
        _ => format!("> {}\n\n{}", result.title, result.content),
    };

    match result.kind {
        ResultKind::Module => {
            if let Some(module) = &result.module {
                out.push_str(&format!(
                    "\n\n💡 Type \"mount {}\" to explore this module.",
                    module.number
                ));
            }
        }
        ResultKind::Section => {
            if let Some(section) = &result.section {
                out.push_str(&format!(
                    "\n\n💡 Type \"cat {}\" to read the full section.",
                    section.id
                ));
            }
        }
        ResultKind::Tool => {
            if !result.related_sections.is_empty() {
                out.push_str("\n\n📚 Learn more in:");
                for s in &result.related_sections {
                    out.push_str(&format!("\n  • {}: {}", s.id, s.title));
                }
            }
        }
        ResultKind::Help => {}
    }

    if !result.suggestions.is_empty() {
        out.push_str("\n\n🔍 Related:");
        for s in &result.suggestions {
            out.push_str(&format!("\n  • \"{}\"", s));
        }
    }

    out
}

/// Message for a query nothing matched.
pub fn format_no_match(query: &str) -> String {
    let mut out = format!(
        "I couldn't find anything matching \"{}\".\n\nTry asking naturally:",
        query
    );
    for example in EXAMPLE_QUERIES {
        out.push_str(&format!("\n• \"{}\"", example));
    }
    out.push_str("\n\nOr type \"help\" for available commands.");
    out
}

/// Append context hints (did-you-mean, keyword tips) to `message`.
pub fn with_hints(mut message: String, hints: &[String]) -> String {
    if hints.is_empty() {
        return message;
    }
    message.push('\n');
    for hint in hints {
        message.push_str(&format!("\n{}", hint));
    }
    message
}

/// Render a duration in minutes as `"2h 05m"` or `"45 min"`.
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_search_core::models::Corpus;
    use academy_search_core::result::{help_result, module_result, section_result, tool_result};

    fn corpus() -> Corpus {
        Corpus::from_json(include_str!("../data/curriculum.json")).unwrap()
    }

    #[test]
    fn test_module_footer() {
        let corpus = corpus();
        let out = format_result(&module_result(corpus.module_by_number("02").unwrap(), 1.0));
        assert!(out.starts_with("> 📚 "));
        assert!(out.contains("💡 Type \"mount 02\" to explore this module."));
        assert!(out.contains("🔍 Related:\n  • \"Tell me about"));
    }

    #[test]
    fn test_section_footer() {
        let corpus = corpus();
        let (m, s) = corpus.section("02.4").unwrap();
        let out = format_result(&section_result(m, s, 0.95));
        assert!(out.contains(&s.content));
        assert!(out.contains("💡 Type \"cat 02.4\" to read the full section."));
    }

    #[test]
    fn test_tool_learn_more() {
        let corpus = corpus();
        let out = format_result(&tool_result(&corpus, corpus.tool("codemachine").unwrap(), 1.0));
        assert!(out.contains("📚 Learn more in:"));
        assert!(out.contains("  • 02.4: AGENTS.md & Orchestration Files"));
    }

    #[test]
    fn test_help_has_no_title_line() {
        let out = format_result(&help_result());
        assert!(out.starts_with("You can ask me naturally"));
        assert!(out.contains("🔍 Related:"));
    }

    #[test]
    fn test_no_match() {
        let out = format_no_match("asdf");
        assert!(out.starts_with("I couldn't find anything matching \"asdf\"."));
        assert!(out.contains("• \"Explain orchestration\""));
        assert!(out.ends_with("Or type \"help\" for available commands."));
    }

    #[test]
    fn test_hints() {
        assert_eq!(with_hints("x".into(), &[]), "x");
        assert_eq!(with_hints("x".into(), &["a".into(), "b".into()]), "x\n\na\nb");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(125), "2h 05m");
    }
}
