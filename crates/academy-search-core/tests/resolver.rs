use academy_search_core::fuzzy::{FuzzyHit, FuzzyOptions, FuzzySearch, WeightedFieldIndex};
use academy_search_core::index::IndexEntry;
use academy_search_core::models::Corpus;
use academy_search_core::resolver::{QueryResolver, ResolverOptions};
use academy_search_core::result::ResultKind;
use academy_search_core::vocabulary::Vocabulary;

fn corpus() -> Corpus {
    Corpus::from_json(include_str!("../../../data/curriculum.json")).unwrap()
}

fn resolver() -> QueryResolver {
    QueryResolver::new(corpus(), Vocabulary::default())
}

fn resolver_with_threshold(threshold: f64) -> QueryResolver {
    QueryResolver::with_options(
        corpus(),
        Vocabulary::default(),
        ResolverOptions {
            confidence_threshold: threshold,
            ..ResolverOptions::default()
        },
    )
}

// ============ Scenarios ============

#[test]
fn test_tell_me_about_module_2() {
    let mut r = resolver();
    let res = r.parse_query("Tell me about module 2").unwrap();
    assert_eq!(res.kind, ResultKind::Module);
    assert_eq!(res.module.as_ref().unwrap().number, "02");
    assert!(res.title.starts_with("📚"));
    assert_eq!(res.confidence, 1.0);
}

#[test]
fn test_cat_section_returns_full_body() {
    let mut r = resolver();
    let res = r.parse_query("cat 01.2").unwrap();
    assert_eq!(res.kind, ResultKind::Section);
    let corpus = corpus();
    let (_, section) = corpus.section("01.2").unwrap();
    assert!(section.content.chars().count() > 500);
    assert_eq!(res.content, section.content);
    assert_eq!(res.confidence, 1.0);
}

#[test]
fn test_misspelled_tool() {
    let mut r = resolver();
    let res = r.parse_query("What is the cursr?").unwrap();
    assert_eq!(res.kind, ResultKind::Tool);
    assert_eq!(res.tool.unwrap().id, "cursor");
    assert_eq!(res.confidence, 1.0);
}

#[test]
fn test_explain_orchestration_uses_phrase_table() {
    let mut r = resolver();
    let res = r.parse_query("Explain orchestration").unwrap();
    assert_eq!(res.kind, ResultKind::Section);
    assert_eq!(res.section.unwrap().id, "02.4");
    assert_eq!(res.confidence, 0.95);
    assert!(res.match_details.is_none());
}

#[test]
fn test_gibberish_is_recorded_without_type() {
    let mut r = resolver();
    assert!(r.parse_query("asdkfjhaslkdjfh").is_none());
    let history = r.query_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query, "asdkfjhaslkdjfh");
    assert!(history[0].result_type.is_none());
}

// ============ Properties ============

#[test]
fn test_deterministic() {
    let queries = [
        "multi agent architecture",
        "Tell me about module 2",
        "certificaton",
        "parallel agents",
        "what is claude.md",
    ];
    let mut a = resolver();
    let mut b = resolver();
    for q in queries {
        assert_eq!(a.parse_query(q), b.parse_query(q), "differs for {:?}", q);
    }
}

#[test]
fn test_help_beats_section_id() {
    let mut r = resolver();
    let res = r.parse_query("help me understand section 01.2").unwrap();
    assert_eq!(res.kind, ResultKind::Help);
    assert_eq!(r.query_history()[0].result_type.as_deref(), Some("help"));
}

#[test]
fn test_exact_module_beats_fuzzy() {
    let mut r = resolver_with_threshold(1.0);
    let res = r.parse_query("module 1").unwrap();
    assert_eq!(res.module.unwrap().number, "01");
    assert_eq!(res.confidence, 1.0);
    assert!(res.match_details.is_none());
}

#[test]
fn test_fuzzy_hit_reports_details() {
    let mut r = resolver();
    let res = r.parse_query("multi agent architecture").unwrap();
    assert_eq!(res.section.as_ref().unwrap().id, "03.1");
    assert!(res.confidence > 0.9 && res.confidence < 1.0);
    let details = res.match_details.unwrap();
    assert!(!details.matched_terms.is_empty());
    assert!(details.fuzzy_matches.len() <= 3);
}

#[test]
fn test_module_word_falls_through_to_fuzzy() {
    let mut r = resolver();
    let res = r.parse_query("the synthesis build phase").unwrap();
    assert_eq!(res.kind, ResultKind::Section);
    assert_eq!(res.section.as_ref().unwrap().id, "04.2");
    assert!(res.confidence < 0.95);
    assert!(res.match_details.is_some());
}

#[test]
fn test_setup_words_do_not_mount_module() {
    let mut r = resolver();
    for query in [
        "install multi agent architecture",
        "configure judging outputs automatically",
        "practicum certification",
    ] {
        let kind = r.parse_query(query).map(|res| res.kind);
        assert_ne!(kind, Some(ResultKind::Module), "{:?}", query);
    }
}

#[test]
fn test_threshold_monotonicity() {
    let queries = [
        "multi agent architecture",
        "certificaton",
        "parallel agents dashboard",
        "judging outputs",
        "rules files",
        "research phase",
        "feature choosing",
        "the synthesis build phase",
        "asdkfjhaslkdjfh",
    ];
    let thresholds = [0.0, 0.1, 0.2, 0.3, 0.4, 0.6, 0.8, 1.0];
    let answered: Vec<Vec<bool>> = thresholds
        .iter()
        .map(|&t| {
            let mut r = resolver_with_threshold(t);
            queries.iter().map(|q| r.parse_query(q).is_some()).collect()
        })
        .collect();

    for (qi, query) in queries.iter().enumerate() {
        for ti in 1..thresholds.len() {
            assert!(
                !answered[ti - 1][qi] || answered[ti][qi],
                "{:?} answered at threshold {} but not at {}",
                query,
                thresholds[ti - 1],
                thresholds[ti]
            );
        }
    }
}

#[test]
fn test_history_bounded_newest_first() {
    let mut r = resolver();
    for i in 0..60 {
        r.parse_query(&format!("query {}", i));
    }
    let history = r.query_history();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].query, "query 59");
    assert_eq!(history[49].query, "query 10");
    assert!(history.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[test]
fn test_history_clear() {
    let mut r = resolver();
    r.parse_query("module 1");
    r.clear_history();
    assert!(r.query_history().is_empty());
}

#[test]
fn test_history_limit_from_options() {
    let mut r: QueryResolver = QueryResolver::with_options(
        corpus(),
        Vocabulary::default(),
        ResolverOptions {
            max_history: 3,
            ..ResolverOptions::default()
        },
    );
    for q in ["a", "b", "c", "d"] {
        r.parse_query(q);
    }
    let queries: Vec<String> = r.query_history().into_iter().map(|e| e.query).collect();
    assert_eq!(queries, vec!["d", "c", "b"]);
}

#[test]
fn test_normalization_idempotent_through_resolver() {
    let r = resolver();
    for q in ["Explain orchestration", "show me moduls", "learn debuging", "  CLAUD  "] {
        let once = r.normalize(q);
        assert_eq!(r.normalize(&once), once);
    }
}

// ============ Suggestions ============

#[test]
fn test_suggestions_short_input() {
    let r = resolver();
    assert!(r.get_suggestions("c").is_empty());
    assert!(r.get_suggestions(" ").is_empty());
}

#[test]
fn test_suggestions_bounded_and_unique() {
    let r = resolver();
    for partial in ["cu", "orch", "agent", "module", "claude"] {
        let s = r.get_suggestions(partial);
        assert!(s.len() <= 5, "{:?}", s);
        let mut sorted = s.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), s.len(), "duplicates for {:?}", partial);
    }
}

#[test]
fn test_suggestions_include_concepts() {
    let r = QueryResolver::<WeightedFieldIndex>::with_options(
        corpus(),
        Vocabulary::default(),
        ResolverOptions {
            suggestion_limit: 50,
            ..ResolverOptions::default()
        },
    );
    let s = r.get_suggestions("orchestration");
    assert!(s.contains(&"Explain orchestration".to_string()));
    assert!(s.contains(&"Tell me about module 03".to_string()));
}

#[test]
fn test_suggestions_tool_name() {
    let r = QueryResolver::<WeightedFieldIndex>::with_options(
        corpus(),
        Vocabulary::default(),
        ResolverOptions {
            suggestion_limit: 50,
            ..ResolverOptions::default()
        },
    );
    let s = r.get_suggestions("notebook");
    assert!(s.contains(&"How do I use NotebookLM?".to_string()));
    assert!(s.contains(&"What is NotebookLM?".to_string()));
}

#[test]
fn test_context_aware_suggestions() {
    let mut r = resolver();
    r.parse_query("tell me about cursor");
    let s = r.context_aware_suggestions("tell me about cursr");
    assert_eq!(s, vec!["Did you mean: \"tell me about cursor\"?"]);

    let s = r.context_aware_suggestions("which tool for module 3");
    assert!(s.contains(&"Try: \"Show all modules\"".to_string()));
    assert!(s.contains(&"Try: \"List all tools\"".to_string()));
}

// ============ Pluggable matcher ============

/// Matcher that only recognises exact ids, for exercising the trait seam.
struct ExactIdIndex {
    entries: Vec<IndexEntry>,
    options: FuzzyOptions,
}

impl FuzzySearch for ExactIdIndex {
    fn build(entries: Vec<IndexEntry>, options: FuzzyOptions) -> Self {
        Self { entries, options }
    }

    fn search(&self, query: &str, limit: Option<usize>) -> Vec<FuzzyHit<'_>> {
        let mut hits: Vec<FuzzyHit<'_>> = self
            .entries
            .iter()
            .filter(|e| query.split_whitespace().any(|t| t == e.id))
            .map(|e| FuzzyHit {
                item: e,
                score: 0.0,
                matches: Vec::new(),
            })
            .collect();
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

#[test]
fn test_custom_matcher() {
    let mut r: QueryResolver<ExactIdIndex> = QueryResolver::new(corpus(), Vocabulary::default());
    let res = r.parse_query("opencode").unwrap();
    // the tool keyword stage answers before the matcher is consulted
    assert_eq!(res.tool.unwrap().id, "opencode");

    let res = r.parse_query("03.2").unwrap();
    assert_eq!(res.section.unwrap().id, "03.2");
    assert_eq!(res.confidence, 1.0);
    assert!(res.match_details.unwrap().matched_terms.is_empty());

    assert!(r.parse_query("multi agent architecture").is_none());
}
