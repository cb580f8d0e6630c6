//! Query normalization: spelling correction followed by synonym expansion.
//!
//! Both passes are heuristic rewrites driven by [`Vocabulary`] tables.
//! Normalization never fails; blank input normalizes to an empty string.
//! Expansion only ever adds tokens, so substring checks that held for the
//! corrected query still hold for the normalized one.

use tracing::trace;

use crate::vocabulary::Vocabulary;

/// Lower-case, trim, correct spelling, then expand synonyms.
pub fn normalize(raw: &str, vocabulary: &Vocabulary) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }
    let corrected = correct_spelling(&lowered, vocabulary);
    let expanded = expand_synonyms(&corrected, vocabulary);
    trace!(raw, corrected = %corrected, normalized = %expanded, "normalized query");
    expanded
}

/// Replace misspelled tokens.
///
/// An exact table hit replaces the whole token. Otherwise the first
/// misspelling (in table order) found inside the token is replaced in place,
/// unless the token already contains that entry's correction.
pub fn correct_spelling(query: &str, vocabulary: &Vocabulary) -> String {
    query
        .split_whitespace()
        .map(|word| correct_word(word, vocabulary))
        .collect::<Vec<_>>()
        .join(" ")
}

fn correct_word(word: &str, vocabulary: &Vocabulary) -> String {
    if let Some(correction) = vocabulary.correction_for(word) {
        return correction.to_string();
    }
    for entry in &vocabulary.spell_corrections {
        if word.contains(&entry.misspelling) && !word.contains(&entry.correction) {
            return word.replacen(&entry.misspelling, &entry.correction, 1);
        }
    }
    word.to_string()
}

/// Append every synonym group touched by a token of the query.
///
/// A token touches a group when it equals the canonical word or one of its
/// synonyms. Appended words are themselves checked, so the expansion is
/// closed under the table and normalizing twice changes nothing. The token
/// stream is deduplicated, keeping first occurrences.
pub fn expand_synonyms(query: &str, vocabulary: &Vocabulary) -> String {
    let mut tokens: Vec<String> = Vec::new();
    for word in query.split_whitespace() {
        push_unique(&mut tokens, word);
    }

    let mut cursor = 0;
    while cursor < tokens.len() {
        let word = tokens[cursor].clone();
        for group in &vocabulary.command_synonyms {
            if group.canonical == word || group.synonyms.iter().any(|s| *s == word) {
                push_unique(&mut tokens, &group.canonical);
                for synonym in &group.synonyms {
                    for part in synonym.split_whitespace() {
                        push_unique(&mut tokens, part);
                    }
                }
            }
        }
        cursor += 1;
    }

    tokens.join(" ")
}

fn push_unique(tokens: &mut Vec<String>, word: &str) {
    if !tokens.iter().any(|t| t == word) {
        tokens.push(word.to_string());
    }
}
