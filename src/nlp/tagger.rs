//! Part-of-speech tagging
//!
//! A deterministic lexicon-and-suffix tagger producing Penn Treebank tags.
//! The lexicon pins the keyword nouns the intent classifier relies on so
//! that they always carry the tag the classifier matches against.

use std::collections::HashMap;

use super::tokenizer::{RawToken, TokenOrigin};
use super::utterance::{PosTag, TaggedUtterance, Token};

const LEXICON: &[(&str, PosTag)] = &[
    // wh-words
    ("what", PosTag::Wp),
    ("who", PosTag::Wp),
    ("whom", PosTag::Wp),
    ("which", PosTag::Wdt),
    ("whichever", PosTag::Wdt),
    ("where", PosTag::Wrb),
    ("when", PosTag::Wrb),
    ("why", PosTag::Wrb),
    ("how", PosTag::Wrb),
    // keyword nouns
    ("domain", PosTag::Nn),
    ("range", PosTag::Nn),
    ("property", PosTag::Nn),
    ("properties", PosTag::Nns),
    ("mass", PosTag::Nn),
    ("function", PosTag::Nn),
    ("functions", PosTag::Nns),
    ("id", PosTag::Nn),
    ("subclass", PosTag::Nn),
    ("subclasses", PosTag::Nns),
    ("superclass", PosTag::Nn),
    ("superclasses", PosTag::Nns),
    ("assembly", PosTag::Nn),
    ("assemblies", PosTag::Nns),
    ("object", PosTag::Nn),
    ("subject", PosTag::Nn),
    ("subjects", PosTag::Nns),
    ("description", PosTag::Nn),
    ("kg", PosTag::Nn),
    // comparatives
    ("heavier", PosTag::Jjr),
    ("lighter", PosTag::Jjr),
    ("larger", PosTag::Jjr),
    ("smaller", PosTag::Jjr),
    ("greater", PosTag::Jjr),
    ("bigger", PosTag::Jjr),
    ("fewer", PosTag::Jjr),
    ("less", PosTag::Jjr),
    ("more", PosTag::Jjr),
    // function words that survive stopword filtering or appear capitalized
    ("the", PosTag::Dt),
    ("a", PosTag::Dt),
    ("an", PosTag::Dt),
    ("all", PosTag::Dt),
    ("every", PosTag::Dt),
    ("and", PosTag::Cc),
    ("or", PosTag::Cc),
    ("but", PosTag::Cc),
    ("than", PosTag::In),
    ("of", PosTag::In),
    ("in", PosTag::In),
    ("for", PosTag::In),
    ("with", PosTag::In),
    ("from", PosTag::In),
    ("by", PosTag::In),
    ("to", PosTag::To),
    ("is", PosTag::Vbz),
    ("has", PosTag::Vbz),
    ("does", PosTag::Vbz),
    ("are", PosTag::Vbp),
    ("have", PosTag::Vbp),
    ("do", PosTag::Vbp),
    ("was", PosTag::Vbd),
    ("were", PosTag::Vbd),
    ("did", PosTag::Vbd),
    ("can", PosTag::Md),
    ("could", PosTag::Md),
    ("will", PosTag::Md),
    ("would", PosTag::Md),
    ("should", PosTag::Md),
    ("i", PosTag::Prp),
    ("you", PosTag::Prp),
    ("it", PosTag::Prp),
    ("we", PosTag::Prp),
    ("they", PosTag::Prp),
    ("hi", PosTag::Uh),
    ("hello", PosTag::Uh),
    ("n't", PosTag::Rb),
    ("not", PosTag::Rb),
];

/// Lexicon plus suffix-rule POS tagger
#[derive(Debug, Clone)]
pub struct PosTagger {
    lexicon: HashMap<String, PosTag>,
}

impl PosTagger {
    /// Creates a tagger with the built-in lexicon
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON
                .iter()
                .map(|(word, tag)| (word.to_string(), *tag))
                .collect(),
        }
    }

    /// Adds or overrides a lexicon entry (matched case-insensitively)
    pub fn with_entry(mut self, word: &str, tag: PosTag) -> Self {
        self.lexicon.insert(word.to_lowercase(), tag);
        self
    }

    /// Tags a filtered token stream
    pub fn tag(&self, tokens: &[RawToken]) -> TaggedUtterance {
        TaggedUtterance::new(
            tokens
                .iter()
                .enumerate()
                .map(|(i, raw)| Token::new(raw.text.clone(), self.tag_one(raw, i)))
                .collect(),
        )
    }

    fn tag_one(&self, raw: &RawToken, position: usize) -> PosTag {
        if raw.origin != TokenOrigin::Word {
            return PosTag::Nnp;
        }
        let text = raw.text.as_str();

        if let Some(tag) = punctuation_tag(text) {
            return tag;
        }
        if is_number(text) {
            return PosTag::Cd;
        }

        let lower = text.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return *tag;
        }

        let capitalized = text.chars().next().is_some_and(char::is_uppercase);
        if capitalized && position > 0 {
            return PosTag::Nnp;
        }

        suffix_tag(&lower)
    }
}

impl Default for PosTagger {
    fn default() -> Self {
        Self::new()
    }
}

fn punctuation_tag(text: &str) -> Option<PosTag> {
    if text.is_empty() || text.chars().any(char::is_alphanumeric) {
        return None;
    }
    Some(match text {
        "." | "?" | "!" => PosTag::Terminal,
        "," => PosTag::Comma,
        ":" | ";" | "-" | "--" | "..." => PosTag::Colon,
        _ => PosTag::Symbol,
    })
}

/// Digits with an optional sign or decimal point; rejects `inf`/`NaN` words
fn is_number(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ','))
        && text.replace(',', "").parse::<f64>().is_ok()
}

fn suffix_tag(lower: &str) -> PosTag {
    let len = lower.len();
    if len > 4 && lower.ends_with("ing") {
        PosTag::Vbg
    } else if len > 3 && lower.ends_with("ed") {
        PosTag::Vbn
    } else if len > 3 && lower.ends_with("ly") {
        PosTag::Rb
    } else if ["ous", "ful", "ive", "able", "ible", "less"]
        .iter()
        .any(|s| len > s.len() + 2 && lower.ends_with(s))
    {
        PosTag::Jj
    } else if len > 3
        && lower.ends_with('s')
        && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s))
    {
        PosTag::Nns
    } else {
        PosTag::Nn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<RawToken> {
        texts.iter().map(|t| RawToken::word(*t)).collect()
    }

    fn tags(texts: &[&str]) -> Vec<PosTag> {
        PosTagger::new()
            .tag(&words(texts))
            .tokens()
            .iter()
            .map(|t| t.tag)
            .collect()
    }

    #[test]
    fn test_keyword_nouns() {
        assert_eq!(
            tags(&["What", "domain", "range", "isCoherent", "?"]),
            vec![PosTag::Wp, PosTag::Nn, PosTag::Nn, PosTag::Nn, PosTag::Terminal]
        );
        assert_eq!(
            tags(&["What", "properties", "domain", "Authority", "?"]),
            vec![PosTag::Wp, PosTag::Nns, PosTag::Nn, PosTag::Nnp, PosTag::Terminal]
        );
    }

    #[test]
    fn test_numbers_and_comparatives() {
        assert_eq!(
            tags(&["Which", "subjects", "heavier", "0.8", "kg"]),
            vec![PosTag::Wdt, PosTag::Nns, PosTag::Jjr, PosTag::Cd, PosTag::Nn]
        );
        assert_eq!(tags(&["id", "500000"]), vec![PosTag::Nn, PosTag::Cd]);
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(
            tags(&["x", "running", "described", "quickly", "dangerous", "imports", "class"]),
            vec![
                PosTag::Nn,
                PosTag::Vbg,
                PosTag::Vbn,
                PosTag::Rb,
                PosTag::Jj,
                PosTag::Nns,
                PosTag::Nn,
            ]
        );
    }

    #[test]
    fn test_protected_tokens_are_proper_nouns() {
        let tokens = vec![
            RawToken::word("What"),
            RawToken::uri("<http://example.org/x>"),
            RawToken::quoted("property"),
        ];
        let tagged = PosTagger::new().tag(&tokens);
        assert_eq!(tagged.get(1).map(|t| t.tag), Some(PosTag::Nnp));
        assert_eq!(tagged.get(2).map(|t| t.tag), Some(PosTag::Nnp));
        assert!(!tagged.contains("property", PosTag::Nn));
    }

    #[test]
    fn test_custom_entry() {
        let tagger = PosTagger::new().with_entry("Range", PosTag::Vbp);
        let tagged = tagger.tag(&words(&["range"]));
        assert_eq!(tagged.get(0).map(|t| t.tag), Some(PosTag::Vbp));
    }
}
