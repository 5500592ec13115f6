//! Tagged tokens and positional argument access

use serde::{Deserialize, Serialize};
use std::fmt;

/// Penn Treebank part-of-speech tags emitted by the tagger
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// Coordinating conjunction
    Cc,
    /// Cardinal number
    Cd,
    /// Determiner
    Dt,
    /// Preposition or subordinating conjunction
    In,
    /// Adjective
    Jj,
    /// Comparative adjective
    Jjr,
    /// Superlative adjective
    Jjs,
    /// Modal
    Md,
    /// Singular or mass noun
    Nn,
    /// Plural noun
    Nns,
    /// Singular proper noun
    Nnp,
    /// Personal pronoun
    Prp,
    /// Adverb
    Rb,
    /// "to"
    To,
    /// Interjection
    Uh,
    /// Verb, base form
    Vb,
    /// Verb, past tense
    Vbd,
    /// Verb, gerund or present participle
    Vbg,
    /// Verb, past participle
    Vbn,
    /// Verb, non-3rd person singular present
    Vbp,
    /// Verb, 3rd person singular present
    Vbz,
    /// Wh-determiner
    Wdt,
    /// Wh-pronoun
    Wp,
    /// Wh-adverb
    Wrb,
    /// Sentence-final punctuation
    Terminal,
    /// Comma
    Comma,
    /// Colon, semicolon or dash
    Colon,
    /// Brackets, quotes and other symbols
    Symbol,
}

impl PosTag {
    /// Returns the Treebank tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Cc => "CC",
            PosTag::Cd => "CD",
            PosTag::Dt => "DT",
            PosTag::In => "IN",
            PosTag::Jj => "JJ",
            PosTag::Jjr => "JJR",
            PosTag::Jjs => "JJS",
            PosTag::Md => "MD",
            PosTag::Nn => "NN",
            PosTag::Nns => "NNS",
            PosTag::Nnp => "NNP",
            PosTag::Prp => "PRP",
            PosTag::Rb => "RB",
            PosTag::To => "TO",
            PosTag::Uh => "UH",
            PosTag::Vb => "VB",
            PosTag::Vbd => "VBD",
            PosTag::Vbg => "VBG",
            PosTag::Vbn => "VBN",
            PosTag::Vbp => "VBP",
            PosTag::Vbz => "VBZ",
            PosTag::Wdt => "WDT",
            PosTag::Wp => "WP",
            PosTag::Wrb => "WRB",
            PosTag::Terminal => ".",
            PosTag::Comma => ",",
            PosTag::Colon => ":",
            PosTag::Symbol => "SYM",
        }
    }

    /// Checks if this tag marks punctuation
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            PosTag::Terminal | PosTag::Comma | PosTag::Colon | PosTag::Symbol
        )
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (surface form, part-of-speech tag) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Surface form; `<...>` for a protected URI
    pub text: String,
    /// Part of speech tag
    pub tag: PosTag,
}

impl Token {
    /// Creates a new token
    pub fn new(text: impl Into<String>, tag: PosTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    /// Exact match on both surface form and tag
    pub fn is(&self, text: &str, tag: PosTag) -> bool {
        self.tag == tag && self.text == text
    }

    /// Checks if the surface form is an angle-bracketed URI
    pub fn is_uri(&self) -> bool {
        self.text.len() > 2 && self.text.starts_with('<') && self.text.ends_with('>')
    }

    /// Surface form with any surrounding quotes removed
    pub fn unquoted(&self) -> &str {
        self.text.trim_matches('"')
    }

    /// Surface form with surrounding quotes and angle brackets removed
    pub fn bare(&self) -> &str {
        let text = self.unquoted();
        if self.is_uri() {
            &text[1..text.len() - 1]
        } else {
            text
        }
    }
}

/// Ordered, tagged token sequence; order is left-to-right word order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaggedUtterance {
    tokens: Vec<Token>,
}

impl TaggedUtterance {
    /// Creates an utterance from tagged tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Builds an utterance from `(text, tag)` pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, PosTag)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(text, tag)| Token::new(text, tag))
                .collect(),
        )
    }

    /// Returns the tokens
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Checks if there are no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at a position
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Checks for a `(text, tag)` token anywhere in the utterance
    pub fn contains(&self, text: &str, tag: PosTag) -> bool {
        self.position(text, tag).is_some()
    }

    /// Index of the first `(text, tag)` token
    pub fn position(&self, text: &str, tag: PosTag) -> Option<usize> {
        self.tokens.iter().position(|t| t.is(text, tag))
    }

    /// Index of the first token matching any of the `(text, tag)` pairs
    pub fn position_any(&self, candidates: &[(&str, PosTag)]) -> Option<usize> {
        self.tokens
            .iter()
            .position(|t| candidates.iter().any(|(text, tag)| t.is(text, *tag)))
    }

    /// The non-punctuation token immediately following `index`
    pub fn argument_after(&self, index: usize) -> Option<&Token> {
        self.tokens
            .get(index + 1)
            .filter(|t| !t.tag.is_punctuation())
    }

    /// Checks if the utterance opens with the given word
    pub fn starts_with(&self, text: &str) -> bool {
        self.tokens.first().is_some_and(|t| t.text == text)
    }

    /// Subject term of a "What <subject> <predicate>" question.
    ///
    /// Position 1 after stopword removal; alternate grammars should add
    /// accessors here rather than index tokens inside strategies.
    pub fn positional_subject(&self) -> Option<&Token> {
        self.tokens.get(1)
    }

    /// Predicate term of a "What <subject> <predicate>" question (position 2)
    pub fn positional_predicate(&self) -> Option<&Token> {
        self.tokens.get(2)
    }
}

impl fmt::Display for TaggedUtterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .tokens
            .iter()
            .map(|t| format!("({}, {})", t.text, t.tag))
            .collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

/// What a strategy receives for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// A freshly tokenized and tagged question
    Tagged(TaggedUtterance),
    /// The literal reply to a pending disambiguation prompt
    FollowUp(String),
}

impl UserInput {
    /// The tagged utterance, if this turn was tokenized
    pub fn tagged(&self) -> Option<&TaggedUtterance> {
        match self {
            UserInput::Tagged(utterance) => Some(utterance),
            UserInput::FollowUp(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance() -> TaggedUtterance {
        TaggedUtterance::from_pairs([
            ("What", PosTag::Wp),
            ("domain", PosTag::Nn),
            ("range", PosTag::Nn),
            ("isCoherent", PosTag::Nn),
            ("?", PosTag::Terminal),
        ])
    }

    #[test]
    fn test_tag_strings() {
        assert_eq!(PosTag::Nns.as_str(), "NNS");
        assert_eq!(PosTag::Terminal.to_string(), ".");
        assert!(PosTag::Comma.is_punctuation());
        assert!(!PosTag::Cd.is_punctuation());
    }

    #[test]
    fn test_token_matching_requires_tag() {
        let token = Token::new("range", PosTag::Nn);
        assert!(token.is("range", PosTag::Nn));
        assert!(!token.is("range", PosTag::Vbp));
        assert!(!token.is("domain", PosTag::Nn));
    }

    #[test]
    fn test_token_bare_forms() {
        let uri = Token::new("<http://example.org/a#B>", PosTag::Nnp);
        assert!(uri.is_uri());
        assert_eq!(uri.bare(), "http://example.org/a#B");

        let quoted = Token::new("\"has assignment\"", PosTag::Nnp);
        assert_eq!(quoted.unquoted(), "has assignment");
        assert!(!quoted.is_uri());

        assert!(!Token::new("<>", PosTag::Symbol).is_uri());
    }

    #[test]
    fn test_positions() {
        let u = utterance();
        assert_eq!(u.position("range", PosTag::Nn), Some(2));
        assert_eq!(
            u.position_any(&[("property", PosTag::Nn), ("domain", PosTag::Nn)]),
            Some(1)
        );
        assert!(u.contains("isCoherent", PosTag::Nn));
        assert!(u.starts_with("What"));
    }

    #[test]
    fn test_argument_after_skips_punctuation() {
        let u = utterance();
        assert_eq!(u.argument_after(2).map(|t| t.text.as_str()), Some("isCoherent"));
        assert!(u.argument_after(3).is_none());
        assert!(u.argument_after(10).is_none());
    }

    #[test]
    fn test_positional_accessors() {
        let u = utterance();
        assert_eq!(u.positional_subject().map(|t| t.text.as_str()), Some("domain"));
        assert_eq!(u.positional_predicate().map(|t| t.text.as_str()), Some("range"));
        assert!(TaggedUtterance::default().positional_subject().is_none());
    }

    #[test]
    fn test_display() {
        let u = TaggedUtterance::from_pairs([("What", PosTag::Wp), ("?", PosTag::Terminal)]);
        assert_eq!(u.to_string(), "[(What, WP), (?, .)]");
    }
}
