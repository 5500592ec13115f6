//! Question tokenization
//!
//! Turns raw question text into a filtered token stream. URLs and quoted
//! phrases are swapped for placeholders before word splitting so that each
//! survives as a single atomic token, then restored afterwards.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use super::tagger::PosTagger;
use super::utterance::TaggedUtterance;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^(?:https?://|www\d{0,3}\.|[a-z0-9.\-]+\.[a-z]{2,4}/)[^\s()<>"]*[^\s`!()\[\]{};:'".,<>?«»“”‘’]"#,
    )
    .expect("URL pattern is valid")
});

static QUOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["“]([^"“”]*)["”]"#).expect("quote pattern is valid"));

static URL_SLOT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NLQURLSLOT\d+").expect("slot pattern is valid"));

const URL_PLACEHOLDER: &str = "NLQURLSLOT";
const QUOTE_PLACEHOLDER: &str = "NLQQUOTESLOT";

const LEADING_PUNCTUATION: &[char] = &['"', '\'', '(', '[', '{', '`', '¿', '¡'];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', '?', '!', ';', ':', ')', ']', '}', '"', '\''];
const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

/// NLTK English stopword list
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Checks a surface form against the stopword list (case-sensitive)
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Tokenizer failures, surfaced to the user as a parse-failure reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A double quote was opened but never closed
    #[error("unterminated quote at byte {position}")]
    UnterminatedQuote { position: usize },

    /// Nothing left after stopword filtering
    #[error("no meaningful tokens in input")]
    Empty,
}

/// Where a token's surface form came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOrigin {
    /// Ordinary word produced by the word tokenizer
    Word,
    /// Restored URL, wrapped in angle brackets
    Uri,
    /// Restored quoted phrase, quotes stripped
    Quoted,
}

/// An untagged token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    /// Surface form
    pub text: String,
    /// Origin of the surface form
    pub origin: TokenOrigin,
}

impl RawToken {
    /// Ordinary word token
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: TokenOrigin::Word,
        }
    }

    /// Restored URL token; `text` already carries the angle brackets
    pub fn uri(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: TokenOrigin::Uri,
        }
    }

    /// Restored quoted-phrase token
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: TokenOrigin::Quoted,
        }
    }
}

/// Query parser trait
pub trait QueryParser: Send + Sync {
    /// Tokenizes, filters and tags a question
    fn parse(&self, text: &str) -> Result<TaggedUtterance, TokenizeError>;
}

/// Default question tokenizer and tagger
#[derive(Debug, Clone, Default)]
pub struct QuestionTokenizer {
    tagger: PosTagger,
}

impl QuestionTokenizer {
    /// Creates a tokenizer with the default tagger
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tagger
    pub fn with_tagger(mut self, tagger: PosTagger) -> Self {
        self.tagger = tagger;
        self
    }

    /// Splits, restores and stopword-filters `text`, without tagging
    pub fn tokenize(&self, text: &str) -> Result<Vec<RawToken>, TokenizeError> {
        let mut slots = Placeholders::default();
        let protected = slots.protect_urls(text);
        let protected = slots.protect_quotes(&protected)?;

        let tokens: Vec<RawToken> = word_tokenize(&protected)
            .into_iter()
            .filter_map(|word| slots.restore(word))
            .filter(|token| !is_stopword(&token.text))
            .collect();

        if tokens.is_empty() {
            return Err(TokenizeError::Empty);
        }
        Ok(tokens)
    }
}

impl QueryParser for QuestionTokenizer {
    fn parse(&self, text: &str) -> Result<TaggedUtterance, TokenizeError> {
        let tokens = self.tokenize(text)?;
        let tagged = self.tagger.tag(&tokens);
        debug!(input = text, tokens = %tagged, "tagged question");
        Ok(tagged)
    }
}

/// Placeholder bookkeeping for protected spans
#[derive(Debug, Default)]
struct Placeholders {
    slots: HashMap<String, RawToken>,
}

impl Placeholders {
    fn insert(&mut self, prefix: &str, token: RawToken) -> String {
        let key = format!("{}{}", prefix, self.slots.len());
        self.slots.insert(key.clone(), token);
        key
    }

    /// Swaps each word-initial URL for a placeholder; trailing punctuation
    /// after the URL stays in place.
    fn protect_urls(&mut self, text: &str) -> String {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| match URL_PATTERN.find(word) {
                Some(m) => {
                    let key = self.insert(URL_PLACEHOLDER, RawToken::uri(format!("<{}>", m.as_str())));
                    format!("{}{}", key, &word[m.end()..])
                }
                None => word.to_string(),
            })
            .collect();
        words.join(" ")
    }

    /// Collapses each quoted span to a placeholder padded with spaces
    fn protect_quotes(&mut self, text: &str) -> Result<String, TokenizeError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in QUOTE_PATTERN.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            let label = self.expand_urls(inner.as_str());
            let label = label.trim().trim_end_matches(['?', ',', '.']).trim();
            if !label.is_empty() {
                let key = self.insert(QUOTE_PLACEHOLDER, RawToken::quoted(label));
                out.push(' ');
                out.push_str(&key);
                out.push(' ');
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);

        if let Some(position) = out.find(['"', '“', '”']) {
            return Err(TokenizeError::UnterminatedQuote { position });
        }
        Ok(out)
    }

    /// Puts raw URL text back into a quoted span that swallowed URL slots
    fn expand_urls(&self, span: &str) -> String {
        URL_SLOT_PATTERN
            .replace_all(span, |caps: &regex::Captures<'_>| match self.slots.get(&caps[0]) {
                Some(token) => token.text.trim_start_matches('<').trim_end_matches('>').to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    fn restore(&self, word: String) -> Option<RawToken> {
        match self.slots.get(&word) {
            Some(token) => Some(token.clone()),
            None if word.is_empty() => None,
            None => Some(RawToken::word(word)),
        }
    }
}

/// Treebank-style word splitting: peels leading/trailing punctuation and
/// English clitics off whitespace-separated chunks.
pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        split_chunk(chunk, &mut tokens);
    }
    tokens
}

fn split_chunk(chunk: &str, out: &mut Vec<String>) {
    let mut core = chunk;

    let mut trailing = Vec::new();
    while let Some(c) = core.chars().last() {
        if !TRAILING_PUNCTUATION.contains(&c) {
            break;
        }
        trailing.push(c.to_string());
        core = &core[..core.len() - c.len_utf8()];
    }

    while let Some(c) = core.chars().next() {
        if !LEADING_PUNCTUATION.contains(&c) || is_clitic(core) {
            break;
        }
        out.push(c.to_string());
        core = &core[c.len_utf8()..];
    }

    if !core.is_empty() {
        split_clitic(core, out);
    }
    out.extend(trailing.into_iter().rev());
}

/// A bare clitic such as `'s` standing alone
fn is_clitic(word: &str) -> bool {
    let lower = word.to_lowercase();
    CLITICS.contains(&lower.as_str())
}

fn split_clitic(word: &str, out: &mut Vec<String>) {
    let lower = word.to_lowercase();
    if lower.len() > 3 && lower.ends_with("n't") && word.is_char_boundary(word.len() - 3) {
        out.push(word[..word.len() - 3].to_string());
        out.push(word[word.len() - 3..].to_string());
        return;
    }
    for clitic in CLITICS {
        if lower.len() > clitic.len()
            && lower.ends_with(clitic)
            && word.is_char_boundary(word.len() - clitic.len())
        {
            let split = word.len() - clitic.len();
            out.push(word[..split].to_string());
            out.push(word[split..].to_string());
            return;
        }
    }
    out.push(word.to_string());
}
