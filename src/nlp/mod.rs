//! Natural language processing for question understanding
//!
//! This module turns free text into tagged tokens, classifies the tagged
//! utterance into one of the supported intents, and tracks the conversation
//! state that decides whether the next turn is re-tokenized.

pub mod context;
pub mod intent;
pub mod stemmer;
pub mod tagger;
pub mod tokenizer;
pub mod utterance;

pub use context::{ConversationState, PredicateCache, QueryCache, StateEvent};
pub use intent::{Intent, IntentClassifier};
pub use stemmer::{same_stem, stem};
pub use tagger::PosTagger;
pub use tokenizer::{QueryParser, QuestionTokenizer, RawToken, TokenOrigin, TokenizeError};
pub use utterance::{PosTag, TaggedUtterance, Token, UserInput};
