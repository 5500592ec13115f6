//! Intent classification

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::context::ConversationState;
use super::utterance::{PosTag, TaggedUtterance, UserInput};

/// The five question patterns the pipeline can answer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Intent {
    /// "What is the <subject> <predicate>?"
    What,
    /// Domain and/or range of a property label
    DomainRange,
    /// Properties whose domain or range carries a label
    DomainRangeProperty,
    /// Mass and functions of an assembly, or assemblies within a mass range
    Assembly,
    /// Subclasses or superclasses of a class URI
    SubSuper,
}

impl Intent {
    /// Returns a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Intent::What => "Subject/predicate lookup",
            Intent::DomainRange => "Domain and range of a property",
            Intent::DomainRangeProperty => "Properties of a domain or range",
            Intent::Assembly => "Assembly attributes",
            Intent::SubSuper => "Subclass or superclass listing",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

const PROPERTY_MARKERS: &[(&str, PosTag)] = &[("property", PosTag::Nn), ("properties", PosTag::Nns)];
const DOMAIN_RANGE_MARKERS: &[(&str, PosTag)] = &[("domain", PosTag::Nn), ("range", PosTag::Nn)];
const ASSEMBLY_MARKERS: &[(&str, PosTag)] = &[
    ("mass", PosTag::Nn),
    ("function", PosTag::Nn),
    ("functions", PosTag::Nns),
    ("heavier", PosTag::Jjr),
    ("lighter", PosTag::Jjr),
];
const HIERARCHY_MARKERS: &[(&str, PosTag)] = &[
    ("subclass", PosTag::Nn),
    ("subclasses", PosTag::Nns),
    ("superclass", PosTag::Nn),
    ("superclasses", PosTag::Nns),
];

/// Picks a strategy for one turn; first matching rule wins
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    /// Creates a new classifier
    pub fn new() -> Self {
        Self
    }

    /// Classifies a turn against the current conversation state.
    ///
    /// A pending state keeps routing to the strategy already in progress,
    /// which is the only way a follow-up reply reaches a strategy.
    pub fn classify(&self, state: ConversationState, input: &UserInput) -> Option<Intent> {
        if let Some(intent) = state.pending_intent() {
            debug!(%intent, "continuing pending strategy");
            return Some(intent);
        }

        let intent = input.tagged().and_then(|tokens| self.classify_tokens(tokens));
        debug!(?intent, "classified question");
        intent
    }

    /// Applies the keyword rules to a freshly tagged utterance
    pub fn classify_tokens(&self, tokens: &TaggedUtterance) -> Option<Intent> {
        if tokens.position_any(PROPERTY_MARKERS).is_some() {
            Some(Intent::DomainRangeProperty)
        } else if tokens.position_any(DOMAIN_RANGE_MARKERS).is_some() {
            Some(Intent::DomainRange)
        } else if tokens.position_any(ASSEMBLY_MARKERS).is_some() {
            Some(Intent::Assembly)
        } else if tokens.position_any(HIERARCHY_MARKERS).is_some() {
            Some(Intent::SubSuper)
        } else if tokens.starts_with("What") && tokens.len() >= 3 {
            Some(Intent::What)
        } else {
            None
        }
    }
}
