//! Strategy engine
//!
//! One strategy per [`Intent`]. Each builds its graph query from the tagged
//! tokens in a [`RequestContext`], filters the rows, and renders an English
//! response. Only the domain/range strategy keeps state between turns, and
//! that state lives in the strategy value the executor holds on to while a
//! reply is pending.

pub mod assembly;
pub mod domain_range;
pub mod domain_range_property;
pub mod render;
pub mod subsuper;
pub mod what;

use serde::{Deserialize, Serialize};

use crate::nlp::{Intent, PredicateCache, UserInput};
use crate::sparql::GraphQueryClient;

pub use assembly::AssemblyStrategy;
pub use domain_range::DomainRangeStrategy;
pub use domain_range_property::DomainRangePropertyStrategy;
pub use subsuper::SubSuperStrategy;
pub use what::WhatStrategy;

/// Whether a turn finished the conversation or needs another reply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Final answer; conversation state resets
    Complete,
    /// A prompt; the next input is a literal follow-up reply
    AwaitingReply,
}

/// Result of running a strategy for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    /// Rendered response
    pub response: String,
    /// Continuation status
    pub status: ResponseStatus,
    /// The response carries data from the graph rather than an error or
    /// rephrase message
    pub resolved: bool,
}

impl StrategyOutcome {
    /// A terminal answer backed by graph data
    pub fn answer(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            status: ResponseStatus::Complete,
            resolved: true,
        }
    }

    /// A terminal "unable to find" or "please rephrase" message
    pub fn fallback(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            status: ResponseStatus::Complete,
            resolved: false,
        }
    }

    /// A non-terminal prompt for another reply
    pub fn prompt(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            status: ResponseStatus::AwaitingReply,
            resolved: false,
        }
    }

    /// Checks if the conversation state should reset
    pub fn is_terminal(&self) -> bool {
        self.status == ResponseStatus::Complete
    }
}

/// Everything a strategy may read or write during one turn
pub struct RequestContext<'a> {
    /// Tagged question or literal follow-up reply
    pub input: &'a UserInput,
    /// Session predicate cache
    pub predicates: &'a mut PredicateCache,
    /// Graph client
    pub client: &'a dyn GraphQueryClient,
    /// Namespace prefixed to bare subject terms
    pub namespace: &'a str,
}

/// Closed set of strategies, one per intent
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Subject/predicate lookup
    What(WhatStrategy),
    /// Domain/range of a property, with source disambiguation
    DomainRange(DomainRangeStrategy),
    /// Properties of a domain or range class
    DomainRangeProperty(DomainRangePropertyStrategy),
    /// Assembly attributes and mass filtering
    Assembly(AssemblyStrategy),
    /// Subclass/superclass listing
    SubSuper(SubSuperStrategy),
}

impl Strategy {
    /// A fresh strategy for an intent
    pub fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::What => Strategy::What(WhatStrategy::new()),
            Intent::DomainRange => Strategy::DomainRange(DomainRangeStrategy::new()),
            Intent::DomainRangeProperty => {
                Strategy::DomainRangeProperty(DomainRangePropertyStrategy::new())
            }
            Intent::Assembly => Strategy::Assembly(AssemblyStrategy::new()),
            Intent::SubSuper => Strategy::SubSuper(SubSuperStrategy::new()),
        }
    }

    /// The intent this strategy answers
    pub fn intent(&self) -> Intent {
        match self {
            Strategy::What(_) => Intent::What,
            Strategy::DomainRange(_) => Intent::DomainRange,
            Strategy::DomainRangeProperty(_) => Intent::DomainRangeProperty,
            Strategy::Assembly(_) => Intent::Assembly,
            Strategy::SubSuper(_) => Intent::SubSuper,
        }
    }

    /// Runs the strategy for one turn
    pub async fn execute(&mut self, ctx: RequestContext<'_>) -> StrategyOutcome {
        match self {
            Strategy::What(s) => s.execute(ctx).await,
            Strategy::DomainRange(s) => s.execute(ctx).await,
            Strategy::DomainRangeProperty(s) => s.execute(ctx).await,
            Strategy::Assembly(s) => s.execute(ctx).await,
            Strategy::SubSuper(s) => s.execute(ctx).await,
        }
    }
}
