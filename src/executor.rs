//! Conversation orchestrator
//!
//! [`QueryExecutor`] owns the state of one conversation: the state machine,
//! the strategy in progress, and the predicate and answer caches. Each call
//! to [`QueryExecutor::submit`] runs one classify, execute, reset cycle and
//! always produces a response string.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::nlp::{
    ConversationState, Intent, IntentClassifier, PredicateCache, QueryCache, QueryParser,
    QuestionTokenizer, StateEvent, TaggedUtterance, UserInput,
};
use crate::sparql::GraphQueryClient;
use crate::strategy::{RequestContext, ResponseStatus, Strategy};

/// Reply when no strategy matches
pub const GENERIC_FAILURE: &str =
    "Sorry, I don't know how to answer that yet. Please try rephrasing your question.";

/// Reply when the tokenizer rejects the input
pub const PARSE_FAILURE: &str =
    "Sorry, I couldn't understand that question. Please check for unmatched quotes and try again.";

const GREETING: &str = "Hello, welcome!";
const ABOUT: &str = "I am an AI Chatbot interface that is here to help answer questions related to the FireSat (Fire Satallite) mission design. Feel free to ask below!";
const DATASET: &str = "I interface with the FireSat dataset.";

/// One turn's reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
    /// Rendered response text
    pub response: String,
    /// Whether another reply is expected
    pub status: ResponseStatus,
}

impl QueryResponse {
    fn complete(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            status: ResponseStatus::Complete,
        }
    }

    /// Checks if the executor is waiting for a follow-up reply
    pub fn is_awaiting_reply(&self) -> bool {
        self.status == ResponseStatus::AwaitingReply
    }
}

/// Small-talk inputs answered without touching the graph
fn canned_reply(text: &str) -> Option<&'static str> {
    let normalized = text.trim().to_lowercase();
    let normalized = normalized
        .strip_suffix(['.', '!', '?'])
        .unwrap_or(normalized.as_str())
        .trim_end();
    match normalized {
        "hi" | "hello" | "hello there" => Some(GREETING),
        "tell me about yourself" => Some(ABOUT),
        "what dataset do you interact with" => Some(DATASET),
        _ => None,
    }
}

/// Cache key of a What question: the raw subject and predicate tokens
fn what_key(tokens: &TaggedUtterance) -> Option<(&str, &str)> {
    Some((
        tokens.positional_subject()?.text.as_str(),
        tokens.positional_predicate()?.text.as_str(),
    ))
}

/// Per-conversation question answering pipeline
pub struct QueryExecutor {
    client: Arc<dyn GraphQueryClient>,
    parser: Box<dyn QueryParser>,
    classifier: IntentClassifier,
    namespace: String,
    state: ConversationState,
    active: Option<Strategy>,
    predicates: PredicateCache,
    answers: QueryCache,
}

impl QueryExecutor {
    /// Creates an executor with the default tokenizer
    pub fn new(client: Arc<dyn GraphQueryClient>, namespace: impl Into<String>) -> Self {
        Self {
            client,
            parser: Box::new(QuestionTokenizer::new()),
            classifier: IntentClassifier::new(),
            namespace: namespace.into(),
            state: ConversationState::Idle,
            active: None,
            predicates: PredicateCache::new(),
            answers: QueryCache::new(),
        }
    }

    /// Replaces the question parser
    pub fn with_parser(mut self, parser: impl QueryParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Current conversation state
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Predicates discovered so far
    pub fn predicates(&self) -> &PredicateCache {
        &self.predicates
    }

    /// Memoized What answers
    pub fn answers(&self) -> &QueryCache {
        &self.answers
    }

    /// Drops any pending strategy and returns to the idle state
    pub fn reset(&mut self) {
        if self.state != ConversationState::Idle {
            info!(state = ?self.state, "abandoning pending conversation");
        }
        self.state = ConversationState::Idle;
        self.active = None;
    }

    /// Runs one conversational turn
    pub async fn submit(&mut self, text: &str) -> QueryResponse {
        if self.state.reparses_input() {
            if let Some(reply) = canned_reply(text) {
                debug!("canned reply");
                return QueryResponse::complete(reply);
            }
        }

        let input = if self.state.reparses_input() {
            match self.parser.parse(text) {
                Ok(tokens) => {
                    debug!(%tokens, "tagged question");
                    UserInput::Tagged(tokens)
                }
                Err(e) => {
                    warn!(error = %e, "question rejected by tokenizer");
                    return QueryResponse::complete(PARSE_FAILURE);
                }
            }
        } else {
            UserInput::FollowUp(text.to_string())
        };

        let Some(intent) = self.classifier.classify(self.state, &input) else {
            info!("no strategy matched");
            return QueryResponse::complete(GENERIC_FAILURE);
        };

        if intent == Intent::What {
            if let Some(cached) = input
                .tagged()
                .and_then(what_key)
                .and_then(|(s, p)| self.answers.get(s, p))
            {
                debug!("answer served from cache");
                return QueryResponse::complete(cached);
            }
        }

        let mut strategy = match self.active.take() {
            Some(strategy) if strategy.intent() == intent => strategy,
            _ => Strategy::for_intent(intent),
        };
        self.state = self.state.next(StateEvent::Dispatched(intent));
        info!(%intent, "dispatching");

        let outcome = strategy
            .execute(RequestContext {
                input: &input,
                predicates: &mut self.predicates,
                client: self.client.as_ref(),
                namespace: &self.namespace,
            })
            .await;

        if outcome.is_terminal() {
            self.state = self.state.next(StateEvent::Completed);
            if intent == Intent::What && outcome.resolved {
                if let Some((subject, predicate)) = input.tagged().and_then(what_key) {
                    self.answers.insert(subject, predicate, outcome.response.as_str());
                }
            }
        } else {
            self.state = self.state.next(StateEvent::AwaitingReply);
            self.active = Some(strategy);
            debug!(state = ?self.state, "awaiting reply");
        }

        QueryResponse {
            response: outcome.response,
            status: outcome.status,
        }
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("namespace", &self.namespace)
            .field("state", &self.state)
            .field("active", &self.active)
            .field("predicates", &self.predicates.len())
            .field("answers", &self.answers.len())
            .finish()
    }
}
