//! "What is the <subject> <predicate>?" lookups

use tracing::{debug, warn};

use super::render::short_name;
use super::{RequestContext, StrategyOutcome};
use crate::nlp::stemmer;

const REPHRASE: &str =
    "Please ask the question again in the form 'What is the <subject> <property>?' :)";

/// Looks up the object of a subject/predicate pair. Predicate names match
/// exactly or by Porter stem, so `imports` finds `owl:imports`.
#[derive(Debug, Clone, Default)]
pub struct WhatStrategy;

impl WhatStrategy {
    /// Creates the strategy
    pub fn new() -> Self {
        Self
    }

    /// Runs one turn
    pub async fn execute(&self, ctx: RequestContext<'_>) -> StrategyOutcome {
        let Some(tokens) = ctx.input.tagged() else {
            return StrategyOutcome::fallback(REPHRASE);
        };
        let (Some(subject), Some(predicate)) =
            (tokens.positional_subject(), tokens.positional_predicate())
        else {
            return StrategyOutcome::fallback(REPHRASE);
        };

        let subject_iri = if subject.is_uri() {
            subject.text.clone()
        } else {
            format!("{}{}", ctx.namespace, subject.text)
        };
        let wanted = predicate.text.as_str();
        let wanted_stem = stemmer::stem(wanted);

        let rows = ctx.client.generic_triple(Some(&subject_iri), None, None).await;
        debug!(subject = %subject_iri, predicate = wanted, rows = rows.len(), "matching predicates");

        let mut answer = None;
        for row in &rows {
            let (Some(predicate_uri), Some(object)) = (row.value("predicate"), row.value("object"))
            else {
                continue;
            };
            let name = short_name(predicate_uri);
            if name != wanted && stemmer::stem(name) != wanted_stem {
                continue;
            }
            if let Err(e) = ctx.predicates.insert(name, predicate_uri) {
                warn!(error = %e, "predicate not cached");
            }
            answer.get_or_insert_with(|| object.to_string());
        }

        match answer {
            Some(object) => StrategyOutcome::answer(object),
            None => StrategyOutcome::fallback(format!(
                "Unable to find '{}' for '{}'",
                wanted, subject.text
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{PredicateCache, QueryParser, QuestionTokenizer, UserInput};
    use crate::sparql::{BindingRecord, StubGraphClient};

    const NS: &str = "http://imce.jpl.nasa.gov/foundation/";

    fn triple(predicate: &str, object: &str) -> BindingRecord {
        BindingRecord::new()
            .with_uri("predicate", predicate)
            .with_uri("object", object)
    }

    fn client() -> StubGraphClient {
        StubGraphClient::new().with_triples(
            "http://imce.jpl.nasa.gov/foundation/mission",
            vec![
                triple(
                    "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
                    "http://www.w3.org/2002/07/owl#Ontology",
                ),
                triple(
                    "http://www.w3.org/2002/07/owl#imports",
                    "http://imce.jpl.nasa.gov/foundation/base",
                ),
                triple(
                    "http://purl.org/dc/elements/1.1/description",
                    "The mission vocabulary",
                ),
            ],
        )
    }

    async fn ask(question: &str, client: &StubGraphClient, cache: &mut PredicateCache) -> StrategyOutcome {
        let input = UserInput::Tagged(QuestionTokenizer::new().parse(question).unwrap());
        WhatStrategy::new()
            .execute(RequestContext {
                input: &input,
                predicates: cache,
                client,
                namespace: NS,
            })
            .await
    }

    #[tokio::test]
    async fn test_stem_matches_plural_predicate() {
        let client = client();
        let mut cache = PredicateCache::new();
        let outcome = ask("What is the mission imports?", &client, &mut cache).await;
        assert_eq!(outcome, StrategyOutcome::answer("http://imce.jpl.nasa.gov/foundation/base"));
        assert_eq!(cache.get("imports"), Some("http://www.w3.org/2002/07/owl#imports"));
    }

    #[tokio::test]
    async fn test_exact_match() {
        let client = client();
        let mut cache = PredicateCache::new();
        let outcome = ask("What is the mission description?", &client, &mut cache).await;
        assert_eq!(outcome.response, "The mission vocabulary");
    }

    #[tokio::test]
    async fn test_uri_subject_used_verbatim() {
        let client = client();
        let mut cache = PredicateCache::new();
        let outcome = ask(
            "What is http://imce.jpl.nasa.gov/foundation/mission imports?",
            &client,
            &mut cache,
        )
        .await;
        assert_eq!(outcome.response, "http://imce.jpl.nasa.gov/foundation/base");
    }

    #[tokio::test]
    async fn test_no_match_is_explicit() {
        let client = client();
        let mut cache = PredicateCache::new();
        let outcome = ask("What is the mission creator?", &client, &mut cache).await;
        assert_eq!(outcome, StrategyOutcome::fallback("Unable to find 'creator' for 'mission'"));
        assert!(cache.is_empty());
    }
}
