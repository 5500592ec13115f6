//! Properties whose domain or range is a given class label

use tracing::debug;

use super::{RequestContext, StrategyOutcome};
use crate::nlp::{PosTag, TaggedUtterance};

const REPHRASE: &str = "Please ask the question again and include a label after exactly one of the keywords 'domain' or 'range' :)";

/// Lists properties by domain or range label
#[derive(Debug, Clone, Default)]
pub struct DomainRangePropertyStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Domain,
    Range,
}

impl Side {
    fn as_str(&self) -> &'static str {
        match self {
            Side::Domain => "domain",
            Side::Range => "range",
        }
    }
}

/// The single domain/range marker. Taggers disagree on "range" so a verb
/// tag is accepted too.
fn marker(tokens: &TaggedUtterance) -> Option<(Side, usize)> {
    let find = |word: &str| tokens.position_any(&[(word, PosTag::Nn), (word, PosTag::Vbp)]);
    match (find("domain"), find("range")) {
        (Some(i), None) => Some((Side::Domain, i)),
        (None, Some(i)) => Some((Side::Range, i)),
        _ => None,
    }
}

impl DomainRangePropertyStrategy {
    /// Creates the strategy
    pub fn new() -> Self {
        Self
    }

    /// Runs one turn
    pub async fn execute(&self, ctx: RequestContext<'_>) -> StrategyOutcome {
        let Some(tokens) = ctx.input.tagged() else {
            return StrategyOutcome::fallback(REPHRASE);
        };
        let Some((side, index)) = marker(tokens) else {
            return StrategyOutcome::fallback(REPHRASE);
        };
        let Some(label) = tokens.argument_after(index).map(|t| t.unquoted()) else {
            return StrategyOutcome::fallback(REPHRASE);
        };

        let rows = match side {
            Side::Domain => ctx.client.domain_properties(label).await,
            Side::Range => ctx.client.range_properties(label).await,
        };
        debug!(side = side.as_str(), label, rows = rows.len(), "property listing");

        let names: Vec<&str> = rows
            .iter()
            .filter_map(|row| row.value("property_label"))
            .collect();
        if names.is_empty() {
            return StrategyOutcome::fallback(format!(
                "Unable to find information about {} {}",
                side.as_str(),
                label
            ));
        }

        StrategyOutcome::answer(format!(
            "For {} '{}', the properties are: {}.",
            side.as_str(),
            label,
            names.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{PredicateCache, QueryParser, QuestionTokenizer, UserInput};
    use crate::sparql::{BindingRecord, GraphOperation, StubGraphClient};

    fn labels(names: &[&str]) -> Vec<BindingRecord> {
        names
            .iter()
            .map(|n| BindingRecord::new().with_literal("property_label", *n))
            .collect()
    }

    async fn run(input: UserInput, client: &StubGraphClient) -> StrategyOutcome {
        let mut cache = PredicateCache::new();
        DomainRangePropertyStrategy::new()
            .execute(RequestContext {
                input: &input,
                predicates: &mut cache,
                client,
                namespace: "http://example.org/",
            })
            .await
    }

    async fn ask(question: &str, client: &StubGraphClient) -> StrategyOutcome {
        run(UserInput::Tagged(QuestionTokenizer::new().parse(question).unwrap()), client).await
    }

    #[tokio::test]
    async fn test_domain_listing() {
        let client = StubGraphClient::new().with_domain_properties(
            "Authority",
            labels(&["has authority", "delegates", "is authorized by"]),
        );
        let outcome = ask("What are the properties with domain Authority?", &client).await;
        assert_eq!(
            outcome,
            StrategyOutcome::answer(
                "For domain 'Authority', the properties are: has authority, delegates, is authorized by."
            )
        );
        assert_eq!(client.calls(GraphOperation::RangeProperties), 0);
    }

    #[tokio::test]
    async fn test_range_listing_with_verb_tag() {
        let client = StubGraphClient::new()
            .with_range_properties("Function", labels(&["performs"]));
        let input = UserInput::Tagged(TaggedUtterance::from_pairs([
            ("What", PosTag::Wp),
            ("properties", PosTag::Nns),
            ("range", PosTag::Vbp),
            ("Function", PosTag::Nnp),
            ("?", PosTag::Terminal),
        ]));
        let outcome = run(input, &client).await;
        assert_eq!(outcome.response, "For range 'Function', the properties are: performs.");
    }

    #[tokio::test]
    async fn test_no_data() {
        let client = StubGraphClient::new();
        let outcome = ask("What are the properties with domain Nothing?", &client).await;
        assert_eq!(outcome, StrategyOutcome::fallback("Unable to find information about domain Nothing"));
    }

    #[tokio::test]
    async fn test_requires_exactly_one_marker() {
        let client = StubGraphClient::new();
        let both = ask("What properties have domain and range Authority?", &client).await;
        assert_eq!(both, StrategyOutcome::fallback(REPHRASE));

        let neither = ask("What are the properties of Authority?", &client).await;
        assert_eq!(neither, StrategyOutcome::fallback(REPHRASE));
        assert_eq!(client.total_calls(), 0);
    }
}
