//! Direct subclass and superclass listing

use tracing::debug;

use super::render::bullet;
use super::{RequestContext, StrategyOutcome};
use crate::nlp::PosTag;

const REPHRASE: &str =
    "Please ask the question again and include a class URI after 'subclasses' or 'superclasses' :)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Sub,
    Super,
}

impl Direction {
    /// Binding variable holding each listed class
    fn variable(&self) -> &'static str {
        match self {
            Direction::Sub => "sub",
            Direction::Super => "super",
        }
    }

    fn plural(&self) -> &'static str {
        match self {
            Direction::Sub => "subclasses",
            Direction::Super => "superclasses",
        }
    }
}

/// Lists the subclasses or superclasses of a class IRI
#[derive(Debug, Clone, Default)]
pub struct SubSuperStrategy;

impl SubSuperStrategy {
    /// Creates the strategy
    pub fn new() -> Self {
        Self
    }

    /// Runs one turn
    pub async fn execute(&self, ctx: RequestContext<'_>) -> StrategyOutcome {
        let Some(tokens) = ctx.input.tagged() else {
            return StrategyOutcome::fallback(REPHRASE);
        };

        let sub = tokens.position_any(&[("subclass", PosTag::Nn), ("subclasses", PosTag::Nns)]);
        let sup = tokens.position_any(&[("superclass", PosTag::Nn), ("superclasses", PosTag::Nns)]);
        let (direction, marker) = match (sub, sup) {
            (Some(i), _) => (Direction::Sub, i),
            (None, Some(i)) => (Direction::Super, i),
            (None, None) => return StrategyOutcome::fallback(REPHRASE),
        };
        let Some(class) = tokens.argument_after(marker).map(|t| t.bare()) else {
            return StrategyOutcome::fallback(REPHRASE);
        };

        let rows = match direction {
            Direction::Sub => ctx.client.subclasses(class).await,
            Direction::Super => ctx.client.superclasses(class).await,
        };
        debug!(class, direction = direction.plural(), rows = rows.len(), "class hierarchy");

        let items: Vec<&str> = rows
            .iter()
            .filter_map(|row| row.value(direction.variable()))
            .collect();
        if items.is_empty() {
            return StrategyOutcome::fallback(format!(
                "Unable to find information for {} of '{}'",
                direction.plural(),
                class
            ));
        }

        let mut response = format!("The {} for '{}' are:<br>", direction.plural(), class);
        for item in items {
            response.push_str(&bullet(item));
            response.push(' ');
        }
        StrategyOutcome::answer(response)
    }
}
