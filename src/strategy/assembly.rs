//! Assembly attributes by identifier, and assemblies by mass range

use tracing::debug;

use super::render::{bullet, humanize_identifier, short_name};
use super::{RequestContext, StrategyOutcome};
use crate::nlp::{PosTag, TaggedUtterance};
use crate::sparql::MassRange;

const MISSING_ID: &str = "Please ask the question again and contain the keyword 'id' in your question :)";
const INVALID_RANGE: &str = "Please enter a valid mass range";
const EMPTY_RANGE: &str = "Unable to find information for subjects within this range";

/// Assembly strategy
///
/// Comparative questions ("heavier than", "lighter than") filter assemblies
/// by mass; anything else looks up the mass and functions of one assembly
/// identified by the token after `id`.
#[derive(Debug, Clone, Default)]
pub struct AssemblyStrategy;

impl AssemblyStrategy {
    /// Creates the strategy
    pub fn new() -> Self {
        Self
    }

    /// Runs one turn
    pub async fn execute(&self, ctx: RequestContext<'_>) -> StrategyOutcome {
        let Some(tokens) = ctx.input.tagged() else {
            return StrategyOutcome::fallback(MISSING_ID);
        };

        let heavier = tokens.position("heavier", PosTag::Jjr);
        let lighter = tokens.position("lighter", PosTag::Jjr);
        if heavier.is_some() || lighter.is_some() {
            return self.by_mass(tokens, heavier, lighter, ctx).await;
        }
        self.attributes(tokens, ctx).await
    }

    async fn attributes(&self, tokens: &TaggedUtterance, ctx: RequestContext<'_>) -> StrategyOutcome {
        let Some(id) = tokens
            .position("id", PosTag::Nn)
            .and_then(|i| tokens.argument_after(i))
            .map(|t| t.unquoted())
        else {
            return StrategyOutcome::fallback(MISSING_ID);
        };

        let rows = ctx.client.assembly_attributes(id).await;
        debug!(id, rows = rows.len(), "assembly attributes");
        if rows.is_empty() {
            return StrategyOutcome::fallback(format!(
                "Unable to find information about assembly object id {}",
                id
            ));
        }

        let mut response = format!("For assembly object {}: <br>\n ", id);

        if tokens.contains("mass", PosTag::Nn) {
            if let Some(mass) = rows.iter().find_map(|row| row.value("mass")) {
                response.push_str(&format!("The mass is {} kg. <br>\n ", mass));
            }
        }

        let wants_function = tokens
            .position_any(&[("function", PosTag::Nn), ("functions", PosTag::Nns)])
            .is_some();
        if wants_function {
            let mut functions: Vec<&str> = Vec::new();
            for uri in rows.iter().filter_map(|row| row.value("function")) {
                if !functions.contains(&uri) {
                    functions.push(uri);
                }
            }
            match functions.len() {
                0 => {}
                1 => response.push_str("The function is: <br> "),
                _ => response.push_str("The functions are: <br> "),
            }
            for uri in functions {
                response.push_str(&bullet(&humanize_identifier(short_name(uri))));
                response.push(' ');
            }
        }

        StrategyOutcome::answer(response)
    }

    async fn by_mass(
        &self,
        tokens: &TaggedUtterance,
        heavier: Option<usize>,
        lighter: Option<usize>,
        ctx: RequestContext<'_>,
    ) -> StrategyOutcome {
        let bound = |index: Option<usize>| -> Result<Option<f64>, ()> {
            match index {
                None => Ok(None),
                Some(i) => tokens
                    .argument_after(i)
                    .and_then(|t| t.text.replace(',', "").parse::<f64>().ok())
                    .map(Some)
                    .ok_or(()),
            }
        };
        let (Ok(lower), Ok(upper)) = (bound(heavier), bound(lighter)) else {
            return StrategyOutcome::fallback(INVALID_RANGE);
        };
        let Some(range) = MassRange::new(lower, upper) else {
            return StrategyOutcome::fallback(INVALID_RANGE);
        };

        let rows = ctx.client.assemblies_by_mass(&range).await;
        debug!(?lower, ?upper, rows = rows.len(), "assemblies by mass");

        let mut seen: Vec<&str> = Vec::new();
        let mut response = String::from("The subjects are: <br> ");
        for row in &rows {
            let Some(assembly) = row.value("assembly") else {
                continue;
            };
            if seen.contains(&assembly) {
                continue;
            }
            seen.push(assembly);
            let label = match row.value("label") {
                Some(label) => label.to_string(),
                None => humanize_identifier(short_name(assembly)),
            };
            response.push_str(&bullet(&label));
            response.push(' ');
        }

        if seen.is_empty() {
            StrategyOutcome::fallback(EMPTY_RANGE)
        } else {
            StrategyOutcome::answer(response)
        }
    }
}
