//! Domain and range of a property label, with data-source disambiguation
//!
//! A label can be defined by several vocabularies. When the matching rows
//! come from more than one authority the user is shown a menu and the
//! strategy keeps a [`Disambiguation`] until a valid choice arrives.

use tracing::{debug, info};

use super::render::{authority, bullet, TAB};
use super::{RequestContext, StrategyOutcome};
use crate::nlp::{PosTag, TaggedUtterance, UserInput};
use crate::sparql::{BindingRecord, DomainRangeQuery, GraphQueryClient};

const REPHRASE: &str =
    "Please ask the question again and include a property label after 'domain' or 'range' :)";
const REPROMPT: &str = "Sorry, which data source would you like for domain/range querying?";
const ALL_OF_THE_ABOVE: &str = "all of the above";

/// Which halves of the answer the question asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aspect {
    /// "domain and range"
    Both,
    /// "domain" only
    Domain,
    /// "range" only
    Range,
}

impl Aspect {
    fn describe(&self, head: &str, row: &BindingRecord) -> String {
        let domain = row.first_value(&["domain_label", "domain"]).unwrap_or_default();
        let range = row.first_value(&["range_label", "range"]).unwrap_or_default();
        match self {
            Aspect::Both => format!("{}, the domain is '{}' and range is '{}'.", head, domain, range),
            Aspect::Domain => format!("{}, the domain is '{}'.", head, domain),
            Aspect::Range => format!("{}, the range is '{}'.", head, range),
        }
    }
}

/// Pending source choice for one ambiguous label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disambiguation {
    /// Property label under disambiguation
    pub label: String,
    /// Requested aspect
    pub aspect: Aspect,
    /// Authority and property IRI, in menu order
    pub options: Vec<(String, String)>,
}

impl Disambiguation {
    fn property_for(&self, source: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(authority, _)| authority == source)
            .map(|(_, uri)| uri.as_str())
    }
}

/// Domain/range lookup strategy
#[derive(Debug, Clone, Default)]
pub struct DomainRangeStrategy {
    pending: Option<Disambiguation>,
}

impl DomainRangeStrategy {
    /// Creates the strategy with no pending choice
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending disambiguation, if a menu was shown
    pub fn pending(&self) -> Option<&Disambiguation> {
        self.pending.as_ref()
    }

    /// Runs one turn
    pub async fn execute(&mut self, ctx: RequestContext<'_>) -> StrategyOutcome {
        match ctx.input {
            UserInput::FollowUp(reply) => match self.pending.take() {
                Some(pending) => self.resolve(pending, reply.trim(), ctx.client).await,
                None => StrategyOutcome::fallback(REPHRASE),
            },
            UserInput::Tagged(tokens) => {
                self.pending = None;
                self.lookup(tokens, ctx.client).await
            }
        }
    }

    async fn lookup(&mut self, tokens: &TaggedUtterance, client: &dyn GraphQueryClient) -> StrategyOutcome {
        let domain = tokens.position("domain", PosTag::Nn);
        let range = tokens.position("range", PosTag::Nn);
        let (aspect, marker) = match (domain, range) {
            (Some(d), Some(r)) => (Aspect::Both, d.max(r)),
            (Some(d), None) => (Aspect::Domain, d),
            (None, Some(r)) => (Aspect::Range, r),
            (None, None) => return StrategyOutcome::fallback(REPHRASE),
        };
        let Some(label_token) = tokens.argument_after(marker) else {
            return StrategyOutcome::fallback(REPHRASE);
        };
        let label = label_token.unquoted().to_string();

        let rows = client.domain_range(&DomainRangeQuery::by_label(&label)).await;
        debug!(%label, ?aspect, rows = rows.len(), "domain/range lookup");

        let head = format!("For property '{}'", label);
        match rows.as_slice() {
            [] => StrategyOutcome::fallback(no_data(&label)),
            [row] => StrategyOutcome::answer(aspect.describe(&head, row)),
            _ => {
                let options = distinct_sources(&rows);
                if options.len() <= 1 {
                    let combined: String = rows
                        .iter()
                        .map(|row| format!("{} ", aspect.describe(&head, row)))
                        .collect();
                    return StrategyOutcome::answer(combined);
                }

                let mut menu = format!("{}, which data source are you referring to: <br>", head);
                for (source, _) in &options {
                    menu.push_str(&bullet(source));
                }
                menu.push_str(&format!("{}- {}", TAB, ALL_OF_THE_ABOVE));

                info!(%label, sources = options.len(), "asking user to pick a data source");
                self.pending = Some(Disambiguation {
                    label,
                    aspect,
                    options,
                });
                StrategyOutcome::prompt(menu)
            }
        }
    }

    async fn resolve(
        &mut self,
        pending: Disambiguation,
        reply: &str,
        client: &dyn GraphQueryClient,
    ) -> StrategyOutcome {
        if reply.eq_ignore_ascii_case(ALL_OF_THE_ABOVE) {
            let mut combined = String::new();
            for (source, uri) in &pending.options {
                if let Some(row) = first_row(client, &pending.label, uri).await {
                    let head = format!("For property '{}' in {}", pending.label, source);
                    combined.push_str(&pending.aspect.describe(&head, &row));
                    combined.push(' ');
                }
            }
            return if combined.is_empty() {
                StrategyOutcome::fallback(no_data(&pending.label))
            } else {
                StrategyOutcome::answer(combined)
            };
        }

        let Some(uri) = pending.property_for(reply) else {
            debug!(reply, "reply matches no data source");
            self.pending = Some(pending);
            return StrategyOutcome::prompt(REPROMPT);
        };

        match first_row(client, &pending.label, uri).await {
            Some(row) => {
                let head = format!("For property '{}' in {}", pending.label, reply);
                StrategyOutcome::answer(pending.aspect.describe(&head, &row))
            }
            None => StrategyOutcome::fallback(no_data(&pending.label)),
        }
    }
}

fn no_data(label: &str) -> String {
    format!("Unable to find information for domain/range of '{}'", label)
}

/// Distinct authorities of the rows' property IRIs, first seen first
fn distinct_sources(rows: &[BindingRecord]) -> Vec<(String, String)> {
    let mut options: Vec<(String, String)> = Vec::new();
    for uri in rows.iter().filter_map(|row| row.value("property")) {
        let source = authority(uri);
        if !options.iter().any(|(s, _)| s == source) {
            options.push((source.to_string(), uri.to_string()));
        }
    }
    options
}

async fn first_row(client: &dyn GraphQueryClient, label: &str, property: &str) -> Option<BindingRecord> {
    let query = DomainRangeQuery::by_label(label).with_property(property);
    client.domain_range(&query).await.into_iter().next()
}
