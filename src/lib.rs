//! # nl2sparql
//!
//! Natural-language question answering over an RDF/OWL systems-engineering
//! ontology.
//!
//! A question is tokenized and part-of-speech tagged, classified into one of
//! five intents, and answered by a strategy that runs a fixed SPARQL
//! template against a graph endpoint and renders the rows as English. The
//! domain/range strategy can hold a conversation open across turns to ask
//! which data source the user means.

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod nlp;
pub mod session;
pub mod sparql;
pub mod strategy;

pub use error::{Error, Result};
pub use executor::{QueryExecutor, QueryResponse};
pub use session::{SessionId, SessionRegistry};
pub use sparql::{FusekiClient, GraphQueryClient, SparqlGraphClient, StubGraphClient};
pub use strategy::ResponseStatus;
