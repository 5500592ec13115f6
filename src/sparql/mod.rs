//! Graph query layer
//!
//! [`GraphQueryClient`] is the contract the strategies call. The production
//! implementation renders fixed SPARQL templates and sends them to an HTTP
//! endpoint; [`StubGraphClient`] answers from memory.

pub mod binding;
pub mod client;
pub mod fuseki;
pub mod memory;
pub mod queries;

pub use binding::{BindingRecord, BindingValue, SparqlResults, TermKind};
pub use client::{GraphQueryClient, SparqlExecutor, SparqlGraphClient};
pub use fuseki::FusekiClient;
pub use memory::{GraphOperation, StubGraphClient};
pub use queries::{DomainRangeQuery, MassRange};
