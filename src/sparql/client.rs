//! Graph query client contract and its SPARQL-backed implementation

use async_trait::async_trait;
use tracing::{debug, warn};

use super::binding::BindingRecord;
use super::queries::{self, DomainRangeQuery, MassRange};
use crate::error::Result;

/// Parameterized graph lookups used by the strategies.
///
/// Every operation returns rows in result order and never fails: transport
/// or query errors are logged and surface as an empty list.
#[async_trait]
pub trait GraphQueryClient: Send + Sync {
    /// Triples matching any combination of fixed subject, predicate and object IRIs
    async fn generic_triple(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Vec<BindingRecord>;

    /// One row per distinct domain/range combination of a property
    async fn domain_range(&self, query: &DomainRangeQuery) -> Vec<BindingRecord>;

    /// Properties whose domain class carries `domain_label`
    async fn domain_properties(&self, domain_label: &str) -> Vec<BindingRecord>;

    /// Properties whose range class carries `range_label`
    async fn range_properties(&self, range_label: &str) -> Vec<BindingRecord>;

    /// Subclasses of a class IRI (`sub` variable)
    async fn subclasses(&self, super_uri: &str) -> Vec<BindingRecord>;

    /// Superclasses of a class IRI (`super` variable)
    async fn superclasses(&self, sub_uri: &str) -> Vec<BindingRecord>;

    /// Mass and function rows of an assembly identifier
    async fn assembly_attributes(&self, id: &str) -> Vec<BindingRecord>;

    /// Assemblies whose mass falls strictly inside a range
    async fn assemblies_by_mass(&self, range: &MassRange) -> Vec<BindingRecord>;
}

/// Runs a SPARQL SELECT and returns its rows
#[async_trait]
pub trait SparqlExecutor: Send + Sync {
    /// Executes a query string
    async fn select(&self, query: &str) -> Result<Vec<BindingRecord>>;
}

/// [`GraphQueryClient`] that renders fixed templates and hands them to an executor
#[derive(Debug, Clone)]
pub struct SparqlGraphClient<E> {
    executor: E,
}

impl<E: SparqlExecutor> SparqlGraphClient<E> {
    /// Wraps an executor
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Returns the underlying executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    async fn run(&self, operation: &str, query: Result<String>) -> Vec<BindingRecord> {
        let query = match query {
            Ok(query) => query,
            Err(e) => {
                warn!(operation, error = %e, "rejected query parameters");
                return Vec::new();
            }
        };

        debug!(operation, %query, "executing SPARQL");
        match self.executor.select(&query).await {
            Ok(rows) => {
                debug!(operation, rows = rows.len(), "SPARQL returned");
                rows
            }
            Err(e) => {
                warn!(operation, error = %e, "SPARQL query failed, treating as no data");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<E: SparqlExecutor> GraphQueryClient for SparqlGraphClient<E> {
    async fn generic_triple(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Vec<BindingRecord> {
        self.run(
            "generic_triple",
            queries::generic_triple(subject, predicate, object),
        )
        .await
    }

    async fn domain_range(&self, query: &DomainRangeQuery) -> Vec<BindingRecord> {
        self.run("domain_range", queries::domain_range(query)).await
    }

    async fn domain_properties(&self, domain_label: &str) -> Vec<BindingRecord> {
        self.run(
            "domain_properties",
            Ok(queries::domain_properties(domain_label)),
        )
        .await
    }

    async fn range_properties(&self, range_label: &str) -> Vec<BindingRecord> {
        self.run("range_properties", Ok(queries::range_properties(range_label)))
            .await
    }

    async fn subclasses(&self, super_uri: &str) -> Vec<BindingRecord> {
        self.run("subclasses", queries::subclasses(super_uri)).await
    }

    async fn superclasses(&self, sub_uri: &str) -> Vec<BindingRecord> {
        self.run("superclasses", queries::superclasses(sub_uri)).await
    }

    async fn assembly_attributes(&self, id: &str) -> Vec<BindingRecord> {
        self.run("assembly_attributes", Ok(queries::assembly_attributes(id)))
            .await
    }

    async fn assemblies_by_mass(&self, range: &MassRange) -> Vec<BindingRecord> {
        self.run("assemblies_by_mass", Ok(queries::assemblies_by_mass(range)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;

    /// Records every query and answers with a fixed outcome
    #[derive(Default)]
    struct RecordingExecutor {
        queries: Mutex<Vec<String>>,
        rows: Vec<BindingRecord>,
        fail: bool,
    }

    impl RecordingExecutor {
        fn seen(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SparqlExecutor for RecordingExecutor {
        async fn select(&self, query: &str) -> Result<Vec<BindingRecord>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(Error::Endpoint {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(self.rows.clone())
        }
    }

    #[tokio::test]
    async fn test_rows_pass_through() {
        let executor = RecordingExecutor {
            rows: vec![BindingRecord::new().with_uri("sub", "http://example.org/a#D")],
            ..Default::default()
        };
        let client = SparqlGraphClient::new(executor);

        let rows = client.subclasses("http://example.org/a#C").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("sub"), Some("http://example.org/a#D"));

        let seen = client.executor().seen();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("?sub rdfs:subClassOf <http://example.org/a#C> ."));
    }

    #[tokio::test]
    async fn test_transport_failure_is_empty_result() {
        let executor = RecordingExecutor {
            fail: true,
            ..Default::default()
        };
        let client = SparqlGraphClient::new(executor);
        assert!(client.domain_properties("Authority").await.is_empty());
        assert_eq!(client.executor().seen().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_iri_never_reaches_executor() {
        let client = SparqlGraphClient::new(RecordingExecutor::default());
        assert!(client.superclasses("not a uri").await.is_empty());
        assert!(client.generic_triple(Some("mission"), None, None).await.is_empty());
        assert!(client.executor().seen().is_empty());
    }

    #[tokio::test]
    async fn test_label_is_escaped() {
        let client = SparqlGraphClient::new(RecordingExecutor::default());
        client
            .domain_range(&DomainRangeQuery::by_label("x\" } DROP ALL { \""))
            .await;
        let seen = client.executor().seen();
        assert!(seen[0].contains("rdfs:label \"x\\\" } DROP ALL { \\\"\" ."));
    }
}
