//! In-memory graph client
//!
//! Answers each operation from canned binding rows and counts calls, for
//! offline runs and tests that need to prove a query was (or was not) made.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::binding::{BindingRecord, BindingValue};
use super::client::GraphQueryClient;
use super::queries::{DomainRangeQuery, MassRange};

/// Graph operations, for call accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphOperation {
    /// `generic_triple`
    GenericTriple,
    /// `domain_range`
    DomainRange,
    /// `domain_properties`
    DomainProperties,
    /// `range_properties`
    RangeProperties,
    /// `subclasses`
    Subclasses,
    /// `superclasses`
    Superclasses,
    /// `assembly_attributes`
    AssemblyAttributes,
    /// `assemblies_by_mass`
    AssembliesByMass,
}

impl GraphOperation {
    const ALL: [GraphOperation; 8] = [
        GraphOperation::GenericTriple,
        GraphOperation::DomainRange,
        GraphOperation::DomainProperties,
        GraphOperation::RangeProperties,
        GraphOperation::Subclasses,
        GraphOperation::Superclasses,
        GraphOperation::AssemblyAttributes,
        GraphOperation::AssembliesByMass,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone)]
struct AssemblyMass {
    assembly: String,
    label: Option<String>,
    mass: f64,
}

/// Canned-response [`GraphQueryClient`]
#[derive(Debug, Default)]
pub struct StubGraphClient {
    triples: HashMap<String, Vec<BindingRecord>>,
    domain_ranges: HashMap<String, Vec<BindingRecord>>,
    domain_properties: HashMap<String, Vec<BindingRecord>>,
    range_properties: HashMap<String, Vec<BindingRecord>>,
    subclasses: HashMap<String, Vec<BindingRecord>>,
    superclasses: HashMap<String, Vec<BindingRecord>>,
    assemblies: HashMap<String, Vec<BindingRecord>>,
    masses: Vec<AssemblyMass>,
    calls: [AtomicUsize; 8],
}

fn bare(iri: &str) -> &str {
    iri.trim_start_matches('<').trim_end_matches('>')
}

impl StubGraphClient {
    /// Creates a client with no data
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned for a subject IRI by `generic_triple`
    pub fn with_triples(mut self, subject: &str, rows: Vec<BindingRecord>) -> Self {
        self.triples.insert(bare(subject).to_string(), rows);
        self
    }

    /// Rows returned for a property label by `domain_range`; narrowing by
    /// property IRI keeps only the rows whose `property` matches
    pub fn with_domain_range(mut self, label: &str, rows: Vec<BindingRecord>) -> Self {
        self.domain_ranges.insert(label.to_string(), rows);
        self
    }

    /// Rows returned for a domain label by `domain_properties`
    pub fn with_domain_properties(mut self, label: &str, rows: Vec<BindingRecord>) -> Self {
        self.domain_properties.insert(label.to_string(), rows);
        self
    }

    /// Rows returned for a range label by `range_properties`
    pub fn with_range_properties(mut self, label: &str, rows: Vec<BindingRecord>) -> Self {
        self.range_properties.insert(label.to_string(), rows);
        self
    }

    /// Rows returned for a class IRI by `subclasses`
    pub fn with_subclasses(mut self, class: &str, rows: Vec<BindingRecord>) -> Self {
        self.subclasses.insert(bare(class).to_string(), rows);
        self
    }

    /// Rows returned for a class IRI by `superclasses`
    pub fn with_superclasses(mut self, class: &str, rows: Vec<BindingRecord>) -> Self {
        self.superclasses.insert(bare(class).to_string(), rows);
        self
    }

    /// Rows returned for an assembly identifier by `assembly_attributes`
    pub fn with_assembly(mut self, id: &str, rows: Vec<BindingRecord>) -> Self {
        self.assemblies.insert(id.to_string(), rows);
        self
    }

    /// An assembly considered by `assemblies_by_mass`
    pub fn with_assembly_mass(mut self, assembly: &str, label: Option<&str>, mass: f64) -> Self {
        self.masses.push(AssemblyMass {
            assembly: assembly.to_string(),
            label: label.map(String::from),
            mass,
        });
        self
    }

    /// Number of calls made to one operation
    pub fn calls(&self, operation: GraphOperation) -> usize {
        self.calls[operation.index()].load(Ordering::SeqCst)
    }

    /// Number of calls made to all operations
    pub fn total_calls(&self) -> usize {
        GraphOperation::ALL.iter().map(|op| self.calls(*op)).sum()
    }

    fn record(&self, operation: GraphOperation) {
        self.calls[operation.index()].fetch_add(1, Ordering::SeqCst);
    }
}

fn lookup(map: &HashMap<String, Vec<BindingRecord>>, key: &str) -> Vec<BindingRecord> {
    map.get(key).cloned().unwrap_or_default()
}

#[async_trait]
impl GraphQueryClient for StubGraphClient {
    async fn generic_triple(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Vec<BindingRecord> {
        self.record(GraphOperation::GenericTriple);
        let Some(subject) = subject else {
            return Vec::new();
        };
        lookup(&self.triples, bare(subject))
            .into_iter()
            .filter(|row| predicate.is_none_or(|p| row.value("predicate") == Some(bare(p))))
            .filter(|row| object.is_none_or(|o| row.value("object") == Some(bare(o))))
            .collect()
    }

    async fn domain_range(&self, query: &DomainRangeQuery) -> Vec<BindingRecord> {
        self.record(GraphOperation::DomainRange);
        let Some(label) = &query.property_label else {
            return Vec::new();
        };
        lookup(&self.domain_ranges, label)
            .into_iter()
            .filter(|row| {
                query
                    .property
                    .as_deref()
                    .is_none_or(|p| row.value("property") == Some(bare(p)))
            })
            .collect()
    }

    async fn domain_properties(&self, domain_label: &str) -> Vec<BindingRecord> {
        self.record(GraphOperation::DomainProperties);
        lookup(&self.domain_properties, domain_label)
    }

    async fn range_properties(&self, range_label: &str) -> Vec<BindingRecord> {
        self.record(GraphOperation::RangeProperties);
        lookup(&self.range_properties, range_label)
    }

    async fn subclasses(&self, super_uri: &str) -> Vec<BindingRecord> {
        self.record(GraphOperation::Subclasses);
        lookup(&self.subclasses, bare(super_uri))
    }

    async fn superclasses(&self, sub_uri: &str) -> Vec<BindingRecord> {
        self.record(GraphOperation::Superclasses);
        lookup(&self.superclasses, bare(sub_uri))
    }

    async fn assembly_attributes(&self, id: &str) -> Vec<BindingRecord> {
        self.record(GraphOperation::AssemblyAttributes);
        lookup(&self.assemblies, id)
    }

    async fn assemblies_by_mass(&self, range: &MassRange) -> Vec<BindingRecord> {
        self.record(GraphOperation::AssembliesByMass);
        self.masses
            .iter()
            .filter(|entry| range.contains(entry.mass))
            .map(|entry| {
                let row = BindingRecord::new()
                    .with_uri("assembly", entry.assembly.as_str())
                    .with("mass", BindingValue::literal(entry.mass.to_string()));
                match &entry.label {
                    Some(label) => row.with_literal("label", label.as_str()),
                    None => row,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(property: &str) -> BindingRecord {
        BindingRecord::new()
            .with_uri("property", property)
            .with_uri("domain", "http://example.org/a#D")
            .with_uri("range", "http://example.org/a#R")
    }

    #[tokio::test]
    async fn test_domain_range_narrowing() {
        let client = StubGraphClient::new().with_domain_range(
            "has",
            vec![row("http://one.org/a#has"), row("http://two.org/b#has")],
        );

        assert_eq!(client.domain_range(&DomainRangeQuery::by_label("has")).await.len(), 2);
        let narrowed = DomainRangeQuery::by_label("has").with_property("<http://two.org/b#has>");
        let rows = client.domain_range(&narrowed).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("property"), Some("http://two.org/b#has"));
        assert_eq!(client.calls(GraphOperation::DomainRange), 2);
    }

    #[tokio::test]
    async fn test_unknown_keys_are_empty() {
        let client = StubGraphClient::new();
        assert!(client.subclasses("http://example.org/a#C").await.is_empty());
        assert!(client.assembly_attributes("1").await.is_empty());
        assert!(client.generic_triple(None, None, None).await.is_empty());
        assert_eq!(client.total_calls(), 3);
    }

    #[test]
    fn test_generic_triple_filters_by_predicate() {
        let client = StubGraphClient::new().with_triples(
            "<http://example.org/s>",
            vec![
                BindingRecord::new()
                    .with_uri("predicate", "http://example.org/p")
                    .with_uri("object", "http://example.org/o1"),
                BindingRecord::new()
                    .with_uri("predicate", "http://example.org/q")
                    .with_uri("object", "http://example.org/o2"),
            ],
        );
        let rows = tokio_test::block_on(client.generic_triple(
            Some("http://example.org/s"),
            Some("<http://example.org/q>"),
            None,
        ));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("object"), Some("http://example.org/o2"));
    }

    #[tokio::test]
    async fn test_mass_filter() {
        let client = StubGraphClient::new()
            .with_assembly_mass("http://example.org/fse#Thruster", Some("Primary thruster"), 1.2)
            .with_assembly_mass("http://example.org/fse#Tank", None, 25.0);

        let range = MassRange::new(Some(0.8), Some(2.0)).unwrap();
        let rows = client.assemblies_by_mass(&range).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("label"), Some("Primary thruster"));

        let range = MassRange::new(Some(10.0), None).unwrap();
        let rows = client.assemblies_by_mass(&range).await;
        assert_eq!(rows[0].value("assembly"), Some("http://example.org/fse#Tank"));
        assert!(!rows[0].contains("label"));
    }
}
