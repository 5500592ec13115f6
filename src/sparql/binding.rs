//! SPARQL 1.1 query results (JSON format)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// RDF term kind of a bound value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TermKind {
    /// IRI reference
    Uri,
    /// Plain or typed literal
    Literal,
    /// Typed literal (older result serializers)
    TypedLiteral,
    /// Blank node
    Bnode,
}

/// Value descriptor for one variable in one result row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BindingValue {
    /// Term kind
    #[serde(rename = "type")]
    pub kind: TermKind,
    /// Lexical value
    pub value: String,
    /// Literal datatype IRI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// Literal language tag
    #[serde(rename = "xml:lang", skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl BindingValue {
    /// IRI value
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Uri,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    /// Plain literal value
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    /// Checks if the value is an IRI
    pub fn is_uri(&self) -> bool {
        self.kind == TermKind::Uri
    }
}

/// One result row: variable name to bound value. Unbound variables are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BindingRecord {
    values: HashMap<String, BindingValue>,
}

impl BindingRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable
    pub fn with(mut self, var: impl Into<String>, value: BindingValue) -> Self {
        self.values.insert(var.into(), value);
        self
    }

    /// Binds a variable to an IRI
    pub fn with_uri(self, var: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(var, BindingValue::uri(value))
    }

    /// Binds a variable to a plain literal
    pub fn with_literal(self, var: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(var, BindingValue::literal(value))
    }

    /// Value descriptor of a variable
    pub fn get(&self, var: &str) -> Option<&BindingValue> {
        self.values.get(var)
    }

    /// Lexical value of a variable
    pub fn value(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(|v| v.value.as_str())
    }

    /// First bound value among `vars`, in the order given
    pub fn first_value(&self, vars: &[&str]) -> Option<&str> {
        vars.iter().find_map(|var| self.value(var))
    }

    /// Checks if a variable is bound
    pub fn contains(&self, var: &str) -> bool {
        self.values.contains_key(var)
    }
}

/// Result header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultHead {
    /// Projected variable names
    #[serde(default)]
    pub vars: Vec<String>,
}

/// Result body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultBindings {
    /// Ordered result rows
    #[serde(default)]
    pub bindings: Vec<BindingRecord>,
}

/// `application/sparql-results+json` document for a SELECT query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparqlResults {
    /// Header
    #[serde(default)]
    pub head: ResultHead,
    /// Rows
    #[serde(default)]
    pub results: ResultBindings,
}

impl SparqlResults {
    /// Consumes the document, returning its rows in order
    pub fn into_bindings(self) -> Vec<BindingRecord> {
        self.results.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "head": { "vars": ["domain", "domain_label", "property"] },
        "results": { "bindings": [
            {
                "domain": { "type": "uri", "value": "http://example.org/a#Thing" },
                "domain_label": { "type": "literal", "value": "thing", "xml:lang": "en" },
                "property": { "type": "uri", "value": "http://example.org/a#has" }
            },
            {
                "domain": { "type": "bnode", "value": "b0" },
                "mass": { "type": "literal", "value": "0.6",
                          "datatype": "http://www.w3.org/2001/XMLSchema#double" }
            }
        ] }
    }"#;

    #[test]
    fn test_parse_results_document() {
        let results: SparqlResults = serde_json::from_str(DOCUMENT).unwrap();
        assert_eq!(results.head.vars.len(), 3);

        let rows = results.into_bindings();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("domain_label"), Some("thing"));
        assert_eq!(rows[0].get("domain_label").and_then(|v| v.lang.as_deref()), Some("en"));
        assert!(rows[0].get("property").is_some_and(BindingValue::is_uri));
        assert_eq!(rows[1].get("domain").map(|v| v.kind), Some(TermKind::Bnode));
        assert!(!rows[1].contains("property"));
        assert_eq!(
            rows[1].get("mass").and_then(|v| v.datatype.as_deref()),
            Some("http://www.w3.org/2001/XMLSchema#double")
        );
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let results: SparqlResults = serde_json::from_str("{}").unwrap();
        assert!(results.into_bindings().is_empty());
    }

    #[test]
    fn test_first_value_prefers_order() {
        let record = BindingRecord::new()
            .with_uri("domain", "http://example.org/a#Thing")
            .with_literal("domain_label", "thing");
        assert_eq!(record.first_value(&["domain_label", "domain"]), Some("thing"));
        assert_eq!(record.first_value(&["range_label", "range"]), None);
    }
}
