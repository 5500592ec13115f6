//! Fixed SPARQL templates, one per graph operation
//!
//! Every caller-supplied IRI goes through [`iri`] and every label through
//! [`literal`] before it is spliced into a template, so user text can never
//! change the shape of a query.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

const PREFIX_OWL: &str = "PREFIX owl: <http://www.w3.org/2002/07/owl#>";
const PREFIX_RDFS: &str = "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>";
const PREFIX_ASSEMBLY: &str = "\
PREFIX fse: <http://opencaesar.io/examples/firesat/disciplines/fse/fse#>
PREFIX base: <http://imce.jpl.nasa.gov/foundation/base#>
PREFIX analysis: <http://imce.jpl.nasa.gov/foundation/analysis#>
PREFIX vim4: <http://bipm.org/jcgm/vim4#>
PREFIX mission: <http://imce.jpl.nasa.gov/foundation/mission#>";

/// Parameters of a domain/range lookup. Unset fields stay query variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRangeQuery {
    /// Domain class IRI
    pub domain: Option<String>,
    /// Property IRI, known once a data source has been chosen
    pub property: Option<String>,
    /// Property `rdfs:label`
    pub property_label: Option<String>,
    /// Range class IRI
    pub range: Option<String>,
}

impl DomainRangeQuery {
    /// Lookup by property label only
    pub fn by_label(label: impl Into<String>) -> Self {
        Self {
            property_label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Narrows the lookup to one property IRI
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }
}

/// Exclusive mass bounds in kilograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassRange {
    /// Strict lower bound
    pub lower: Option<f64>,
    /// Strict upper bound
    pub upper: Option<f64>,
}

impl MassRange {
    /// Builds a range; `None` unless at least one finite bound is given and
    /// the lower bound lies below the upper bound.
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Option<Self> {
        if lower.is_none() && upper.is_none() {
            return None;
        }
        if lower.is_some_and(|v| !v.is_finite()) || upper.is_some_and(|v| !v.is_finite()) {
            return None;
        }
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo >= hi {
                return None;
            }
        }
        Some(Self { lower, upper })
    }

    /// Checks if a mass lies strictly inside the range
    pub fn contains(&self, mass: f64) -> bool {
        self.lower.is_none_or(|lo| mass > lo) && self.upper.is_none_or(|hi| mass < hi)
    }

    fn filter(&self) -> String {
        let mut clauses = Vec::new();
        if let Some(lo) = self.lower {
            clauses.push(format!("?mass > {}", lo));
        }
        if let Some(hi) = self.upper {
            clauses.push(format!("?mass < {}", hi));
        }
        format!("FILTER ( {} )", clauses.join(" && "))
    }
}

/// Validates an absolute IRI and renders it as `<iri>`
pub fn iri(value: &str) -> Result<String> {
    let value = value.trim_start_matches('<').trim_end_matches('>');
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'))
    {
        return Err(Error::InvalidIri(value.to_string()));
    }
    let parsed = Url::parse(value).map_err(|e| Error::InvalidIri(format!("{}: {}", value, e)))?;
    if parsed.cannot_be_a_base() {
        return Err(Error::InvalidIri(value.to_string()));
    }
    Ok(format!("<{}>", value))
}

/// Renders a string as a quoted SPARQL literal
pub fn literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn term(value: Option<&str>, var: &str) -> Result<String> {
    match value {
        Some(v) => iri(v),
        None => Ok(format!("?{}", var)),
    }
}

/// `?subject ?predicate ?object` with any position fixed
pub fn generic_triple(
    subject: Option<&str>,
    predicate: Option<&str>,
    object: Option<&str>,
) -> Result<String> {
    Ok(format!(
        "SELECT ?subject ?predicate ?object\nWHERE {{\n    {} {} {} .\n}}\n",
        term(subject, "subject")?,
        term(predicate, "predicate")?,
        term(object, "object")?,
    ))
}

/// Domain and range of a property, with optional labels
pub fn domain_range(query: &DomainRangeQuery) -> Result<String> {
    let domain = term(query.domain.as_deref(), "domain")?;
    let property = term(query.property.as_deref(), "property")?;
    let range = term(query.range.as_deref(), "range")?;
    let label = match &query.property_label {
        Some(label) => literal(label),
        None => "?property_label".to_string(),
    };

    Ok(format!(
        "{PREFIX_OWL}\n{PREFIX_RDFS}\n\
         SELECT DISTINCT ?domain ?domain_label ?property ?property_label ?range ?range_label\n\
         WHERE {{\n\
         \x20   {domain} a owl:Class .\n\
         \x20   OPTIONAL {{ {domain} rdfs:label ?domain_label }}\n\
         \x20   {property} rdfs:domain {domain} .\n\
         \x20   {property} rdfs:label {label} .\n\
         \x20   {property} rdfs:range {range} .\n\
         \x20   OPTIONAL {{ {range} rdfs:label ?range_label }}\n\
         }}\n\
         ORDER BY ?domain\n"
    ))
}

/// Properties whose domain class carries `label`
pub fn domain_properties(label: &str) -> String {
    class_properties("domain", label)
}

/// Properties whose range class carries `label`
pub fn range_properties(label: &str) -> String {
    class_properties("range", label)
}

fn class_properties(side: &str, label: &str) -> String {
    let label = literal(label);
    format!(
        "{PREFIX_OWL}\n{PREFIX_RDFS}\n\
         SELECT DISTINCT ?{side} ?property ?property_label\n\
         WHERE {{\n\
         \x20   ?{side} a owl:Class .\n\
         \x20   ?{side} rdfs:label {label} .\n\
         \x20   ?property rdfs:{side} ?{side} .\n\
         \x20   ?property rdfs:label ?property_label .\n\
         }}\n\
         ORDER BY ?{side}\n"
    )
}

/// Direct subclasses of a class, excluding the class itself
pub fn subclasses(super_uri: &str) -> Result<String> {
    let class = iri(super_uri)?;
    Ok(format!(
        "{PREFIX_OWL}\n{PREFIX_RDFS}\n\
         SELECT DISTINCT ?sub ?super\n\
         WHERE {{\n\
         \x20   ?sub rdfs:subClassOf {class} .\n\
         \x20   FILTER ( ?sub != {class} )\n\
         \x20   FILTER ( isIRI(?sub) )\n\
         }}\n\
         ORDER BY ?sub\n"
    ))
}

/// Direct superclasses of a class, excluding the class itself
pub fn superclasses(sub_uri: &str) -> Result<String> {
    let class = iri(sub_uri)?;
    Ok(format!(
        "{PREFIX_OWL}\n{PREFIX_RDFS}\n\
         SELECT DISTINCT ?sub ?super\n\
         WHERE {{\n\
         \x20   {class} rdfs:subClassOf ?super .\n\
         \x20   FILTER ( {class} != ?super )\n\
         \x20   FILTER ( isIRI(?super) )\n\
         }}\n\
         ORDER BY ?super\n"
    ))
}

/// Mass and performed functions of the assembly with identifier `id`
pub fn assembly_attributes(id: &str) -> String {
    let id = literal(id);
    format!(
        "{PREFIX_ASSEMBLY}\n\
         SELECT DISTINCT ?assembly ?id ?mass ?function\n\
         WHERE {{\n\
         \x20   ?assembly a fse:Assembly ;\n\
         \x20       base:hasIdentifier {id} ;\n\
         \x20       analysis:isCharacterizedBy [ vim4:hasDoubleNumber ?mass ] ;\n\
         \x20       mission:performs ?function .\n\
         }}\n"
    )
}

/// Assemblies whose mass lies strictly inside `range`
pub fn assemblies_by_mass(range: &MassRange) -> String {
    let filter = range.filter();
    format!(
        "{PREFIX_ASSEMBLY}\n\
         SELECT DISTINCT ?assembly ?label ?mass\n\
         WHERE {{\n\
         \x20   ?assembly a fse:Assembly ;\n\
         \x20       analysis:isCharacterizedBy [ vim4:hasDoubleNumber ?mass ] .\n\
         \x20   OPTIONAL {{ ?assembly base:hasCanonicalName ?label }}\n\
         \x20   {filter}\n\
         }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_validation() {
        assert_eq!(
            iri("http://example.org/a#B").unwrap(),
            "<http://example.org/a#B>"
        );
        assert_eq!(
            iri("<http://example.org/a#B>").unwrap(),
            "<http://example.org/a#B>"
        );
        assert!(iri("mission").is_err());
        assert!(iri("http://example.org/a> } DROP ALL {").is_err());
        assert!(iri("mailto:someone@example.org").is_err());
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(literal("has assignment"), "\"has assignment\"");
        assert_eq!(literal("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn test_generic_triple_binds_subject() {
        let query = generic_triple(Some("http://imce.jpl.nasa.gov/foundation/mission"), None, None)
            .unwrap();
        assert!(query.contains("<http://imce.jpl.nasa.gov/foundation/mission> ?predicate ?object ."));
        assert!(generic_triple(Some("mission"), None, None).is_err());
    }

    #[test]
    fn test_domain_range_by_label_and_property() {
        let query = domain_range(&DomainRangeQuery::by_label("isCoherent")).unwrap();
        assert!(query.contains("?property rdfs:label \"isCoherent\" ."));
        assert!(query.contains("?property rdfs:domain ?domain ."));
        assert!(query.contains("ORDER BY ?domain"));

        let narrowed = DomainRangeQuery::by_label("isCoherent")
            .with_property("http://iso.org/iso-80000-4.1#isCoherent");
        let query = domain_range(&narrowed).unwrap();
        assert!(query.contains("<http://iso.org/iso-80000-4.1#isCoherent> rdfs:range ?range ."));
    }

    #[test]
    fn test_class_property_templates() {
        let query = domain_properties("Authority");
        assert!(query.contains("?domain rdfs:label \"Authority\" ."));
        assert!(query.contains("?property rdfs:domain ?domain ."));

        let query = range_properties("Authority");
        assert!(query.contains("?property rdfs:range ?range ."));
        assert!(query.contains("ORDER BY ?range"));
    }

    #[test]
    fn test_hierarchy_templates_exclude_identity() {
        let query = subclasses("http://example.org/a#C").unwrap();
        assert!(query.contains("FILTER ( ?sub != <http://example.org/a#C> )"));
        assert!(query.contains("FILTER ( isIRI(?sub) )"));

        let query = superclasses("http://example.org/a#C").unwrap();
        assert!(query.contains("<http://example.org/a#C> rdfs:subClassOf ?super ."));
        assert!(query.contains("FILTER ( isIRI(?super) )"));
        assert!(subclasses("not a uri").is_err());
    }

    #[test]
    fn test_assembly_templates() {
        let query = assembly_attributes("500000");
        assert!(query.contains("base:hasIdentifier \"500000\""));
        assert!(query.contains("mission:performs ?function"));

        let range = MassRange::new(Some(0.8), Some(2.0)).unwrap();
        let query = assemblies_by_mass(&range);
        assert!(query.contains("FILTER ( ?mass > 0.8 && ?mass < 2 )"));

        let range = MassRange::new(None, Some(0.1)).unwrap();
        assert!(assemblies_by_mass(&range).contains("FILTER ( ?mass < 0.1 )"));
    }

    #[test]
    fn test_mass_range_validation() {
        assert!(MassRange::new(Some(50.0), Some(1.0)).is_none());
        assert!(MassRange::new(Some(1.0), Some(1.0)).is_none());
        assert!(MassRange::new(None, None).is_none());
        assert!(MassRange::new(Some(f64::NAN), None).is_none());

        let range = MassRange::new(Some(10.0), None).unwrap();
        assert!(range.contains(12.5));
        assert!(!range.contains(10.0));
    }
}
