//! Turtle writer for metaregistry records.

use super::GraphProjector;
use crate::model::registry::{Contact, Registry};
use crate::store::Manager;
use std::fmt::Write;

const METAREGISTRY_BASE: &str = "https://bioregistry.io/metaregistry/";
const REGISTRY_BASE: &str = "https://bioregistry.io/registry/";
const ORCID_BASE: &str = "https://orcid.org/";

const PREFIXES: &[(&str, &str)] = &[
    ("bioregistry.schema", "https://bioregistry.io/schema/#"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
];

// Schema terms.
const CLASS_REGISTRY: &str = "bioregistry.schema:0000002";
const HAS_EXAMPLE: &str = "bioregistry.schema:0000005";
const HAS_PROVIDER_FORMAT: &str = "bioregistry.schema:0000006";
const HAS_RESOLVER_FORMAT: &str = "bioregistry.schema:0000007";
const HAS_MAPPING: &str = "bioregistry.schema:0000010";
const HAS_CONTACT: &str = "bioregistry.schema:0000019";

/// Writes records as Turtle text with full IRIs for every node.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurtleProjector;

impl GraphProjector for TurtleProjector {
    fn to_graph_text(&self, registry: &Registry, manager: &Manager) -> String {
        let mut out = String::new();
        for (name, iri) in PREFIXES {
            let _ = writeln!(out, "@prefix {name}: <{iri}> .");
        }
        out.push('\n');

        let node = iri(METAREGISTRY_BASE, &registry.prefix);
        let mut statements: Vec<(&str, String)> = vec![("a", CLASS_REGISTRY.to_string())];
        if let Some(name) = registry.name.as_deref() {
            statements.push(("rdfs:label", literal(name)));
        }
        if let Some(description) = registry.description.as_deref() {
            statements.push(("dcterms:description", literal(description)));
        }
        if let Some(homepage) = registry.homepage.as_deref() {
            statements.push(("foaf:homepage", iri_or_literal(homepage)));
        }
        if let Some(example) = registry.example.as_deref() {
            statements.push((HAS_EXAMPLE, literal(example)));
        }
        if let Some(template) = registry.provider_template() {
            statements.push((HAS_PROVIDER_FORMAT, literal(template)));
        }
        if let Some(template) = registry.resolver_template() {
            statements.push((HAS_RESOLVER_FORMAT, literal(template)));
        }
        if let Some(license) = registry.license.as_deref() {
            statements.push(("dcterms:license", literal(license)));
        }
        if let Some(prefix) = registry.bioregistry_prefix.as_deref() {
            statements.push(("rdfs:seeAlso", iri(REGISTRY_BASE, prefix)));
        }
        if let Some(contact) = registry.contact.as_ref() {
            statements.push((HAS_CONTACT, contact_node(contact)));
        }
        write_subject(&mut out, &node, &statements);

        if let Some(contact) = registry.contact.as_ref() {
            if let Some(orcid) = contact.orcid.as_deref() {
                let details = contact_details(contact);
                if !details.is_empty() {
                    out.push('\n');
                    write_subject(&mut out, &iri(ORCID_BASE, orcid), &details);
                }
            }
        }

        let mappings = manager.get_registry_map(&registry.prefix);
        if !mappings.is_empty() {
            out.push('\n');
        }
        for prefix in mappings.keys() {
            let _ = writeln!(out, "{} {HAS_MAPPING} {node} .", iri(REGISTRY_BASE, prefix));
        }
        out
    }
}

fn write_subject(out: &mut String, subject: &str, statements: &[(&str, String)]) {
    let _ = write!(out, "{subject}");
    for (index, (predicate, object)) in statements.iter().enumerate() {
        let separator = if index == 0 { " " } else { " ;\n    " };
        let _ = write!(out, "{separator}{predicate} {object}");
    }
    out.push_str(" .\n");
}

fn contact_node(contact: &Contact) -> String {
    if let Some(orcid) = contact.orcid.as_deref() {
        return iri(ORCID_BASE, orcid);
    }
    let details = contact_details(contact)
        .into_iter()
        .map(|(predicate, object)| format!("{predicate} {object}"))
        .collect::<Vec<_>>();
    if details.is_empty() {
        "[]".to_string()
    } else {
        format!("[ {} ]", details.join(" ; "))
    }
}

fn contact_details(contact: &Contact) -> Vec<(&'static str, String)> {
    let mut details = Vec::new();
    if let Some(name) = contact.name.as_deref() {
        details.push(("rdfs:label", literal(name)));
    }
    if let Some(email) = contact.email.as_deref() {
        details.push(("foaf:mbox", literal(email)));
    }
    if let Some(github) = contact.github.as_deref() {
        details.push(("foaf:account", literal(github)));
    }
    details
}

fn iri(base: &str, local: &str) -> String {
    format!("<{base}{}>", encode_segment(local))
}

fn iri_or_literal(value: &str) -> String {
    if is_absolute_iri(value) {
        format!("<{value}>")
    } else {
        literal(value)
    }
}

fn is_absolute_iri(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };
    let scheme_ok = scheme
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok
        && !rest.is_empty()
        && !value.chars().any(|c| {
            c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
        })
}

/// Percent-encodes everything outside the unreserved set plus `:`.
fn encode_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b':') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

fn literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::{encode_segment, is_absolute_iri, literal, TurtleProjector};
    use crate::export::GraphProjector;
    use crate::model::registry::{Contact, Registry};
    use crate::model::resource::{ExternalEntry, Resource};
    use crate::store::Manager;
    use std::collections::BTreeMap;

    #[test]
    fn literal_escapes_quotes_backslashes_and_newlines() {
        assert_eq!(literal("a \"b\"\\c\nd"), r#""a \"b\"\\c\nd""#);
    }

    #[test]
    fn iri_checks_reject_spaces_and_missing_scheme() {
        assert!(is_absolute_iri("https://example.org/x"));
        assert!(!is_absolute_iri("example.org"));
        assert!(!is_absolute_iri("https://example.org/a b"));
        assert!(!is_absolute_iri("1http://x"));
        assert_eq!(encode_segment("go.ref"), "go.ref");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn projects_record_contact_and_mappings() {
        let mut resource = Resource::new("chebi");
        resource.external.insert(
            "demo".to_string(),
            ExternalEntry {
                prefix: Some("CHEBI".to_string()),
                ..ExternalEntry::default()
            },
        );
        let mut registry_map = BTreeMap::new();
        registry_map.insert("chebi".to_string(), resource);
        let manager = Manager::new(registry_map, BTreeMap::new());

        let mut registry = Registry::new("demo");
        registry.name = Some("Demo \"Registry\"".to_string());
        registry.homepage = Some("not an iri".to_string());
        registry.contact = Some(Contact {
            name: Some("Help Desk".to_string()),
            email: Some("help@example.org".to_string()),
            ..Contact::default()
        });

        let text = TurtleProjector.to_graph_text(&registry, &manager);
        assert!(text.starts_with("@prefix bioregistry.schema: <https://bioregistry.io/schema/#> .\n"));
        assert!(text.contains(
            "<https://bioregistry.io/metaregistry/demo> a bioregistry.schema:0000002 ;"
        ));
        assert!(text.contains(r#"rdfs:label "Demo \"Registry\"""#));
        assert!(text.contains(r#"foaf:homepage "not an iri""#));
        assert!(text.contains(
            r#"bioregistry.schema:0000019 [ rdfs:label "Help Desk" ; foaf:mbox "help@example.org" ] ."#
        ));
        assert!(text.contains(
            "<https://bioregistry.io/registry/chebi> bioregistry.schema:0000010 <https://bioregistry.io/metaregistry/demo> ."
        ));
    }
}
