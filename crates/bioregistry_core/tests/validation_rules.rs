use bioregistry_core::validate::LinkRequirement;
use bioregistry_core::{
    Contact, Manager, Registry, Resource, ValidationIssue, ValidationPolicy, Validator,
};
use serde_json::json;
use std::collections::BTreeMap;

fn setup() -> Manager {
    let resources: BTreeMap<String, Resource> = serde_json::from_value(json!({
        "demo": {
            "prefix": "demo",
            "pattern": "^[A-Z0-9]+$",
            "uri_format": "https://demo.org/$1",
            "ext": {"prefix": "DEMO"}
        },
        "other": {
            "prefix": "other",
            "uri_format": "https://other.org/$1",
            "ext": {"prefix": "other-x"}
        },
        "bare": {"prefix": "bare"},
        "broken": {
            "prefix": "broken",
            "pattern": "(?=x)\\d+",
            "uri_format": "https://broken.org/$1"
        }
    }))
    .unwrap();
    Manager::new(resources, BTreeMap::new())
}

fn baseline() -> Registry {
    serde_json::from_value(json!({
        "prefix": "ext",
        "name": "External",
        "description": "An external registry.",
        "homepage": "https://ext.org",
        "example": "DEMO",
        "license": "CC0-1.0",
        "contact": {
            "name": "Ada Lovelace",
            "orcid": "0000-0000-0000-0001",
            "github": "ada"
        },
        "provider_uri_format": "https://ext.org/$1",
        "qualities": {"bulk_data": true}
    }))
    .unwrap()
}

fn issues(manager: &Manager, metaprefix: &str, registry: &Registry) -> Vec<ValidationIssue> {
    Validator::new(manager, ValidationPolicy::default()).validate_registry(metaprefix, registry)
}

fn codes(manager: &Manager, metaprefix: &str, registry: &Registry) -> Vec<&'static str> {
    issues(manager, metaprefix, registry)
        .iter()
        .map(ValidationIssue::code)
        .collect()
}

#[test]
fn baseline_record_is_clean() {
    let manager = setup();
    assert!(codes(&manager, "ext", &baseline()).is_empty());
}

#[test]
fn missing_required_fields_are_each_reported() {
    let manager = setup();
    let mut registry = baseline();
    registry.name = None;
    registry.license = None;
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![
            ValidationIssue::MissingField("name"),
            ValidationIssue::MissingField("license"),
        ]
    );

    let mut registry = baseline();
    registry.contact = None;
    assert_eq!(codes(&manager, "ext", &registry), vec!["missing_field"]);
}

#[test]
fn placeholder_contact_is_rejected() {
    let manager = setup();
    let mut registry = baseline();
    if let Some(contact) = registry.contact.as_mut() {
        contact.name = Some("FIXME".to_string());
    }
    assert_eq!(codes(&manager, "ext", &registry), vec!["placeholder_contact"]);
}

#[test]
fn person_contacts_need_orcid_and_github_but_support_contacts_do_not() {
    let manager = setup();
    let mut registry = baseline();
    if let Some(contact) = registry.contact.as_mut() {
        contact.github = None;
    }
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![ValidationIssue::IncompleteContact("github")]
    );

    registry.contact = Some(Contact {
        name: Some("Registry Support Desk".to_string()),
        ..Contact::default()
    });
    assert!(codes(&manager, "ext", &registry).is_empty());
}

#[test]
fn example_must_be_a_mapped_external_prefix() {
    let manager = setup();
    let mut registry = baseline();
    registry.example = Some("NOPE".to_string());
    assert_eq!(codes(&manager, "ext", &registry), vec!["unmapped_example"]);

    // The primary registry's own entry is exempt.
    let policy = ValidationPolicy {
        self_metaprefix: "ext".to_string(),
        ..ValidationPolicy::default()
    };
    assert!(Validator::new(&manager, policy)
        .validate_registry("ext", &registry)
        .is_empty());
}

#[test]
fn provider_without_placeholder_also_needs_a_link() {
    let manager = setup();
    let mut registry = baseline();
    registry.provider_uri_format = Some("https://ext.org/".to_string());
    assert_eq!(
        codes(&manager, "ext", &registry),
        vec!["provider_missing_placeholder", "missing_canonical_link"]
    );
}

#[test]
fn canonical_link_reasons() {
    let manager = setup();

    let mut registry = baseline();
    registry.provider_uri_format = None;
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![ValidationIssue::MissingCanonicalLink(
            LinkRequirement::MissingProviderFormat
        )]
    );

    let mut registry = baseline();
    registry.provider_uri_format = Some("https://demo.org/$1".to_string());
    assert_eq!(
        issues(&manager, "demo", &registry),
        vec![ValidationIssue::MissingCanonicalLink(
            LinkRequirement::PrefixCollision
        )]
    );

    let mut registry = baseline();
    registry.provider_uri_format = Some("https://ext.org/$1.html".to_string());
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![ValidationIssue::MissingCanonicalLink(
            LinkRequirement::MalformedProviderFormat
        )]
    );
}

#[test]
fn blank_templates_are_treated_as_missing() {
    let manager = setup();
    let mut registry = baseline();
    registry.provider_uri_format = Some(String::new());
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![ValidationIssue::MissingCanonicalLink(
            LinkRequirement::MissingProviderFormat
        )]
    );

    registry.bioregistry_prefix = Some("demo".to_string());
    registry.resolver_uri_format = Some(" ".to_string());
    assert!(codes(&manager, "ext", &registry).is_empty());
}

#[test]
fn link_must_use_an_existing_canonical_prefix() {
    let manager = setup();
    let mut registry = baseline();
    registry.bioregistry_prefix = Some("DEMO".to_string());
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![
            ValidationIssue::NonCanonicalLink {
                prefix: "DEMO".to_string(),
                canonical: Some("demo".to_string()),
            },
            ValidationIssue::UnknownLinkedResource("DEMO".to_string()),
        ]
    );

    registry.bioregistry_prefix = Some("missing".to_string());
    assert_eq!(
        codes(&manager, "ext", &registry),
        vec!["non_canonical_link", "unknown_linked_resource"]
    );
}

#[test]
fn linked_resource_without_uri_formats() {
    let manager = setup();
    let mut registry = baseline();
    registry.bioregistry_prefix = Some("bare".to_string());
    assert_eq!(
        codes(&manager, "ext", &registry),
        vec![
            "linked_resource_missing_uri_format",
            "resource_missing_uri_formats"
        ]
    );
}

#[test]
fn resolver_rules() {
    let manager = setup();

    let mut registry = baseline();
    registry.resolver_uri_format = Some("https://r.org/$1".to_string());
    registry.resolver_type = Some("resolver".to_string());
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![ValidationIssue::ResolverMissingPlaceholder {
            template: "https://r.org/$1".to_string(),
            placeholder: "$2",
        }]
    );

    registry.resolver_uri_format = Some("https://r.org/$1:$2".to_string());
    registry.resolver_type = None;
    assert_eq!(codes(&manager, "ext", &registry), vec!["missing_resolver_type"]);

    registry.resolver_type = Some("Resolver".to_string());
    assert_eq!(
        codes(&manager, "ext", &registry),
        vec!["unsupported_resolver_type"]
    );

    registry.resolver_type = Some("lookup".to_string());
    assert!(codes(&manager, "ext", &registry).is_empty());
}

#[test]
fn stray_keys_are_reported_with_paths() {
    let manager = setup();
    let mut value = serde_json::to_value(baseline()).unwrap();
    value["homepage_url"] = json!("https://ext.org");
    value["contact"]["phone"] = json!("555");
    let registry: Registry = serde_json::from_value(value).unwrap();

    let found = issues(&manager, "ext", &registry);
    assert_eq!(found.len(), 1);
    match &found[0] {
        ValidationIssue::UnknownFields(fields) => {
            let mut fields = fields.clone();
            fields.sort();
            assert_eq!(fields, vec!["contact.phone", "homepage_url"]);
        }
        other => panic!("unexpected issue {other:?}"),
    }
}

#[test]
fn qualities_need_bulk_data() {
    let manager = setup();
    let mut registry = baseline();
    registry.qualities = None;
    assert_eq!(codes(&manager, "ext", &registry), vec!["missing_qualities"]);

    let mut registry = baseline();
    if let Some(qualities) = registry.qualities.as_mut() {
        qualities.bulk_data = None;
    }
    assert_eq!(codes(&manager, "ext", &registry), vec!["missing_bulk_data"]);
}

#[test]
fn public_data_needs_repository_and_tracker() {
    let manager = setup();
    let mut registry = baseline();
    registry.governance.public_version_controlled_data = true;
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![
            ValidationIssue::MissingGovernanceField("data_repository"),
            ValidationIssue::MissingGovernanceField("issue_tracker"),
        ]
    );

    registry.governance.data_repository = Some("https://github.com/ext/data".to_string());
    registry.governance.issue_tracker = Some("https://github.com/ext/data/issues".to_string());
    assert!(codes(&manager, "ext", &registry).is_empty());
}

#[test]
fn uncompilable_pattern_is_a_finding() {
    let manager = setup();
    let mut registry = baseline();
    registry.bioregistry_prefix = Some("broken".to_string());
    registry.provider_uri_format = Some("https://broken.org/$1".to_string());
    assert_eq!(codes(&manager, "ext", &registry), vec!["invalid_pattern"]);
}

#[test]
fn example_must_match_linked_pattern() {
    let manager = setup();
    let mut registry = baseline();
    registry.bioregistry_prefix = Some("demo".to_string());
    registry.provider_uri_format = Some("https://demo.org/$1".to_string());
    registry.example = Some("other-x".to_string());
    assert_eq!(
        issues(&manager, "ext", &registry),
        vec![ValidationIssue::ExampleMismatch {
            prefix: "demo".to_string(),
            pattern: "^[A-Z0-9]+$".to_string(),
            example: "other-x".to_string(),
        }]
    );
}

#[test]
fn provider_must_be_a_uri_format_of_the_linked_resource() {
    let manager = setup();
    let mut registry = baseline();
    registry.bioregistry_prefix = Some("demo".to_string());
    assert_eq!(
        codes(&manager, "ext", &registry),
        vec!["provider_not_in_resource"]
    );
}

#[test]
fn validate_all_collects_findings_across_records() {
    let resources: BTreeMap<String, Resource> = BTreeMap::new();
    let mut broken = baseline();
    broken.prefix = "broken".to_string();
    broken.name = None;
    broken.qualities = None;
    let mut clean = baseline();
    clean.prefix = "clean".to_string();
    clean.example = None;

    let metaregistry = BTreeMap::from([
        ("broken".to_string(), broken),
        ("clean".to_string(), clean),
    ]);
    let manager = Manager::new(resources, metaregistry);
    let report = Validator::new(&manager, ValidationPolicy::default()).validate_all();

    assert_eq!(report.entries_checked, 2);
    assert_eq!(report.failing_entries(), 2);
    assert_eq!(report.for_metaprefix("broken").count(), 2);
    let clean_codes: Vec<&str> = report
        .for_metaprefix("clean")
        .map(|finding| finding.issue.code())
        .collect();
    assert_eq!(clean_codes, vec!["missing_field"]);
}
