//! Per-record metadata rules.
//!
//! Covers required fields, contact completeness, example mapping, template
//! shape, canonical linkage, schema closure, qualities and governance.

use crate::model::registry::Registry;
use crate::store::Manager;
use crate::uri_format::{self, PLACEHOLDER_FIRST, PLACEHOLDER_SECOND};
use crate::validate::{LinkRequirement, ValidationIssue, ValidationPolicy};

pub(super) fn check(
    manager: &Manager,
    policy: &ValidationPolicy,
    metaprefix: &str,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    check_required_fields(policy, registry, issues);
    check_example_mapping(manager, policy, metaprefix, registry, issues);
    check_provider_shape(registry, issues);
    check_link_requirement(manager, metaprefix, registry, issues);
    check_link_integrity(manager, registry, issues);
    check_resolver(registry, issues);
    check_schema_closure(registry, issues);
    check_qualities(registry, issues);
    check_governance(registry, issues);
}

fn require(value: &Option<String>, field: &'static str, issues: &mut Vec<ValidationIssue>) {
    if value.is_none() {
        issues.push(ValidationIssue::MissingField(field));
    }
}

fn check_required_fields(
    policy: &ValidationPolicy,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    require(&registry.name, "name", issues);
    require(&registry.homepage, "homepage", issues);
    require(&registry.example, "example", issues);
    require(&registry.description, "description", issues);
    require(&registry.license, "license", issues);

    let Some(contact) = &registry.contact else {
        issues.push(ValidationIssue::MissingField("contact"));
        return;
    };
    match contact.name.as_deref() {
        None => issues.push(ValidationIssue::MissingField("contact.name")),
        Some(name) if name == policy.placeholder_contact => {
            issues.push(ValidationIssue::PlaceholderContact(name.to_string()));
        }
        Some(_) => {}
    }
    if !contact.is_support_contact(&policy.support_marker) {
        if contact.orcid.is_none() {
            issues.push(ValidationIssue::IncompleteContact("orcid"));
        }
        if contact.github.is_none() {
            issues.push(ValidationIssue::IncompleteContact("github"));
        }
    }
}

fn check_example_mapping(
    manager: &Manager,
    policy: &ValidationPolicy,
    metaprefix: &str,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    if metaprefix == policy.self_metaprefix {
        return;
    }
    let Some(example) = registry.example.as_deref() else {
        return;
    };
    let external_prefixes = manager.get_registry_invmap(metaprefix);
    if !external_prefixes.is_empty() && !external_prefixes.contains_key(example) {
        issues.push(ValidationIssue::UnmappedExample {
            example: example.to_string(),
        });
    }
}

fn check_provider_shape(registry: &Registry, issues: &mut Vec<ValidationIssue>) {
    if let Some(template) = registry.provider_template() {
        if !uri_format::has_placeholder(template, PLACEHOLDER_FIRST) {
            issues.push(ValidationIssue::ProviderMissingPlaceholder(
                template.to_string(),
            ));
        }
    }
}

/// First applicable reason a record must carry `bioregistry_prefix`.
pub(super) fn link_requirement(
    manager: &Manager,
    metaprefix: &str,
    registry: &Registry,
) -> Option<LinkRequirement> {
    match registry.provider_template() {
        None => Some(LinkRequirement::MissingProviderFormat),
        Some(_) if manager.registry().contains_key(metaprefix) => {
            Some(LinkRequirement::PrefixCollision)
        }
        Some(template) if !uri_format::ends_with_placeholder(template) => {
            Some(LinkRequirement::MalformedProviderFormat)
        }
        Some(_) => None,
    }
}

fn check_link_requirement(
    manager: &Manager,
    metaprefix: &str,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    if registry.bioregistry_prefix.is_some() {
        return;
    }
    if let Some(reason) = link_requirement(manager, metaprefix, registry) {
        issues.push(ValidationIssue::MissingCanonicalLink(reason));
    }
}

fn check_link_integrity(
    manager: &Manager,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(prefix) = registry.bioregistry_prefix.as_deref() else {
        return;
    };
    let canonical = manager.normalize_prefix(prefix);
    if canonical != Some(prefix) {
        issues.push(ValidationIssue::NonCanonicalLink {
            prefix: prefix.to_string(),
            canonical: canonical.map(str::to_string),
        });
    }
    match manager.registry().get(prefix) {
        None => issues.push(ValidationIssue::UnknownLinkedResource(prefix.to_string())),
        Some(resource) if resource.get_uri_format().is_none() => {
            issues.push(ValidationIssue::LinkedResourceMissingUriFormat(
                prefix.to_string(),
            ));
        }
        Some(_) => {}
    }
}

fn check_resolver(registry: &Registry, issues: &mut Vec<ValidationIssue>) {
    let Some(template) = registry.resolver_template() else {
        return;
    };
    for placeholder in [PLACEHOLDER_FIRST, PLACEHOLDER_SECOND] {
        if !uri_format::has_placeholder(template, placeholder) {
            issues.push(ValidationIssue::ResolverMissingPlaceholder {
                template: template.to_string(),
                placeholder,
            });
        }
    }
    match (registry.resolver_type.as_deref(), registry.parsed_resolver_type()) {
        (None, _) => issues.push(ValidationIssue::MissingResolverType),
        (Some(value), None) => {
            issues.push(ValidationIssue::UnsupportedResolverType(value.to_string()));
        }
        (Some(_), Some(_)) => {}
    }
}

fn check_schema_closure(registry: &Registry, issues: &mut Vec<ValidationIssue>) {
    let stray = registry.unknown_fields();
    if !stray.is_empty() {
        issues.push(ValidationIssue::UnknownFields(stray));
    }
}

fn check_qualities(registry: &Registry, issues: &mut Vec<ValidationIssue>) {
    match &registry.qualities {
        None => issues.push(ValidationIssue::MissingQualities),
        Some(qualities) if qualities.bulk_data.is_none() => {
            issues.push(ValidationIssue::MissingBulkData);
        }
        Some(_) => {}
    }
}

fn check_governance(registry: &Registry, issues: &mut Vec<ValidationIssue>) {
    let governance = &registry.governance;
    if !governance.public_version_controlled_data {
        return;
    }
    if governance.data_repository.is_none() {
        issues.push(ValidationIssue::MissingGovernanceField("data_repository"));
    }
    if governance.issue_tracker.is_none() {
        issues.push(ValidationIssue::MissingGovernanceField("issue_tracker"));
    }
}
