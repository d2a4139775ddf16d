//! Registry / metaregistry correspondence rules.
//!
//! A metaregistry record corresponds to the resource named by its
//! `bioregistry_prefix`, or else to the resource sharing its metaprefix.
//! Records with neither are skipped here.

use crate::model::registry::Registry;
use crate::model::resource::Resource;
use crate::pattern;
use crate::store::Manager;
use crate::validate::ValidationIssue;

pub(super) fn check(
    manager: &Manager,
    metaprefix: &str,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(resource) = corresponding_resource(manager, metaprefix, registry) else {
        return;
    };
    check_example_pattern(resource, registry, issues);
    check_provider_membership(resource, registry, issues);
}

fn corresponding_resource<'m>(
    manager: &'m Manager,
    metaprefix: &str,
    registry: &Registry,
) -> Option<&'m Resource> {
    match registry.bioregistry_prefix.as_deref() {
        // A dangling link is reported by the linkage rules.
        Some(prefix) => manager.registry().get(prefix),
        None => manager.registry().get(metaprefix),
    }
}

fn check_example_pattern(
    resource: &Resource,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(raw_pattern) = resource.get_pattern() else {
        return;
    };
    let regex = match pattern::compile(&raw_pattern) {
        Ok(regex) => regex,
        Err(err) => {
            issues.push(ValidationIssue::InvalidPattern {
                prefix: resource.prefix.clone(),
                pattern: raw_pattern,
                message: err.to_string(),
            });
            return;
        }
    };
    let Some(example) = registry.example.as_deref() else {
        return;
    };
    if !pattern::matches_at_start(&regex, example) {
        issues.push(ValidationIssue::ExampleMismatch {
            prefix: resource.prefix.clone(),
            pattern: raw_pattern,
            example: example.to_string(),
        });
    }
}

fn check_provider_membership(
    resource: &Resource,
    registry: &Registry,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(template) = registry.provider_template() else {
        return;
    };
    let uri_formats = resource.get_uri_formats();
    if uri_formats.is_empty() {
        issues.push(ValidationIssue::ResourceMissingUriFormats(
            resource.prefix.clone(),
        ));
    } else if !uri_formats.iter().any(|candidate| candidate == template) {
        issues.push(ValidationIssue::ProviderNotInResource {
            prefix: resource.prefix.clone(),
            template: template.to_string(),
        });
    }
}
