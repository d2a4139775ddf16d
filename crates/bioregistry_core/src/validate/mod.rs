//! Metaregistry consistency validation.
//!
//! # Responsibility
//! - Check every metaregistry record for required metadata and template shape.
//! - Cross-check each record against its linked registry resource.
//! - Collect all findings in one pass; this is a reporting pass, not a repair pass.
//!
//! # Invariants
//! - Validation only reads the [`Manager`]; reruns on unchanged data yield
//!   identical reports.
//! - One failing rule never prevents evaluation of the others.
//! - Every finding carries the metaprefix it was raised for.

use crate::logging::sanitize_log_value;
use crate::model::registry::Registry;
use crate::store::Manager;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

mod correspondence;
mod metadata;

/// Tunables for rules that depend on curation conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Metaprefix of the primary registry's own entry; exempt from the
    /// example-mapping rule.
    pub self_metaprefix: String,
    /// Contact name that marks an unfinished record.
    pub placeholder_contact: String,
    /// Substring (case-insensitive) marking a generic support contact.
    pub support_marker: String,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            self_metaprefix: "bioregistry".to_string(),
            placeholder_contact: "FIXME".to_string(),
            support_marker: "support".to_string(),
        }
    }
}

/// Why a record must link to a canonical resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRequirement {
    MissingProviderFormat,
    /// The metaprefix is also a registry prefix.
    PrefixCollision,
    /// The provider template does not end with `$1`.
    MalformedProviderFormat,
}

impl Display for LinkRequirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProviderFormat => write!(f, "no provider_uri_format"),
            Self::PrefixCollision => write!(f, "metaprefix collides with a registry prefix"),
            Self::MalformedProviderFormat => {
                write!(f, "provider_uri_format does not end with `$1`")
            }
        }
    }
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingField(&'static str),
    PlaceholderContact(String),
    /// A non-support contact lacks `orcid` or `github`.
    IncompleteContact(&'static str),
    UnmappedExample {
        example: String,
    },
    ProviderMissingPlaceholder(String),
    MissingCanonicalLink(LinkRequirement),
    NonCanonicalLink {
        prefix: String,
        canonical: Option<String>,
    },
    UnknownLinkedResource(String),
    LinkedResourceMissingUriFormat(String),
    ResolverMissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },
    MissingResolverType,
    UnsupportedResolverType(String),
    UnknownFields(Vec<String>),
    MissingQualities,
    MissingBulkData,
    MissingGovernanceField(&'static str),
    InvalidPattern {
        prefix: String,
        pattern: String,
        message: String,
    },
    ExampleMismatch {
        prefix: String,
        pattern: String,
        example: String,
    },
    ResourceMissingUriFormats(String),
    ProviderNotInResource {
        prefix: String,
        template: String,
    },
}

impl ValidationIssue {
    /// Stable rule identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::PlaceholderContact(_) => "placeholder_contact",
            Self::IncompleteContact(_) => "incomplete_contact",
            Self::UnmappedExample { .. } => "unmapped_example",
            Self::ProviderMissingPlaceholder(_) => "provider_missing_placeholder",
            Self::MissingCanonicalLink(_) => "missing_canonical_link",
            Self::NonCanonicalLink { .. } => "non_canonical_link",
            Self::UnknownLinkedResource(_) => "unknown_linked_resource",
            Self::LinkedResourceMissingUriFormat(_) => "linked_resource_missing_uri_format",
            Self::ResolverMissingPlaceholder { .. } => "resolver_missing_placeholder",
            Self::MissingResolverType => "missing_resolver_type",
            Self::UnsupportedResolverType(_) => "unsupported_resolver_type",
            Self::UnknownFields(_) => "unknown_fields",
            Self::MissingQualities => "missing_qualities",
            Self::MissingBulkData => "missing_bulk_data",
            Self::MissingGovernanceField(_) => "missing_governance_field",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::ExampleMismatch { .. } => "example_mismatch",
            Self::ResourceMissingUriFormats(_) => "resource_missing_uri_formats",
            Self::ProviderNotInResource { .. } => "provider_not_in_resource",
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is missing"),
            Self::PlaceholderContact(name) => {
                write!(f, "contact name is the placeholder `{name}`")
            }
            Self::IncompleteContact(field) => {
                write!(f, "contact is a person but `contact.{field}` is missing")
            }
            Self::UnmappedExample { example } => write!(
                f,
                "example `{example}` is not one of the registry's mapped prefixes"
            ),
            Self::ProviderMissingPlaceholder(template) => {
                write!(f, "provider_uri_format `{template}` has no `$1`")
            }
            Self::MissingCanonicalLink(reason) => {
                write!(f, "bioregistry_prefix is required: {reason}")
            }
            Self::NonCanonicalLink { prefix, canonical } => match canonical {
                Some(canonical) => write!(
                    f,
                    "bioregistry_prefix `{prefix}` must use the canonical prefix `{canonical}`"
                ),
                None => write!(f, "bioregistry_prefix `{prefix}` does not normalize"),
            },
            Self::UnknownLinkedResource(prefix) => {
                write!(f, "bioregistry_prefix `{prefix}` is not in the registry")
            }
            Self::LinkedResourceMissingUriFormat(prefix) => write!(
                f,
                "corresponding registry entry ({prefix}) is missing a uri_format"
            ),
            Self::ResolverMissingPlaceholder {
                template,
                placeholder,
            } => write!(f, "resolver_uri_format `{template}` has no `{placeholder}`"),
            Self::MissingResolverType => {
                write!(f, "resolver_uri_format is set but resolver_type is missing")
            }
            Self::UnsupportedResolverType(value) => {
                write!(f, "resolver_type `{value}` is not lookup|resolver")
            }
            Self::UnknownFields(fields) => {
                write!(f, "invalid metadata keys: {}", fields.join(", "))
            }
            Self::MissingQualities => write!(f, "qualities are missing"),
            Self::MissingBulkData => write!(f, "qualities.bulk_data is missing"),
            Self::MissingGovernanceField(field) => write!(
                f,
                "public version-controlled data requires `governance.{field}`"
            ),
            Self::InvalidPattern {
                prefix,
                pattern,
                message,
            } => write!(f, "pattern `{pattern}` of `{prefix}` does not compile: {message}"),
            Self::ExampleMismatch {
                prefix,
                pattern,
                example,
            } => write!(
                f,
                "example `{example}` does not match pattern `{pattern}` of `{prefix}`"
            ),
            Self::ResourceMissingUriFormats(prefix) => {
                write!(f, "registry entry `{prefix}` exposes no uri formats")
            }
            Self::ProviderNotInResource { prefix, template } => write!(
                f,
                "provider_uri_format `{template}` is not a uri format of `{prefix}`"
            ),
        }
    }
}

/// A violated rule tagged with its metaprefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub metaprefix: String,
    pub issue: ValidationIssue,
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: [{}] {}", self.metaprefix, self.issue.code(), self.issue)
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub entries_checked: usize,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn for_metaprefix<'a>(&'a self, metaprefix: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.metaprefix == metaprefix)
    }

    /// Number of distinct metaprefixes with at least one finding.
    pub fn failing_entries(&self) -> usize {
        self.findings
            .iter()
            .map(|finding| finding.metaprefix.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        write!(
            f,
            "checked {} registries: {} findings in {} registries",
            self.entries_checked,
            self.findings.len(),
            self.failing_entries()
        )
    }
}

/// Runs the rule set against a store.
pub struct Validator<'m> {
    manager: &'m Manager,
    policy: ValidationPolicy,
}

impl<'m> Validator<'m> {
    pub fn new(manager: &'m Manager, policy: ValidationPolicy) -> Self {
        Self { manager, policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Evaluates every rule for one record and returns all violations.
    pub fn validate_registry(&self, metaprefix: &str, registry: &Registry) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        metadata::check(self.manager, &self.policy, metaprefix, registry, &mut issues);
        correspondence::check(self.manager, metaprefix, registry, &mut issues);
        issues
    }

    /// Validates every metaregistry record.
    pub fn validate_all(&self) -> ValidationReport {
        let metaregistry = self.manager.metaregistry();
        info!(
            "event=validate_start module=validate registries={} resources={}",
            metaregistry.len(),
            self.manager.registry().len()
        );

        let mut report = ValidationReport {
            entries_checked: metaregistry.len(),
            findings: Vec::new(),
        };
        for (metaprefix, registry) in metaregistry {
            for issue in self.validate_registry(metaprefix, registry) {
                warn!(
                    "event=validation_issue module=validate metaprefix={} code={} detail={}",
                    metaprefix,
                    issue.code(),
                    sanitize_log_value(&issue.to_string())
                );
                report.findings.push(Finding {
                    metaprefix: metaprefix.clone(),
                    issue,
                });
            }
        }

        info!(
            "event=validate_done module=validate status={} findings={} failing={}",
            if report.is_clean() { "ok" } else { "error" },
            report.findings.len(),
            report.failing_entries()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{Finding, LinkRequirement, ValidationIssue, ValidationReport};

    #[test]
    fn codes_are_snake_case_and_distinct() {
        let issues = [
            ValidationIssue::MissingField("name"),
            ValidationIssue::MissingCanonicalLink(LinkRequirement::PrefixCollision),
            ValidationIssue::MissingResolverType,
            ValidationIssue::UnknownFields(vec!["x".to_string()]),
        ];
        let codes: Vec<&str> = issues.iter().map(ValidationIssue::code).collect();
        assert_eq!(
            codes,
            vec![
                "missing_field",
                "missing_canonical_link",
                "missing_resolver_type",
                "unknown_fields"
            ]
        );
    }

    #[test]
    fn report_display_lists_findings_and_summary() {
        let report = ValidationReport {
            entries_checked: 3,
            findings: vec![
                Finding {
                    metaprefix: "a".to_string(),
                    issue: ValidationIssue::MissingQualities,
                },
                Finding {
                    metaprefix: "a".to_string(),
                    issue: ValidationIssue::MissingField("license"),
                },
            ],
        };
        let text = report.to_string();
        assert!(text.contains("a: [missing_qualities] qualities are missing"));
        assert!(text.ends_with("checked 3 registries: 2 findings in 1 registries"));
        assert_eq!(report.for_metaprefix("a").count(), 2);
        assert_eq!(report.for_metaprefix("b").count(), 0);
    }
}
