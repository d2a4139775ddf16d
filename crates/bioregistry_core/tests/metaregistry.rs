use bioregistry_core::{to_graph_text, Manager, ValidationPolicy, Validator};

fn setup() -> Manager {
    Manager::from_bundled().unwrap()
}

#[test]
fn bundled_store_passes_every_rule() {
    let manager = setup();
    let report = Validator::new(&manager, ValidationPolicy::default()).validate_all();
    assert!(report.is_clean(), "unexpected findings:\n{report}");
    assert_eq!(report.entries_checked, manager.metaregistry().len());
}

#[test]
fn unknown_metaprefix_yields_none_everywhere() {
    let manager = setup();
    assert!(manager.get_registry("nope").is_none());
    assert!(manager.get_registry_name("nope").is_none());
    assert!(manager.get_registry_homepage("nope").is_none());
    assert!(manager
        .get_registry_provider_uri_format("nope", "anything")
        .is_none());
    assert!(manager.get_registry_example("nope").is_none());
    assert!(manager.get_registry_description("nope").is_none());
}

#[test]
fn uniprot_accessors_agree_with_record() {
    let manager = setup();
    let registry = manager.get_registry("uniprot").unwrap();
    assert_eq!(registry.prefix, "uniprot");

    let homepage = "https://www.uniprot.org/database/";
    assert_eq!(registry.homepage.as_deref(), Some(homepage));
    assert_eq!(manager.get_registry_homepage("uniprot"), Some(homepage));

    let name = "UniProt Cross-ref database";
    assert_eq!(registry.name.as_deref(), Some(name));
    assert_eq!(manager.get_registry_name("uniprot"), Some(name));

    assert_eq!(manager.get_registry_example("uniprot"), Some("DB-0174"));
    assert_eq!(
        manager.get_registry_description("uniprot"),
        registry.description.as_deref()
    );
    assert_eq!(
        manager
            .get_registry_provider_uri_format("uniprot", "DB-0174")
            .as_deref(),
        Some("https://www.uniprot.org/database/DB-0174")
    );
}

#[test]
fn resolver_urls_require_a_resolver_registry() {
    let manager = setup();
    assert!(manager.get_registry_uri("nope", "chebi", "1234").is_none());
    assert!(manager.get_registry_uri("go", "chebi", "1234").is_none());
    assert_eq!(
        manager
            .get_registry_uri("bioregistry", "chebi", "1234")
            .as_deref(),
        Some("https://bioregistry.io/chebi:1234")
    );
    assert_eq!(
        manager.get_registry_uri("miriam", "go", "0032571").as_deref(),
        Some("https://identifiers.org/go:0032571")
    );
}

#[test]
fn normalization_is_idempotent_over_the_bundled_registry() {
    let manager = setup();
    for prefix in manager.registry().keys() {
        assert_eq!(manager.normalize_prefix(prefix), Some(prefix.as_str()));
    }
    assert_eq!(manager.normalize_prefix("CHEBI"), Some("chebi"));
    assert_eq!(manager.normalize_prefix("GO"), Some("go"));
    assert_eq!(manager.normalize_prefix("UniProtKB"), Some("uniprot"));
    assert_eq!(manager.normalize_prefix("uniprot_resource"), Some("uniprot.resource"));
    assert_eq!(manager.normalize_prefix("not-a-prefix"), None);
    assert_eq!(manager.get_resource("Chebi").map(|r| r.prefix.as_str()), Some("chebi"));
}

#[test]
fn invmaps_cover_the_mapped_examples() {
    let manager = setup();
    for (metaprefix, registry) in manager.metaregistry() {
        if metaprefix == "bioregistry" {
            continue;
        }
        let invmap = manager.get_registry_invmap(metaprefix);
        let example = registry.example.as_deref().unwrap();
        assert!(
            invmap.is_empty() || invmap.contains_key(example),
            "{metaprefix}: {example} is not mapped"
        );
    }
    assert_eq!(
        manager.get_registry_invmap("uniprot").get("DB-0174").map(String::as_str),
        Some("chebi")
    );
}

#[test]
fn corresponding_resources_match_examples_and_formats() {
    let manager = setup();
    for (metaprefix, registry) in manager.metaregistry() {
        let resource = match registry.bioregistry_prefix.as_deref() {
            Some(prefix) => &manager.registry()[prefix],
            None => match manager.registry().get(metaprefix) {
                Some(resource) => resource,
                None => continue,
            },
        };
        if let Some(pattern) = resource.get_pattern() {
            let regex = regex::Regex::new(&pattern).unwrap();
            assert!(regex.is_match(registry.example.as_deref().unwrap()));
        }
        if let Some(template) = registry.provider_uri_format.as_deref() {
            let formats = resource.get_uri_formats();
            assert!(!formats.is_empty());
            assert!(formats.iter().any(|format| format == template));
        }
    }
}

#[test]
fn turtle_projection_of_uniprot_names_mapped_resources() {
    let manager = setup();
    let registry = manager.get_registry("uniprot").unwrap();
    let text = to_graph_text(registry, &manager);

    assert!(text.contains("<https://bioregistry.io/metaregistry/uniprot> a bioregistry.schema:0000002"));
    assert!(text.contains(r#"rdfs:label "UniProt Cross-ref database""#));
    assert!(text.contains("foaf:homepage <https://www.uniprot.org/database/>"));
    assert!(text.contains("rdfs:seeAlso <https://bioregistry.io/registry/uniprot.resource>"));
    assert!(text.contains(
        "<https://bioregistry.io/registry/chebi> bioregistry.schema:0000010 <https://bioregistry.io/metaregistry/uniprot> ."
    ));
    assert!(text.contains(
        "<https://bioregistry.io/registry/go> bioregistry.schema:0000010 <https://bioregistry.io/metaregistry/uniprot> ."
    ));
    assert_eq!(text, to_graph_text(registry, &manager));
}

#[test]
fn turtle_projection_links_person_contacts_by_orcid() {
    let manager = setup();
    let registry = manager.get_registry("bioregistry").unwrap();
    let text = to_graph_text(registry, &manager);
    assert!(text.contains("bioregistry.schema:0000019 <https://orcid.org/0000-0003-4423-4370>"));
    assert!(text.contains(
        "<https://orcid.org/0000-0003-4423-4370> rdfs:label \"Charles Tapley Hoyt\""
    ));
    assert!(text.contains(r#"bioregistry.schema:0000007 "https://bioregistry.io/$1:$2""#));
}
