//! Metaregistry query surface.
//!
//! Every function here is total: an unknown metaprefix yields `None`.

use crate::model::registry::Registry;
use crate::store::Manager;

impl Manager {
    pub fn get_registry(&self, metaprefix: &str) -> Option<&Registry> {
        self.metaregistry.get(metaprefix)
    }

    pub fn get_registry_name(&self, metaprefix: &str) -> Option<&str> {
        self.get_registry(metaprefix)?.name.as_deref()
    }

    pub fn get_registry_homepage(&self, metaprefix: &str) -> Option<&str> {
        self.get_registry(metaprefix)?.homepage.as_deref()
    }

    pub fn get_registry_example(&self, metaprefix: &str) -> Option<&str> {
        self.get_registry(metaprefix)?.example.as_deref()
    }

    pub fn get_registry_description(&self, metaprefix: &str) -> Option<&str> {
        self.get_registry(metaprefix)?.description.as_deref()
    }

    /// Returns the registry's page for `local_id` (an external prefix).
    pub fn get_registry_provider_uri_format(
        &self,
        metaprefix: &str,
        local_id: &str,
    ) -> Option<String> {
        self.get_registry(metaprefix)?.resolve_provider_uri(local_id)
    }

    /// Resolves `prefix:identifier` through a resolver registry.
    ///
    /// Returns `None` when the metaprefix is unknown or the registry is not
    /// a resolver.
    pub fn get_registry_uri(
        &self,
        metaprefix: &str,
        prefix: &str,
        identifier: &str,
    ) -> Option<String> {
        self.get_registry(metaprefix)?.resolve_uri(prefix, identifier)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::registry::Registry;
    use crate::store::Manager;
    use std::collections::BTreeMap;

    fn manager() -> Manager {
        let mut resolver = Registry::new("resolver");
        resolver.name = Some("A Resolver".to_string());
        resolver.resolver_uri_format = Some("https://r.example.org/$1:$2".to_string());
        let mut provider = Registry::new("provider");
        provider.provider_uri_format = Some("https://p.example.org/$1".to_string());

        let metaregistry = [resolver, provider]
            .into_iter()
            .map(|registry| (registry.prefix.clone(), registry))
            .collect::<BTreeMap<_, _>>();
        Manager::new(BTreeMap::new(), metaregistry)
    }

    #[test]
    fn unknown_metaprefix_is_absent_everywhere() {
        let manager = manager();
        assert!(manager.get_registry("nope").is_none());
        assert!(manager.get_registry_name("nope").is_none());
        assert!(manager.get_registry_homepage("nope").is_none());
        assert!(manager.get_registry_example("nope").is_none());
        assert!(manager.get_registry_description("nope").is_none());
        assert!(manager.get_registry_provider_uri_format("nope", "x").is_none());
        assert!(manager.get_registry_uri("nope", "chebi", "1").is_none());
    }

    #[test]
    fn missing_field_is_absent_for_known_metaprefix() {
        let manager = manager();
        assert_eq!(manager.get_registry_name("resolver"), Some("A Resolver"));
        assert_eq!(manager.get_registry_homepage("resolver"), None);
        assert_eq!(manager.get_registry_provider_uri_format("resolver", "x"), None);
    }

    #[test]
    fn resolves_only_through_resolvers() {
        let manager = manager();
        assert_eq!(
            manager.get_registry_uri("resolver", "chebi", "1234").as_deref(),
            Some("https://r.example.org/chebi:1234")
        );
        assert_eq!(manager.get_registry_uri("provider", "chebi", "1234"), None);
        assert_eq!(
            manager
                .get_registry_provider_uri_format("provider", "chebi")
                .as_deref(),
            Some("https://p.example.org/chebi")
        );
    }
}
