//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, ResourceTemplate};

use super::definitions::{
    CreatureTypesResource, KeywordAbilitiesResource, ResourceDefinition, ServerInfoResource,
    ThemePatternsResource, REFERENCE_TEMPLATE,
};
use super::service::ResourceEntry;

fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content: R::content(),
    }
}

/// Get all registered resources as ResourceEntries.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    vec![
        build_resource::<ServerInfoResource>(),
        build_resource::<CreatureTypesResource>(),
        build_resource::<KeywordAbilitiesResource>(),
        build_resource::<ThemePatternsResource>(),
    ]
}

/// Get all registered resource templates (RFC 6570 URI templates).
pub fn get_all_resource_templates() -> Vec<ResourceTemplate> {
    vec![RawResourceTemplate {
        uri_template: REFERENCE_TEMPLATE.to_string(),
        name: "Reference Data".to_string(),
        title: Some("Card Reference Datasets".to_string()),
        description: Some(
            "Reference datasets by name: creature-types, keyword-abilities or theme-patterns"
                .to_string(),
        ),
        mime_type: None,
    }
    .no_annotation()]
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    vec![
        ServerInfoResource::URI,
        CreatureTypesResource::URI,
        KeywordAbilitiesResource::URI,
        ThemePatternsResource::URI,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_uri_list() {
        let resources = get_all_resources();
        let uris: Vec<_> = resources
            .iter()
            .map(|r| r.resource.raw.uri.as_str())
            .collect();
        assert_eq!(uris, resource_uris());
    }

    #[test]
    fn test_resources_carry_mime_types() {
        for entry in get_all_resources() {
            let mime = entry.resource.raw.mime_type.as_deref();
            if entry.resource.raw.uri == ThemePatternsResource::URI
                || entry.resource.raw.uri == ServerInfoResource::URI
            {
                assert_eq!(mime, Some("application/json"));
            } else {
                assert_eq!(mime, Some("text/plain"));
            }
        }
    }

    #[test]
    fn test_reference_template() {
        let templates = get_all_resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].raw.uri_template, "scryfall://reference/{dataset}");
    }
}
