//! Request-level operations behind the HTTP endpoints.

use std::sync::Arc;

use crate::catalog::{ContainerCatalog, SectionSelector};
use crate::classify::FieldClassifier;
use crate::entity::EntityKind;
use crate::error::SchemaError;
use crate::flatten::{ContainerContext, Flattener, TraversalState, DEFAULT_MAX_DEPTH};
use crate::ports::ContentHost;
use crate::proto::*;
use crate::types::{FieldSet, Section, Site};

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Object-safe so the server can hold `Arc<dyn SchemaService>`.
pub trait SchemaService: Send + Sync {
    /// Flattened fields of one entry type plus the nested-type registry.
    fn fields(&self, query: FieldsQuery) -> Result<FieldsResponse>;

    fn sections(&self) -> Result<Vec<Section>>;

    fn types(&self, query: TypesQuery) -> Result<Vec<EntryTypeSummary>>;

    fn sites(&self) -> Result<Vec<Site>>;

    /// Fields of every container of one entity kind, then its native fields.
    fn entity_fields(&self, kind: &str) -> Result<EntityFieldsResponse>;
}

pub struct SchemaServiceImpl {
    host: Arc<dyn ContentHost>,
    classifier: FieldClassifier,
    max_depth: usize,
}

impl SchemaServiceImpl {
    pub fn new(host: Arc<dyn ContentHost>) -> Self {
        Self {
            host,
            classifier: FieldClassifier::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_classifier(mut self, classifier: FieldClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn catalog(&self) -> ContainerCatalog<'_> {
        ContainerCatalog::new(self.host.as_ref())
    }

    fn flattener(&self) -> Flattener<'_> {
        Flattener::new(self.host.as_ref(), &self.classifier).with_max_depth(self.max_depth)
    }

    /// Flatten the custom fields of each labelled field set into one listing.
    fn list_contained(
        &self,
        sets: impl IntoIterator<Item = (ContainerLabels, FieldSet)>,
        state: &mut TraversalState,
    ) -> Vec<ContainedField> {
        let flattener = self.flattener();
        let mut out = Vec::new();
        for (labels, set) in sets {
            let fields = flattener.flatten_into(&set.without_title(), ContainerContext::default(), state);
            out.extend(fields.into_iter().map(|field| ContainedField {
                field,
                labels: labels.clone(),
            }));
        }
        out
    }

    fn entry_field_sets(&self) -> Result<Vec<(ContainerLabels, FieldSet)>> {
        let catalog = self.catalog();
        let mut sets = Vec::new();
        for section in self.host.sections()? {
            for entry_type in catalog.entry_types(&section)? {
                let set = catalog.field_set(&entry_type)?;
                let labels = ContainerLabels {
                    section: Some(section.name.clone()),
                    entry_type: Some(entry_type.name.clone()),
                    ..Default::default()
                };
                sets.push((labels, set));
            }
        }
        Ok(sets)
    }

    fn container_field_sets(&self, kind: EntityKind) -> Result<Vec<(ContainerLabels, FieldSet)>> {
        let Some(container_kind) = kind.container_kind() else {
            return Ok(Vec::new());
        };
        let mut sets = Vec::new();
        for container in self.host.containers(container_kind)? {
            let set = self.host.container_fields(&container)?;
            let name = Some(container.name);
            let labels = match kind {
                EntityKind::Categories => ContainerLabels {
                    category_group: name,
                    ..Default::default()
                },
                EntityKind::Assets => ContainerLabels {
                    volume: name,
                    ..Default::default()
                },
                _ => ContainerLabels {
                    global_set: name,
                    ..Default::default()
                },
            };
            sets.push((labels, set));
        }
        Ok(sets)
    }
}

/// Empty strings count as absent, the way query strings arrive.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    present(value)
        .ok_or_else(|| SchemaError::InvalidInput(format!("The \"{name}\" parameter is required.")))
}

fn parse_id(value: Option<String>, name: &str) -> Result<Option<i64>> {
    present(value)
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|_| {
                SchemaError::InvalidInput(format!("The \"{name}\" parameter must be an integer."))
            })
        })
        .transpose()
}

impl SchemaService for SchemaServiceImpl {
    fn fields(&self, query: FieldsQuery) -> Result<FieldsResponse> {
        let section_handle = required(query.section_handle, "sectionHandle")?;
        let type_handle = required(query.type_handle, "typeHandle")?;
        let section_id = parse_id(query.section_id, "sectionId")?;

        let catalog = self.catalog();
        let section = catalog.resolve_section(&section_handle, section_id)?;
        let entry_type = catalog.entry_type(&section, &type_handle)?;
        let field_set = catalog.field_set(&entry_type)?;

        let output = self
            .flattener()
            .flatten(&field_set, ContainerContext::with_title(&entry_type.title));

        tracing::debug!(
            section = %section.handle,
            entry_type = %entry_type.handle,
            fields = output.fields.len(),
            nested_types = output.nested_types.len(),
            "fields flattened"
        );

        Ok(FieldsResponse {
            entry_type: EntryTypeSummary::new(&entry_type, field_set.custom_fields().count()),
            section,
            fields: output.fields,
            nested_types: output.nested_types,
        })
    }

    fn sections(&self) -> Result<Vec<Section>> {
        Ok(self.host.sections()?)
    }

    fn types(&self, query: TypesQuery) -> Result<Vec<EntryTypeSummary>> {
        let handle = present(query.section_handle);
        let id = parse_id(query.section_id, "sectionId")?;
        let selector = SectionSelector::from_parts(handle, id).ok_or_else(|| {
            SchemaError::InvalidInput(
                "Either \"sectionHandle\" or \"sectionId\" is required.".to_string(),
            )
        })?;

        let catalog = self.catalog();
        let section = catalog.select_section(&selector)?;
        catalog
            .entry_types(&section)?
            .iter()
            .map(|et| {
                let count = catalog.field_set(et)?.custom_fields().count();
                Ok(EntryTypeSummary::new(et, count))
            })
            .collect()
    }

    fn sites(&self) -> Result<Vec<Site>> {
        Ok(self.host.sites()?)
    }

    fn entity_fields(&self, kind: &str) -> Result<EntityFieldsResponse> {
        let kind: EntityKind = kind.parse()?;
        let sets = match kind {
            EntityKind::Entries => self.entry_field_sets()?,
            EntityKind::Users => vec![(ContainerLabels::default(), self.host.user_fields()?)],
            other => self.container_field_sets(other)?,
        };

        let mut state = TraversalState::new();
        let mut fields = self.list_contained(sets, &mut state);
        fields.extend(kind.native_fields().into_iter().map(|field| ContainedField {
            field,
            labels: ContainerLabels::default(),
        }));

        tracing::debug!(kind = %kind, fields = fields.len(), "entity fields listed");

        Ok(EntityFieldsResponse {
            entity_type: kind.to_string(),
            fields,
            nested_types: state.into_registry().into_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SemanticType;
    use crate::snapshot::SnapshotHost;
    use pretty_assertions::assert_eq;

    const YAML: &str = r#"
sites:
  - { id: 1, handle: en, name: English, language: en-US, primary: true }
  - { id: 2, handle: de, name: Deutsch, language: de-DE, enabled: false }
sections:
  - { id: 1, handle: blog, name: Blog, type: channel, entryTypes: [post] }
  - { id: 2, handle: about, name: About, type: single, entryTypes: [page] }
entryTypes:
  - { id: 1, handle: post, name: Post, hasTitleField: true, fields: [title, body, sections] }
  - { id: 2, handle: page, name: Page, hasTitleField: false, fields: [body] }
  - { id: 3, handle: text, name: Text, fields: [body] }
  - { id: 4, handle: gallery, name: Gallery, fields: [images] }
fields:
  - { id: 1, handle: body, name: Body, kind: craft\ckeditor\Field, translationMethod: site }
  - { id: 2, handle: images, name: Images, kind: craft\fields\Assets, translationMethod: none }
  - { id: 3, handle: sections, name: Sections, kind: craft\fields\Matrix, translationMethod: site, entryTypes: [text, gallery] }
  - { id: 4, handle: alt, name: Alt Text, kind: craft\fields\PlainText, translationMethod: language }
categoryGroups:
  - { id: 1, handle: topics, name: Topics, fields: [title, body] }
volumes:
  - { id: 1, handle: uploads, name: Uploads, fields: [alt] }
userFields: [alt]
"#;

    fn service() -> SchemaServiceImpl {
        SchemaServiceImpl::new(Arc::new(SnapshotHost::from_yaml(YAML).unwrap()))
    }

    fn fields_query(section: &str, ty: &str, id: Option<&str>) -> FieldsQuery {
        FieldsQuery {
            section_handle: Some(section.into()),
            type_handle: Some(ty.into()),
            section_id: id.map(str::to_string),
        }
    }

    // ── fields ────────────────────────────────────────────────────

    #[test]
    fn blog_post_scenario() {
        let resp = service().fields(fields_query("blog", "post", None)).unwrap();
        let names: Vec<_> = resp.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "body", "sections"]);

        let sections = &resp.fields[2];
        assert_eq!(sections.semantic_type, SemanticType::Matrix);
        assert_eq!(
            sections.composite_type_refs,
            Some(vec!["entryType:text".to_string(), "entryType:gallery".to_string()])
        );

        assert_eq!(resp.nested_types.len(), 2);
        assert!(resp.nested_types.iter().all(|t| t.fields.len() == 1));
        assert_eq!(resp.entry_type.field_count, 2);
        assert_eq!(resp.section.handle, "blog");
    }

    #[test]
    fn missing_type_handle_is_rejected() {
        let query = FieldsQuery {
            section_handle: Some("blog".into()),
            ..Default::default()
        };
        let err = service().fields(query).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(err.to_string().contains("\"typeHandle\" parameter is required"));
    }

    #[test]
    fn empty_section_handle_counts_as_missing() {
        let err = service().fields(fields_query("", "post", None)).unwrap_err();
        assert!(err.to_string().contains("\"sectionHandle\""));
    }

    #[test]
    fn section_id_mismatch() {
        let err = service()
            .fields(fields_query("blog", "post", Some("2")))
            .unwrap_err();
        assert!(matches!(err, SchemaError::Mismatch { id: 2, .. }));
    }

    #[test]
    fn non_numeric_section_id_is_rejected() {
        let err = service()
            .fields(fields_query("blog", "post", Some("abc")))
            .unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn unknown_entry_type_is_not_found() {
        let err = service().fields(fields_query("blog", "page", None)).unwrap_err();
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn fields_are_deterministic() {
        let svc = service();
        let a = svc.fields(fields_query("blog", "post", Some("1"))).unwrap();
        let b = svc.fields(fields_query("blog", "post", Some("1"))).unwrap();
        assert_eq!(a, b);
    }

    // ── sections / types / sites ──────────────────────────────────

    #[test]
    fn sections_in_declared_order() {
        let handles: Vec<_> = service()
            .sections()
            .unwrap()
            .into_iter()
            .map(|s| s.handle)
            .collect();
        assert_eq!(handles, vec!["blog", "about"]);
    }

    #[test]
    fn types_by_id_count_custom_fields() {
        let types = service()
            .types(TypesQuery {
                section_handle: None,
                section_id: Some("1".into()),
            })
            .unwrap();
        assert_eq!(types, vec![EntryTypeSummary {
            id: 1,
            handle: "post".into(),
            name: "Post".into(),
            has_title_field: true,
            field_count: 2,
        }]);
    }

    #[test]
    fn types_without_selector_is_rejected() {
        let err = service().types(TypesQuery::default()).unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn sites_include_disabled() {
        let sites = service().sites().unwrap();
        assert_eq!(sites.len(), 2);
        assert!(!sites[1].enabled);
    }

    // ── entity_fields ─────────────────────────────────────────────

    #[test]
    fn entries_listing_labels_and_defaults() {
        let resp = service().entity_fields("entries").unwrap();
        assert_eq!(resp.entity_type, "entries");

        // post: body, sections; page: body; then 4 native fields.
        let names: Vec<_> = resp.fields.iter().map(|f| f.field.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["body", "sections", "body", "title", "slug", "postDate", "expiryDate"]
        );
        assert_eq!(resp.fields[0].labels.section.as_deref(), Some("Blog"));
        assert_eq!(resp.fields[2].labels.entry_type.as_deref(), Some("Page"));
        assert_eq!(resp.fields[3].labels, ContainerLabels::default());
        assert_eq!(resp.nested_types.len(), 2);
    }

    #[test]
    fn category_listing_drops_layout_title() {
        let resp = service().entity_fields("category").unwrap();
        let names: Vec<_> = resp.fields.iter().map(|f| f.field.name.as_str()).collect();
        assert_eq!(names, vec!["body", "title", "slug"]);
        assert_eq!(resp.fields[0].labels.category_group.as_deref(), Some("Topics"));
    }

    #[test]
    fn asset_and_user_listings() {
        let svc = service();
        let assets = svc.entity_fields("assets").unwrap();
        assert_eq!(assets.fields[0].labels.volume.as_deref(), Some("Uploads"));
        assert_eq!(assets.fields.len(), 1 + 6);

        let users = svc.entity_fields("USER").unwrap();
        assert_eq!(users.fields[0].field.name, "alt");
        assert_eq!(users.fields.len(), 1 + 5);
    }

    #[test]
    fn globals_without_sets_is_empty() {
        let resp = service().entity_fields("globals").unwrap();
        assert!(resp.fields.is_empty());
        assert!(resp.nested_types.is_empty());
    }

    #[test]
    fn unsupported_entity_kind() {
        let err = service().entity_fields("tags").unwrap_err();
        assert_eq!(err.http_status(), 400);
    }
}
