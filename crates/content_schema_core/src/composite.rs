//! Variant resolution for composite fields.
//!
//! Matrix fields expand into full entry types. Block-repeater fields expand
//! into block types, each carrying its containment settings. Host failures
//! never escape: they become an empty variant list plus a note.

use std::collections::HashSet;

use crate::classify::SemanticType;
use crate::descriptor::{ChildFields, NestedTypeDefinition, NestedTypeKind};
use crate::ports::{ContentHost, HostResult};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSource {
    EntryType(EntryType),
    BlockType(BlockType),
}

/// One shape a composite field's content may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub type_id: String,
    pub type_name: String,
    pub source: VariantSource,
    /// Resolved child allow-list. Block types only.
    pub child_type_ids: Option<Vec<String>>,
}

impl Variant {
    pub fn kind(&self) -> NestedTypeKind {
        match self.source {
            VariantSource::EntryType(_) => NestedTypeKind::EntryType,
            VariantSource::BlockType(_) => NestedTypeKind::BlockType,
        }
    }

    pub fn handle(&self) -> &str {
        match &self.source {
            VariantSource::EntryType(et) => &et.handle,
            VariantSource::BlockType(bt) => &bt.handle,
        }
    }

    /// Title configuration of a nested entry type.
    pub fn title(&self) -> Option<&TitleConfig> {
        match &self.source {
            VariantSource::EntryType(et) => Some(&et.title),
            VariantSource::BlockType(_) => None,
        }
    }

    /// Registry entry with no fields yet. Inserted before recursing so that
    /// the variant is already known when it shows up again further down.
    pub fn placeholder(&self) -> NestedTypeDefinition {
        let metadata = match &self.source {
            VariantSource::BlockType(bt) => Some(bt.settings.clone()),
            VariantSource::EntryType(_) => None,
        };
        NestedTypeDefinition {
            type_id: self.type_id.clone(),
            type_name: self.type_name.clone(),
            kind: self.kind(),
            handle: self.handle().to_string(),
            fields: Vec::new(),
            child_fields: self.child_type_ids.clone().map(|type_ids| ChildFields { type_ids }),
            metadata,
            notes: Vec::new(),
        }
    }
}

/// typeId of a matrix variant. Entry type handles are unique host-wide.
pub fn entry_type_id(handle: &str) -> String {
    format!("entryType:{handle}")
}

/// typeId of a block variant. Block type handles are only unique within
/// their owning field, so the field handle is part of the id.
pub fn block_type_id(field_handle: &str, handle: &str) -> String {
    format!("blockType:{field_handle}.{handle}")
}

/// Variants of one composite field plus anything worth telling the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub variants: Vec<Variant>,
    pub notes: Vec<String>,
}

pub struct CompositeResolver<'a> {
    host: &'a dyn ContentHost,
}

impl<'a> CompositeResolver<'a> {
    pub fn new(host: &'a dyn ContentHost) -> Self {
        Self { host }
    }

    pub fn resolve_variants(
        &self,
        field: &FieldDefinition,
        semantic_type: &SemanticType,
    ) -> Resolution {
        match semantic_type {
            SemanticType::Matrix => self.matrix_variants(field),
            SemanticType::Neo => self.block_variants(field),
            _ => Resolution::default(),
        }
    }

    /// Field set of a single variant, fetched only when it gets expanded.
    pub fn variant_fields(&self, variant: &Variant) -> HostResult<FieldSet> {
        match &variant.source {
            VariantSource::EntryType(et) => self.host.entry_type_fields(et),
            VariantSource::BlockType(bt) => self.host.block_type_fields(bt),
        }
    }

    fn matrix_variants(&self, field: &FieldDefinition) -> Resolution {
        let entry_types = match self.host.matrix_entry_types(field) {
            Ok(ets) => ets,
            Err(e) => return degraded(field, e),
        };

        let mut seen = HashSet::new();
        let variants = entry_types
            .into_iter()
            .filter(|et| seen.insert(et.handle.clone()))
            .map(|et| Variant {
                type_id: entry_type_id(&et.handle),
                type_name: et.name.clone(),
                source: VariantSource::EntryType(et),
                child_type_ids: None,
            })
            .collect();

        Resolution {
            variants,
            notes: Vec::new(),
        }
    }

    fn block_variants(&self, field: &FieldDefinition) -> Resolution {
        let block_types = match self.host.block_types(field) {
            Ok(bts) => bts,
            Err(e) => return degraded(field, e),
        };

        let mut seen = HashSet::new();
        let block_types: Vec<BlockType> = block_types
            .into_iter()
            .filter(|bt| seen.insert(bt.handle.clone()))
            .collect();
        let type_id = |handle: &str| block_type_id(&field.handle, handle);
        let all_ids: Vec<String> = block_types.iter().map(|bt| type_id(bt.handle.as_str())).collect();

        let mut notes = Vec::new();
        let variants = block_types
            .into_iter()
            .map(|bt| {
                let child_type_ids = match &bt.settings.child_blocks {
                    ChildBlocks::All => all_ids.clone(),
                    ChildBlocks::None => Vec::new(),
                    ChildBlocks::Only(handles) => {
                        let (known, unknown): (Vec<&String>, Vec<&String>) =
                            handles.iter().partition(|h| seen.contains(*h));
                        for h in unknown {
                            notes.push(format!(
                                "block type '{}' allows unknown child block type '{h}'",
                                bt.handle
                            ));
                        }
                        known.into_iter().map(|h| type_id(h.as_str())).collect()
                    }
                };
                Variant {
                    type_id: type_id(bt.handle.as_str()),
                    type_name: bt.name.clone(),
                    source: VariantSource::BlockType(bt),
                    child_type_ids: Some(child_type_ids),
                }
            })
            .collect();

        Resolution { variants, notes }
    }
}

fn degraded(field: &FieldDefinition, err: crate::ports::HostError) -> Resolution {
    tracing::warn!(field = %field.handle, error = %err, "composite variants unavailable");
    Resolution {
        variants: Vec::new(),
        notes: vec![format!("could not resolve variants: {err}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotHost;

    const YAML: &str = r#"
fields:
  - id: 1
    handle: heading
    name: Heading
    kind: craft\fields\PlainText
  - id: 2
    handle: blocks
    name: Blocks
    kind: benf\neo\Field
    blockTypes:
      - id: 10
        handle: card
        name: Card
        childBlocks: [card]
        fields: [heading]
      - id: 11
        handle: grid
        name: Grid
        childBlocks: "*"
        topLevel: true
        minBlocks: 1
        maxBlocks: 4
      - id: 12
        handle: quote
        name: Quote
  - id: 3
    handle: body
    name: Body
    kind: craft\fields\Matrix
    entryTypes: [text, text, gallery]
entryTypes:
  - id: 20
    handle: text
    name: Text
    fields: [heading]
  - id: 21
    handle: gallery
    name: Gallery
"#;

    fn host() -> SnapshotHost {
        SnapshotHost::from_yaml(YAML).unwrap()
    }

    fn field(host: &SnapshotHost, handle: &str) -> FieldDefinition {
        host.field(handle).unwrap().clone()
    }

    #[test]
    fn matrix_variants_are_entry_types_without_duplicates() {
        let host = host();
        let resolution =
            CompositeResolver::new(&host).resolve_variants(&field(&host, "body"), &SemanticType::Matrix);
        let ids: Vec<_> = resolution.variants.iter().map(|v| v.type_id.as_str()).collect();
        assert_eq!(ids, vec!["entryType:text", "entryType:gallery"]);
        assert!(resolution
            .variants
            .iter()
            .all(|v| v.kind() == NestedTypeKind::EntryType && v.child_type_ids.is_none()));
    }

    #[test]
    fn block_child_allow_lists_resolve_against_siblings() {
        let host = host();
        let resolution =
            CompositeResolver::new(&host).resolve_variants(&field(&host, "blocks"), &SemanticType::Neo);
        let children: Vec<_> = resolution
            .variants
            .iter()
            .map(|v| (v.type_id.as_str(), v.child_type_ids.clone().unwrap()))
            .collect();
        assert_eq!(
            children,
            vec![
                ("blockType:blocks.card", vec!["blockType:blocks.card".to_string()]),
                (
                    "blockType:blocks.grid",
                    vec![
                        "blockType:blocks.card".into(),
                        "blockType:blocks.grid".into(),
                        "blockType:blocks.quote".into(),
                    ]
                ),
                ("blockType:blocks.quote", vec![]),
            ]
        );
        assert!(resolution.notes.is_empty());
    }

    #[test]
    fn placeholder_keeps_block_settings_verbatim() {
        let host = host();
        let resolution =
            CompositeResolver::new(&host).resolve_variants(&field(&host, "blocks"), &SemanticType::Neo);
        let grid = resolution.variants[1].placeholder();
        let meta = grid.metadata.unwrap();
        assert_eq!(meta.child_blocks, ChildBlocks::All);
        assert_eq!(meta.min_blocks, Some(1));
        assert_eq!(meta.max_blocks, Some(4));
        assert!(meta.top_level);
        assert!(grid.fields.is_empty());
    }

    #[test]
    fn leaf_fields_have_no_variants() {
        let host = host();
        let resolution = CompositeResolver::new(&host)
            .resolve_variants(&field(&host, "heading"), &SemanticType::String);
        assert_eq!(resolution, Resolution::default());
    }

    #[test]
    fn unknown_field_degrades_to_note() {
        let host = host();
        let stray = FieldDefinition {
            handle: "ghost".into(),
            kind: "craft\\fields\\Matrix".into(),
            ..Default::default()
        };
        let resolution =
            CompositeResolver::new(&host).resolve_variants(&stray, &SemanticType::Matrix);
        assert!(resolution.variants.is_empty());
        assert_eq!(resolution.notes.len(), 1);
        assert!(resolution.notes[0].starts_with("could not resolve variants"));
    }
}
