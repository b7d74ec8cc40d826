//! In-memory `ContentHost` backed by a YAML schema snapshot.
//!
//! A snapshot is an export of the CMS schema: sites, sections, entry types,
//! field definitions (with their matrix entry types or block types) and the
//! other field containers. References are by handle; a layout entry named
//! `title` stands for the container's native title.
//!
//! ```yaml
//! sections:
//!   - { id: 1, handle: blog, name: Blog, type: channel, entryTypes: [post] }
//! entryTypes:
//!   - { id: 1, handle: post, name: Post, hasTitleField: true, fields: [title, body] }
//! fields:
//!   - { id: 1, handle: body, name: Body, kind: craft\ckeditor\Field, translationMethod: site }
//! ```
//!
//! Every reference is checked at load time, so lookups afterwards only fail
//! for definitions the snapshot never contained.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::ports::{ContentHost, HostError, HostResult};
use crate::types::*;

const TITLE_HANDLE: &str = "title";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate {kind} '{value}'")]
    Duplicate { kind: &'static str, value: String },

    #[error("'{0}' is reserved for the native title field")]
    ReservedHandle(String),

    #[error("{0} places 'title' in its layout but has no title field")]
    TitleWithoutTitleField(String),

    #[error("{owner} references unknown {target_kind} '{target}'")]
    DanglingReference {
        owner: String,
        target_kind: &'static str,
        target: String,
    },
}

// ── YAML document ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDoc {
    #[serde(default)]
    sites: Vec<Site>,
    #[serde(default)]
    sections: Vec<SectionDoc>,
    #[serde(default)]
    entry_types: Vec<EntryTypeDoc>,
    #[serde(default)]
    fields: Vec<FieldDoc>,
    #[serde(default)]
    category_groups: Vec<ContainerDoc>,
    #[serde(default)]
    volumes: Vec<ContainerDoc>,
    #[serde(default)]
    global_sets: Vec<ContainerDoc>,
    #[serde(default)]
    user_fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionDoc {
    id: i64,
    handle: String,
    name: String,
    #[serde(rename = "type")]
    section_type: SectionType,
    #[serde(default)]
    entry_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryTypeDoc {
    id: i64,
    handle: String,
    name: String,
    #[serde(default)]
    has_title_field: bool,
    #[serde(default)]
    title_label: Option<String>,
    #[serde(default)]
    title_translation_method: Option<String>,
    #[serde(default)]
    fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldDoc {
    #[serde(default)]
    id: Option<i64>,
    handle: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    translation_method: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    entry_types: Vec<String>,
    #[serde(default)]
    block_types: Vec<BlockTypeDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChildBlocksDoc {
    /// `"*"` allows every block type; any other string is a single handle.
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockTypeDoc {
    id: i64,
    handle: String,
    name: String,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    min_blocks: Option<u32>,
    #[serde(default)]
    max_blocks: Option<u32>,
    #[serde(default)]
    min_child_blocks: Option<u32>,
    #[serde(default)]
    max_child_blocks: Option<u32>,
    #[serde(default)]
    min_sibling_blocks: Option<u32>,
    #[serde(default)]
    max_sibling_blocks: Option<u32>,
    #[serde(default = "default_true")]
    top_level: bool,
    #[serde(default)]
    child_blocks: Option<ChildBlocksDoc>,
    #[serde(default)]
    fields: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ContainerDoc {
    id: i64,
    handle: String,
    name: String,
    #[serde(default)]
    fields: Vec<String>,
}

impl ChildBlocksDoc {
    fn into_child_blocks(self) -> ChildBlocks {
        match self {
            Self::One(s) if s.trim() == "*" => ChildBlocks::All,
            Self::One(s) => ChildBlocks::Only(vec![s]),
            Self::Many(handles) if handles.is_empty() => ChildBlocks::None,
            Self::Many(handles) => ChildBlocks::Only(handles),
        }
    }
}

// ── Host ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SnapshotHost {
    sites: Vec<Site>,
    sections: Vec<Section>,
    section_entry_types: HashMap<i64, Vec<String>>,
    entry_types: HashMap<String, EntryType>,
    entry_type_layouts: HashMap<i64, Vec<String>>,
    fields: HashMap<String, FieldDefinition>,
    matrix_entry_types: HashMap<String, Vec<String>>,
    block_types: HashMap<String, Vec<BlockType>>,
    block_type_layouts: HashMap<i64, Vec<String>>,
    containers: Vec<(FieldContainer, Vec<String>)>,
    user_layout: Vec<String>,
}

impl SnapshotHost {
    /// Load a snapshot from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load a snapshot from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, SnapshotError> {
        let doc: SnapshotDoc = serde_yaml::from_str(content)?;
        let host = Self::build(doc)?;
        tracing::debug!(
            sections = host.sections.len(),
            entry_types = host.entry_types.len(),
            fields = host.fields.len(),
            "schema snapshot loaded"
        );
        Ok(host)
    }

    pub fn field(&self, handle: &str) -> Option<&FieldDefinition> {
        self.fields.get(handle)
    }

    pub fn entry_type(&self, handle: &str) -> Option<EntryType> {
        self.entry_types.get(handle).cloned()
    }

    fn build(doc: SnapshotDoc) -> Result<Self, SnapshotError> {
        let mut host = Self {
            sites: doc.sites,
            user_layout: doc.user_fields,
            ..Self::default()
        };

        for f in doc.fields {
            if f.handle == TITLE_HANDLE {
                return Err(SnapshotError::ReservedHandle(f.handle));
            }
            if host.fields.contains_key(&f.handle) {
                return Err(duplicate("field handle", &f.handle));
            }

            if !f.entry_types.is_empty() {
                host.matrix_entry_types
                    .insert(f.handle.clone(), f.entry_types);
            }

            let mut block_types = Vec::with_capacity(f.block_types.len());
            for bt in f.block_types {
                if host.block_type_layouts.contains_key(&bt.id) {
                    return Err(duplicate("block type id", &bt.id.to_string()));
                }
                host.block_type_layouts.insert(bt.id, bt.fields);
                block_types.push(BlockType {
                    id: bt.id,
                    handle: bt.handle,
                    name: bt.name,
                    settings: BlockTypeSettings {
                        enabled: bt.enabled,
                        description: bt.description,
                        min_blocks: bt.min_blocks,
                        max_blocks: bt.max_blocks,
                        min_child_blocks: bt.min_child_blocks,
                        max_child_blocks: bt.max_child_blocks,
                        min_sibling_blocks: bt.min_sibling_blocks,
                        max_sibling_blocks: bt.max_sibling_blocks,
                        top_level: bt.top_level,
                        child_blocks: bt
                            .child_blocks
                            .map(ChildBlocksDoc::into_child_blocks)
                            .unwrap_or_default(),
                    },
                });
            }
            if !block_types.is_empty() {
                host.block_types.insert(f.handle.clone(), block_types);
            }

            host.fields.insert(
                f.handle.clone(),
                FieldDefinition {
                    id: f.id,
                    handle: f.handle,
                    name: f.name,
                    kind: f.kind,
                    translation_method: f.translation_method,
                    required: f.required,
                    instructions: f.instructions,
                },
            );
        }

        for et in doc.entry_types {
            if host.entry_types.contains_key(&et.handle) {
                return Err(duplicate("entry type handle", &et.handle));
            }
            if host.entry_type_layouts.contains_key(&et.id) {
                return Err(duplicate("entry type id", &et.id.to_string()));
            }
            host.entry_type_layouts.insert(et.id, et.fields);
            host.entry_types.insert(
                et.handle.clone(),
                EntryType {
                    id: et.id,
                    handle: et.handle,
                    name: et.name,
                    title: TitleConfig {
                        has_title_field: et.has_title_field,
                        label: et.title_label,
                        translation_method: et.title_translation_method,
                    },
                },
            );
        }

        let mut section_handles = HashSet::new();
        for s in doc.sections {
            if !section_handles.insert(s.handle.clone()) {
                return Err(duplicate("section handle", &s.handle));
            }
            if host.section_entry_types.contains_key(&s.id) {
                return Err(duplicate("section id", &s.id.to_string()));
            }
            host.section_entry_types.insert(s.id, s.entry_types);
            host.sections.push(Section {
                id: s.id,
                handle: s.handle,
                name: s.name,
                section_type: s.section_type,
            });
        }

        for (kind, label, docs) in [
            (ContainerKind::CategoryGroup, "category group id", doc.category_groups),
            (ContainerKind::Volume, "volume id", doc.volumes),
            (ContainerKind::GlobalSet, "global set id", doc.global_sets),
        ] {
            let mut ids = HashSet::new();
            for c in docs {
                if !ids.insert(c.id) {
                    return Err(duplicate(label, &c.id.to_string()));
                }
                host.containers.push((
                    FieldContainer {
                        id: c.id,
                        handle: c.handle,
                        name: c.name,
                        kind,
                    },
                    c.fields,
                ));
            }
        }

        host.validate()?;
        Ok(host)
    }

    /// Check every handle reference against what was loaded.
    fn validate(&self) -> Result<(), SnapshotError> {
        for section in &self.sections {
            for handle in self.section_entry_types.get(&section.id).into_iter().flatten() {
                if !self.entry_types.contains_key(handle) {
                    return Err(dangling(format!("section '{}'", section.handle), "entry type", handle));
                }
            }
        }

        for et in self.entry_types.values() {
            let owner = format!("entry type '{}'", et.handle);
            let layout = self.entry_type_layouts.get(&et.id).map(Vec::as_slice).unwrap_or_default();
            if !et.title.has_title_field && layout.iter().any(|h| h == TITLE_HANDLE) {
                return Err(SnapshotError::TitleWithoutTitleField(owner));
            }
            self.validate_layout(&owner, layout)?;
        }

        for (field, handles) in &self.matrix_entry_types {
            for handle in handles {
                if !self.entry_types.contains_key(handle) {
                    return Err(dangling(format!("field '{field}'"), "entry type", handle));
                }
            }
        }

        for (field, block_types) in &self.block_types {
            let known: HashSet<&str> = block_types.iter().map(|bt| bt.handle.as_str()).collect();
            for bt in block_types {
                let owner = format!("block type '{field}.{}'", bt.handle);
                if let ChildBlocks::Only(children) = &bt.settings.child_blocks {
                    for child in children {
                        if !known.contains(child.as_str()) {
                            return Err(dangling(owner, "block type", child));
                        }
                    }
                }
                let layout = self.block_type_layouts.get(&bt.id).map(Vec::as_slice).unwrap_or_default();
                if layout.iter().any(|h| h == TITLE_HANDLE) {
                    return Err(SnapshotError::TitleWithoutTitleField(owner));
                }
                self.validate_layout(&owner, layout)?;
            }
        }

        for (container, layout) in &self.containers {
            self.validate_layout(&format!("container '{}'", container.handle), layout)?;
        }
        self.validate_layout("user layout", &self.user_layout)
    }

    fn validate_layout(&self, owner: &str, layout: &[String]) -> Result<(), SnapshotError> {
        for handle in layout {
            if handle != TITLE_HANDLE && !self.fields.contains_key(handle) {
                return Err(dangling(owner.to_string(), "field", handle));
            }
        }
        Ok(())
    }

    fn layout(&self, owner: &str, handles: &[String]) -> HostResult<FieldSet> {
        handles
            .iter()
            .map(|handle| {
                if handle == TITLE_HANDLE {
                    return Ok(LayoutElement::Title);
                }
                self.fields
                    .get(handle)
                    .cloned()
                    .map(LayoutElement::Custom)
                    .ok_or_else(|| {
                        HostError::Inconsistent(format!("{owner} references unknown field '{handle}'"))
                    })
            })
            .collect::<HostResult<Vec<_>>>()
            .map(FieldSet::new)
    }

    fn known_field(&self, field: &FieldDefinition) -> HostResult<()> {
        if self.fields.contains_key(&field.handle) {
            Ok(())
        } else {
            Err(HostError::NotFound(format!("field '{}'", field.handle)))
        }
    }
}

fn duplicate(kind: &'static str, value: &str) -> SnapshotError {
    SnapshotError::Duplicate {
        kind,
        value: value.to_string(),
    }
}

fn dangling(owner: String, target_kind: &'static str, target: &str) -> SnapshotError {
    SnapshotError::DanglingReference {
        owner,
        target_kind,
        target: target.to_string(),
    }
}

impl ContentHost for SnapshotHost {
    fn sites(&self) -> HostResult<Vec<Site>> {
        Ok(self.sites.clone())
    }

    fn sections(&self) -> HostResult<Vec<Section>> {
        Ok(self.sections.clone())
    }

    fn section_by_handle(&self, handle: &str) -> HostResult<Option<Section>> {
        Ok(self.sections.iter().find(|s| s.handle == handle).cloned())
    }

    fn section_by_id(&self, id: i64) -> HostResult<Option<Section>> {
        Ok(self.sections.iter().find(|s| s.id == id).cloned())
    }

    fn entry_types(&self, section: &Section) -> HostResult<Vec<EntryType>> {
        let handles = self
            .section_entry_types
            .get(&section.id)
            .ok_or_else(|| HostError::NotFound(format!("section {}", section.id)))?;
        handles
            .iter()
            .map(|h| {
                self.entry_type(h)
                    .ok_or_else(|| HostError::Inconsistent(format!("entry type '{h}' missing")))
            })
            .collect()
    }

    fn entry_type_fields(&self, entry_type: &EntryType) -> HostResult<FieldSet> {
        let layout = self
            .entry_type_layouts
            .get(&entry_type.id)
            .ok_or_else(|| HostError::NotFound(format!("entry type {}", entry_type.id)))?;
        self.layout(&format!("entry type '{}'", entry_type.handle), layout)
    }

    fn matrix_entry_types(&self, field: &FieldDefinition) -> HostResult<Vec<EntryType>> {
        self.known_field(field)?;
        self.matrix_entry_types
            .get(&field.handle)
            .into_iter()
            .flatten()
            .map(|h| {
                self.entry_type(h)
                    .ok_or_else(|| HostError::Inconsistent(format!("entry type '{h}' missing")))
            })
            .collect()
    }

    fn block_types(&self, field: &FieldDefinition) -> HostResult<Vec<BlockType>> {
        self.known_field(field)?;
        Ok(self
            .block_types
            .get(&field.handle)
            .cloned()
            .unwrap_or_default())
    }

    fn block_type_fields(&self, block_type: &BlockType) -> HostResult<FieldSet> {
        let layout = self
            .block_type_layouts
            .get(&block_type.id)
            .ok_or_else(|| HostError::NotFound(format!("block type {}", block_type.id)))?;
        self.layout(&format!("block type '{}'", block_type.handle), layout)
    }

    fn containers(&self, kind: ContainerKind) -> HostResult<Vec<FieldContainer>> {
        Ok(self
            .containers
            .iter()
            .filter(|(c, _)| c.kind == kind)
            .map(|(c, _)| c.clone())
            .collect())
    }

    fn container_fields(&self, container: &FieldContainer) -> HostResult<FieldSet> {
        let (_, layout) = self
            .containers
            .iter()
            .find(|(c, _)| c.kind == container.kind && c.id == container.id)
            .ok_or_else(|| HostError::NotFound(format!("container '{}'", container.handle)))?;
        self.layout(&format!("container '{}'", container.handle), layout)
    }

    fn user_fields(&self) -> HostResult<FieldSet> {
        self.layout("user layout", &self.user_layout)
    }
}
