//! Schema flattening: the core traversal.
//!
//! Walks a field set in declared order and produces one descriptor per
//! element. Composite fields are expanded depth-first into a registry of
//! nested type definitions keyed by typeId:
//!
//! ```text
//! flatten(fields)
//! └── for each field
//!     ├── classify + describe
//!     └── composite? → resolve variants
//!         └── for each variant
//!             ├── on active path   → reference only (cycle)
//!             ├── already registered → reference only (shared)
//!             ├── depth ceiling hit → reference + note
//!             └── otherwise: placeholder → recurse → complete
//! ```
//!
//! Recursion depth is bounded by the number of distinct typeIds, since a
//! variant is only ever expanded once per traversal.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::classify::{FieldClassifier, SemanticType};
use crate::composite::{CompositeResolver, Variant};
use crate::descriptor::{FieldDescriptor, NestedTypeDefinition};
use crate::localization;
use crate::ports::ContentHost;
use crate::types::{FieldDefinition, FieldSet, LayoutElement, TitleConfig};

/// Default hard ceiling on composite nesting.
pub const DEFAULT_MAX_DEPTH: usize = 16;

// ── Registry ─────────────────────────────────────────────────

/// Nested type definitions in first-discovery order, indexed by typeId.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: Vec<NestedTypeDefinition>,
    index: HashMap<String, usize>,
}

impl TypeRegistry {
    pub fn contains(&self, type_id: &str) -> bool {
        self.index.contains_key(type_id)
    }

    pub fn get(&self, type_id: &str) -> Option<&NestedTypeDefinition> {
        self.index.get(type_id).map(|&i| &self.entries[i])
    }

    /// Insert a placeholder. Returns false if the typeId is already taken,
    /// in which case the existing entry wins.
    fn reserve(&mut self, placeholder: NestedTypeDefinition) -> bool {
        if self.contains(&placeholder.type_id) {
            return false;
        }
        self.index
            .insert(placeholder.type_id.clone(), self.entries.len());
        self.entries.push(placeholder);
        true
    }

    fn complete(&mut self, type_id: &str, fields: Vec<FieldDescriptor>, notes: Vec<String>) {
        if let Some(&i) = self.index.get(type_id) {
            let entry = &mut self.entries[i];
            entry.fields = fields;
            entry.notes.extend(notes);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NestedTypeDefinition> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<NestedTypeDefinition> {
        self.entries
    }
}

// ── Traversal state ──────────────────────────────────────────

/// State of one top-level traversal. Never shared between requests.
#[derive(Debug, Default)]
pub struct TraversalState {
    /// typeIds being expanded on the active path.
    visited: HashSet<String>,
    depth: usize,
    registry: TypeRegistry,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> TypeRegistry {
        self.registry
    }
}

/// Container the field set belongs to. Supplies the native title.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerContext<'a> {
    pub title: Option<&'a TitleConfig>,
}

impl<'a> ContainerContext<'a> {
    pub fn with_title(title: &'a TitleConfig) -> Self {
        Self { title: Some(title) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOutput {
    pub fields: Vec<FieldDescriptor>,
    pub nested_types: Vec<NestedTypeDefinition>,
}

// ── Per-field extraction ─────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field {id:?} has no handle")]
    MissingHandle { id: Option<i64> },

    #[error("field handle '{0}' contains whitespace")]
    InvalidHandle(String),
}

fn describe_field(
    field: &FieldDefinition,
    classifier: &FieldClassifier,
) -> Result<FieldDescriptor, FieldError> {
    let handle = field.handle.trim();
    if handle.is_empty() {
        return Err(FieldError::MissingHandle { id: field.id });
    }
    if handle.chars().any(char::is_whitespace) {
        return Err(FieldError::InvalidHandle(handle.to_string()));
    }

    let classification = classifier.classify(field);
    let display_name = if field.name.trim().is_empty() {
        handle.to_string()
    } else {
        field.name.clone()
    };

    Ok(FieldDescriptor {
        id: field.id,
        name: handle.to_string(),
        display_name,
        semantic_type: classification.semantic_type,
        is_localizable: localization::is_localizable(field),
        required: field.required,
        instructions: field.instructions.clone().filter(|s| !s.is_empty()),
        composite_type_refs: None,
        notes: Vec::new(),
    })
}

/// Describe a field, falling back to a safe default if it is malformed.
fn describe_or_default(field: &FieldDefinition, classifier: &FieldClassifier) -> FieldDescriptor {
    describe_field(field, classifier).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "malformed field definition, using defaults");
        let name = match field.handle.trim() {
            "" => "unknown".to_string(),
            h => h.to_string(),
        };
        let display_name = match field.name.trim() {
            "" => "Unknown Field".to_string(),
            n => n.to_string(),
        };
        FieldDescriptor {
            id: field.id,
            notes: vec![err.to_string()],
            ..FieldDescriptor::native(&name, &display_name, SemanticType::Unknown, false)
        }
    })
}

fn title_descriptor(ctx: &ContainerContext<'_>) -> FieldDescriptor {
    let label = ctx
        .title
        .and_then(|t| t.label.as_deref())
        .filter(|l| !l.trim().is_empty())
        .unwrap_or("Title");
    FieldDescriptor::native(
        "title",
        label,
        SemanticType::String,
        localization::title_is_localizable(ctx.title),
    )
}

// ── Flattener ────────────────────────────────────────────────

pub struct Flattener<'a> {
    classifier: &'a FieldClassifier,
    resolver: CompositeResolver<'a>,
    max_depth: usize,
}

impl<'a> Flattener<'a> {
    pub fn new(host: &'a dyn ContentHost, classifier: &'a FieldClassifier) -> Self {
        Self {
            classifier,
            resolver: CompositeResolver::new(host),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Flatten one field set with a fresh registry.
    pub fn flatten(&self, fields: &FieldSet, ctx: ContainerContext<'_>) -> FlattenOutput {
        let mut state = TraversalState::new();
        let fields = self.flatten_into(fields, ctx, &mut state);
        FlattenOutput {
            fields,
            nested_types: state.into_registry().into_vec(),
        }
    }

    /// Flatten into an existing traversal, sharing its registry.
    pub fn flatten_into(
        &self,
        fields: &FieldSet,
        ctx: ContainerContext<'_>,
        state: &mut TraversalState,
    ) -> Vec<FieldDescriptor> {
        fields
            .iter()
            .map(|element| match element {
                LayoutElement::Title => title_descriptor(&ctx),
                LayoutElement::Custom(field) => self.describe(field, state),
            })
            .collect()
    }

    fn describe(&self, field: &FieldDefinition, state: &mut TraversalState) -> FieldDescriptor {
        let descriptor = describe_or_default(field, self.classifier);
        if !descriptor.is_composite() {
            return descriptor;
        }

        let resolution = self
            .resolver
            .resolve_variants(field, &descriptor.semantic_type);
        let mut notes = descriptor.notes.clone();
        notes.extend(resolution.notes);

        let mut refs = Vec::with_capacity(resolution.variants.len());
        for variant in resolution.variants {
            refs.push(variant.type_id.clone());

            if state.visited.contains(&variant.type_id) {
                tracing::debug!(field = %descriptor.name, type_id = %variant.type_id, "cycle, not expanding");
                continue;
            }
            if state.registry.contains(&variant.type_id) {
                tracing::debug!(field = %descriptor.name, type_id = %variant.type_id, "already registered");
                continue;
            }
            if state.depth >= self.max_depth {
                tracing::warn!(
                    field = %descriptor.name,
                    type_id = %variant.type_id,
                    max_depth = self.max_depth,
                    "depth ceiling reached, not expanding"
                );
                notes.push(format!(
                    "expansion of '{}' truncated at depth {}",
                    variant.type_id, self.max_depth
                ));
                continue;
            }
            self.expand(variant, state);
        }

        FieldDescriptor {
            composite_type_refs: Some(refs),
            notes,
            ..descriptor
        }
    }

    fn expand(&self, variant: Variant, state: &mut TraversalState) {
        let type_id = variant.type_id.clone();
        if !state.registry.reserve(variant.placeholder()) {
            return;
        }

        let (field_set, notes) = match self.resolver.variant_fields(&variant) {
            Ok(set) => (set, Vec::new()),
            Err(e) => {
                tracing::warn!(type_id = %type_id, error = %e, "variant field set unavailable");
                (FieldSet::default(), vec![format!("could not load fields: {e}")])
            }
        };

        state.visited.insert(type_id.clone());
        state.depth += 1;
        let ctx = ContainerContext {
            title: variant.title(),
        };
        let fields = self.flatten_into(&field_set, ctx, state);
        state.depth -= 1;
        state.visited.remove(&type_id);

        state.registry.complete(&type_id, fields, notes);
    }
}
