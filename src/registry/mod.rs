//! Field type registry and factory
//!
//! The registry is the catalog of kinds a form can contain. It is built once
//! per process (usually from [`builtin_descriptors`]) and never mutated
//! afterwards; sessions share it behind an `Arc`.

mod descriptor;
mod factory;

use indexmap::IndexMap;

pub use descriptor::{builtin_descriptors, FieldDefaults, FieldTypeDescriptor};
pub use factory::FieldFactory;

use crate::error::LayoutFault;
use crate::state::{Field, FieldKind};

/// Catalog of field kinds, in palette order
#[derive(Debug, Clone, Default)]
pub struct FieldTypeRegistry {
    descriptors: IndexMap<String, FieldTypeDescriptor>,
}

impl FieldTypeRegistry {
    /// Registry seeded with the built-in kinds
    pub fn builtin() -> Self {
        Self::from_descriptors(builtin_descriptors())
    }

    /// Later descriptors replace earlier ones of the same kind
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = FieldTypeDescriptor>) -> Self {
        let descriptors = descriptors
            .into_iter()
            .map(|d| (d.kind.as_str().to_string(), d))
            .collect();
        Self { descriptors }
    }

    pub fn describe(&self, kind: &str) -> Option<&FieldTypeDescriptor> {
        self.descriptors.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.descriptors.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &FieldKind> + '_ {
        self.descriptors.values().map(|d| &d.kind)
    }

    /// Check that `field` has a registered kind and that kind's payload shape
    pub fn check_field(&self, field: &Field) -> Result<(), LayoutFault> {
        let descriptor = self.describe(field.kind.as_str()).ok_or_else(|| {
            LayoutFault::UnregisteredKind {
                field: field.id.clone(),
                kind: field.kind.clone(),
            }
        })?;
        if !descriptor.defaults.attributes.same_shape(&field.attributes) {
            return Err(LayoutFault::KindShape {
                field: field.id.clone(),
                kind: field.kind.clone(),
                shape: field.attributes.shape(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
