//! The typed reflection model.
//!
//! Every descriptor is immutable once constructed; a decoded
//! [`AssemblySnapshot`] is handed to the consumer whole and replaces any
//! previous snapshot in its entirety. Sequence order is declaration order
//! and is significant.
//!
//! Serialization uses the wire key names (camelCase), so a snapshot printed
//! as JSON matches what the producer sent.

use serde::Serialize;

/// One parameter of a method, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    pub parameter_type: String,
}

/// One method of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    pub return_type: String,
    pub is_public: bool,
    pub is_static: bool,
    pub parameters: Vec<ParameterDescriptor>,
}

/// One field of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: String,
    pub is_public: bool,
    pub is_static: bool,
    pub is_read_only: bool,
}

/// One property of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: String,
    pub can_read: bool,
    pub can_write: bool,
}

/// One type in the snapshot.
///
/// The four kind flags are additive: the decoder stores whatever the
/// producer sent and does not enforce that at most one is set. Use
/// [`TypeDescriptor::kind`] for a single-valued view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub name: String,
    pub full_name: String,
    /// Empty string = global namespace.
    pub namespace: String,
    /// Empty string = no base type.
    pub base_type: String,
    pub is_class: bool,
    pub is_struct: bool,
    pub is_enum: bool,
    pub is_interface: bool,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
}

/// Single-valued view of the additive kind flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
    Interface,
    Unknown,
}

impl TypeDescriptor {
    /// Map the kind flags onto a single [`TypeKind`], preferring the first
    /// set flag in class/struct/enum/interface order. Does not alter the
    /// stored flags.
    pub fn kind(&self) -> TypeKind {
        if self.is_class {
            TypeKind::Class
        } else if self.is_struct {
            TypeKind::Struct
        } else if self.is_enum {
            TypeKind::Enum
        } else if self.is_interface {
            TypeKind::Interface
        } else {
            TypeKind::Unknown
        }
    }
}

impl TypeKind {
    /// Lowercase label for display.
    pub fn label(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Interface => "interface",
            TypeKind::Unknown => "unknown",
        }
    }
}

/// One fully decoded reflection snapshot for an assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblySnapshot {
    pub assembly_name: String,
    /// Opaque producer timestamp; never parsed as a date.
    pub timestamp: String,
    pub types: Vec<TypeDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_prefers_first_set_flag() {
        let mut ty = TypeDescriptor::default();
        assert_eq!(ty.kind(), TypeKind::Unknown);

        ty.is_interface = true;
        assert_eq!(ty.kind(), TypeKind::Interface);

        // Additive flags: class wins once set, interface flag stays.
        ty.is_class = true;
        assert_eq!(ty.kind(), TypeKind::Class);
        assert!(ty.is_interface);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(TypeKind::Class.label(), "class");
        assert_eq!(TypeKind::Unknown.label(), "unknown");
    }
}
