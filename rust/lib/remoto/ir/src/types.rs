//! Field types and the scalar allow-list.

use serde::{Deserialize, Serialize};

/// Scalar string.
pub const STRING: &str = "string";
/// Platform-sized signed integer.
pub const INT: &str = "int";
/// 64-bit floating point.
pub const FLOAT: &str = "float64";
/// Boolean.
pub const BOOL: &str = "bool";
/// Raw byte stream.
pub const READER: &str = "io.Reader";
/// Binary file payload (name, content type, bytes).
pub const FILE: &str = "remototypes.File";

/// Every base name a non-struct field may use.
pub const SCALARS: [&str; 6] = [STRING, INT, FLOAT, BOOL, READER, FILE];

/// Returns true if `name` is one of the supported scalar base names.
pub fn is_scalar(name: &str) -> bool {
    SCALARS.contains(&name)
}

/// The type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Type {
    /// Base name without any collection marker or pointer sigil,
    /// e.g. `string`, `Address`, `remototypes.File`.
    pub name: String,

    /// Repeated (`[]T`).
    #[serde(default)]
    pub is_multiple: bool,

    /// Nested record.
    #[serde(default)]
    pub is_struct: bool,

    /// Declared in another namespace; never expanded or checked.
    #[serde(default)]
    pub is_imported: bool,
}

/// Closed classification of a [`Type`]'s base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    String,
    Int,
    Float,
    Bool,
    Reader,
    File,
    /// A record declared in the schema itself.
    Struct,
    /// An opaque record from another namespace.
    Imported,
}

impl Type {
    /// A single-valued scalar type.
    pub fn scalar(name: impl Into<String>) -> Self {
        let name = name.into();
        let is_imported = name.contains('.');
        Self {
            name,
            is_multiple: false,
            is_struct: false,
            is_imported,
        }
    }

    /// A single-valued record declared in the schema.
    pub fn structure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_multiple: false,
            is_struct: true,
            is_imported: false,
        }
    }

    /// The same type, repeated.
    pub fn repeated(mut self) -> Self {
        self.is_multiple = true;
        self
    }

    /// Classify the base name.
    ///
    /// Returns `None` for a non-struct base outside the allow-list, which a
    /// successfully parsed definition never contains.
    pub fn kind(&self) -> Option<TypeKind> {
        if self.is_struct {
            return Some(if self.is_imported {
                TypeKind::Imported
            } else {
                TypeKind::Struct
            });
        }
        let kind = match self.name.as_str() {
            STRING => TypeKind::String,
            INT => TypeKind::Int,
            FLOAT => TypeKind::Float,
            BOOL => TypeKind::Bool,
            READER => TypeKind::Reader,
            FILE => TypeKind::File,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true if this is the file payload type.
    pub fn is_file(&self) -> bool {
        !self.is_struct && self.name == FILE
    }

    /// Schema spelling, e.g. `[]string`.
    pub fn code(&self) -> String {
        if self.is_multiple {
            format!("[]{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_of_scalars() {
        assert_eq!(Type::scalar("string").kind(), Some(TypeKind::String));
        assert_eq!(Type::scalar("float64").kind(), Some(TypeKind::Float));
        assert_eq!(Type::scalar("remototypes.File").kind(), Some(TypeKind::File));
        assert_eq!(Type::scalar("int32").kind(), None);
    }

    #[test]
    fn scalar_from_other_namespace_is_imported() {
        assert!(Type::scalar(READER).is_imported);
        assert!(!Type::scalar(INT).is_imported);
    }

    #[test]
    fn kind_of_records() {
        assert_eq!(Type::structure("Address").kind(), Some(TypeKind::Struct));
        let foreign = Type {
            name: "geo.Point".into(),
            is_struct: true,
            is_imported: true,
            ..Default::default()
        };
        assert_eq!(foreign.kind(), Some(TypeKind::Imported));
        assert!(!foreign.is_file());
    }

    #[test]
    fn code_marks_repeated() {
        assert_eq!(Type::scalar("string").repeated().code(), "[]string");
        assert_eq!(Type::structure("Model").code(), "Model");
    }
}
