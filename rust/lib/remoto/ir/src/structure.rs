//! Structures (records) and their fields.

use serde::{Deserialize, Serialize};

use crate::types::Type;

/// Name of the field every response object carries.
pub const ERROR_FIELD: &str = "Error";

/// Doc comment attached to a synthesized [`ERROR_FIELD`].
pub const ERROR_FIELD_COMMENT: &str = "Error is an error message if one occurred.";

/// A named record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    /// Fields in declaration order.
    pub fields: Vec<Field>,

    /// Declared in another namespace. Its fields are unknown.
    #[serde(default)]
    pub is_imported: bool,

    /// Used as a method's request object.
    #[serde(default)]
    pub is_request_object: bool,

    /// Used as a method's response object.
    #[serde(default)]
    pub is_response_object: bool,
}

impl Structure {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let is_imported = name.contains('.');
        Self {
            name,
            is_imported,
            ..Default::default()
        }
    }

    /// Returns true if the structure has any fields.
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Returns true if the structure has a field called `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Find a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All fields whose base type name is `type_name`.
    pub fn fields_of_type(&self, type_name: &str) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.ty.name == type_name).collect()
    }

    /// Fields other than the built-in `Error` field.
    pub fn business_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.name != ERROR_FIELD)
    }

    /// The file field of a file response: the only business field, of file kind.
    pub fn file_field(&self) -> Option<&Field> {
        let mut business = self.business_fields();
        match (business.next(), business.next()) {
            (Some(only), None) if only.ty.is_file() && !only.ty.is_multiple => Some(only),
            _ => None,
        }
    }

    /// Append the built-in `Error string` field unless one is already declared.
    pub fn ensure_error_field(&mut self) {
        if self.has_field(ERROR_FIELD) {
            return;
        }
        self.fields.push(Field {
            name: ERROR_FIELD.to_string(),
            comment: ERROR_FIELD_COMMENT.to_string(),
            ty: Type::scalar(crate::types::STRING),
        });
    }
}

/// A structure field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    #[serde(rename = "type")]
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            ty,
        }
    }

    /// Returns true if the name starts with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Returns true if `name` starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FILE, INT, STRING};

    #[test]
    fn error_field_is_appended_once() {
        let mut s = Structure::new("GreetResponse");
        s.fields.push(Field::new("Greeting", Type::scalar(STRING)));
        s.ensure_error_field();
        s.ensure_error_field();
        assert_eq!(s.fields.len(), 2);
        let error = s.field(ERROR_FIELD).unwrap();
        assert_eq!(error.ty, Type::scalar(STRING));
        assert_eq!(error.comment, ERROR_FIELD_COMMENT);
    }

    #[test]
    fn declared_error_field_is_untouched() {
        let mut s = Structure::new("CheckResponse");
        s.fields.push(Field::new("Error", Type::scalar(STRING)));
        s.fields.push(Field::new("Count", Type::scalar(INT)));
        s.ensure_error_field();
        assert_eq!(s.fields.len(), 2);
        assert_eq!(s.fields[0].name, "Error");
        assert!(s.fields[0].comment.is_empty());
    }

    #[test]
    fn file_field_only_when_sole_business_field() {
        let mut s = Structure::new("GetStateResponse");
        s.fields.push(Field::new("State", Type::scalar(FILE)));
        s.ensure_error_field();
        assert_eq!(s.file_field().map(|f| f.name.as_str()), Some("State"));

        s.fields.push(Field::new("Size", Type::scalar(INT)));
        assert!(s.file_field().is_none());
    }

    #[test]
    fn fields_of_type_and_exported() {
        let mut s = Structure::new("Model");
        s.fields.push(Field::new("ID", Type::scalar(STRING)));
        s.fields.push(Field::new("Name", Type::scalar(STRING)));
        s.fields.push(Field::new("Ngrams", Type::scalar(INT)));
        assert_eq!(s.fields_of_type(STRING).len(), 2);
        assert!(s.fields.iter().all(Field::is_exported));
        assert!(!is_exported("name"));
        assert!(!is_exported(""));
    }

    #[test]
    fn imported_structure_from_name() {
        assert!(Structure::new("geo.PointRequest").is_imported);
        assert!(!Structure::new("PointRequest").is_imported);
    }
}
