//! Definition, services and methods.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::structure::Structure;

/// One package of services. Built once by the parser, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    pub package_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package_comment: String,

    /// Services, ordered by name.
    pub services: Vec<Service>,

    /// Free-floating comments keyed by the name they start with.
    #[serde(default)]
    pub comments: BTreeMap<String, String>,
}

impl Definition {
    /// Find a service by name.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Find a structure by name in any service.
    pub fn structure(&self, name: &str) -> Option<&Structure> {
        self.services
            .iter()
            .flat_map(|s| s.structures.iter())
            .find(|s| s.name == name)
    }
}

/// A named group of methods and the structures they use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Service {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    /// Methods in declaration order.
    pub methods: Vec<Method>,

    /// Every structure the methods reference, each name at most once,
    /// in order of first registration.
    pub structures: Vec<Structure>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Find a method by name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Returns true if a structure called `name` is registered.
    pub fn has_structure(&self, name: &str) -> bool {
        self.structures.iter().any(|s| s.name == name)
    }

    /// Register `structure` unless one with the same name already is.
    /// The first registration wins.
    pub fn ensure_structure(&mut self, structure: Structure) {
        if self.has_structure(&structure.name) {
            return;
        }
        self.structures.push(structure);
    }
}

/// A single method: one request object in, one response object out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Method {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    pub request_structure: Structure,

    pub response_structure: Structure,
}

impl Method {
    /// A file endpoint streams its response instead of returning JSON.
    pub fn is_file_endpoint(&self) -> bool {
        self.response_structure.file_field().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Field;
    use crate::types::{FILE, STRING, Type};

    fn structure(name: &str, fields: &[(&str, &str)]) -> Structure {
        let mut s = Structure::new(name);
        for (field, ty) in fields {
            s.fields.push(Field::new(*field, Type::scalar(*ty)));
        }
        s
    }

    #[test]
    fn ensure_structure_first_wins() {
        let mut service = Service::new("Greeter");
        service.ensure_structure(structure("Name", &[("First", STRING)]));
        service.ensure_structure(structure("Name", &[("Last", STRING)]));
        assert_eq!(service.structures.len(), 1);
        assert_eq!(service.structures[0].fields[0].name, "First");
    }

    #[test]
    fn lookups() {
        let mut service = Service::new("Greeter");
        service.ensure_structure(structure("GreetRequest", &[("Name", STRING)]));
        service.methods.push(Method {
            name: "Greet".into(),
            ..Default::default()
        });
        let def = Definition {
            package_name: "greeter".into(),
            services: vec![service],
            ..Default::default()
        };
        assert!(def.service("Greeter").is_some());
        assert!(def.service("Nope").is_none());
        assert!(def.structure("GreetRequest").is_some());
        assert!(def.services[0].method("Greet").is_some());
    }

    #[test]
    fn file_endpoint_detection() {
        let mut response = structure("GetStateResponse", &[("State", FILE)]);
        response.ensure_error_field();
        let method = Method {
            name: "GetState".into(),
            request_structure: structure("GetStateRequest", &[]),
            response_structure: response,
            ..Default::default()
        };
        assert!(method.is_file_endpoint());

        let mut plain = structure("GreetResponse", &[("Greeting", STRING)]);
        plain.ensure_error_field();
        let method = Method {
            response_structure: plain,
            ..method
        };
        assert!(!method.is_file_endpoint());
    }

    #[test]
    fn json_form() {
        let def = Definition {
            package_name: "greeter".into(),
            services: vec![Service::new("Greeter")],
            ..Default::default()
        };
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["package_name"], "greeter");
        assert_eq!(json["services"][0]["name"], "Greeter");
        assert!(json.get("package_comment").is_none());
        let back: Definition = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }
}
