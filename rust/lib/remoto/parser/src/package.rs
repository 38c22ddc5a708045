//! Package scope: every declaration of every file, indexed by name.

use std::collections::{BTreeMap, HashSet};

use crate::ast::{Decl, InterfaceDecl, SourceFile, StructDecl};
use crate::diagnostics::{Diagnostic, Pos};

/// All sources of the one package being parsed.
pub struct Package<'a> {
    pub files: &'a [SourceFile],
    decls: BTreeMap<&'a str, &'a Decl>,
}

impl<'a> Package<'a> {
    /// Index the declarations of `files`. A name declared twice is an error
    /// reported at the second declaration.
    pub fn new(files: &'a [SourceFile]) -> Result<Self, Diagnostic> {
        let mut decls: BTreeMap<&'a str, &'a Decl> = BTreeMap::new();
        for file in files {
            for decl in &file.decls {
                let name = decl.name();
                if decls.insert(name.name.as_str(), decl).is_some() {
                    return Err(Diagnostic::new(
                        &file.name,
                        name.pos,
                        format!("{} redeclared in this block", name.name),
                    ));
                }
            }
        }
        Ok(Self { files, decls })
    }

    /// The record declared as `name`.
    pub fn record(&self, name: &str) -> Option<&'a StructDecl> {
        match self.decls.get(name).copied() {
            Some(Decl::Struct(decl)) => Some(decl),
            _ => None,
        }
    }

    /// Service contracts, ordered by name.
    pub fn interfaces(&self) -> impl Iterator<Item = &'a InterfaceDecl> + '_ {
        self.decls.values().copied().filter_map(|decl| match decl {
            Decl::Interface(decl) => Some(decl),
            Decl::Struct(_) => None,
        })
    }

    /// Every declared name.
    pub fn declared_names(&self) -> HashSet<&'a str> {
        self.decls.keys().copied().collect()
    }

    /// Returns true if the file containing `pos` imports `namespace`.
    pub fn imports(&self, pos: Pos, namespace: &str) -> bool {
        self.files
            .get(pos.file)
            .is_some_and(|f| f.imports_namespace(namespace))
    }

    /// A diagnostic located in the right file.
    pub fn diag(&self, pos: Pos, message: impl Into<String>) -> Diagnostic {
        let file = self.files.get(pos.file).map_or("", |f| f.name.as_str());
        Diagnostic::new(file, pos, message)
    }
}
