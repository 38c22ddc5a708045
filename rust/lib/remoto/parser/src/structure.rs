//! Structure builder: a record declaration → IR [`Structure`], registering
//! every record reachable through its fields on the way.

use std::collections::HashSet;

use remoto_ir::{Field, Service, Structure, is_exported};

use crate::ast::{FieldDecl, StructDecl};
use crate::classify::{Record, classify};
use crate::diagnostics::{Diagnostic, Pos};
use crate::package::Package;

/// A built structure with the source position of each field.
#[derive(Debug)]
pub struct Built {
    pub structure: Structure,
    /// Parallel to `structure.fields`.
    pub positions: Vec<Pos>,
}

pub struct StructureBuilder<'p, 'a> {
    pkg: &'p Package<'a>,
    service: &'p mut Service,
    /// Records currently being expanded; a field referring back to one of
    /// these is kept as a reference only.
    in_progress: Vec<String>,
}

impl<'p, 'a> StructureBuilder<'p, 'a> {
    pub fn new(pkg: &'p Package<'a>, service: &'p mut Service) -> Self {
        Self {
            pkg,
            service,
            in_progress: Vec::new(),
        }
    }

    pub fn build(&mut self, record: Record<'a>) -> Result<Built, Diagnostic> {
        match record {
            Record::Local(decl) => self.build_local(decl),
            Record::Foreign(..) => Ok(Built {
                structure: Structure::new(record.name()),
                positions: Vec::new(),
            }),
        }
    }

    fn build_local(&mut self, decl: &'a StructDecl) -> Result<Built, Diagnostic> {
        self.in_progress.push(decl.name.name.clone());
        let result = self.fields(decl);
        self.in_progress.pop();

        let (fields, positions) = result?;
        let mut structure = Structure::new(decl.name.name.clone());
        structure.comment = decl.doc.clone();
        structure.fields = fields;
        Ok(Built {
            structure,
            positions,
        })
    }

    fn fields(&mut self, decl: &'a StructDecl) -> Result<(Vec<Field>, Vec<Pos>), Diagnostic> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(decl.fields.len());
        let mut positions = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            if !is_exported(&field.name.name) {
                return Err(self.pkg.diag(
                    field.name.pos,
                    format!("field {}: must be exported", field.name.name),
                ));
            }
            if !seen.insert(field.name.name.as_str()) {
                return Err(self.pkg.diag(
                    field.name.pos,
                    format!("duplicate field {}", field.name.name),
                ));
            }
            fields.push(self.field(field)?);
            positions.push(field.name.pos);
        }
        Ok((fields, positions))
    }

    fn field(&mut self, decl: &'a FieldDecl) -> Result<Field, Diagnostic> {
        let ty = classify(self.pkg, &decl.ty).map_err(|e| self.pkg.diag(decl.name.pos, e.to_string()))?;

        if ty.is_struct && !ty.is_imported {
            let expand = !self.in_progress.contains(&ty.name) && !self.service.has_structure(&ty.name);
            if expand {
                let nested = self.pkg.record(&ty.name).ok_or_else(|| {
                    self.pkg
                        .diag(decl.name.pos, format!("type {} not supported", ty.name))
                })?;
                let built = self.build_local(nested)?;
                tracing::trace!(structure = %built.structure.name, "registered nested structure");
                self.service.ensure_structure(built.structure);
            }
        }

        let mut field = Field::new(decl.name.name.clone(), ty);
        field.comment = decl.doc.clone();
        Ok(field)
    }
}
