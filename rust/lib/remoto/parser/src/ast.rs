//! Syntax tree of one schema source, before any semantic checks.

use std::fmt;

use crate::comments::CommentGroup;
use crate::diagnostics::Pos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

/// One parsed `.remoto` file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub package: Ident,
    /// Doc comment of the package clause.
    pub doc: String,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
    /// Every comment group in the file, in source order.
    pub comments: Vec<CommentGroup>,
}

impl SourceFile {
    /// Returns true if the file imports a package called `namespace`.
    pub fn imports_namespace(&self, namespace: &str) -> bool {
        self.imports.iter().any(|i| i.namespace == namespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    /// Last `/` segment of the path; the qualifier used in type names.
    pub namespace: String,
    pub pos: Pos,
}

/// A top-level declaration. The set of kinds is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// `type X interface { … }` — a service contract.
    Interface(InterfaceDecl),
    /// `type X struct { … }` — a record.
    Struct(StructDecl),
}

impl Decl {
    pub fn name(&self) -> &Ident {
        match self {
            Decl::Interface(d) => &d.name,
            Decl::Struct(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub doc: String,
    pub methods: Vec<MethodSig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub name: Ident,
    pub doc: String,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

impl MethodSig {
    pub fn is_variadic(&self) -> bool {
        self.params.iter().any(|p| p.variadic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<Ident>,
    pub ty: TypeExpr,
    pub variadic: bool,
}

impl Param {
    /// Where diagnostics about the parameter point: its name if it has one,
    /// its type otherwise.
    pub fn pos(&self) -> Pos {
        self.name.as_ref().map_or(self.ty.pos(), |n| n.pos)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Ident,
    pub doc: String,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Ident,
    pub doc: String,
    pub ty: TypeExpr,
}

/// A type as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `Name` or `ns.Name`.
    Named {
        namespace: Option<String>,
        name: String,
        pos: Pos,
    },
    /// `*T`
    Pointer(Box<TypeExpr>, Pos),
    /// `[]T`
    Slice(Box<TypeExpr>, Pos),
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
        pos: Pos,
    },
}

impl TypeExpr {
    pub fn pos(&self) -> Pos {
        match self {
            TypeExpr::Named { pos, .. } => *pos,
            TypeExpr::Pointer(_, pos) | TypeExpr::Slice(_, pos) => *pos,
            TypeExpr::Map { pos, .. } => *pos,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                namespace: Some(ns),
                name,
                ..
            } => write!(f, "{}.{}", ns, name),
            TypeExpr::Named { name, .. } => write!(f, "{}", name),
            TypeExpr::Pointer(inner, _) => write!(f, "*{}", inner),
            TypeExpr::Slice(inner, _) => write!(f, "[]{}", inner),
            TypeExpr::Map { key, value, .. } => write!(f, "map[{}]{}", key, value),
        }
    }
}
