//! Type classifier: a field's declared type → IR [`Type`].

use remoto_ir::{FILE, READER, Type, is_scalar};
use thiserror::Error;

use crate::ast::{StructDecl, TypeExpr};
use crate::package::Package;

/// Wall-clock time from another namespace; never accepted as a record.
const TIME: &str = "time.Time";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type {0} not supported")]
    Unsupported(String),

    #[error("undefined: {0}")]
    Undefined(String),
}

/// What a type name resolves to when it names a record.
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    /// Declared in this package.
    Local(&'a StructDecl),
    /// `ns.Name` from another namespace; opaque.
    Foreign(&'a str, &'a str),
}

impl Record<'_> {
    pub fn name(&self) -> String {
        match self {
            Record::Local(decl) => decl.name.name.clone(),
            Record::Foreign(ns, name) => format!("{}.{}", ns, name),
        }
    }

    fn into_type(self) -> Type {
        match self {
            Record::Local(_) => Type::structure(self.name()),
            Record::Foreign(..) => Type {
                name: self.name(),
                is_struct: true,
                is_imported: true,
                ..Default::default()
            },
        }
    }
}

/// Resolve `ty` to a record, if it names one. Pointers are not unwrapped.
pub fn resolve_record<'a>(
    pkg: &Package<'a>,
    ty: &'a TypeExpr,
) -> Result<Option<Record<'a>>, TypeError> {
    let TypeExpr::Named {
        namespace,
        name,
        pos,
    } = ty
    else {
        return Ok(None);
    };
    match namespace {
        None => Ok(pkg.record(name).map(Record::Local)),
        Some(ns) => {
            if !pkg.imports(*pos, ns) {
                return Err(TypeError::Undefined(ns.clone()));
            }
            let qualified = format!("{}.{}", ns, name);
            if matches!(qualified.as_str(), READER | FILE | TIME) {
                return Ok(None);
            }
            Ok(Some(Record::Foreign(ns, name)))
        }
    }
}

/// Classify a field type.
///
/// `[]T` marks the type repeated and classifies `T`. `*R` and `R` for a
/// record `R` are nested structures. Anything else must be an allow-listed
/// scalar.
pub fn classify<'a>(pkg: &Package<'a>, ty: &'a TypeExpr) -> Result<Type, TypeError> {
    match ty {
        TypeExpr::Slice(elem, _) => Ok(classify_single(pkg, elem)?.repeated()),
        _ => classify_single(pkg, ty),
    }
}

fn classify_single<'a>(pkg: &Package<'a>, ty: &'a TypeExpr) -> Result<Type, TypeError> {
    let target = match ty {
        TypeExpr::Pointer(inner, _) => &**inner,
        _ => ty,
    };
    if let Some(record) = resolve_record(pkg, target)? {
        return Ok(record.into_type());
    }
    let name = target.to_string();
    if is_scalar(&name) {
        return Ok(Type::scalar(name));
    }
    Err(TypeError::Unsupported(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, SourceFile};
    use crate::grammar::parse_file;
    use remoto_ir::TypeKind;

    const SRC: &str = r#"package p

import (
	"io"
	"time"
	"github.com/machinebox/remoto/remototypes"
	"example.com/geo"
)

type Svc interface {}

type Address struct {}

type Sample struct {
	A string
	B int
	C float64
	D bool
	E io.Reader
	F remototypes.File
	G []string
	H *Address
	I []*Address
	J geo.Point
	K int32
	L time.Time
	M map[string]int
	N [][]string
	O Svc
	P *string
	Q *int64
	R Unknown
	S other.Thing
}
"#;

    fn file() -> Vec<SourceFile> {
        vec![parse_file(0, "p.remoto", SRC).unwrap()]
    }

    fn classify_field(files: &[SourceFile], field: &str) -> Result<Type, TypeError> {
        let pkg = Package::new(files).unwrap();
        let sample = files[0]
            .decls
            .iter()
            .find_map(|d| match d {
                Decl::Struct(s) if s.name.name == "Sample" => Some(s),
                _ => None,
            })
            .unwrap();
        let decl = sample.fields.iter().find(|f| f.name.name == field).unwrap();
        classify(&pkg, &decl.ty)
    }

    #[test]
    fn supported_scalars() {
        let files = file();
        for (field, kind) in [
            ("A", TypeKind::String),
            ("B", TypeKind::Int),
            ("C", TypeKind::Float),
            ("D", TypeKind::Bool),
            ("E", TypeKind::Reader),
            ("F", TypeKind::File),
        ] {
            let ty = classify_field(&files, field).unwrap();
            assert_eq!(ty.kind(), Some(kind), "field {}", field);
            assert!(!ty.is_multiple);
        }
        assert!(classify_field(&files, "F").unwrap().is_imported);
    }

    #[test]
    fn repeated_and_records() {
        let files = file();
        let g = classify_field(&files, "G").unwrap();
        assert_eq!((g.name.as_str(), g.is_multiple), ("string", true));

        let h = classify_field(&files, "H").unwrap();
        assert_eq!(h, Type::structure("Address"));

        let i = classify_field(&files, "I").unwrap();
        assert_eq!(i, Type::structure("Address").repeated());

        let j = classify_field(&files, "J").unwrap();
        assert!(j.is_struct && j.is_imported);
        assert_eq!(j.name, "geo.Point");
    }

    #[test]
    fn pointer_to_scalar_is_stripped() {
        let files = file();
        assert_eq!(classify_field(&files, "P").unwrap(), Type::scalar("string"));
        assert_eq!(
            classify_field(&files, "Q").unwrap_err(),
            TypeError::Unsupported("int64".into())
        );
    }

    #[test]
    fn unsupported() {
        let files = file();
        for (field, name) in [
            ("K", "int32"),
            ("L", "time.Time"),
            ("M", "map[string]int"),
            ("N", "[]string"),
            ("O", "Svc"),
            ("R", "Unknown"),
        ] {
            assert_eq!(
                classify_field(&files, field).unwrap_err(),
                TypeError::Unsupported(name.into()),
                "field {}",
                field
            );
        }
        assert_eq!(
            classify_field(&files, "K").unwrap_err().to_string(),
            "type int32 not supported"
        );
    }

    #[test]
    fn unimported_namespace() {
        let files = file();
        assert_eq!(
            classify_field(&files, "S").unwrap_err(),
            TypeError::Undefined("other".into())
        );
    }
}
