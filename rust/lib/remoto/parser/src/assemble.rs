//! Definition assembler: sources → package → [`Definition`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use remoto_ir::Definition;
use tracing::debug;

use crate::EXTENSION;
use crate::comments;
use crate::diagnostics::{Diagnostic, ParseError};
use crate::grammar::parse_file;
use crate::package::Package;
use crate::service::extract_service;

/// Parse every `.remoto` file in `dir` (not recursive), in file name order.
///
/// Diagnostics name the file without its directory.
pub fn parse(dir: impl AsRef<Path>) -> Result<Definition, ParseError> {
    let dir = dir.as_ref();
    debug!(dir = %dir.display(), "parsing schema directory");

    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ParseError::Io { path, source }
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = fs::read_to_string(path).map_err(io_err(path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        sources.push((name, text));
    }
    parse_sources(&sources)
}

/// Parse in-memory sources given as `(file name, text)` pairs.
pub fn parse_sources<N, T>(sources: &[(N, T)]) -> Result<Definition, ParseError>
where
    N: AsRef<str>,
    T: AsRef<str>,
{
    let files = sources
        .iter()
        .enumerate()
        .map(|(idx, (name, text))| parse_file(idx, name.as_ref(), text.as_ref()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(Diagnostic::with_tip)?;
    debug!(files = files.len(), "parsed sources");

    let packages: BTreeSet<&str> = files.iter().map(|f| f.package.name.as_str()).collect();
    let package_name = match packages.len() {
        0 => return Err(ParseError::NoPackages),
        1 => packages.iter().next().map(|s| s.to_string()).unwrap_or_default(),
        _ => {
            return Err(ParseError::MultiplePackages(
                packages.iter().map(|s| s.to_string()).collect(),
            ));
        }
    };

    let pkg = Package::new(&files).map_err(Diagnostic::with_tip)?;

    let package_comment = files
        .iter()
        .map(|f| f.doc.as_str())
        .filter(|doc| !doc.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let mut services = Vec::new();
    for decl in pkg.interfaces() {
        let service = extract_service(&pkg, decl).map_err(Diagnostic::with_tip)?;
        debug!(
            service = %service.name,
            methods = service.methods.len(),
            structures = service.structures.len(),
            "extracted service"
        );
        services.push(service);
    }

    Ok(Definition {
        package_name,
        package_comment,
        services,
        comments: comments::harvest(&files, &pkg.declared_names()),
    })
}
