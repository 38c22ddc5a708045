//! Code-generation template discovery.
//!
//! A catalog walks its template tree once. Every caller, including callers
//! that arrive while the first walk is still running, sees that walk's
//! result or its error.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

/// Extension stripped from template names.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("read {path}: {message}")]
    Io { path: String, message: String },
}

impl TemplateError {
    fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct TemplateCatalog {
    root: PathBuf,
    names: OnceLock<Result<Vec<String>, TemplateError>>,
}

impl TemplateCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            names: OnceLock::new(),
        }
    }

    /// The process-wide catalog. The root passed by the first caller wins.
    pub fn global(root: impl Into<PathBuf>) -> &'static TemplateCatalog {
        static GLOBAL: OnceLock<TemplateCatalog> = OnceLock::new();
        GLOBAL.get_or_init(|| TemplateCatalog::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Template names, relative to the root with `/` separators, sorted.
    /// Files directly under the root are not templates.
    pub fn list(&self) -> Result<&[String], TemplateError> {
        self.names
            .get_or_init(|| discover(&self.root))
            .as_deref()
            .map_err(Clone::clone)
    }
}

fn discover(root: &Path) -> Result<Vec<String>, TemplateError> {
    debug!(root = %root.display(), "discovering templates");
    let mut names = Vec::new();
    walk(root, &mut Vec::new(), &mut names)?;
    names.sort();
    debug!(count = names.len(), "templates discovered");
    Ok(names)
}

fn walk(dir: &Path, prefix: &mut Vec<String>, names: &mut Vec<String>) -> Result<(), TemplateError> {
    let entries = std::fs::read_dir(dir).map_err(|e| TemplateError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| TemplateError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| TemplateError::io(&path, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_dir() {
            prefix.push(file_name);
            walk(&path, prefix, names)?;
            prefix.pop();
            continue;
        }
        if prefix.is_empty() || !file_type.is_file() {
            continue;
        }

        let stem = match Path::new(&file_name).extension() {
            Some(ext) if ext == TEMPLATE_EXTENSION => {
                file_name[..file_name.len() - TEMPLATE_EXTENSION.len() - 1].to_string()
            }
            _ => file_name,
        };
        let mut parts = prefix.clone();
        parts.push(stem);
        names.push(parts.join("/"));
    }
    Ok(())
}
