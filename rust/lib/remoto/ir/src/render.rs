//! Textual rendering of the IR, in schema syntax.
//!
//! Used for snapshot tests and `remoto parse --format text`. Services are
//! rendered in order, each followed by its structures. Method and field
//! comments are not rendered.

use std::fmt;

use crate::definition::{Definition, Method, Service};
use crate::structure::{Field, Structure};

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "package {}", self.package_name)?;
        writeln!(f)?;
        for service in &self.services {
            write!(f, "{}", service)?;
        }
        Ok(())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_comment(f, &self.comment)?;
        writeln!(f, "type {} interface {{", self.name)?;
        for method in &self.methods {
            writeln!(f, "\t{}", method)?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;
        for structure in &self.structures {
            write!(f, "{}", structure)?;
        }
        Ok(())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(*{}) *{}",
            self.name, self.request_structure.name, self.response_structure.name
        )
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_comment(f, &self.comment)?;
        writeln!(f, "type {} struct {{", self.name)?;
        for field in &self.fields {
            writeln!(f, "\t{}", field)?;
        }
        writeln!(f, "}}")?;
        writeln!(f)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.ty.code())
    }
}

fn write_comment(f: &mut fmt::Formatter<'_>, comment: &str) -> fmt::Result {
    if comment.is_empty() {
        return Ok(());
    }
    for line in comment.lines() {
        writeln!(f, "// {}", line)?;
    }
    Ok(())
}
