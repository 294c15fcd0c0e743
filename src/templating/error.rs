//! Errors from rendering a view that was found.
//!
//! The resolver logs these and treats the view as missing, so they reach the
//! log and the CLI but never a rendered page.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

/// Number of variable groups listed in a "variable not found" report.
const MAX_VARIABLE_GROUPS: usize = 8;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template variable not found in '{}': '{variable}'", location.view)]
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    #[error("Template error in '{}': {message}", location.view)]
    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// The view file or its siblings could not be loaded
    #[error("Failed to load template {}: {message}", path.display())]
    LoadFailed {
        path: PathBuf,
        message: String,
    },
}

/// Where in a theme a render failed.
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// View identifier, e.g. `aurora::pages/about`
    pub view: String,
    pub file_path: Option<PathBuf>,
    /// 1-based line reported by Tera
    pub line_number: Option<usize>,
    /// Numbered source lines around the error
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl ErrorLocation {
    fn write_to(&self, out: &mut String) {
        let _ = writeln!(out, "View: {}", self.view);
        if let Some(path) = &self.file_path {
            let _ = writeln!(out, "File: {}", path.display());
        }
        if let Some(line) = self.line_number {
            let _ = writeln!(out, "Line: {line}");
        }
        if let Some(lines) = &self.context_lines {
            out.push('\n');
            for (number, text) in lines {
                let marker = if Some(*number) == self.line_number { '>' } else { ' ' };
                let _ = writeln!(out, "{marker} {number:>4} | {text}");
            }
        }
        out.push('\n');
    }
}

impl TemplateError {
    /// Multi-line report for logs: the location, source excerpt and hints.
    #[must_use]
    pub fn format_with_context(&self) -> String {
        let mut out = String::new();
        match self {
            Self::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => {
                let _ = writeln!(out, "ERROR: Template Variable Not Found\n");
                let _ = writeln!(out, "Variable: {variable}");
                location.write_to(&mut out);

                if !suggestions.is_empty() {
                    out.push_str("Did you mean one of these?\n");
                    for suggestion in suggestions.iter() {
                        let _ = writeln!(out, "  - {suggestion}");
                    }
                    out.push('\n');
                }
                write_available(&mut out, available_variables);
            }
            Self::SyntaxError {
                message,
                location,
            } => {
                let _ = writeln!(out, "ERROR: Template Syntax Error\n");
                let _ = writeln!(out, "Error: {message}");
                location.write_to(&mut out);
                out.push_str("Check for unclosed {{ }} or {% %} delimiters, unknown filters, and\n");
                out.push_str("extended or included views that the theme does not ship.\n");
            }
            Self::LoadFailed {
                ..
            } => {
                let _ = writeln!(out, "ERROR: {self}");
            }
        }
        out
    }
}

/// Context variables grouped by their first path segment.
fn write_available(out: &mut String, variables: &[String]) {
    if variables.is_empty() {
        return;
    }

    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for variable in variables {
        let root = variable.split('.').next().unwrap_or(variable);
        groups.entry(root).or_default().push(variable);
    }

    out.push_str("Available variables in this context:\n");
    for (root, members) in groups.iter().take(MAX_VARIABLE_GROUPS) {
        if members.len() > 3 {
            let _ = writeln!(out, "  {root}.*  ({} variables)", members.len());
        } else {
            for member in members {
                let _ = writeln!(out, "  {member}");
            }
        }
    }
    if groups.len() > MAX_VARIABLE_GROUPS {
        let _ = writeln!(out, "  ... and {} more", groups.len() - MAX_VARIABLE_GROUPS);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_not_found_formatting() {
        let error = TemplateError::VariableNotFound {
            variable: "titel".to_string(),
            available_variables: Box::new(vec![
                "title".to_string(),
                "site.name".to_string(),
                "site.url".to_string(),
            ]),
            suggestions: Box::new(vec!["title".to_string()]),
            location: Box::new(ErrorLocation {
                view: "aurora::post".to_string(),
                line_number: Some(2),
                context_lines: Some(vec![(1, "<h1>".to_string()), (2, "{{ titel }}".to_string())]),
                ..Default::default()
            }),
        };

        assert_eq!(error.to_string(), "Template variable not found in 'aurora::post': 'titel'");
        let formatted = error.format_with_context();
        assert!(formatted.contains("Did you mean one of these?\n  - title"));
        assert!(formatted.contains(">    2 | {{ titel }}"));
        assert!(formatted.contains("  site.name"));
    }
}
