//! Placeholder substitution for task description templates.
//!
//! Pod task descriptions may contain `{name}` placeholders that are filled in
//! from the bound inputs at assembly time. Substitution is strict: a
//! placeholder with no bound value is an error rather than literal `{name}`
//! text leaking into a task, so misconfigured pods surface early.
//!
//! `{{` and `}}` render as literal braces.

use std::collections::BTreeMap;
use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder was referenced but no value is bound for it.
    #[error("undefined placeholder '{{{name}}}' at offset {offset}")]
    UndefinedPlaceholder { name: String, offset: usize },

    /// A `{` was opened without a matching `}`.
    #[error("unclosed '{{' at offset {offset}")]
    UnclosedBrace { offset: usize },

    /// An empty placeholder (`{}`) was found.
    #[error("empty placeholder '{{}}' at offset {offset}")]
    EmptyPlaceholder { offset: usize },
}

/// Render a template by substituting `{name}` placeholders from `values`.
///
/// Placeholder names are trimmed of surrounding whitespace, so `{ topic }`
/// and `{topic}` are equivalent.
pub fn render(template: &str, values: &BTreeMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if bytes.get(i + 1) == Some(&b'{') {
                    out.push('{');
                    i += 2;
                    continue;
                }
                let close = template[i + 1..]
                    .find('}')
                    .map(|off| i + 1 + off)
                    .ok_or(TemplateError::UnclosedBrace { offset: i })?;
                let name = template[i + 1..close].trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder { offset: i });
                }
                let value = values.get(name).ok_or_else(|| {
                    TemplateError::UndefinedPlaceholder {
                        name: name.to_string(),
                        offset: i,
                    }
                })?;
                out.push_str(value);
                i = close + 1;
            }
            b'}' => {
                // }} collapses to a literal }; a lone } passes through as-is.
                out.push('}');
                i += if bytes.get(i + 1) == Some(&b'}') { 2 } else { 1 };
            }
            _ => {
                let ch = template[i..].chars().next().unwrap_or('\u{fffd}');
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    Ok(out)
}

/// List the placeholder names referenced by a template, in order of first
/// appearance. Used by `info` output to show what a task will consume.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' {
            if bytes.get(i + 1) == Some(&b'{') {
                i += 2;
                continue;
            }
            if let Some(off) = template[i + 1..].find('}') {
                let name = template[i + 1..i + 1 + off].trim();
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
                i += off + 2;
                continue;
            }
        }
        i += 1;
    }

    names
}
