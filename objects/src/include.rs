//! `#include` resolution for shader sources.
//!
//! Includes name *named strings* registered on the [`Context`]. Names starting
//! with `/` are absolute. Other names are tried relative to the directory of
//! the including named string first, then against each include path in order.
//!
//! Every named string is pasted at most once per processed source, and
//! `#extension GL_ARB_shading_language_include` lines are dropped, so the
//! output can go straight to a driver without include support.

use std::collections::HashSet;
use std::rc::Rc;

use glimmer_core::StringSource;

use crate::context::Context;
use crate::error::IncludeError;

/// Result of include processing.
pub struct ProcessedSource {
    /// Source text with every include pasted in.
    pub text: String,
    /// Named strings that were pasted, in first-use order.
    pub included: Vec<Rc<dyn StringSource>>,
}

/// Resolves includes against a context's named strings.
pub struct IncludeProcessor<'a> {
    context: &'a Context,
    include_paths: &'a [String],
    seen: HashSet<String>,
    included: Vec<Rc<dyn StringSource>>,
}

impl<'a> IncludeProcessor<'a> {
    /// Create a processor using the given include paths.
    pub fn new(context: &'a Context, include_paths: &'a [String]) -> Self {
        Self {
            context,
            include_paths,
            seen: HashSet::new(),
            included: Vec::new(),
        }
    }

    /// Resolve every include in `source`.
    pub fn process(mut self, source: &str) -> Result<ProcessedSource, IncludeError> {
        let text = self.resolve_includes(source, None)?;
        Ok(ProcessedSource {
            text,
            included: self.included,
        })
    }

    fn resolve_includes(
        &mut self,
        source: &str,
        current_dir: Option<&str>,
    ) -> Result<String, IncludeError> {
        let mut result = String::with_capacity(source.len());

        for line in source.lines() {
            let trimmed = line.trim();
            if is_include_extension(trimmed) {
                continue;
            }
            let Some(name) = parse_include_directive(trimmed) else {
                result.push_str(line);
                result.push('\n');
                continue;
            };

            let (path, named) = self.lookup(name, current_dir)?;
            if !self.seen.insert(path.clone()) {
                continue;
            }
            let text = named.string();
            self.included.push(named);

            let dir = parent_dir(&path);
            let resolved = self.resolve_includes(&text, Some(dir))?;
            result.push_str(&resolved);
        }

        Ok(result)
    }

    fn lookup(
        &self,
        name: &str,
        current_dir: Option<&str>,
    ) -> Result<(String, Rc<dyn StringSource>), IncludeError> {
        let candidates: Vec<String> = if name.starts_with('/') {
            vec![normalize(name)]
        } else {
            current_dir
                .into_iter()
                .chain(self.include_paths.iter().map(String::as_str))
                .map(|dir| normalize(&format!("{}/{}", dir.trim_end_matches('/'), name)))
                .collect()
        };

        candidates
            .into_iter()
            .find_map(|path| self.context.named_string(&path).map(|named| (path, named)))
            .ok_or_else(|| IncludeError::NotFound(name.to_string()))
    }
}

/// Resolve every include in `source` with the context's named strings.
pub fn process(
    context: &Context,
    source: &str,
    include_paths: &[String],
) -> Result<ProcessedSource, IncludeError> {
    IncludeProcessor::new(context, include_paths).process(source)
}

/// Parse a `#include "path"` or `#include <path>` directive.
fn parse_include_directive(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("include")?.trim();
    if let Some(inner) = rest.strip_prefix('"') {
        inner.strip_suffix('"')
    } else if let Some(inner) = rest.strip_prefix('<') {
        inner.strip_suffix('>')
    } else {
        None
    }
}

fn is_include_extension(line: &str) -> bool {
    line.strip_prefix('#')
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix("extension"))
        .is_some_and(|rest| rest.trim_start().starts_with("GL_ARB_shading_language_include"))
}

/// Collapse `.` and `..` segments of an absolute path.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(index) => &path[..index],
    }
}
