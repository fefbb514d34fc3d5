//! Path-template compilation and matching.
//!
//! A template is a `/`-separated list of segments, each one of:
//!
//! - a **literal** — must match the concrete segment exactly, case-sensitive
//! - a **named parameter** `{name}` — captures exactly one segment
//! - a **rest capture** `{name+}` — captures every remaining segment,
//!   slash-joined; must be the final segment and may capture nothing
//!
//! Matching never decodes: captured values equal the path segments verbatim.
//! Empty segments are discarded on both sides, so `/a`, `/a/` and `//a`
//! segment identically.
//!
//! Overlap between patterns is resolved by the route table, not here —
//! the table scans in registration order and the first match wins.

use thiserror::Error;

use crate::params::Params;

/// Rejected path template.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PatternError {
    #[error("rest capture `{{{name}+}}` must be the final segment of `{template}`")]
    RestNotLast { template: String, name: String },
    #[error("duplicate parameter `{name}` in `{template}`")]
    DuplicateName { template: String, name: String },
    #[error("empty parameter name in `{template}`")]
    EmptyName { template: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest(String),
}

/// A compiled path template.
#[derive(Clone, Debug)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compiles a template, rejecting rest captures in non-final position
    /// and duplicate parameter names.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let raw: Vec<&str> = segments_of(template).collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut names: Vec<&str> = Vec::new();

        for (idx, part) in raw.iter().enumerate() {
            let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(inner) => {
                    let (name, rest) = match inner.strip_suffix('+') {
                        Some(name) => (name, true),
                        None => (inner, false),
                    };
                    if name.is_empty() {
                        return Err(PatternError::EmptyName { template: template.to_owned() });
                    }
                    if names.contains(&name) {
                        return Err(PatternError::DuplicateName {
                            template: template.to_owned(),
                            name: name.to_owned(),
                        });
                    }
                    if rest && idx + 1 != raw.len() {
                        return Err(PatternError::RestNotLast {
                            template: template.to_owned(),
                            name: name.to_owned(),
                        });
                    }
                    names.push(name);
                    if rest {
                        Segment::Rest(name.to_owned())
                    } else {
                        Segment::Param(name.to_owned())
                    }
                }
                None => Segment::Literal((*part).to_owned()),
            };
            segments.push(segment);
        }

        Ok(Self { template: template.to_owned(), segments })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Matches a concrete path, returning the captured parameters.
    ///
    /// `None` when the segment counts differ (absent a rest capture) or any
    /// literal fails exact comparison.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = segments_of(path).collect();
        let mut params = Params::new();

        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Rest(name) => {
                    params.insert(name, parts[idx..].join("/"));
                    return Some(params);
                }
                _ if idx >= parts.len() => return None,
                Segment::Literal(lit) => {
                    if parts[idx] != lit {
                        return None;
                    }
                }
                Segment::Param(name) => params.insert(name, parts[idx].to_owned()),
            }
        }

        if parts.len() == self.segments.len() {
            Some(params)
        } else {
            None
        }
    }
}

fn segments_of(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(template: &str) -> PathPattern {
        PathPattern::compile(template).unwrap()
    }

    #[test]
    fn literals_match_exactly() {
        let p = compile("/persons/new");
        assert!(p.match_path("/persons/new").is_some());
        assert!(p.match_path("/persons/New").is_none());
        assert!(p.match_path("/persons").is_none());
        assert!(p.match_path("/persons/new/extra").is_none());
    }

    #[test]
    fn params_capture_segments_verbatim() {
        let p = compile("/persons/{id}");
        let params = p.match_path("/persons/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        let params = p.match_path("/persons/%20odd").unwrap();
        assert_eq!(params.get("id"), Some("%20odd"));
    }

    #[test]
    fn segment_count_must_agree_without_rest() {
        let p = compile("/a/{x}/c");
        assert!(p.match_path("/a/b/c").is_some());
        assert!(p.match_path("/a/b").is_none());
        assert!(p.match_path("/a/b/c/d").is_none());
    }

    #[test]
    fn rest_capture_joins_remaining_segments() {
        let p = compile("/webjars/{path+}");
        let params = p.match_path("/webjars/a/b/c").unwrap();
        assert_eq!(params.get("path"), Some("a/b/c"));
    }

    #[test]
    fn rest_capture_may_be_empty() {
        let p = compile("/webjars/{path+}");
        let params = p.match_path("/webjars").unwrap();
        assert_eq!(params.get("path"), Some(""));
    }

    #[test]
    fn root_rest_matches_everything() {
        let p = compile("/{path+}");
        assert!(p.match_path("/").is_some());
        assert!(p.match_path("/index.html").is_some());
        assert!(p.match_path("/a/b/c").is_some());
    }

    #[test]
    fn empty_segments_are_discarded() {
        let p = compile("/a/b");
        assert!(p.match_path("/a/b/").is_some());
        assert!(p.match_path("//a//b").is_some());
    }

    #[test]
    fn rest_must_terminate_the_pattern() {
        let err = PathPattern::compile("/a/{rest+}/b").unwrap_err();
        assert!(matches!(err, PatternError::RestNotLast { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = PathPattern::compile("/{id}/x/{id}").unwrap_err();
        assert!(matches!(err, PatternError::DuplicateName { .. }));
        let err = PathPattern::compile("/{id}/{id+}").unwrap_err();
        assert!(matches!(err, PatternError::DuplicateName { .. }));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = PathPattern::compile("/{}").unwrap_err();
        assert!(matches!(err, PatternError::EmptyName { .. }));
        let err = PathPattern::compile("/{+}").unwrap_err();
        assert!(matches!(err, PatternError::EmptyName { .. }));
    }

    #[test]
    fn mixed_template() {
        let p = compile("/api/{version}/files/{path+}");
        let params = p.match_path("/api/v2/files/docs/readme.md").unwrap();
        assert_eq!(params.get("version"), Some("v2"));
        assert_eq!(params.get("path"), Some("docs/readme.md"));
    }
}
