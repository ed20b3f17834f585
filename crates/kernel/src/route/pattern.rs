//! Route pattern compilation and matching.
//!
//! Templates are `/`-separated paths where a `{name}` segment captures one
//! or more non-separator characters. Everything else is literal and matched
//! case-sensitively; no trailing-slash normalization is applied.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Errors from compiling a template or expanding parameters into one.
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    #[error("duplicate parameter '{{{name}}}' in template '{template}'")]
    DuplicateParameter { template: String, name: String },

    #[error("empty parameter name in template '{template}'")]
    EmptyParameter { template: String },

    #[error("invalid parameter name '{{{name}}}' in template '{template}'")]
    InvalidParameter { template: String, name: String },

    #[error("unterminated '{{' in template '{template}'")]
    Unterminated { template: String },

    #[error("missing value for parameter '{{{name}}}' expanding '{template}'")]
    MissingValue { template: String, name: String },

    #[error("value '{value}' for '{{{name}}}' would not round-trip through '{template}'")]
    UnfillableValue {
        template: String,
        name: String,
        value: String,
    },
}

/// A compiled route template.
///
/// The matcher is anchored start-to-end: a path either satisfies the whole
/// template or does not match at all, so a pattern can never claim a path
/// by prefix.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: String,
    matcher: Regex,
    param_names: Vec<String>,
}

impl RoutePattern {
    /// Compile a template like `/staffs/edit/{id}`.
    ///
    /// Each `{name}` becomes a capturing group matching one or more
    /// non-separator characters. Duplicate, empty, or malformed parameter
    /// names and an unterminated `{` are rejected here rather than at
    /// match time.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let mut param_names: Vec<String> = Vec::new();
        let mut source = String::from("^");
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            source.push_str(&regex::escape(literal));

            let Some(close) = tail.find('}') else {
                return Err(PatternError::Unterminated {
                    template: template.to_string(),
                });
            };
            let name = &tail[1..close];

            if name.is_empty() {
                return Err(PatternError::EmptyParameter {
                    template: template.to_string(),
                });
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(PatternError::InvalidParameter {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }
            if param_names.iter().any(|p| p == name) {
                return Err(PatternError::DuplicateParameter {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }

            param_names.push(name.to_string());
            source.push_str("([^/]+)");
            rest = &tail[close + 1..];
        }
        source.push_str(&regex::escape(rest));
        source.push('$');

        // The source is built from escaped literals and fixed groups only,
        // so compilation cannot fail; map the error anyway to honor the
        // no-panic lint.
        let matcher = Regex::new(&source).map_err(|_| PatternError::Unterminated {
            template: template.to_string(),
        })?;

        Ok(Self {
            template: template.to_string(),
            matcher,
            param_names,
        })
    }

    /// The original template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Ordered parameter names, as they appear in the template.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match a path against the full template, extracting parameters.
    ///
    /// Returns `None` when the path does not satisfy the template exactly.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let captures = self.matcher.captures(path)?;
        let params = self
            .param_names
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(name, value)| {
                value.map(|v| (name.clone(), v.as_str().to_string()))
            })
            .collect();
        Some(params)
    }

    /// Substitute parameter values back into the template.
    ///
    /// Rejects missing parameters and values that are empty or contain
    /// `/`, since the resulting path would not match this pattern.
    pub fn expand(&self, params: &HashMap<String, String>) -> Result<String, PatternError> {
        let mut path = self.template.clone();
        for name in &self.param_names {
            let value = params.get(name).ok_or_else(|| PatternError::MissingValue {
                template: self.template.clone(),
                name: name.clone(),
            })?;
            if value.is_empty() || value.contains('/') {
                return Err(PatternError::UnfillableValue {
                    template: self.template.clone(),
                    name: name.clone(),
                    value: value.clone(),
                });
            }
            path = path.replace(&format!("{{{name}}}"), value);
        }
        Ok(path)
    }
}
