//! Scaffold plan parsing from provider responses.
//!
//! The scaffold instruction asks for bare JSON, but providers routinely wrap
//! output in markdown fences anyway, so parsing accepts a fenced block or a
//! JSON object embedded in surrounding prose before giving up. A failed
//! parse keeps the raw offending text for diagnosis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One file the scaffold should write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldFile {
    pub path: String,
    pub content: String,
}

/// The parsed scaffold: an ordered list of files to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldPlan {
    pub files: Vec<ScaffoldFile>,
}

/// Why a provider response could not be parsed as a scaffold plan
#[derive(Error, Debug)]
pub enum ScaffoldParseError {
    #[error("response is not valid scaffold JSON:\n{raw}")]
    InvalidJson { raw: String },

    #[error("response has no \"files\" array:\n{raw}")]
    MissingFiles { raw: String },
}

impl ScaffoldParseError {
    /// The raw provider text that failed to parse
    pub fn raw(&self) -> &str {
        match self {
            ScaffoldParseError::InvalidJson { raw } | ScaffoldParseError::MissingFiles { raw } => {
                raw
            }
        }
    }
}

/// Parse a provider response into a [`ScaffoldPlan`].
///
/// Tries, in order: the whole trimmed response as JSON, the contents of the
/// first fenced code block, and the outermost `{...}` span. An object
/// without a non-empty `files` array is rejected.
pub fn parse_scaffold_response(response: &str) -> Result<ScaffoldPlan, ScaffoldParseError> {
    let trimmed = response.trim();

    for candidate in candidates(trimmed) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&candidate) {
            return plan_from_value(value, trimmed);
        }
    }

    Err(ScaffoldParseError::InvalidJson {
        raw: trimmed.to_string(),
    })
}

fn candidates(trimmed: &str) -> Vec<String> {
    let mut out = vec![trimmed.to_string()];

    if let Some(block) = fenced_block(trimmed) {
        out.push(block);
    }

    if let Some(start) = trimmed.find('{')
        && let Some(end) = trimmed.rfind('}')
        && start < end
    {
        out.push(trimmed[start..=end].to_string());
    }

    out
}

/// Extract the body of the first ``` fence, tolerating a language tag
fn fenced_block(text: &str) -> Option<String> {
    let mut in_block = false;
    let mut body = String::new();

    for line in text.lines() {
        let marker = line.trim();
        if !in_block && marker.starts_with("```") {
            in_block = true;
        } else if in_block && marker == "```" {
            return Some(body);
        } else if in_block {
            body.push_str(line);
            body.push('\n');
        }
    }
    None
}

fn plan_from_value(
    value: serde_json::Value,
    raw: &str,
) -> Result<ScaffoldPlan, ScaffoldParseError> {
    let Some(files) = value.get("files").and_then(|v| v.as_array()) else {
        return Err(ScaffoldParseError::MissingFiles {
            raw: raw.to_string(),
        });
    };

    let mut plan = ScaffoldPlan { files: Vec::new() };
    for entry in files {
        let (Some(path), Some(content)) = (
            entry.get("path").and_then(|v| v.as_str()),
            entry.get("content").and_then(|v| v.as_str()),
        ) else {
            return Err(ScaffoldParseError::MissingFiles {
                raw: raw.to_string(),
            });
        };
        plan.files.push(ScaffoldFile {
            path: path.to_string(),
            content: content.to_string(),
        });
    }

    if plan.files.is_empty() {
        return Err(ScaffoldParseError::MissingFiles {
            raw: raw.to_string(),
        });
    }

    Ok(plan)
}
