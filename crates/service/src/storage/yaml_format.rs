//! On-disk layout of the instance file.
//!
//! `serde_yaml` writes sequences flush with their key; the instance file
//! indents list items by two spaces under each repo, so the document is
//! assembled here and only scalar quoting is delegated to `serde_yaml`.

use crate::errors::ServiceError;
use crate::storage::mapping::Mapping;

const EMPTY_DOCUMENT: &str = "{}\n";
const ITEM_INDENT: &str = "  - ";

/// Characters YAML treats as line breaks.
const LINE_BREAKS: [char; 5] = ['\n', '\r', '\u{85}', '\u{2028}', '\u{2029}'];

/// Render `mapping` in block style, repos and branches in stored order.
pub fn to_yaml_string(mapping: &Mapping) -> Result<String, ServiceError> {
    if mapping.is_empty() {
        return Ok(EMPTY_DOCUMENT.to_string());
    }

    let mut out = String::new();
    for (repo, branches) in mapping.iter() {
        out.push_str(&scalar(repo)?);
        if branches.is_empty() {
            out.push_str(": []\n");
            continue;
        }
        out.push_str(":\n");
        for branch in branches {
            out.push_str(ITEM_INDENT);
            out.push_str(&scalar(branch)?);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Single-line YAML rendering of a string scalar.
fn scalar(value: &str) -> Result<String, ServiceError> {
    if value.contains(LINE_BREAKS) {
        return double_quoted(value);
    }
    let rendered = serde_yaml::to_string(value)?;
    let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);
    if rendered.contains(LINE_BREAKS) {
        return double_quoted(value);
    }
    Ok(rendered.to_string())
}

/// JSON strings are valid double-quoted YAML once the breaks JSON leaves raw are escaped.
fn double_quoted(value: &str) -> Result<String, ServiceError> {
    Ok(serde_json::to_string(value)?
        .replace('\u{85}', "\\u0085")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}
