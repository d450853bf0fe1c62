//! Rules for scene versions and the commits that group them.
//!
//! Versions are immutable and append-only; a commit binds one or more
//! versions of a single branch. The checks here are pure so the stores can
//! run them before issuing any mutating statement.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Author recorded on commits when the caller supplies none.
pub const DEFAULT_AUTHOR: &str = "You";

/// Number of characters of plain text kept in a derived commit message.
pub const COMMIT_MESSAGE_PREVIEW_CHARS: usize = 90;

/// Marker appended to a derived commit message that was cut short.
pub const TRUNCATION_MARKER: char = '…';

/// Derived message used when a version has no visible text at all.
pub const EMPTY_CONTENT_MESSAGE: &str = "(empty)";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

// ---------------------------------------------------------------------------
// Commit messages
// ---------------------------------------------------------------------------

/// Remove markup tags, leaving the text content.
pub fn strip_html_tags(html: &str) -> String {
    TAG_PATTERN.replace_all(html, "").into_owned()
}

/// Build a commit message from version content: tags stripped, whitespace
/// collapsed, cut to [`COMMIT_MESSAGE_PREVIEW_CHARS`] characters with a
/// [`TRUNCATION_MARKER`] when anything was dropped.
pub fn derive_commit_message(content_html: &str) -> String {
    let text = strip_html_tags(content_html);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return EMPTY_CONTENT_MESSAGE.to_string();
    }

    let mut chars = collapsed.chars();
    let mut preview: String = chars.by_ref().take(COMMIT_MESSAGE_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        preview.push(TRUNCATION_MARKER);
    }
    preview
}

/// Use the caller's message when it has any text, otherwise derive one.
pub fn resolve_commit_message(message: Option<&str>, content_html: &str) -> String {
    match message.map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => derive_commit_message(content_html),
    }
}

/// Use the caller's author when it has any text, otherwise [`DEFAULT_AUTHOR`].
pub fn resolve_author(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => DEFAULT_AUTHOR.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Version metadata
// ---------------------------------------------------------------------------

/// Normalise version metadata. `null` becomes an empty object; any other
/// non-object value is rejected. Object contents are never inspected.
pub fn normalize_meta(meta: serde_json::Value) -> Result<serde_json::Value, CoreError> {
    match meta {
        serde_json::Value::Null => Ok(serde_json::Value::Object(serde_json::Map::new())),
        serde_json::Value::Object(_) => Ok(meta),
        other => Err(CoreError::BadRequest(format!(
            "Version meta must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Commit membership
// ---------------------------------------------------------------------------

/// Reject an empty or duplicated version id list.
pub fn validate_commit_request(scene_version_ids: &[DbId]) -> Result<(), CoreError> {
    if scene_version_ids.is_empty() {
        return Err(CoreError::BadRequest(
            "A commit must include at least one scene version".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(scene_version_ids.len());
    if let Some(dup) = scene_version_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(CoreError::BadRequest(format!(
            "Scene version {dup} is listed more than once"
        )));
    }
    Ok(())
}

/// Check resolved commit members against the request.
///
/// `resolved` holds `(version_id, branch_id)` for every requested id that
/// exists. Checks run in a fixed order: every id resolved, one shared
/// branch, and that branch equal to `branch_id`.
pub fn check_commit_members(
    requested: &[DbId],
    resolved: &[(DbId, DbId)],
    branch_id: DbId,
) -> Result<(), CoreError> {
    if resolved.len() != requested.len() {
        return Err(CoreError::BadRequest(
            "Some scene versions not found".to_string(),
        ));
    }

    let branches: HashSet<DbId> = resolved.iter().map(|(_, b)| *b).collect();
    if branches.len() > 1 {
        return Err(CoreError::BadRequest(
            "All scene versions must belong to the same branch".to_string(),
        ));
    }

    if !branches.contains(&branch_id) {
        return Err(CoreError::BadRequest(
            "Branch ID mismatch with scene versions".to_string(),
        ));
    }

    Ok(())
}
