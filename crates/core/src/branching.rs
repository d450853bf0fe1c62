//! Repository and branch naming rules.
//!
//! Branch creation is a pure namespace operation: a new branch starts empty
//! and never inherits versions from another branch.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Name of the branch clients conventionally create first.
pub const DEFAULT_BRANCH_NAME: &str = "main";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a branch name: must contain non-whitespace text. The name is
/// stored as given, surrounding whitespace included.
pub fn validate_branch_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::BadRequest(
            "Branch name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a repository name: any name with non-whitespace text is
/// accepted.
pub fn validate_repository_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::BadRequest(
            "Repository name must not be empty".to_string(),
        ));
    }
    Ok(())
}
