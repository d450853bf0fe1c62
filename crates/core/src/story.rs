//! Story hierarchy vocabulary.
//!
//! Nodes form a forest per repository. A node's parent must already exist
//! when the node is created, and parents are never reassigned afterwards,
//! so no cycle can be introduced.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Node kinds
// ---------------------------------------------------------------------------

/// Organisational level of a story node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Epic,
    Chapter,
}

/// All valid node kind strings.
const VALID_KIND_STRINGS: &[&str] = &["epic", "chapter"];

impl NodeKind {
    /// Return the kind as stored in the `story_nodes.kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Chapter => "chapter",
        }
    }

    /// Parse a node kind from its stored string form.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "epic" => Ok(Self::Epic),
            "chapter" => Ok(Self::Chapter),
            _ => Err(CoreError::BadRequest(format!(
                "Invalid story node kind '{s}'. Must be one of: {}",
                VALID_KIND_STRINGS.join(", ")
            ))),
        }
    }
}
