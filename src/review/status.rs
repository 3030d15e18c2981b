//! Review status of a local change.

use std::fmt;

/// Effective review status of a change.
///
/// `NotUploaded` is local: it means no matching change exists on the server
/// (or the commit has no Change-Id at all). The remaining variants mirror
/// Gerrit's `status` field; states this tool does not know about are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    NotUploaded,
    New,
    Merged,
    Abandoned,
    Other(String),
}

impl ChangeStatus {
    /// Parse a status word reported by the review server.
    pub fn from_remote(status: &str) -> Self {
        match status {
            "NEW" => Self::New,
            "MERGED" => Self::Merged,
            "ABANDONED" => Self::Abandoned,
            other => Self::Other(other.to_string()),
        }
    }

    /// Terminal states never return to active review.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Merged | Self::Abandoned)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotUploaded => "NOT_UPLOADED",
            Self::New => "NEW",
            Self::Merged => "MERGED",
            Self::Abandoned => "ABANDONED",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
