//! Review-system client.
//!
//! [`ReviewClient`] is the narrow contract the rest of the tool needs from
//! the review server: look up changes by Change-Id, and hand out the
//! commit-msg hook that mints those ids. [`GerritClient`] implements it
//! over Gerrit's REST API.

mod gerrit;
mod status;

pub use gerrit::GerritClient;
pub use status::ChangeStatus;

use crate::error::Result;

/// A change as recorded on the review server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteChange {
    /// Server-assigned change number.
    pub number: u64,
    /// Review state reported by the server.
    pub status: ChangeStatus,
    /// Short link to the change.
    pub short_url: String,
}

/// Read access to the review server.
pub trait ReviewClient {
    /// All changes in `project` carrying the Change-Id `change_id`.
    fn query_changes(&self, project: &str, change_id: &str) -> Result<Vec<RemoteChange>>;

    /// Contents of the commit-msg hook that adds Change-Id trailers.
    fn fetch_commit_msg_hook(&self) -> Result<Vec<u8>>;
}
