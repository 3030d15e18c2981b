//! Exit code constants for the gerrit-cl CLI.
//!
//! - 0: Success (including a confirmation the operator declined)
//! - 1: User or configuration error (untracked branch, misconfigured remote)
//! - 2: Review system failure (lookup conflict, unreachable server)
//! - 3: Git operation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: invalid repository state, bad config, or a declined required fix.
pub const USER_ERROR: i32 = 1;

/// Review system failure: ambiguous change lookup or transport/decoding error.
pub const REVIEW_FAILURE: i32 = 2;

/// Git operation failure.
pub const GIT_FAILURE: i32 = 3;
