//! Cancellation of long-running lookups.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// A lookup was aborted because its [`CancellationToken`] fired.
///
/// This is a control-flow signal, not a "not found" answer: callers must not
/// cache anything computed under a cancelled token.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Return `Err(Cancelled)` once `token` has been cancelled.
#[inline]
pub fn check_cancelled(token: &CancellationToken) -> Result<(), Cancelled> {
    if token.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}
