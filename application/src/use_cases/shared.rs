//! Shared utilities for use cases.

use crate::use_cases::run_synergy::RunSynergyError;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunSynergyError::Aborted)` if the token exists and is
/// cancelled. Polled only at loop-iteration boundaries; an in-flight
/// provider call is never interrupted.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunSynergyError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunSynergyError::Aborted);
    }
    Ok(())
}
