//! Shared utilities for use cases.
//!
//! Cancellation checking and the guarded agent call used by every stage of
//! the pipeline.

use crate::agents::AgentError;
use crate::ports::llm_gateway::GatewayError;
use crate::use_cases::run_pipeline::PipelineError;
use scriptorium_domain::AgentRole;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(PipelineError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), PipelineError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(PipelineError::Cancelled);
    }
    Ok(())
}

/// Run one agent call under `timeout`, abandoning it if `token` fires.
///
/// An elapsed timeout is reported as [`GatewayError::Timeout`] so callers
/// treat it like any other failed gateway call.
pub(crate) async fn guarded_call<T, F>(
    role: AgentRole,
    call: F,
    timeout: Duration,
    token: &Option<CancellationToken>,
) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, AgentError>>,
{
    check_cancelled(token)?;

    let timed = async {
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AgentError::Gateway(GatewayError::Timeout)),
        }
    };

    let result = if let Some(token) = token {
        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(PipelineError::Cancelled),
            result = timed => result,
        }
    } else {
        timed.await
    };

    result.map_err(|source| PipelineError::Agent { role, source })
}
