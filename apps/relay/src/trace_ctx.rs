//! Task-local trace context for relay requests.
//!
//! `RequestTrace` scopes every request future with its trace id so error
//! responses and security events can pick it up without threading it through
//! the core. Core modules (`auth`, `relay`) never read it.

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current request, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` installed as the task-local trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outside_scope_is_unknown() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn scope_installs_and_restores() {
        let seen = with_trace_id("trace-abc".to_string(), async {
            let inner = with_trace_id("trace-inner".to_string(), async { trace_id() }).await;
            assert_eq!(inner, "trace-inner");
            trace_id()
        })
        .await;

        assert_eq!(seen, "trace-abc");
        assert_eq!(trace_id(), "unknown");
    }
}
