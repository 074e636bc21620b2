//! Tagged response envelope returned by every boundary call.

use std::time::Duration;

/// Failure kinds injected by the simulated server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerFailure {
    TimedOut,
    ServerError,
}

impl ServerFailure {
    pub const fn message(&self) -> &'static str {
        match self {
            ServerFailure::TimedOut => "request timed out",
            ServerFailure::ServerError => "server error: service temporarily unavailable",
        }
    }
}

/// Uniform success/failure envelope.
///
/// Callers branch on `success`; `data` is only present on success and
/// `error_message` only on failure.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error_message: Option<String>,
    /// Wall-clock time the call spent in simulated latency. Informational.
    pub simulated_delay: Duration,
}

impl<T> ServerResponse<T> {
    pub fn ok(data: T, simulated_delay: Duration) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_message: None,
            simulated_delay,
        }
    }

    pub fn failure(message: impl Into<String>, simulated_delay: Duration) -> Self {
        Self {
            success: false,
            data: None,
            error_message: Some(message.into()),
            simulated_delay,
        }
    }

    pub fn from_failure(failure: ServerFailure, simulated_delay: Duration) -> Self {
        Self::failure(failure.message(), simulated_delay)
    }

    /// Failure message, empty on success.
    pub fn error_message(&self) -> &str {
        self.error_message.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_data_only() {
        let response = ServerResponse::ok(7u32, Duration::from_millis(30));
        assert!(response.success);
        assert_eq!(response.data, Some(7));
        assert_eq!(response.error_message(), "");
    }

    #[test]
    fn failure_carries_message_only() {
        let response: ServerResponse<u32> =
            ServerResponse::from_failure(ServerFailure::TimedOut, Duration::from_secs(5));
        assert!(!response.success);
        assert_eq!(response.data, None);
        assert_eq!(response.error_message(), "request timed out");
    }
}
