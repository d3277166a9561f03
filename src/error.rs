//! Errors raised while talking to the backend module.

/// Failure of a single backend call.
///
/// Never crosses the proxy boundary: the forwarder converts it into a
/// negative response using [`BackendError::failure_message`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The configured host/port does not form a usable endpoint.
    #[error("invalid backend address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// The call reached the transport layer and came back with a status.
    #[error("{}", status_message(.0))]
    Status(#[from] tonic::Status),
}

impl BackendError {
    /// Human-readable message used in synthesized log lines.
    pub fn failure_message(&self) -> String {
        self.to_string()
    }
}

fn status_message(status: &tonic::Status) -> String {
    if status.message().is_empty() {
        status.code().description().to_string()
    } else {
        status.message().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::{Code, Status};

    #[test]
    fn status_message_is_used_verbatim() {
        let err = BackendError::from(Status::unavailable("timeout"));
        assert_eq!(err.failure_message(), "timeout");
    }

    #[test]
    fn empty_status_message_falls_back_to_code() {
        let err = BackendError::from(Status::new(Code::Unavailable, ""));
        assert_eq!(err.failure_message(), Code::Unavailable.description());
    }
}
