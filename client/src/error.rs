use std::fmt;

/// Why a submission did not produce a mesh.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitError {
    InsufficientPoints,
    ServiceRejected(String),
    /// Network, abort or decode failure. The detail is for the console only.
    TransportFailure(String),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::InsufficientPoints => {
                "You need at least 3 points to create a polygon!".to_string()
            }
            SubmitError::ServiceRejected(message) => format!("Error: {message}"),
            SubmitError::TransportFailure(_) => {
                "An error occurred. Check the console for details.".to_string()
            }
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::TransportFailure(detail) => write!(f, "mesh request failed: {detail}"),
            other => f.write_str(&other.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SubmitError;

    #[test]
    fn user_messages() {
        assert_eq!(
            SubmitError::ServiceRejected("bad polygon".into()).user_message(),
            "Error: bad polygon"
        );
        assert_eq!(
            SubmitError::InsufficientPoints.user_message(),
            "You need at least 3 points to create a polygon!"
        );
        let transport = SubmitError::TransportFailure("connection reset".into());
        assert!(!transport.user_message().contains("connection reset"));
        assert!(transport.to_string().contains("connection reset"));
    }
}
