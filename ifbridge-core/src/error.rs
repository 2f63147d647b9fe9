//! Error types for marshaling and bridge calls.

use crate::variant::VariantKind;
use thiserror::Error;

/// Error returned when a wire value does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A named field was not present in its container.
    #[error("missing field '{path}'")]
    MissingField {
        /// Dotted path of the missing field.
        path: String,
    },

    /// A value had the wrong shape.
    #[error("expected {expected}, found {found}{}", location(.path))]
    TypeMismatch {
        /// Dotted path of the offending value, empty at the root.
        path: String,
        /// Expected shape.
        expected: VariantKind,
        /// Actual shape.
        found: VariantKind,
    },
}

fn location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at '{path}'")
    }
}

impl DecodeError {
    /// Creates a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { path: field.into() }
    }

    /// Creates a type mismatch error at the current value.
    #[must_use]
    pub fn mismatch(expected: VariantKind, found: VariantKind) -> Self {
        Self::TypeMismatch {
            path: String::new(),
            expected,
            found,
        }
    }

    /// Prefixes the error path with an enclosing field name or `[index]`.
    #[must_use]
    pub fn within(mut self, segment: &str) -> Self {
        let path = match &mut self {
            Self::MissingField { path } | Self::TypeMismatch { path, .. } => path,
        };
        *path = if path.is_empty() {
            segment.to_string()
        } else if path.starts_with('[') {
            format!("{segment}{path}")
        } else {
            format!("{segment}.{path}")
        };
        self
    }

    /// Returns the path of the offending value.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path } | Self::TypeMismatch { path, .. } => path,
        }
    }
}

/// Error reported by a host object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host does not implement the method.
    #[error("method '{method}' is not provided by the host")]
    UnknownMethod {
        /// External method name.
        method: String,
    },

    /// The host accepted the call but could not complete it.
    #[error("host call failed: {message}")]
    Failed {
        /// Error message.
        message: String,
    },
}

impl HostError {
    /// Creates an unknown method error.
    pub fn unknown_method(method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            method: method.into(),
        }
    }

    /// Creates a failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Remote call failure raised by a generated call bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// No host object is attached to the bridge.
    #[error("interface '{interface}' has no host object bound")]
    HostNotBound {
        /// Interface name.
        interface: String,
    },

    /// The host call itself failed.
    #[error("remote call '{method}' failed: {source}")]
    CallFailed {
        /// Qualified method name.
        method: String,
        /// Host error.
        source: HostError,
    },

    /// The host returned something other than a keyed container.
    #[error("remote call '{method}' returned a {found} instead of a map")]
    BadResponse {
        /// Qualified method name.
        method: String,
        /// Shape of the returned value.
        found: VariantKind,
    },

    /// A response field was missing or had the wrong shape.
    #[error("remote call '{method}' returned an unreadable response: {source}")]
    ResponseField {
        /// Qualified method name.
        method: String,
        /// Decode error for the field.
        source: DecodeError,
    },
}

impl BridgeError {
    /// Creates a host-not-bound error.
    pub fn host_not_bound(interface: impl Into<String>) -> Self {
        Self::HostNotBound {
            interface: interface.into(),
        }
    }

    /// Creates a call failure.
    pub fn call_failed(method: impl Into<String>, source: HostError) -> Self {
        Self::CallFailed {
            method: method.into(),
            source,
        }
    }

    /// Creates a bad response error.
    pub fn bad_response(method: impl Into<String>, found: VariantKind) -> Self {
        Self::BadResponse {
            method: method.into(),
            found,
        }
    }

    /// Creates a response field error.
    pub fn response_field(method: impl Into<String>, source: DecodeError) -> Self {
        Self::ResponseField {
            method: method.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_path() {
        let err = DecodeError::missing("y").within("[2]").within("points");
        assert_eq!(err.path(), "points[2].y");
        assert_eq!(err.to_string(), "missing field 'points[2].y'");
    }

    #[test]
    fn test_decode_error_mismatch_display() {
        let err = DecodeError::mismatch(VariantKind::Map, VariantKind::Int);
        assert_eq!(err.to_string(), "expected map, found int");
        let err = err.within("coord");
        assert_eq!(err.to_string(), "expected map, found int at 'coord'");
    }

    #[test]
    fn test_bridge_error_display() {
        let err = BridgeError::call_failed("UI.Alert", HostError::unknown_method("alert"));
        assert_eq!(
            err.to_string(),
            "remote call 'UI.Alert' failed: method 'alert' is not provided by the host"
        );
        let err = BridgeError::bad_response("UI.Alert", VariantKind::List);
        assert!(err.to_string().contains("list instead of a map"));
    }
}
