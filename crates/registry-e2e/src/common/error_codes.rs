//! JSON-RPC error codes seen from registry tool servers.
//!
//! Error codes follow the JSON-RPC 2.0 specification:
//! - -32700 to -32600: Reserved protocol errors
//! - -32000 to -32099: Server errors (tool servers use these for registry lookups)

// Protocol errors
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// Registry lookup errors
pub const RESOURCE_NOT_FOUND: i32 = -32002;
pub const UPSTREAM_ERROR: i32 = -32010;

// Legacy generic server error
pub const GENERIC_ERROR: i32 = -32000;

/// Error category used to tell semantic rejections apart from broken plumbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Requested registry object does not exist
    NotFound,
    /// Request arguments were rejected
    InvalidInput,
    /// The request never reached a tool (framing, unknown method)
    Protocol,
    /// Server-side failure while handling a well-framed request
    Internal,
    /// Registry backend unreachable or failing
    External,
    /// Operation timed out
    Timeout,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Internal => "internal",
            ErrorCategory::External => "external",
            ErrorCategory::Timeout => "timeout",
        }
    }

    /// Whether an error of this category means the tool looked at the query and refused it.
    pub fn is_semantic(&self) -> bool {
        !matches!(self, ErrorCategory::Protocol | ErrorCategory::Timeout)
    }
}

impl std::str::FromStr for ErrorCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_found" => Ok(ErrorCategory::NotFound),
            "invalid_input" => Ok(ErrorCategory::InvalidInput),
            "protocol" => Ok(ErrorCategory::Protocol),
            "internal" => Ok(ErrorCategory::Internal),
            "external" => Ok(ErrorCategory::External),
            "timeout" => Ok(ErrorCategory::Timeout),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the error category for a given error code.
pub fn category_for_code(code: i32) -> ErrorCategory {
    match code {
        PARSE_ERROR | INVALID_REQUEST | METHOD_NOT_FOUND => ErrorCategory::Protocol,
        INVALID_PARAMS => ErrorCategory::InvalidInput,
        RESOURCE_NOT_FOUND => ErrorCategory::NotFound,
        UPSTREAM_ERROR => ErrorCategory::External,
        _ => ErrorCategory::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_for_code_protocol() {
        assert_eq!(category_for_code(PARSE_ERROR), ErrorCategory::Protocol);
        assert_eq!(category_for_code(INVALID_REQUEST), ErrorCategory::Protocol);
        assert_eq!(category_for_code(METHOD_NOT_FOUND), ErrorCategory::Protocol);
    }

    #[test]
    fn test_category_for_code_semantic() {
        assert_eq!(category_for_code(INVALID_PARAMS), ErrorCategory::InvalidInput);
        assert_eq!(category_for_code(RESOURCE_NOT_FOUND), ErrorCategory::NotFound);
        assert_eq!(category_for_code(UPSTREAM_ERROR), ErrorCategory::External);
        assert_eq!(category_for_code(INTERNAL_ERROR), ErrorCategory::Internal);
        assert_eq!(category_for_code(GENERIC_ERROR), ErrorCategory::Internal);
    }

    #[test]
    fn test_protocol_and_timeout_are_not_semantic() {
        assert!(!ErrorCategory::Protocol.is_semantic());
        assert!(!ErrorCategory::Timeout.is_semantic());
        assert!(ErrorCategory::NotFound.is_semantic());
        assert!(ErrorCategory::InvalidInput.is_semantic());
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in [
            ErrorCategory::NotFound,
            ErrorCategory::InvalidInput,
            ErrorCategory::Protocol,
            ErrorCategory::Internal,
            ErrorCategory::External,
            ErrorCategory::Timeout,
        ] {
            assert_eq!(category.as_str().parse::<ErrorCategory>(), Ok(category));
        }
        assert!("unknown".parse::<ErrorCategory>().is_err());
    }
}
