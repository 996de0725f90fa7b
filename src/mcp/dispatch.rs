//! MCP method dispatch.
//!
//! Type-safe enum for the protocol methods this server implements; unknown
//! methods are captured for error reporting instead of being string-matched
//! at the call site.

use std::fmt;

/// MCP method identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum McpMethod {
    /// Initialize the MCP session.
    Initialize,
    /// List available tools.
    ListTools,
    /// Call a specific tool.
    CallTool,
    /// Ping the server (health check).
    Ping,
    /// Unknown method (for error handling).
    Unknown(String),
}

impl McpMethod {
    /// Returns the MCP protocol method name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Initialize => "initialize",
            Self::ListTools => "tools/list",
            Self::CallTool => "tools/call",
            Self::Ping => "ping",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

impl From<&str> for McpMethod {
    fn from(s: &str) -> Self {
        match s {
            "initialize" => Self::Initialize,
            "tools/list" => Self::ListTools,
            "tools/call" => Self::CallTool,
            "ping" => Self::Ping,
            unknown => Self::Unknown(unknown.to_string()),
        }
    }
}

impl fmt::Display for McpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_methods_round_trip() {
        for method in [
            McpMethod::Initialize,
            McpMethod::ListTools,
            McpMethod::CallTool,
            McpMethod::Ping,
        ] {
            assert_eq!(McpMethod::from(method.as_str()), method);
        }
    }

    #[test]
    fn test_unknown_method_is_captured() {
        let method = McpMethod::from("resources/list");
        assert_eq!(method, McpMethod::Unknown("resources/list".to_string()));
        assert_eq!(method.to_string(), "resources/list");
    }
}
