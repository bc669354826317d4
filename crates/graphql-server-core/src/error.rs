use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur while starting or running a GraphQL server
#[derive(Error, Debug)]
pub enum GraphQLServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An error that maps directly onto an HTTP response.
///
/// When `is_graphql_error` is set the message is a serialized GraphQL
/// response and should be sent as JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpQueryError {
    pub status: u16,
    pub message: String,
    pub is_graphql_error: bool,
    pub headers: Vec<(String, String)>,
}

impl HttpQueryError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            is_graphql_error: false,
            headers: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn method_not_allowed(message: impl Into<String>, allow: &str) -> Self {
        Self::new(405, message).with_header("Allow", allow)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// A 400 whose body is a GraphQL response
    pub fn graphql(body: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: body.into(),
            is_graphql_error: true,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn content_type(&self) -> &'static str {
        if self.is_graphql_error {
            "application/json"
        } else {
            "text/plain; charset=utf-8"
        }
    }
}
