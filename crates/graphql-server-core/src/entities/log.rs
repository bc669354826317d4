use serde_json::Value;
use std::sync::Arc;

/// Phase of query processing a log message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogAction {
    Request,
    Parse,
    Validation,
    Execute,
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogAction::Request => write!(f, "request"),
            LogAction::Parse => write!(f, "parse"),
            LogAction::Validation => write!(f, "validation"),
            LogAction::Execute => write!(f, "execute"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogStep {
    Start,
    End,
    Status,
}

impl std::fmt::Display for LogStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogStep::Start => write!(f, "start"),
            LogStep::End => write!(f, "end"),
            LogStep::Status => write!(f, "status"),
        }
    }
}

/// A structured event emitted while a query runs
#[derive(Debug, Clone, PartialEq)]
pub struct LogMessage {
    pub action: LogAction,
    pub step: LogStep,
    pub key: Option<&'static str>,
    pub data: Option<Value>,
}

impl LogMessage {
    pub fn new(action: LogAction, step: LogStep) -> Self {
        Self {
            action,
            step,
            key: None,
            data: None,
        }
    }

    pub fn with_data(mut self, key: &'static str, data: Value) -> Self {
        self.key = Some(key);
        self.data = Some(data);
        self
    }
}

/// Receiver for [`LogMessage`]s
pub type LogFn = Arc<dyn Fn(&LogMessage) + Send + Sync>;
