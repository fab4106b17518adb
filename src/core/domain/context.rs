use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    timeout: Option<Duration>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
