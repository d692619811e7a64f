#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Error,
}

/// A message for the user, queued until the front end takes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == AlertLevel::Error
    }
}

/// FIFO of pending alerts.
#[derive(Debug, Default, Clone)]
pub struct Alerts(Vec<Alert>);

impl Alerts {
    pub fn push(&mut self, alert: Alert) {
        self.0.push(alert);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Alert::info(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Alert::error(message));
    }

    pub fn pending(&self) -> &[Alert] {
        &self.0
    }

    pub fn last(&self) -> Option<&Alert> {
        self.0.last()
    }

    /// Hand every pending alert to the caller.
    pub fn take(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.0)
    }

    pub fn extend(&mut self, other: Vec<Alert>) {
        self.0.extend(other);
    }
}
