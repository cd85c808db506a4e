//! In-memory fakes for sources and notifiers (testing only)
//!
//! Provides `RecordingNotifier`, `FixedSource` and `FailingSource`, which
//! make pipeline runs fully deterministic without network access.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{SourceError, SourceResult};
use crate::notifier::Notifier;
use crate::source::SignalSource;

/// Notifier that keeps every message in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Source that always returns the same value.
#[derive(Debug, Clone)]
pub struct FixedSource<R> {
    value: R,
}

impl<R> FixedSource<R> {
    pub fn new(value: R) -> Self {
        Self { value }
    }
}

#[async_trait]
impl<R: Clone + Send + Sync> SignalSource<R> for FixedSource<R> {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch(&self) -> SourceResult<R> {
        Ok(self.value.clone())
    }
}

/// Source that always fails with `SourceError::Unavailable`.
#[derive(Debug, Clone)]
pub struct FailingSource {
    reason: String,
}

impl FailingSource {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl<R: Send + 'static> SignalSource<R> for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self) -> SourceResult<R> {
        Err(SourceError::Unavailable(self.reason.clone()))
    }
}
