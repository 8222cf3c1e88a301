//! Background tasks that keep the caller's language and timezone.
//!
//! A task travels as a JSON envelope: its own arguments plus the reserved
//! `x-language` and `x-timezone` keys. The worker side restores a localizer
//! and timezone from those keys before running the task body, so a task
//! renders the same way the request that queued it would have.

use std::sync::Arc;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::i18n::{I18n, Localizer};
use crate::timezone::TimezoneResolver;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Failed to encode task payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode task payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedTask<A> {
    #[serde(flatten)]
    pub args: A,

    #[serde(rename = "x-language", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "x-timezone", default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl<A> LocalizedTask<A> {
    pub fn new(args: A) -> Self {
        Self { args, language: None, timezone: None }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Record the current request's language and timezone.
    ///
    /// Values set explicitly on the task are kept.
    pub fn capture(mut self, localizer: &Localizer, tz: Tz) -> Self {
        if self.language.is_none() {
            self.language = Some(localizer.language().to_string());
        }
        if self.timezone.is_none() {
            self.timezone = Some(tz.to_string());
        }
        self
    }

    /// Rebuild the task's context; unusable values degrade to the defaults.
    pub fn context(&self, i18n: &I18n, resolver: &TimezoneResolver) -> TaskContext {
        TaskContext {
            localizer: i18n.negotiate(self.language.as_deref()),
            timezone: resolver.resolve(self.timezone.as_deref()),
        }
    }
}

impl<A: Serialize> LocalizedTask<A> {
    pub fn encode(&self) -> Result<String, TaskError> {
        serde_json::to_string(self).map_err(TaskError::Encode)
    }
}

impl<A: DeserializeOwned> LocalizedTask<A> {
    pub fn decode(payload: &str) -> Result<Self, TaskError> {
        serde_json::from_str(payload).map_err(TaskError::Decode)
    }
}

/// What a task body sees instead of the request context.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub localizer: Localizer,
    pub timezone: Tz,
}

/// Runs localized tasks, either inline or on the tokio runtime.
#[derive(Debug, Clone)]
pub struct TaskRunner {
    i18n: Arc<I18n>,
    timezones: TimezoneResolver,
}

impl TaskRunner {
    pub fn new(i18n: Arc<I18n>, timezones: TimezoneResolver) -> Self {
        Self { i18n, timezones }
    }

    /// Run the task on the current thread.
    pub fn apply<A, T, F>(&self, task: &LocalizedTask<A>, f: F) -> Result<T, TaskError>
    where
        A: Serialize + DeserializeOwned,
        F: FnOnce(TaskContext, A) -> T,
    {
        let payload = task.encode()?;
        self.execute(&payload, f)
    }

    /// Run the task on a spawned tokio task and wait for its result.
    pub async fn apply_async<A, T, F>(&self, task: LocalizedTask<A>, f: F) -> Result<T, TaskError>
    where
        A: Serialize + DeserializeOwned + Send + 'static,
        T: Send + 'static,
        F: FnOnce(TaskContext, A) -> T + Send + 'static,
    {
        let payload = task.encode()?;
        let runner = self.clone();
        tokio::spawn(async move { runner.execute(&payload, f) }).await?
    }

    fn execute<A, T, F>(&self, payload: &str, f: F) -> Result<T, TaskError>
    where
        A: DeserializeOwned,
        F: FnOnce(TaskContext, A) -> T,
    {
        let task = LocalizedTask::<A>::decode(payload)?;
        let ctx = task.context(&self.i18n, &self.timezones);
        tracing::debug!(
            "Running task with language={} timezone={}",
            ctx.localizer.language(),
            ctx.timezone
        );
        Ok(f(ctx, task.args))
    }
}
