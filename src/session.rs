// src/session.rs
//
// Lifecycle of one upload-analyze-view cycle. A session is idle until bytes
// are loaded, busy while the analyzer call is in flight, then ready or error.
// Every analysis attempt carries a monotonically increasing token; a
// completion whose token is no longer current is discarded silently, so an
// in-flight result can never overwrite a newer session state.

use crate::analyzer::{Analyzer, AnalyzerError};
use crate::clock::Clock;
use crate::report::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Recommended interval for live elapsed-time display while busy.
pub const ELAPSED_TICK_MS: u64 = 50;

const FALLBACK_ERROR: &str = "Unknown analysis error.";
const FALLBACK_LABEL: &str = "uploaded binary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Busy,
    Ready,
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Select a binary first.")]
    NoInput,
}

/// Token identifying one analysis attempt. Stale tokens are ignored by
/// `complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptToken(u64);

pub struct AnalysisSession {
    id: Uuid,
    clock: Arc<dyn Clock>,
    input_bytes: Option<Vec<u8>>,
    file_name: String,
    report: Option<AnalysisReport>,
    error: Option<String>,
    analysis_started_at: Option<DateTime<Utc>>,
    last_duration_ms: Option<i64>,
    attempt: u64,
}

impl AnalysisSession {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            id: Uuid::new_v4(),
            clock,
            input_bytes: None,
            file_name: String::new(),
            report: None,
            error: None,
            analysis_started_at: None,
            last_duration_ms: None,
            attempt: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Status is derived, so the ready/report and busy/start-stamp
    /// invariants hold by construction.
    pub fn status(&self) -> SessionStatus {
        if self.analysis_started_at.is_some() {
            SessionStatus::Busy
        } else if self.error.is_some() {
            SessionStatus::Error
        } else if self.report.is_some() {
            SessionStatus::Ready
        } else {
            SessionStatus::Idle
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_input(&self) -> bool {
        self.input_bytes.is_some()
    }

    pub fn input_size(&self) -> Option<u64> {
        self.input_bytes.as_ref().map(|b| b.len() as u64)
    }

    pub fn last_duration_ms(&self) -> Option<i64> {
        self.last_duration_ms
    }

    /// Wall-clock milliseconds since the current attempt started; 0 when not
    /// busy. Hosts poll this on a ~`ELAPSED_TICK_MS` cadence while busy.
    pub fn elapsed_ms(&self) -> i64 {
        match self.analysis_started_at {
            Some(started) => (self.clock.now() - started).num_milliseconds().max(0),
            None => 0,
        }
    }

    /// Store input bytes and enter the busy state. Returns the token the
    /// eventual completion must present.
    pub fn begin(&mut self, bytes: Vec<u8>) -> AttemptToken {
        self.input_bytes = Some(bytes);
        self.error = None;
        self.analysis_started_at = Some(self.clock.now());
        self.attempt += 1;
        tracing::debug!(session = %self.id, attempt = self.attempt, "analysis started");
        AttemptToken(self.attempt)
    }

    /// Apply an analysis outcome. Returns false when the token is stale and
    /// the outcome was discarded.
    pub fn complete(
        &mut self,
        token: AttemptToken,
        outcome: Result<AnalysisReport, AnalyzerError>,
        label: &str,
    ) -> bool {
        if token.0 != self.attempt {
            tracing::debug!(
                session = %self.id,
                stale = token.0,
                current = self.attempt,
                "discarding stale analysis completion"
            );
            return false;
        }

        let started = self.analysis_started_at.take();
        match outcome {
            Ok(report) => {
                self.last_duration_ms =
                    started.map(|s| (self.clock.now() - s).num_milliseconds().max(0));
                self.report = Some(report);
                self.file_name = label.to_string();
                self.error = None;
                tracing::info!(
                    session = %self.id,
                    duration_ms = self.last_duration_ms,
                    "analysis complete"
                );
            }
            Err(error) => {
                let message = error.to_string();
                let message = if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                };
                tracing::warn!(session = %self.id, "analysis failed: {}", message);
                self.error = Some(message);
                self.report = None;
                self.last_duration_ms = None;
            }
        }
        true
    }

    /// Begin + invoke the analyzer + complete, in one call. Analyzer
    /// failures land in the error state; nothing propagates.
    pub async fn load(&mut self, analyzer: &dyn Analyzer, bytes: Vec<u8>, label: &str) {
        let token = self.begin(bytes);
        let input = self.input_bytes.as_deref().unwrap_or_default();
        let outcome = analyzer.analyze(input).await;
        self.complete(token, outcome, label);
    }

    /// Re-run analysis on the retained input. Clears the previous report
    /// before starting so a stale result is never shown while busy, and
    /// yields once so a busy indicator can paint before the heavy call.
    pub async fn rerun(&mut self, analyzer: &dyn Analyzer) -> Result<(), SessionError> {
        let Some(bytes) = self.input_bytes.clone() else {
            return Err(SessionError::NoInput);
        };
        self.report = None;
        self.error = None;
        self.last_duration_ms = None;
        tokio::task::yield_now().await;
        let label = if self.file_name.is_empty() {
            FALLBACK_LABEL.to_string()
        } else {
            self.file_name.clone()
        };
        self.load(analyzer, bytes, &label).await;
        Ok(())
    }

    /// Full teardown back to idle. Also invalidates any in-flight attempt.
    pub fn clear(&mut self) {
        self.input_bytes = None;
        self.file_name.clear();
        self.report = None;
        self.error = None;
        self.analysis_started_at = None;
        self.last_duration_ms = None;
        self.attempt += 1;
        tracing::debug!(session = %self.id, "session cleared");
    }
}
