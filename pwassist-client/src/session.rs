//! Client-side submission state machine.
//!
//! Pure state: no I/O and no timers. The driver in [`crate::service`] asks for a
//! [`PendingRequest`], performs it, and feeds the outcome back through
//! [`SessionState::complete`].

use pwassist_core::segment::{Segment, segment};
use pwassist_core::types::{Mode, Provider, RequestInput};

use crate::labels::empty_input_message;
use crate::transport::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// A request the caller must send; `id` identifies it when the outcome comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: u64,
    pub body: RequestInput,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    mode: Mode,
    provider: Provider,
    input_text: String,
    status: SubmissionStatus,
    last_error: Option<String>,
    raw_result: String,
    segments: Vec<Segment>,
    // Only the outcome carrying this id is applied.
    request_id: u64,
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn raw_result(&self) -> &str {
        &self.raw_result
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Switches mode and discards input, error, result and any in-flight request.
    ///
    /// Returns false when `mode` is already current; nothing changes then.
    pub fn change_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.input_text.clear();
        self.last_error = None;
        self.clear_result();
        self.request_id = self.request_id.wrapping_add(1);
        self.status = SubmissionStatus::Idle;
        true
    }

    /// Applies to the next submission only.
    pub fn change_provider(&mut self, provider: Provider) {
        self.provider = provider;
    }

    /// Editing while pending is accepted; the in-flight request keeps the text it was sent with.
    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    /// Starts a submission.
    ///
    /// Blank input moves straight to `Failed` and returns `None`; while a request is
    /// in flight it only sets the message and the session stays `Pending`. Otherwise
    /// the session becomes `Pending` with error and result cleared, and a fresh
    /// request id supersedes any request still in flight.
    pub fn begin_submit(&mut self) -> Option<PendingRequest> {
        if self.input_text.trim().is_empty() {
            if !self.is_pending() {
                self.status = SubmissionStatus::Failed;
            }
            self.last_error = Some(empty_input_message(self.mode).to_string());
            return None;
        }

        self.request_id = self.request_id.wrapping_add(1);
        self.status = SubmissionStatus::Pending;
        self.last_error = None;
        self.clear_result();

        Some(PendingRequest {
            id: self.request_id,
            body: RequestInput::for_mode(self.mode, self.provider, self.input_text.clone()),
        })
    }

    /// Applies the outcome of request `id`.
    ///
    /// Returns false, leaving the session untouched, when `id` is not the latest
    /// request or the session is no longer pending.
    pub fn complete(&mut self, id: u64, outcome: Result<String, SubmitError>) -> bool {
        if id != self.request_id || !self.is_pending() {
            log::debug!("discarding stale response id={id} latest={}", self.request_id);
            return false;
        }

        match outcome {
            Ok(raw) => {
                self.last_error = None;
                self.segments = segment(&raw);
                self.raw_result = raw;
                self.status = SubmissionStatus::Succeeded;
            }
            Err(e) => {
                log::error!("{} request failed: {e}", self.mode);
                self.last_error = Some(e.banner(self.mode));
                self.status = SubmissionStatus::Failed;
            }
        }
        true
    }

    fn clear_result(&mut self) {
        self.raw_result.clear();
        self.segments.clear();
    }
}
