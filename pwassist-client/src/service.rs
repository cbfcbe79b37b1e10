use std::sync::Arc;

use pwassist_core::segment::code_blocks;
use pwassist_core::types::{Mode, Provider};
use tokio::sync::Mutex;

use crate::copy::CopyIndicator;
use crate::session::SessionState;
use crate::transport::Transport;

/// Drives a [`SessionState`] against a [`Transport`] and owns the copy flags.
///
/// The state lock is never held across the network call, so a second submit
/// may start while one is in flight; the older outcome is then discarded.
#[derive(Clone)]
pub struct CodegenClient {
    state: Arc<Mutex<SessionState>>,
    transport: Arc<dyn Transport>,
    copy: CopyIndicator,
}

impl CodegenClient {
    pub fn new(mode: Mode, transport: Arc<dyn Transport>, copy: CopyIndicator) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(mode))),
            transport,
            copy,
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub fn copy_indicator(&self) -> &CopyIndicator {
        &self.copy
    }

    pub async fn change_mode(&self, mode: Mode) {
        if self.state.lock().await.change_mode(mode) {
            self.copy.clear();
        }
    }

    pub async fn change_provider(&self, provider: Provider) {
        self.state.lock().await.change_provider(provider);
    }

    pub async fn set_input_text(&self, text: impl Into<String>) {
        self.state.lock().await.set_input_text(text);
    }

    /// Runs one submission to completion and returns the resulting state.
    pub async fn submit(&self) -> SessionState {
        let pending = {
            let mut state = self.state.lock().await;
            let pending = state.begin_submit();
            if pending.is_some() {
                self.copy.clear();
            }
            pending
        };

        let Some(req) = pending else {
            return self.snapshot().await;
        };

        log::info!(
            "submitting id={} mode={} provider={}",
            req.id,
            req.body.mode,
            req.body.llm_provider.as_str()
        );
        let outcome = self.transport.submit(&req.body).await;

        let mut state = self.state.lock().await;
        state.complete(req.id, outcome);
        state.clone()
    }

    /// Copies code block `index` (counted among code blocks) of the current result.
    pub async fn copy_code(&self, index: usize) -> bool {
        let content = {
            let state = self.state.lock().await;
            code_blocks(state.segments())
                .find(|(i, _)| *i == index)
                .map(|(_, s)| s.content.clone())
        };

        match content {
            Some(content) => self.copy.copy(index, &content).await,
            None => {
                log::warn!("no code block at index {index}");
                false
            }
        }
    }
}
