use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long a code block shows as copied.
pub const COPY_RESET_DELAY: Duration = Duration::from_millis(1500);

/// Destination for copied code. The platform side effect lives behind this.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

struct Mark {
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Marks {
    next_generation: u64,
    by_index: HashMap<usize, Mark>,
}

/// Per-code-block "copied" flags, each cleared by its own cancellable timer.
///
/// Indexes count code blocks only, in render order.
#[derive(Clone)]
pub struct CopyIndicator {
    clipboard: Arc<dyn Clipboard>,
    marks: Arc<Mutex<Marks>>,
    reset_after: Duration,
}

impl CopyIndicator {
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self::with_delay(clipboard, COPY_RESET_DELAY)
    }

    pub fn with_delay(clipboard: Arc<dyn Clipboard>, reset_after: Duration) -> Self {
        Self {
            clipboard,
            marks: Arc::new(Mutex::new(Marks::default())),
            reset_after,
        }
    }

    /// Writes `content` to the clipboard and marks block `index` as copied.
    ///
    /// Must run inside a tokio runtime. A clipboard failure is logged and
    /// leaves every flag as it was.
    pub async fn copy(&self, index: usize, content: &str) -> bool {
        if let Err(e) = self.clipboard.write_text(content).await {
            log::error!("failed to copy to clipboard: {e:#}");
            return false;
        }
        self.mark(index);
        true
    }

    pub fn is_copied(&self, index: usize) -> bool {
        lock(&self.marks).by_index.contains_key(&index)
    }

    pub fn copied_indices(&self) -> Vec<usize> {
        let mut out: Vec<usize> = lock(&self.marks).by_index.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// Drops every flag and cancels the pending resets.
    pub fn clear(&self) {
        for (_, mark) in lock(&self.marks).by_index.drain() {
            mark.timer.abort();
        }
    }

    fn mark(&self, index: usize) {
        let mut marks = lock(&self.marks);
        marks.next_generation = marks.next_generation.wrapping_add(1);
        let generation = marks.next_generation;

        let shared = Arc::clone(&self.marks);
        let delay = self.reset_after;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut marks = lock(&shared);
            // A newer copy of the same block owns the flag now.
            if marks
                .by_index
                .get(&index)
                .is_some_and(|m| m.generation == generation)
            {
                marks.by_index.remove(&index);
            }
        });

        if let Some(prev) = marks.by_index.insert(index, Mark { generation, timer }) {
            prev.timer.abort();
        }
    }
}

fn lock(marks: &Mutex<Marks>) -> MutexGuard<'_, Marks> {
    marks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
