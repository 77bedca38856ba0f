use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{EngineError, EngineResult};

use super::Fence;

/// Signaled values the GPU has not been seen to reach, oldest first.
#[derive(Debug)]
struct PendingSignals<I> {
    entries: VecDeque<(u64, I)>,
}

impl<I> PendingSignals<I> {
    fn new() -> Self {
        Self { entries: VecDeque::new() }
    }

    fn last_value(&self) -> Option<u64> {
        self.entries.back().map(|(v, _)| *v)
    }

    fn push(&mut self, value: u64, index: I) {
        self.entries.push_back((value, index));
    }

    /// Drops every entry at or below `value`.
    fn retire_through(&mut self, value: u64) {
        while self.entries.front().is_some_and(|(v, _)| *v <= value) {
            self.entries.pop_front();
        }
    }

    /// Oldest entry covering `value`.
    fn covering(&self, value: u64) -> Option<&I> {
        self.entries.iter().find(|(v, _)| *v >= value).map(|(_, index)| index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// `Fence` over a wgpu queue.
///
/// wgpu has no user-visible fence object. A signal is an empty submission: its
/// index covers every batch submitted before it, and `on_submitted_work_done`
/// raises the completed value once the GPU gets there. Waiting is a blocking
/// device poll on that submission index.
pub struct QueueFence {
    device: wgpu::Device,
    queue: wgpu::Queue,
    completed: Arc<AtomicU64>,
    pending: PendingSignals<wgpu::SubmissionIndex>,
    released: bool,
}

impl QueueFence {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            completed: Arc::new(AtomicU64::new(0)),
            pending: PendingSignals::new(),
            released: false,
        }
    }

    fn retire_through(&mut self, value: u64) {
        self.completed.fetch_max(value, Ordering::AcqRel);
        self.pending.retire_through(value);
    }
}

impl Fence for QueueFence {
    fn signal(&mut self, value: u64) -> EngineResult<()> {
        if self.released {
            return Err(EngineError::FenceSignal {
                value,
                detail: "fence already released".into(),
            });
        }
        if let Some(last) = self.pending.last_value() {
            if last >= value {
                return Err(EngineError::FenceSignal {
                    value,
                    detail: format!("value is not greater than pending value {last}"),
                });
            }
        }

        // Completion callbacks fire during queue maintenance, so values can be
        // reached without ever being waited on.
        self.pending.retire_through(self.completed_value());

        let index = self.queue.submit(std::iter::empty());

        let completed = Arc::clone(&self.completed);
        self.queue.on_submitted_work_done(move || {
            completed.fetch_max(value, Ordering::AcqRel);
        });

        self.pending.push(value, index);
        Ok(())
    }

    fn completed_value(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    fn wait(&mut self, value: u64) -> EngineResult<()> {
        let Some(index) = self.pending.covering(value).cloned() else {
            if self.completed_value() >= value {
                return Ok(());
            }
            return Err(EngineError::FenceWait {
                value,
                detail: "value was never signaled".into(),
            });
        };

        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(index),
                timeout: None,
            })
            .map_err(|e| EngineError::FenceWait {
                value,
                detail: e.to_string(),
            })?;

        self.retire_through(value);
        Ok(())
    }

    fn release(&mut self) {
        log::debug!(
            "queue fence released at value {} with {} signals pending",
            self.completed_value(),
            self.pending.len()
        );
        self.pending.clear();
        self.released = true;
    }
}
