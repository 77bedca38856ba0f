use crate::error::EngineResult;

use super::Fence;

/// First value handed out by a fresh gate. The fence itself starts at 0.
pub const INITIAL_FENCE_VALUE: u64 = 1;

/// Monotonic fence counter plus the blocking wait on it.
///
/// Guarantees the CPU never reuses a frame slot's buffers before the GPU is done
/// reading them. The default usage is a full drain after every submission
/// (`signal_and_wait`); the split `signal` / `wait_for` pair lets the frame
/// pipeline wait only on the value last associated with a slot instead.
#[derive(Debug)]
pub struct SyncGate<F: Fence> {
    fence: F,
    next_value: u64,
    signals_issued: u64,
    released: bool,
}

impl<F: Fence> SyncGate<F> {
    pub fn new(fence: F) -> Self {
        Self::with_initial_value(fence, INITIAL_FENCE_VALUE)
    }

    pub fn with_initial_value(fence: F, initial: u64) -> Self {
        Self {
            fence,
            next_value: initial,
            signals_issued: 0,
            released: false,
        }
    }

    /// Value the next `signal` will use.
    #[inline]
    pub fn next_value(&self) -> u64 {
        self.next_value
    }

    /// Number of signals issued since construction.
    #[inline]
    pub fn signals_issued(&self) -> u64 {
        self.signals_issued
    }

    #[inline]
    pub fn completed_value(&self) -> u64 {
        self.fence.completed_value()
    }

    pub fn fence(&self) -> &F {
        &self.fence
    }

    #[cfg(test)]
    pub(crate) fn fence_mut(&mut self) -> &mut F {
        &mut self.fence
    }

    /// Enqueues a signal for everything submitted so far and returns its value.
    pub fn signal(&mut self) -> EngineResult<u64> {
        let target = self.next_value;
        self.fence.signal(target)?;
        self.next_value += 1;
        self.signals_issued += 1;
        log::trace!("fence signal {target}");
        Ok(target)
    }

    /// Blocks until the fence has reached `value`. Returns immediately when the
    /// GPU is already past it.
    pub fn wait_for(&mut self, value: u64) -> EngineResult<()> {
        if self.fence.completed_value() < value {
            self.fence.wait(value)?;
        }
        Ok(())
    }

    /// Full CPU/GPU drain: signal a new value, then wait for it.
    ///
    /// After this returns no previously submitted GPU work is in flight.
    pub fn signal_and_wait(&mut self) -> EngineResult<u64> {
        let target = self.signal()?;
        self.wait_for(target)?;
        Ok(target)
    }

    /// Releases the fence's wait primitive. Idempotent.
    pub fn release(&mut self) {
        if !self.released {
            self.fence.release();
            self.released = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    /// Fence whose GPU side only advances when told to (or when waited on).
    #[derive(Debug, Default)]
    pub(crate) struct ManualFence {
        pub completed: u64,
        pub signaled: Vec<u64>,
        pub waits: Vec<u64>,
        pub complete_on_signal: bool,
        pub fail_signal: bool,
        pub fail_wait: bool,
        pub releases: u32,
    }

    impl Fence for ManualFence {
        fn signal(&mut self, value: u64) -> EngineResult<()> {
            if self.fail_signal {
                return Err(EngineError::FenceSignal { value, detail: "queue removed".into() });
            }
            self.signaled.push(value);
            if self.complete_on_signal {
                self.completed = value;
            }
            Ok(())
        }

        fn completed_value(&self) -> u64 {
            self.completed
        }

        fn wait(&mut self, value: u64) -> EngineResult<()> {
            if self.fail_wait {
                return Err(EngineError::FenceWait { value, detail: "event lost".into() });
            }
            self.waits.push(value);
            self.completed = self.completed.max(value);
            Ok(())
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    // ── signal_and_wait ───────────────────────────────────────────────────

    #[test]
    fn counter_advances_by_one_per_drain() {
        let mut gate = SyncGate::new(ManualFence::default());
        for n in 1..=25u64 {
            let waited = gate.signal_and_wait().unwrap();
            assert_eq!(waited, INITIAL_FENCE_VALUE + n - 1);
            assert_eq!(gate.next_value(), INITIAL_FENCE_VALUE + n);
        }
        assert_eq!(gate.signals_issued(), 25);
        assert_eq!(gate.fence().signaled, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn drain_blocks_until_target_reached() {
        let mut gate = SyncGate::new(ManualFence::default());
        gate.signal_and_wait().unwrap();
        assert_eq!(gate.fence().waits, vec![1]);
        assert_eq!(gate.completed_value(), 1);
    }

    #[test]
    fn no_wait_when_gpu_already_done() {
        let fence = ManualFence { complete_on_signal: true, ..Default::default() };
        let mut gate = SyncGate::new(fence);
        gate.signal_and_wait().unwrap();
        gate.signal_and_wait().unwrap();
        assert!(gate.fence().waits.is_empty());
    }

    // ── split signal / wait ───────────────────────────────────────────────

    #[test]
    fn wait_for_old_value_is_a_no_op() {
        let mut gate = SyncGate::new(ManualFence::default());
        let a = gate.signal().unwrap();
        let b = gate.signal().unwrap();
        gate.wait_for(b).unwrap();
        gate.wait_for(a).unwrap();
        assert_eq!(gate.fence().waits, vec![b]);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn failed_signal_does_not_advance_counter() {
        let fence = ManualFence { fail_signal: true, ..Default::default() };
        let mut gate = SyncGate::new(fence);
        let err = gate.signal_and_wait().unwrap_err();
        assert_eq!(err.operation(), "fence signal");
        assert_eq!(gate.next_value(), INITIAL_FENCE_VALUE);
    }

    #[test]
    fn failed_wait_is_reported_with_value() {
        let fence = ManualFence { fail_wait: true, ..Default::default() };
        let mut gate = SyncGate::new(fence);
        let err = gate.signal_and_wait().unwrap_err();
        assert_eq!(err, EngineError::FenceWait { value: 1, detail: "event lost".into() });
    }

    #[test]
    fn release_is_idempotent() {
        let mut gate = SyncGate::new(ManualFence::default());
        gate.release();
        gate.release();
        assert_eq!(gate.fence().releases, 1);
    }
}
