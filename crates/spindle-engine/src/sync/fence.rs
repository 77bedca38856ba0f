use crate::error::EngineResult;

/// GPU/CPU completion counter bound to a command queue.
///
/// Values are only ever signaled in increasing order; `completed_value` never
/// goes backwards.
pub trait Fence {
    /// Asks the queue to set the fence to `value` once all work submitted so far
    /// has finished executing.
    fn signal(&mut self, value: u64) -> EngineResult<()>;

    /// Last value the GPU has reached.
    fn completed_value(&self) -> u64;

    /// Blocks the calling thread until the fence reaches `value`.
    ///
    /// No timeout: a hung device hangs the caller.
    fn wait(&mut self, value: u64) -> EngineResult<()>;

    /// Releases the OS-level wait primitive, if any. Called once at teardown.
    fn release(&mut self) {}
}
