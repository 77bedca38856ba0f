/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; acquisition may be retried.
    Reconfigured,
    /// Transient error; acquisition may be retried.
    Retry,
    /// The surface cannot be recovered.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn is_recoverable(self) -> bool {
        !matches!(self, Self::Fatal)
    }
}
