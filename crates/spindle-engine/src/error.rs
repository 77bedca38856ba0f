use std::fmt;

/// Failure of an engine operation.
///
/// Every variant is treated as permanent: the frame pipeline moves to its
/// faulted state on the first error and refuses further work. The composing
/// application decides whether to abort, log, or retry with another adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No adapter satisfied the selection rules (e.g. only software adapters).
    AdapterUnavailable(String),
    /// Logical device / queue creation failed.
    DeviceCreation(String),
    /// The drawable surface could not be created or configured.
    SurfaceCreation(String),
    /// A GPU resource could not be provided with the requested size/usage.
    ResourceAllocation { resource: &'static str, detail: String },
    /// The queue refused to signal the fence.
    FenceSignal { value: u64, detail: String },
    /// Registering or performing the completion wait failed.
    FenceWait { value: u64, detail: String },
    /// Recording or submitting the frame's commands failed.
    Submission(String),
    /// Acquiring or presenting the back buffer failed.
    Presentation(String),
    /// An operation was called in a pipeline state that does not allow it.
    InvalidState { operation: &'static str, state: &'static str },
    /// A previous error left the pipeline unusable.
    Faulted,
}

impl EngineError {
    /// Short name of the failing operation, for log lines and exit messages.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::AdapterUnavailable(_) => "adapter selection",
            Self::DeviceCreation(_) => "device creation",
            Self::SurfaceCreation(_) => "surface creation",
            Self::ResourceAllocation { .. } => "resource allocation",
            Self::FenceSignal { .. } => "fence signal",
            Self::FenceWait { .. } => "fence wait",
            Self::Submission(_) => "submission",
            Self::Presentation(_) => "presentation",
            Self::InvalidState { operation, .. } => *operation,
            Self::Faulted => "faulted pipeline",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdapterUnavailable(d) => write!(f, "no suitable GPU adapter: {d}"),
            Self::DeviceCreation(d) => write!(f, "failed to create GPU device: {d}"),
            Self::SurfaceCreation(d) => write!(f, "failed to create surface: {d}"),
            Self::ResourceAllocation { resource, detail } => {
                write!(f, "failed to allocate {resource}: {detail}")
            }
            Self::FenceSignal { value, detail } => {
                write!(f, "failed to signal fence value {value}: {detail}")
            }
            Self::FenceWait { value, detail } => {
                write!(f, "failed to wait for fence value {value}: {detail}")
            }
            Self::Submission(d) => write!(f, "command submission failed: {d}"),
            Self::Presentation(d) => write!(f, "presentation failed: {d}"),
            Self::InvalidState { operation, state } => {
                write!(f, "`{operation}` is not allowed while the pipeline is {state}")
            }
            Self::Faulted => write!(f, "frame pipeline is faulted by an earlier error"),
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
