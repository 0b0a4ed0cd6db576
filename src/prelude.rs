pub use crate::peak::{Island, KeptPeak, Sample};
pub use crate::pipeline::{DetectionMode, PeakDetector, PipelineError, PipelineResult};
