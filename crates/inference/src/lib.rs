pub mod backend;
pub mod config;
pub mod logging;
pub mod processing;
pub mod service;

// Re-export commonly used types for convenience
pub use backend::{InferenceBackend, PoseOutput};
pub use config::PoseConfig;
pub use processing::decode::{ViewTransform, decode_pose};
pub use processing::pre::PreProcessor;
pub use service::{FrameGate, PoseService, Submission};
