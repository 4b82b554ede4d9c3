use std::env;

pub use common::Environment;

#[derive(Debug, Clone)]
pub struct PoseConfig {
    pub environment: Environment,
    pub model_path: String,
    pub input_size: (u32, u32),
    pub view_size: (f32, f32),
    pub smoke_frames: u64,
}

impl PoseConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let model_path =
            env::var("MODEL_PATH").unwrap_or_else(|_| "models/posenet_mobilenet.onnx".to_string());

        let input_width = env::var("INPUT_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(257);

        let input_height = env::var("INPUT_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(257);

        let view_width = env::var("VIEW_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(input_width as f32);

        let view_height = env::var("VIEW_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(input_height as f32);

        let smoke_frames = env::var("SMOKE_FRAMES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);

        Ok(Self {
            environment,
            model_path,
            input_size: (input_width, input_height),
            view_size: (view_width, view_height),
            smoke_frames,
        })
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            model_path: "models/posenet_mobilenet.onnx".to_string(),
            input_size: (257, 257),
            view_size: (257.0, 257.0),
            smoke_frames: 10,
        }
    }
}
