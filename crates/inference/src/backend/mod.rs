use ndarray::ArrayD;

#[cfg(feature = "ort-backend")]
pub mod ort;

pub trait InferenceBackend {
    /// Load the packaged model artifact. A missing or unparseable artifact
    /// is a startup-time fatal condition, not a per-frame error.
    fn load_model(path: &str) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run one forward pass over a `[1, H, W, 3]` input tensor.
    ///
    /// A runtime failure means "no result this frame"; the backend stays
    /// usable for the next call.
    fn infer(&mut self, input: &ArrayD<f32>) -> anyhow::Result<PoseOutput>;
}

/// Raw output tensors of one forward pass, owned by the caller.
pub struct PoseOutput {
    pub heatmaps: ArrayD<f32>, // [1, H, W, 17] per-part activation grid
    pub offsets: ArrayD<f32>,  // [1, H, W, 34] y-offsets then x-offsets
}
