use super::{InferenceBackend, PoseOutput};
use ndarray::ArrayD;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};

pub struct OrtBackend {
    session: Session,
    input_name: String,
    heatmap_output: String,
    offset_output: String,
}

impl InferenceBackend for OrtBackend {
    fn load_model(path: &str) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)?;

        anyhow::ensure!(
            !session.inputs().is_empty(),
            "pose model exposes no input tensor"
        );
        anyhow::ensure!(
            session.outputs().len() >= 2,
            "pose model must expose heatmap and offset outputs, found {}",
            session.outputs().len()
        );

        // Output 0 = heatmaps, output 1 = offsets; bind by recorded name.
        let input_name = session.inputs()[0].name().to_string();
        let heatmap_output = session.outputs()[0].name().to_string();
        let offset_output = session.outputs()[1].name().to_string();

        tracing::info!(
            input = %input_name,
            heatmaps = %heatmap_output,
            offsets = %offset_output,
            "Model loaded from {}",
            path
        );

        Ok(Self {
            session,
            input_name,
            heatmap_output,
            offset_output,
        })
    }

    fn infer(&mut self, input: &ArrayD<f32>) -> anyhow::Result<PoseOutput> {
        let outputs = self.session.run(ort::inputs![
            self.input_name.as_str() => TensorRef::from_array_view(input.view())?
        ])?;

        let heatmaps = outputs[self.heatmap_output.as_str()].try_extract_array()?;
        let offsets = outputs[self.offset_output.as_str()].try_extract_array()?;

        Ok(PoseOutput {
            heatmaps: heatmaps.into_owned(),
            offsets: offsets.into_owned(),
        })
    }
}
