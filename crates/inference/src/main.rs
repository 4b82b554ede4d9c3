use capture::{PixelFormat, SyntheticSource};
use inference::{PoseConfig, PoseService, backend::InferenceBackend, logging::setup_logging};

#[cfg(feature = "ort-backend")]
use inference::backend::ort::OrtBackend as Backend;

#[cfg(not(feature = "ort-backend"))]
compile_error!("The 'ort-backend' feature must be enabled to build the pipeline binary");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PoseConfig::from_env()?;

    setup_logging(&config);

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    tracing::info!("Loading pose model");
    let backend = Backend::load_model(&config.model_path)?;
    tracing::info!("Model loaded successfully");

    // Smoke run over generated frames; the mobile capture layer delivers
    // real buffers through the same FrameSource seam.
    let source = SyntheticSource::new(640, 480, PixelFormat::Bgra, config.smoke_frames);

    let service = PoseService::new(backend, &config);
    let stats = service.run(source, |person| {
        tracing::debug!(score = person.score, "Pose decoded");
    })?;

    tracing::info!(
        processed = stats.processed,
        dropped = stats.dropped,
        failed = stats.failed,
        "Smoke run complete"
    );
    Ok(())
}
