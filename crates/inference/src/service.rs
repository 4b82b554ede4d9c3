use crate::{
    backend::{InferenceBackend, PoseOutput},
    config::PoseConfig,
    processing::{
        decode::{ViewTransform, decode_pose},
        pre::PreProcessor,
    },
};
use capture::{Frame, FrameSource};
use pose::Person;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Single-in-flight guard for a capture session.
///
/// At most one frame moves through preprocess → infer → decode at a time;
/// a frame arriving while the guard is held is dropped, never queued. This
/// also serializes `infer` calls, which share the engine's scratch buffers.
pub struct FrameGate {
    busy: AtomicBool,
}

impl FrameGate {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    pub fn try_acquire(&self) -> Option<FrameGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| FrameGuard { gate: self })
    }
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FrameGuard<'a> {
    gate: &'a FrameGate,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// Outcome of submitting one frame to the pipeline.
#[derive(Debug)]
pub enum Submission {
    /// Frame decoded successfully.
    Pose(Person),
    /// A per-frame failure (resize, inference or decode); the pipeline
    /// stays usable, the consumer keeps its previous state this tick.
    NoPose,
    /// A previous frame was still in flight; this one was discarded.
    Dropped,
}

#[derive(Debug, Default)]
pub struct PipelineStats {
    pub processed: u64,
    pub dropped: u64,
    pub failed: u64,
}

pub struct PoseService<B: InferenceBackend> {
    backend: B,
    preprocessor: PreProcessor,
    transform: ViewTransform,
    gate: Arc<FrameGate>,
}

impl<B: InferenceBackend> PoseService<B> {
    pub fn new(backend: B, config: &PoseConfig) -> Self {
        let preprocessor = PreProcessor::new(config.input_size);
        let transform = ViewTransform {
            input_width: config.input_size.0,
            input_height: config.input_size.1,
            view_width: config.view_size.0,
            view_height: config.view_size.1,
        };
        Self {
            backend,
            preprocessor,
            transform,
            gate: Arc::new(FrameGate::new()),
        }
    }

    /// Submit one frame. Per-frame failures are absorbed here: nothing
    /// below this boundary propagates as an error across frames.
    ///
    /// `&mut self` already serializes callers on one thread, so `Dropped`
    /// only occurs when a push-style capture layer calls in from its own
    /// thread while a previous frame still holds the gate.
    pub fn submit(&mut self, frame: &Frame) -> Submission {
        let gate = Arc::clone(&self.gate);
        let Some(_guard) = gate.try_acquire() else {
            tracing::trace!(frame_number = frame.frame_number, "Frame dropped, pipeline busy");
            return Submission::Dropped;
        };

        match self.try_process(frame) {
            Ok(person) => Submission::Pose(person),
            Err(e) => {
                tracing::warn!(
                    frame_number = frame.frame_number,
                    error = %e,
                    "No pose this frame"
                );
                Submission::NoPose
            }
        }
    }

    fn try_process(&mut self, frame: &Frame) -> anyhow::Result<Person> {
        let span = tracing::info_span!("pose_process_frame", frame_number = frame.frame_number);
        let _enter = span.enter();

        let input = self.preprocessor.preprocess_frame(
            frame.pixels(),
            frame.width,
            frame.height,
            frame.format,
        )?;

        let PoseOutput { heatmaps, offsets } = {
            let _infer_span = tracing::info_span!("model_inference").entered();
            self.backend.infer(&input)?
        };

        decode_pose(&heatmaps.view(), &offsets.view(), &self.transform)
    }

    /// Pull frames from a source until it is exhausted, handing each decoded
    /// pose to the consumer.
    pub fn run<S, F>(mut self, mut source: S, mut on_pose: F) -> anyhow::Result<PipelineStats>
    where
        S: FrameSource,
        F: FnMut(&Person),
    {
        let mut stats = PipelineStats::default();

        while let Some(frame) = source.next_frame()? {
            match self.submit(&frame) {
                Submission::Pose(person) => {
                    stats.processed += 1;
                    on_pose(&person);
                }
                Submission::NoPose => stats.failed += 1,
                Submission::Dropped => stats.dropped += 1,
            }

            if stats.processed > 0 && stats.processed.is_multiple_of(30) {
                tracing::debug!(
                    processed = stats.processed,
                    dropped = stats.dropped,
                    failed = stats.failed,
                    "Pipeline progress"
                );
            }
        }

        tracing::info!(
            processed = stats.processed,
            dropped = stats.dropped,
            failed = stats.failed,
            "Frame source exhausted"
        );
        Ok(stats)
    }
}
