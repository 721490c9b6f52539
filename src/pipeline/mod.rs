//! Pipeline orchestrator — turns host notifications and parameter snapshots
//! into a playback sequence and policy.
//!
//! Every call to [`PipelineOrchestrator::process`] makes sure the model is
//! loaded, folds the host event into the groove grid, decides whether a new
//! pattern is needed, and reports two independent "has new value" flags: one
//! for the policy, one for the sequence.
//!
//! Model calls go through an [`InferenceBackend`]. Each request carries a
//! generation number; a result is only applied if its generation is still
//! the newest one issued, so a superseded pattern can never overwrite a newer
//! one.

pub mod backend;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{EngineConfig, InferenceMode};
use crate::event::HostEvent;
use crate::groove::{GrooveGrid, GrooveQuantizer};
use crate::model::{GeneratedPattern, LatentVector, ModelLoader, SamplingParams};
use crate::params::ParamSnapshot;
use crate::sequence::{
    PlaybackPolicy, PlaybackPolicyConfigurator, PlaybackSequence, SequenceBuilder,
};
use crate::voice::VoiceMap;

pub use backend::{
    run_job, InferenceBackend, InferenceJob, InferenceRequest, InferenceResult, InlineBackend,
    WorkerBackend, WorkerError,
};

/// Where the orchestrator is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No model has loaded yet.
    ModelNotReady,
    /// Model loaded, nothing generated.
    Idle,
    /// The groove changed and a pattern for it is pending.
    GrooveDirty,
    /// A pattern for the current groove is held. It is turned into a sequence
    /// in the pass it arrives and again on every voice remap.
    PatternReady,
}

/// Flags returned from each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOutput {
    pub policy_changed: bool,
    pub sequence_changed: bool,
}

impl PipelineOutput {
    pub const NONE: PipelineOutput = PipelineOutput {
        policy_changed: false,
        sequence_changed: false,
    };

    const CLEARED: PipelineOutput = PipelineOutput {
        policy_changed: false,
        sequence_changed: true,
    };

    const REBUILT: PipelineOutput = PipelineOutput {
        policy_changed: true,
        sequence_changed: true,
    };

    /// `(policy_changed, sequence_changed)`.
    pub fn as_pair(self) -> (bool, bool) {
        (self.policy_changed, self.sequence_changed)
    }
}

/// Coordinates quantization, inference and sequence building.
pub struct PipelineOrchestrator {
    loader: Box<dyn ModelLoader>,
    backend: Box<dyn InferenceBackend>,
    model_file: String,
    model_ready: bool,
    load_failures: u32,

    quantizer: GrooveQuantizer,
    params: ParamSnapshot,
    sampling: SamplingParams,
    rng: ChaCha8Rng,

    /// The groove or density changed and no request for it has been issued.
    groove_dirty: bool,
    /// Newest generation issued. Results with any other tag are stale.
    generation: u64,
    in_flight: bool,

    pattern: Option<GeneratedPattern>,
    sequence: PlaybackSequence,
    policy: PlaybackPolicy,
}

impl PipelineOrchestrator {
    /// Build an orchestrator over an explicit backend.
    pub fn new(
        loader: Box<dyn ModelLoader>,
        backend: Box<dyn InferenceBackend>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            loader,
            backend,
            model_file: config.model_file.clone(),
            model_ready: false,
            load_failures: 0,
            quantizer: GrooveQuantizer::new(),
            params: config.initial_params(),
            sampling: SamplingParams::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            groove_dirty: false,
            generation: 0,
            in_flight: false,
            pattern: None,
            sequence: PlaybackSequence::new(),
            policy: PlaybackPolicyConfigurator::configure(),
        }
    }

    /// Blocking inference on the calling thread.
    pub fn inline(loader: Box<dyn ModelLoader>, config: &EngineConfig) -> Self {
        Self::new(loader, Box::new(InlineBackend::new()), config)
    }

    /// Inference on a dedicated worker thread.
    pub fn with_worker(
        loader: Box<dyn ModelLoader>,
        config: &EngineConfig,
    ) -> Result<Self, WorkerError> {
        let backend = WorkerBackend::spawn(config.queue_capacity)?;
        Ok(Self::new(loader, Box::new(backend), config))
    }

    /// Pick the backend named by `config.inference`.
    pub fn from_config(
        loader: Box<dyn ModelLoader>,
        config: &EngineConfig,
    ) -> Result<Self, WorkerError> {
        match config.inference {
            InferenceMode::Inline => Ok(Self::inline(loader, config)),
            InferenceMode::Worker => Self::with_worker(loader, config),
        }
    }

    /// Handle one host notification with the current parameter values.
    pub fn process(&mut self, event: &HostEvent, params: &ParamSnapshot) -> PipelineOutput {
        let ready = self.ensure_model();

        let changes = params.diff(&self.params);
        self.params = *params;

        let event_arrived = match event.payload() {
            Some(payload) => {
                self.quantizer.apply(payload);
                true
            }
            None => false,
        };
        if event_arrived || changes.density {
            self.groove_dirty = true;
        }

        if !ready {
            return PipelineOutput::NONE;
        }

        let triggered = event_arrived || changes.any();
        if (triggered || self.groove_dirty) && self.quantizer.grid().is_empty() {
            return self.clear_for_empty_groove();
        }

        if self.groove_dirty {
            let job = InferenceJob::Encode {
                input: self.quantizer.to_model_input(),
                density: self.params.density,
            };
            // A rejected request leaves the groove dirty for the next pass.
            self.groove_dirty = !self.submit(job);
        }

        let fresh_pattern = self.collect_results();
        if fresh_pattern || (changes.voice_map() && self.pattern.is_some()) {
            self.rebuild();
            return PipelineOutput::REBUILT;
        }

        PipelineOutput::NONE
    }

    /// Sample a pattern from a random latent, ignoring the groove.
    ///
    /// With a worker backend the pattern arrives on a later `process` pass.
    pub fn generate_random(&mut self) -> PipelineOutput {
        if !self.ensure_model() {
            return PipelineOutput::NONE;
        }
        let latent = LatentVector::standard_normal(&mut self.rng);
        self.submit(InferenceJob::Random { latent });

        if self.collect_results() {
            self.rebuild();
            return PipelineOutput::REBUILT;
        }
        PipelineOutput::NONE
    }

    /// Try to load the model if it isn't loaded yet.
    fn ensure_model(&mut self) -> bool {
        if self.model_ready {
            return true;
        }

        match self.loader.load(&self.model_file) {
            Ok(model) => match self.backend.install(model) {
                Ok(()) => {
                    info!("model '{}' loaded", self.model_file);
                    self.model_ready = true;
                    self.load_failures = 0;
                }
                Err(e) => warn!("could not hand model to backend: {e}"),
            },
            Err(e) => {
                if self.load_failures == 0 {
                    warn!("{e}; will retry");
                } else {
                    debug!("{e} (attempt {})", self.load_failures + 1);
                }
                self.load_failures += 1;
            }
        }
        self.model_ready
    }

    /// Issue a request under a fresh generation. Returns whether it was accepted.
    fn submit(&mut self, job: InferenceJob) -> bool {
        let generation = self.generation + 1;
        let request = InferenceRequest {
            generation,
            job,
            sampling: self.sampling,
        };
        match self.backend.submit(request) {
            Ok(()) => {
                self.generation = generation;
                self.in_flight = true;
                true
            }
            Err(e) => {
                warn!("inference request dropped: {e}");
                false
            }
        }
    }

    /// Drain finished results, keeping only the current generation.
    fn collect_results(&mut self) -> bool {
        let mut fresh = false;
        while let Some(result) = self.backend.poll() {
            if result.generation != self.generation {
                debug!(
                    "discarding stale result {} (current {})",
                    result.generation, self.generation
                );
                continue;
            }
            self.in_flight = false;
            match result.outcome {
                Ok(pattern) => {
                    self.pattern = Some(pattern);
                    fresh = true;
                }
                Err(e) => warn!("inference failed: {e}"),
            }
        }
        fresh
    }

    fn clear_for_empty_groove(&mut self) -> PipelineOutput {
        debug!("groove is empty, clearing sequence");
        self.sequence.clear();
        self.pattern = None;
        self.groove_dirty = false;
        // Invalidate anything still running for the old groove.
        self.generation += 1;
        self.in_flight = false;
        PipelineOutput::CLEARED
    }

    fn rebuild(&mut self) {
        if let Some(pattern) = &self.pattern {
            info!("generating new sequence");
            self.sequence = SequenceBuilder::build(pattern, &self.params.voices);
            self.policy = PlaybackPolicyConfigurator::configure();
        }
    }

    pub fn state(&self) -> PipelineState {
        if !self.model_ready {
            PipelineState::ModelNotReady
        } else if self.groove_dirty || self.in_flight {
            PipelineState::GrooveDirty
        } else if self.pattern.is_some() {
            PipelineState::PatternReady
        } else {
            PipelineState::Idle
        }
    }

    pub fn is_model_ready(&self) -> bool {
        self.model_ready
    }

    pub fn sequence(&self) -> &PlaybackSequence {
        &self.sequence
    }

    pub fn policy(&self) -> &PlaybackPolicy {
        &self.policy
    }

    pub fn grid(&self) -> &GrooveGrid {
        self.quantizer.grid()
    }

    pub fn voice_map(&self) -> &VoiceMap {
        &self.params.voices
    }

    pub fn density(&self) -> f32 {
        self.params.density
    }

    /// The last applied pattern, if any.
    pub fn pattern(&self) -> Option<&GeneratedPattern> {
        self.pattern.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groove::ModelInput;
    use crate::model::{GenerativeModel, ModelError, SeededModelLoader};
    use crate::params::{ParamKey, DEFAULT_DENSITY};
    use crate::voice::Voice;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts calls and emits a kick on every groove hit step.
    struct CountingModel {
        encodes: Arc<AtomicUsize>,
        samples: Arc<AtomicUsize>,
    }

    impl GenerativeModel for CountingModel {
        fn encode(&self, input: &ModelInput, density: f32) -> Result<LatentVector, ModelError> {
            self.encodes.fetch_add(1, Ordering::SeqCst);
            let mut values = [0.0f32; crate::model::LATENT_DIM];
            for (step, v) in values.iter_mut().take(32).enumerate() {
                *v = input.get(step, crate::groove::HIT_CHANNEL);
            }
            values[127] = density;
            Ok(LatentVector::from_array(values))
        }

        fn sample(
            &self,
            latent: &LatentVector,
            _params: &SamplingParams,
        ) -> Result<GeneratedPattern, ModelError> {
            self.samples.fetch_add(1, Ordering::SeqCst);
            let mut pattern = GeneratedPattern::silent();
            for step in 0..32 {
                if latent.get(step) > 0.5 {
                    pattern.set(step, 0, 1.0, 0.9, 0.0);
                }
            }
            Ok(pattern)
        }
    }

    struct CountingLoader {
        encodes: Arc<AtomicUsize>,
        samples: Arc<AtomicUsize>,
        available: Arc<AtomicBool>,
        attempts: Arc<AtomicUsize>,
    }

    impl ModelLoader for CountingLoader {
        fn load(
            &self,
            file_name: &str,
        ) -> Result<Box<dyn GenerativeModel + Send>, ModelError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if !self.available.load(Ordering::SeqCst) {
                return Err(ModelError::load(file_name, "not found"));
            }
            Ok(Box::new(CountingModel {
                encodes: self.encodes.clone(),
                samples: self.samples.clone(),
            }))
        }
    }

    struct Harness {
        encodes: Arc<AtomicUsize>,
        samples: Arc<AtomicUsize>,
        available: Arc<AtomicBool>,
        attempts: Arc<AtomicUsize>,
    }

    impl Harness {
        fn new(available: bool) -> Self {
            Self {
                encodes: Arc::new(AtomicUsize::new(0)),
                samples: Arc::new(AtomicUsize::new(0)),
                available: Arc::new(AtomicBool::new(available)),
                attempts: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn loader(&self) -> Box<dyn ModelLoader> {
            Box::new(CountingLoader {
                encodes: self.encodes.clone(),
                samples: self.samples.clone(),
                available: self.available.clone(),
                attempts: self.attempts.clone(),
            })
        }

        fn orchestrator(&self) -> PipelineOrchestrator {
            PipelineOrchestrator::inline(self.loader(), &EngineConfig::default())
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.encodes.load(Ordering::SeqCst),
                self.samples.load(Ordering::SeqCst),
            )
        }
    }

    #[test]
    fn starts_not_ready() {
        let h = Harness::new(true);
        let orch = h.orchestrator();
        assert_eq!(orch.state(), PipelineState::ModelNotReady);
        assert!(orch.sequence().is_empty());
    }

    #[test]
    fn first_pass_loads_model() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let out = orch.process(&HostEvent::Absent, &ParamSnapshot::default());
        assert_eq!(out, PipelineOutput::NONE);
        assert!(orch.is_model_ready());
        assert_eq!(orch.state(), PipelineState::Idle);
    }

    #[test]
    fn note_on_generates_sequence() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let out = orch.process(&HostEvent::note_on(1.0, 0.8), &ParamSnapshot::default());
        assert_eq!(out.as_pair(), (true, true));
        assert_eq!(h.calls(), (1, 1));
        assert_eq!(orch.state(), PipelineState::PatternReady);
        let events = orch.sequence().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].note, 36);
        assert_eq!(events[0].onset.value(), 1.0);
    }

    #[test]
    fn empty_groove_short_circuits() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let out = orch.process(&HostEvent::first_buffer(), &ParamSnapshot::default());
        assert_eq!(out.as_pair(), (false, true));
        assert!(orch.sequence().is_empty());
        assert_eq!(h.calls(), (0, 0));
    }

    #[test]
    fn first_buffer_clears_previous_sequence() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(0.0, 0.8), &params);
        assert!(!orch.sequence().is_empty());

        let out = orch.process(&HostEvent::first_buffer(), &params);
        assert_eq!(out.as_pair(), (false, true));
        assert!(orch.sequence().is_empty());
        assert!(orch.pattern().is_none());
        assert_eq!(orch.state(), PipelineState::Idle);
    }

    #[test]
    fn grid_resets_before_note_of_same_event() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(0.0, 0.8), &params);
        orch.process(&HostEvent::first_buffer_note_on(2.0, 0.6), &params);
        assert!(!orch.grid().is_hit(0));
        assert!(orch.grid().is_hit(8));
        assert_eq!(orch.grid().hit_count(), 1);
    }

    #[test]
    fn absent_event_without_changes_is_quiet() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(0.0, 0.8), &params);
        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out, PipelineOutput::NONE);
        assert_eq!(h.calls(), (1, 1));
    }

    #[test]
    fn kick_remap_rebuilds_without_inference() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let mut params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(0.0, 0.8), &params);

        params.set(ParamKey::Voice(Voice::Kick), 35.0);
        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out.as_pair(), (true, true));
        assert_eq!(h.calls(), (1, 1));
        assert_eq!(orch.sequence().events()[0].note, 35);
        assert_eq!(orch.voice_map().kick, 35);
    }

    #[test]
    fn voice_remap_on_empty_groove_reports_cleared() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        orch.process(&HostEvent::Absent, &ParamSnapshot::default());
        orch.process(&HostEvent::note_on(0.0, 0.8), &ParamSnapshot::default());
        orch.process(&HostEvent::first_buffer(), &ParamSnapshot::default());

        // Grid is empty, so a remap reports a cleared sequence and nothing else.
        let mut params = ParamSnapshot::default();
        params.set(ParamKey::Voice(Voice::Snare), 40.0);
        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out.as_pair(), (false, true));
        assert_eq!(h.calls(), (1, 1));
    }

    #[test]
    fn density_change_reencodes() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let mut params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(0.0, 0.8), &params);

        params.set(ParamKey::Density, 0.9);
        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out.as_pair(), (true, true));
        assert_eq!(h.calls(), (2, 2));
        assert_eq!(orch.density(), 0.9);
    }

    #[test]
    fn nan_density_does_not_reencode() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let mut params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(0.0, 0.8), &params);

        params.set(ParamKey::Density, f64::NAN);
        for _ in 0..3 {
            let out = orch.process(&HostEvent::Absent, &params);
            assert_eq!(out, PipelineOutput::NONE);
        }
        assert_eq!(h.calls(), (1, 1));
        assert_eq!(orch.density(), DEFAULT_DENSITY);
        assert_eq!(orch.state(), PipelineState::PatternReady);
    }

    #[test]
    fn non_finite_note_leaves_grid_untouched() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        let params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(1.0, 0.8), &params);

        orch.process(&HostEvent::note_on(f64::INFINITY, 1.0), &params);
        orch.process(&HostEvent::note_on(1.0, f32::NAN), &params);
        assert_eq!(orch.grid().hit_count(), 1);
        assert_eq!(orch.grid().velocity(4), 0.8);
        assert!(orch.grid().offsets().iter().all(|o| o.is_finite()));
    }

    #[test]
    fn unready_model_reports_nothing_and_retries() {
        let h = Harness::new(false);
        let mut orch = h.orchestrator();
        let params = ParamSnapshot::default();

        let out = orch.process(&HostEvent::note_on(0.0, 0.8), &params);
        assert_eq!(out, PipelineOutput::NONE);
        assert_eq!(orch.state(), PipelineState::ModelNotReady);
        // The groove still accumulates while the model is missing.
        assert!(orch.grid().is_hit(0));

        orch.process(&HostEvent::Absent, &params);
        assert_eq!(h.attempts.load(Ordering::SeqCst), 2);
        assert_eq!(h.calls(), (0, 0));

        h.available.store(true, Ordering::SeqCst);
        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out.as_pair(), (true, true));
        assert_eq!(h.calls(), (1, 1));
        assert_eq!(h.attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn loaded_model_is_not_reloaded() {
        let h = Harness::new(true);
        let mut orch = h.orchestrator();
        for _ in 0..5 {
            orch.process(&HostEvent::Absent, &ParamSnapshot::default());
        }
        assert_eq!(h.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn generate_random_builds_sequence() {
        let mut orch = PipelineOrchestrator::inline(
            Box::new(SeededModelLoader::new(3)),
            &EngineConfig::default(),
        );
        let out = orch.generate_random();
        assert_eq!(out.as_pair(), (true, true));
        assert!(orch.pattern().is_some());
        assert_eq!(orch.policy(), &PlaybackPolicyConfigurator::configure());
    }

    #[test]
    fn generate_random_unready_is_quiet() {
        let h = Harness::new(false);
        let mut orch = h.orchestrator();
        assert_eq!(orch.generate_random(), PipelineOutput::NONE);
    }

    #[test]
    fn empty_groove_invalidates_in_flight_work() {
        let h = Harness::new(true);
        let config = EngineConfig::default();
        let mut orch = PipelineOrchestrator::new(
            h.loader(),
            Box::new(DeferredBackend::default()),
            &config,
        );
        let params = ParamSnapshot::default();

        orch.process(&HostEvent::note_on(0.0, 0.8), &params);
        assert_eq!(orch.state(), PipelineState::GrooveDirty);

        // The groove is cleared before the old request's result arrives.
        orch.process(&HostEvent::first_buffer(), &params);
        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out, PipelineOutput::NONE);
        assert!(orch.sequence().is_empty());
        assert!(orch.pattern().is_none());
    }

    /// Holds results until the pass after submission.
    #[derive(Default)]
    struct DeferredBackend {
        inner: InlineBackend,
        held: Vec<InferenceResult>,
        ready: Vec<InferenceResult>,
    }

    impl InferenceBackend for DeferredBackend {
        fn install(
            &mut self,
            model: Box<dyn GenerativeModel + Send>,
        ) -> Result<(), WorkerError> {
            self.inner.install(model)
        }

        fn submit(&mut self, request: InferenceRequest) -> Result<(), WorkerError> {
            self.inner.submit(request)?;
            while let Some(r) = self.inner.poll() {
                self.held.push(r);
            }
            Ok(())
        }

        fn poll(&mut self) -> Option<InferenceResult> {
            if self.ready.is_empty() {
                self.ready.append(&mut self.held);
                return None;
            }
            Some(self.ready.remove(0))
        }
    }

    #[test]
    fn deferred_result_is_applied_on_later_pass() {
        let h = Harness::new(true);
        let mut orch = PipelineOrchestrator::new(
            h.loader(),
            Box::new(DeferredBackend::default()),
            &EngineConfig::default(),
        );
        let params = ParamSnapshot::default();
        assert_eq!(
            orch.process(&HostEvent::note_on(0.0, 0.8), &params),
            PipelineOutput::NONE
        );
        assert_eq!(orch.state(), PipelineState::GrooveDirty);

        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out.as_pair(), (true, true));
        assert_eq!(orch.sequence().len(), 1);
        assert_eq!(orch.state(), PipelineState::PatternReady);
    }

    #[test]
    fn superseded_result_is_discarded() {
        let h = Harness::new(true);
        let mut orch = PipelineOrchestrator::new(
            h.loader(),
            Box::new(DeferredBackend::default()),
            &EngineConfig::default(),
        );
        let params = ParamSnapshot::default();
        orch.process(&HostEvent::note_on(0.0, 0.8), &params);
        // The first result surfaces here, after the second request was issued.
        let out = orch.process(&HostEvent::note_on(2.0, 0.8), &params);
        assert_eq!(out, PipelineOutput::NONE);
        assert!(orch.pattern().is_none());

        let out = orch.process(&HostEvent::Absent, &params);
        assert_eq!(out.as_pair(), (true, true));
        // Only the second request's pattern, which saw both notes, is applied.
        assert_eq!(orch.sequence().len(), 2);
    }

    #[test]
    fn seeded_model_end_to_end() {
        let mut orch = PipelineOrchestrator::inline(
            Box::new(SeededModelLoader::new(42)),
            &EngineConfig::default(),
        );
        let params = ParamSnapshot::default();
        orch.process(&HostEvent::first_buffer_note_on(0.0, 0.9), &params);
        orch.process(&HostEvent::note_on(1.0, 0.7), &params);
        let first = orch.sequence().clone();

        let mut again = PipelineOrchestrator::inline(
            Box::new(SeededModelLoader::new(42)),
            &EngineConfig::default(),
        );
        again.process(&HostEvent::first_buffer_note_on(0.0, 0.9), &params);
        again.process(&HostEvent::note_on(1.0, 0.7), &params);
        assert_eq!(again.sequence(), &first);
    }
}
