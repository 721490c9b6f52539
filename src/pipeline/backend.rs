//! Inference backends — where the blocking model calls run.
//!
//! The orchestrator never calls the model directly. It submits an
//! [`InferenceRequest`] tagged with a generation number and later polls for
//! [`InferenceResult`]s. [`InlineBackend`] runs the request during `submit`,
//! so the result is ready by the next `poll` in the same pass.
//! [`WorkerBackend`] hands requests to a dedicated thread over a ring buffer
//! and sends results back over a second one.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};

use crate::groove::ModelInput;
use crate::model::{GenerativeModel, GeneratedPattern, LatentVector, ModelError, SamplingParams};

/// How long an idle worker sleeps before re-checking its queue.
const IDLE_WAIT: Duration = Duration::from_millis(5);

/// What the model should do.
#[derive(Debug, Clone)]
pub enum InferenceJob {
    /// Encode a groove at a density, then sample the resulting latent.
    Encode { input: ModelInput, density: f32 },
    /// Sample a latent drawn without a groove.
    Random { latent: LatentVector },
}

/// One unit of work for a backend.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Monotonic tag; results are only applied if it is still current.
    pub generation: u64,
    pub job: InferenceJob,
    pub sampling: SamplingParams,
}

/// A finished request.
#[derive(Debug)]
pub struct InferenceResult {
    pub generation: u64,
    pub outcome: Result<GeneratedPattern, ModelError>,
}

/// Run a request against a model.
pub fn run_job<M: GenerativeModel + ?Sized>(
    model: &M,
    request: &InferenceRequest,
) -> Result<GeneratedPattern, ModelError> {
    let latent = match &request.job {
        InferenceJob::Encode { input, density } => model.encode(input, *density)?,
        InferenceJob::Random { latent } => latent.clone(),
    };
    model.sample(&latent, &request.sampling)
}

/// Errors from a backend's queueing side.
#[derive(Debug)]
pub enum WorkerError {
    /// The request queue is full; the caller should retry later.
    QueueFull,
    /// The worker thread could not be started.
    Spawn(io::Error),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::QueueFull => write!(f, "inference queue is full"),
            WorkerError::Spawn(e) => write!(f, "failed to start inference worker: {e}"),
        }
    }
}

impl std::error::Error for WorkerError {}

/// Where model calls run.
pub trait InferenceBackend {
    /// Hand a freshly loaded model to the backend.
    fn install(&mut self, model: Box<dyn GenerativeModel + Send>) -> Result<(), WorkerError>;

    /// Queue a request.
    fn submit(&mut self, request: InferenceRequest) -> Result<(), WorkerError>;

    /// Take the next finished result, if any.
    fn poll(&mut self) -> Option<InferenceResult>;
}

/// Runs every request synchronously inside `submit`.
#[derive(Default)]
pub struct InlineBackend {
    model: Option<Box<dyn GenerativeModel + Send>>,
    finished: VecDeque<InferenceResult>,
}

impl InlineBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InferenceBackend for InlineBackend {
    fn install(&mut self, model: Box<dyn GenerativeModel + Send>) -> Result<(), WorkerError> {
        self.model = Some(model);
        Ok(())
    }

    fn submit(&mut self, request: InferenceRequest) -> Result<(), WorkerError> {
        let outcome = match self.model.as_deref() {
            Some(model) => run_job(model, &request),
            None => Err(ModelError::Unavailable),
        };
        self.finished.push_back(InferenceResult {
            generation: request.generation,
            outcome,
        });
        Ok(())
    }

    fn poll(&mut self) -> Option<InferenceResult> {
        self.finished.pop_front()
    }
}

/// Messages to the worker thread.
enum WorkerCommand {
    Install(Box<dyn GenerativeModel + Send>),
    Run(InferenceRequest),
}

/// Runs requests on a dedicated thread.
///
/// Requests that pile up while the worker is busy are coalesced: only the
/// newest one runs, since the others would be stale by the time they finish.
pub struct WorkerBackend {
    commands: HeapProd<WorkerCommand>,
    results: HeapCons<InferenceResult>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerBackend {
    /// Start the worker with room for `capacity` queued commands and results.
    pub fn spawn(capacity: usize) -> Result<Self, WorkerError> {
        let capacity = capacity.max(1);
        let (commands, command_rx) = HeapRb::<WorkerCommand>::new(capacity).split();
        let (result_tx, results) = HeapRb::<InferenceResult>::new(capacity).split();

        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();

        let thread = thread::Builder::new()
            .name("drumloop-inference".to_string())
            .spawn(move || worker_loop(command_rx, result_tx, stop_clone))
            .map_err(WorkerError::Spawn)?;
        debug!("inference worker started (capacity {capacity})");

        Ok(Self {
            commands,
            results,
            stop_flag,
            thread: Some(thread),
        })
    }

    fn send(&mut self, command: WorkerCommand) -> Result<(), WorkerError> {
        self.commands
            .try_push(command)
            .map_err(|_| WorkerError::QueueFull)?;
        if let Some(thread) = &self.thread {
            thread.thread().unpark();
        }
        Ok(())
    }

    /// Stop the worker and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            let _ = thread.join();
            debug!("inference worker stopped");
        }
    }
}

impl InferenceBackend for WorkerBackend {
    fn install(&mut self, model: Box<dyn GenerativeModel + Send>) -> Result<(), WorkerError> {
        self.send(WorkerCommand::Install(model))
    }

    fn submit(&mut self, request: InferenceRequest) -> Result<(), WorkerError> {
        self.send(WorkerCommand::Run(request))
    }

    fn poll(&mut self) -> Option<InferenceResult> {
        self.results.try_pop()
    }
}

impl Drop for WorkerBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(
    mut commands: HeapCons<WorkerCommand>,
    mut results: HeapProd<InferenceResult>,
    stop: Arc<AtomicBool>,
) {
    let mut model: Option<Box<dyn GenerativeModel + Send>> = None;

    while !stop.load(Ordering::Relaxed) {
        let mut latest: Option<InferenceRequest> = None;
        while let Some(command) = commands.try_pop() {
            match command {
                WorkerCommand::Install(m) => model = Some(m),
                WorkerCommand::Run(request) => {
                    if let Some(skipped) = latest.replace(request) {
                        debug!("coalescing request {}", skipped.generation);
                    }
                }
            }
        }

        let Some(request) = latest else {
            thread::park_timeout(IDLE_WAIT);
            continue;
        };

        let outcome = match model.as_deref() {
            Some(m) => run_job(m, &request),
            None => Err(ModelError::Unavailable),
        };
        let mut result = InferenceResult {
            generation: request.generation,
            outcome,
        };

        // The consumer drains on every pass; wait for room rather than drop.
        loop {
            match results.try_push(result) {
                Ok(()) => break,
                Err(back) => {
                    if stop.load(Ordering::Relaxed) {
                        return;
                    }
                    result = back;
                    thread::park_timeout(IDLE_WAIT);
                }
            }
        }
    }
}
