use crate::analysis::jitter::{perturb, Noise};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::image_classifier::interface::Prediction;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type SessionId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Camera,
    Upload,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassifierStatus {
    Loading,
    Ready,
    Failed(AnalysisError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Acquiring,
    Running,
    Finalizing,
    Done,
}

/// The state tag the presenter sees. `Acquiring` still counts as `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Finalizing,
    Done,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinalResult {
    pub label: String,
    pub probability: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub mode: Mode,
    pub phase: Phase,
    pub started_at: Option<Instant>,
    pub elapsed_seconds: Option<f64>,
    pub latest_predictions: Vec<Prediction>,
    pub final_result: Option<FinalResult>,
    pub is_running: bool,
    issued_seq: u64,
    applied_seq: u64,
}

impl Session {
    fn new(id: SessionId, mode: Mode) -> Self {
        Self {
            id,
            mode,
            phase: Phase::Acquiring,
            started_at: None,
            elapsed_seconds: None,
            latest_predictions: vec![],
            final_result: None,
            is_running: false,
            issued_seq: 0,
            applied_seq: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub classifier: ClassifierStatus,
    pub session: Option<Session>,
    pub notice: Option<AnalysisError>,
    last_session_id: SessionId,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            classifier: ClassifierStatus::Loading,
            session: None,
            notice: None,
            last_session_id: 0,
        }
    }
}

impl Model {
    pub fn state(&self) -> State {
        match self.session.as_ref().map(|s| s.phase) {
            None | Some(Phase::Acquiring) => State::Idle,
            Some(Phase::Running) => State::Running,
            Some(Phase::Finalizing) => State::Finalizing,
            Some(Phase::Done) => State::Done,
        }
    }

    pub fn can_start(&self) -> bool {
        self.classifier == ClassifierStatus::Ready
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.session.as_mut().filter(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ModelLoadDone(Result<(), AnalysisError>),
    CameraSelected,
    UploadSelected {
        bytes: Arc<Vec<u8>>,
    },
    SourceAcquireDone {
        session: SessionId,
        result: Result<Instant, AnalysisError>,
    },
    Tick {
        session: SessionId,
    },
    TickPredictDone {
        session: SessionId,
        seq: u64,
        result: Result<Vec<Prediction>, AnalysisError>,
    },
    Deadline {
        session: SessionId,
    },
    FinalPredictDone {
        session: SessionId,
        result: Result<Vec<Prediction>, AnalysisError>,
        at: Instant,
    },
    Shutdown,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::UploadSelected { bytes } => format!("UploadSelected({} bytes)", bytes.len()),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadModel,
    AcquireCamera {
        session: SessionId,
        width: u32,
        height: u32,
        mirror: bool,
    },
    DecodeUpload {
        session: SessionId,
        bytes: Arc<Vec<u8>>,
        width: u32,
        height: u32,
    },
    StartTicker {
        session: SessionId,
        period: Duration,
    },
    StopTicker,
    ScheduleDeadline {
        session: SessionId,
        after: Duration,
    },
    CancelDeadline,
    Predict {
        session: SessionId,
        seq: u64,
    },
    FinalPredict {
        session: SessionId,
    },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::DecodeUpload {
                session,
                bytes,
                width,
                height,
            } => format!(
                "DecodeUpload {{ session: {}, bytes: {}, width: {}, height: {} }}",
                session,
                bytes.len(),
                width,
                height
            ),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![Effect::LoadModel])
}

pub fn transition(
    config: &Config,
    noise: &dyn Noise,
    model: Model,
    event: Event,
) -> (Model, Vec<Effect>) {
    match event {
        Event::ModelLoadDone(result) => on_model_load_done(model, result),

        Event::CameraSelected => start_session(config, model, Mode::Camera, None),

        Event::UploadSelected { bytes } => start_session(config, model, Mode::Upload, Some(bytes)),

        Event::SourceAcquireDone { session, result } => {
            on_source_acquired(config, model, session, result)
        }

        Event::Tick { session } => on_tick(model, session),

        Event::TickPredictDone {
            session,
            seq,
            result,
        } => on_tick_predicted(config, noise, model, session, seq, result),

        Event::Deadline { session } => on_deadline(model, session),

        Event::FinalPredictDone {
            session,
            result,
            at,
        } => on_final_predicted(model, session, result, at),

        Event::Shutdown => (model, vec![Effect::StopTicker, Effect::CancelDeadline]),
    }
}

fn on_model_load_done(mut model: Model, result: Result<(), AnalysisError>) -> (Model, Vec<Effect>) {
    model.classifier = match result {
        Ok(()) => ClassifierStatus::Ready,
        Err(e) => ClassifierStatus::Failed(e),
    };
    (model, vec![])
}

fn start_session(
    config: &Config,
    mut model: Model,
    mode: Mode,
    bytes: Option<Arc<Vec<u8>>>,
) -> (Model, Vec<Effect>) {
    if !model.can_start() {
        model.notice = Some(AnalysisError::ModelUnavailable);
        return (model, vec![]);
    }

    let mut effects = vec![];
    if model.session.is_some() {
        effects.push(Effect::StopTicker);
        effects.push(Effect::CancelDeadline);
    }

    let id = model.last_session_id + 1;
    model.last_session_id = id;
    model.session = Some(Session::new(id, mode));
    model.notice = None;

    effects.push(match bytes {
        None => Effect::AcquireCamera {
            session: id,
            width: config.frame_width,
            height: config.frame_height,
            mirror: config.camera_mirror,
        },
        Some(bytes) => Effect::DecodeUpload {
            session: id,
            bytes,
            width: config.frame_width,
            height: config.frame_height,
        },
    });

    (model, effects)
}

fn on_source_acquired(
    config: &Config,
    mut model: Model,
    id: SessionId,
    result: Result<Instant, AnalysisError>,
) -> (Model, Vec<Effect>) {
    let acquiring = model
        .session_mut(id)
        .is_some_and(|s| s.phase == Phase::Acquiring);
    if !acquiring {
        return (model, vec![]);
    }

    match result {
        Ok(at) => {
            if let Some(session) = model.session_mut(id) {
                session.phase = Phase::Running;
                session.started_at = Some(at);
                session.is_running = true;
            }
            (
                model,
                vec![
                    Effect::StartTicker {
                        session: id,
                        period: config.tick_rate,
                    },
                    Effect::ScheduleDeadline {
                        session: id,
                        after: config.analysis_duration,
                    },
                ],
            )
        }
        Err(e) => {
            model.session = None;
            model.notice = Some(e);
            (model, vec![])
        }
    }
}

fn on_tick(mut model: Model, id: SessionId) -> (Model, Vec<Effect>) {
    match model.session_mut(id) {
        Some(session) if session.phase == Phase::Running => {
            session.issued_seq += 1;
            let seq = session.issued_seq;
            (model, vec![Effect::Predict { session: id, seq }])
        }
        _ => (model, vec![]),
    }
}

fn on_tick_predicted(
    config: &Config,
    noise: &dyn Noise,
    mut model: Model,
    id: SessionId,
    seq: u64,
    result: Result<Vec<Prediction>, AnalysisError>,
) -> (Model, Vec<Effect>) {
    if let Some(session) = model.session_mut(id) {
        // results of older ticks landing after newer ones are dropped
        if session.phase == Phase::Running && seq > session.applied_seq {
            if let Ok(predictions) = result {
                let jitter_max = match session.mode {
                    Mode::Camera => config.jitter_max_camera,
                    Mode::Upload => config.jitter_max_upload,
                };
                session.applied_seq = seq;
                session.latest_predictions = perturb(&predictions, jitter_max, noise);
            }
        }
    }
    (model, vec![])
}

fn on_deadline(mut model: Model, id: SessionId) -> (Model, Vec<Effect>) {
    match model.session_mut(id) {
        Some(session) if session.phase == Phase::Running => {
            session.phase = Phase::Finalizing;
            (
                model,
                vec![Effect::StopTicker, Effect::FinalPredict { session: id }],
            )
        }
        _ => (model, vec![]),
    }
}

fn on_final_predicted(
    mut model: Model,
    id: SessionId,
    result: Result<Vec<Prediction>, AnalysisError>,
    at: Instant,
) -> (Model, Vec<Effect>) {
    if let Some(session) = model.session_mut(id) {
        if session.phase == Phase::Finalizing {
            match result {
                Ok(predictions) => {
                    session.final_result = select_final(&predictions);
                    session.latest_predictions = predictions;
                }
                Err(_) => {
                    session.final_result = None;
                    session.latest_predictions = vec![];
                }
            }
            session.elapsed_seconds = session
                .started_at
                .map(|started| round_seconds(at.saturating_duration_since(started)));
            session.is_running = false;
            session.phase = Phase::Done;
        }
    }
    (model, vec![])
}

/// First entry with the highest probability, in the order returned.
pub fn select_final(predictions: &[Prediction]) -> Option<FinalResult> {
    predictions
        .iter()
        .filter(|p| !p.probability.is_nan())
        .fold(None::<&Prediction>, |best, p| match best {
            Some(best) if best.probability >= p.probability => Some(best),
            _ => Some(p),
        })
        .map(|p| FinalResult {
            label: p.label.clone(),
            probability: p.probability,
        })
}

/// Seconds rounded to two decimals.
pub fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}
