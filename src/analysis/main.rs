use crate::analysis::core::{Event, SessionId};
use crate::analysis::jitter::Noise;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::image_source::ImageSource;
use crate::library::logger::interface::Logger;
use crate::library::scheduler::TaskHandle;
use crate::model_loader::interface::{ClassifierHandle, ModelLoader};
use crate::presenter::interface::Presenter;
use parking_lot::Mutex;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Runtime around the pure transition function. Owns every side-effecting
/// collaborator and the slots effects write into; the event loop in `run` is
/// the only writer of the model.
#[derive(Clone)]
pub struct Analysis {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub noise: Arc<dyn Noise + Send + Sync>,
    pub model_loader: Arc<dyn ModelLoader + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub presenter: Arc<Mutex<dyn Presenter + Send + Sync>>,
    pub event_sender: Sender<Event>,
    pub event_receiver: Arc<Mutex<Receiver<Event>>>,
    pub classifier: Arc<Mutex<Option<ClassifierHandle>>>,
    pub source: Arc<Mutex<Option<(SessionId, ImageSource)>>>,
    pub ticker: Arc<Mutex<Option<TaskHandle>>>,
    pub deadline: Arc<Mutex<Option<TaskHandle>>>,
}

impl Analysis {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        noise: Arc<dyn Noise + Send + Sync>,
        model_loader: Arc<dyn ModelLoader + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        presenter: Arc<Mutex<dyn Presenter + Send + Sync>>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();

        Self {
            config,
            logger: logger.with_namespace("analysis"),
            noise,
            model_loader,
            device_camera,
            presenter,
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            classifier: Arc::new(Mutex::new(None)),
            source: Arc::new(Mutex::new(None)),
            ticker: Arc::new(Mutex::new(None)),
            deadline: Arc::new(Mutex::new(None)),
        }
    }

    /// Channel for the user-facing triggers (`CameraSelected`,
    /// `UploadSelected`, `Shutdown`).
    pub fn sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    pub fn send(&self, event: Event) {
        let _ = self.event_sender.send(event);
    }
}
