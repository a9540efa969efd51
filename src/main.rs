use live_classifier::analysis::core::Event;
use live_classifier::analysis::jitter::NoiseUniform;
use live_classifier::analysis::main::Analysis;
use live_classifier::config::{Config, MODEL_URL_ENV};
use live_classifier::device_camera::interface::DeviceCamera;
use live_classifier::library::logger::impl_console::LoggerConsole;
use live_classifier::library::logger::interface::Logger;
use live_classifier::model_loader::impl_fake::ModelLoaderFake;
use live_classifier::model_loader::impl_remote::ModelLoaderRemote;
use live_classifier::model_loader::interface::ModelLoader;
use parking_lot::Mutex;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let model_loader: Arc<dyn ModelLoader + Send + Sync> = match &config.model {
        Some(remote) => Arc::new(ModelLoaderRemote::new(remote.clone(), logger.clone())),
        None => {
            let _ = logger.warn(&format!(
                "{} is not set, using the fake classifier",
                MODEL_URL_ENV
            ));
            Arc::new(ModelLoaderFake::new(logger.clone(), config.fake_labels.clone()))
        }
    };

    let device_camera = device_camera(&config, logger.clone());

    #[cfg(feature = "gui")]
    {
        use live_classifier::presenter::impl_gui::PresenterGui;

        let presenter = PresenterGui::new();
        let analysis = Analysis::new(
            config,
            logger,
            Arc::new(NoiseUniform),
            model_loader,
            device_camera,
            Arc::new(Mutex::new(presenter.clone())),
        );

        let runner = analysis.clone();
        let handle = std::thread::spawn(move || runner.run());

        let shown = presenter.run_window(analysis.sender());
        analysis.send(Event::Shutdown);
        let _ = handle.join();
        shown.map_err(|e| e.to_string())?;
    }

    #[cfg(not(feature = "gui"))]
    {
        use live_classifier::presenter::impl_console::PresenterConsole;

        let analysis = Analysis::new(
            config,
            logger.clone(),
            Arc::new(NoiseUniform),
            model_loader,
            device_camera,
            Arc::new(Mutex::new(PresenterConsole::new())),
        );

        let sender = analysis.sender();
        std::thread::spawn(move || read_commands(sender, logger));

        analysis.run();
    }

    Ok(())
}

#[cfg(feature = "camera")]
fn device_camera(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    use live_classifier::device_camera::impl_nokhwa::DeviceCameraNokhwa;

    Arc::new(DeviceCameraNokhwa::new(logger, config.camera_index))
}

#[cfg(not(feature = "camera"))]
fn device_camera(
    _config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    use live_classifier::device_camera::impl_fake::DeviceCameraFake;

    let _ = logger.warn("Built without the camera feature, using a synthetic camera");
    Arc::new(DeviceCameraFake::new(logger))
}

#[cfg(not(feature = "gui"))]
fn read_commands(sender: std::sync::mpsc::Sender<Event>, logger: Arc<dyn Logger + Send + Sync>) {
    use live_classifier::command::{self, Command};
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };

        let event = match command::parse(&line) {
            Ok(Command::Camera) => Event::CameraSelected,
            Ok(Command::Upload(path)) => match std::fs::read(&path) {
                Ok(bytes) => Event::UploadSelected {
                    bytes: Arc::new(bytes),
                },
                Err(e) => {
                    let _ = logger.warn(&format!("cannot read {}: {}", path.display(), e));
                    continue;
                }
            },
            Ok(Command::Quit) => break,
            Err(message) => {
                let _ = logger.warn(&message);
                continue;
            }
        };

        if sender.send(event).is_err() {
            return;
        }
    }
    let _ = sender.send(Event::Shutdown);
}
