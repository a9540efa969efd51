use super::main::Analysis;
use crate::analysis::core::{Effect, Event, SessionId};
use crate::error::AnalysisError;
use crate::image_classifier::interface::Prediction;
use crate::image_source::{upload, ImageSource};
use crate::library::scheduler::{spawn_once, spawn_periodic};
use std::time::Instant;

impl Analysis {
    pub fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::LoadModel => {
                let result = match self.model_loader.load() {
                    Ok(classifier) => {
                        *self.classifier.lock() = Some(classifier);
                        let _ = self.logger.info("Model ready");
                        Ok(())
                    }
                    Err(e) => {
                        let _ = self.logger.error(&format!("Model unavailable: {}", e));
                        Err(e)
                    }
                };
                self.send(Event::ModelLoadDone(result));
            }

            Effect::AcquireCamera {
                session,
                width,
                height,
                mirror,
            } => {
                let result = self
                    .device_camera
                    .acquire(width, height, mirror)
                    .map(ImageSource::CameraStream);
                self.install_source(session, result);
            }

            Effect::DecodeUpload {
                session,
                bytes,
                width,
                height,
            } => {
                let result = upload::decode(&bytes, width, height).map(ImageSource::StaticImage);
                self.install_source(session, result);
            }

            Effect::StartTicker { session, period } => {
                let sender = self.sender();
                let handle = spawn_periodic(period, move || {
                    sender.send(Event::Tick { session }).is_ok()
                });
                // replacing the slot drops, and so cancels, any older ticker
                *self.ticker.lock() = Some(handle);
            }

            Effect::StopTicker => {
                if let Some(handle) = self.ticker.lock().take() {
                    handle.cancel();
                }
            }

            Effect::ScheduleDeadline { session, after } => {
                let sender = self.sender();
                let handle = spawn_once(after, move || {
                    let _ = sender.send(Event::Deadline { session });
                });
                *self.deadline.lock() = Some(handle);
            }

            Effect::CancelDeadline => {
                if let Some(handle) = self.deadline.lock().take() {
                    handle.cancel();
                }
            }

            Effect::Predict { session, seq } => {
                let result = self.predict(session);
                if let Err(e) = &result {
                    let _ = self
                        .logger
                        .warn(&format!("Skipping tick {} of session {}: {}", seq, session, e));
                }
                self.send(Event::TickPredictDone {
                    session,
                    seq,
                    result,
                });
            }

            Effect::FinalPredict { session } => {
                let result = self.predict(session);
                if let Err(e) = &result {
                    let _ = self
                        .logger
                        .error(&format!("Final prediction of session {} failed: {}", session, e));
                }
                self.send(Event::FinalPredictDone {
                    session,
                    result,
                    at: Instant::now(),
                });
            }
        }
    }

    fn install_source(&self, session: SessionId, result: Result<ImageSource, AnalysisError>) {
        let result = match result {
            Ok(source) => {
                let mut slot = self.source.lock();
                // a slow acquisition must not replace the source of a newer session
                if slot.as_ref().map_or(true, |(id, _)| *id <= session) {
                    *slot = Some((session, source));
                }
                Ok(Instant::now())
            }
            Err(e) => {
                let _ = self.logger.warn(&format!("Source unavailable: {}", e));
                Err(e)
            }
        };
        self.send(Event::SourceAcquireDone { session, result });
    }

    fn predict(&self, session: SessionId) -> Result<Vec<Prediction>, AnalysisError> {
        let classifier = self
            .classifier
            .lock()
            .clone()
            .ok_or(AnalysisError::ModelUnavailable)?;

        let source = match self.source.lock().as_ref() {
            Some((id, source)) if *id == session => source.clone(),
            _ => {
                return Err(AnalysisError::FrameUnavailable(
                    "no source for this session".to_string(),
                ))
            }
        };

        let frame = source.current_frame()?;
        classifier.predict(&frame)
    }
}
