#[cfg(test)]
mod render_test {
    use std::time::{Duration, Instant};

    use crate::analysis::core::{transition, Event, Model};
    use crate::analysis::jitter::NoiseZero;
    use crate::analysis::render::render;
    use crate::config::Config;
    use crate::error::AnalysisError;
    use crate::image_classifier::interface::Prediction;

    fn apply(model: Model, events: Vec<Event>) -> Model {
        let config = Config::default();
        events.into_iter().fold(model, |model, event| {
            transition(&config, &NoiseZero, model, event).0
        })
    }

    fn answer() -> Vec<Prediction> {
        vec![Prediction::new("normal", 0.25), Prediction::new("at risk", 0.75)]
    }

    fn running() -> (Model, Instant) {
        let started = Instant::now();
        let model = apply(
            Model::default(),
            vec![
                Event::ModelLoadDone(Ok(())),
                Event::CameraSelected,
                Event::SourceAcquireDone {
                    session: 1,
                    result: Ok(started),
                },
                Event::Tick { session: 1 },
                Event::TickPredictDone {
                    session: 1,
                    seq: 1,
                    result: Ok(answer()),
                },
            ],
        );
        (model, started)
    }

    #[test]
    fn test_loading_disables_entry() {
        let screen = render(&Model::default());

        assert_eq!(screen.lines, vec!["Loading model...".to_string()]);
        assert!(!screen.can_start);
    }

    #[test]
    fn test_failed_model_is_reported() {
        let model = apply(
            Model::default(),
            vec![
                Event::ModelLoadDone(Err(AnalysisError::ModelLoad("timeout".to_string()))),
                Event::CameraSelected,
            ],
        );
        let screen = render(&model);

        assert!(screen.contains("Model not ready: model load failed: timeout"));
        assert!(screen.contains("Notice: model is not ready"));
        assert!(!screen.can_start);
    }

    #[test]
    fn test_ready_invites_a_choice() {
        let model = apply(Model::default(), vec![Event::ModelLoadDone(Ok(()))]);
        let screen = render(&model);

        assert_eq!(
            screen.lines,
            vec!["Choose a source: camera or upload".to_string()]
        );
        assert!(screen.can_start);
    }

    #[test]
    fn test_denied_camera_notice() {
        let model = apply(
            Model::default(),
            vec![
                Event::ModelLoadDone(Ok(())),
                Event::CameraSelected,
                Event::SourceAcquireDone {
                    session: 1,
                    result: Err(AnalysisError::DeviceUnavailable("denied".to_string())),
                },
            ],
        );

        assert!(render(&model).contains("Could not access your webcam"));
    }

    #[test]
    fn test_live_predictions() {
        let (model, _) = running();
        let screen = render(&model);

        assert_eq!(
            screen.lines,
            vec![
                "Live Analysis".to_string(),
                "normal: 0.25".to_string(),
                "at risk: 0.75".to_string(),
            ]
        );
    }

    #[test]
    fn test_not_a_number_shows_as_unavailable() {
        let model = apply(
            Model::default(),
            vec![
                Event::ModelLoadDone(Ok(())),
                Event::CameraSelected,
                Event::SourceAcquireDone {
                    session: 1,
                    result: Ok(Instant::now()),
                },
                Event::Tick { session: 1 },
                Event::TickPredictDone {
                    session: 1,
                    seq: 1,
                    result: Ok(vec![
                        Prediction::new("normal", f32::NAN),
                        Prediction::new("at risk", 0.5),
                    ]),
                },
            ],
        );
        let screen = render(&model);

        assert!(screen.contains("normal: N/A"));
        assert!(screen.contains("at risk: 0.50"));
    }

    #[test]
    fn test_no_final_result_before_done() {
        let (model, _) = running();
        let model = apply(model, vec![Event::Deadline { session: 1 }]);

        assert!(!render(&model).contains("Final Result"));
    }

    #[test]
    fn test_final_result() {
        let (model, started) = running();
        let model = apply(
            model,
            vec![
                Event::Deadline { session: 1 },
                Event::FinalPredictDone {
                    session: 1,
                    result: Ok(answer()),
                    at: started + Duration::from_millis(3020),
                },
            ],
        );
        let screen = render(&model);

        assert_eq!(
            screen.lines,
            vec![
                "Analysis Time: 3.02 seconds".to_string(),
                "Final Result: at risk: 0.75".to_string(),
            ]
        );
    }

    #[test]
    fn test_unavailable_final_result_hides_stale_predictions() {
        let (model, started) = running();
        let model = apply(
            model,
            vec![
                Event::Deadline { session: 1 },
                Event::FinalPredictDone {
                    session: 1,
                    result: Err(AnalysisError::FrameUnavailable("lost".to_string())),
                    at: started + Duration::from_millis(3000),
                },
            ],
        );
        let screen = render(&model);

        assert!(screen.contains("Final Result: unavailable"));
        assert!(!screen.contains("normal"));
    }

    #[test]
    fn test_new_session_hides_previous_predictions() {
        let (model, _) = running();
        let model = apply(model, vec![Event::CameraSelected]);
        let screen = render(&model);

        assert_eq!(screen.lines, vec!["Starting camera...".to_string()]);
    }
}
