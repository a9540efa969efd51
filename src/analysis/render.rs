use crate::analysis::core::{ClassifierStatus, Mode, Model, Phase, Session};
use crate::error::AnalysisError;
use crate::image_classifier::interface::Prediction;
use crate::presenter::interface::Screen;

pub fn render(model: &Model) -> Screen {
    let mut lines = vec![];

    match &model.classifier {
        ClassifierStatus::Loading => lines.push("Loading model...".to_string()),
        ClassifierStatus::Failed(e) => lines.push(format!("Model not ready: {}", e)),
        ClassifierStatus::Ready => {}
    }

    if let Some(notice) = &model.notice {
        lines.push(notice_text(notice));
    }

    match &model.session {
        Some(session) => render_session(session, &mut lines),
        None => {
            if model.can_start() {
                lines.push("Choose a source: camera or upload".to_string());
            }
        }
    }

    Screen {
        lines,
        can_start: model.can_start(),
    }
}

fn notice_text(notice: &AnalysisError) -> String {
    match notice {
        AnalysisError::DeviceUnavailable(_) => {
            "Could not access your webcam. Please check permissions.".to_string()
        }
        e => format!("Notice: {}", e),
    }
}

fn render_session(session: &Session, lines: &mut Vec<String>) {
    match session.phase {
        Phase::Acquiring => lines.push(
            match session.mode {
                Mode::Camera => "Starting camera...",
                Mode::Upload => "Decoding image...",
            }
            .to_string(),
        ),
        Phase::Running | Phase::Finalizing => {
            lines.push("Live Analysis".to_string());
            lines.extend(session.latest_predictions.iter().map(prediction_line));
        }
        Phase::Done => {
            if session.mode == Mode::Upload {
                lines.push("Predictions".to_string());
                lines.extend(session.latest_predictions.iter().map(prediction_line));
            }
            if let Some(elapsed) = session.elapsed_seconds {
                lines.push(format!("Analysis Time: {:.2} seconds", elapsed));
            }
            match &session.final_result {
                Some(result) => lines.push(format!(
                    "Final Result: {}: {:.2}",
                    result.label, result.probability
                )),
                None => lines.push("Final Result: unavailable".to_string()),
            }
        }
    }
}

fn prediction_line(prediction: &Prediction) -> String {
    if prediction.probability.is_nan() {
        return format!("{}: N/A", prediction.label);
    }
    format!("{}: {:.2}", prediction.label, prediction.probability)
}
