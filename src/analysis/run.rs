use super::main::Analysis;
use crate::analysis::core::{init, transition, Effect, Event, Model};
use crate::analysis::render::render;

impl Analysis {
    /// Processes events until `Event::Shutdown` and returns the last model.
    pub fn run(&self) -> Model {
        let (mut current_model, effects) = init();

        self.present(&current_model);
        self.execute_effects(effects);

        loop {
            let event = match self.event_receiver.lock().recv() {
                Ok(event) => event,
                Err(_) => return current_model,
            };
            let shutdown = matches!(event, Event::Shutdown);

            let _ = self
                .logger
                .info(&format!("event: {}", event.to_display_string()));

            let (new_model, effects) =
                transition(&self.config, self.noise.as_ref(), current_model, event);

            current_model = new_model;

            self.present(&current_model);
            self.execute_effects(effects);

            if shutdown {
                return current_model;
            }
        }
    }

    fn present(&self, model: &Model) {
        let screen = render(model);
        if let Err(e) = self.presenter.lock().present(&screen) {
            let _ = self.logger.error(&format!("present failed: {}", e));
        }
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let _ = self
                .logger
                .info(&format!("effect: {}", effect.to_display_string()));

            // timers are started and cancelled in order, on the loop thread
            if effect.is_scheduling() {
                self.run_effect(effect);
            } else {
                let self_clone = self.clone();
                std::thread::spawn(move || self_clone.run_effect(effect));
            }
        }
    }
}

impl Effect {
    fn is_scheduling(&self) -> bool {
        matches!(
            self,
            Effect::StartTicker { .. }
                | Effect::StopTicker
                | Effect::ScheduleDeadline { .. }
                | Effect::CancelDeadline
        )
    }
}
