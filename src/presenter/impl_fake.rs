use crate::presenter::interface::{Presenter, Screen};
use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;

/// Keeps every screen it was asked to show.
#[derive(Clone, Default)]
pub struct PresenterFake {
    history: Arc<Mutex<Vec<Screen>>>,
}

impl PresenterFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Screen> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<Screen> {
        self.history.lock().last().cloned()
    }
}

impl Presenter for PresenterFake {
    fn present(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.history.lock().push(screen.clone());
        Ok(())
    }
}
