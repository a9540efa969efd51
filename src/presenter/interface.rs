use std::error::Error;

/// What the user sees: text lines top to bottom, and whether the two entry
/// actions (camera, upload) are enabled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Screen {
    pub lines: Vec<String>,
    pub can_start: bool,
}

impl Screen {
    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line.contains(text))
    }
}

pub trait Presenter: Send + Sync {
    fn present(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>>;
}
