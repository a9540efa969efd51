use crate::presenter::interface::{Presenter, Screen};
use std::error::Error;

const WIDTH: usize = 36;

/// Draws the screen as a box on stdout, skipping repaints of an unchanged
/// screen.
#[derive(Default)]
pub struct PresenterConsole {
    last: Option<Screen>,
}

impl PresenterConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn draw(screen: &Screen) -> Vec<String> {
    let mut rows = vec![format!("┌{}┐", "─".repeat(WIDTH))];
    for line in &screen.lines {
        let text: String = line.chars().take(WIDTH).collect();
        let padding = WIDTH - text.chars().count();
        rows.push(format!("│{}{}│", text, " ".repeat(padding)));
    }
    rows.push(format!("└{}┘", "─".repeat(WIDTH)));
    if screen.can_start {
        rows.push("commands: camera | upload <path> | quit".to_string());
    }
    rows
}

impl Presenter for PresenterConsole {
    fn present(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.last.as_ref() == Some(screen) {
            return Ok(());
        }
        for row in draw(screen) {
            println!("{}", row);
        }
        self.last = Some(screen.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_pads_and_truncates() {
        let screen = Screen {
            lines: vec!["short".to_string(), "x".repeat(50)],
            can_start: false,
        };
        let rows = draw(&screen);

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.chars().count() == WIDTH + 2));
    }

    #[test]
    fn test_draw_lists_commands_when_ready() {
        let screen = Screen {
            lines: vec![],
            can_start: true,
        };
        assert_eq!(
            draw(&screen).last().map(String::as_str),
            Some("commands: camera | upload <path> | quit")
        );
    }
}
