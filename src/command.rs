use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Camera,
    Upload(PathBuf),
    Quit,
}

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "camera" | "c" => Ok(Command::Camera),
        "upload" | "u" if !rest.is_empty() => Ok(Command::Upload(PathBuf::from(rest))),
        "upload" | "u" => Err("usage: upload <path>".to_string()),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command: {}", other)),
    }
}
