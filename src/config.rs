use std::time::Duration;

pub const MODEL_URL_ENV: &str = "LIVE_CLASSIFIER_MODEL_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteModelConfig {
    pub base_url: String,
    pub topology_file: String,
    pub metadata_file: String,
}

impl RemoteModelConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            topology_file: "model.onnx".to_string(),
            metadata_file: "metadata.json".to_string(),
        }
    }

    pub fn topology_url(&self) -> String {
        join_url(&self.base_url, &self.topology_file)
    }

    pub fn metadata_url(&self) -> String {
        join_url(&self.base_url, &self.metadata_file)
    }
}

fn join_url(base: &str, file: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, file)
    } else {
        format!("{}/{}", base, file)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_rate: Duration,
    pub analysis_duration: Duration,
    pub jitter_max_camera: f32,
    pub jitter_max_upload: f32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub camera_mirror: bool,
    pub camera_index: u32,
    pub logger_timezone: chrono::FixedOffset,
    pub fake_labels: Vec<String>,
    pub model: Option<RemoteModelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(300),
            analysis_duration: Duration::from_millis(3000),
            jitter_max_camera: 0.1,
            jitter_max_upload: 0.2,
            frame_width: 300,
            frame_height: 300,
            camera_mirror: true,
            camera_index: 0,
            logger_timezone: local_offset(),
            fake_labels: vec!["normal".to_string(), "at risk".to_string()],
            model: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(MODEL_URL_ENV) {
            if !url.trim().is_empty() {
                config.model = Some(RemoteModelConfig::new(url.trim()));
            }
        }
        config
    }
}

fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
