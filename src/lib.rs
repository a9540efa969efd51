pub mod analysis;
pub mod command;
pub mod config;
pub mod device_camera;
pub mod error;
pub mod image_classifier;
pub mod image_source;
pub mod library;
pub mod model_loader;
pub mod presenter;
