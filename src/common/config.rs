use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::common::EnvProvider;

pub const DEFAULT_BOARD_DIR: &str = ".comment-board";
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 500;

/// Endpoint identifiers and local paths for a board deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub board_dir: PathBuf,
    pub cloudinary_cloud_name: String,
    pub cloudinary_upload_preset: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
    pub watch_interval: Duration,
}

impl BoardConfig {
    /// Build the configuration from the environment, falling back to the
    /// embedded deployment identifiers.
    pub fn from_env(env: &impl EnvProvider) -> Self {
        let var_or = |key: &str, default: &str| env.get_var(key).unwrap_or_else(|| default.to_string());

        let watch_interval_ms = match env.get_var("COMMENT_BOARD_WATCH_INTERVAL_MS") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("Invalid COMMENT_BOARD_WATCH_INTERVAL_MS value '{}': {}", value, e);
                DEFAULT_WATCH_INTERVAL_MS
            }),
            None => DEFAULT_WATCH_INTERVAL_MS,
        };

        Self {
            board_dir: PathBuf::from(var_or("COMMENT_BOARD_DIR", DEFAULT_BOARD_DIR)),
            cloudinary_cloud_name: var_or("CLOUDINARY_CLOUD_NAME", "dlxsai1kr"),
            cloudinary_upload_preset: var_or("CLOUDINARY_UPLOAD_PRESET", "profileImages"),
            emailjs_service_id: var_or("EMAILJS_SERVICE_ID", "service_sc1rv7a"),
            emailjs_template_id: var_or("EMAILJS_TEMPLATE_ID", "template_7bdi1wr"),
            emailjs_public_key: var_or("EMAILJS_PUBLIC_KEY", "y_jxCha4t7ck-X0P0"),
            watch_interval: Duration::from_millis(watch_interval_ms.max(1)),
        }
    }

    pub fn with_board_dir(mut self, board_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = board_dir {
            self.board_dir = dir;
        }
        self
    }
}
