//! Startup configuration for the Gemini client.
//!
//! The credential and endpoints are loaded and validated once at
//! startup and injected into [`crate::client::GeminiClient`]; nothing
//! reads the process environment after that. A missing credential is a
//! fatal startup condition, never a runtime error.

/// Default REST endpoint of the generative-media service.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for the image-edit flow.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default model for the video-generation flow.
pub const DEFAULT_VIDEO_MODEL: &str = "veo-2.0-generate-001";

/// Errors raised while building the startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The service credential is absent or blank.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
}

/// Generation parameters sent with every video-job submission.
#[derive(Debug, Clone)]
pub struct VideoJobSettings {
    /// Number of videos to request per job.
    pub count: u32,
    /// Output resolution label, e.g. `720p`.
    pub resolution: Option<String>,
    /// Output aspect ratio, e.g. `16:9`.
    pub aspect_ratio: Option<String>,
}

impl Default for VideoJobSettings {
    fn default() -> Self {
        Self {
            count: 1,
            resolution: Some("720p".to_string()),
            aspect_ratio: Some("16:9".to_string()),
        }
    }
}

/// Everything the client needs to talk to the remote service.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Process-wide service credential.
    pub api_key: String,
    /// Base REST URL, without a trailing slash.
    pub api_base: String,
    /// Model used by `edit_image`.
    pub image_model: String,
    /// Model used by `start_video_job`.
    pub video_model: String,
    /// Video-job generation parameters.
    pub video: VideoJobSettings,
}

impl GeminiConfig {
    /// Build a configuration with defaults for everything but the key.
    ///
    /// Fails with [`ConfigError::MissingApiKey`] if the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            video: VideoJobSettings::default(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default                      |
    /// |----------------------|------------------------------|
    /// | `GEMINI_API_KEY`     | *(required)*                 |
    /// | `GEMINI_API_BASE`    | [`DEFAULT_API_BASE`]         |
    /// | `GEMINI_IMAGE_MODEL` | [`DEFAULT_IMAGE_MODEL`]      |
    /// | `GEMINI_VIDEO_MODEL` | [`DEFAULT_VIDEO_MODEL`]      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(std::env::var("GEMINI_API_KEY").unwrap_or_default())?;
        if let Ok(base) = std::env::var("GEMINI_API_BASE") {
            config.api_base = normalize_api_base(&base);
        }
        if let Ok(model) = std::env::var("GEMINI_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_VIDEO_MODEL") {
            config.video_model = model;
        }
        Ok(config)
    }
}

/// Trim whitespace and any trailing slash from a configured base URL.
pub fn normalize_api_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}
