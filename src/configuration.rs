use crate::SmokebenchError;
use serde::Deserialize;
use std::time::Duration;

fn default_base_url() -> String {
    "http://127.0.0.1:8090".into()
}
fn default_http_version() -> String {
    "1.1".into()
}
fn default_credential() -> String {
    "hamza".into()
}
fn default_posts() -> usize {
    200
}
fn default_pause_ms() -> u64 {
    1000
}

/// JSON key the field-specific printer reads from response bodies.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseField {
    /// `_responce`, as the test service has been observed to send it
    #[default]
    Responce,
    /// `_response`
    Response,
}

impl ResponseField {
    pub fn key(self) -> &'static str {
        match self {
            ResponseField::Responce => "_responce",
            ResponseField::Response => "_response",
        }
    }
}

/// Which printer the logout, lookup and post calls report through.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStyle {
    #[default]
    ReturnValue,
    Summary,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Configuration {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_version")]
    pub http_version: String,
    #[serde(default = "default_credential")]
    pub username: String,
    #[serde(default = "default_credential")]
    pub password: String,
    #[serde(default = "default_posts")]
    pub posts: usize,
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    /// Unset means calls may block forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub insecure: bool,
    /// Percent-encode each path parameter as a single segment.
    #[serde(default)]
    pub encode_path: bool,
    #[serde(default)]
    pub response_field: ResponseField,
    #[serde(default)]
    pub report: ReportStyle,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http_version: default_http_version(),
            username: default_credential(),
            password: default_credential(),
            posts: default_posts(),
            pause_ms: default_pause_ms(),
            timeout_secs: None,
            insecure: false,
            encode_path: false,
            response_field: ResponseField::default(),
            report: ReportStyle::default(),
        }
    }
}

impl Configuration {
    /// Read a YAML configuration file; `None` yields the defaults.
    pub fn load(path: Option<&str>) -> Result<Self, SmokebenchError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let file = std::fs::File::open(path)
            .map_err(|_| SmokebenchError::new(format!("file {path} not found")))?;
        let config: Configuration = serde_yaml::from_reader(file)
            .map_err(|e| SmokebenchError::new(format!("invalid configuration content in {path}: {e}")))?;
        tracing::info!(path, base_url = %config.base_url, "configuration loaded");
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}
