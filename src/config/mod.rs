use serde::Deserialize;
use tracing::warn;

use crate::sender::{DummySender, Sender, SmtpSender};

/// Search terms the pipeline scrapes for, fixed at compile time
pub const COMPETITORS: &[&str] = &[
    "쿠팡",
    "네이버",
    "오아시스",
    "SSG",
    "올리브영",
    "오늘의집",
    "무신사",
    "배달의민족",
];

/// Digest recipients, fixed at compile time
pub const RECIPIENTS: &[&str] = &["hyeonglae.cho@kurlycorp.com", "soaringfay@gmail.com"];

/// Pairwise cosine similarity above this marks a near-duplicate
pub const SIMILARITY_THRESHOLD: f64 = 0.1;

const DEFAULT_SERVICE_KEY_PATH: &str = "/secrets/secret";
const DEFAULT_PORT: u16 = 8080;

/// Send-only mail credential, mounted as a JSON file
#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    pub from: String,
    pub host: String,
    pub password: String,
    pub username: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Load the mail credential from the path in `SERVICE_KEY_PATH`
    /// (default `/secrets/secret`). A missing or malformed file leaves the
    /// service running with console delivery instead of SMTP.
    #[must_use]
    pub fn from_env() -> Self {
        let key_path = std::env::var("SERVICE_KEY_PATH")
            .unwrap_or_else(|_| DEFAULT_SERVICE_KEY_PATH.to_string());

        let smtp = match std::fs::read_to_string(&key_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!(path = %key_path, error = %e, "malformed mail credential, using console delivery");
                    None
                }
            },
            Err(e) => {
                warn!(path = %key_path, error = %e, "mail credential not readable, using console delivery");
                None
            }
        };

        Self { smtp }
    }

    #[allow(dead_code)]
    pub fn from_str(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let smtp: SmtpConfig = serde_json::from_str(contents)?;

        Ok(Self { smtp: Some(smtp) })
    }

    #[must_use]
    pub fn get_sender(&self) -> Sender {
        if let Some(config) = &self.smtp {
            Sender::Smtp(SmtpSender::new(config))
        } else {
            Sender::Dummy(DummySender {})
        }
    }

    /// Listen port, `PORT` env override with an 8080 default
    #[must_use]
    pub fn get_port() -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }
}
