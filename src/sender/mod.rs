use lettre::message::SinglePart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use tracing::info;

use crate::config::SmtpConfig;
use crate::digest::prelude::ArticleRecord;

/// Body sent when no article survived the pipeline
pub const EMPTY_DIGEST_BODY: &str = "📭 오늘 날짜의 경쟁사 뉴스가 없습니다.";

pub enum Sender {
    Dummy(DummySender),
    Smtp(SmtpSender),
}

impl Sender {
    pub async fn send_digest(
        &self,
        send_to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Sender::Dummy(sender) => sender.send_digest(send_to, subject, body).await,
            Sender::Smtp(sender) => sender.send_digest(send_to, subject, body).await,
        }
    }
}

pub trait DigestSender {
    async fn send_digest(
        &self,
        send_to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

pub struct DummySender {}

pub struct SmtpSender {
    config: SmtpConfig,
}

impl SmtpSender {
    #[must_use]
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl DigestSender for SmtpSender {
    /// Send one plaintext message. A transport failure propagates to the
    /// caller, which stops the remaining recipient sends.
    async fn send_digest(
        &self,
        send_to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let email = lettre::Message::builder()
            .from(self.config.from.parse()?)
            .to(send_to.parse()?)
            .subject(subject)
            .singlepart(SinglePart::plain(String::from(body)))?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());
        let mailer = SmtpTransport::relay(&self.config.host)?
            .credentials(creds)
            .build();

        mailer.send(&email)?;
        info!(%send_to, "digest delivered");

        Ok(())
    }
}

impl DigestSender for DummySender {
    /// Console fallback when no mail credential is mounted.
    async fn send_digest(
        &self,
        send_to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        println!("To: {send_to}\nSubject: {subject}\n\n{body}");
        Ok(())
    }
}

/// Render the digest body: one `[competitor] title` paragraph per record
/// with the link on its own line, or the fixed placeholder when empty.
pub fn format_digest(digest: &[ArticleRecord]) -> String {
    if digest.is_empty() {
        return EMPTY_DIGEST_BODY.to_string();
    }

    let paragraphs: Vec<String> = digest
        .iter()
        .map(|record| format!("[{}] {}\n{}\n", record.competitor, record.title, record.link))
        .collect();
    paragraphs.join("\n")
}

/// Subject line for today's digest mail
pub fn digest_subject() -> String {
    format!("[경쟁사 오늘 뉴스] {}", chrono::Local::now().format("%Y-%m-%d"))
}
