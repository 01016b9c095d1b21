use crate::templates::{NEWS_SUMMARY_EMAIL_TEMPLATE, WELCOME_EMAIL_TEMPLATE};
use crate::types::{Result, SmtpConfig};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

pub const NEWS_SUMMARY_SUBJECT: &str = "Your Daily Market Briefing 📰";
pub const WELCOME_SUBJECT: &str =
    "Welcome aboard MarketBrief - your stock market toolkit is ready!";

/// Escape a value for interpolation into an HTML template.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Substitute placeholders into a template.
///
/// Plain string replacement, first occurrence per placeholder. Values must
/// already be escaped by the caller.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (placeholder, value) in substitutions {
        rendered = rendered.replacen(placeholder, value, 1);
    }
    rendered
}

/// Trait for external delivery capabilities.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// SMTP delivery backed by lettre's async transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address).parse()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(config.username, config.password))
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Delivery for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(message).await?;
        info!("Sent \"{}\" to {}", subject, to);
        Ok(())
    }
}

/// A sent message captured by `RecordingDelivery`.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// In-memory delivery for development and testing: records every send and
/// can be told to fail for specific addresses.
#[derive(Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<SentMessage>>,
    fail_for: HashSet<String>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        if self.fail_for.contains(to) {
            return Err(crate::types::DigestError::General(format!(
                "delivery to {} refused by mock",
                to
            )));
        }
        self.sent.lock().await.push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

/// Renders digest and welcome messages and hands them to a delivery
/// capability. Escaping happens here, immediately before substitution.
pub struct DigestMailer {
    delivery: Arc<dyn Delivery>,
}

impl DigestMailer {
    pub fn new(delivery: Arc<dyn Delivery>) -> Self {
        Self { delivery }
    }

    /// Render and send one daily briefing.
    pub async fn send_news_summary(&self, email: &str, date: &str, news_content: &str) -> Result<()> {
        let safe_date = escape_html(date);
        let safe_content = escape_html(news_content).replace('\n', "<br/>");
        let html = render(
            NEWS_SUMMARY_EMAIL_TEMPLATE,
            &[("{{date}}", &safe_date), ("{{newsContent}}", &safe_content)],
        );
        self.delivery.send(email, NEWS_SUMMARY_SUBJECT, &html).await
    }

    /// Render and send one welcome email.
    pub async fn send_welcome(&self, email: &str, name: &str, intro: &str) -> Result<()> {
        let safe_name = escape_html(name);
        let safe_intro = escape_html(intro);
        let html = render(
            WELCOME_EMAIL_TEMPLATE,
            &[("{{name}}", &safe_name), ("{{intro}}", &safe_intro)],
        );
        self.delivery.send(email, WELCOME_SUBJECT, &html).await
    }
}
