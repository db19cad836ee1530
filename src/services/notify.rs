//! Notification dispatch.
//!
//! Notifications are handed off to a detached task after the triggering
//! mutation has committed; the request path never awaits delivery.
//! Delivery failure is logged and dropped: no retry, no dead-letter, no
//! effect on the request outcome.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::EmailSettings;
use crate::models::{Event, User};

/// A composed notification ready for delivery
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

impl EmailMessage {
    /// Welcome message sent after signup.
    pub fn welcome(user: &User) -> Self {
        Self {
            to: user.email.clone(),
            subject: "Welcome to Virtual Events!".to_string(),
            text: format!("Hi {}, welcome to Virtual Events.", user.name),
            html: Some(format!(
                "<p>Hi <b>{}</b>,</p><p>Welcome to Virtual Events.</p>",
                user.name
            )),
        }
    }

    /// Confirmation message sent after registering for an event.
    pub fn registration_confirmed(user: &User, event: &Event) -> Self {
        Self {
            to: user.email.clone(),
            subject: format!("Registration confirmed: {}", event.title),
            text: format!(
                "You are registered for {} on {} at {}",
                event.title, event.date, event.time
            ),
            html: Some(format!(
                "<p>Hi <b>{}</b>,</p><p>You are registered for <b>{}</b> on {} at {}.</p>",
                user.name, event.title, event.date, event.time
            )),
        }
    }
}

/// Delivery channel boundary; injected so tests can substitute doubles.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// SMTP delivery channel.
///
/// If no SMTP host is configured the channel runs in no-op mode and only
/// logs what it would have sent.
pub struct SmtpChannel {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl SmtpChannel {
    pub fn new(config: &EmailSettings) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .context("Invalid SMTP_FROM address")?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; email delivery will run in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .context("Failed to configure SMTP transport")?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            } else {
                builder
            };

            Some(builder.build())
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl NotificationChannel for SmtpChannel {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(
                to = %message.to,
                subject = %message.subject,
                "email delivery in no-op mode; skipping actual send"
            );
            return Ok(());
        };

        let to = message
            .to
            .parse::<Mailbox>()
            .context("Invalid recipient email address")?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone());

        let email = match &message.html {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(
                    message.text.clone(),
                    html.clone(),
                ))
                .context("Failed to build email message")?,
            None => builder
                .header(header::ContentType::TEXT_PLAIN)
                .body(message.text.clone())
                .context("Failed to build email message")?,
        };

        transport
            .send(email)
            .await
            .context("Failed to send email")?;
        info!(to = %message.to, subject = %message.subject, "email sent");
        Ok(())
    }
}

/// Fire-and-forget dispatcher over a notification channel.
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn NotificationChannel>,
}

impl Notifier {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self { channel }
    }

    /// Submit a message for delivery without awaiting the outcome.
    ///
    /// The send runs on a detached task; a failure is logged once and
    /// the message is dropped.
    pub fn dispatch(&self, message: EmailMessage) {
        let channel = Arc::clone(&self.channel);
        tokio::spawn(async move {
            if let Err(err) = channel.send(&message).await {
                warn!(
                    to = %message.to,
                    subject = %message.subject,
                    error = %err,
                    "notification delivery failed; message dropped"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FailingChannel {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NotificationChannel for FailingChannel {
        async fn send(&self, _message: &EmailMessage) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("simulated delivery failure"))
        }
    }

    #[tokio::test]
    async fn test_failed_delivery_is_not_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::new(Arc::new(FailingChannel {
            attempts: Arc::clone(&attempts),
        }));

        notifier.dispatch(EmailMessage {
            to: "b@x.com".to_string(),
            subject: "test".to_string(),
            text: "test".to_string(),
            html: None,
        });

        // Give the detached task time to run and fail.
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_message_composition() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "Bob".to_string(),
            email: "b@x.com".to_string(),
            password_hash: "hash".to_string(),
            role: crate::models::Role::Attendee,
            created_at: chrono::Utc::now(),
        };
        let event = Event {
            id: uuid::Uuid::new_v4(),
            title: "Launch".to_string(),
            description: String::new(),
            date: "2025-01-01".to_string(),
            time: "10:00".to_string(),
            organizer_id: uuid::Uuid::new_v4(),
            participants: Vec::new(),
        };

        let welcome = EmailMessage::welcome(&user);
        assert_eq!(welcome.to, "b@x.com");
        assert!(welcome.text.contains("Bob"));

        let confirmation = EmailMessage::registration_confirmed(&user, &event);
        assert_eq!(confirmation.subject, "Registration confirmed: Launch");
        assert!(confirmation.text.contains("2025-01-01"));
    }
}
