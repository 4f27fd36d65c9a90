//! Outbound email, decoupled from request handling.
//!
//! Handlers enqueue an [`OutboundEmail`] onto a bounded channel and return
//! immediately; a background worker drains the queue and delivers over SMTP
//! (or logs the payload when SMTP is unconfigured). Delivery failure is
//! logged and otherwise unobservable to the request that triggered it.
//! There is no retry and no dead-letter queue.

pub mod templates;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
};
use tokio::sync::mpsc;

use crate::config::EmailConfig;

const QUEUE_DEPTH: usize = 256;

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Handle held by the application state; cheap to clone.
#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::Sender<OutboundEmail>,
}

impl Mailer {
    /// Spawn the delivery worker and return the enqueue handle.
    pub fn spawn(config: EmailConfig) -> anyhow::Result<Self> {
        let transport = match &config.smtp {
            Some(smtp) => {
                let credentials =
                    Credentials::new(smtp.username.clone(), smtp.password.clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
                    .port(smtp.port)
                    .credentials(credentials)
                    .build();
                Some(transport)
            }
            None => {
                tracing::info!("SMTP not configured; outbound email will be logged only");
                None
            }
        };

        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        tokio::spawn(deliver_loop(rx, transport, config.from));
        Ok(Self { tx })
    }

    /// Queue an email without waiting for delivery. A full or closed queue
    /// is logged and swallowed; the caller's operation is never blocked or
    /// rolled back over mail.
    pub fn enqueue(&self, email: OutboundEmail) {
        if let Err(err) = self.tx.try_send(email) {
            tracing::warn!(error = %err, "dropping outbound email");
        }
    }
}

async fn deliver_loop(
    mut rx: mpsc::Receiver<OutboundEmail>,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
) {
    while let Some(email) = rx.recv().await {
        let to = email.to.clone();
        let subject = email.subject.clone();
        match &transport {
            Some(transport) => {
                if let Err(err) = deliver(transport, &from, email).await {
                    tracing::warn!(%to, %subject, error = %err, "email delivery failed");
                } else {
                    tracing::info!(%to, %subject, "email sent");
                }
            }
            None => {
                tracing::info!(%to, %subject, from = %from, "email (not delivered, SMTP unset)");
            }
        }
    }
}

async fn deliver(
    transport: &AsyncSmtpTransport<Tokio1Executor>,
    from: &str,
    email: OutboundEmail,
) -> anyhow::Result<()> {
    let message = Message::builder()
        .from(from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(email.text))
                .singlepart(SinglePart::html(email.html)),
        )?;
    transport.send(message).await?;
    Ok(())
}
