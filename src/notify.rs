//! Notification assembly and delivery.
//!
//! [`build_email`] is a pure function from the aggregated new items to a
//! `(subject, body)` pair; delivery goes through the [`Notifier`] trait so
//! the orchestrator can be tested with a recording stub instead of a live
//! SMTP session. The real transport is [`SmtpNotifier`], which speaks
//! implicit-TLS SMTP via [`lettre`].

use anyhow::{bail, Context, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use url::Url;

use crate::config::SmtpConfig;
use crate::reconcile::NewItem;

/// Delivery seam for the assembled notification.
pub trait Notifier {
    fn notify(&self, subject: &str, body: &str) -> Result<()>;
}

/// Host portion of a feed URL, for display; empty when the URL is invalid.
fn feed_host(feed_url: &str) -> String {
    Url::parse(feed_url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_default()
}

/// Format the aggregated new items into a `(subject, body)` pair.
///
/// A single item gets a subject naming its source host and title; more
/// than one gets a count. The body lists items in aggregation order, one
/// block per item, omitting the `Published:` line when the feed supplied
/// no timestamp. Callers must not invoke this with an empty slice.
pub fn build_email(new_items: &[NewItem]) -> (String, String) {
    let subject = if new_items.len() == 1 {
        let item = &new_items[0];
        format!(
            "New item detected ({}): {}",
            feed_host(&item.feed_url),
            item.title
        )
    } else {
        format!("{} new items detected", new_items.len())
    };

    let mut lines = vec!["New item(s) found in monitored feeds:".to_string(), String::new()];
    for item in new_items {
        lines.push(format!("- {}", item.title));
        if !item.published.is_empty() {
            lines.push(format!("  Published: {}", item.published));
        }
        lines.push(format!("  Link: {}", item.link));
        lines.push(format!("  Feed: {}", feed_host(&item.feed_url)));
        lines.push(String::new());
    }
    let body = format!("{}\n", lines.join("\n").trim_end());

    (subject, body)
}

/// SMTP delivery over an implicit-TLS connection (SMTPS, typically port
/// 465), authenticated with username/password.
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Reject incomplete transport configuration before any network work.
    ///
    /// Only called when there is something to send, so a run with no new
    /// items never demands credentials.
    fn validate(&self) -> Result<()> {
        if self.config.username.is_empty() || self.config.password.is_empty() {
            bail!("SMTP credentials are missing; set SMTP_USERNAME and SMTP_PASSWORD");
        }
        if self.config.to.is_empty() {
            bail!("EMAIL_TO is missing; add at least one recipient");
        }
        if self.config.from.is_empty() {
            bail!("EMAIL_FROM is missing");
        }
        Ok(())
    }
}

impl Notifier for SmtpNotifier {
    fn notify(&self, subject: &str, body: &str) -> Result<()> {
        self.validate()?;

        let from: Mailbox = self
            .config
            .from
            .parse()
            .with_context(|| format!("invalid sender address {:?}", self.config.from))?;

        let mut builder = Message::builder().from(from).subject(subject);
        for recipient in &self.config.to {
            let to: Mailbox = recipient
                .parse()
                .with_context(|| format!("invalid recipient address {recipient:?}"))?;
            builder = builder.to(to);
        }
        let message = builder
            .body(body.to_string())
            .context("failed to build notification message")?;

        let tls = TlsParameters::new(self.config.host.clone())
            .context("failed to build TLS parameters")?;
        let mailer = SmtpTransport::relay(&self.config.host)
            .context("failed to configure SMTP relay")?
            .port(self.config.port)
            .tls(Tls::Wrapper(tls))
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        mailer
            .send(&message)
            .context("failed to send notification email")?;
        Ok(())
    }
}
