// SPDX-License-Identifier: MIT
//! Support requests, forwarded to an external HTTP mail relay.
//!
//! The relay does the actual delivery; this client only posts the request
//! and reports configured / failed states to the route handler.

use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::SupportConfig;

#[derive(Debug, Error)]
pub enum SupportError {
    #[error("Email service not configured")]
    NotConfigured,
    #[error("Failed to send support message")]
    SendFailed,
}

pub struct MailRelay {
    http: reqwest::Client,
    relay_url: Option<String>,
    relay_token: Option<String>,
    support_email: Option<String>,
}

impl MailRelay {
    pub fn new(config: &SupportConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            relay_url: config.relay_url.clone().filter(|s| !s.is_empty()),
            relay_token: config.relay_token.clone(),
            support_email: config.support_email.clone().filter(|s| !s.is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.relay_url.is_some() && self.support_email.is_some()
    }

    /// Forward one support request. The support mailbox receives the message
    /// with the requester's address as the reply target.
    pub async fn send(&self, from_email: &str, message: &str) -> Result<(), SupportError> {
        let (url, to) = match (&self.relay_url, &self.support_email) {
            (Some(url), Some(to)) => (url, to),
            _ => return Err(SupportError::NotConfigured),
        };

        let payload = json!({
            "to": to,
            "replyTo": from_email,
            "subject": format!("Support Request from {from_email}"),
            "text": message,
        });

        let mut request = self.http.post(url).json(&payload);
        if let Some(token) = &self.relay_token {
            request = request.bearer_auth(token);
        }

        match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(err = %e, "support relay call failed");
                Err(SupportError::SendFailed)
            }
        }
    }
}
