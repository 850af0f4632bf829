use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::env;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

pub const SENDER: &str = "HabitBuddies <noreply@resend.dev>";

/// Fatal for the summary job: without a credential there is nothing to
/// do, so the job aborts before sending anything.
#[derive(Debug, Error)]
#[error("RESEND_API_KEY is not configured")]
pub struct MissingCredential;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email provider returned status {0}")]
    Status(StatusCode),
}

/// Transactional email client with a bearer credential.
pub struct Mailer {
    client: Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl Mailer {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, MissingCredential> {
        let api_key = env::var("RESEND_API_KEY").map_err(|_| MissingCredential)?;
        if api_key.is_empty() {
            return Err(MissingCredential);
        }
        let api_url = env::var("RESEND_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Ok(Self::new(api_key, api_url))
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SendRequest {
                from: SENDER,
                to: [to],
                subject,
                html,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Status(response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_serializes_single_recipient_list() {
        let request = SendRequest {
            from: SENDER,
            to: ["martin.habitbuddies@gmail.com"],
            subject: "HabitBuddies results for 2026-08-29",
            html: "<html></html>",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["to"].as_array().unwrap().len(), 1);
        assert_eq!(json["from"], SENDER);
    }
}
