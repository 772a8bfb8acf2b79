use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;

use super::errors::MailError;
use crate::common::{Inquiry, TemplateParams};

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Templated transactional email delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, inquiry: &Inquiry) -> Result<(), MailError>;
}

pub struct EmailJsMailer {
    client: reqwest::Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams,
}

impl EmailJsMailer {
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self::with_endpoint(EMAILJS_SEND_URL, service_id, template_id, public_key)
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: public_key.into(),
        }
    }

    fn request<'a>(&'a self, inquiry: &Inquiry) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: inquiry.template_params_now(),
        }
    }
}

#[async_trait]
impl Mailer for EmailJsMailer {
    async fn send(&self, inquiry: &Inquiry) -> Result<(), MailError> {
        debug!("Sending inquiry from {} via {}", inquiry.email, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request(inquiry))
            .send()
            .await?;

        // The delivery API answers 200 on success and nothing else counts
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("Email delivery rejected with status {}", status);
            return Err(MailError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_server::{closed_url, direct_client, respond_once};

    fn inquiry() -> Inquiry {
        Inquiry {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            message: "Hello".to_string(),
        }
    }

    fn mailer_at(endpoint: String) -> EmailJsMailer {
        let mut mailer = EmailJsMailer::with_endpoint(endpoint, "service_a", "template_b", "key_c");
        mailer.client = direct_client();
        mailer
    }

    #[tokio::test]
    async fn test_send_accepted() {
        let (url, server) = respond_once(200, "OK").await;

        mailer_at(url).send(&inquiry()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /endpoint"));
        assert!(request.contains("\"service_id\":\"service_a\""));
        assert!(request.contains("\"email\":\"ana@example.com\""));
    }

    #[tokio::test]
    async fn test_send_rejected_status() {
        let (url, server) = respond_once(400, "The user_id parameter is required").await;

        let err = mailer_at(url).send(&inquiry()).await.unwrap_err();

        assert!(matches!(err, MailError::Status { status: 400 }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_success_codes_are_failures() {
        let (url, server) = respond_once(202, "").await;

        let err = mailer_at(url).send(&inquiry()).await.unwrap_err();

        assert!(matches!(err, MailError::Status { status: 202 }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let err = mailer_at(closed_url().await)
            .send(&inquiry())
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::Transport(_)));
    }

    #[test]
    fn test_request_shape() {
        let mailer = EmailJsMailer::new("service_a", "template_b", "key_c");
        let inquiry = inquiry();

        let json = serde_json::to_value(mailer.request(&inquiry)).unwrap();

        assert_eq!(json["service_id"], "service_a");
        assert_eq!(json["template_id"], "template_b");
        assert_eq!(json["user_id"], "key_c");
        assert_eq!(json["template_params"]["name"], "Ana");
        assert_eq!(json["template_params"]["email"], "ana@example.com");
        assert_eq!(json["template_params"]["message"], "Hello");
        assert!(json["template_params"]["time"].is_string());
    }
}
