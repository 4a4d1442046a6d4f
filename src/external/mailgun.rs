use crate::config::MailConfig;
use crate::error::{AppError, AppResult};
use crate::external::{MailTemplate, Mailer};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Clone)]
pub struct MailgunService {
    client: Client,
    config: MailConfig,
}

impl MailgunService {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.config.base_url.trim_end_matches('/'),
            self.config.domain
        )
    }
}

#[async_trait]
impl Mailer for MailgunService {
    async fn send(&self, to: &str, template: &MailTemplate) -> AppResult<()> {
        let text = template.text();
        let params = [
            ("from", self.config.sender.as_str()),
            ("to", to),
            ("subject", template.subject()),
            ("text", text.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(&params)
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Email {} sent successfully: {}", template.name(), to);
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!(
                "Email {} failed to send: {}, Error: {}",
                template.name(),
                to,
                error_text
            );
            Err(AppError::ExternalApiError(format!(
                "Email sending failed: {error_text}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let service = MailgunService::new(MailConfig {
            domain: "mg.example.com".to_string(),
            base_url: "https://api.mailgun.net/".to_string(),
            ..MailConfig::default()
        });
        assert_eq!(
            service.messages_url(),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
    }
}
