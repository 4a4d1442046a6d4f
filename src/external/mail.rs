use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Url;

/// 事务邮件模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTemplate {
    /// 收到商家入驻申请
    MerchantApplication,
    /// 已有账号的商家审核通过
    MerchantWelcome { name: String },
    /// 新商家审核通过，需通过链接设置密码
    MerchantSignup { signup_url: String, email: String },
    /// 商家账号被停用
    MerchantDeactivateAccount,
}

impl MailTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            MailTemplate::MerchantApplication => "merchant-application",
            MailTemplate::MerchantWelcome { .. } => "merchant-welcome",
            MailTemplate::MerchantSignup { .. } => "merchant-signup",
            MailTemplate::MerchantDeactivateAccount => "merchant-deactivate-account",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            MailTemplate::MerchantApplication => "Sell on our marketplace",
            MailTemplate::MerchantWelcome { .. } => "Merchant registration",
            MailTemplate::MerchantSignup { .. } => "Merchant registration",
            MailTemplate::MerchantDeactivateAccount => "Merchant account deactivated",
        }
    }

    pub fn text(&self) -> String {
        match self {
            MailTemplate::MerchantApplication => {
                "We received your request! Our team will review your application and contact you soon.".to_string()
            }
            MailTemplate::MerchantWelcome { name } => format!(
                "Hi {name}! Congratulations, your merchant application has been approved. Log in to start managing your brand."
            ),
            MailTemplate::MerchantSignup { signup_url, email } => format!(
                "Congratulations, your merchant application has been approved! Complete the registration of {email} by following this link:\n\n{signup_url}"
            ),
            MailTemplate::MerchantDeactivateAccount => {
                "Your merchant account has been deactivated. Please contact the administrator for more information.".to_string()
            }
        }
    }
}

/// 商家注册链接：`{base}/merchant-signup/{token}?email={email}`，email 经过百分号编码
pub fn merchant_signup_url(base: &str, token: &str, email: &str) -> AppResult<String> {
    let base = base.trim_end_matches('/');
    let base = if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("http://{base}")
    };
    let mut url = Url::parse(&format!("{base}/merchant-signup/{token}"))
        .map_err(|e| AppError::InternalError(format!("invalid signup link base {base}: {e}")))?;
    url.query_pairs_mut().append_pair("email", email);
    Ok(url.to_string())
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, template: &MailTemplate) -> AppResult<()>;
}

/// 通知失败只记日志，不影响请求结果
pub async fn send_or_log(mailer: &dyn Mailer, to: &str, template: MailTemplate) {
    if let Err(e) = mailer.send(to, &template).await {
        log::error!("Failed to send {} email to {}: {}", template.name(), to, e);
    }
}

/// 未启用邮件服务时使用，只记录日志
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, template: &MailTemplate) -> AppResult<()> {
        log::info!("Mail delivery disabled, skipping {} email to {}", template.name(), to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_names() {
        assert_eq!(MailTemplate::MerchantApplication.name(), "merchant-application");
        assert_eq!(
            MailTemplate::MerchantDeactivateAccount.name(),
            "merchant-deactivate-account"
        );
    }

    #[test]
    fn test_signup_template_carries_link() {
        let url = merchant_signup_url("shop.example.com/", "abc123", "jane@example.com").unwrap();
        assert_eq!(
            url,
            "http://shop.example.com/merchant-signup/abc123?email=jane%40example.com"
        );

        let template = MailTemplate::MerchantSignup {
            signup_url: url.clone(),
            email: "jane@example.com".to_string(),
        };
        assert_eq!(template.name(), "merchant-signup");
        assert!(template.text().contains(&url));
    }

    #[test]
    fn test_signup_url_keeps_scheme() {
        let url = merchant_signup_url("https://shop.example.com", "t", "a@b.co").unwrap();
        assert!(url.starts_with("https://shop.example.com/merchant-signup/t"));
    }

    #[test]
    fn test_signup_url_encodes_plus_in_email() {
        let url = merchant_signup_url("https://shop.example.com", "t", "a+b@x.com").unwrap();
        assert!(url.ends_with("?email=a%2Bb%40x.com"));

        let parsed = Url::parse(&url).unwrap();
        let email = parsed
            .query_pairs()
            .find(|(key, _)| key == "email")
            .map(|(_, value)| value.into_owned());
        assert_eq!(email.as_deref(), Some("a+b@x.com"));
    }
}
