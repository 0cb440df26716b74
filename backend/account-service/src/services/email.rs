/// Mail gateway for verification OTPs and password reset links.
use std::sync::Arc;
use std::time::Duration;

use lettre::message::{header, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::config::EmailSettings;
use crate::error::{ApiError, ApiResult};

const SEND_ATTEMPTS: u32 = 3;
const SEND_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Mask an email address for log lines.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.len() > 2 => {
            let prefix: String = local.chars().take(2).collect();
            format!("{}***@{}", prefix, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}

/// Async SMTP transport wrapper (or no-op when unconfigured).
///
/// Constructed once at startup and injected into the services that send;
/// there is no module-level transporter.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    reset_base_url: String,
}

impl EmailService {
    /// Build the mail gateway from configuration.
    ///
    /// If the SMTP host is empty, operates in no-op mode (logs only).
    /// Useful for development and testing without email infrastructure.
    pub fn new(config: &EmailSettings) -> ApiResult<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| ApiError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| ApiError::Internal(format!("Failed to configure SMTP transport: {}", e)))?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            reset_base_url: config.reset_base_url.clone(),
        })
    }

    /// Check if the SMTP transport is enabled
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Email a verification OTP to a freshly registered address.
    pub async fn send_otp_email(&self, recipient: &str, otp: &str) -> ApiResult<()> {
        let subject = "Verify your email";
        let html_body = format!(
            "<p>Use the OTP <b>{otp}</b> in the app to verify your email address and complete your registration. <b>Expires in 6 hours</b>.</p>"
        );
        let text_body = format!(
            "Use the OTP {otp} in the app to verify your email address and complete your registration. Expires in 6 hours."
        );

        self.send_html_email(recipient, subject, &html_body, &text_body)
            .await
    }

    /// Email a password reset link carrying the raw token.
    pub async fn send_password_reset_email(&self, recipient: &str, token: &str) -> ApiResult<()> {
        let link = self.build_reset_link(token);
        let subject = "Reset your password";
        let html_body = format!(
            "<p>You requested a password reset. Click the link below to choose a new password. <b>Expires in 30 minutes</b>.</p>\
             <p><a href=\"{link}\">{link}</a></p>\
             <p>If you did not request this, please ignore this email.</p>"
        );
        let text_body = format!(
            "You requested a password reset. Open the link below to choose a new password. Expires in 30 minutes.\n\n{link}\n\nIf you did not request this, please ignore this email."
        );

        self.send_html_email(recipient, subject, &html_body, &text_body)
            .await
    }

    fn build_reset_link(&self, token: &str) -> String {
        format!("{}/resetpassword/{}", self.reset_base_url, token)
    }

    /// Send an HTML email with a plain text fallback.
    async fn send_html_email(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> ApiResult<()> {
        let Some(transport) = &self.transport else {
            info!(
                subject,
                recipient = %mask_email(recipient),
                "Email service running in no-op mode; skipping actual send"
            );
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| ApiError::Internal(format!("Invalid recipient email address: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| ApiError::Internal(format!("Failed to build email message: {}", e)))?;

        self.send_with_retry(transport, email).await?;
        info!(subject, "email sent successfully");
        Ok(())
    }

    /// Bounded retry around the transport: 3 attempts with exponential
    /// backoff and a per-attempt deadline.
    async fn send_with_retry(
        &self,
        transport: &AsyncSmtpTransport<Tokio1Executor>,
        email: Message,
    ) -> ApiResult<()> {
        let mut backoff = INITIAL_BACKOFF;
        let mut last_error = String::new();

        for attempt in 1..=SEND_ATTEMPTS {
            match tokio::time::timeout(SEND_ATTEMPT_TIMEOUT, transport.send(email.clone())).await {
                Ok(Ok(_)) => return Ok(()),
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error = format!("send timed out after {:?}", SEND_ATTEMPT_TIMEOUT);
                }
            }

            if attempt < SEND_ATTEMPTS {
                warn!(attempt, error = %last_error, "email send failed; retrying");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(ApiError::Mail(last_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_settings() -> EmailSettings {
        EmailSettings {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "noreply@shopfront.dev".to_string(),
            use_starttls: true,
            reset_base_url: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_noop_mode_when_host_empty() {
        let service = EmailService::new(&noop_settings()).expect("should build service");
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_noop_send_succeeds() {
        let service = EmailService::new(&noop_settings()).expect("should build service");
        service
            .send_otp_email("alice@example.com", "4821")
            .await
            .expect("no-op send should succeed");
        service
            .send_password_reset_email("alice@example.com", "sometoken")
            .await
            .expect("no-op send should succeed");
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let mut settings = noop_settings();
        settings.smtp_from = "not an address".to_string();
        assert!(EmailService::new(&settings).is_err());
    }

    #[test]
    fn test_reset_link_shape() {
        let service = EmailService::new(&noop_settings()).expect("should build service");
        assert_eq!(
            service.build_reset_link("abc123"),
            "http://localhost:3000/resetpassword/abc123"
        );
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "al***@example.com");
        assert_eq!(mask_email("ab@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
