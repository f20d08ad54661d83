//! Mailer Module
//! 通知送信（このフェーズでは実送信せずログに出すだけ）
//!
//! 実配信が必要になったらここを SMTP クライアントに差し替える。

use tracing::info;

/// メール送信をシミュレートする
pub async fn send_email(to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
    info!("📧 Simulated email");
    info!("To: {}", to);
    info!("Subject: {}", subject);
    info!("Body: {}", body);
    Ok(())
}
