use async_trait::async_trait;
use bazaar_core::notify::Notifier;

/// Logs outbound notifications instead of delivering them. Stands in for the
/// real email collaborator in development; delivery failure is impossible by
/// construction, which matches the fire-and-forget contract callers expect.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> bool {
        tracing::info!("notification to {}: {} ({} bytes)", recipient, subject, body.len());
        true
    }
}
