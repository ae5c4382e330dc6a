use async_trait::async_trait;

/// Outbound notification boundary (vendor emails, payment reminders).
///
/// Delivery is fire-and-forget: implementations report success as a bare
/// boolean and callers treat failure as a soft error to log, never to
/// propagate.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> bool;
}
