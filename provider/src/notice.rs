//! Blocking user-visible notices.

/// Receives notices that must be shown to the user, such as a failed wallet
/// connection. Implementations decide how the notice is presented.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notices to stderr, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("notice: {message}");
    }
}
