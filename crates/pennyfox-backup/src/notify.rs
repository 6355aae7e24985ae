use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupEvent {
    Restored,
}

/// Receives backup lifecycle events on behalf of the presentation layer.
pub trait BackupNotifier: Send + Sync {
    fn backup_restored(&self);
}

/// Fans backup events out to every subscribed receiver.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<BackupEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BackupEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl BackupNotifier for BroadcastNotifier {
    fn backup_restored(&self) {
        if self.sender.send(BackupEvent::Restored).is_err() {
            tracing::debug!("No subscribers for backup restored event");
        }
    }
}
