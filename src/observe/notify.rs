//! Change bus for waking live note feeds.
//!
//! - tokio::sync::broadcast for pub-sub notifications
//! - Notices carry no rows; receivers re-query the table

use tokio::sync::broadcast::{self, Receiver, Sender};

/// What kind of write touched the notes table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Upserted,
    Deleted,
}

/// Notice sent after a committed change to the notes table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice {
    pub kind: ChangeKind,
    /// Id of the row that changed
    pub id: i64,
}

/// Broadcast bus of table-change notices.
///
/// A receiver that lags behind only loses notices, never data: any notice
/// means "re-read the table".
#[derive(Clone, Debug)]
pub struct ChangeBus {
    sender: Sender<ChangeNotice>,
}

impl ChangeBus {
    /// Create a new change bus with the given capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of buffered notices.
    ///   Older notices are dropped if consumers fall behind.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to notices sent from now on.
    pub fn subscribe(&self) -> Receiver<ChangeNotice> {
        self.sender.subscribe()
    }

    /// Announce a committed change.
    ///
    /// Called by the writer thread after each write that changed a row.
    /// Returns the number of receivers that got the notice.
    pub fn notify(&self, kind: ChangeKind, id: i64) -> usize {
        // send() fails when nobody is listening, which is fine
        self.sender.send(ChangeNotice { kind, id }).unwrap_or(0)
    }

    /// Get the number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_change_bus_fan_out() {
        let bus = ChangeBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.notify(ChangeKind::Upserted, 7), 2);

        let expected = ChangeNotice {
            kind: ChangeKind::Upserted,
            id: 7,
        };
        assert_eq!(rx1.recv().await.unwrap(), expected);
        assert_eq!(rx2.recv().await.unwrap(), expected);
    }

    #[test]
    fn test_notify_without_receivers() {
        let bus = ChangeBus::new(16);
        assert_eq!(bus.notify(ChangeKind::Deleted, 1), 0);
        assert_eq!(bus.receiver_count(), 0);
    }
}
