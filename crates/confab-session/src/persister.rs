use std::sync::Arc;

use confab_store::{ConversationRecord, ConversationStore};
use tokio::sync::{mpsc, oneshot};

enum PersistCommand {
    Save(Vec<ConversationRecord>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget persistence with writes applied strictly in submission
/// order.
///
/// One background task drains the queue, so a later snapshot can never be
/// overtaken by an earlier in-flight write. Failures are logged and never
/// interrupt the chat flow.
#[derive(Clone)]
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistQueue {
    pub fn spawn(store: Arc<dyn ConversationStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                let result = match command {
                    PersistCommand::Save(records) => store.save_all(&records).await,
                    PersistCommand::Clear => store.clear().await,
                    PersistCommand::Flush(done) => {
                        let _ = done.send(());
                        continue;
                    }
                };

                if let Err(e) = result {
                    tracing::error!("history persistence failed: {e}");
                }
            }
        });

        Self { tx }
    }

    /// Queue a full-collection snapshot for saving.
    pub fn save(&self, records: Vec<ConversationRecord>) {
        self.send(PersistCommand::Save(records));
    }

    /// Queue removal of all persisted records.
    pub fn clear(&self) {
        self.send(PersistCommand::Clear);
    }

    /// Wait until every previously queued write has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(PersistCommand::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn send(&self, command: PersistCommand) {
        if self.tx.send(command).is_err() {
            tracing::error!("persistence task is gone; dropping write");
        }
    }
}
