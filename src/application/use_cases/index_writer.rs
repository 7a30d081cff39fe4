use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::application::IndexRepository;
use crate::domain::{DomainError, IndexedFile};

const QUEUE_DEPTH: usize = 64;

enum WriteCommand {
    Reindex {
        file: IndexedFile,
        chunks: Vec<String>,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    Remove {
        identity: String,
        reply: oneshot::Sender<Result<bool, DomainError>>,
    },
}

/// Handle to the single task that owns write access to the index.
///
/// Commands are applied one at a time in arrival order, so no two
/// replacements interleave their delete and insert. The worker exits once
/// every handle has been dropped.
#[derive(Clone)]
pub struct IndexWriter {
    tx: mpsc::Sender<WriteCommand>,
}

impl IndexWriter {
    pub fn spawn(repository: Arc<dyn IndexRepository>) -> Self {
        let (tx, mut rx) = mpsc::channel::<WriteCommand>(QUEUE_DEPTH);

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WriteCommand::Reindex { file, chunks, reply } => {
                        debug!("Committing {} ({} chunks)", file.identity(), chunks.len());
                        let result = repository.reindex(&file, &chunks).await;
                        let _ = reply.send(result);
                    }
                    WriteCommand::Remove { identity, reply } => {
                        debug!("Removing {}", identity);
                        let result = repository.remove(&identity).await;
                        let _ = reply.send(result);
                    }
                }
            }
            debug!("Index writer stopped");
        });

        Self { tx }
    }

    pub async fn reindex(&self, file: IndexedFile, chunks: Vec<String>) -> Result<(), DomainError> {
        let (reply, rx) = oneshot::channel();
        self.send(WriteCommand::Reindex { file, chunks, reply }).await?;
        rx.await
            .map_err(|_| DomainError::internal("index writer dropped the reply"))?
    }

    pub async fn remove(&self, identity: impl Into<String>) -> Result<bool, DomainError> {
        let (reply, rx) = oneshot::channel();
        self.send(WriteCommand::Remove {
            identity: identity.into(),
            reply,
        })
        .await?;
        rx.await
            .map_err(|_| DomainError::internal("index writer dropped the reply"))?
    }

    async fn send(&self, command: WriteCommand) -> Result<(), DomainError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| DomainError::internal("index writer is not running"))
    }
}
