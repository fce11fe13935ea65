//! Frames with a controllable availability state.

use std::time::Duration;

use ariasnap_protocols::{DomTask, FrameError, FrameHandle, FrameId};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::document::StaticDocument;

/// How a frame answers document tasks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrameStatus {
    #[default]
    Ready,
    /// No document yet; tasks fail with [`FrameError::NotLoaded`].
    Loading,
    Crashed(String),
    /// Accepts tasks and never answers.
    Hung,
    Detached,
}

/// When [`FrameHandle::wait_for_stable`] resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Settle {
    #[default]
    Immediate,
    After(Duration),
    Never,
}

/// A frame over one [`StaticDocument`].
pub struct StaticFrame {
    id: FrameId,
    document: RwLock<StaticDocument>,
    status: RwLock<FrameStatus>,
    settle: RwLock<Settle>,
}

impl StaticFrame {
    pub fn new(id: FrameId, document: StaticDocument) -> Self {
        Self {
            id,
            document: RwLock::new(document),
            status: RwLock::new(FrameStatus::Ready),
            settle: RwLock::new(Settle::Immediate),
        }
    }

    pub fn status(&self) -> FrameStatus {
        self.status.read().clone()
    }

    pub fn set_status(&self, status: FrameStatus) {
        *self.status.write() = status;
    }

    pub fn set_settle(&self, settle: Settle) {
        *self.settle.write() = settle;
    }

    /// Read the document.
    pub fn read<R>(&self, f: impl FnOnce(&StaticDocument) -> R) -> R {
        f(&self.document.read())
    }

    /// Mutate the document.
    pub fn update<R>(&self, f: impl FnOnce(&mut StaticDocument) -> R) -> R {
        f(&mut self.document.write())
    }
}

#[async_trait]
impl FrameHandle for StaticFrame {
    fn id(&self) -> FrameId {
        self.id.clone()
    }

    async fn run(&self, task: DomTask) -> Result<(), FrameError> {
        let status = self.status();
        match status {
            FrameStatus::Ready => {
                let document = self.document.read();
                task(&*document);
                Ok(())
            }
            FrameStatus::Loading => Err(FrameError::NotLoaded),
            FrameStatus::Crashed(reason) => Err(FrameError::Crashed(reason)),
            FrameStatus::Detached => Err(FrameError::Detached),
            FrameStatus::Hung => {
                debug!(frame = %self.id, "Frame is hung, task will never run");
                std::future::pending::<()>().await;
                Err(FrameError::Timeout)
            }
        }
    }

    async fn wait_for_stable(&self) -> Result<(), FrameError> {
        let settle = *self.settle.read();
        match settle {
            Settle::Immediate => Ok(()),
            Settle::After(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Settle::Never => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}
