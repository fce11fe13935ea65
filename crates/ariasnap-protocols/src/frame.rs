//! Frame and page handles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dom::DomView;
use crate::error::FrameError;
use crate::types::FrameId;

/// Work executed against a frame's document on the frame's own thread.
pub type DomTask = Box<dyn FnOnce(&dyn DomView) + Send>;

/// A live frame of a page.
///
/// Out-of-process frames answer asynchronously, so every document access goes
/// through [`run`](Self::run).
#[async_trait]
pub trait FrameHandle: Send + Sync {
    fn id(&self) -> FrameId;

    /// Run `task` against the frame's document.
    ///
    /// The task runs synchronously and to completion on the frame's execution
    /// context. Fails when the frame is detached, crashed or not loaded; a host
    /// that drops the task without running it must report an error.
    async fn run(&self, task: DomTask) -> Result<(), FrameError>;

    /// Resolves once pending navigations and blocking resources have settled.
    async fn wait_for_stable(&self) -> Result<(), FrameError>;
}

/// Frame lookup for one page.
pub trait PageHandle: Send + Sync {
    fn main_frame(&self) -> Arc<dyn FrameHandle>;

    /// Live frame by id. `None` once the frame is detached.
    fn frame(&self, id: &FrameId) -> Option<Arc<dyn FrameHandle>>;
}
