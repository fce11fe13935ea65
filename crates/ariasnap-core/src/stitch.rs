//! Frame-by-frame capture of a page.
//!
//! Each frame is built and collapsed on its own execution context; its refs
//! come from its own registry once the tree arrives. The stitcher then fans
//! out to the frames shown by the frame's iframes and hangs every child tree
//! under its iframe node.
//! Siblings are requested together and attached in document order whatever
//! order they answer in.

use std::collections::HashMap;
use std::sync::Arc;

use ariasnap_protocols::{
    AriaProvider, DomError, DomView, FrameError, FrameHandle, FrameId, NodeId, PageHandle,
};
use futures::future::{BoxFuture, FutureExt, join_all};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::builder::{FrameTree, build_frame_tree};
use crate::collapse::collapse_tree;
use crate::geometry::MainFrameViewport;
use crate::refs::RefRegistry;
use crate::tree::{AriaChild, AriaNode};

pub(crate) type SharedRegistry = Arc<Mutex<RefRegistry>>;

/// Run `f` against the frame's document and return its result.
pub(crate) async fn evaluate<R, F>(frame: &dyn FrameHandle, f: F) -> Result<R, FrameError>
where
    R: Send + 'static,
    F: FnOnce(&dyn DomView) -> R + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    frame
        .run(Box::new(move |dom: &dyn DomView| {
            let _ = tx.send(f(dom));
        }))
        .await?;
    // The host accepted the task but never ran it.
    rx.await.map_err(|_| FrameError::Detached)
}

#[derive(Debug)]
struct ChildFrame {
    ordinal: u32,
    parent: FrameId,
    registry: SharedRegistry,
}

/// Ref registries of a page's frames and the frame ordinals behind them.
///
/// The main frame has ordinal 0. Child frames are numbered from 1 as they are
/// discovered; an ordinal is never handed out twice, even after its frame is
/// gone.
#[derive(Debug)]
pub(crate) struct FrameTable {
    main_id: Option<FrameId>,
    main: SharedRegistry,
    last_ordinal: u32,
    children: HashMap<FrameId, ChildFrame>,
}

impl Default for FrameTable {
    fn default() -> Self {
        Self {
            main_id: None,
            main: Arc::new(Mutex::new(RefRegistry::new(0))),
            last_ordinal: 0,
            children: HashMap::new(),
        }
    }
}

impl FrameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of the main frame `id`.
    pub fn main(&mut self, id: &FrameId) -> SharedRegistry {
        if self.main_id.as_ref() != Some(id) {
            if let Some(previous) = self.main_id.replace(id.clone()) {
                debug!(%previous, current = %id, "Main frame replaced, dropping its refs");
                self.main.lock().reset();
            }
        }
        self.main.clone()
    }

    /// Registry of child frame `id`, numbering the frame on first sight.
    pub fn child(&mut self, id: &FrameId, parent: &FrameId) -> SharedRegistry {
        if let Some(frame) = self.children.get(id) {
            return frame.registry.clone();
        }
        self.last_ordinal += 1;
        let ordinal = self.last_ordinal;
        debug!(frame = %id, ordinal, "Discovered frame");
        let registry = Arc::new(Mutex::new(RefRegistry::new(ordinal)));
        self.children.insert(
            id.clone(),
            ChildFrame {
                ordinal,
                parent: parent.clone(),
                registry: registry.clone(),
            },
        );
        registry
    }

    /// Drop the registries of frames the page no longer has.
    pub fn prune(&mut self, page: &dyn PageHandle) {
        let before = self.children.len();
        self.children.retain(|id, _| page.frame(id).is_some());
        let pruned = before - self.children.len();
        if pruned > 0 {
            debug!(pruned, "Dropped registries of detached frames");
        }
    }

    pub fn by_ordinal(&self, ordinal: u32) -> Option<(FrameId, SharedRegistry)> {
        if ordinal == 0 {
            return self.main_id.clone().map(|id| (id, self.main.clone()));
        }
        self.children
            .iter()
            .find(|(_, frame)| frame.ordinal == ordinal)
            .map(|(id, frame)| (id.clone(), frame.registry.clone()))
    }

    /// Frames from the main frame down to `id`, both included.
    pub fn chain(&self, id: &FrameId) -> Vec<FrameId> {
        let mut chain = vec![id.clone()];
        let mut current = id;
        while let Some(frame) = self.children.get(current) {
            chain.push(frame.parent.clone());
            current = &frame.parent;
        }
        chain.reverse();
        chain
    }
}

/// Build and collapse one frame, and list which of `tracked` left the
/// document.
fn build_collapsed(
    dom: &dyn DomView,
    provider: &dyn AriaProvider,
    tracked: Vec<NodeId>,
    transform: Option<MainFrameViewport>,
) -> Result<(FrameTree, Vec<NodeId>), DomError> {
    let FrameTree {
        root,
        iframes,
        has_focus,
        transform,
    } = build_frame_tree(dom, provider, transform)?;
    let tree = FrameTree {
        root: collapse_tree(root),
        iframes,
        has_focus,
        transform,
    };

    let mut stale = Vec::new();
    for node in tracked {
        if !dom.is_connected(node)? {
            stale.push(node);
        }
    }
    Ok((tree, stale))
}

/// A frame's stitched tree and whether focus rests somewhere inside it.
struct Stitched {
    root: AriaNode,
    has_focus: bool,
}

/// One capture of a page, bounded by `deadline`.
pub(crate) struct Stitcher<'a> {
    pub page: &'a dyn PageHandle,
    pub provider: &'a Arc<dyn AriaProvider>,
    pub frames: &'a Mutex<FrameTable>,
    pub deadline: Instant,
}

impl Stitcher<'_> {
    /// Capture the main frame and every frame below it.
    ///
    /// Only a main frame failure is an error; child frames that cannot be
    /// read leave their iframe node empty.
    pub async fn capture(&self) -> Result<AriaNode, FrameError> {
        let main = self.page.main_frame();
        let main_id = main.id();
        let registry = self.frames.lock().main(&main_id);
        let tree = self.capture_frame(main, registry, None).await?;
        Ok(self.stitch(main_id, tree).await.root)
    }

    /// Capture one frame. The registry only changes once the frame's tree has
    /// arrived before the deadline.
    async fn capture_frame(
        &self,
        frame: Arc<dyn FrameHandle>,
        registry: SharedRegistry,
        transform: Option<MainFrameViewport>,
    ) -> Result<FrameTree, FrameError> {
        let provider = self.provider.clone();
        let tracked = registry.lock().tracked_nodes();
        let build = evaluate(frame.as_ref(), move |dom| {
            build_collapsed(dom, provider.as_ref(), tracked, transform)
        });
        let (mut tree, stale) = match timeout_at(self.deadline, build).await {
            Ok(built) => built??,
            Err(_) => return Err(FrameError::Timeout),
        };

        let mut registry = registry.lock();
        registry.forget(&stale);
        registry.assign_tree(&mut tree.root);
        debug!(frame = %frame.id(), iframes = tree.iframes.len(), "Frame captured");
        Ok(tree)
    }

    fn stitch(&self, frame_id: FrameId, tree: FrameTree) -> BoxFuture<'_, Stitched> {
        async move {
            let FrameTree {
                mut root,
                iframes,
                has_focus,
                transform,
            } = tree;

            // Number the children before any of them is built.
            let requests: Vec<_> = {
                let mut table = self.frames.lock();
                iframes
                    .iter()
                    .map(|slot| {
                        let id = slot.frame.as_ref()?;
                        let handle = self.page.frame(id)?;
                        let registry = table.child(id, &frame_id);
                        let transform = transform.compose(&slot.rect, slot.content_offset);
                        Some((handle, registry, transform))
                    })
                    .collect()
            };

            let mut children = join_all(requests.into_iter().map(|request| async move {
                let (handle, registry, transform) = request?;
                let id = handle.id();
                match self.capture_frame(handle, registry, Some(transform)).await {
                    Ok(tree) => Some(self.stitch(id, tree).await),
                    Err(err) => {
                        warn!(frame = %id, error = %err, "Frame unavailable, leaving iframe empty");
                        None
                    }
                }
            }))
            .await;

            let child_focus = attach_frames(&mut root, &mut children);
            Stitched {
                root,
                has_focus: has_focus || child_focus,
            }
        }
        .boxed()
    }
}

/// Hang each stitched child frame under its iframe node. Returns whether any
/// attached frame holds focus.
fn attach_frames(node: &mut AriaNode, frames: &mut [Option<Stitched>]) -> bool {
    if let Some(slot) = node.frame_slot {
        let Some(frame) = frames.get_mut(slot).and_then(Option::take) else {
            return false;
        };
        node.active |= frame.has_focus;
        node.children = vec![AriaChild::Node(frame.root)];
        return frame.has_focus;
    }
    let mut focus = false;
    for child in &mut node.children {
        if let AriaChild::Node(child) = child {
            focus |= attach_frames(child, frames);
        }
    }
    focus
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ariasnap_host_static::{StaticDocument, StaticFrame, StaticPage};
    use ariasnap_protocols::DomTask;
    use async_trait::async_trait;

    /// Accepts tasks at once and runs them on its own after `delay`.
    struct DelayedFrame {
        inner: Arc<StaticFrame>,
        delay: Duration,
    }

    #[async_trait]
    impl FrameHandle for DelayedFrame {
        fn id(&self) -> FrameId {
            self.inner.id()
        }

        async fn run(&self, task: DomTask) -> Result<(), FrameError> {
            let inner = self.inner.clone();
            let delay = self.delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = inner.run(task).await;
            });
            Ok(())
        }

        async fn wait_for_stable(&self) -> Result<(), FrameError> {
            Ok(())
        }
    }

    #[test]
    fn test_ordinals_are_never_reused() {
        let page = StaticPage::new(StaticDocument::new(800.0, 600.0));
        let main = page.main_id();
        let first = page.add_frame(StaticDocument::new(300.0, 150.0));
        let mut table = FrameTable::new();
        table.main(&main);
        assert_eq!(table.child(&first, &main).lock().frame(), 1);
        assert_eq!(table.child(&first, &main).lock().frame(), 1);

        page.detach_frame(&first);
        table.prune(page.as_ref());
        assert!(table.by_ordinal(1).is_none());

        let second = page.add_frame(StaticDocument::new(300.0, 150.0));
        assert_eq!(table.child(&second, &main).lock().frame(), 2);
        assert_eq!(table.by_ordinal(0).map(|(id, _)| id), Some(main));
    }

    #[test]
    fn test_chain_and_lookup() {
        let mut table = FrameTable::new();
        let main = FrameId::new("main");
        let outer = FrameId::new("outer");
        let inner = FrameId::new("inner");
        table.main(&main);
        table.child(&outer, &main);
        table.child(&inner, &outer);

        assert_eq!(table.chain(&inner), vec![main.clone(), outer.clone(), inner.clone()]);
        assert_eq!(table.chain(&main), vec![main.clone()]);
        assert_eq!(table.by_ordinal(2).map(|(id, _)| id), Some(inner));
        assert_eq!(table.by_ordinal(0).map(|(id, _)| id), Some(main));
        assert!(table.by_ordinal(3).is_none());
    }

    #[test]
    fn test_by_ordinal_before_first_capture() {
        assert!(FrameTable::new().by_ordinal(0).is_none());
    }

    #[tokio::test]
    async fn test_evaluate_returns_task_result() {
        let page = StaticPage::new(StaticDocument::new(800.0, 600.0));
        let body = page.update_main(|doc| doc.body());
        let root = evaluate(page.main_frame().as_ref(), |dom| dom.root_element())
            .await
            .unwrap();
        assert_eq!(root, Ok(body));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_frame_leaves_registry_untouched() {
        let page = StaticPage::new(StaticDocument::new(800.0, 600.0));
        let mut doc = StaticDocument::new(300.0, 150.0);
        let button = doc.append_element(doc.body(), "button");
        doc.append_text(button, "Late");
        let frame = Arc::new(DelayedFrame {
            inner: Arc::new(StaticFrame::new(FrameId::new("frame-1"), doc)),
            delay: Duration::from_millis(200),
        });
        let provider: Arc<dyn AriaProvider> =
            Arc::new(ariasnap_host_static::HtmlAriaProvider::new());
        let frames = Mutex::new(FrameTable::new());
        let registry = frames.lock().child(&frame.id(), &page.main_id());

        let stitcher = Stitcher {
            page: page.as_ref(),
            provider: &provider,
            frames: &frames,
            deadline: Instant::now() + Duration::from_millis(50),
        };
        let result = stitcher
            .capture_frame(frame.clone(), registry.clone(), None)
            .await;
        assert!(matches!(result, Err(FrameError::Timeout)));

        // The task still runs on the frame after the deadline.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(registry.lock().is_empty());

        let stitcher = Stitcher {
            deadline: Instant::now() + Duration::from_secs(1),
            ..stitcher
        };
        let tree = stitcher
            .capture_frame(frame, registry.clone(), None)
            .await
            .unwrap();
        assert_eq!(tree.root.aria_ref.as_deref(), Some("f1e1"));
    }
}
