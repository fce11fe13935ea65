//! A page: the main frame plus attached child frames.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ariasnap_protocols::{FrameHandle, FrameId, NodeId, PageHandle};
use parking_lot::RwLock;
use tracing::debug;

use crate::document::{NodeData, StaticDocument};
use crate::frame::{FrameStatus, Settle, StaticFrame};

/// Frames of one page, keyed by id.
///
/// The main frame is always `"main"`; child frames get `"frame-<n>"` ids in
/// creation order.
pub struct StaticPage {
    main: Arc<StaticFrame>,
    frames: RwLock<HashMap<FrameId, Arc<StaticFrame>>>,
    next_frame: AtomicU64,
}

impl StaticPage {
    pub fn new(document: StaticDocument) -> Arc<Self> {
        let main = Arc::new(StaticFrame::new(FrameId::new("main"), document));
        let mut frames = HashMap::new();
        frames.insert(main.id(), main.clone());
        Arc::new(Self {
            main,
            frames: RwLock::new(frames),
            next_frame: AtomicU64::new(1),
        })
    }

    pub fn main_id(&self) -> FrameId {
        self.main.id()
    }

    pub fn static_frame(&self, id: &FrameId) -> Option<Arc<StaticFrame>> {
        self.frames.read().get(id).cloned()
    }

    /// Create a frame that no iframe displays yet.
    pub fn add_frame(&self, document: StaticDocument) -> FrameId {
        let id = FrameId::new(format!(
            "frame-{}",
            self.next_frame.fetch_add(1, Ordering::Relaxed)
        ));
        let frame = Arc::new(StaticFrame::new(id.clone(), document));
        self.frames.write().insert(id.clone(), frame);
        id
    }

    /// Create a frame and display it in `iframe` of `parent`.
    pub fn attach_iframe(
        &self,
        parent: &FrameId,
        iframe: NodeId,
        document: StaticDocument,
    ) -> FrameId {
        let id = self.add_frame(document);
        self.update(parent, |doc| doc.set_content_frame(iframe, Some(id.clone())));
        id
    }

    /// Detach a child frame. Iframes that displayed it keep pointing at the
    /// stale id.
    pub fn detach_frame(&self, id: &FrameId) {
        if *id == self.main.id() {
            return;
        }
        if let Some(frame) = self.frames.write().remove(id) {
            frame.set_status(FrameStatus::Detached);
            debug!(frame = %id, "Frame detached");
        }
    }

    pub fn update<R>(&self, id: &FrameId, f: impl FnOnce(&mut StaticDocument) -> R) -> Option<R> {
        self.static_frame(id).map(|frame| frame.update(f))
    }

    pub fn read<R>(&self, id: &FrameId, f: impl FnOnce(&StaticDocument) -> R) -> Option<R> {
        self.static_frame(id).map(|frame| frame.read(f))
    }

    pub fn update_main<R>(&self, f: impl FnOnce(&mut StaticDocument) -> R) -> R {
        self.main.update(f)
    }

    pub fn set_status(&self, id: &FrameId, status: FrameStatus) {
        if let Some(frame) = self.static_frame(id) {
            frame.set_status(status);
        }
    }

    pub fn set_settle(&self, id: &FrameId, settle: Settle) {
        if let Some(frame) = self.static_frame(id) {
            frame.set_settle(settle);
        }
    }

    /// Focus `element` in `frame`. Every ancestor document focuses the iframe
    /// leading to it; every other document loses focus.
    pub fn focus(&self, frame: &FrameId, element: NodeId) {
        let frames: Vec<Arc<StaticFrame>> = self.frames.read().values().cloned().collect();
        for other in &frames {
            other.update(|doc| doc.blur());
        }

        let mut current = frame.clone();
        let mut target = element;
        loop {
            let Some(owner) = self.static_frame(&current) else {
                return;
            };
            owner.update(|doc| doc.focus(target));

            let host = frames.iter().find_map(|candidate| {
                candidate
                    .read(|doc| iframe_displaying(doc, &current))
                    .map(|iframe| (candidate.id(), iframe))
            });
            match host {
                Some((parent, iframe)) => {
                    current = parent;
                    target = iframe;
                }
                None => return,
            }
        }
    }
}

fn iframe_displaying(doc: &StaticDocument, frame: &FrameId) -> Option<NodeId> {
    doc.nodes.iter().enumerate().find_map(|(index, node)| {
        let NodeData::Element(el) = &node.data else {
            return None;
        };
        (el.content_frame.as_ref() == Some(frame)).then_some(NodeId(index as u64))
    })
}

impl PageHandle for StaticPage {
    fn main_frame(&self) -> Arc<dyn FrameHandle> {
        self.main.clone()
    }

    fn frame(&self, id: &FrameId) -> Option<Arc<dyn FrameHandle>> {
        self.static_frame(id)
            .map(|frame| frame as Arc<dyn FrameHandle>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariasnap_protocols::DomView;

    #[test]
    fn test_frame_ids() {
        let page = StaticPage::new(StaticDocument::new(800.0, 600.0));
        assert_eq!(page.main_id(), FrameId::new("main"));
        let first = page.add_frame(StaticDocument::new(300.0, 150.0));
        let second = page.add_frame(StaticDocument::new(300.0, 150.0));
        assert_eq!(first, FrameId::new("frame-1"));
        assert_eq!(second, FrameId::new("frame-2"));
        assert!(page.frame(&first).is_some());
    }

    #[test]
    fn test_detach_frame() {
        let page = StaticPage::new(StaticDocument::new(800.0, 600.0));
        let id = page.add_frame(StaticDocument::new(300.0, 150.0));
        let frame = page.static_frame(&id).unwrap();
        page.detach_frame(&id);
        assert!(page.frame(&id).is_none());
        assert_eq!(frame.status(), FrameStatus::Detached);

        page.detach_frame(&page.main_id());
        assert!(page.frame(&page.main_id()).is_some());
    }

    #[test]
    fn test_focus_propagates_to_host_iframes() {
        let page = StaticPage::new(StaticDocument::new(800.0, 600.0));
        let main = page.main_id();
        let outer_iframe = page.update_main(|doc| doc.append_element(doc.body(), "iframe"));
        let mut child = StaticDocument::new(300.0, 150.0);
        let inner_iframe = child.append_element(child.body(), "iframe");
        let child_id = page.attach_iframe(&main, outer_iframe, child);
        let mut grandchild = StaticDocument::new(300.0, 150.0);
        let input = grandchild.append_element(grandchild.body(), "input");
        let grandchild_id = page.attach_iframe(&child_id, inner_iframe, grandchild);

        page.focus(&grandchild_id, input);

        assert_eq!(
            page.read(&grandchild_id, |doc| doc.active_element().unwrap()),
            Some(Some(input))
        );
        assert_eq!(
            page.read(&child_id, |doc| doc.active_element().unwrap()),
            Some(Some(inner_iframe))
        );
        assert_eq!(
            page.read(&main, |doc| doc.active_element().unwrap()),
            Some(Some(outer_iframe))
        );
    }
}
