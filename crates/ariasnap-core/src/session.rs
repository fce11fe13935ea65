//! Page-scoped snapshot session.

use std::sync::Arc;
use std::time::Duration;

use ariasnap_config::{Config, ConfigValidator, SnapshotConfig};
use ariasnap_protocols::{AriaProvider, FrameError, FrameId, NodeId, PageHandle};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::diff::render_delta;
use crate::error::SnapshotError;
use crate::refs::RefId;
use crate::render::render_tree;
use crate::stitch::{FrameTable, Stitcher, evaluate};
use crate::tracks::TrackStore;
use crate::tree::AriaNode;

/// What a capture returns besides the full tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotMode {
    #[default]
    Full,
    /// Also render the changes since the track's previous capture.
    Incremental,
}

/// Options for [`Snapshotter::snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Capture deadline. Falls back to `snapshot.timeout_ms`.
    pub timeout: Option<Duration>,
    pub mode: SnapshotMode,
    /// Baseline to diff against and replace.
    pub track: Option<String>,
}

impl SnapshotOptions {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn incremental(track: impl Into<String>) -> Self {
        Self {
            mode: SnapshotMode::Incremental,
            track: Some(track.into()),
            ..Self::default()
        }
    }

    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Rendered capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub full: String,
    /// Changes since the track's baseline; `None` when there was nothing to
    /// diff against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incremental: Option<String>,
}

/// An element behind a ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedElement {
    pub frame: FrameId,
    /// Frames from the main frame down to `frame`.
    pub frame_chain: Vec<FrameId>,
    pub node: NodeId,
}

/// Captures one page and keeps the state that has to outlive a capture: ref
/// registries per frame, frame ordinals and track baselines.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use ariasnap_core::{SnapshotOptions, Snapshotter};
/// # async fn demo(
/// #     page: Arc<dyn ariasnap_protocols::PageHandle>,
/// #     provider: Arc<dyn ariasnap_protocols::AriaProvider>,
/// # ) -> Result<(), ariasnap_core::SnapshotError> {
/// let snapshotter = Snapshotter::new(page, provider);
/// let snapshot = snapshotter.snapshot(&SnapshotOptions::incremental("agent")).await?;
/// println!("{}", snapshot.full);
/// let element = snapshotter.resolve("e2").await?;
/// # Ok(())
/// # }
/// ```
pub struct Snapshotter {
    page: Arc<dyn PageHandle>,
    provider: Arc<dyn AriaProvider>,
    config: SnapshotConfig,
    frames: Mutex<FrameTable>,
    tracks: Mutex<TrackStore>,
}

impl Snapshotter {
    pub fn new(page: Arc<dyn PageHandle>, provider: Arc<dyn AriaProvider>) -> Self {
        Self::from_parts(page, provider, &Config::default())
    }

    /// Session using `config`, which must pass [`ConfigValidator`].
    pub fn with_config(
        page: Arc<dyn PageHandle>,
        provider: Arc<dyn AriaProvider>,
        config: &Config,
    ) -> Result<Self, SnapshotError> {
        let warnings = ConfigValidator::validate(config).into_result()?;
        for warning in warnings {
            warn!(path = %warning.path, "{}", warning.message);
        }
        Ok(Self::from_parts(page, provider, config))
    }

    fn from_parts(
        page: Arc<dyn PageHandle>,
        provider: Arc<dyn AriaProvider>,
        config: &Config,
    ) -> Self {
        Self {
            page,
            provider,
            config: config.snapshot.clone(),
            frames: Mutex::new(FrameTable::new()),
            tracks: Mutex::new(TrackStore::new(config.tracks.max_tracks)),
        }
    }

    /// Capture the page and render it.
    ///
    /// With a track, the capture becomes that track's new baseline. In
    /// incremental mode the changes since the previous baseline are rendered
    /// too, when there is one.
    pub async fn snapshot(&self, options: &SnapshotOptions) -> Result<Snapshot, SnapshotError> {
        let root = self.capture_tree(options.timeout).await?;
        let full = render_tree(&root);

        let incremental = match &options.track {
            Some(track) => {
                let mut tracks = self.tracks.lock();
                let delta = match (options.mode, tracks.get(track)) {
                    (SnapshotMode::Incremental, Some(baseline)) => {
                        Some(render_delta(&root, baseline))
                    }
                    _ => None,
                };
                tracks.insert(track, root);
                delta
            }
            None => None,
        };
        Ok(Snapshot { full, incremental })
    }

    /// Capture the stitched tree of the whole page.
    pub async fn capture_tree(&self, timeout: Option<Duration>) -> Result<AriaNode, SnapshotError> {
        let budget = timeout.unwrap_or_else(|| self.config.timeout());
        let deadline = Instant::now() + budget;
        if self.config.wait_for_stable {
            self.wait_for_stable(budget / 2).await;
        }

        self.frames.lock().prune(self.page.as_ref());
        let stitcher = Stitcher {
            page: self.page.as_ref(),
            provider: &self.provider,
            frames: &self.frames,
            deadline,
        };
        stitcher.capture().await.map_err(|err| match err {
            FrameError::Timeout => SnapshotError::Timeout(budget),
            other => SnapshotError::Frame(other),
        })
    }

    /// Wait for the page to settle, giving up after `limit`.
    async fn wait_for_stable(&self, limit: Duration) {
        let main = self.page.main_frame();
        match tokio::time::timeout(limit, main.wait_for_stable()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(error = %err, "Page stability check failed, capturing current state")
            }
            Err(_) => warn!(?limit, "Page did not settle in time, capturing current state"),
        }
    }

    /// Element behind a ref issued by the latest capture of its frame.
    pub async fn resolve(&self, aria_ref: &str) -> Result<ResolvedElement, SnapshotError> {
        let unknown = || SnapshotError::UnknownRef(aria_ref.to_string());
        let id = RefId::parse(aria_ref).ok_or_else(unknown)?;
        let (frame_id, node, frame_chain) = {
            let table = self.frames.lock();
            let (frame_id, registry) = table.by_ordinal(id.frame).ok_or_else(unknown)?;
            let node = registry.lock().lookup(&id).ok_or_else(unknown)?;
            let chain = table.chain(&frame_id);
            (frame_id, node, chain)
        };

        let frame = self.page.frame(&frame_id).ok_or_else(unknown)?;
        match evaluate(frame.as_ref(), move |dom| dom.is_connected(node)).await {
            Ok(Ok(true)) => Ok(ResolvedElement {
                frame: frame_id,
                frame_chain,
                node,
            }),
            Ok(Ok(false)) => Err(unknown()),
            Ok(Err(err)) => {
                debug!(aria_ref, error = %err, "Ref lookup failed");
                Err(unknown())
            }
            Err(err) => {
                debug!(aria_ref, frame = %frame_id, error = %err, "Ref frame unavailable");
                Err(unknown())
            }
        }
    }

    /// Forget a track's baseline. Returns whether it existed.
    pub fn drop_track(&self, track: &str) -> bool {
        self.tracks.lock().remove(track)
    }

    /// Labels of the tracks holding a baseline.
    pub fn tracks(&self) -> Vec<String> {
        self.tracks.lock().labels()
    }
}
