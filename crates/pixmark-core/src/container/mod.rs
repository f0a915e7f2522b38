//! Drawable containers placed on an editing surface.

mod image_container;

pub use image_container::{CursorContainer, IconContainer, ImageContainer};

use crate::adorner::{Adorner, EditStatus};
use crate::drawing::{DrawSurface, RenderMode};
use crate::input::MouseEvent;
use crate::resource::{CursorImage, IconImage, ResourceError, ResourceKind};
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for containers.
pub type ContainerId = Uuid;

/// Container errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("Invalid resource data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Expected a {expected:?} container, found {found:?}")]
    KindMismatch {
        expected: ResourceKind,
        found: ResourceKind,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Common interface of everything placed on an editing surface.
pub trait DrawableContainer: fmt::Debug {
    /// Get the unique identifier.
    fn id(&self) -> ContainerId;

    /// Current bounds in surface coordinates.
    fn bounds(&self) -> Rect;

    /// Replace the bounds; adorners follow.
    fn set_bounds(&mut self, bounds: Rect);

    /// Natural size of the content, `Size::ZERO` when there is none.
    fn default_size(&self) -> Size;

    /// Whether [`DrawableContainer::default_size`] should be used when the
    /// container is placed.
    fn has_default_size(&self) -> bool;

    /// Draw the content. Surface state is left as found.
    fn draw(&self, surface: &mut dyn DrawSurface, mode: RenderMode);

    /// The interaction handles.
    fn adorners(&self) -> &[Box<dyn Adorner>];

    /// Edit mode of the adorner currently being dragged.
    fn edit_status(&self) -> EditStatus;

    /// Route a press to the first adorner hit. Returns the edit status of
    /// the adorner that armed, if any.
    fn mouse_down(&mut self, event: &MouseEvent) -> Option<EditStatus>;

    /// Deliver a move to every adorner.
    fn mouse_move(&mut self, event: &MouseEvent);

    /// Deliver a release to every adorner.
    fn mouse_up(&mut self, event: &MouseEvent);

    /// Abandon the drag in progress, keeping the current geometry.
    fn cancel_edit(&mut self);

    /// Apply an affine transform to the geometry.
    fn transform(&mut self, matrix: Affine);

    /// Release held resources. Safe to call repeatedly.
    fn dispose(&mut self);

    /// The persisted part of this container.
    fn to_persisted(&self) -> PersistedContainer;

    /// Index of the first adorner hit at `point`.
    fn adorner_at(&self, point: Point) -> Option<usize> {
        self.adorners().iter().position(|a| a.hit_test(point))
    }

    /// Paint every adorner.
    fn paint_adorners(&self, surface: &mut dyn DrawSurface) {
        for adorner in self.adorners() {
            adorner.paint(surface);
        }
    }
}

/// Persisted state of a container: geometry and resource bytes only.
///
/// Adorners and other runtime state are rebuilt on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedContainer {
    pub id: ContainerId,
    pub kind: ResourceKind,
    pub bounds: Rect,
    /// Resource file bytes, base64-encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_base64: Option<String>,
}

impl PersistedContainer {
    pub fn to_json(&self) -> ContainerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> ContainerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Rebuild a container of the persisted kind.
pub fn restore(persisted: &PersistedContainer) -> ContainerResult<Box<dyn DrawableContainer>> {
    Ok(match persisted.kind {
        ResourceKind::Cursor => Box::new(ImageContainer::<CursorImage>::from_persisted(persisted)?),
        ResourceKind::Icon => Box::new(ImageContainer::<IconImage>::from_persisted(persisted)?),
    })
}
