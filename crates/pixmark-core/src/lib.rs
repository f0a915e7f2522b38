//! Pixmark Core Library
//!
//! Platform-agnostic annotation model for the Pixmark screenshot editor:
//! cursor and icon containers with their adorners, the pipette color picker
//! and the output settings.

pub mod adorner;
pub mod color;
pub mod config;
pub mod container;
pub mod drawing;
pub mod input;
pub mod pipette;
pub mod resource;
pub mod surface;

pub use adorner::{Adorner, AdornerCursor, EditStatus, MoveAdorner, Position, ResizeAdorner};
pub use color::SampledColor;
pub use config::{
    ConfigError, ConfigStore, FileConfigStore, MemoryConfigStore, OutputConfig, OutputFormat,
};
pub use container::{
    ContainerError, ContainerId, CursorContainer, DrawableContainer, IconContainer, ImageContainer,
    PersistedContainer,
};
pub use drawing::{DrawSurface, RenderHints, RenderMode, SavedState};
pub use input::{InputHub, KeyEvent, MouseButton, MouseEvent, Subscription};
pub use pipette::{LocalCapture, MagnifierPreview, Pipette, PipetteEvent, PointerCapture};
pub use resource::{CursorImage, IconImage, ImageResource, ResourceError, ResourceKind};
pub use surface::EditorSurface;
