//! Containers that display a cursor or icon resource.

use super::{ContainerError, ContainerId, ContainerResult, DrawableContainer, PersistedContainer};
use crate::adorner::{Adorner, EditStatus, default_adorners};
use crate::drawing::{DrawSurface, RenderMode, SavedState};
use crate::input::MouseEvent;
use crate::resource::{CursorImage, IconImage, ImageResource};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Affine, Point, Rect, Size};
use std::fmt;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// A container showing a cursor, stretched to its bounds.
pub type CursorContainer = ImageContainer<CursorImage>;
/// A container showing an icon, stretched to its bounds.
pub type IconContainer = ImageContainer<IconImage>;

/// A drawable container that owns exactly one image resource.
pub struct ImageContainer<R: ImageResource> {
    id: ContainerId,
    bounds: Rect,
    image: Option<R>,
    adorners: Vec<Box<dyn Adorner>>,
    /// Adorner armed by the last mouse down.
    active: Option<usize>,
}

impl<R: ImageResource> ImageContainer<R> {
    /// Create an empty container at the surface origin.
    pub fn new() -> Self {
        Self::at(Point::ZERO)
    }

    /// Create an empty container with its top-left corner at `origin`.
    pub fn at(origin: Point) -> Self {
        let mut container = Self {
            id: Uuid::new_v4(),
            bounds: Rect::from_origin_size(origin, Size::ZERO),
            image: None,
            adorners: Vec::new(),
            active: None,
        };
        container.init();
        container
    }

    /// Create a container and load its resource from `path`.
    ///
    /// A missing file yields an empty container.
    pub fn from_file(path: impl AsRef<Path>) -> ContainerResult<Self> {
        let mut container = Self::new();
        container.load(path)?;
        Ok(container)
    }

    /// Rebuild a container from its persisted state.
    ///
    /// The persisted bounds win over the resource's native size.
    pub fn from_persisted(persisted: &PersistedContainer) -> ContainerResult<Self> {
        if persisted.kind != R::KIND {
            return Err(ContainerError::KindMismatch {
                expected: R::KIND,
                found: persisted.kind,
            });
        }
        let image = match &persisted.data_base64 {
            Some(data) => Some(R::decode(&STANDARD.decode(data)?)?),
            None => None,
        };
        let mut container = Self {
            id: persisted.id,
            bounds: persisted.bounds,
            image,
            adorners: Vec::new(),
            active: None,
        };
        container.init();
        Ok(container)
    }

    /// Rebuild runtime-only state.
    fn init(&mut self) {
        self.adorners = default_adorners(self.bounds);
        self.active = None;
    }

    /// The held resource.
    pub fn image(&self) -> Option<&R> {
        self.image.as_ref()
    }

    /// Replace the held resource with a private copy of `image` and size
    /// the container to its native dimensions.
    ///
    /// The previous resource is released before the new one is stored.
    pub fn set_image(&mut self, image: &R) {
        self.release_image();
        self.image = Some(image.clone());
        self.bounds = Rect::from_origin_size(self.bounds.origin(), image.size());
        self.sync_adorners();
    }

    /// Load the resource from a file.
    ///
    /// Does nothing if there is no file at `path`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ContainerResult<()> {
        let path = path.as_ref();
        if !path.is_file() {
            log::debug!("Not loading {}: no such file", path.display());
            return Ok(());
        }
        let bytes = fs::read(path).map_err(|source| ContainerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = R::decode(&bytes)?;
        self.set_image(&image);
        log::debug!(
            "Loaded file: {} with resolution: {}x{}",
            path.display(),
            self.bounds.width(),
            self.bounds.height()
        );
        Ok(())
    }

    fn release_image(&mut self) {
        if let Some(old) = self.image.take() {
            log::trace!("Releasing {:?} resource of container {}", R::KIND, self.id);
            drop(old);
        }
    }

    fn sync_adorners(&mut self) {
        for adorner in self.adorners.iter_mut() {
            adorner.owner_changed(self.bounds);
        }
    }
}

impl<R: ImageResource> Default for ImageContainer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ImageResource> fmt::Debug for ImageContainer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageContainer")
            .field("id", &self.id)
            .field("kind", &R::KIND)
            .field("bounds", &self.bounds)
            .field("has_image", &self.image.is_some())
            .field("adorners", &self.adorners.len())
            .finish()
    }
}

impl<R: ImageResource> DrawableContainer for ImageContainer<R> {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.sync_adorners();
    }

    fn default_size(&self) -> Size {
        self.image.as_ref().map(|img| img.size()).unwrap_or(Size::ZERO)
    }

    fn has_default_size(&self) -> bool {
        R::HAS_DEFAULT_SIZE
    }

    fn draw(&self, surface: &mut dyn DrawSurface, _mode: RenderMode) {
        let Some(image) = &self.image else {
            return;
        };
        let mut surface = SavedState::new(surface);
        surface.set_hints(R::RENDER_HINTS);
        surface.draw_image(image.bitmap(), self.bounds);
    }

    fn adorners(&self) -> &[Box<dyn Adorner>] {
        &self.adorners
    }

    fn edit_status(&self) -> EditStatus {
        self.active
            .and_then(|i| self.adorners.get(i))
            .map(|a| a.edit_status())
            .unwrap_or_default()
    }

    fn mouse_down(&mut self, event: &MouseEvent) -> Option<EditStatus> {
        self.cancel_edit();
        let hit = self.adorner_at(event.position)?;
        let adorner = &mut self.adorners[hit];
        adorner.mouse_down(&mut self.bounds, event);
        if !adorner.is_active() {
            return None;
        }
        let status = adorner.edit_status();
        self.active = Some(hit);
        self.sync_adorners();
        Some(status)
    }

    fn mouse_move(&mut self, event: &MouseEvent) {
        for adorner in self.adorners.iter_mut() {
            adorner.mouse_move(&mut self.bounds, event);
        }
        self.sync_adorners();
    }

    fn mouse_up(&mut self, event: &MouseEvent) {
        for adorner in self.adorners.iter_mut() {
            adorner.mouse_up(&mut self.bounds, event);
        }
        self.active = None;
        self.sync_adorners();
    }

    fn cancel_edit(&mut self) {
        for adorner in self.adorners.iter_mut().filter(|a| a.is_active()) {
            log::trace!("Disarming {:?} of container {}", adorner.edit_status(), self.id);
            adorner.cancel();
        }
        self.active = None;
    }

    fn transform(&mut self, matrix: Affine) {
        self.bounds = matrix.transform_rect_bbox(self.bounds);
        for adorner in self.adorners.iter_mut() {
            adorner.transform(matrix);
        }
    }

    fn dispose(&mut self) {
        self.release_image();
        self.adorners.clear();
        self.active = None;
    }

    fn to_persisted(&self) -> PersistedContainer {
        PersistedContainer {
            id: self.id,
            kind: R::KIND,
            bounds: self.bounds,
            data_base64: self.image.as_ref().map(|img| STANDARD.encode(img.encoded())),
        }
    }
}
