//! Editing surface holding the containers of one capture.

use crate::adorner::EditStatus;
use crate::container::{self, ContainerId, ContainerResult, DrawableContainer, PersistedContainer};
use crate::drawing::{DrawSurface, RenderMode};
use crate::input::MouseEvent;
use kurbo::{Affine, Rect};

/// Owns the containers placed on a capture and routes pointer input to them.
#[derive(Debug, Default)]
pub struct EditorSurface {
    /// Containers in z-order (back to front).
    containers: Vec<Box<dyn DrawableContainer>>,
    /// Container whose adorner is being dragged.
    editing: Option<ContainerId>,
    /// Container whose adorners are shown.
    selected: Option<ContainerId>,
}

impl EditorSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a container on top. Containers that want their natural size and
    /// have empty bounds are sized to it.
    pub fn add(&mut self, mut container: Box<dyn DrawableContainer>) -> ContainerId {
        let bounds = container.bounds();
        if container.has_default_size() && bounds.is_zero_area() {
            container.set_bounds(Rect::from_origin_size(bounds.origin(), container.default_size()));
        }
        let id = container.id();
        log::debug!("Added container {} at {:?}", id, container.bounds());
        self.containers.push(container);
        id
    }

    /// Remove and dispose a container. Returns false if it was not here.
    pub fn remove(&mut self, id: ContainerId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut container = self.containers.remove(index);
        container.dispose();
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        true
    }

    /// Remove and dispose every container.
    pub fn clear(&mut self) {
        for container in self.containers.iter_mut() {
            container.dispose();
        }
        self.containers.clear();
        self.editing = None;
        self.selected = None;
    }

    fn index_of(&self, id: ContainerId) -> Option<usize> {
        self.containers.iter().position(|c| c.id() == id)
    }

    pub fn get(&self, id: ContainerId) -> Option<&dyn DrawableContainer> {
        self.index_of(id).map(|i| self.containers[i].as_ref())
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Box<dyn DrawableContainer>> {
        let index = self.index_of(id)?;
        self.containers.get_mut(index)
    }

    /// Containers in z-order.
    pub fn containers(&self) -> impl Iterator<Item = &dyn DrawableContainer> {
        self.containers.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn selected(&self) -> Option<ContainerId> {
        self.selected
    }

    /// Edit mode of the drag in progress.
    pub fn edit_status(&self) -> EditStatus {
        self.editing
            .and_then(|id| self.get(id))
            .map(|c| c.edit_status())
            .unwrap_or_default()
    }

    /// Offer a press to containers from the top down. The first one whose
    /// adorner arms starts an edit and becomes selected.
    pub fn mouse_down(&mut self, event: &MouseEvent) -> Option<ContainerId> {
        if let Some(id) = self.editing.take() {
            log::debug!("Press during an edit of container {}, cancelling it", id);
            if let Some(container) = self.get_mut(id) {
                container.cancel_edit();
            }
        }
        for container in self.containers.iter_mut().rev() {
            if let Some(status) = container.mouse_down(event) {
                let id = container.id();
                log::trace!("Container {} entered {:?}", id, status);
                self.editing = Some(id);
                self.selected = Some(id);
                return Some(id);
            }
        }
        self.selected = None;
        None
    }

    pub fn mouse_move(&mut self, event: &MouseEvent) {
        let Some(id) = self.editing else {
            return;
        };
        if let Some(container) = self.get_mut(id) {
            container.mouse_move(event);
        }
    }

    pub fn mouse_up(&mut self, event: &MouseEvent) {
        let Some(id) = self.editing.take() else {
            return;
        };
        if let Some(container) = self.get_mut(id) {
            container.mouse_up(event);
        }
    }

    /// Apply a transform to every container.
    pub fn transform(&mut self, matrix: Affine) {
        for container in self.containers.iter_mut() {
            container.transform(matrix);
        }
    }

    /// Draw every container back to front. While editing, the selected
    /// container's adorners are painted on top.
    pub fn draw(&self, surface: &mut dyn DrawSurface, mode: RenderMode) {
        for container in &self.containers {
            container.draw(surface, mode);
        }
        if mode == RenderMode::Edit {
            if let Some(selected) = self.selected.and_then(|id| self.get(id)) {
                selected.paint_adorners(surface);
            }
        }
    }

    /// Union of all container bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.containers
            .iter()
            .map(|c| c.bounds())
            .reduce(|acc, b| acc.union(b))
    }

    pub fn to_persisted(&self) -> Vec<PersistedContainer> {
        self.containers.iter().map(|c| c.to_persisted()).collect()
    }

    pub fn to_json(&self) -> ContainerResult<String> {
        Ok(serde_json::to_string(&self.to_persisted())?)
    }

    /// Rebuild a surface from persisted containers.
    pub fn restore(persisted: &[PersistedContainer]) -> ContainerResult<Self> {
        let mut surface = Self::new();
        for p in persisted {
            surface.containers.push(container::restore(p)?);
        }
        Ok(surface)
    }

    pub fn from_json(json: &str) -> ContainerResult<Self> {
        let persisted: Vec<PersistedContainer> = serde_json::from_str(json)?;
        Self::restore(&persisted)
    }
}

impl Drop for EditorSurface {
    fn drop(&mut self) {
        self.clear();
    }
}
