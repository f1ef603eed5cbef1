//! Layer group lifecycle.
//!
//! A layer moves `Empty → Populating → Populated` and only returns to
//! `Empty` through an explicit clear. Re-populating a populated layer without
//! clearing it first is rejected, so markers from one render pass can never
//! survive into the next.

use crate::surface::{LayerId, MapSurface, PointMarker, ShapeId, ZoneShape};
use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum LayerState {
    Empty,
    Populating,
    Populated,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("layer '{layer}' cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        layer: String,
        from: LayerState,
        to: LayerState,
    },

    #[error("layer '{layer}' is not accepting shapes in state {state:?}")]
    NotPopulating { layer: String, state: LayerState },
}

/// A named layer group and the shapes drawn into it during the current pass.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    name: String,
    state: LayerState,
    visible: bool,
    shapes: Vec<ShapeId>,
}

impl Layer {
    /// Create the layer group on `surface`.
    pub fn create<M: MapSurface + ?Sized>(surface: &mut M, name: &str) -> Self {
        let id = surface.create_layer(name);
        Self {
            id,
            name: name.to_string(),
            state: LayerState::Empty,
            visible: true,
            shapes: Vec::new(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shapes drawn since the last clear, in draw order.
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    fn transition(&mut self, to: LayerState) -> Result<(), RenderError> {
        use LayerState::*;
        let allowed = matches!(
            (self.state, to),
            (Empty, Populating) | (Populating, Populated) | (_, Empty)
        );
        if !allowed {
            return Err(RenderError::InvalidTransition {
                layer: self.name.clone(),
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Remove every shape from the layer group.
    pub fn clear<M: MapSurface + ?Sized>(&mut self, surface: &mut M) {
        surface.clear_layer(self.id);
        self.shapes.clear();
        // any state may return to Empty
        self.state = LayerState::Empty;
    }

    /// Start a render pass. Only valid on an empty layer.
    pub fn begin(&mut self) -> Result<(), RenderError> {
        self.transition(LayerState::Populating)
    }

    /// End a render pass.
    pub fn finish(&mut self) -> Result<(), RenderError> {
        self.transition(LayerState::Populated)
    }

    fn ensure_populating(&self) -> Result<(), RenderError> {
        if self.state != LayerState::Populating {
            return Err(RenderError::NotPopulating {
                layer: self.name.clone(),
                state: self.state,
            });
        }
        Ok(())
    }

    pub fn add_point<M: MapSurface + ?Sized>(
        &mut self,
        surface: &mut M,
        marker: &PointMarker,
    ) -> Result<ShapeId, RenderError> {
        self.ensure_populating()?;
        let shape = surface.add_point(self.id, marker);
        self.shapes.push(shape);
        Ok(shape)
    }

    pub fn add_polygon<M: MapSurface + ?Sized>(
        &mut self,
        surface: &mut M,
        zone: &ZoneShape,
    ) -> Result<ShapeId, RenderError> {
        self.ensure_populating()?;
        let shape = surface.add_polygon(self.id, zone);
        self.shapes.push(shape);
        Ok(shape)
    }

    /// Clear, then run `fill` as a single render pass.
    ///
    /// If `fill` fails the layer is left empty rather than half drawn.
    pub fn repopulate<M, R, F>(&mut self, surface: &mut M, fill: F) -> Result<R, RenderError>
    where
        M: MapSurface + ?Sized,
        F: FnOnce(&mut Layer, &mut M) -> Result<R, RenderError>,
    {
        self.clear(surface);
        self.begin()?;
        match fill(self, surface) {
            Ok(r) => {
                self.finish()?;
                Ok(r)
            }
            Err(e) => {
                self.clear(surface);
                Err(e)
            }
        }
    }

    /// Add or remove the whole group from the map; contents are untouched.
    pub fn set_visible<M: MapSurface + ?Sized>(&mut self, surface: &mut M, visible: bool) {
        if self.visible != visible {
            surface.set_layer_visible(self.id, visible);
            self.visible = visible;
        }
    }
}
