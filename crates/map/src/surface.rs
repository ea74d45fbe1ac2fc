use indexmap::IndexMap;
use model::overlay::{Layer, OverlayId};

/// The rendering side of the map. Mirrors the handful of widget calls the
/// core needs; a layer's source is registered under the layer's id.
pub trait MapSurface: Send + 'static {
    fn add_layer(&mut self, layer: Layer);
    fn remove_layer(&mut self, id: &OverlayId);
    fn remove_source(&mut self, id: &OverlayId);
    fn get_layer(&self, id: &OverlayId) -> Option<&Layer>;

    /// Removes the layer and its source. Returns `false` if there was none.
    fn remove_overlay(&mut self, id: &OverlayId) -> bool {
        if self.get_layer(id).is_none() {
            return false;
        }
        self.remove_layer(id);
        self.remove_source(id);
        true
    }

    /// Adds the layer, dropping an existing one with the same id first.
    fn replace_overlay(&mut self, layer: Layer) {
        self.remove_overlay(&layer.id);
        self.add_layer(layer);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AddLayer(OverlayId),
    RemoveLayer(OverlayId),
    RemoveSource(OverlayId),
    /// An add for an id that was still present.
    Rejected(OverlayId),
}

/// Headless surface keeping layers in insertion order and a log of every call.
#[derive(Debug, Default)]
pub struct MemorySurface {
    layers: IndexMap<OverlayId, Layer>,
    sources: IndexMap<OverlayId, serde_json::Value>,
    operations: Vec<SurfaceOp>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer_ids(&self) -> Vec<OverlayId> {
        self.layers.keys().cloned().collect()
    }

    pub fn has_source(&self, id: &OverlayId) -> bool {
        self.sources.contains_key(id)
    }

    pub fn operations(&self) -> &[SurfaceOp] {
        &self.operations
    }
}

impl MapSurface for MemorySurface {
    fn add_layer(&mut self, layer: Layer) {
        // the widget refuses duplicate ids
        if self.layers.contains_key(&layer.id) || self.sources.contains_key(&layer.id) {
            log::error!("layer '{}' already exists", layer.id);
            self.operations.push(SurfaceOp::Rejected(layer.id));
            return;
        }
        self.operations.push(SurfaceOp::AddLayer(layer.id.clone()));
        self.sources.insert(layer.id.clone(), layer.source.clone());
        self.layers.insert(layer.id.clone(), layer);
    }

    fn remove_layer(&mut self, id: &OverlayId) {
        self.operations.push(SurfaceOp::RemoveLayer(id.clone()));
        self.layers.shift_remove(id);
    }

    fn remove_source(&mut self, id: &OverlayId) {
        self.operations.push(SurfaceOp::RemoveSource(id.clone()));
        self.sources.shift_remove(id);
    }

    fn get_layer(&self, id: &OverlayId) -> Option<&Layer> {
        self.layers.get(id)
    }
}
