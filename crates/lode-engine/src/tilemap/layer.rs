use glam::Vec2;

use crate::core::geometry::Rect;
use super::properties::PropertyCollection;

/// Layer property that makes a tile layer answer collision queries.
pub const COLLISION_PROPERTY: &str = "Collision";
/// Layer property that adds a drop-shadow pass when drawing.
pub const SHADOWS_PROPERTY: &str = "Shadows";

/// A grid of tile gids. Gid 0 is an empty cell.
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub opacity: f32,
    pub properties: PropertyCollection,
    /// Row-major gids, `width * height` long.
    cells: Vec<u32>,
}

impl TileLayer {
    /// Gids are row-major, left to right then top to bottom.
    /// Size and gid validation happen in `MapBuilder`.
    pub fn new(name: impl Into<String>, width: u32, height: u32, cells: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            visible: true,
            opacity: 1.0,
            properties: PropertyCollection::new(),
            cells,
        }
    }

    pub fn with_properties(mut self, properties: PropertyCollection) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Gid at a cell, None when empty or out of bounds.
    pub fn gid_at(&self, x: i32, y: i32) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        match self.cells.get(y as usize * self.width as usize + x as usize) {
            Some(&gid) if gid != 0 => Some(gid),
            _ => None,
        }
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn is_collision(&self) -> bool {
        self.properties.contains(COLLISION_PROPERTY)
    }

    pub fn has_shadows(&self) -> bool {
        self.properties.contains(SHADOWS_PROPERTY)
    }
}

/// An object placed in an object layer.
#[derive(Debug, Clone, Default)]
pub struct MapObject {
    pub name: String,
    /// Free-form type string from the editor.
    pub kind: String,
    pub location: Rect,
    /// Polygon or polyline points relative to the location origin.
    pub points: Vec<Vec2>,
    pub properties: PropertyCollection,
}

impl MapObject {
    /// Points in map space.
    pub fn world_points(&self) -> Vec<Vec2> {
        let origin = Vec2::new(self.location.x as f32, self.location.y as f32);
        self.points.iter().map(|&p| p + origin).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ObjectLayer {
    pub name: String,
    pub visible: bool,
    pub opacity: f32,
    pub properties: PropertyCollection,
    pub objects: Vec<MapObject>,
}

impl ObjectLayer {
    pub fn new(name: impl Into<String>, objects: Vec<MapObject>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            properties: PropertyCollection::new(),
            objects,
        }
    }

    /// First object with the given name.
    pub fn object(&self, name: &str) -> Option<&MapObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn objects_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a MapObject> + 'a {
        self.objects.iter().filter(move |o| o.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub enum Layer {
    Tiles(TileLayer),
    Objects(ObjectLayer),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Tiles(l) => &l.name,
            Layer::Objects(l) => &l.name,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Layer::Tiles(l) => l.visible,
            Layer::Objects(l) => l.visible,
        }
    }

    pub fn properties(&self) -> &PropertyCollection {
        match self {
            Layer::Tiles(l) => &l.properties,
            Layer::Objects(l) => &l.properties,
        }
    }

    pub fn as_tiles(&self) -> Option<&TileLayer> {
        match self {
            Layer::Tiles(l) => Some(l),
            Layer::Objects(_) => None,
        }
    }

    pub fn as_objects(&self) -> Option<&ObjectLayer> {
        match self {
            Layer::Objects(l) => Some(l),
            Layer::Tiles(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gid_lookup_is_row_major() {
        let layer = TileLayer::new("ground", 3, 2, vec![1, 0, 2, 0, 3, 0]);
        assert_eq!(layer.gid_at(2, 0), Some(2));
        assert_eq!(layer.gid_at(1, 1), Some(3));
        assert_eq!(layer.gid_at(1, 0), None);
    }

    #[test]
    fn out_of_bounds_cells_are_empty() {
        let layer = TileLayer::new("ground", 2, 2, vec![1; 4]);
        assert_eq!(layer.gid_at(-1, 0), None);
        assert_eq!(layer.gid_at(2, 0), None);
        assert_eq!(layer.gid_at(0, 2), None);
    }

    #[test]
    fn flags_read_layer_properties() {
        let layer = TileLayer::new("walls", 1, 1, vec![1]).with_properties(
            PropertyCollection::new().with("Collision", "").with("Shadows", ""),
        );
        assert!(layer.is_collision());
        assert!(layer.has_shadows());
    }

    #[test]
    fn object_points_are_offset_by_location() {
        let obj = MapObject {
            name: "ramp".into(),
            location: Rect::new(10, 20, 0, 0),
            points: vec![Vec2::ZERO, Vec2::new(5.0, 5.0)],
            ..Default::default()
        };
        assert_eq!(obj.world_points()[1], Vec2::new(15.0, 25.0));

        let layer = ObjectLayer::new("objects", vec![obj]);
        assert!(layer.object("ramp").is_some());
        assert_eq!(layer.objects_of_kind("").count(), 1);
    }
}
