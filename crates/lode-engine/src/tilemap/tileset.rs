use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::components::sprite::AtlasId;
use crate::core::geometry::Rect;
use super::mask::CollisionMask;
use super::properties::PropertyCollection;

/// Property name prefix that marks a tileset as a collision set.
pub const COLLISION_SET_PREFIX: &str = "CollisionSet";

/// A grid of equally sized tiles cut from one texture.
#[derive(Debug, Clone)]
pub struct Tileset {
    pub name: String,
    /// Texture path, resolved relative to the map file when loaded from TMX.
    pub image_path: PathBuf,
    pub image_width: u32,
    pub image_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub margin: u32,
    pub spacing: u32,
    /// Gid of the tileset's first tile. Assigned when added to a map.
    pub first_gid: u32,
    /// Texture handle. Assigned when added to a map.
    pub atlas: AtlasId,
    pub properties: PropertyCollection,
    tile_properties: BTreeMap<u32, PropertyCollection>,
    mask: Option<Arc<CollisionMask>>,
}

impl Tileset {
    pub fn new(
        name: impl Into<String>,
        image_path: impl Into<PathBuf>,
        image_size: (u32, u32),
        tile_size: (u32, u32),
    ) -> Self {
        Self {
            name: name.into(),
            image_path: image_path.into(),
            image_width: image_size.0,
            image_height: image_size.1,
            tile_width: tile_size.0.max(1),
            tile_height: tile_size.1.max(1),
            margin: 0,
            spacing: 0,
            first_gid: 1,
            atlas: AtlasId(0),
            properties: PropertyCollection::new(),
            tile_properties: BTreeMap::new(),
            mask: None,
        }
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_properties(mut self, properties: PropertyCollection) -> Self {
        self.properties = properties;
        self
    }

    /// Attach properties to a local tile id.
    pub fn with_tile_properties(mut self, local_id: u32, properties: PropertyCollection) -> Self {
        self.tile_properties.insert(local_id, properties);
        self
    }

    pub fn with_mask(mut self, mask: CollisionMask) -> Self {
        self.mask = Some(Arc::new(mask));
        self
    }

    /// Tiles per texture row.
    pub fn columns(&self) -> u32 {
        let usable = (self.image_width + self.spacing).saturating_sub(2 * self.margin);
        usable / (self.tile_width + self.spacing)
    }

    pub fn rows(&self) -> u32 {
        let usable = (self.image_height + self.spacing).saturating_sub(2 * self.margin);
        usable / (self.tile_height + self.spacing)
    }

    pub fn tile_count(&self) -> u32 {
        self.columns() * self.rows()
    }

    /// Gid one past this tileset's last tile.
    pub fn end_gid(&self) -> u32 {
        self.first_gid + self.tile_count()
    }

    /// Source rectangle of a local tile id in texture pixels.
    pub fn source_rect(&self, local_id: u32) -> Option<Rect> {
        let columns = self.columns();
        if columns == 0 || local_id >= self.tile_count() {
            return None;
        }
        let col = local_id % columns;
        let row = local_id / columns;
        Some(Rect::new(
            (self.margin + col * (self.tile_width + self.spacing)) as i32,
            (self.margin + row * (self.tile_height + self.spacing)) as i32,
            self.tile_width as i32,
            self.tile_height as i32,
        ))
    }

    pub fn tile_properties(&self, local_id: u32) -> Option<&PropertyCollection> {
        self.tile_properties.get(&local_id)
    }

    /// Collision sets are flagged by a `CollisionSet*` property on the tileset or any of its tiles.
    pub fn is_collision_set(&self) -> bool {
        self.properties.has_prefix(COLLISION_SET_PREFIX)
            || self
                .tile_properties
                .values()
                .any(|p| p.has_prefix(COLLISION_SET_PREFIX))
    }

    pub fn mask(&self) -> Option<&CollisionMask> {
        self.mask.as_deref()
    }

    pub(crate) fn set_mask(&mut self, mask: Option<CollisionMask>) {
        self.mask = mask.map(Arc::new);
    }
}

/// One entry of a map's tile catalog.
#[derive(Debug, Clone)]
pub struct Tile {
    pub gid: u32,
    /// Index into the map's tileset list.
    pub tileset: usize,
    /// Region of the tileset texture, in pixels.
    pub source: Rect,
    pub properties: PropertyCollection,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Tileset {
        Tileset::new("terrain", "terrain.png", (64, 32), (16, 16))
    }

    #[test]
    fn grid_dimensions() {
        let ts = sheet();
        assert_eq!(ts.columns(), 4);
        assert_eq!(ts.rows(), 2);
        assert_eq!(ts.tile_count(), 8);
        assert_eq!(ts.end_gid(), 9);
    }

    #[test]
    fn source_rect_walks_rows() {
        let ts = sheet();
        assert_eq!(ts.source_rect(0), Some(Rect::new(0, 0, 16, 16)));
        assert_eq!(ts.source_rect(5), Some(Rect::new(16, 16, 16, 16)));
        assert_eq!(ts.source_rect(8), None);
    }

    #[test]
    fn margin_and_spacing_offset_sources() {
        let ts = Tileset::new("padded", "p.png", (37, 19), (16, 16))
            .with_margin(1)
            .with_spacing(2);
        assert_eq!(ts.columns(), 2);
        assert_eq!(ts.source_rect(1), Some(Rect::new(19, 1, 16, 16)));
    }

    #[test]
    fn collision_set_detected_from_tile_property() {
        assert!(!sheet().is_collision_set());
        let flagged = sheet().with_tile_properties(
            3,
            PropertyCollection::new().with("CollisionSet", true),
        );
        assert!(flagged.is_collision_set());
    }
}
