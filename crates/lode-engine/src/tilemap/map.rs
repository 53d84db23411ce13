use glam::Vec2;

use crate::assets::registry::AtlasRegistry;
use crate::components::sprite::{BlendMode, Color};
use crate::core::geometry::Rect;
use crate::renderer::camera::Camera;
use crate::renderer::instance::{RenderBuffer, RenderInstance};
use super::layer::{Layer, ObjectLayer, TileLayer};
use super::properties::PropertyCollection;
use super::tileset::{Tile, Tileset};

/// Default horizontal over-draw around the camera, in pixels.
pub const DEFAULT_DRAW_MARGIN: f32 = 200.0;
/// Offset of the drop-shadow pass for `Shadows` layers.
pub const SHADOW_OFFSET: Vec2 = Vec2::new(-10.0, -10.0);
/// Opacity of the drop-shadow pass.
pub const SHADOW_ALPHA: f32 = 0.2;

/// Half-open range of tile indices to draw: `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileWindow {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl TileWindow {
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        ((self.max_x - self.min_x) * (self.max_y - self.min_y)) as usize
    }
}

/// An orthogonal tile map: tilesets, a gid-indexed tile catalog and ordered layers.
/// Built by `MapBuilder` or loaded from TMX with `Map::load`.
#[derive(Debug, Clone)]
pub struct Map {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub properties: PropertyCollection,
    pub(super) tilesets: Vec<Tileset>,
    /// Indexed by gid. Slot 0 is always None.
    pub(super) tiles: Vec<Option<Tile>>,
    pub(super) layers: Vec<Layer>,
    pub(super) draw_margin: f32,
}

impl Map {
    pub fn pixel_width(&self) -> u32 {
        self.width * self.tile_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.height * self.tile_height
    }

    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.pixel_width() as f32, self.pixel_height() as f32)
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Catalog lookup. None for gid 0 and unknown gids.
    pub fn tile(&self, gid: u32) -> Option<&Tile> {
        self.tiles.get(gid as usize).and_then(Option::as_ref)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.layer(name).and_then(Layer::as_tiles)
    }

    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.layer(name).and_then(Layer::as_objects)
    }

    pub fn draw_margin(&self) -> f32 {
        self.draw_margin
    }

    pub fn set_draw_margin(&mut self, margin: f32) {
        self.draw_margin = margin.max(0.0);
    }

    /// Give every tileset a texture handle from the registry.
    pub fn register_atlases(&mut self, registry: &mut AtlasRegistry) {
        for tileset in &mut self.tilesets {
            tileset.atlas = registry.register(&tileset.image_path);
        }
    }

    /// Release every collision mask. Collision queries return None afterwards.
    pub fn unload(&mut self) {
        for tileset in &mut self.tilesets {
            tileset.set_mask(None);
        }
    }

    // -- Collision queries --

    fn collision_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers
            .iter()
            .filter_map(Layer::as_tiles)
            .filter(|l| l.is_collision())
    }

    /// Whole-pixel position, None for non-finite or negative coordinates.
    fn pixel(position: Vec2) -> Option<(i32, i32)> {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        Some((position.x.floor() as i32, position.y.floor() as i32))
    }

    fn cell_of(&self, px: i32, py: i32) -> Option<(i32, i32)> {
        let tx = px / self.tile_width as i32;
        let ty = py / self.tile_height as i32;
        if tx >= self.width as i32 || ty >= self.height as i32 {
            return None;
        }
        Some((tx, ty))
    }

    /// Per-pixel collision test against every `Collision` layer.
    ///
    /// The first covering tile whose tileset carries a mask answers with the mask
    /// bit. Returns None when the point is outside the map, no collision layer has
    /// a tile there, or the covering tiles have no mask.
    pub fn check_collision(&self, position: Vec2) -> Option<bool> {
        let (px, py) = Self::pixel(position)?;
        let (tx, ty) = self.cell_of(px, py)?;
        let off_x = px - tx * self.tile_width as i32;
        let off_y = py - ty * self.tile_height as i32;

        for layer in self.collision_layers() {
            let Some(tile) = layer.gid_at(tx, ty).and_then(|gid| self.tile(gid)) else {
                continue;
            };
            let Some(mask) = self.tilesets.get(tile.tileset).and_then(Tileset::mask) else {
                continue;
            };
            if let Some(solid) = mask.get(tile.source.x + off_x, tile.source.y + off_y) {
                return Some(solid);
            }
        }
        None
    }

    /// Whole-tile collision: does the first collision layer covering the point hold a tile?
    pub fn check_tile_collision(&self, position: Vec2) -> bool {
        let Some((tx, ty)) = Self::pixel(position).and_then(|(px, py)| self.cell_of(px, py)) else {
            return false;
        };
        self.collision_layers()
            .find(|l| l.in_bounds(tx, ty))
            .is_some_and(|l| l.gid_at(tx, ty).is_some())
    }

    /// Overlap of `rect` with the collision tile cell under `position`.
    pub fn check_tile_collision_intersect(&self, position: Vec2, rect: Rect) -> Option<Rect> {
        let (px, py) = Self::pixel(position)?;
        let (tx, ty) = self.cell_of(px, py)?;
        let layer = self.collision_layers().find(|l| l.in_bounds(tx, ty))?;
        layer.gid_at(tx, ty)?;
        let cell = Rect::new(
            tx * self.tile_width as i32,
            ty * self.tile_height as i32,
            self.tile_width as i32,
            self.tile_height as i32,
        );
        rect.intersection(&cell)
    }

    // -- Rendering --

    /// Tile indices around the camera worth drawing, clamped to the map.
    pub fn visible_window(&self, camera: &Camera) -> TileWindow {
        let w = camera.width as f32;
        let h = camera.height as f32;
        let left = camera.position.x.floor() - (w + self.draw_margin);
        let top = camera.position.y.floor() - (h * 1.5).floor();
        let right = left + w * 2.0 + self.draw_margin * 2.0;
        let bottom = top + h * 3.0;

        let tw = self.tile_width as f32;
        let th = self.tile_height as f32;
        let clamp_axis = |lo: f32, hi: f32, size: u32| -> (u32, u32) {
            let min = lo.floor().max(0.0).min(size as f32) as u32;
            let max = hi.ceil().max(0.0).min(size as f32) as u32;
            (min, max.max(min))
        };
        let (min_x, max_x) = clamp_axis(left / tw, right / tw, self.width);
        let (min_y, max_y) = clamp_axis(top / th, bottom / th, self.height);
        TileWindow { min_x, min_y, max_x, max_y }
    }

    /// Push one instance per non-empty cell of the layer inside the camera window.
    /// Returns the number of instances written.
    pub fn draw_layer(
        &self,
        layer: &TileLayer,
        camera: &Camera,
        offset: Vec2,
        color: Color,
        alpha: f32,
        buffer: &mut RenderBuffer,
    ) -> usize {
        if !layer.visible {
            return 0;
        }
        let window = self.visible_window(camera);
        let mut drawn = 0;
        for y in window.min_y..window.max_y {
            for x in window.min_x..window.max_x {
                let Some(tile) = layer.gid_at(x as i32, y as i32).and_then(|gid| self.tile(gid)) else {
                    continue;
                };
                let Some(tileset) = self.tilesets.get(tile.tileset) else {
                    continue;
                };
                let pos = Vec2::new(
                    (x * self.tile_width) as f32 + offset.x,
                    (y * self.tile_height) as f32 + offset.y,
                );
                let instance = RenderInstance::tile(tileset.atlas, tile.source, pos, color, alpha);
                if !buffer.push(BlendMode::Alpha, instance) {
                    return drawn;
                }
                drawn += 1;
            }
        }
        drawn
    }

    /// Draw a tile layer by name with a white tint.
    pub fn draw_named_layer(&self, name: &str, camera: &Camera, buffer: &mut RenderBuffer) -> usize {
        self.draw_named_layer_tinted(name, camera, Color::WHITE, buffer)
    }

    /// Draw a tile layer by name, preceded by a black offset pass when it carries `Shadows`.
    /// Unknown names, object layers and hidden layers draw nothing.
    pub fn draw_named_layer_tinted(
        &self,
        name: &str,
        camera: &Camera,
        color: Color,
        buffer: &mut RenderBuffer,
    ) -> usize {
        let Some(layer) = self.tile_layer(name) else {
            return 0;
        };
        if !layer.visible {
            return 0;
        }
        let mut drawn = 0;
        if layer.has_shadows() {
            drawn += self.draw_layer(layer, camera, SHADOW_OFFSET, Color::BLACK, SHADOW_ALPHA, buffer);
        }
        drawn + self.draw_layer(layer, camera, Vec2::ZERO, color, layer.opacity, buffer)
    }

    /// Draw every visible tile layer in order at its own opacity.
    pub fn draw(&self, camera: &Camera, buffer: &mut RenderBuffer) -> usize {
        self.layers
            .iter()
            .filter_map(Layer::as_tiles)
            .map(|layer| self.draw_layer(layer, camera, Vec2::ZERO, Color::WHITE, layer.opacity, buffer))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::builder::MapBuilder;
    use crate::tilemap::mask::CollisionMask;

    /// 2x2 map of 2x2 tiles. The collision tileset is one 2x2 tile whose mask
    /// is solid on the main diagonal only.
    fn diagonal_map() -> Map {
        let mask = CollisionMask::from_alpha(2, 2, &[255, 0, 0, 255]).unwrap();
        let tileset = Tileset::new("walls", "walls.png", (2, 2), (2, 2))
            .with_properties(PropertyCollection::new().with("CollisionSet", true))
            .with_mask(mask);
        MapBuilder::new(2, 2, 2, 2)
            .tileset(tileset)
            .tile_layer(
                TileLayer::new("Walls", 2, 2, vec![1, 0, 0, 1])
                    .with_properties(PropertyCollection::new().with("Collision", "")),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn diagonal_mask_splits_tile() {
        let map = diagonal_map();
        assert_eq!(map.check_collision(Vec2::new(0.5, 0.5)), Some(true));
        assert_eq!(map.check_collision(Vec2::new(1.5, 0.5)), Some(false));
        assert_eq!(map.check_collision(Vec2::new(0.5, 1.5)), Some(false));
        assert_eq!(map.check_collision(Vec2::new(1.5, 1.5)), Some(true));
        // Same pattern repeats in the bottom-right cell.
        assert_eq!(map.check_collision(Vec2::new(3.2, 2.1)), Some(false));
        assert_eq!(map.check_collision(Vec2::new(3.2, 3.9)), Some(true));
    }

    #[test]
    fn outside_points_are_none() {
        let map = diagonal_map();
        for p in [
            Vec2::new(-0.5, 0.5),
            Vec2::new(0.5, -0.1),
            Vec2::new(4.0, 1.0),
            Vec2::new(1.0, 4.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(f32::NAN, 1.0),
        ] {
            assert_eq!(map.check_collision(p), None, "point {:?}", p);
        }
    }

    #[test]
    fn empty_cells_pass_through() {
        let map = diagonal_map();
        assert_eq!(map.check_collision(Vec2::new(2.5, 0.5)), None);
        assert!(!map.check_tile_collision(Vec2::new(2.5, 0.5)));
        assert!(map.check_tile_collision(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn unload_drops_masks() {
        let mut map = diagonal_map();
        map.unload();
        assert_eq!(map.check_collision(Vec2::new(0.5, 0.5)), None);
        // Whole-tile queries do not need masks.
        assert!(map.check_tile_collision(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn layers_without_collision_flag_are_ignored() {
        let mask = CollisionMask::from_alpha(2, 2, &[255; 4]).unwrap();
        let map = MapBuilder::new(1, 1, 2, 2)
            .tileset(Tileset::new("t", "t.png", (2, 2), (2, 2)).with_mask(mask))
            .tile_layer(TileLayer::new("Decor", 1, 1, vec![1]))
            .build()
            .unwrap();
        assert_eq!(map.check_collision(Vec2::new(1.0, 1.0)), None);
        assert!(!map.check_tile_collision(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn intersect_returns_overlap_with_cell() {
        let map = diagonal_map();
        let hit = map.check_tile_collision_intersect(Vec2::new(0.5, 0.5), Rect::new(1, 1, 4, 4));
        assert_eq!(hit, Some(Rect::new(1, 1, 1, 1)));
        let miss = map.check_tile_collision_intersect(Vec2::new(2.5, 0.5), Rect::new(0, 0, 4, 4));
        assert_eq!(miss, None);
    }

    fn big_map() -> Map {
        MapBuilder::new(100, 100, 16, 16)
            .tileset(Tileset::new("t", "t.png", (16, 16), (16, 16)))
            .tile_layer(TileLayer::new("Ground", 100, 100, vec![1; 100 * 100]))
            .build()
            .unwrap()
    }

    #[test]
    fn window_is_clamped_to_map() {
        let map = big_map();
        let mut camera = Camera::new(320, 180);
        camera.position = Vec2::new(0.0, 0.0);
        let w = map.visible_window(&camera);
        assert_eq!((w.min_x, w.min_y), (0, 0));
        // right = -520 + 1040 = 520 -> ceil(32.5) = 33; bottom = -270 + 540 = 270 -> ceil(16.875) = 17
        assert_eq!((w.max_x, w.max_y), (33, 17));
    }

    #[test]
    fn window_covers_margin_around_camera() {
        let map = big_map();
        let mut camera = Camera::new(320, 180);
        camera.position = Vec2::new(800.0, 800.0);
        let w = map.visible_window(&camera);
        // left = 800 - 520 = 280 -> 17; top = 800 - 270 = 530 -> 33
        assert_eq!((w.min_x, w.min_y), (17, 33));
        assert_eq!((w.max_x, w.max_y), (83, 67));
        assert_eq!(w.cell_count(), 66 * 34);
    }

    #[test]
    fn window_far_outside_map_is_empty() {
        let map = big_map();
        let mut camera = Camera::new(320, 180);
        camera.position = Vec2::new(-10_000.0, -10_000.0);
        assert!(map.visible_window(&camera).is_empty());
    }

    #[test]
    fn draw_named_layer_adds_shadow_pass() {
        let map = MapBuilder::new(2, 1, 16, 16)
            .tileset(Tileset::new("t", "t.png", (16, 16), (16, 16)))
            .tile_layer(
                TileLayer::new("Walls", 2, 1, vec![1, 0])
                    .with_properties(PropertyCollection::new().with("Shadows", "")),
            )
            .tile_layer(TileLayer::new("Hidden", 2, 1, vec![1, 1]).with_visible(false))
            .build()
            .unwrap();
        let camera = Camera::new(320, 180);
        let mut buf = RenderBuffer::new();

        assert_eq!(map.draw_named_layer("Walls", &camera, &mut buf), 2);
        let shadow = buf.instances[0];
        assert_eq!((shadow.x, shadow.y), (-10.0, -10.0));
        assert_eq!(shadow.color, [0.0, 0.0, 0.0, SHADOW_ALPHA]);
        assert_eq!(buf.instances[1].color, [1.0, 1.0, 1.0, 1.0]);

        assert_eq!(map.draw_named_layer("Hidden", &camera, &mut buf), 0);
        assert_eq!(map.draw_named_layer("Nope", &camera, &mut buf), 0);
        // `draw` skips the hidden layer and does not add shadows.
        buf.clear();
        assert_eq!(map.draw(&camera, &mut buf), 1);
    }
}
