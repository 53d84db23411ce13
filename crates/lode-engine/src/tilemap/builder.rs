use crate::error::MapError;
use super::layer::{Layer, ObjectLayer, TileLayer};
use super::map::{Map, DEFAULT_DRAW_MARGIN};
use super::properties::PropertyCollection;
use super::tileset::{Tile, Tileset};

/// Assembles a `Map` from already-parsed parts.
///
/// Tilesets receive consecutive gid ranges starting at 1 in the order they are
/// added, and atlas ids matching that order until `Map::register_atlases` runs.
///
/// ```
/// use lode_engine::tilemap::{MapBuilder, TileLayer, Tileset};
///
/// let map = MapBuilder::new(2, 1, 16, 16)
///     .tileset(Tileset::new("ground", "ground.png", (32, 16), (16, 16)))
///     .tile_layer(TileLayer::new("Ground", 2, 1, vec![1, 2]))
///     .build()
///     .unwrap();
/// assert_eq!(map.tile(2).unwrap().source.x, 16);
/// ```
pub struct MapBuilder {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    properties: PropertyCollection,
    tilesets: Vec<Tileset>,
    layers: Vec<Layer>,
    draw_margin: f32,
}

impl MapBuilder {
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            width,
            height,
            tile_width: tile_width.max(1),
            tile_height: tile_height.max(1),
            properties: PropertyCollection::new(),
            tilesets: Vec::new(),
            layers: Vec::new(),
            draw_margin: DEFAULT_DRAW_MARGIN,
        }
    }

    pub fn properties(mut self, properties: PropertyCollection) -> Self {
        self.properties = properties;
        self
    }

    pub fn draw_margin(mut self, margin: f32) -> Self {
        self.draw_margin = margin.max(0.0);
        self
    }

    /// Gid assigned to the first tile of the next tileset added.
    pub fn next_gid(&self) -> u32 {
        self.tilesets.last().map_or(1, Tileset::end_gid)
    }

    pub fn tileset(mut self, mut tileset: Tileset) -> Self {
        tileset.first_gid = self.next_gid();
        tileset.atlas = crate::components::sprite::AtlasId(self.tilesets.len() as u32);
        self.tilesets.push(tileset);
        self
    }

    pub fn tile_layer(mut self, layer: TileLayer) -> Self {
        self.layers.push(Layer::Tiles(layer));
        self
    }

    pub fn object_layer(mut self, layer: ObjectLayer) -> Self {
        self.layers.push(Layer::Objects(layer));
        self
    }

    /// Build the tile catalog and check every layer against it.
    pub fn build(self) -> Result<Map, MapError> {
        let catalog_len = self.next_gid() as usize;
        let mut tiles: Vec<Option<Tile>> = vec![None; catalog_len];
        for (index, tileset) in self.tilesets.iter().enumerate() {
            for local_id in 0..tileset.tile_count() {
                let Some(source) = tileset.source_rect(local_id) else {
                    continue;
                };
                let gid = tileset.first_gid + local_id;
                tiles[gid as usize] = Some(Tile {
                    gid,
                    tileset: index,
                    source,
                    properties: tileset.tile_properties(local_id).cloned().unwrap_or_default(),
                });
            }
        }

        for layer in &self.layers {
            let Layer::Tiles(tile_layer) = layer else {
                continue;
            };
            let expected = tile_layer.width as usize * tile_layer.height as usize;
            let actual = tile_layer.cells().len();
            if actual != expected {
                return Err(MapError::LayerSize {
                    layer: tile_layer.name.clone(),
                    expected,
                    actual,
                });
            }
            let unknown = tile_layer
                .cells()
                .iter()
                .copied()
                .find(|&gid| gid != 0 && tiles.get(gid as usize).map_or(true, Option::is_none));
            if let Some(gid) = unknown {
                return Err(MapError::UnknownTile { layer: tile_layer.name.clone(), gid });
            }
        }

        log::debug!(
            "built map {}x{} with {} tilesets, {} layers",
            self.width,
            self.height,
            self.tilesets.len(),
            self.layers.len()
        );

        Ok(Map {
            width: self.width,
            height: self.height,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            properties: self.properties,
            tilesets: self.tilesets,
            tiles,
            layers: self.layers,
            draw_margin: self.draw_margin,
        })
    }
}
