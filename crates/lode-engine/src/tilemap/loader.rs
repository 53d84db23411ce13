use std::path::Path;

use glam::Vec2;

use crate::core::geometry::Rect;
use crate::error::MapError;
use super::builder::MapBuilder;
use super::layer::{MapObject, ObjectLayer, TileLayer};
use super::map::Map;
use super::mask::CollisionMask;
use super::properties::{PropertyCollection, PropertyValue};
use super::tileset::Tileset;

impl Map {
    /// Load an orthogonal, finite TMX map.
    ///
    /// Tilesets flagged as collision sets have their image decoded once here to
    /// derive the per-pixel mask.
    pub fn load(path: impl AsRef<Path>) -> Result<Map, MapError> {
        let path = path.as_ref();
        let mut loader = tiled::Loader::new();
        let source = loader.load_tmx_map(path)?;

        if !matches!(source.orientation, tiled::Orientation::Orthogonal) {
            return Err(MapError::UnsupportedOrientation(format!("{:?}", source.orientation)));
        }
        if source.infinite() {
            return Err(MapError::InfiniteMap);
        }

        let mut builder = MapBuilder::new(source.width, source.height, source.tile_width, source.tile_height)
            .properties(convert_properties(&source.properties));

        let mut first_gids = Vec::with_capacity(source.tilesets().len());
        let mut collision_sets = 0;
        for tileset in source.tilesets() {
            let converted = convert_tileset(tileset)?;
            if converted.mask().is_some() {
                collision_sets += 1;
            }
            first_gids.push(builder.next_gid());
            builder = builder.tileset(converted);
        }

        for layer in source.layers() {
            let name = layer.name.clone();
            match layer.layer_type() {
                tiled::LayerType::Tiles(tiled::TileLayer::Finite(tiles)) => {
                    let (width, height) = (tiles.width(), tiles.height());
                    let mut cells = Vec::with_capacity(width as usize * height as usize);
                    for y in 0..height as i32 {
                        for x in 0..width as i32 {
                            let gid = match tiles.get_tile_data(x, y) {
                                Some(data) => match first_gids.get(data.tileset_index()) {
                                    Some(first) => first + data.id(),
                                    None => return Err(MapError::UnknownTile { layer: name, gid: data.id() }),
                                },
                                None => 0,
                            };
                            cells.push(gid);
                        }
                    }
                    builder = builder.tile_layer(
                        TileLayer::new(name, width, height, cells)
                            .with_visible(layer.visible)
                            .with_opacity(layer.opacity)
                            .with_properties(convert_properties(&layer.properties)),
                    );
                }
                tiled::LayerType::Tiles(_) => return Err(MapError::InfiniteMap),
                tiled::LayerType::Objects(objects) => {
                    let mut object_layer =
                        ObjectLayer::new(name, objects.objects().map(|o| convert_object(&o)).collect());
                    object_layer.visible = layer.visible;
                    object_layer.opacity = layer.opacity;
                    object_layer.properties = convert_properties(&layer.properties);
                    builder = builder.object_layer(object_layer);
                }
                _ => return Err(MapError::UnsupportedLayer(name)),
            }
        }

        let map = builder.build()?;
        log::info!(
            "loaded map {}: {}x{} tiles of {}x{}, {} tilesets ({} collision), {} layers",
            path.display(),
            map.width,
            map.height,
            map.tile_width,
            map.tile_height,
            map.tilesets().len(),
            collision_sets,
            map.layers().len()
        );
        Ok(map)
    }
}

fn convert_tileset(source: &tiled::Tileset) -> Result<Tileset, MapError> {
    let Some(image) = source.image.as_ref() else {
        return Err(MapError::ImageCollectionTileset(source.name.clone()));
    };
    let mut tileset = Tileset::new(
        source.name.clone(),
        image.source.clone(),
        (image.width.max(0) as u32, image.height.max(0) as u32),
        (source.tile_width, source.tile_height),
    )
    .with_margin(source.margin)
    .with_spacing(source.spacing)
    .with_properties(convert_properties(&source.properties));

    for (id, tile) in source.tiles() {
        if !tile.properties.is_empty() {
            tileset = tileset.with_tile_properties(id, convert_properties(&tile.properties));
        }
    }

    if tileset.is_collision_set() {
        let mask = CollisionMask::load(&image.source)?;
        if mask.width() != tileset.image_width || mask.height() != tileset.image_height {
            log::warn!(
                "tileset '{}' declares {}x{} but image is {}x{}",
                tileset.name,
                tileset.image_width,
                tileset.image_height,
                mask.width(),
                mask.height()
            );
        }
        tileset = tileset.with_mask(mask);
    }
    Ok(tileset)
}

fn convert_object(object: &tiled::ObjectData) -> MapObject {
    let (width, height, points) = match &object.shape {
        tiled::ObjectShape::Rect { width, height } | tiled::ObjectShape::Ellipse { width, height } => {
            (*width, *height, Vec::new())
        }
        tiled::ObjectShape::Polygon { points } | tiled::ObjectShape::Polyline { points } => {
            (0.0, 0.0, points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
        }
        _ => (0.0, 0.0, Vec::new()),
    };
    MapObject {
        name: object.name.clone(),
        kind: object.user_type.clone(),
        location: Rect::new(object.x as i32, object.y as i32, width as i32, height as i32),
        points,
        properties: convert_properties(&object.properties),
    }
}

fn convert_properties(source: &tiled::Properties) -> PropertyCollection {
    let mut properties = PropertyCollection::new();
    for (key, value) in source {
        let value = match value {
            tiled::PropertyValue::BoolValue(b) => PropertyValue::Bool(*b),
            tiled::PropertyValue::IntValue(i) => PropertyValue::Int(*i),
            tiled::PropertyValue::FloatValue(f) => PropertyValue::Float(*f),
            tiled::PropertyValue::StringValue(s) | tiled::PropertyValue::FileValue(s) => {
                PropertyValue::String(s.clone())
            }
            other => PropertyValue::String(format!("{:?}", other)),
        };
        properties.insert(key.clone(), value);
    }
    properties
}
