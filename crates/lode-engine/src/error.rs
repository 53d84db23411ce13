use std::fmt;
use std::io;

/// Errors raised while building or loading a tile map.
#[derive(Debug)]
pub enum MapError {
    /// Reading a map, tileset or image file failed.
    Io(io::Error),
    /// The TMX document could not be parsed.
    #[cfg(feature = "tmx")]
    Tiled(tiled::Error),
    /// A collision-set tileset image could not be decoded.
    #[cfg(feature = "tmx")]
    Image(image::ImageError),
    /// Only orthogonal maps are supported.
    UnsupportedOrientation(String),
    /// Infinite (chunked) maps are not supported.
    InfiniteMap,
    /// Image and group layers have no runtime representation.
    UnsupportedLayer(String),
    /// Tilesets must be backed by a single image.
    ImageCollectionTileset(String),
    /// A layer cell references a gid that no tileset covers.
    UnknownTile { layer: String, gid: u32 },
    /// A layer's cell count does not match its declared size.
    LayerSize { layer: String, expected: usize, actual: usize },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io(e) => write!(f, "I/O error: {}", e),
            #[cfg(feature = "tmx")]
            MapError::Tiled(e) => write!(f, "TMX parse error: {}", e),
            #[cfg(feature = "tmx")]
            MapError::Image(e) => write!(f, "tileset image error: {}", e),
            MapError::UnsupportedOrientation(o) => {
                write!(f, "unsupported map orientation '{}', expected orthogonal", o)
            }
            MapError::InfiniteMap => write!(f, "infinite maps are not supported"),
            MapError::UnsupportedLayer(name) => {
                write!(f, "layer '{}' is an image or group layer", name)
            }
            MapError::ImageCollectionTileset(name) => {
                write!(f, "tileset '{}' has no single source image", name)
            }
            MapError::UnknownTile { layer, gid } => {
                write!(f, "layer '{}' references unknown tile gid {}", layer, gid)
            }
            MapError::LayerSize { layer, expected, actual } => write!(
                f,
                "layer '{}' has {} cells, expected {}",
                layer, actual, expected
            ),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io(e) => Some(e),
            #[cfg(feature = "tmx")]
            MapError::Tiled(e) => Some(e),
            #[cfg(feature = "tmx")]
            MapError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MapError {
    fn from(e: io::Error) -> Self {
        MapError::Io(e)
    }
}

#[cfg(feature = "tmx")]
impl From<tiled::Error> for MapError {
    fn from(e: tiled::Error) -> Self {
        MapError::Tiled(e)
    }
}

#[cfg(feature = "tmx")]
impl From<image::ImageError> for MapError {
    fn from(e: image::ImageError) -> Self {
        MapError::Image(e)
    }
}
