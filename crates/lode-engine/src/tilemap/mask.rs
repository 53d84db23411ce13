/// Per-pixel solidity of a whole tileset texture.
/// A pixel is solid when its alpha is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Build from a row-major solidity grid. Returns None when the length is wrong.
    pub fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> Option<Self> {
        if bits.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, bits })
    }

    /// Build from one alpha byte per pixel.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Option<Self> {
        Self::from_bits(width, height, alpha.iter().map(|&a| a > 0).collect())
    }

    /// Build from tightly packed RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        if rgba.len() % 4 != 0 {
            return None;
        }
        Self::from_bits(width, height, rgba.chunks_exact(4).map(|px| px[3] > 0).collect())
    }

    #[cfg(feature = "tmx")]
    pub fn from_image(image: &image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            bits: image.pixels().map(|px| px.0[3] > 0).collect(),
        }
    }

    /// Decode an image file and derive its mask.
    #[cfg(feature = "tmx")]
    pub fn load(path: &std::path::Path) -> Result<Self, crate::error::MapError> {
        let image = image::open(path)?.to_rgba8();
        Ok(Self::from_image(&image))
    }

    /// Solidity of a texture pixel, None outside the texture.
    pub fn get(&self, x: i32, y: i32) -> Option<bool> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.bits.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn solid_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_threshold_is_nonzero() {
        let mask = CollisionMask::from_alpha(2, 1, &[0, 1]).unwrap();
        assert_eq!(mask.get(0, 0), Some(false));
        assert_eq!(mask.get(1, 0), Some(true));
    }

    #[test]
    fn rgba_uses_fourth_channel() {
        let rgba = [255, 255, 255, 0, 0, 0, 0, 255];
        let mask = CollisionMask::from_rgba(2, 1, &rgba).unwrap();
        assert_eq!(mask.get(0, 0), Some(false));
        assert_eq!(mask.get(1, 0), Some(true));
        assert_eq!(mask.solid_count(), 1);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(CollisionMask::from_alpha(2, 2, &[0, 0, 0]).is_none());
    }

    #[test]
    fn outside_texture_is_none() {
        let mask = CollisionMask::from_alpha(1, 1, &[255]).unwrap();
        assert_eq!(mask.get(-1, 0), None);
        assert_eq!(mask.get(0, 1), None);
    }
}
