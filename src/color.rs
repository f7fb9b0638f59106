/// Linear RGB color, the representation lights and materials are rendered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` value. The channels are treated as sRGB
    /// encoded and stored linear.
    pub fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
        }
    }

    /// Overwrite every channel from a `0xRRGGBB` value.
    pub fn set_hex(&mut self, hex: u32) {
        *self = Self::from_hex(hex);
    }

    pub fn to_vec3(self) -> glam::Vec3 {
        glam::Vec3::new(self.r, self.g, self.b)
    }
}

/// Split a `0xRRGGBB` value into its sRGB bytes.
pub fn hex_to_srgb(hex: u32) -> [u8; 3] {
    let [_, r, g, b] = hex.to_be_bytes();
    [r, g, b]
}

pub fn srgb_to_hex([r, g, b]: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, r, g, b])
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_decode_to_unit_channels() {
        assert_eq!(Color::from_hex(0xff0000), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::rgb(0.0, 0.0, 0.0));
    }

    #[test]
    fn mid_grey_is_linearized() {
        let grey = Color::from_hex(0x292929);
        assert!(grey.r < 41.0 / 255.0);
        assert_eq!(grey.r, grey.g);
        assert_eq!(grey.g, grey.b);
    }

    #[test]
    fn srgb_bytes_split_and_join() {
        assert_eq!(hex_to_srgb(0x12ab7f), [0x12, 0xab, 0x7f]);
        assert_eq!(srgb_to_hex([0x12, 0xab, 0x7f]), 0x12ab7f);
    }
}
