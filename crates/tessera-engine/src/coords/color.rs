use core::ops::Mul;

/// Straight (non-premultiplied) linear RGBA color.
///
/// Components are clamp-free: values outside `[0, 1]` are legal and over- or
/// under-tint when used as a multiplier. Pipelines blend with straight alpha.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Creates a color from straight sRGB-encoded bytes, without gamma decoding.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `true` when alpha is exactly zero. Circle shading discards these.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0.0
    }
}

/// Tint: component-wise product, no clamping and no gamma step.
impl Mul for ColorRgba {
    type Output = ColorRgba;
    #[inline]
    fn mul(self, rhs: ColorRgba) -> ColorRgba {
        ColorRgba::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl From<[f32; 4]> for ColorRgba {
    #[inline]
    fn from(c: [f32; 4]) -> Self {
        Self::from_array(c)
    }
}

impl From<ColorRgba> for [f32; 4] {
    #[inline]
    fn from(c: ColorRgba) -> Self {
        c.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_is_componentwise() {
        let texel = ColorRgba::white();
        let tint = ColorRgba::new(0.5, 0.2, 1.0, 0.8);
        assert_eq!(texel * tint, tint);
    }

    #[test]
    fn tint_does_not_clamp() {
        let texel = ColorRgba::new(0.5, 0.5, 0.5, 1.0);
        let tint = ColorRgba::new(3.0, -1.0, 0.0, 2.0);
        assert_eq!(texel * tint, ColorRgba::new(1.5, -0.5, 0.0, 2.0));
    }

    #[test]
    fn transparent_means_zero_alpha_only() {
        assert!(ColorRgba::new(1.0, 1.0, 1.0, 0.0).is_transparent());
        assert!(!ColorRgba::new(0.0, 0.0, 0.0, 0.001).is_transparent());
    }

    #[test]
    fn byte_constructor_is_straight() {
        assert_eq!(ColorRgba::from_u8(255, 0, 255, 0), ColorRgba::new(1.0, 0.0, 1.0, 0.0));
    }
}
