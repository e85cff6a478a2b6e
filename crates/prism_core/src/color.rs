//! RGBA colour used for clear values, in linear light (0.0 to 1.0).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::CHARCOAL
    }
}

impl Color {
    /// Default viewer background.
    pub const CHARCOAL: Self = Self::rgb(0.1, 0.1, 0.1);

    /// Opaque colour.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.2, 0.4, 0.6).to_array(), [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(Color::rgba(0.2, 0.4, 0.6, 0.5).a, 0.5);
    }

    #[test]
    fn default_is_viewer_background() {
        assert_eq!(Color::default().to_array(), [0.1, 0.1, 0.1, 1.0]);
    }
}
