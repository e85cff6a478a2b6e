/// Vertex type consumed by the textured-mesh pipeline.
///
/// The same struct is copied byte-for-byte into the staging buffer and
/// described to the GPU as the vertex-input layout, so the offsets below are
/// the single source of truth for both sides. The matching shader inputs are
/// `@location(0) position` and `@location(1) uv`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Texture coordinate, origin at the top-left of the image.
    pub uv: [f32; 2],
}

impl Vertex {
    /// Stride of one vertex in the vertex buffer.
    pub const SIZE: u64 = std::mem::size_of::<Vertex>() as u64;
    pub const POSITION_OFFSET: u64 = std::mem::offset_of!(Vertex, position) as u64;
    pub const UV_OFFSET: u64 = std::mem::offset_of!(Vertex, uv) as u64;

    #[inline]
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(Vertex::SIZE, 20);
        assert_eq!(Vertex::POSITION_OFFSET, 0);
        // uv immediately follows the three position floats
        assert_eq!(Vertex::UV_OFFSET, 12);
    }

    #[test]
    fn bytes_match_field_order() {
        let v = Vertex::new([1.0, 2.0, 3.0], [0.25, 0.75]);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.25, 0.75]);
    }
}
