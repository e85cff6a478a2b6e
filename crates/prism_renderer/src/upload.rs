//! One-shot transfer of the mesh and its texture to device memory.
//!
//! Geometry goes through a single staging buffer (vertices, then indices);
//! pixels through a second one. Both are recorded in one copy pass, submitted
//! without waiting and released straight after: later submissions on the same
//! queue are ordered after the copy.
use std::borrow::Cow;

use prism_core::{ImageBuffer, Mesh, MeshCounts};
use prism_gpu::{
    BufferDesc, BufferUsage, CommandContext, CopyPass, GpuDevice, SampleCount, TextureDesc,
    TextureFormat, TextureUsage, TransferBufferDesc,
};

use crate::error::RenderError;

pub const VERTEX_BUFFER_LABEL: &str = "Vertex Buffer";
pub const INDEX_BUFFER_LABEL: &str = "Index Buffer";

/// Device-resident copy of the scene inputs.
pub struct UploadedScene<D: GpuDevice> {
    pub vertex_buffer: D::Buffer,
    pub index_buffer: D::Buffer,
    pub texture: D::Texture,
    pub counts: MeshCounts,
}

/// Pixel rows laid out for a copy with `bytes_per_row` a multiple of
/// `alignment`. Borrows the image when its pitch already qualifies.
pub fn staged_rows(image: &ImageBuffer, alignment: u32) -> (Cow<'_, [u8]>, u32) {
    let alignment = alignment.max(1);
    if image.pitch() % alignment == 0 {
        return (Cow::Borrowed(image.pixels()), image.pitch());
    }

    let bytes_per_row = image.row_bytes().div_ceil(alignment) * alignment;
    let mut rows = vec![0u8; bytes_per_row as usize * image.height() as usize];
    for (y, dst) in rows.chunks_exact_mut(bytes_per_row as usize).enumerate() {
        let src = image.row(y as u32);
        dst[..src.len()].copy_from_slice(src);
    }
    (Cow::Owned(rows), bytes_per_row)
}

/// Creates the vertex, index and texture resources and fills them.
///
/// `image` is consumed; its pixels are freed once they are in the staging
/// buffer. Only the mesh counts are kept.
pub fn upload<D: GpuDevice>(
    device: &mut D,
    mesh: &Mesh,
    image: ImageBuffer,
    texture_label: &str,
) -> Result<UploadedScene<D>, RenderError> {
    let vertex_bytes: &[u8] = bytemuck::cast_slice(mesh.vertices());
    let index_bytes: &[u8] = bytemuck::cast_slice(mesh.indices());

    let vertex_buffer = device.create_buffer(&BufferDesc {
        label: VERTEX_BUFFER_LABEL,
        usage: BufferUsage::VERTEX,
        size: mesh.vertex_bytes(),
    })?;
    let index_buffer = device.create_buffer(&BufferDesc {
        label: INDEX_BUFFER_LABEL,
        usage: BufferUsage::INDEX,
        size: mesh.index_bytes(),
    })?;
    let texture = device.create_texture(&TextureDesc {
        label: texture_label,
        format: TextureFormat::Rgba8Unorm,
        usage: TextureUsage::SAMPLER,
        width: image.width(),
        height: image.height(),
        sample_count: SampleCount::X1,
    })?;

    let mut geometry_staging = device.create_transfer_buffer(&TransferBufferDesc {
        label: "Geometry Transfer Buffer",
        size: mesh.vertex_bytes() + mesh.index_bytes(),
    })?;
    device.write_transfer_buffer(&mut geometry_staging, &[vertex_bytes, index_bytes])?;

    let (width, height) = (image.width(), image.height());
    let (rows, bytes_per_row) = staged_rows(&image, device.texture_row_alignment());
    if bytes_per_row != image.pitch() {
        log::debug!("repacking {texture_label} rows from {} to {bytes_per_row} bytes", image.pitch());
    }
    let mut pixel_staging = device.create_transfer_buffer(&TransferBufferDesc {
        label: "Texture Transfer Buffer",
        size: rows.len() as u64,
    })?;
    device.write_transfer_buffer(&mut pixel_staging, &[rows.as_ref()])?;
    drop(rows);
    drop(image);

    let mut commands = device.acquire_commands("Upload")?;
    {
        let mut pass = commands.begin_copy_pass();
        pass.upload_to_buffer(&geometry_staging, 0, &vertex_buffer, mesh.vertex_bytes());
        pass.upload_to_buffer(&geometry_staging, mesh.vertex_bytes(), &index_buffer, mesh.index_bytes());
        pass.upload_to_texture(&pixel_staging, bytes_per_row, &texture, width, height);
        pass.end();
    }
    device.submit(commands)?;

    drop(pixel_staging);
    drop(geometry_staging);

    let counts = mesh.counts();
    log::info!(
        "Uploaded {} vertices, {} indices and a {width}x{height} texture",
        counts.vertices,
        counts.indices
    );
    Ok(UploadedScene { vertex_buffer, index_buffer, texture, counts })
}
