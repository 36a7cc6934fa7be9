//! Texture loading from disk.

use std::path::Path;

use crate::data_structures::texture::Texture;

pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

/// Load a 2D texture from an image file.
pub fn load_texture(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(path)?;
    Texture::from_bytes(device, queue, &data, &path.display().to_string())
}

/// Load a cubemap from six face image files, in +x, -x, +y, -y, +z, -z order.
pub fn load_cubemap(
    paths: &[&Path; 6],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let mut faces = Vec::with_capacity(6);
    for path in paths {
        let data = load_binary(path)?;
        faces.push(image::load_from_memory(&data)?);
    }
    let faces: [image::DynamicImage; 6] = faces.try_into().expect("six faces");
    Texture::cubemap_from_images(
        device,
        queue,
        &faces,
        Some(&paths[0].display().to_string()),
    )
}
