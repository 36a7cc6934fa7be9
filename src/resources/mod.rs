use std::path::Path;

use anyhow::Context as _;

use crate::data_structures::model::{Material, MaterialParams, Model};

/**
 * This module contains all logic for loading meshes/textures/etc. from
 * external files.
 */
pub mod mesh;
pub mod texture;

/// Load an OBJ file into a [`Model::Mesh`].
///
/// The file is triangulated and single-indexed by the parser; each material
/// group becomes one draw range in file order. A missing or unparsable OBJ or
/// MTL is an error (the caller treats its primary meshes as required). A
/// missing texture is not: the material is logged and rendered untextured.
pub fn load_model_obj(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture_layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<Model> {
    let (models, obj_materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("loading {}", path.display()))?;
    let obj_materials =
        obj_materials.with_context(|| format!("loading materials of {}", path.display()))?;

    let obj_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut materials = Vec::with_capacity(obj_materials.len());
    for m in obj_materials {
        let diffuse_texture = m.diffuse_texture.as_ref().and_then(|file| {
            let texture_path = obj_dir.join(file);
            match texture::load_texture(&texture_path, device, queue) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    log::warn!(
                        "could not load texture {} referenced by {}: {e}",
                        texture_path.display(),
                        m.name
                    );
                    None
                }
            }
        });
        let params = MaterialParams {
            name: m.name.clone(),
            ambient: m.ambient.unwrap_or([1.0, 1.0, 1.0]),
            diffuse: m.diffuse.unwrap_or([1.0, 1.0, 1.0]),
            specular: m.specular.unwrap_or([0.0, 0.0, 0.0]),
            shininess: m.shininess.unwrap_or(16.0),
        };
        materials.push(Material::new(
            device,
            queue,
            params,
            diffuse_texture,
            None,
            texture_layout,
        ));
    }

    let data = mesh::mesh_data_from_obj(&models);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Model::mesh(
        device,
        queue,
        &name,
        &data,
        materials,
        texture_layout,
    ))
}
