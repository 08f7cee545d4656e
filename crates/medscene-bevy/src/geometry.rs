//! Conversion of scene descriptors into Bevy meshes and materials

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use medscene_core::graph::{hex_to_rgb, Geometry, Material};
use medscene_core::MeshData;

/// Build the Bevy mesh for a geometry descriptor
pub fn geometry_mesh(geometry: &Geometry) -> Mesh {
    match geometry {
        Geometry::Box { width, height, depth } => Mesh::from(Cuboid::new(*width, *height, *depth)),
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        } => Sphere::new(*radius)
            .mesh()
            .uv(*width_segments, *height_segments),
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        } => ConicalFrustum {
            radius_top: *radius_top,
            radius_bottom: *radius_bottom,
            height: *height,
        }
        .mesh()
        .resolution(*radial_segments)
        .build(),
        Geometry::Tube(data) => mesh_from_data(data),
    }
}

/// Upload swept tube buffers as a triangle list
pub fn mesh_from_data(data: &MeshData) -> Mesh {
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone())
        .with_inserted_indices(Indices::U32(data.indices.clone()))
}

/// Approximate a Blinn-Phong surface with Bevy's PBR material
///
/// Shininess maps to roughness via `sqrt(2 / (shininess + 2))`, and the
/// specular color's brightness drives reflectance.
pub fn standard_material(material: &Material) -> StandardMaterial {
    let [r, g, b] = hex_to_rgb(material.color);
    let [er, eg, eb] = hex_to_rgb(material.emissive);
    let specular = hex_to_rgb(material.specular);
    let specular_level = (specular[0] + specular[1] + specular[2]) / 3.0;

    StandardMaterial {
        base_color: Color::srgba(r, g, b, material.opacity),
        emissive: Color::srgb(er, eg, eb).to_linear() * material.emissive_intensity,
        perceptual_roughness: (2.0 / (material.shininess + 2.0)).sqrt().clamp(0.089, 1.0),
        reflectance: (0.5 * specular_level / 0.2).clamp(0.0, 1.0),
        metallic: 0.0,
        alpha_mode: if material.transparent {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    }
}
