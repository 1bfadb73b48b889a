use super::GalaxyPointMaterial;
use crate::prelude::*;
use bevy::{
    asset::RenderAssetUsages,
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        view::NoFrustumCulling,
    },
};

/// Billboard corner offsets, counter-clockwise.
const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub struct PointCloudPlugin;

impl Plugin for PointCloudPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PointCloudControl::default())
            .add_systems(Update, (rebuild_point_cloud, sync_point_size).chain());
    }
}

#[derive(Component)]
pub struct GalaxyPoints;

struct Drawable {
    entity: Entity,
    mesh: Handle<Mesh>,
    material: Handle<GalaxyPointMaterial>,
}

#[derive(Resource, Default)]
pub struct PointCloudControl {
    generation: u32,
    drawable: Option<Drawable>,
}

/// One quad per particle: four vertices sharing the particle's position and
/// color, told apart by their corner in `UV_0`.
pub fn point_cloud_mesh(galaxy: &GeneratedGalaxy) -> Mesh {
    let count = galaxy.particle_count();
    let mut positions = Vec::with_capacity(count * 4);
    let mut corners = Vec::with_capacity(count * 4);
    let mut colors = Vec::with_capacity(count * 4);
    let mut indices = Vec::with_capacity(count * 6);

    for (index, (position, color)) in galaxy
        .position_triples()
        .iter()
        .zip(galaxy.color_triples())
        .enumerate()
    {
        let base = (index * 4) as u32;
        for corner in CORNERS {
            positions.push(*position);
            corners.push(corner);
            colors.push([color[0], color[1], color[2], 1.0]);
        }
        indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

/// Swaps the drawable for a new one whenever a new galaxy has been generated.
/// The old entity, mesh and material are released first.
fn rebuild_point_cloud(
    mut commands: Commands,
    mut control: ResMut<PointCloudControl>,
    state: Res<GalaxyState>,
    params: Res<GalaxyParameters>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointMaterial>>,
) {
    let generation = state.generator.generation();
    if control.generation == generation {
        return;
    }
    let Some(galaxy) = state.generator.current() else {
        return;
    };
    control.generation = generation;

    if let Some(old) = control.drawable.take() {
        commands.entity(old.entity).despawn();
        meshes.remove(&old.mesh);
        materials.remove(&old.material);
    }

    let mesh = meshes.add(point_cloud_mesh(galaxy));
    let material = materials.add(GalaxyPointMaterial::new(params.size));
    let entity = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            Visibility::Inherited,
            NoFrustumCulling,
            GalaxyPoints,
        ))
        .id();
    debug!(
        "Uploaded galaxy #{generation} as {} quads",
        galaxy.particle_count()
    );

    control.drawable = Some(Drawable {
        entity,
        mesh,
        material,
    });
}

/// Point size only touches the material, so it follows the store directly.
fn sync_point_size(
    control: Res<PointCloudControl>,
    params: Res<GalaxyParameters>,
    mut materials: ResMut<Assets<GalaxyPointMaterial>>,
) {
    let Some(drawable) = control.drawable.as_ref() else {
        return;
    };
    let stale = materials
        .get(&drawable.material)
        .is_some_and(|material| material.size() != params.size);
    if stale {
        if let Some(material) = materials.get_mut(&drawable.material) {
            material.set_size(params.size);
        }
    }
}
