use bevy::prelude::*;

mod point_cloud;
mod point_material;

pub use point_cloud::{point_cloud_mesh, GalaxyPoints};
pub use point_material::GalaxyPointMaterial;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MaterialPlugin::<GalaxyPointMaterial>::default(),
            point_cloud::PointCloudPlugin,
        ));
    }
}
