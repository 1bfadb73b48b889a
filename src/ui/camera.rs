use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use std::f32::consts::FRAC_PI_2;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, camera_control_system);
    }
}

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);
    let orbit = OrbitCamera::default();
    commands.spawn((Camera3d::default(), orbit.transform(), orbit));
}

/// Orbits `target` with damped rotation and zoom.
///
/// Input goes into the `*_buffer` fields and is bled into the actual angles a
/// fraction at a time, so motion keeps easing out after the mouse stops.
#[derive(Component, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_buffer: f32,
    pitch_buffer: f32,
    smooth_zoom_buffer: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // looking at the origin from (3, 3, 3)
        let start = Vec3::splat(3.0);
        Self {
            target: Vec3::ZERO,
            yaw: start.x.atan2(start.z),
            pitch: (start.y / start.length()).asin(),
            distance: start.length(),
            yaw_buffer: 0.0,
            pitch_buffer: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }
}

impl OrbitCamera {
    const ROTATE_SPEED: f32 = 0.005;
    const ZOOM_SPEED: f32 = 0.1;
    const DAMPING: f32 = 10.0;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
    const MIN_DISTANCE: f32 = 0.1;
    const MAX_DISTANCE: f32 = 100.0;

    fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        Transform::from_translation(self.target + rotation * Vec3::Z * self.distance)
            .looking_at(self.target, Vec3::Y)
    }

    /// Moves `fraction` of every buffer into the camera state.
    fn settle(&mut self, fraction: f32) {
        let yaw = self.yaw_buffer * fraction;
        let pitch = self.pitch_buffer * fraction;
        let zoom = self.smooth_zoom_buffer * fraction;
        self.yaw_buffer -= yaw;
        self.pitch_buffer -= pitch;
        self.smooth_zoom_buffer -= zoom;

        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.distance =
            (self.distance * (-zoom).exp()).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };

    // the config panel owns the pointer while it is hovered or dragged
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let ui_owns_pointer = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    let drag: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    if mouse_buttons.pressed(MouseButton::Left) && !ui_owns_pointer {
        orbit.yaw_buffer -= drag.x * OrbitCamera::ROTATE_SPEED;
        orbit.pitch_buffer += drag.y * OrbitCamera::ROTATE_SPEED;
    }

    for ev in scroll_evr.read() {
        if ui_owns_pointer {
            continue;
        }
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.01,
        };
        orbit.smooth_zoom_buffer += lines * OrbitCamera::ZOOM_SPEED;
    }

    let fraction = 1.0 - (-OrbitCamera::DAMPING * time.delta_secs()).exp();
    orbit.settle(fraction);
    *transform = orbit.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_starts_at_three_three_three() {
        let transform = OrbitCamera::default().transform();
        assert!(transform.translation.abs_diff_eq(Vec3::splat(3.0), 1e-4));
    }

    #[test]
    fn settling_drains_the_buffers() {
        let mut orbit = OrbitCamera {
            yaw_buffer: 1.0,
            smooth_zoom_buffer: 0.5,
            ..default()
        };
        let start = orbit.clone();
        orbit.settle(1.0);

        assert_eq!(orbit.yaw_buffer, 0.0);
        assert_eq!(orbit.smooth_zoom_buffer, 0.0);
        assert!((orbit.yaw - (start.yaw + 1.0)).abs() < 1e-6);
        assert!(orbit.distance < start.distance);
    }

    #[test]
    fn pitch_never_flips_over_the_pole() {
        let mut orbit = OrbitCamera {
            pitch_buffer: 10.0,
            ..default()
        };
        orbit.settle(1.0);
        assert!(orbit.pitch <= OrbitCamera::PITCH_LIMIT);
    }
}
