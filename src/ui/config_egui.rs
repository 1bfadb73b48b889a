use crate::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system);
    }
}

// dark, slightly see-through panel over the additive star field
fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        panel_fill: egui::Color32::from_rgba_unmultiplied(6, 8, 20, 230),
        window_corner_radius: 0.0.into(),
        ..egui::Visuals::dark()
    });
}

/// Decides when a shape edit has settled enough to regenerate.
///
/// An edit arms the tracker; it fires on the first frame afterwards where no
/// pointer button is held. A reroll fires immediately.
#[derive(Default)]
struct SettleTracker {
    pending: bool,
}

impl SettleTracker {
    fn update(&mut self, shape_edited: bool, pointer_down: bool, reroll: bool) -> bool {
        self.pending |= shape_edited;
        if reroll || (self.pending && !pointer_down) {
            self.pending = false;
            return true;
        }
        false
    }
}

fn srgb_bytes(color: Srgba) -> [u8; 3] {
    let byte = |channel: f32| (channel * 255.0).round() as u8;
    [byte(color.red), byte(color.green), byte(color.blue)]
}

fn color_row(label: &str, color: &mut Srgba, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let mut rgb = srgb_bytes(*color);
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        ui.label(label);
    });
}

fn fps_line(diagnostics: &DiagnosticsStore) -> String {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(|frame_time| frame_time.smoothed())
        .unwrap_or(0.0);
    format!("FPS: {fps:.1} ({frame_time:.2} ms)")
}

/// Edits a copy of the parameters and writes it back only when something moved.
fn ui_system(
    mut contexts: EguiContexts,
    mut params: ResMut<GalaxyParameters>,
    state: Res<GalaxyState>,
    diagnostics: Res<DiagnosticsStore>,
    mut requests: EventWriter<RegenerateGalaxy>,
    mut settle: Local<SettleTracker>,
) {
    let ctx = contexts.ctx_mut();
    let minval = GalaxyParameters::MIN;
    let maxval = GalaxyParameters::MAX;

    let mut edited = params.clone();
    let mut reroll = false;

    egui::SidePanel::left("side_panel")
        .default_width(360.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");

            egui::CollapsingHeader::new("Shape")
                .default_open(true)
                .show(ui, |ui| {
                    ui.add(
                        egui::Slider::new(&mut edited.count, minval.count..=maxval.count)
                            .logarithmic(true)
                            .step_by(100.0)
                            .text("Count"),
                    );
                    ui.add(
                        egui::Slider::new(&mut edited.radius, minval.radius..=maxval.radius)
                            .step_by(0.01)
                            .text("Radius"),
                    );
                    ui.add(
                        egui::Slider::new(&mut edited.branches, minval.branches..=maxval.branches)
                            .text("Branches"),
                    );
                    ui.add(
                        egui::Slider::new(&mut edited.spin, minval.spin..=maxval.spin)
                            .step_by(0.001)
                            .text("Spin"),
                    );
                });

            egui::CollapsingHeader::new("Jitter")
                .default_open(true)
                .show(ui, |ui| {
                    ui.add(
                        egui::Slider::new(
                            &mut edited.randomness_power,
                            minval.randomness_power..=maxval.randomness_power,
                        )
                        .step_by(0.001)
                        .text("Randomness Power"),
                    );
                    ui.add(
                        egui::Slider::new(
                            &mut edited.randomness,
                            minval.randomness..=maxval.randomness,
                        )
                        .step_by(0.001)
                        .text("Randomness"),
                    );
                    egui::ComboBox::from_label("Jitter Scaling")
                        .selected_text(edited.jitter_mode.label())
                        .show_ui(ui, |ui| {
                            for mode in JitterMode::ALL {
                                ui.selectable_value(&mut edited.jitter_mode, mode, mode.label());
                            }
                        });
                    if edited.jitter_mode == JitterMode::PowerOnly {
                        ui.weak("Randomness has no effect in this mode");
                    }
                });

            egui::CollapsingHeader::new("Appearance")
                .default_open(true)
                .show(ui, |ui| {
                    ui.add(
                        egui::Slider::new(&mut edited.size, minval.size..=maxval.size)
                            .step_by(0.001)
                            .text("Point Size"),
                    );
                    color_row("Inside Color", &mut edited.inside_color, ui);
                    color_row("Outside Color", &mut edited.outside_color, ui);
                });

            ui.separator();
            reroll = ui.button("Regenerate").clicked();
            ui.label(format!(
                "Galaxy #{}: {} particles in {:.1?}",
                state.generator.generation(),
                state
                    .generator
                    .current()
                    .map_or(0, |galaxy| galaxy.particle_count()),
                state.last_duration
            ));
            ui.label(fps_line(&diagnostics));
        });

    let edited = edited.clamped();
    let shape_edited = !params.same_shape(&edited);
    if edited != *params {
        *params = edited;
    }

    let pointer_down = ctx.input(|input| input.pointer.any_down());
    if settle.update(shape_edited, pointer_down, reroll) {
        requests.write(RegenerateGalaxy);
    }
}
