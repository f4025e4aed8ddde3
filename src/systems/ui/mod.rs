use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy::pbr::wireframe::WireframeConfig;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::config::{self, Bounds};
use crate::systems::mesh::tower::noise::NoiseField;
use crate::systems::mesh::tower::params::{LodBound, ParameterState};
use crate::systems::mesh::tower::profile;
use crate::systems::mesh::{
    NoiseSource, ParamsEdited, RebuildEvent, RebuildPending, RebuildReason, Seed, SynthStatus,
};

// text buffer behind the profile editor; parsed on Apply, not per keystroke
#[derive(Resource)]
pub struct ProfileDraft(pub String);

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app.insert_resource(ProfileDraft(profile::serialize_profile(
            &profile::default_profile(),
        )))
        .add_systems(EguiPrimaryContextPass, (ui_main, fps)); // UI rendering here
    }
}

fn slider(ui: &mut egui::Ui, value: &mut f32, bounds: Bounds, label: &str, hover: &str) -> bool {
    ui.add(
        egui::Slider::new(value, bounds.min..=bounds.max)
            .step_by(bounds.step as f64)
            .text(label),
    )
    .on_hover_text(hover)
    .changed()
}

fn count_slider(ui: &mut egui::Ui, value: &mut usize, bounds: Bounds, label: &str, hover: &str) -> bool {
    ui.add(
        egui::Slider::new(value, bounds.min as usize..=bounds.max as usize).text(label),
    )
    .on_hover_text(hover)
    .changed()
}

fn ui_main(
    mut contexts: EguiContexts,
    mut params: ResMut<ParameterState>,
    mut draft: ResMut<ProfileDraft>,
    mut seed: ResMut<Seed>,
    mut noise: ResMut<NoiseSource>,
    status: Res<SynthStatus>,
    mut wireframe: ResMut<WireframeConfig>,
    mut pending: ResMut<RebuildPending>,
    mut edit_events: EventWriter<ParamsEdited>,
    mut rebuild_events: EventWriter<RebuildEvent>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(220.0)
            .min_width(260.0)
            .max_width(420.0)
            .resizable(true)
            .show(ctx, |ui| {
                let mut edited = false;
                let mut lod_edit = None;

                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB - Rotate");

                ui.separator();
                ui.label("Synthesis Parameters:");

                // seed
                egui::CollapsingHeader::new("Seed")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.label(format!("Current: {}", seed.0));
                        if ui
                            .button("Reseed")
                            .on_hover_text("Draw a new noise lattice and resynthesize")
                            .clicked()
                        {
                            seed.0 = rand::random();
                            noise.0 = NoiseField::new(seed.0);
                            if !pending.0 {
                                pending.0 = true;
                                rebuild_events.write(RebuildEvent { reason: RebuildReason::Reseed });
                            }
                        }
                    });

                egui::CollapsingHeader::new("Massing")
                    .default_open(true)
                    .show(ui, |ui| {
                        edited |= slider(ui, &mut params.scale_x, config::SCALE_X,
                            "Scale X", "Footprint width multiplier.");
                        edited |= slider(ui, &mut params.scale_y, config::SCALE_Y,
                            "Scale Y", "Overall tower height multiplier.");
                        edited |= slider(ui, &mut params.scale_z, config::SCALE_Z,
                            "Scale Z", "Footprint depth multiplier.");
                        edited |= slider(ui, &mut params.base_scale, config::BASE_SCALE,
                            "Base Scale", "Height of the base storey the tiers stand on.");
                        edited |= count_slider(ui, &mut params.striations, config::STRIATIONS,
                            "Tiers", "Number of stacked tiers in the tower.");
                        edited |= count_slider(ui, &mut params.visible_tier_cap, config::VISIBLE_TIER_CAP,
                            "Visible Tier Cap", "Tiers beyond this are silently dropped; slide up to reveal the full stack.");
                    });

                egui::CollapsingHeader::new("Surface")
                    .default_open(true)
                    .show(ui, |ui| {
                        edited |= slider(ui, &mut params.noise_intensity, config::NOISE_INTENSITY,
                            "Noise Intensity", "Coherent vertical perturbation of tier seams.");
                        edited |= slider(ui, &mut params.door_height_offset, config::DOOR_HEIGHT_OFFSET,
                            "Door Offset", "Lifts the door openings by this fraction of the door height.");
                        edited |= count_slider(ui, &mut params.column_count, config::COLUMN_COUNT,
                            "Columns", "Requested columns per tier face; the center band stays clear.");
                    });

                egui::CollapsingHeader::new("Shrine")
                    .default_open(false)
                    .show(ui, |ui| {
                        edited |= slider(ui, &mut params.shrine_protrusion, config::SHRINE_PROTRUSION,
                            "Shrine Embed", "Fraction of each mini-shrine buried in the tier wall.");
                        edited |= count_slider(ui, &mut params.shrine_color_index, config::SHRINE_COLOR_INDEX,
                            "Shrine Palette", "Palette rotation for the central shrine and mini-shrines.");
                    });

                egui::CollapsingHeader::new("Enclosures")
                    .default_open(false)
                    .show(ui, |ui| {
                        edited |= count_slider(ui, &mut params.inner_enclosures, config::INNER_ENCLOSURES,
                            "Inner Walls", "Concentric walled rings inside the outer enclosure.");
                        edited |= slider(ui, &mut params.wall_thickness, config::WALL_THICKNESS,
                            "Wall Thickness", "Enclosure wall thickness.");
                        edited |= slider(ui, &mut params.wall_spacing, config::WALL_SPACING,
                            "Wall Spacing", "Distance between consecutive enclosure rings.");
                    });

                egui::CollapsingHeader::new("Level of Detail")
                    .default_open(false)
                    .show(ui, |ui| {
                        if slider(ui, &mut params.lod_near, config::LOD_NEAR,
                            "Near", "Inside this distance towers synthesize at full detail.") {
                            edited = true;
                            lod_edit = Some(LodBound::Near);
                        }
                        if slider(ui, &mut params.lod_far, config::LOD_FAR,
                            "Far", "Beyond this distance towers drop to silhouette detail.") {
                            edited = true;
                            lod_edit = Some(LodBound::Far);
                        }
                        edited |= ui
                            .checkbox(&mut params.bead_enabled, "Bead Rails")
                            .on_hover_text("Enable bead rails on close-up towers.")
                            .changed();
                        edited |= slider(ui, &mut params.bead_distance, config::BEAD_DISTANCE,
                            "Bead Distance", "Bead rails only appear within this distance.");
                    });

                // profile editor
                egui::CollapsingHeader::new("Cross-Section Profile")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.label("One \"x, y\" point per line:");
                        egui::ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                            ui.add(
                                egui::TextEdit::multiline(&mut draft.0)
                                    .font(egui::TextStyle::Monospace)
                                    .desired_rows(10),
                            );
                        });
                        ui.horizontal(|ui| {
                            if ui
                                .button("Apply & Refit")
                                .on_hover_text("Parse the profile text and resynthesize. A degenerate profile falls back to a stepped outline.")
                                .clicked()
                            {
                                params.profile = profile::parse_profile(&draft.0);
                                if !pending.0 {
                                    pending.0 = true;
                                    rebuild_events.write(RebuildEvent { reason: RebuildReason::Refit });
                                }
                            }
                            if ui.button("Reset").clicked() {
                                params.profile = profile::default_profile();
                                draft.0 = profile::serialize_profile(&params.profile);
                                if !pending.0 {
                                    pending.0 = true;
                                    rebuild_events.write(RebuildEvent { reason: RebuildReason::Refit });
                                }
                            }
                        });
                        ui.label(format!("{} points", params.profile.len()));
                    });

                ui.separator();

                // render-only toggle, no resynthesis needed
                ui.checkbox(&mut wireframe.global, "Wireframe")
                    .on_hover_text("Overlay wireframe on all meshes");

                // status indicator
                ui.horizontal(|ui| {
                    ui.label("Status:");
                    let status_color = if status.healthy {
                        egui::Color32::from_rgb(34, 139, 34)
                    } else {
                        egui::Color32::from_rgb(178, 34, 34)
                    };
                    ui.label(egui::RichText::new(&status.message).color(status_color));
                });

                ui.separator();
                ui.label("ESC - Exit");

                // edits coalesce behind the debounce before one rebuild fires
                if edited {
                    edit_events.write(ParamsEdited { lod_edit });
                }
            });
    }
}

fn fps(mut contexts: EguiContexts, diagnostics: Res<DiagnosticsStore>) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps_diagnostic) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                        if let Some(fps) = fps_diagnostic.smoothed() {
                            ui.label(
                                egui::RichText::new(format!("{fps:.0}"))
                                    .size(26.0)
                                    .color(egui::Color32::WHITE),
                            );
                        }
                    }
                });
            });
    }
}
