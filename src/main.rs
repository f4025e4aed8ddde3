use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::math::bounding::Aabb2d;
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowPlugin};
use bevy_egui::EguiPlugin;
use bevy_rts_camera::*;

pub mod config;
pub mod systems;

#[cfg(test)]
pub mod test;

// import modules here
use systems::mesh::TempleGenerationPlugin;
use systems::ui::UIPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                mode: bevy::window::WindowMode::Windowed,
                title: "Gopuram Generator".into(),
                resolution: bevy::window::WindowResolution::new(1920.0, 1080.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(WireframePlugin::default())
        .add_plugins(RtsCameraPlugin)

        // my custom plugins
        .add_plugins(TempleGenerationPlugin)
        .add_plugins(UIPlugin)

        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::BLACK,
        })
        .insert_resource(ClearColor(Color::srgb(0.45, 0.58, 0.72))) // sky color
        .add_systems(Startup, (start, maximize_window))
        .add_systems(Update, handle_exit)
        .run()
}

fn maximize_window(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in windows.iter_mut() {
        window.set_maximized(true);
    }
}

// application entry point here
fn start(mut commands: Commands) {
    // spawn camera; its transform doubles as the LOD viewer position
    commands.spawn((
        RtsCamera {
            bounds: Aabb2d::new(Vec2::ZERO, Vec2::new(3000.0, 3000.0)),
            min_angle: 0.5,
            height_max: 2800.0,
            ..default()
        },
        RtsCameraControls {
            key_up: KeyCode::KeyW,
            key_down: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            key_rotate_left: KeyCode::KeyQ,
            key_rotate_right: KeyCode::KeyE,
            pan_speed: 280.0,
            zoom_sensitivity: 0.2,
            edge_pan_width: 0.0,
            ..default()
        },
    ));

    // spawn light source
    commands.spawn((
        DirectionalLight {
            illuminance: 2_400.,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(50000.0, 50000.0, 30000.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// application exit
fn handle_exit(keys: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
