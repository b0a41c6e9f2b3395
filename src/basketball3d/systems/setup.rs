//! Scene setup
//!
//! Builds the room the simulated device stands in, the device camera, lights,
//! the HUD and the prefab handles, then starts world tracking.

use bevy::prelude::*;

use super::bevy_engine::BevyArEngine;
use crate::basketball3d::ar_sim::SimulatedRoom;
use crate::basketball3d::controllers::start_tracking;
use crate::basketball3d::prefabs::Prefabs;
use crate::basketball3d::types::*;

/// Eye height of the device at startup.
pub const DEVICE_HEIGHT: f32 = 1.4;

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
    room: Res<SimulatedRoom>,
    look: Res<DeviceLook>,
) {
    let prefabs = Prefabs::load(&config.assets, &asset_server, &mut meshes, &mut materials);

    // Device camera, standing in the middle of the room facing north
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, DEVICE_HEIGHT, 0.0).with_rotation(look.rotation()),
        ArCamera,
        Name::new("ArCamera"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 6.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            range: 20.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, config.room.height - 0.3, 0.0),
    ));

    // Room surfaces are only scenery: nothing collides with them.
    let wall_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.82, 0.8, 0.76),
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.36, 0.28),
        perceptual_roughness: 0.7,
        ..default()
    });

    for surface in &room.surfaces {
        let material = match surface.alignment {
            PlaneAlignment::Vertical => wall_material.clone(),
            PlaneAlignment::Horizontal => floor_material.clone(),
        };
        let quad = PlaneVisual {
            size: surface.size,
            center: Vec3::ZERO,
            color: Color::WHITE,
        };

        commands
            .spawn((
                Transform::from_matrix(surface.frame),
                Visibility::default(),
                Name::new(surface.name),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(prefabs.plane_mesh.clone()),
                    MeshMaterial3d(material),
                    // Sit just behind the detected-plane quads.
                    quad.transform().with_translation(Vec3::new(0.0, -0.005, 0.0)),
                ));
            });
    }

    commands.spawn((
        Text::new(AppMode::default().instruction()),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText,
    ));

    commands.insert_resource(prefabs);
}

/// Start looking for walls once the scene exists.
pub fn start_session(mut engine: BevyArEngine) {
    start_tracking(&mut engine);
}
