//! Backboard and ball prefabs
//!
//! Prefabs are authored in model units and scaled when placed. Each one comes
//! either from the built-in procedural meshes or from a glTF scene configured
//! in [`AssetConfig`]. Spawning a prefab creates an independent copy; nothing
//! spawned shares mutable state with another copy.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_rapier3d::parry::shape::TriMeshFlags;

use crate::basketball3d::types::{AssetConfig, BodyShape, PrefabKind};

/// Ball radius in model units.
pub const BALL_RADIUS: f32 = 0.5;

/// Backboard board size in model units (width, height, thickness).
pub const BOARD_SIZE: Vec3 = Vec3::new(1.8, 1.05, 0.05);
/// How far the board stands off the wall.
pub const BOARD_OFFSET: f32 = 0.6;
pub const RIM_RADIUS: f32 = 0.23;
pub const RIM_THICKNESS: f32 = 0.02;
/// Rim height relative to the board center.
pub const RIM_DROP: f32 = 0.3;

/// Number of spheres approximating the rim's collision ring.
const RIM_SEGMENTS: usize = 16;

#[derive(Debug, Clone)]
struct PrefabPart {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    transform: Transform,
}

#[derive(Debug, Clone)]
enum PrefabSource {
    Procedural(Vec<PrefabPart>),
    Scene(Handle<Scene>),
}

/// Loaded prefab handles plus the shared quad used by plane visuals.
#[derive(Resource, Debug, Clone)]
pub struct Prefabs {
    /// 1x1 quad in the XY plane facing +Z.
    pub plane_mesh: Handle<Mesh>,
    backboard: PrefabSource,
    ball: PrefabSource,
}

impl Prefabs {
    pub fn load(
        assets: &AssetConfig,
        asset_server: &AssetServer,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Self {
        let mut prefabs = Self::procedural(meshes, materials);
        for kind in [PrefabKind::Backboard, PrefabKind::Ball] {
            if let Some(path) = assets.model(kind) {
                info!("Using {} model {}", kind.name(), path.display());
                let handle = asset_server.load(format!("{}#Scene0", path.display()));
                let scene = PrefabSource::Scene(handle);
                match kind {
                    PrefabKind::Backboard => prefabs.backboard = scene,
                    PrefabKind::Ball => prefabs.ball = scene,
                }
            }
        }
        prefabs
    }

    /// Built-in meshes only.
    pub fn procedural(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            plane_mesh: meshes.add(Rectangle::new(1.0, 1.0)),
            backboard: PrefabSource::Procedural(backboard_parts(meshes, materials)),
            ball: PrefabSource::Procedural(ball_parts(meshes, materials)),
        }
    }

    fn source(&self, kind: PrefabKind) -> &PrefabSource {
        match kind {
            PrefabKind::Backboard => &self.backboard,
            PrefabKind::Ball => &self.ball,
        }
    }

    /// Spawn a fresh copy of `kind` at the scene root.
    pub fn spawn(&self, commands: &mut Commands, kind: PrefabKind, transform: Transform) -> Entity {
        let root = commands
            .spawn((transform, Visibility::default(), Name::new(kind.name())))
            .id();

        match self.source(kind) {
            PrefabSource::Procedural(parts) => {
                commands.entity(root).with_children(|parent| {
                    for part in parts {
                        parent.spawn((
                            Mesh3d(part.mesh.clone()),
                            MeshMaterial3d(part.material.clone()),
                            part.transform,
                        ));
                    }
                });
            }
            PrefabSource::Scene(scene) => {
                commands.entity(root).insert(SceneRoot(scene.clone()));
            }
        }

        root
    }

    /// Give a spawned prefab its collision shape.
    ///
    /// Geometry shapes on glTF prefabs are built from the scene's meshes once
    /// they load; everything else gets an analytic shape right away.
    pub fn insert_collider(
        &self,
        commands: &mut Commands,
        entity: Entity,
        kind: PrefabKind,
        shape: BodyShape,
    ) {
        match (shape, self.source(kind)) {
            (BodyShape::Geometry, PrefabSource::Scene(_)) => {
                commands.entity(entity).insert(AsyncSceneCollider {
                    shape: Some(ComputedColliderShape::TriMesh(TriMeshFlags::default())),
                    ..default()
                });
            }
            (BodyShape::Geometry, PrefabSource::Procedural(_)) => {
                commands.entity(entity).insert(geometry_collider(kind));
            }
            (BodyShape::Inferred, _) => {
                commands.entity(entity).insert(inferred_collider(kind));
            }
        }
    }
}

fn backboard_parts(
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Vec<PrefabPart> {
    let board_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.95, 0.95, 0.97, 0.85),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.2,
        ..default()
    });
    let frame_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.18),
        metallic: 0.6,
        perceptual_roughness: 0.4,
        ..default()
    });
    let rim_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.35, 0.05),
        metallic: 0.8,
        perceptual_roughness: 0.3,
        ..default()
    });

    let arm_length = BOARD_OFFSET - BOARD_SIZE.z / 2.0;
    vec![
        PrefabPart {
            mesh: meshes.add(Cuboid::new(BOARD_SIZE.x, BOARD_SIZE.y, BOARD_SIZE.z)),
            material: board_material,
            transform: Transform::from_xyz(0.0, 0.0, BOARD_OFFSET),
        },
        PrefabPart {
            mesh: meshes.add(Cuboid::new(0.1, 0.1, arm_length)),
            material: frame_material,
            transform: Transform::from_xyz(0.0, 0.0, arm_length / 2.0),
        },
        PrefabPart {
            mesh: meshes.add(Torus::new(RIM_RADIUS - RIM_THICKNESS, RIM_RADIUS + RIM_THICKNESS)),
            material: rim_material,
            transform: Transform::from_translation(rim_center()),
        },
    ]
}

fn ball_parts(
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Vec<PrefabPart> {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.42, 0.12),
        perceptual_roughness: 0.8,
        ..default()
    });

    vec![PrefabPart {
        mesh: meshes.add(Sphere::new(BALL_RADIUS).mesh().uv(32, 18)),
        material,
        transform: Transform::IDENTITY,
    }]
}

fn rim_center() -> Vec3 {
    Vec3::new(
        0.0,
        -RIM_DROP,
        BOARD_OFFSET + BOARD_SIZE.z / 2.0 + RIM_RADIUS + RIM_THICKNESS,
    )
}

/// Collision shape following the procedural backboard: board, arm and a ring
/// of spheres along the rim.
pub fn backboard_collider() -> Collider {
    let arm_length = BOARD_OFFSET - BOARD_SIZE.z / 2.0;
    let mut shapes = vec![
        (
            Vec3::new(0.0, 0.0, BOARD_OFFSET),
            Quat::IDENTITY,
            Collider::cuboid(BOARD_SIZE.x / 2.0, BOARD_SIZE.y / 2.0, BOARD_SIZE.z / 2.0),
        ),
        (
            Vec3::new(0.0, 0.0, arm_length / 2.0),
            Quat::IDENTITY,
            Collider::cuboid(0.05, 0.05, arm_length / 2.0),
        ),
    ];

    shapes.extend(rim_ring_points().into_iter().map(|point| {
        (point, Quat::IDENTITY, Collider::ball(RIM_THICKNESS))
    }));

    Collider::compound(shapes)
}

fn rim_ring_points() -> Vec<Vec3> {
    let center = rim_center();
    (0..RIM_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / RIM_SEGMENTS as f32 * std::f32::consts::TAU;
            center + Vec3::new(angle.cos(), 0.0, angle.sin()) * RIM_RADIUS
        })
        .collect()
}

/// Simple shape the engine picks when no geometry-based shape is requested.
pub fn inferred_collider(kind: PrefabKind) -> Collider {
    match kind {
        PrefabKind::Ball => Collider::ball(BALL_RADIUS),
        PrefabKind::Backboard => {
            Collider::cuboid(BOARD_SIZE.x / 2.0, BOARD_SIZE.y / 2.0, BOARD_OFFSET / 2.0)
        }
    }
}

/// Geometry-shaped collider for the procedural prefabs.
pub fn geometry_collider(kind: PrefabKind) -> Collider {
    match kind {
        PrefabKind::Backboard => backboard_collider(),
        PrefabKind::Ball => Collider::ball(BALL_RADIUS),
    }
}
