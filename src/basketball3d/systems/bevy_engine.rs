//! [`ArEngine`] on top of the Bevy world
//!
//! Anchor nodes, plane visuals and prefab clones are ordinary entities. The
//! tracking session owns the anchors; this module mirrors them into the scene.
//! Every world change goes through `Commands`, so bookkeeping that the
//! controllers read back in the same frame lives in [`AnchorNodes`].

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::collections::HashMap;

use crate::basketball3d::ar_sim::{AnchorEvent, TrackingSession};
use crate::basketball3d::controllers::{on_anchor_added, on_anchor_removed, on_anchor_updated};
use crate::basketball3d::engine::{ArEngine, RunOptions, TrackingConfig};
use crate::basketball3d::prefabs::Prefabs;
use crate::basketball3d::types::*;

/// Scene nodes created for tracked anchors.
#[derive(Resource, Default, Debug)]
pub struct AnchorNodes {
    nodes: HashMap<AnchorId, Entity>,
    visuals: HashMap<AnchorId, (Entity, PlaneVisual)>,
}

impl AnchorNodes {
    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }
}

/// Serial handed to the next thrown ball.
#[derive(Resource, Default, Debug)]
pub struct BallCounter {
    pub next: u64,
}

#[derive(SystemParam)]
pub struct BevyArEngine<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub session: ResMut<'w, TrackingSession>,
    pub nodes: ResMut<'w, AnchorNodes>,
    pub prefabs: Res<'w, Prefabs>,
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
    pub config: Res<'w, GameConfig>,
    pub balls: ResMut<'w, BallCounter>,
    pub cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<ArCamera>>,
}

impl BevyArEngine<'_, '_> {
    /// Mirror one tracker event into the scene and hand it to the plane
    /// tracker.
    pub fn apply_anchor_event(&mut self, event: AnchorEvent) {
        match event {
            AnchorEvent::Added(anchor) => {
                let node = self
                    .commands
                    .spawn((
                        AnchorNode(anchor.id),
                        Transform::from_matrix(anchor.transform),
                        Visibility::default(),
                        Name::new(format!("Anchor {}", anchor.id.0)),
                    ))
                    .id();
                self.nodes.nodes.insert(anchor.id, node);
                debug!("Anchor {} added ({:?})", anchor.id.0, anchor.alignment);

                let color = self.config.planes.color.to_color();
                on_anchor_added(self, &anchor, color);
            }
            AnchorEvent::Updated(anchor) => {
                let Some(&node) = self.nodes.nodes.get(&anchor.id) else {
                    return;
                };
                self.commands
                    .entity(node)
                    .insert(Transform::from_matrix(anchor.transform));
                on_anchor_updated(self, &anchor);
            }
            AnchorEvent::Removed(id) => {
                on_anchor_removed(self, id);
                if let Some(node) = self.nodes.nodes.remove(&id) {
                    self.commands.entity(node).despawn();
                }
            }
        }
    }

    fn despawn_all_anchor_nodes(&mut self) {
        for (_, node) in self.nodes.nodes.drain() {
            self.commands.entity(node).despawn();
        }
        self.nodes.visuals.clear();
    }
}

impl ArEngine for BevyArEngine<'_, '_> {
    fn run_session(&mut self, config: TrackingConfig, options: RunOptions) {
        if options.remove_existing_anchors {
            self.despawn_all_anchor_nodes();
        }
        self.session.run(config, options);
    }

    fn pause_session(&mut self) {
        self.session.pause();
    }

    fn hit_test(&self, screen_point: Vec2) -> Option<HitTestResult> {
        let (camera, camera_transform) = self.cameras.single().ok()?;
        let ray = camera.viewport_to_world(camera_transform, screen_point).ok()?;
        self.session.hit_test(&Ray::from(ray))
    }

    fn camera_pose(&self) -> Option<Mat4> {
        self.session.camera_pose()
    }

    fn attach_plane_visual(&mut self, anchor: AnchorId, visual: PlaneVisual) {
        let Some(&node) = self.nodes.nodes.get(&anchor) else {
            return;
        };

        let material = self.materials.add(StandardMaterial {
            base_color: visual.color,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });

        let child = self
            .commands
            .spawn((
                Mesh3d(self.prefabs.plane_mesh.clone()),
                MeshMaterial3d(material),
                visual.transform(),
                DetectedPlaneVisual {
                    anchor,
                    visual: visual.clone(),
                },
                ChildOf(node),
            ))
            .id();
        self.nodes.visuals.insert(anchor, (child, visual));
    }

    fn plane_visual(&self, anchor: AnchorId) -> Option<PlaneVisual> {
        self.nodes.visuals.get(&anchor).map(|(_, visual)| visual.clone())
    }

    fn replace_plane_visual(&mut self, anchor: AnchorId, visual: PlaneVisual) {
        let Some((child, current)) = self.nodes.visuals.get_mut(&anchor) else {
            return;
        };

        self.commands.entity(*child).insert((
            visual.transform(),
            DetectedPlaneVisual {
                anchor,
                visual: visual.clone(),
            },
        ));
        *current = visual;
    }

    fn remove_plane_visual(&mut self, anchor: AnchorId) {
        if let Some((child, _)) = self.nodes.visuals.remove(&anchor) {
            self.commands.entity(child).despawn();
        }
    }

    fn spawn_object(&mut self, object: SceneObject) {
        let entity = self
            .prefabs
            .spawn(&mut self.commands, object.prefab, object.transform);
        self.prefabs
            .insert_collider(&mut self.commands, entity, object.prefab, object.body.shape);

        match object.body.kind {
            BodyKind::Static => {
                self.commands.entity(entity).insert((
                    RigidBody::Fixed,
                    Restitution::coefficient(0.4),
                    Friction::coefficient(0.6),
                ));
            }
            BodyKind::Dynamic => {
                let mass = self.config.gameplay.ball_mass;
                let linvel = object.impulse.map_or(Vec3::ZERO, |impulse| impulse / mass);
                self.commands.entity(entity).insert((
                    RigidBody::Dynamic,
                    Velocity {
                        linvel,
                        angvel: Vec3::ZERO,
                    },
                    ColliderMassProperties::Mass(mass),
                    Restitution::coefficient(0.7),
                    Friction::coefficient(0.5),
                    Ccd::enabled(),
                ));
            }
        }

        match object.prefab {
            PrefabKind::Backboard => {
                self.commands.entity(entity).insert(Backboard);
            }
            PrefabKind::Ball => {
                let serial = self.balls.next;
                self.balls.next += 1;
                self.commands.entity(entity).insert(Ball { serial });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basketball3d::controllers::{backboard_object, ball_object};
    use bevy::ecs::system::RunSystemOnce;

    fn engine_world(config: GameConfig) -> World {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        let prefabs = world.resource_scope(|world, mut meshes: Mut<Assets<Mesh>>| {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            Prefabs::procedural(&mut meshes, &mut materials)
        });
        world.insert_resource(prefabs);
        world.insert_resource(TrackingSession::new(config.tracking.clone()));
        world.insert_resource(config);
        world.init_resource::<AnchorNodes>();
        world.init_resource::<BallCounter>();
        world
    }

    fn wall_anchor(id: u64, extent: Vec3) -> PlaneAnchor {
        PlaneAnchor {
            id: AnchorId(id),
            alignment: PlaneAlignment::Vertical,
            transform: plane_frame(Vec3::new(0.0, 1.5, -3.0), Vec3::Z),
            center: Vec3::ZERO,
            extent,
        }
    }

    fn apply(world: &mut World, event: AnchorEvent) {
        world
            .run_system_once(move |mut engine: BevyArEngine| {
                engine.apply_anchor_event(event.clone())
            })
            .unwrap();
    }

    fn spawn(world: &mut World, object: SceneObject) {
        world
            .run_system_once(move |mut engine: BevyArEngine| engine.spawn_object(object.clone()))
            .unwrap();
    }

    fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
        world.query_filtered::<Entity, F>().iter(world).count()
    }

    #[test]
    fn test_backboard_is_fixed_with_collider() {
        let mut world = engine_world(GameConfig::default());
        let anchor = wall_anchor(1, Vec3::new(2.0, 0.0, 1.0));
        let hit = HitTestResult {
            world_transform: anchor.transform,
            distance: 3.0,
            anchor,
        };
        spawn(&mut world, backboard_object(&hit, &GameConfig::default().gameplay));

        let backboard = world
            .query_filtered::<Entity, With<Backboard>>()
            .single(&world)
            .unwrap();
        assert!(matches!(world.get::<RigidBody>(backboard), Some(RigidBody::Fixed)));
        assert!(world.get::<Collider>(backboard).is_some());
        assert!(world.get::<Velocity>(backboard).is_none());
        assert_eq!(world.get::<Transform>(backboard).unwrap().scale, Vec3::splat(0.25));
    }

    #[test]
    fn test_ball_launch_velocity_is_impulse_over_mass() {
        let mut config = GameConfig::default();
        config.gameplay.ball_mass = 0.5;
        config.gameplay.throw_impulse = 2.0;
        let mut world = engine_world(config.clone());

        let camera = Mat4::from_translation(Vec3::new(0.0, 1.4, 0.0));
        spawn(&mut world, ball_object(camera, &config.gameplay));
        spawn(&mut world, ball_object(camera, &config.gameplay));

        let mut balls = world.query::<(&Ball, &RigidBody, &Velocity, &ColliderMassProperties)>();
        let mut serials = Vec::new();
        for (ball, body, velocity, mass) in balls.iter(&world) {
            assert!(matches!(body, RigidBody::Dynamic));
            // Camera looks down -Z, so the ball flies along -Z.
            assert!(velocity.linvel.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5));
            assert!(matches!(mass, ColliderMassProperties::Mass(m) if *m == 0.5));
            serials.push(ball.serial);
        }
        serials.sort();
        assert_eq!(serials, vec![0, 1]);
        assert_eq!(world.resource::<BallCounter>().next, 2);
    }

    #[test]
    fn test_anchor_visual_follows_updates() {
        let mut world = engine_world(GameConfig::default());
        apply(&mut world, AnchorEvent::Added(wall_anchor(1, Vec3::new(1.0, 0.0, 0.5))));

        assert_eq!(count::<With<AnchorNode>>(&mut world), 1);
        let (visual, parent) = world
            .query::<(&DetectedPlaneVisual, &ChildOf)>()
            .single(&world)
            .map(|(visual, parent)| (visual.visual.clone(), parent.parent()))
            .unwrap();
        assert_eq!(visual.size, Vec2::new(1.0, 0.5));
        assert!(world.get::<AnchorNode>(parent).is_some());

        apply(&mut world, AnchorEvent::Updated(wall_anchor(1, Vec3::new(2.5, 0.0, 1.5))));
        let mut visuals = world.query::<&DetectedPlaneVisual>();
        let visual = visuals.single(&world).unwrap();
        assert_eq!(visual.visual.size, Vec2::new(2.5, 1.5));
        assert_eq!(world.resource::<AnchorNodes>().visual_count(), 1);
    }

    #[test]
    fn test_horizontal_anchor_gets_node_but_no_visual() {
        let mut world = engine_world(GameConfig::default());
        let mut floor = wall_anchor(4, Vec3::ONE);
        floor.alignment = PlaneAlignment::Horizontal;
        apply(&mut world, AnchorEvent::Added(floor));

        assert_eq!(count::<With<AnchorNode>>(&mut world), 1);
        assert_eq!(count::<With<DetectedPlaneVisual>>(&mut world), 0);
    }

    #[test]
    fn test_removed_anchor_drops_node_and_visual() {
        let mut world = engine_world(GameConfig::default());
        apply(&mut world, AnchorEvent::Added(wall_anchor(1, Vec3::ONE)));
        apply(&mut world, AnchorEvent::Added(wall_anchor(2, Vec3::ONE)));

        apply(&mut world, AnchorEvent::Removed(AnchorId(1)));

        assert_eq!(count::<With<AnchorNode>>(&mut world), 1);
        assert_eq!(count::<With<DetectedPlaneVisual>>(&mut world), 1);
        let nodes = world.resource::<AnchorNodes>();
        assert!(!nodes.nodes.contains_key(&AnchorId(1)));
        assert_eq!(nodes.visual_count(), 1);
    }

    #[test]
    fn test_run_session_removing_anchors_clears_the_scene() {
        let mut world = engine_world(GameConfig::default());
        apply(&mut world, AnchorEvent::Added(wall_anchor(1, Vec3::ONE)));
        apply(&mut world, AnchorEvent::Added(wall_anchor(2, Vec3::ONE)));

        world
            .run_system_once(|mut engine: BevyArEngine| {
                engine.run_session(
                    TrackingConfig::vertical_planes(),
                    RunOptions {
                        remove_existing_anchors: true,
                    },
                )
            })
            .unwrap();

        assert_eq!(count::<With<AnchorNode>>(&mut world), 0);
        assert_eq!(count::<With<DetectedPlaneVisual>>(&mut world), 0);
        assert_eq!(world.resource::<AnchorNodes>().visual_count(), 0);
    }
}
