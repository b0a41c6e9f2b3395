//! Ray tests against tracked plane extents.

use crate::basketball3d::types::{HitTestResult, PlaneAnchor, Ray};
use bevy::prelude::*;

/// Intersect `ray` with the current extent rectangle of each anchor and return
/// the nearest hit in front of the ray origin.
pub fn hit_test_planes<'a>(
    ray: &Ray,
    anchors: impl IntoIterator<Item = &'a PlaneAnchor>,
) -> Option<HitTestResult> {
    anchors
        .into_iter()
        .filter_map(|anchor| hit_anchor(ray, anchor))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

fn hit_anchor(ray: &Ray, anchor: &PlaneAnchor) -> Option<HitTestResult> {
    let normal = anchor.normal();
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let distance = (anchor.world_center() - ray.origin).dot(normal) / denom;
    if distance < 0.0 {
        return None;
    }

    let point = ray.at(distance);
    let local = anchor.transform.inverse().transform_point3(point);
    let offset = local - anchor.center;
    if offset.x.abs() > anchor.extent.x * 0.5 || offset.z.abs() > anchor.extent.z * 0.5 {
        return None;
    }

    let (_, rotation, _) = anchor.transform.to_scale_rotation_translation();
    Some(HitTestResult {
        world_transform: Mat4::from_rotation_translation(rotation, point),
        distance,
        anchor: anchor.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basketball3d::types::{plane_frame, AnchorId, PlaneAlignment};

    fn wall(id: u64, z: f32, extent: f32) -> PlaneAnchor {
        PlaneAnchor {
            id: AnchorId(id),
            alignment: PlaneAlignment::Vertical,
            transform: plane_frame(Vec3::new(0.0, 1.5, z), Vec3::Z),
            center: Vec3::ZERO,
            extent: Vec3::new(extent, 0.0, extent),
        }
    }

    #[test]
    fn test_hit_inside_extent() {
        let anchors = [wall(1, -3.0, 2.0)];
        let ray = Ray::new(Vec3::new(0.2, 1.6, 0.0), Vec3::NEG_Z);
        let hit = hit_test_planes(&ray, &anchors).unwrap();

        assert_eq!(hit.anchor.id, AnchorId(1));
        assert!((hit.distance - 3.0).abs() < 1e-4);
        let position = hit.world_transform.w_axis.truncate();
        assert!(position.abs_diff_eq(Vec3::new(0.2, 1.6, -3.0), 1e-4));
        // Orientation is the anchor's.
        assert!(hit.world_transform.y_axis.truncate().abs_diff_eq(Vec3::Z, 1e-4));
    }

    #[test]
    fn test_miss_outside_extent() {
        let anchors = [wall(1, -3.0, 0.5)];
        let ray = Ray::new(Vec3::new(1.0, 1.5, 0.0), Vec3::NEG_Z);
        assert!(hit_test_planes(&ray, &anchors).is_none());
    }

    #[test]
    fn test_extent_follows_center_offset() {
        let mut anchor = wall(1, -3.0, 0.5);
        anchor.center = Vec3::new(1.0, 0.0, 0.0);
        let ray = Ray::new(Vec3::new(1.0, 1.5, 0.0), Vec3::NEG_Z);
        assert!(hit_test_planes(&ray, &[anchor]).is_some());
    }

    #[test]
    fn test_nearest_hit_wins() {
        let anchors = [wall(1, -5.0, 2.0), wall(2, -2.0, 2.0)];
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_Z);
        assert_eq!(hit_test_planes(&ray, &anchors).unwrap().anchor.id, AnchorId(2));
    }

    #[test]
    fn test_planes_behind_the_ray_are_ignored() {
        let anchors = [wall(1, 3.0, 2.0)];
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_Z);
        assert!(hit_test_planes(&ray, &anchors).is_none());
    }
}
