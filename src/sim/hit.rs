//! Ray hit-testing against targets
//!
//! Targets are spheres of radius `LevelConfig::target_size`.

use glam::Vec3;

use super::target::{Target, TargetId};

/// A view ray (direction is normalized on construction)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    /// Ray from `origin` through `point`
    pub fn towards(origin: Vec3, point: Vec3) -> Self {
        Self::new(origin, point - origin)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Result of a hit-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub target: TargetId,
    /// Distance along the ray to the entry point
    pub distance: f32,
}

/// Distance along `ray` to a sphere, if it is hit in front of the origin
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    if ray.dir == Vec3::ZERO {
        return None;
    }

    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_d = disc.sqrt();
    let near = -b - sqrt_d;
    let far = -b + sqrt_d;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        // Origin inside the sphere
        Some(0.0)
    } else {
        None
    }
}

/// Nearest target on the ray
pub fn nearest_hit(ray: &Ray, targets: &[Target], radius: f32) -> Option<RayHit> {
    targets
        .iter()
        .filter_map(|t| {
            ray_sphere(ray, t.pos, radius).map(|distance| RayHit {
                target: t.id,
                distance,
            })
        })
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_at(id: u32, pos: Vec3) -> Target {
        Target {
            id: TargetId(id),
            pos,
            speed: 0.1,
            rotation: Vec3::ZERO,
            hit_flash: 0.0,
        }
    }

    #[test]
    fn test_ray_sphere_hit_and_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let d = ray_sphere(&ray, Vec3::new(0.0, 0.0, -10.0), 1.0).unwrap();
        assert!((d - 9.0).abs() < 1e-5);

        assert!(ray_sphere(&ray, Vec3::new(2.0, 0.0, -10.0), 1.0).is_none());
        // Behind the origin
        assert!(ray_sphere(&ray, Vec3::new(0.0, 0.0, 10.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_inside_sphere() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray_sphere(&ray, Vec3::ZERO, 1.0), Some(0.0));
    }

    #[test]
    fn test_degenerate_ray() {
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(ray_sphere(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn test_nearest_hit_picks_closest() {
        let targets = vec![
            target_at(1, Vec3::new(0.0, 0.0, -30.0)),
            target_at(2, Vec3::new(0.0, 0.0, -12.0)),
            target_at(3, Vec3::new(5.0, 0.0, -5.0)),
        ];
        let ray = Ray::towards(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = nearest_hit(&ray, &targets, 1.0).unwrap();
        assert_eq!(hit.target, TargetId(2));
        assert!((ray.at(hit.distance).z - (-11.0)).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_hit_none() {
        let targets = vec![target_at(1, Vec3::new(10.0, 0.0, -30.0))];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(nearest_hit(&ray, &targets, 1.0).is_none());
        assert!(nearest_hit(&ray, &[], 1.0).is_none());
    }
}
