use super::Ray;
use crate::math::Vector3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BoundingBox {
    /// A degenerate placeholder box, used to pad BVH4 leaf slots and as the
    /// starting accumulator for `merge`.
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    pub fn new(min: Vector3, max: Vector3) -> BoundingBox {
        BoundingBox { min, max }
    }

    pub fn from_point(p: Vector3) -> BoundingBox {
        BoundingBox { min: p, max: p }
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn surface_area(&self) -> f32 {
        let e = self.extent();
        2.0 * (e.x * e.y + e.x * e.z + e.y * e.z)
    }

    /// The smallest box containing both `self` and `other`. Associative,
    /// commutative, and idempotent on equal inputs, which the BVH builder
    /// relies on when folding a leaf's shapes into its parent's box.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn include_point(&self, p: Vector3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.min.z >= self.min.z
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
            && other.max.z <= self.max.z
    }

    /// The index (0, 1, or 2) of the axis along which this box is longest,
    /// used by the BVH builder to choose a median-split axis.
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    /// Slab-method intersection. Returns the entry distance along the ray:
    /// `Some(t_min)` when the ray hits in front of its origin, `Some(0.0)`
    /// when the origin is inside the box, `None` when it misses. Using
    /// ordered `min`/`max` rather than comparisons means a `NaN` component
    /// anywhere in the ray never produces a false hit, since `NaN` always
    /// loses to a defined value under `f32::min`/`f32::max`.
    pub fn hit(&self, ray: &Ray) -> Option<f32> {
        let tx1 = (self.min.x - ray.origin.x) * ray.inv_dir.x;
        let tx2 = (self.max.x - ray.origin.x) * ray.inv_dir.x;
        let ty1 = (self.min.y - ray.origin.y) * ray.inv_dir.y;
        let ty2 = (self.max.y - ray.origin.y) * ray.inv_dir.y;
        let tz1 = (self.min.z - ray.origin.z) * ray.inv_dir.z;
        let tz2 = (self.max.z - ray.origin.z) * ray.inv_dir.z;

        let t_min = tx1.min(tx2).max(ty1.min(ty2)).max(tz1.min(tz2));
        let t_max = tx1.max(tx2).min(ty1.max(ty2)).min(tz1.max(tz2));

        if t_min > t_max || t_max < 0.0 {
            None
        } else if t_min >= 0.0 {
            Some(t_min)
        } else {
            Some(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_commutative() {
        let a = BoundingBox::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        let b = BoundingBox::new(Vector3::new(-1.0, 2.0, 0.0), Vector3::new(0.5, 3.0, 4.0));
        assert_eq!(a.merge(&b), b.merge(&a));
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let a = BoundingBox::new(Vector3::new(-1.0, -2.0, -3.0), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(a.merge(&BoundingBox::EMPTY), a);
    }

    #[test]
    fn hit_detects_ray_through_unit_cube() {
        let b = BoundingBox::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let t = b.hit(&ray).expect("ray should hit the box");
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn hit_misses_ray_past_the_box() {
        let b = BoundingBox::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        let ray = Ray::new(Vector3::new(10.0, 10.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(b.hit(&ray).is_none());
    }

    #[test]
    fn hit_from_inside_returns_zero() {
        let b = BoundingBox::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(b.hit(&ray), Some(0.0));
    }
}
