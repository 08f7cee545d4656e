//! Centripetal Catmull-Rom curves through sampled points
//!
//! A [`Curve`] interpolates an ordered list of control points. Two
//! parameterisations are exposed:
//! - `point(t)` spaces the control points uniformly over `t` in [0, 1]
//! - `point_at(u)` walks the curve by arc length, so equal steps of `u`
//!   cover equal distances along the curve
//!
//! Tube sweeping uses the arc-length form so rings are evenly spaced.

use glam::Vec3;

use crate::error::SceneError;

/// Number of chords used to approximate arc length
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Step used for numeric tangents
const TANGENT_DELTA: f32 = 0.0001;

/// Open centripetal Catmull-Rom spline
#[derive(Debug, Clone)]
pub struct Curve {
    points: Vec<Vec3>,
    /// Cumulative chord lengths, `ARC_LENGTH_DIVISIONS + 1` entries
    lengths: Vec<f32>,
}

/// Cubic `c0 + c1 t + c2 t^2 + c3 t^3` for one axis of one span
struct CubicPoly {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl CubicPoly {
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Non-uniform Catmull-Rom span between `x1` and `x2`
    fn nonuniform(x0: f32, x1: f32, x2: f32, x3: f32, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let mut t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let mut t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        t1 *= dt1;
        t2 *= dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

impl Curve {
    /// Build a curve through `points`. Fails with fewer than two points.
    pub fn new(points: Vec<Vec3>) -> Result<Self, SceneError> {
        if points.len() < 2 {
            return Err(SceneError::InvalidCurve(points.len()));
        }

        let mut curve = Self {
            points,
            lengths: Vec::new(),
        };
        curve.lengths = curve.compute_lengths();
        Ok(curve)
    }

    /// Approximate total arc length
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at uniform parameter `t` in [0, 1]
    pub fn point(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let l = points.len();
        let t = t.clamp(0.0, 1.0);

        let p = (l - 1) as f32 * t;
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f32;

        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }

        // Endpoints get mirrored phantom neighbours
        let p0 = if int_point > 0 {
            points[int_point - 1]
        } else {
            points[0] * 2.0 - points[1]
        };
        let p1 = points[int_point];
        let p2 = points[int_point + 1];
        let p3 = if int_point + 2 < l {
            points[int_point + 2]
        } else {
            points[l - 1] * 2.0 - points[l - 2]
        };

        // Centripetal: knot spacing is the square root of chord length
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);

        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let px = CubicPoly::nonuniform(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2);
        let py = CubicPoly::nonuniform(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2);
        let pz = CubicPoly::nonuniform(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2);

        Vec3::new(px.eval(weight), py.eval(weight), pz.eval(weight))
    }

    /// Point at arc-length fraction `u` in [0, 1]
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at arc-length fraction `u`
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let t = self.u_to_t(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or_zero()
    }

    /// Map an arc-length fraction to the uniform parameter
    pub fn u_to_t(&self, u: f32) -> f32 {
        let lengths = &self.lengths;
        let total = self.length();
        if total <= f32::EPSILON {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;

        // First index whose cumulative length is >= target
        let i = lengths.partition_point(|&len| len < target).max(1);
        let i = i.min(lengths.len() - 1);

        let before = lengths[i - 1];
        let after = lengths[i];
        let segment = after - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };

        (i as f32 - 1.0 + fraction) / (lengths.len() - 1) as f32
    }

    fn compute_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);

        for d in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(d as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }

        lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_single_point() {
        let result = Curve::new(vec![Vec3::ZERO]);
        assert!(matches!(result, Err(SceneError::InvalidCurve(1))));
    }

    #[test]
    fn test_passes_through_control_points() {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 1.0, 0.0),
        ];
        let curve = Curve::new(points.clone()).unwrap();

        for (i, expected) in points.iter().enumerate() {
            let t = i as f32 / (points.len() - 1) as f32;
            assert!(curve.point(t).distance(*expected) < 1e-4, "point {i}");
        }
    }

    #[test]
    fn test_straight_line_arc_length() {
        let curve = Curve::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]).unwrap();

        assert!((curve.length() - 4.0).abs() < 1e-3);
        assert!((curve.point_at(0.25).x - 1.0).abs() < 1e-2);
        assert!(curve.tangent_at(0.5).distance(Vec3::X) < 1e-4);
    }

    #[test]
    fn test_u_to_t_endpoints() {
        let curve = Curve::new(vec![
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(5.0, 2.0, 1.0),
        ])
        .unwrap();

        assert!(curve.u_to_t(0.0).abs() < 1e-6);
        assert!((curve.u_to_t(1.0) - 1.0).abs() < 1e-6);
    }
}
