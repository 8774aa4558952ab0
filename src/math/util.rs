use super::{Point2d, Vector2d};

/// Rotates a vector 90 degrees towards the positive y-axis.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// Gets the unit vector pointing in the direction of `angle` radians.
pub fn unit_vector(angle: f64) -> Vector2d {
    Vector2d::new(angle.cos(), angle.sin())
}

/// Finds the intersection of two lines, each given by a point and a direction.
/// Returns `None` if the lines are (nearly) parallel.
pub fn intersect_lines(p1: Point2d, d1: Vector2d, p2: Point2d, d2: Vector2d) -> Option<Point2d> {
    let denom = d1.perp_dot(d2);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (p2 - p1).perp_dot(d2) / denom;
    Some(p1 + d1 * t)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn rot90_is_left_normal() {
        let n = rot90(Vector2d::new(1.0, 0.0));
        assert_approx_eq!(n.x, 0.0);
        assert_approx_eq!(n.y, 1.0);
    }

    #[test]
    fn line_intersection() {
        let p = intersect_lines(
            Point2d::new(0.0, 0.0),
            Vector2d::new(1.0, 0.0),
            Point2d::new(5.0, -3.0),
            Vector2d::new(0.0, 1.0),
        )
        .unwrap();
        assert_approx_eq!(p.x, 5.0);
        assert_approx_eq!(p.y, 0.0);

        let parallel = intersect_lines(
            Point2d::new(0.0, 0.0),
            Vector2d::new(1.0, 0.0),
            Point2d::new(0.0, 1.0),
            Vector2d::new(2.0, 0.0),
        );
        assert!(parallel.is_none());
    }
}
