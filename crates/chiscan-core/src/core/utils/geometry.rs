use nalgebra::Point3;

const DEGENERACY_EPSILON: f64 = 1e-12;

/// Computes the proper dihedral (torsion) angle defined by four points, in degrees.
///
/// The result lies in `(-180, 180]` and follows the IUPAC sign convention:
/// looking along the `p2 -> p3` bond, a clockwise rotation carrying the
/// `p1` projection onto the `p4` projection is positive. The order of the
/// points therefore matters; reversing it keeps the value, permuting it does not.
///
/// Returns `None` when either of the two planes is undefined, i.e. when three
/// consecutive points are collinear or two consecutive points coincide.
pub fn dihedral_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> Option<f64> {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let b2_norm = b2.norm();

    if n1.norm_squared() < DEGENERACY_EPSILON
        || n2.norm_squared() < DEGENERACY_EPSILON
        || b2_norm < DEGENERACY_EPSILON
    {
        return None;
    }

    let y = b2_norm * b1.dot(&n2);
    let x = n1.dot(&n2);
    let angle = y.atan2(x).to_degrees();

    // atan2 yields -180 for the anti-periplanar case approached from below.
    if angle <= -180.0 { Some(180.0) } else { Some(angle) }
}
