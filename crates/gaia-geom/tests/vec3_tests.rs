use gaia_geom::{Aabb, Mat4, Quat, Transform, Vec3};
use proptest::prelude::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vapprox(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps)
}

fn unit_range() -> impl Strategy<Value = f32> {
    -100.0f32..100.0
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (unit_range(), unit_range(), unit_range()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

#[test]
fn normalized_zero_is_noop() {
    let z = Vec3::ZERO.normalized();
    assert!(vapprox(z, Vec3::ZERO, 1e-6));
    assert!(!z.x.is_nan());
}

#[test]
fn normalized_three_four_five() {
    let n = Vec3::new(3.0, 4.0, 0.0).normalized();
    assert!(vapprox(n, Vec3::new(0.6, 0.8, 0.0), 1e-6));
}

#[test]
fn neg_and_lerp() {
    let a = Vec3::new(1.0, -2.0, 3.0);
    assert!(vapprox(-a, Vec3::new(-1.0, 2.0, -3.0), 1e-6));
    let b = Vec3::new(3.0, 2.0, 1.0);
    assert!(vapprox(a.lerp(b, 0.5), Vec3::new(2.0, 0.0, 2.0), 1e-6));
}

#[test]
fn aabb_center_and_extent() {
    let bb = Aabb::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 6.0));
    assert!(vapprox(bb.center(), Vec3::new(1.0, 2.0, 4.0), 1e-6));
    assert!(vapprox(bb.extent(), Vec3::new(4.0, 4.0, 4.0), 1e-6));
}

#[test]
fn identity_matrix_is_noop() {
    let p = Vec3::new(0.25, -7.0, 13.5);
    assert!(vapprox(Mat4::IDENTITY.transform_point(p), p, 1e-6));
    assert!(vapprox(Transform::IDENTITY.transform_point(p), p, 1e-6));
}

#[test]
fn scale_then_translate() {
    let t = Transform {
        translation: Vec3::new(1.0, 2.0, 3.0),
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(0.5),
    };
    let p = t.to_mat4().transform_point(Vec3::new(2.0, 2.0, 2.0));
    assert!(vapprox(p, Vec3::new(2.0, 3.0, 4.0), 1e-6));
}

proptest! {
    // Composed matrices apply right-to-left
    #[test]
    fn mat_mul_composes(p in arb_vec3(), ry in -3.0f32..3.0, s in 0.1f32..4.0) {
        let a = Transform { rotation: Quat::from_euler_xyz(0.0, ry, 0.0), ..Transform::IDENTITY }.to_mat4();
        let b = Transform::from_scale(s).to_mat4();
        let lhs = a.mul_mat(&b).transform_point(p);
        let rhs = a.transform_point(b.transform_point(p));
        prop_assert!(vapprox(lhs, rhs, 1e-3));
    }

    // Cross product is orthogonal to its operands
    #[test]
    fn cross_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        let scale = a.length() * b.length() * (a.length() + b.length()) + 1.0;
        prop_assert!(a.dot(c).abs() <= 1e-5 * scale);
        prop_assert!(b.dot(c).abs() <= 1e-5 * scale);
    }

    // Vectors without translation ignore the translation column
    #[test]
    fn vectors_ignore_translation(v in arb_vec3(), t in arb_vec3()) {
        let m = Mat4::from_trs(t, Quat::IDENTITY, Vec3::ONE);
        prop_assert!(vapprox(m.transform_vector(v), v, 1e-4));
    }
}
