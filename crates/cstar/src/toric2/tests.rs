use super::*;
use crate::arith::{det2, rat, Rational};
use nalgebra::{vector, Vector2};
use num_integer::Integer;
use proptest::prelude::*;

#[test]
fn hirzebruch_jung_examples() {
    assert_eq!(hirzebruch_jung(5, 2), vec![3, 2]);
    assert_eq!(hirzebruch_jung(7, 3), vec![3, 2, 2]);
    assert_eq!(hirzebruch_jung(4, 3), vec![2, 2, 2]);
    assert_eq!(hirzebruch_jung(6, 1), vec![6]);
    assert!(hirzebruch_jung(1, 0).is_empty());
}

#[test]
fn hilbert_basis_of_seven_thirds() {
    let hb = hilbert_basis(7, 3);
    assert_eq!(hb, vec![vector![1, 0], vector![3, -1], vector![5, -2]]);
    // Consecutive cones are smooth, including the generators.
    let mut chain = vec![vector![0, 1]];
    chain.extend(hb);
    chain.push(vector![7, -3]);
    for w in chain.windows(2) {
        assert_eq!(det2(w[0], w[1]), -1);
    }
}

#[test]
fn normal_form_of_standard_cone() {
    let (v1, v2) = (vector![0, 1], vector![5, -2]);
    let nf = cone_normal_form(v1, v2).unwrap();
    assert_eq!((nf.d, nf.k), (5, 2));
    assert_eq!(nf.m * v1, vector![0, 1]);
    assert_eq!(nf.m * v2, vector![5, -2]);
    assert_eq!(nf.m_inv() * (nf.m * vector![3, 7]), vector![3, 7]);
}

#[test]
fn dependent_generators_have_no_cone() {
    let err = cone_normal_form(vector![1, 2], vector![-2, -4]).unwrap_err();
    assert!(matches!(err, crate::CStarError::NoUniqueCone { .. }));
    assert!(resolve_cone(vector![0, 0], vector![1, 0]).is_err());
}

#[test]
fn resolve_e6_arm() {
    // One arm of the E6 configuration: cone((0,1), (3,-2)).
    let res = resolve_cone(vector![0, 1], vector![3, -2]).unwrap();
    assert_eq!(res.rays, vec![vector![1, 0], vector![2, -1]]);
    assert_eq!(res.discrepancies, vec![rat(0, 1), rat(0, 1)]);
}

#[test]
fn resolve_non_canonical_cone() {
    let res = resolve_cone(vector![0, 1], vector![5, -2]).unwrap();
    assert_eq!(res.rays, vec![vector![1, 0], vector![3, -1]]);
    assert_eq!(res.discrepancies, vec![rat(-2, 5), rat(-1, 5)]);
}

#[test]
fn smooth_cone_inserts_nothing() {
    let res = resolve_cone(vector![1, 1], vector![1, 0]).unwrap();
    assert!(res.is_empty());
    assert!(res.discrepancies.is_empty());
}

#[test]
fn scaled_generators_keep_discrepancies() {
    let primitive = resolve_cone(vector![0, 1], vector![2, -1]).unwrap();
    let scaled = resolve_cone(vector![0, 2], vector![2, -1]).unwrap();
    assert_eq!(primitive, scaled);
    assert_eq!(scaled.rays, vec![vector![1, 0]]);
    assert_eq!(scaled.discrepancies, vec![rat(0, 1)]);
    assert_eq!(
        resolve_cone(vector![0, 3], vector![10, -4]).unwrap(),
        resolve_cone(vector![0, 1], vector![5, -2]).unwrap()
    );
}

/// `w = s·v1 + t·v2` ⇒ discrepancy `s + t − 1`.
fn barycentric_discrepancy(v1: Vector2<i64>, v2: Vector2<i64>, w: Vector2<i64>) -> Rational {
    let det = det2(v1, v2);
    let s = rat(det2(w, v2), det);
    let t = rat(det2(v1, w), det);
    s + t - rat(1, 1)
}

proptest! {
    #[test]
    fn resolution_matches_continued_fraction(
        x1 in -25i64..25, y1 in -25i64..25, x2 in -25i64..25, y2 in -25i64..25,
    ) {
        let (v1, v2) = (vector![x1, y1], vector![x2, y2]);
        prop_assume!(det2(v1, v2) != 0);
        let nf = cone_normal_form(v1, v2).unwrap();
        prop_assert!(nf.det().abs() == 1);
        prop_assert!(0 <= nf.k && nf.k < nf.d);
        let res = resolve_cone(v1, v2).unwrap();
        prop_assert_eq!(res.rays.len(), hirzebruch_jung(nf.d, nf.k).len());
        prop_assert_eq!(res.rays.is_empty(), nf.d == 1);

        let g1 = x1.gcd(&y1);
        let g2 = x2.gcd(&y2);
        let mut chain = vec![vector![x1 / g1, y1 / g1]];
        chain.extend(res.rays.iter().copied());
        chain.push(vector![x2 / g2, y2 / g2]);
        for w in chain.windows(2) {
            prop_assert_eq!(det2(w[0], w[1]).abs(), 1);
        }
        for (w, a) in res.rays.iter().zip(&res.discrepancies) {
            let (u1, u2) = (chain[0], chain[chain.len() - 1]);
            prop_assert_eq!(a, &barycentric_discrepancy(u1, u2, *w));
            prop_assert!(a > &rat(-1, 1));
        }
    }
}
