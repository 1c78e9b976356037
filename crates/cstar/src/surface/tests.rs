use super::*;
use crate::arith::{int, rat};
use crate::CStarError;
use nalgebra::dmatrix;
use num_integer::Integer;
use proptest::prelude::*;

fn e6() -> CStarSurface {
    CStarSurface::from_ld(
        &[vec![3, 1], vec![3], vec![2]],
        &[vec![-2, -1], vec![1], vec![1]],
        CStarSurfaceCase::Ee,
    )
    .unwrap()
}

fn p1xp1() -> CStarSurface {
    CStarSurface::new(
        vec![vec![Ray::new(1, 0)], vec![Ray::new(1, 0)]],
        CStarSurfaceCase::Pp,
    )
    .unwrap()
}

fn slot(block: usize, ray: usize) -> PrimeSlot {
    PrimeSlot::Ray { block, ray }
}

#[test]
fn slope_sums_and_l_sums() {
    let x = e6();
    assert_eq!(x.slope_sum(End::Plus), rat(1, 6));
    assert_eq!(x.slope_sum(End::Minus), rat(-1, 6));
    assert_eq!(x.l_sum(End::Plus), rat(1, 6));
    assert_eq!(x.l_sum(End::Minus), rat(5, 6));
    assert_eq!(x.nrays(), 4);
    assert_eq!(x.nprime_divisors(), 4);
    assert_eq!(p1xp1().nprime_divisors(), 4);
}

#[test]
fn validation_rejects_malformed_triples() {
    let r = |l, d| Ray::new(l, d);
    let ee = CStarSurfaceCase::Ee;
    assert_eq!(
        CStarSurface::new(vec![vec![r(1, 0)]], ee).unwrap_err(),
        CStarError::TooFewBlocks(1)
    );
    assert!(matches!(
        CStarSurface::new(vec![vec![r(1, 1)], vec![]], ee),
        Err(CStarError::EmptyBlock { block: 1 })
    ));
    assert!(matches!(
        CStarSurface::new(vec![vec![r(0, 1)], vec![r(1, 0)]], CStarSurfaceCase::Pp),
        Err(CStarError::NonPositiveL { block: 0, .. })
    ));
    assert!(matches!(
        CStarSurface::new(vec![vec![r(2, 4)], vec![r(1, 0)]], CStarSurfaceCase::Pp),
        Err(CStarError::NotCoprime { gcd: 2, .. })
    ));
    assert!(matches!(
        CStarSurface::new(vec![vec![r(1, -1), r(1, 0)], vec![r(1, 0)]], CStarSurfaceCase::Pp),
        Err(CStarError::UnsortedBlock { block: 0, ray: 1 })
    ));
    // m⁺ = 0 is not allowed at an elliptic plus end.
    assert!(matches!(
        CStarSurface::new(vec![vec![r(1, 0)], vec![r(1, 0)]], CStarSurfaceCase::Ep),
        Err(CStarError::InvalidSlopeSum { end: End::Plus, .. })
    ));
    assert!(matches!(
        CStarSurface::new(vec![vec![r(1, 1)], vec![r(1, 0)]], CStarSurfaceCase::Ee),
        Err(CStarError::InvalidSlopeSum { end: End::Minus, .. })
    ));
    let sorted =
        CStarSurface::from_unsorted(vec![vec![r(1, -1), r(3, -2)], vec![r(3, 1)], vec![r(2, 1)]], ee)
            .unwrap();
    assert_eq!(sorted, e6());
}

#[test]
fn case_tags() {
    use CStarSurfaceCase::*;
    assert_eq!(Pe.inverted(), Ep);
    assert_eq!(Pp.inverted(), Pp);
    assert_eq!(Ee.with_parabolic(End::Minus), Ep);
    assert_eq!(Ep.with_parabolic(End::Plus), Pp);
    assert_eq!(Pp.with_elliptic(End::Plus), Ep);
    assert_eq!("PE".parse::<CStarSurfaceCase>().unwrap(), Pe);
    assert!("xe".parse::<CStarSurfaceCase>().is_err());
    assert_eq!(Pp.apex_count(), 2);
}

#[test]
fn p_matrix_of_e6() {
    let x = e6();
    let p = x.p_matrix();
    assert_eq!(
        p,
        dmatrix![
            -3, -1, 3, 0;
            -3, -1, 0, 2;
            -2, -1, 1, 1
        ]
    );
    assert_eq!(
        x.extremal_columns(End::Plus),
        dmatrix![-3, 3, 0; -3, 0, 2; -2, 1, 1]
    );
    let back = CStarSurface::from_p_matrix(CStarSurfaceCase::Ee, &[2, 1, 1], &p).unwrap();
    assert_eq!(back, x);
}

#[test]
fn p_matrix_apex_columns() {
    let x = p1xp1();
    assert_eq!(x.p_matrix(), dmatrix![-1, 1, 0, 0; 0, 0, 1, -1]);
    let bad = dmatrix![-1, 1, 0, 0; 0, 0, 1, 1];
    assert!(matches!(
        CStarSurface::from_p_matrix(CStarSurfaceCase::Pp, &[1, 1], &bad),
        Err(CStarError::InvalidPMatrix(_))
    ));
    assert!(matches!(
        CStarSurface::from_p_matrix(CStarSurfaceCase::Pe, &[1, 1], &x.p_matrix()),
        Err(CStarError::BlockSizeMismatch { expected: 3, actual: 4 })
    ));
    // Block-2 column with a stray entry in the arm of block 1.
    let off_arm = dmatrix![-1, 1, 1, 0, 0; -1, 0, 1, 0, 0; 0, 0, 0, 1, -1];
    assert!(matches!(
        CStarSurface::from_p_matrix(CStarSurfaceCase::Pp, &[1, 1, 1], &off_arm),
        Err(CStarError::InvalidPMatrix(_))
    ));
}

#[test]
fn interchange_lines() {
    let x = e6();
    let line = x.to_line();
    assert_eq!(line, "ee;2,1,1;-3,-1,3,0,-3,-1,0,2,-2,-1,1,1");
    assert_eq!(line.parse::<CStarSurface>().unwrap(), x);
    assert_eq!(x.to_string(), line);
    assert_eq!(
        "PP;1,1;-1,1,0,0,0,0,1,-1".parse::<CStarSurface>().unwrap(),
        p1xp1()
    );
    for bad in ["ee;2,1,1", "zz;1,1;1,2", "ee;1,1;1,2,3", "ee;a,1;1,2"] {
        assert!(matches!(
            bad.parse::<CStarSurface>(),
            Err(CStarError::Parse(_))
        ), "{bad}");
    }
}

#[test]
fn serde_validates_on_the_way_in() {
    let x = e6();
    let json = serde_json::to_string(&x).unwrap();
    let back: CStarSurface = serde_json::from_str(&json).unwrap();
    assert_eq!(back, x);
    let bad = r#"{"blocks":[[{"l":2,"d":4}],[{"l":1,"d":0}]],"case":"Pp"}"#;
    assert!(serde_json::from_str::<CStarSurface>(bad).is_err());
}

#[test]
fn divisor_shapes() {
    let x = e6();
    let d = Divisor::prime(&x, slot(0, 1)).unwrap();
    assert!(d.is_prime());
    assert_eq!(d.prime_slot(), Some(slot(0, 1)));
    assert_eq!(d.coefficients(), vec![0, 1, 0, 0]);
    assert!(Divisor::prime(&x, slot(1, 1)).is_err());
    assert!(Divisor::prime(&x, PrimeSlot::Apex(End::Plus)).is_err());

    let sum = d.try_add(&Divisor::prime(&x, slot(2, 0)).unwrap()).unwrap();
    assert!(!sum.is_prime());
    assert!(!d.scale(2).is_prime());
    assert_eq!(sum.without_ray(0, 1).unwrap().coefficients(), vec![0, 0, 1]);

    let y = p1xp1();
    let e = Divisor::prime(&y, PrimeSlot::Apex(End::Minus)).unwrap();
    assert_eq!(e.coefficients(), vec![0, 0, 0, 1]);
    assert!(e.fits(&y) && !e.fits(&x));
    assert!(matches!(d.try_add(&e), Err(CStarError::ShapeMismatch(_))));
    assert!(e.without_apex(End::Minus).unwrap().minus.is_none());
    assert!(Divisor::zero(&x).without_apex(End::Plus).is_err());
    assert_eq!(y.slot_index(PrimeSlot::Apex(End::Minus)).unwrap(), 3);
    assert_eq!(
        Divisor::from_coefficients(&y, &[1, 2, 3, 4]).unwrap().minus,
        Some(4)
    );
}

#[test]
fn intersection_numbers_of_e6() {
    let x = e6();
    let m = x.intersection_matrix();
    assert_eq!(*m.self_intersection(slot(0, 0)).unwrap(), rat(1, 3));
    assert_eq!(*m.self_intersection(slot(0, 1)).unwrap(), int(3));
    assert_eq!(*m.self_intersection(slot(1, 0)).unwrap(), rat(4, 3));
    assert_eq!(*m.self_intersection(slot(2, 0)).unwrap(), int(3));
    assert_eq!(*m.get(slot(0, 0), slot(0, 1)).unwrap(), int(1));
    assert_eq!(*m.get(slot(0, 0), slot(1, 0)).unwrap(), rat(2, 3));
    assert_eq!(*m.get(slot(0, 1), slot(2, 0)).unwrap(), int(3));
    assert_eq!(*m.get(slot(1, 0), slot(2, 0)).unwrap(), int(2));
    assert!(!m.is_integral());
    // A cubic surface with an E6 point.
    assert_eq!(x.anticanonical_self_intersection(), int(3));
    assert_eq!(x.canonical_divisor().coefficients(), vec![2, 0, -1, -1]);
}

#[test]
fn intersection_numbers_of_p1xp1() {
    let x = p1xp1();
    let m = x.intersection_matrix();
    assert!(m.is_integral());
    let plus = PrimeSlot::Apex(End::Plus);
    let minus = PrimeSlot::Apex(End::Minus);
    assert_eq!(*m.get(plus, minus).unwrap(), int(0));
    assert_eq!(*m.get(plus, slot(1, 0)).unwrap(), int(1));
    assert_eq!(*m.self_intersection(slot(0, 0)).unwrap(), int(0));
    assert_eq!(x.anticanonical_self_intersection(), int(8));
    // Adjunction for the rational curve D⁺.
    let k = x.canonical_divisor();
    let d = Divisor::prime(&x, plus).unwrap();
    let lhs = x.intersect(&k, &d).unwrap() + x.intersect(&d, &d).unwrap();
    assert_eq!(lhs, int(-2));
    assert!(x.intersect(&k, &Divisor::zero(&e6())).is_err());
}

fn arb_surface() -> impl Strategy<Value = CStarSurface> {
    let ray = (1i64..5, -6i64..6);
    let block = prop::collection::vec(ray, 1..4);
    (
        prop::collection::vec(block, 2..5),
        prop::sample::select(vec![
            CStarSurfaceCase::Ee,
            CStarSurfaceCase::Pe,
            CStarSurfaceCase::Ep,
            CStarSurfaceCase::Pp,
        ]),
    )
        .prop_filter_map("invalid triple", |(blocks, case)| {
            let mut blocks: Vec<Vec<Ray>> = blocks
                .into_iter()
                .map(|b| {
                    b.into_iter()
                        .map(|(l, d)| {
                            let g = l.gcd(&d);
                            Ray::new(l / g, d / g)
                        })
                        .collect()
                })
                .collect();
            for b in &mut blocks {
                b.sort_by(|a, c| c.cmp_slope(a));
                b.dedup_by(|a, c| a.cmp_slope(c).is_eq());
            }
            CStarSurface::new(blocks, case).ok()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn intersection_matrix_is_symmetric(x in arb_surface()) {
        let m = x.intersection_matrix();
        prop_assert_eq!(m.matrix().clone(), m.matrix().transpose());
        prop_assert_eq!(m.len(), x.nprime_divisors());
    }

    #[test]
    fn principal_divisors_are_numerically_trivial(x in arb_surface()) {
        // Row u of P gives div(χ^u) = Σ_ρ ⟨u, v_ρ⟩ D_ρ.
        let p = x.p_matrix();
        let m = x.intersection_matrix();
        for row in 0..p.nrows() {
            let coeffs: Vec<i64> = p.row(row).iter().copied().collect();
            let div = Divisor::from_coefficients(&x, &coeffs).unwrap();
            for s in x.prime_slots() {
                let d = Divisor::prime(&x, s).unwrap();
                prop_assert_eq!(m.intersect(&div, &d).unwrap(), int(0));
            }
        }
    }

    #[test]
    fn interchange_line_roundtrip(x in arb_surface()) {
        let back: CStarSurface = x.to_line().parse().unwrap();
        prop_assert_eq!(back, x);
    }
}
