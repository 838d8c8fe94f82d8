use approx::assert_abs_diff_eq;
use num_complex::Complex64 as C64;
use proptest::prelude::*;
use latspace::{
    algebra,
    Boundary,
    LatticeError,
    LatticeField,
    Shift,
    WaveType,
    WfInfo,
};

fn field(extents: &[usize], boundary: Boundary, amps: &[(f64, f64)])
    -> LatticeField
{
    let info = WfInfo::new(extents, boundary, WaveType::Custom).unwrap();
    let data: Vec<C64> = amps.iter().map(|&(re, im)| C64::new(re, im)).collect();
    LatticeField::from_vec(info, data).unwrap()
}

/// Two fields of the same random 1D or 2D shape.
fn field_pair() -> impl Strategy<Value = (Vec<usize>, Vec<(f64, f64)>, Vec<(f64, f64)>)> {
    prop::collection::vec(1_usize..7, 1..=2)
        .prop_flat_map(|extents| {
            let n: usize = extents.iter().product();
            let amp = (-10.0_f64..10.0, -10.0_f64..10.0);
            (
                Just(extents),
                prop::collection::vec(amp.clone(), n),
                prop::collection::vec(amp, n),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, .. ProptestConfig::default()
    })]

    #[test]
    fn add_then_sub_is_identity((ext, a, b) in field_pair()) {
        let a = field(&ext, Boundary::Open, &a);
        let b = field(&ext, Boundary::Open, &b);
        let c = a.add_field(&b).unwrap().sub_field(&b).unwrap();
        prop_assert!(c.max_abs_diff(&a).unwrap() < 1e-12);
    }

    #[test]
    fn scale_then_divide_is_identity(
        (ext, a, _b) in field_pair(),
        sr in 0.1_f64..5.0,
        si in -5.0_f64..5.0,
    ) {
        let a = field(&ext, Boundary::Open, &a);
        let s = C64::new(sr, si);
        let c = a.scale(s).div_scalar(s);
        prop_assert!(c.max_abs_diff(&a).unwrap() < 1e-12);
    }

    #[test]
    fn double_conjugate_is_identity((ext, a, _b) in field_pair()) {
        let a = field(&ext, Boundary::Periodic, &a);
        let c = a.conjugate().conjugate();
        prop_assert_eq!(c.as_slice(), a.as_slice());
    }

    #[test]
    fn periodic_shift_roundtrip((ext, a, _b) in field_pair(), step in -3_isize..=3) {
        let a = field(&ext, Boundary::Periodic, &a);
        for axis in 0..ext.len() {
            let s = Shift { axis, step };
            let back = a.shift(s).unwrap().shift(s.reversed()).unwrap();
            prop_assert_eq!(back.as_slice(), a.as_slice());
        }
    }

    #[test]
    fn normalized_has_unit_norm((ext, a, _b) in field_pair()) {
        let a = field(&ext, Boundary::Open, &a);
        prop_assume!(a.norm() > 1e-6);
        let n = a.normalized().unwrap();
        prop_assert!((n.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn norm_matches_self_dot((ext, a, _b) in field_pair()) {
        let a = field(&ext, Boundary::Open, &a);
        let d = a.dot(&a).unwrap();
        prop_assert!((d.re - a.norm()).abs() <= 1e-12 * a.norm().max(1.0));
        prop_assert!(d.im.abs() <= 1e-9);
    }

    #[test]
    fn chunking_is_invisible((ext, a, b) in field_pair(), chunks in 1_usize..10) {
        let a = field(&ext, Boundary::Periodic, &a);
        let b = field(&ext, Boundary::Periodic, &b);
        let one = algebra::mul(&a.clone().with_partition(1), &b).unwrap();
        let many = algebra::mul(&a.clone().with_partition(chunks), &b).unwrap();
        prop_assert_eq!(one.as_slice(), many.as_slice());
    }
}

#[test]
fn four_plus_six_fails() {
    let a = LatticeField::zeros([4], Boundary::Open, WaveType::Custom).unwrap();
    let b = LatticeField::zeros([6], Boundary::Open, WaveType::Custom).unwrap();
    assert!(matches!(
        algebra::add(&a, &b),
        Err(LatticeError::DimensionMismatch(_)),
    ));
}

#[test]
fn zero_field_cannot_normalize() {
    let z = LatticeField::zeros([3, 3], Boundary::Open, WaveType::Custom)
        .unwrap();
    assert!(matches!(z.normalized(), Err(LatticeError::DegenerateField(_))));
}

#[test]
fn mixed_scalar_operands() {
    let mut a = LatticeField::zeros([2], Boundary::Open, WaveType::Custom)
        .unwrap();
    a.set(&[0], C64::new(1.0, 1.0)).unwrap();
    let r = a.add_scalar(2.0);
    let c = a.add_scalar(C64::new(0.0, 2.0));
    assert_abs_diff_eq!(r.get(&[0]).unwrap().re, 3.0);
    assert_abs_diff_eq!(c.get(&[0]).unwrap().im, 3.0);
    assert_abs_diff_eq!(a.sub_scalar(1.0).get(&[1]).unwrap().re, -1.0);
    let d = a.div_scalar(0.0);
    assert!(d.get(&[0]).unwrap().re.is_nan() || d.get(&[0]).unwrap().re.is_infinite());
}

#[test]
fn reductions_are_reproducible_in_a_pool() {
    let info = WfInfo::new([64, 48], Boundary::Periodic, WaveType::Custom)
        .unwrap();
    let data: Vec<C64>
        = (0..64 * 48)
        .map(|k| C64::new((k as f64 * 0.37).sin(), (k as f64 * 0.11).cos()))
        .collect();
    let a = LatticeField::from_vec(info, data).unwrap().with_partition(12);
    let workers = latspace::Workers::new(4).unwrap();
    let first = workers.install(|| a.norm());
    for _ in 0..8 {
        assert_eq!(workers.install(|| a.norm()).to_bits(), first.to_bits());
        assert_eq!(a.norm().to_bits(), first.to_bits());
    }
}
