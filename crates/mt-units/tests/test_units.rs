//! Unit parsing, conversion, and dimension checks for `DimVar`.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use proptest::prelude::*;

use mt_core::Error;
use mt_uncertainty::{Uncertain, UncertainArray};
use mt_units::{BaseDimension, DimVar, Dimension, Reference, UnitEntry, UnitTable};

// ─── Conversion ───────────────────────────────────────────────────────────────

#[test]
fn pressure_round_trip() {
    let p = DimVar::new(1.0, "atm").unwrap();
    let pa = p.convert_to("pa").unwrap();
    assert_abs_diff_eq!(pa.magnitude(), 101_325.0, epsilon = 1e-9);
    let back = pa.convert_to("atm").unwrap();
    assert_abs_diff_eq!(back.magnitude(), 1.0, epsilon = 1e-12);
    assert_eq!(back.unit(), "atm");
}

#[test]
fn conversion_to_other_dimension_fails() {
    let p = DimVar::new(1.0, "atm").unwrap();
    let err = p.convert_to("m").unwrap_err();
    assert_eq!(
        err,
        Error::UnitMismatch {
            left: "kg/m-s^2".into(),
            right: "m".into(),
            op: "convert".into(),
        }
    );
}

#[test]
fn thermal_conductivity_conversion() {
    let k = DimVar::new(1.0, "BTU-in/hr-ft^2-F").unwrap();
    assert_relative_eq!(k.value_in("W/m-K").unwrap(), 0.144_227_9, max_relative = 1e-6);
}

// ─── Dimension checks ─────────────────────────────────────────────────────────

#[test]
fn adding_length_and_time_fails() {
    let m = DimVar::new(1.0, "m").unwrap();
    let s = DimVar::new(1.0, "s").unwrap();
    assert_eq!(
        (&m + &s).unwrap_err(),
        Error::UnitMismatch {
            left: "m".into(),
            right: "s".into(),
            op: "add".into(),
        }
    );
    assert!(matches!(&m - &s, Err(Error::UnitMismatch { .. })));
}

#[test]
fn exponent_with_units_fails() {
    let base = DimVar::new(2.0, "m").unwrap();
    let exponent = DimVar::new(1.0, "m").unwrap();
    assert_eq!(
        base.try_pow(&exponent).unwrap_err(),
        Error::NonDimensionlessExponent("m".into())
    );
}

#[test]
fn products_and_powers_combine_vectors() {
    let f = DimVar::new(10.0, "N").unwrap();
    let d = DimVar::new(2.0, "m").unwrap();
    let work = (&f * &d).unwrap();
    assert_eq!(work.dimension(), Dimension::new([1.0, 2.0, -2.0, 0.0, 0.0]));
    assert_abs_diff_eq!(work.value_in("J").unwrap(), 20.0);

    let v = DimVar::new(3.0, "m").unwrap().powf(3.0).unwrap();
    assert_eq!(v.unit(), "m^3");
    assert_abs_diff_eq!(v.value_in("L").unwrap(), 27_000.0, epsilon = 1e-6);

    let speed = (&d / &DimVar::new(4.0, "s").unwrap()).unwrap();
    assert_eq!(speed.unit(), "m/s");
}

// ─── Temperatures ─────────────────────────────────────────────────────────────

#[test]
fn kelvin_minus_fahrenheit() {
    let hot = DimVar::new(300.0, "K").unwrap();
    let cold = DimVar::new(0.0, "F").unwrap();
    assert_abs_diff_eq!(*cold.base_magnitude(), 255.372, epsilon = 1e-3);
    let diff = (&hot - &cold).unwrap();
    assert_abs_diff_eq!(*diff.base_magnitude(), 44.628, epsilon = 1e-3);
    assert_eq!(diff.unit(), "K");
    assert_eq!(diff.reference(), Reference::Relative);
    // A difference converts without the offset.
    assert_abs_diff_eq!(diff.value_in("F").unwrap(), 44.628 * 1.8, epsilon = 2e-3);
}

#[test]
fn celsius_round_trip() {
    let t = DimVar::new(-40.0, "C").unwrap();
    assert_abs_diff_eq!(t.value_in("F").unwrap(), -40.0, epsilon = 1e-9);
    assert_abs_diff_eq!(t.value_in("K").unwrap(), 233.15, epsilon = 1e-9);
}

// ─── Custom tables ────────────────────────────────────────────────────────────

#[test]
fn custom_table() {
    let table = UnitTable::builder()
        .with_standard_units()
        .unit("furlong", UnitEntry::linear(201.168, [0.0, 1.0, 0.0, 0.0, 0.0]))
        .unit("fortnight", UnitEntry::linear(1_209_600.0, [0.0, 0.0, 1.0, 0.0, 0.0]))
        .build();
    let v = DimVar::with_table(1.0, "furlong/fortnight", Reference::Absolute, &table).unwrap();
    assert_relative_eq!(*v.base_magnitude(), 201.168 / 1_209_600.0, max_relative = 1e-12);
    assert_relative_eq!(v.value_in("mm/min").unwrap(), 9.978_571, max_relative = 1e-6);
    assert!(matches!(DimVar::new(1.0, "furlong"), Err(Error::UnknownUnit(_))));
}

// ─── Composition with uncertainty values ──────────────────────────────────────

#[test]
fn uncertain_magnitude_converts_and_propagates() {
    let len = DimVar::uncertain(10.0, 0.5, "L", "ft").unwrap();
    let width = DimVar::uncertain(4.0, 0.2, "W", "ft").unwrap();
    let area = (&len * &width).unwrap();
    assert_eq!(area.dimension(), Dimension::base(BaseDimension::Length).powf(2.0));

    let in_ft2 = area.value_in("ft^2").unwrap();
    assert_abs_diff_eq!(in_ft2.value(), 40.0, epsilon = 1e-9);
    let expected = ((4.0_f64 * 0.5).powi(2) + (10.0_f64 * 0.2).powi(2)).sqrt();
    assert_abs_diff_eq!(in_ft2.uncertainty(), expected, epsilon = 1e-9);
    assert_abs_diff_eq!(in_ft2.contributions().get("L").unwrap(), 0.5, epsilon = 1e-12);
}

#[test]
fn same_uncertain_quantity_cancels_after_conversion() {
    let x = DimVar::uncertain(3.0, 0.1, "x", "in").unwrap();
    let y = x.convert_to("cm").unwrap();
    let d = (&x - &y).unwrap();
    assert_abs_diff_eq!(d.base_magnitude().value(), 0.0);
    assert_abs_diff_eq!(d.base_magnitude().uncertainty(), 0.0);
}

#[test]
fn uncertain_exponent() {
    let base = DimVar::new(Uncertain::named(2.0, 0.1, "b"), "m").unwrap();
    let exponent = DimVar::dimensionless(Uncertain::constant(2.0));
    let sq = base.try_pow(&exponent).unwrap();
    assert_eq!(sq.unit(), "m^2");
    assert_abs_diff_eq!(sq.base_magnitude().uncertainty(), 0.4, epsilon = 1e-12);
}

#[test]
fn array_magnitudes_broadcast() {
    let xs = UncertainArray::new(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1], Some("x")).unwrap();
    let lengths = DimVar::new(xs, "km").unwrap();
    let offset = DimVar::new(UncertainArray::scalar(Uncertain::new(500.0, 1.0)), "m").unwrap();
    let total = (&lengths + &offset).unwrap();
    assert_eq!(total.base_magnitude().values(), vec![1500.0, 2500.0, 3500.0]);

    let short = DimVar::new(
        UncertainArray::new(&[1.0, 2.0], &[0.0, 0.0], None).unwrap(),
        "m",
    )
    .unwrap();
    assert!(matches!(&lengths + &short, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn display_with_uncertainty() {
    let x = DimVar::new(Uncertain::new(1.5, 0.25), "m").unwrap();
    assert_eq!(x.to_string(), "1.5 ± 0.25 [m]");
}

// ─── Properties ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn conversion_round_trip(
        value in -1.0e6f64..1.0e6,
        pair in prop::sample::select(vec![
            ("atm", "psi"), ("ft", "m"), ("BTU", "kJ"), ("C", "F"),
            ("lbf", "N"), ("gal", "L"), ("hp", "kW"), ("mi/hr", "m/s"),
        ]),
    ) {
        let (from, to) = pair;
        let x = DimVar::new(value, from).unwrap();
        let back = x.convert_to(to).unwrap().convert_to(from).unwrap();
        prop_assert!((back.magnitude() - value).abs() <= 1e-9 * (1.0 + value.abs()));
    }
}
