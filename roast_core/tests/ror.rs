use roast_core::ror::{self, FitError};

#[test]
fn two_points_fall_back_to_a_usable_line() {
    let ror = ror::fit(&[0.0, 1.0], &[20.0, 21.0]).expect("fallback fit");
    assert!((ror.at(0.5) - 1.0).abs() < 1e-9);
    assert_eq!(ror.domain(), (0.0, 1.0));
}

#[test]
fn three_points_fall_back_to_an_exact_parabola() {
    // Degree min(4, n-1) = 2 through three points reproduces the quadratic.
    let ror = ror::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).expect("fallback fit");
    assert!((ror.at(1.0) - 2.0).abs() < 1e-9);
}

#[test]
fn quadratic_ramp_derivative_is_exact() {
    let time: Vec<f64> = (0..10).map(f64::from).collect();
    let hot: Vec<f64> = time.iter().map(|t| t * t).collect();
    let ror = ror::fit(&time, &hot).expect("interpolating fit");
    for &t in &[1.0, 3.0, 5.5, 8.0] {
        assert!((ror.at(t) - 2.0 * t).abs() < 1e-6, "t={t}");
    }
}

#[test]
fn five_points_use_the_interpolating_path() {
    // A cubic lies inside the quartic space, so five samples already give
    // the exact derivative.
    let time: Vec<f64> = (0..5).map(f64::from).collect();
    let hot: Vec<f64> = time.iter().map(|t| t.powi(3)).collect();
    let ror = ror::fit(&time, &hot).expect("interpolating fit");
    assert!((ror.at(2.0) - 12.0).abs() < 1e-6);
}

#[test]
fn evaluation_is_clamped_to_the_sample_domain() {
    let time: Vec<f64> = (0..10).map(f64::from).collect();
    let hot: Vec<f64> = time.iter().map(|t| 20.0 + 3.0 * t).collect();
    let ror = ror::fit(&time, &hot).expect("fit");
    assert_eq!(ror.at(-100.0).to_bits(), ror.at(0.0).to_bits());
    assert_eq!(ror.at(1e9).to_bits(), ror.at(9.0).to_bits());
}

#[test]
fn rejects_fewer_than_two_samples() {
    assert!(matches!(
        ror::fit(&[0.0], &[20.0]),
        Err(FitError::TooFewSamples(1))
    ));
    assert!(matches!(ror::fit(&[], &[]), Err(FitError::TooFewSamples(0))));
}

#[test]
fn rejects_mismatched_lengths() {
    assert!(matches!(
        ror::fit(&[0.0, 1.0], &[20.0]),
        Err(FitError::LengthMismatch { time: 2, temp: 1 })
    ));
}

#[test]
fn rejects_non_monotonic_time() {
    assert!(matches!(
        ror::fit(&[0.0, 1.0, 1.0], &[20.0, 21.0, 22.0]),
        Err(FitError::NonMonotonicTime(2))
    ));
    assert!(matches!(
        ror::fit(&[0.0, 2.0, 1.0], &[20.0, 21.0, 22.0]),
        Err(FitError::NonMonotonicTime(2))
    ));
}

#[test]
fn rejects_non_finite_samples() {
    assert!(matches!(
        ror::fit(&[0.0, 1.0], &[20.0, f64::NAN]),
        Err(FitError::NonFinite(1))
    ));
}
