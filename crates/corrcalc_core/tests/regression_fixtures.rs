//! Fixed datasets with known coefficients.
//!
//! Expected values were computed independently in double precision; the
//! engine must agree to 8 decimal places, or exactly where the coefficient is
//! a rational number with an exact square-root denominator.

use corrcalc_core::{
    calculate, rank, CorrelationEngine, CorrelationError, EngineConfig, KendallVariant, Number,
    PairCounting, PairCounts,
};

const DECIMAL_PLACES: i32 = 8;

fn round(value: f64) -> f64 {
    let scale = 10f64.powi(DECIMAL_PLACES);
    (value * scale).round() / scale
}

fn numbers(values: &[i32]) -> Vec<Number> {
    values.iter().map(|&v| Number::from_num(v)).collect()
}

fn ascending() -> Vec<Number> {
    numbers(&(1..=10).collect::<Vec<_>>())
}

fn descending() -> Vec<Number> {
    numbers(&(1..=10).rev().collect::<Vec<_>>())
}

/// 1..10 against 10..1, then four extra pairs that introduce ties in both columns.
fn duplicates() -> (Vec<Number>, Vec<Number>) {
    let mut x = ascending();
    let mut y = descending();
    x.extend(numbers(&[2, 7, 1, 11]));
    y.extend(numbers(&[5, 3, 11, 6]));
    (x, y)
}

#[test]
fn perfectly_correlated_columns() {
    let result = calculate("A", &ascending(), "B", &ascending()).unwrap();
    assert_eq!(round(result.pearson.to_num()), 1.0);
    assert_eq!(round(result.spearman.to_num()), 1.0);
    assert_eq!(round(result.kendall.to_num()), 1.0);
}

#[test]
fn anti_correlated_columns() {
    let result = calculate("A", &ascending(), "B", &descending()).unwrap();
    assert_eq!(round(result.pearson.to_num()), -1.0);
    assert_eq!(round(result.spearman.to_num()), -1.0);
    assert_eq!(round(result.kendall.to_num()), -1.0);
}

#[test]
fn ranks_with_duplicates() {
    let (x, y) = duplicates();
    let x_ranks: Vec<f64> = rank(&x).iter().map(|d| d.rank.to_num::<f64>()).collect();
    let y_ranks: Vec<f64> = rank(&y).iter().map(|d| d.rank.to_num::<f64>()).collect();
    assert_eq!(
        x_ranks,
        vec![1.5, 3.5, 5.0, 6.0, 7.0, 8.0, 9.5, 11.0, 12.0, 13.0, 3.5, 9.5, 1.5, 14.0]
    );
    assert_eq!(
        y_ranks,
        vec![13.0, 12.0, 11.0, 10.0, 8.5, 6.5, 5.0, 3.5, 2.0, 1.0, 6.5, 3.5, 14.0, 8.5]
    );
}

#[test]
fn kendall_tau_b_with_duplicates() {
    let (x, y) = duplicates();
    let counts = PairCounts::pairwise(&rank(&x), &rank(&y));
    assert_eq!(counts.total, 91);
    assert_eq!(counts.tied_x, 3);
    assert_eq!(counts.tied_y, 3);
    assert_eq!(counts.score(), -65);

    // -65 / sqrt((91 - 3) * (91 - 3))
    let result = calculate("A", &x, "B", &y).unwrap();
    assert_eq!(result.kendall, Number::from_num(-65) / Number::from_num(88));
}

#[test]
fn kendall_tau_a_with_duplicates() {
    let (x, y) = duplicates();
    let engine = CorrelationEngine::new(EngineConfig {
        kendall: KendallVariant::TauA,
        ..Default::default()
    });
    let result = engine.calculate("A", &x, "B", &y).unwrap();
    assert_eq!(result.kendall, Number::from_num(-65) / Number::from_num(91));
}

#[test]
fn pearson_and_spearman_with_duplicates() {
    let (x, y) = duplicates();
    let result = calculate("A", &x, "B", &y).unwrap();
    assert_eq!(round(result.pearson.to_num()), round(-0.8029184245128409));
    assert_eq!(round(result.spearman.to_num()), round(-0.7986725663716814));
}

#[test]
fn pair_counting_choice_does_not_change_result() {
    let (x, y) = duplicates();
    let config = |pair_counting| EngineConfig {
        pair_counting,
        ..Default::default()
    };
    let pairwise = CorrelationEngine::new(config(PairCounting::Pairwise))
        .calculate("A", &x, "B", &y)
        .unwrap();
    let merge_sort = CorrelationEngine::new(config(PairCounting::MergeSort))
        .calculate("A", &x, "B", &y)
        .unwrap();
    assert_eq!(pairwise, merge_sort);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let x = numbers(&[1, 2, 3, 4, 5]);
    let y = numbers(&[1, 2, 3, 4]);
    assert_eq!(
        calculate("A", &x, "B", &y),
        Err(CorrelationError::MismatchedLength { left: 5, right: 4 })
    );
}

#[test]
fn decimal_strings_parse_into_numbers() {
    let x: Vec<Number> = ["0.1", "0.2", "0.3", "0.4"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let y: Vec<Number> = ["10.5", "20.25", "30.125", "40.0625"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let result = calculate("x", &x, "y", &y).unwrap();
    assert!(result.pearson.to_num::<f64>() > 0.99);
    assert_eq!(round(result.spearman.to_num()), 1.0);
    assert_eq!(round(result.kendall.to_num()), 1.0);
}

#[test]
fn coefficients_do_not_depend_on_magnitude() {
    let x = [1.0, 2.0, 3.0, 4.5, 2.5, 6.0];
    let y = [2.0, 1.5, 3.5, 3.0, 5.0, 5.5];
    let at = |values: &[f64], scale: f64| -> Vec<Number> {
        values.iter().map(|&v| Number::from_num(v * scale)).collect()
    };
    let unit = calculate("x", &at(&x, 1.0), "y", &at(&y, 1.0)).unwrap();

    for scale in [1e-10, 1e-8, 1e10] {
        let result = calculate("x", &at(&x, scale), "y", &at(&y, scale))
            .unwrap_or_else(|e| panic!("scale {scale}: {e}"));
        let drift = (result.pearson.to_num::<f64>() - unit.pearson.to_num::<f64>()).abs();
        assert!(drift < 1e-8, "scale {scale}: pearson drifted by {drift}");
        assert_eq!(result.spearman, unit.spearman);
        assert_eq!(result.kendall, unit.kendall);
    }
}

#[test]
fn tiny_non_constant_column_is_not_degenerate() {
    let x: Vec<Number> = [1e-10, 2e-10, 3e-10, 4e-10].iter().map(|&v| Number::from_num(v)).collect();
    let result = calculate("x", &x, "y", &numbers(&[1, 2, 3, 4])).unwrap();
    assert_eq!(round(result.pearson.to_num()), 1.0);
}

#[test]
fn large_column_does_not_overflow() {
    let x: Vec<Number> = [1e10, 2e10, 3e10, 4.5e10].iter().map(|&v| Number::from_num(v)).collect();
    let y = numbers(&[1, 2, 3, 4]);
    let result = calculate("x", &x, "y", &y).unwrap();
    // 1, 2, 3, 4.5 against 1..4
    assert_eq!(round(result.pearson.to_num()), round(0.9943767126843689));
    assert_eq!(round(result.kendall.to_num()), 1.0);
}
