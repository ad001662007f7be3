//! Single-lane reductions. Each takes the lane's values in order.

use crate::core::{element::Element, errors::EmptyReductionError};
use std::cmp::Ordering;

pub(crate) fn nansum<T: Element>(values: impl Iterator<Item = T>) -> T {
    values
        .filter(|v| !v.is_nan())
        .fold(T::zero(), |acc, v| acc.wrapping_add(v))
}

/// Count and f64 sum of the non-NaN values.
fn count_sum<T: Element>(values: impl Iterator<Item = T>) -> (usize, f64) {
    values
        .filter(|v| !v.is_nan())
        .fold((0, 0.0), |(count, sum), v| (count + 1, sum + v.as_f64()))
}

pub(crate) fn nanmean<T: Element>(values: impl Iterator<Item = T>) -> f64 {
    match count_sum(values) {
        (0, _) => f64::NAN,
        (count, sum) => sum / count as f64,
    }
}

pub(crate) fn nanvar<T: Element>(values: impl Iterator<Item = T> + Clone, ddof: usize) -> f64 {
    let (count, sum) = count_sum(values.clone());
    if count <= ddof {
        return f64::NAN;
    }

    let mean = sum / count as f64;
    let squares: f64 = values
        .filter(|v| !v.is_nan())
        .map(|v| (v.as_f64() - mean).powi(2))
        .sum();

    squares / (count - ddof) as f64
}

pub(crate) fn nanstd<T: Element>(values: impl Iterator<Item = T> + Clone, ddof: usize) -> f64 {
    nanvar(values, ddof).sqrt()
}

/// Sum of squares. NaNs propagate.
pub(crate) fn ss<T: Element>(values: impl Iterator<Item = T>) -> T {
    values.fold(T::zero(), |acc, v| acc.wrapping_add(v.wrapping_mul(v)))
}

/// Extreme of the non-NaN values under `keep`, or a NaN from the lane if
/// every value is NaN.
fn extreme<T: Element>(
    values: impl Iterator<Item = T>,
    keep: impl Fn(T, T) -> bool,
) -> Option<T> {
    let mut first = None;
    let mut best: Option<T> = None;

    for v in values {
        if first.is_none() {
            first = Some(v);
        }
        if v.is_nan() {
            continue;
        }

        best = match best {
            Some(b) if !keep(v, b) => Some(b),
            _ => Some(v),
        };
    }

    best.or(first)
}

pub(crate) fn nanmin<T: Element>(values: impl Iterator<Item = T>) -> Result<T, EmptyReductionError> {
    extreme(values, |v, b| v < b).ok_or(EmptyReductionError::Min)
}

pub(crate) fn nanmax<T: Element>(values: impl Iterator<Item = T>) -> Result<T, EmptyReductionError> {
    extreme(values, |v, b| v > b).ok_or(EmptyReductionError::Max)
}

/// Position of the first extreme non-NaN value under `keep`.
fn arg_extreme<T: Element>(
    values: impl Iterator<Item = T>,
    keep: impl Fn(T, T) -> bool,
) -> Option<usize> {
    values
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, T)>, (i, v)| match best {
            Some((_, b)) if !keep(v, b) => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

pub(crate) fn nanargmin<T: Element>(
    values: impl Iterator<Item = T>,
) -> Result<usize, EmptyReductionError> {
    arg_extreme(values, |v, b| v < b).ok_or(EmptyReductionError::ArgMin)
}

pub(crate) fn nanargmax<T: Element>(
    values: impl Iterator<Item = T>,
) -> Result<usize, EmptyReductionError> {
    arg_extreme(values, |v, b| v > b).ok_or(EmptyReductionError::ArgMax)
}

fn middle(mut values: Vec<f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }

    // No NaNs reach here, so the order is total.
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Median. A NaN anywhere in the lane makes the result NaN.
pub(crate) fn median<T: Element>(values: impl Iterator<Item = T>) -> f64 {
    let values: Vec<f64> = values.map(Element::as_f64).collect();

    if values.iter().any(|v| v.is_nan()) {
        f64::NAN
    } else {
        middle(values)
    }
}

pub(crate) fn nanmedian<T: Element>(values: impl Iterator<Item = T>) -> f64 {
    middle(
        values
            .filter(|v| !v.is_nan())
            .map(Element::as_f64)
            .collect(),
    )
}

pub(crate) fn anynan<T: Element>(mut values: impl Iterator<Item = T>) -> bool {
    values.any(Element::is_nan)
}

pub(crate) fn allnan<T: Element>(mut values: impl Iterator<Item = T>) -> bool {
    values.all(Element::is_nan)
}
