use crate::{
    core::{
        array::NdArray,
        element::Element,
        errors::*,
        iters::PairedAxisIter,
        layout::Layout,
        view::{read, write, ArrayView, ArrayViewMut},
    },
    Res,
};
use anyhow::Result;

/// Axis with the smallest absolute byte stride, preferring later axes on
/// ties. Running the inner loop along it keeps memory access sequential.
pub(crate) fn fastest_axis(layout: &Layout) -> usize {
    layout
        .strides()
        .iter()
        .enumerate()
        .min_by_key(|&(d, stride)| (stride.unsigned_abs(), usize::MAX - d))
        .map(|(d, _)| d)
        .unwrap_or(0)
}

/// Folds `source` along `axis` into `target`, whose shape must be the
/// source's shape with `axis` removed. Each target element is combined with
/// every source element that maps onto it: `t = f(t, s)`.
///
/// The inner loop runs along `fast_axis`. When that is not `axis`, each
/// target lane is revisited once per position along `axis`.
pub fn fold_into<T, A>(
    source: &ArrayView<'_, T>,
    target: &mut ArrayViewMut<'_, A>,
    axis: usize,
    fast_axis: usize,
    f: impl Fn(A, T) -> A,
) -> Res<()>
where
    T: Copy,
    A: Copy,
{
    let rank = source.rank();
    for &d in &[axis, fast_axis] {
        if d >= rank {
            return Err(AxisError::OutOfRange {
                axis: d as isize,
                rank,
            }
            .into());
        }
    }
    source.layout().valid_reduced(target.layout(), axis)?;

    log::debug!(
        "folding axis {axis} of {:?} with fast axis {fast_axis}",
        source.sizes()
    );

    let mut it = PairedAxisIter::new(source.raw(), target.raw(), axis, fast_axis);

    while !it.is_exhausted() {
        for k in 0..it.length() {
            // With `fast_axis == axis` the target stride is 0 and this is the
            // lane's single accumulator.
            let slot = it.target_ptr_at(k);

            // SAFETY: both views were checked against their slices and the
            // iterator only visits positions inside their shapes.
            unsafe {
                let value = read::<T>(it.lane_ptr(k));
                write(slot, f(read::<A>(slot), value));
            }
        }

        it.advance();
    }

    Ok(())
}

impl<'a, T: Element> ArrayView<'a, T> {
    /// Folds along `axis` starting from `init`, picking the fast axis from
    /// the strides.
    pub fn fold_axis<A: Copy>(
        &self,
        axis: isize,
        init: A,
        f: impl Fn(A, T) -> A,
    ) -> Res<NdArray<A>> {
        let axis = self.checked_axis(axis)?;
        self.fold(axis, fastest_axis(self.layout()), init, f)
    }

    /// As [`fold_axis`](Self::fold_axis) with an explicit fast axis.
    pub fn fold_axis_with<A: Copy>(
        &self,
        axis: isize,
        fast_axis: isize,
        init: A,
        f: impl Fn(A, T) -> A,
    ) -> Res<NdArray<A>> {
        let axis = self.checked_axis(axis)?;
        let fast_axis = self.checked_axis(fast_axis)?;
        self.fold(axis, fast_axis, init, f)
    }

    fn checked_axis(&self, axis: isize) -> Result<usize> {
        if self.rank() == 0 {
            return Err(AxisError::ZeroRank.into());
        }
        Ok(self.layout().valid_axis(axis)?)
    }

    fn fold<A: Copy>(
        &self,
        axis: usize,
        fast_axis: usize,
        init: A,
        f: impl Fn(A, T) -> A,
    ) -> Result<NdArray<A>> {
        let sizes = self.layout().remove_axis(axis);
        let mut folded = NdArray::full(init, sizes.sizes())?;

        fold_into(self, &mut folded.view_mut(), axis, fast_axis, f)?;
        Ok(folded)
    }

    pub fn sum_axis(&self, axis: isize) -> Res<NdArray<T>> {
        self.fold_axis(axis, T::zero(), T::wrapping_add)
    }

    pub fn nansum_axis(&self, axis: isize) -> Res<NdArray<T>> {
        self.fold_axis(axis, T::zero(), |acc, v| {
            if v.is_nan() {
                acc
            } else {
                acc.wrapping_add(v)
            }
        })
    }

    /// Maximum along `axis`; a NaN in the lane makes the result NaN.
    pub fn max_axis(&self, axis: isize) -> Res<NdArray<T>> {
        self.fold_axis(axis, None, |acc: Option<T>, v| match acc {
            Some(m) if m.is_nan() || !(v.is_nan() || v > m) => Some(m),
            _ => Some(v),
        })?
        .try_map(|m| Ok(m.ok_or(EmptyReductionError::Max)?))
    }

    /// Minimum along `axis`; a NaN in the lane makes the result NaN.
    pub fn min_axis(&self, axis: isize) -> Res<NdArray<T>> {
        self.fold_axis(axis, None, |acc: Option<T>, v| match acc {
            Some(m) if m.is_nan() || !(v.is_nan() || v < m) => Some(m),
            _ => Some(v),
        })?
        .try_map(|m| Ok(m.ok_or(EmptyReductionError::Min)?))
    }

    pub fn any_nan_axis(&self, axis: isize) -> Res<NdArray<bool>> {
        self.fold_axis(axis, false, |acc, v| acc || v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NdArray;

    const NAN: f64 = f64::NAN;

    #[test]
    fn picks_smallest_stride() {
        let c = Layout::contiguous(&[3, 4], 8).unwrap();
        assert_eq!(fastest_axis(&c), 1);

        let f = Layout::new(&[3, 4], &[8, 24]).unwrap();
        assert_eq!(fastest_axis(&f), 0);

        let tied = Layout::new(&[3, 4], &[8, -8]).unwrap();
        assert_eq!(fastest_axis(&tied), 1);
    }

    #[test]
    fn both_fast_axis_choices_agree() {
        let a = NdArray::<i32>::arange(&[2, 3, 4]).unwrap();
        let view = a.view();

        for axis in 0..3 {
            let expected = view.nansum(Some(axis)).unwrap();
            for fast_axis in 0..3 {
                let folded = view
                    .fold_axis_with(axis, fast_axis, 0i32, |acc, v| acc + v)
                    .unwrap();
                assert_eq!(folded, expected, "axis {axis}, fast axis {fast_axis}");
            }
            assert_eq!(view.sum_axis(axis).unwrap(), expected);
        }
    }

    #[test]
    fn column_sums_run_along_rows() {
        // Reducing axis 0 of a row-major matrix walks contiguous rows.
        let a = NdArray::<f64>::arange(&[3, 4]).unwrap();
        let sums = a.view().sum_axis(0).unwrap();
        assert_eq!(sums.data(), &[12.0, 15.0, 18.0, 21.0]);
    }

    #[test]
    fn strided_target() {
        let a = NdArray::<i64>::arange(&[2, 3, 4]).unwrap();
        let mut out = [0i64; 6];
        {
            // (2, 3) target stored column-major
            let mut target = ArrayViewMut::with_strides(&mut out, &[2, 3], &[1, 2], 0).unwrap();
            fold_into(&a.view(), &mut target, 2, 1, |acc, v| acc + v).unwrap();
        }
        // row sums of a, [[6, 22, 38], [54, 70, 86]], transposed in memory
        assert_eq!(out, [6, 54, 22, 70, 38, 86]);
    }

    #[test]
    fn rejects_bad_arguments() {
        let a = NdArray::<f64>::zeros(&[2, 3]).unwrap();
        let mut out = NdArray::<f64>::zeros(&[3]).unwrap();

        assert!(fold_into(&a.view(), &mut out.view_mut(), 1, 0, |acc, v| acc + v).is_err());
        assert!(fold_into(&a.view(), &mut out.view_mut(), 0, 2, |acc, v| acc + v).is_err());
        assert!(fold_into(&a.view(), &mut out.view_mut(), 0, 1, |acc, v| acc + v).is_ok());
        assert!(a.view().fold_axis(-3, 0.0f64, |acc, v| acc + v).is_err());
        assert!(NdArray::scalar(1.0f64).view().sum_axis(0).is_err());
    }

    #[test]
    fn integer_sums_wrap() {
        let a = NdArray::<u8>::full(200, &[2, 3]).unwrap();
        assert_eq!(a.view().sum_axis(0).unwrap().data(), &[144, 144, 144]);
        assert_eq!(a.view().nansum_axis(1).unwrap().data(), &[88, 88]);

        let b = NdArray::<i32>::full(i32::MAX, &[2]).unwrap();
        assert_eq!(b.view().sum_axis(0).unwrap().item(), Some(-2));
    }

    #[test]
    fn extremes_and_nans() {
        let data = [1.0, 7.0, NAN, 4.0, 2.0, 3.0];
        let view = ArrayView::new(&data, &[2, 3]).unwrap();

        let max = view.max_axis(0).unwrap();
        assert_eq!(max.data()[..2], [4.0, 7.0]);
        assert!(max.data()[2].is_nan());

        let min = view.min_axis(1).unwrap();
        assert!(min.data()[0].is_nan());
        assert_eq!(min.data()[1], 2.0);

        assert_eq!(view.nansum_axis(0).unwrap().data(), &[5.0, 9.0, 3.0]);
        assert_eq!(view.any_nan_axis(0).unwrap().data(), &[false, false, true]);

        let empty = NdArray::<f64>::zeros(&[0, 2]).unwrap();
        assert!(empty.view().max_axis(0).is_err());
        assert_eq!(empty.view().sum_axis(0).unwrap().data(), &[0.0, 0.0]);
    }
}
