use crate::{
    core::{
        array::NdArray,
        element::Element,
        errors::AxisError,
        ops::{kernels, map_lanes, Elements, Lane},
        view::ArrayView,
    },
    Res,
};
use anyhow::Result;

// Expands the kernel once per lane type, so it can be a generic closure.
macro_rules! reduce_with {
    ($view:expr, $axis:expr, $kernel:expr) => {
        match $axis {
            None => $view.reduce_all($kernel),
            Some(axis) => $view.reduce_axis(axis, $kernel),
        }
    };
}

impl<'a, T: Element> ArrayView<'a, T> {
    /// Applies `f` to every element as one lane; the result has rank 0.
    pub(crate) fn reduce_all<R: Copy>(
        &self,
        f: impl FnOnce(Elements<'a, T>) -> Result<R>,
    ) -> Result<NdArray<R>> {
        log::debug!("reducing all {} elements of {:?}", self.numel(), self.sizes());

        Ok(NdArray::scalar(f(Elements::new(self))?))
    }

    /// Applies `f` to every lane along `axis`. The result has the view's shape
    /// with `axis` removed.
    pub(crate) fn reduce_axis<R: Copy>(
        &self,
        axis: isize,
        f: impl FnMut(Lane<'_, T>) -> Result<R>,
    ) -> Result<NdArray<R>> {
        if self.rank() == 0 {
            return Err(AxisError::ZeroRank.into());
        }
        let axis = self.layout().valid_axis(axis)?;

        log::debug!("reducing axis {axis} of {:?}", self.sizes());

        let data = map_lanes(self, axis, f).into_iter().collect::<Result<Vec<R>>>()?;
        let sizes = self.layout().remove_axis(axis);

        Ok(NdArray::from_parts(data, sizes.sizes()))
    }

    /// Sum, treating NaNs as zero.
    pub fn nansum(&self, axis: Option<isize>) -> Res<NdArray<T>> {
        reduce_with!(self, axis, |values| Ok(kernels::nansum(values)))
    }

    /// Mean of the non-NaN values; NaN where there are none.
    pub fn nanmean(&self, axis: Option<isize>) -> Res<NdArray<f64>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanmean(values)))
    }

    /// Variance of the non-NaN values with `ddof` delta degrees of freedom.
    pub fn nanvar(&self, axis: Option<isize>, ddof: usize) -> Res<NdArray<f64>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanvar(values, ddof)))
    }

    pub fn nanstd(&self, axis: Option<isize>, ddof: usize) -> Res<NdArray<f64>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanstd(values, ddof)))
    }

    /// Sum of squares.
    pub fn ss(&self, axis: Option<isize>) -> Res<NdArray<T>> {
        reduce_with!(self, axis, |values| Ok(kernels::ss(values)))
    }

    pub fn nanmin(&self, axis: Option<isize>) -> Res<NdArray<T>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanmin(values)?))
    }

    pub fn nanmax(&self, axis: Option<isize>) -> Res<NdArray<T>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanmax(values)?))
    }

    /// Index of the smallest non-NaN value along `axis`, or the flat
    /// row-major index when `axis` is `None`.
    pub fn nanargmin(&self, axis: Option<isize>) -> Res<NdArray<usize>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanargmin(values)?))
    }

    pub fn nanargmax(&self, axis: Option<isize>) -> Res<NdArray<usize>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanargmax(values)?))
    }

    pub fn median(&self, axis: Option<isize>) -> Res<NdArray<f64>> {
        reduce_with!(self, axis, |values| Ok(kernels::median(values)))
    }

    pub fn nanmedian(&self, axis: Option<isize>) -> Res<NdArray<f64>> {
        reduce_with!(self, axis, |values| Ok(kernels::nanmedian(values)))
    }

    pub fn anynan(&self, axis: Option<isize>) -> Res<NdArray<bool>> {
        reduce_with!(self, axis, |values| Ok(kernels::anynan(values)))
    }

    pub fn allnan(&self, axis: Option<isize>) -> Res<NdArray<bool>> {
        reduce_with!(self, axis, |values| Ok(kernels::allnan(values)))
    }
}
