pub(crate) mod fold;
mod kernels;
mod reduce;

use crate::core::{
    iters::AxisIter,
    layout::Layout,
    view::{read, ArrayView, RawView},
};
use std::marker::PhantomData;

/// Elements of the current lane of an [`AxisIter`] built over an
/// `ArrayView<T>`.
pub(crate) struct Lane<'i, T> {
    it: &'i AxisIter,
    k: usize,
    _marker: PhantomData<T>,
}

impl<'i, T: Copy> Lane<'i, T> {
    // `it` must walk a checked `ArrayView<T>` and not be exhausted.
    fn new(it: &'i AxisIter) -> Lane<'i, T> {
        Lane {
            it,
            k: 0,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Lane<'_, T> {
    fn clone(&self) -> Self {
        Lane {
            it: self.it,
            k: self.k,
            _marker: PhantomData,
        }
    }
}

impl<T: Copy> Iterator for Lane<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.k == self.it.length() {
            return None;
        }

        // SAFETY: the lane lies inside the view the iterator was built from.
        let value = unsafe { read(self.it.lane_ptr(self.k)) };
        self.k += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.it.length() - self.k;
        (remaining, Some(remaining))
    }
}

impl<T: Copy> ExactSizeIterator for Lane<'_, T> {}

/// Every element of an `ArrayView<T>` in row-major order, walked lane by
/// lane along the last axis.
#[derive(Clone)]
pub(crate) struct Elements<'a, T> {
    it: AxisIter,
    k: usize,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T: Copy> Elements<'a, T> {
    pub(crate) fn new(view: &ArrayView<'a, T>) -> Elements<'a, T> {
        Elements {
            it: AxisIter::new(&as_lanes(view.raw()), view.rank().max(1) - 1),
            k: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: Copy> Iterator for Elements<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while !self.it.is_exhausted() {
            if self.k < self.it.length() {
                // SAFETY: lane of a checked view, iterator not exhausted.
                let value = unsafe { read(self.it.lane_ptr(self.k)) };
                self.k += 1;
                return Some(value);
            }

            self.k = 0;
            self.it.advance();
        }

        None
    }
}

// A rank-0 view walked as a single lane of one element.
fn as_lanes(view: &RawView) -> RawView {
    if view.rank() > 0 {
        *view
    } else {
        RawView::new(view.data(), Layout::from_parts(&[1], &[0]), view.itemsize())
    }
}

/// Lanes along `axis`, one call of `f` per lane in odometer order.
pub(crate) fn map_lanes<T: Copy, R>(
    view: &ArrayView<'_, T>,
    axis: usize,
    mut f: impl FnMut(Lane<'_, T>) -> R,
) -> Vec<R> {
    let mut it = AxisIter::new(view.raw(), axis);
    let mut results = Vec::with_capacity(it.total());

    while !it.is_exhausted() {
        results.push(f(Lane::new(&it)));
        it.advance();
    }

    results
}
