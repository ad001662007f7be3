use crate::core::{
    layout::{Layout, MAX_RANK},
    view::RawView,
};
use std::cmp::Ordering;

/// Walks a source array and a target array of one lower rank in lock-step.
///
/// The target has the source's shape with `axis` removed. The inner loop
/// runs along `fast_axis`, which may differ from `axis`:
///
/// - `fast_axis == axis`: one lane per target element. The target pointer
///   stays put while `k` moves and [`target_stride`](Self::target_stride) is 0.
/// - `fast_axis != axis`: the lane runs along a dimension the target shares,
///   so the target is indexed with `target_ptr_at(k)`. The odometer then also
///   steps along `axis`, revisiting each target lane `sizes[axis]` times.
///
/// The odometer covers every dimension except `fast_axis`. Along `axis` only
/// the source pointer moves, since the aligned target stride there is 0.
#[derive(Clone)]
pub struct PairedAxisIter {
    axis: usize,
    fast_axis: usize,
    length: usize,
    stride: isize,
    target_stride: isize,
    layout: Layout,
    target_strides: [isize; MAX_RANK],
    indices: [usize; MAX_RANK],
    base: *mut u8,
    ptr: *mut u8,
    target_base: *mut u8,
    target_ptr: *mut u8,
    completed: usize,
    total: usize,
}

impl PairedAxisIter {
    /// # Panics
    ///
    /// Panics if `axis` or `fast_axis` is not a dimension of `source`, or if
    /// `target` is not shaped like `source` with `axis` removed.
    pub fn new(source: &RawView, target: &RawView, axis: usize, fast_axis: usize) -> PairedAxisIter {
        let rank = source.rank();
        assert!(
            axis < rank && fast_axis < rank,
            "axes ({axis}, {fast_axis}) out of range for rank {rank}"
        );
        assert!(
            source.layout().valid_reduced(target.layout(), axis).is_ok(),
            "target shape {:?} is not source shape {:?} without axis {axis}",
            target.sizes(),
            source.sizes()
        );

        let total = source
            .sizes()
            .iter()
            .enumerate()
            .filter(|&(d, _)| d != fast_axis)
            .map(|(_, &size)| size)
            .product();

        log::trace!(
            "paired iterator: sizes {:?}, axis {axis}, fast axis {fast_axis}, {total} lanes",
            source.sizes()
        );

        PairedAxisIter {
            axis,
            fast_axis,
            length: source.sizes()[fast_axis],
            stride: source.strides()[fast_axis],
            target_stride: aligned_target_stride(axis, fast_axis, target.strides()),
            layout: *source.layout(),
            target_strides: align_target_strides(axis, target.strides()),
            indices: [0; MAX_RANK],
            base: source.data(),
            ptr: source.data(),
            target_base: target.data(),
            target_ptr: target.data(),
            completed: 0,
            total,
        }
    }

    /// Moves to the next lane, carrying from the last dimension towards the
    /// first and skipping `fast_axis`.
    pub fn advance(&mut self) {
        let sizes = self.layout.sizes();
        let strides = self.layout.strides();

        for d in (0..sizes.len()).rev() {
            if d == self.fast_axis {
                continue;
            }

            // Zero at `axis`, so only the source moves there.
            let target_stride = self.target_strides[d];

            if self.indices[d] + 1 < sizes[d] {
                self.ptr = self.ptr.wrapping_offset(strides[d]);
                self.target_ptr = self.target_ptr.wrapping_offset(target_stride);
                self.indices[d] += 1;
                break;
            }

            let steps = self.indices[d] as isize;
            self.ptr = self.ptr.wrapping_offset(-steps * strides[d]);
            self.target_ptr = self.target_ptr.wrapping_offset(-steps * target_stride);
            self.indices[d] = 0;
        }

        self.completed += 1;
    }

    // --- Lane ---

    pub fn axis(&self) -> usize {
        self.axis
    }

    pub fn fast_axis(&self) -> usize {
        self.fast_axis
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn stride(&self) -> isize {
        self.stride
    }

    /// Target stride along `fast_axis`; 0 when `fast_axis == axis`.
    pub fn target_stride(&self) -> isize {
        self.target_stride
    }

    pub fn ptr(&self) -> *mut u8 {
        self.ptr
    }

    pub fn target_ptr(&self) -> *mut u8 {
        self.target_ptr
    }

    #[inline]
    pub fn lane_ptr(&self, k: usize) -> *mut u8 {
        self.ptr.wrapping_offset(k as isize * self.stride)
    }

    #[inline]
    pub fn target_ptr_at(&self, k: usize) -> *mut u8 {
        self.target_ptr.wrapping_offset(k as isize * self.target_stride)
    }

    pub fn offset(&self) -> isize {
        (self.ptr as isize).wrapping_sub(self.base as isize)
    }

    pub fn target_offset(&self) -> isize {
        (self.target_ptr as isize).wrapping_sub(self.target_base as isize)
    }

    // --- Outer space ---

    /// Current position over all source dimensions. The `fast_axis` entry
    /// is always 0.
    pub fn indices(&self) -> &[usize] {
        &self.indices[..self.layout.rank()]
    }

    /// Target strides re-indexed to the source's dimensions.
    pub fn target_strides(&self) -> &[isize] {
        &self.target_strides[..self.layout.rank()]
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_exhausted(&self) -> bool {
        self.completed >= self.total
    }
}

/// Spreads the strides of a target with `axis` removed over the source's
/// dimensions, inserting a 0 stride at `axis`.
pub fn align_target_strides(axis: usize, target_strides: &[isize]) -> [isize; MAX_RANK] {
    let mut aligned = [0; MAX_RANK];

    let mut j = 0;
    for (i, stride) in aligned.iter_mut().enumerate().take(target_strides.len() + 1) {
        if i != axis {
            *stride = target_strides[j];
            j += 1;
        }
    }

    aligned
}

/// Target stride for a step along source dimension `fast_axis`, given the
/// target's own strides (which lack `axis`).
///
/// Dimensions after `axis` sit one position lower in the target.
pub fn aligned_target_stride(axis: usize, fast_axis: usize, target_strides: &[isize]) -> isize {
    match fast_axis.cmp(&axis) {
        Ordering::Less => target_strides[fast_axis],
        Ordering::Equal => 0,
        Ordering::Greater => target_strides[fast_axis - 1],
    }
}
