use crate::core::{
    layout::{Layout, MAX_RANK},
    view::RawView,
};

/// Walks every position of a strided array except along one axis.
///
/// Each outer position is a "lane": the caller reads the `length()` elements
/// at `lane_ptr(0..length())` and then calls [`advance`](AxisIter::advance).
/// The pointer is moved by byte strides with a mixed-radix carry, so no
/// offset is recomputed from scratch.
///
/// ```text
/// let mut it = AxisIter::new(view.raw(), axis);
/// while !it.is_exhausted() {
///     for k in 0..it.length() { /* it.lane_ptr(k) */ }
///     it.advance();
/// }
/// ```
///
/// The iterator never dereferences its pointer. Pointer motion uses wrapping
/// arithmetic, so stepping past the final lane is harmless; the pointer is
/// just not meaningful once `completed() == total()`.
#[derive(Clone)]
pub struct AxisIter {
    axis: usize,
    length: usize,
    stride: isize,
    outer: Layout,
    indices: [usize; MAX_RANK],
    base: *mut u8,
    ptr: *mut u8,
    completed: usize,
    total: usize,
}

impl AxisIter {
    /// # Panics
    ///
    /// Panics if `axis` is not a dimension of `view`.
    pub fn new(view: &RawView, axis: usize) -> AxisIter {
        assert!(
            axis < view.rank(),
            "axis {axis} out of range for rank {}",
            view.rank()
        );

        let outer = view.layout().remove_axis(axis);
        let total = outer.numel();

        log::trace!(
            "axis iterator: sizes {:?}, axis {axis}, {total} lanes",
            view.sizes()
        );

        AxisIter {
            axis,
            length: view.sizes()[axis],
            stride: view.strides()[axis],
            outer,
            indices: [0; MAX_RANK],
            base: view.data(),
            ptr: view.data(),
            completed: 0,
            total,
        }
    }

    /// Moves to the next lane in odometer order, carrying from the last
    /// outer dimension towards the first.
    pub fn advance(&mut self) {
        let sizes = self.outer.sizes();
        let strides = self.outer.strides();

        for d in (0..sizes.len()).rev() {
            if self.indices[d] + 1 < sizes[d] {
                self.ptr = self.ptr.wrapping_offset(strides[d]);
                self.indices[d] += 1;
                break;
            }

            self.ptr = self
                .ptr
                .wrapping_offset(-(self.indices[d] as isize) * strides[d]);
            self.indices[d] = 0;
        }

        self.completed += 1;
    }

    // --- Lane ---

    pub fn axis(&self) -> usize {
        self.axis
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn stride(&self) -> isize {
        self.stride
    }

    pub fn ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Address of element `k` of the current lane.
    #[inline]
    pub fn lane_ptr(&self, k: usize) -> *mut u8 {
        self.ptr.wrapping_offset(k as isize * self.stride)
    }

    /// Byte offset of the current lane from the view's base.
    pub fn offset(&self) -> isize {
        (self.ptr as isize).wrapping_sub(self.base as isize)
    }

    // --- Outer space ---

    pub fn indices(&self) -> &[usize] {
        &self.indices[..self.outer.rank()]
    }

    pub fn outer(&self) -> &Layout {
        &self.outer
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
