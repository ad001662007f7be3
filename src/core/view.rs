use crate::core::{
    array::NdArray,
    errors::*,
    iters::Indexer,
    layout::{valid_extent, Layout},
};
use anyhow::{bail, Result};
use std::{marker::PhantomData, mem::size_of};

/// Untyped description of a strided array: a base address, a [`Layout`]
/// with byte strides, and the element size.
///
/// Building a `RawView` never touches memory. The iterators only carry and
/// offset its pointer; dereferencing is left to the typed views.
#[derive(Copy, Clone, Debug)]
pub struct RawView {
    data: *mut u8,
    layout: Layout,
    itemsize: usize,
}

impl RawView {
    pub fn new(data: *mut u8, layout: Layout, itemsize: usize) -> RawView {
        RawView {
            data,
            layout,
            itemsize,
        }
    }

    pub fn data(&self) -> *mut u8 {
        self.data
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    pub fn sizes(&self) -> &[usize] {
        self.layout.sizes()
    }

    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }
}

/// Read-only strided view into a slice.
///
/// Every element reachable through the layout is checked to lie inside the
/// borrowed slice when the view is built, and every transform below only
/// narrows or reorders that set.
#[derive(Copy, Clone)]
pub struct ArrayView<'a, T> {
    raw: RawView,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T: Copy> ArrayView<'a, T> {
    /// Row-major view over all of `data`.
    pub fn new(data: &'a [T], sizes: &[usize]) -> Result<ArrayView<'a, T>> {
        valid_data_length::<T>(data.len(), sizes)?;
        let layout = Layout::contiguous(sizes, size_of::<T>())?;

        Ok(ArrayView::from_raw(data.as_ptr().cast_mut().cast(), layout))
    }

    /// View with explicit element strides (possibly negative) starting at
    /// element `offset` of `data`.
    pub fn with_strides(
        data: &'a [T],
        sizes: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Result<ArrayView<'a, T>> {
        let layout = strided_layout::<T>(data.len(), sizes, strides, offset)?;
        let base: *mut u8 = data.as_ptr().wrapping_add(offset).cast_mut().cast();

        Ok(ArrayView::from_raw(base, layout))
    }

    // `layout` must only reach elements of a live `[T]` borrowed for `'a`.
    pub(crate) fn from_raw(data: *mut u8, layout: Layout) -> ArrayView<'a, T> {
        ArrayView {
            raw: RawView::new(data, layout, size_of::<T>()),
            _marker: PhantomData,
        }
    }

    // --- Attributes ---

    pub fn raw(&self) -> &RawView {
        &self.raw
    }

    pub fn layout(&self) -> &Layout {
        self.raw.layout()
    }

    pub fn rank(&self) -> usize {
        self.raw.rank()
    }

    pub fn sizes(&self) -> &[usize] {
        self.raw.sizes()
    }

    /// Byte strides.
    pub fn strides(&self) -> &[isize] {
        self.raw.strides()
    }

    pub fn numel(&self) -> usize {
        self.layout().numel()
    }

    // --- Elements ---

    pub fn get(&self, indices: &[usize]) -> Option<T> {
        let in_range = indices.len() == self.rank()
            && indices.iter().zip(self.sizes()).all(|(&i, &size)| i < size);

        // SAFETY: indices are in range and the extent was checked on construction.
        in_range.then(|| unsafe { self.get_unchecked(indices) })
    }

    /// # Safety
    ///
    /// `indices` must have one in-range entry per dimension.
    pub(crate) unsafe fn get_unchecked(&self, indices: &[usize]) -> T {
        read(self.raw.data().wrapping_offset(self.layout().offset(indices)))
    }

    pub fn to_owned(&self) -> NdArray<T> {
        let data = Indexer::new(self.sizes())
            // SAFETY: the indexer only yields in-range indices.
            .map(|index| unsafe { self.get_unchecked(&index) })
            .collect();

        NdArray::from_parts(data, self.sizes())
    }

    // --- View operations ---

    pub fn permute(&self, permutation: &[usize]) -> Result<ArrayView<'a, T>> {
        let layout = self.layout().permute(permutation)?;
        Ok(ArrayView::from_raw(self.raw.data(), layout))
    }

    pub fn transpose(&self, axis_1: isize, axis_2: isize) -> Result<ArrayView<'a, T>> {
        let axis_1 = self.layout().valid_axis(axis_1)?;
        let axis_2 = self.layout().valid_axis(axis_2)?;

        let mut permutation = Vec::from_iter(0..self.rank());
        permutation.swap(axis_1, axis_2);

        self.permute(&permutation)
    }

    /// Every `step`-th element along `axis`, beginning at `start`.
    pub fn step(&self, axis: isize, start: usize, step: usize) -> Result<ArrayView<'a, T>> {
        let axis = self.layout().valid_axis(axis)?;
        if step == 0 {
            bail!(LayoutError::ZeroStep);
        }

        let size = self.sizes()[axis];
        let stride = self.strides()[axis];

        let (size, data) = if start < size {
            let data = self.raw.data().wrapping_offset(start as isize * stride);
            ((size - start).div_ceil(step), data)
        } else {
            (0, self.raw.data())
        };

        // Within the original reach whenever it is ever taken.
        let stride = if size > 1 { stride * step as isize } else { stride };
        let layout = self.layout().with_axis(axis, size, stride);
        Ok(ArrayView::from_raw(data, layout))
    }

    pub fn flip(&self, axis: isize) -> Result<ArrayView<'a, T>> {
        let axis = self.layout().valid_axis(axis)?;

        let size = self.sizes()[axis];
        let stride = self.strides()[axis];
        let data = match size {
            0 => self.raw.data(),
            _ => self.raw.data().wrapping_offset((size - 1) as isize * stride),
        };

        let layout = self.layout().with_axis(axis, size, -stride);
        Ok(ArrayView::from_raw(data, layout))
    }
}

/// Writable strided view into a slice.
pub struct ArrayViewMut<'a, T> {
    raw: RawView,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T: Copy> ArrayViewMut<'a, T> {
    pub fn new(data: &'a mut [T], sizes: &[usize]) -> Result<ArrayViewMut<'a, T>> {
        valid_data_length::<T>(data.len(), sizes)?;
        let layout = Layout::contiguous(sizes, size_of::<T>())?;

        Ok(ArrayViewMut::from_raw(data.as_mut_ptr().cast(), layout))
    }

    pub fn with_strides(
        data: &'a mut [T],
        sizes: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Result<ArrayViewMut<'a, T>> {
        let layout = strided_layout::<T>(data.len(), sizes, strides, offset)?;
        let base: *mut u8 = data.as_mut_ptr().wrapping_add(offset).cast();

        Ok(ArrayViewMut::from_raw(base, layout))
    }

    pub(crate) fn from_raw(data: *mut u8, layout: Layout) -> ArrayViewMut<'a, T> {
        ArrayViewMut {
            raw: RawView::new(data, layout, size_of::<T>()),
            _marker: PhantomData,
        }
    }

    pub fn raw(&self) -> &RawView {
        &self.raw
    }

    pub fn layout(&self) -> &Layout {
        self.raw.layout()
    }

    pub fn sizes(&self) -> &[usize] {
        self.raw.sizes()
    }

    pub fn fill(&mut self, value: T) {
        for index in Indexer::new(self.sizes()) {
            let ptr = self.raw.data().wrapping_offset(self.layout().offset(&index));
            // SAFETY: in-range index into a view whose extent was checked.
            unsafe { write(ptr, value) };
        }
    }
}

/// # Safety
///
/// `ptr` must point to a live, aligned `T`.
#[inline(always)]
pub(crate) unsafe fn read<T: Copy>(ptr: *const u8) -> T {
    ptr.cast::<T>().read()
}

/// # Safety
///
/// `ptr` must point to a live, aligned `T` with no outstanding borrows.
#[inline(always)]
pub(crate) unsafe fn write<T: Copy>(ptr: *mut u8, value: T) {
    ptr.cast::<T>().write(value)
}

fn valid_data_length<T>(data_length: usize, sizes: &[usize]) -> Result<(), LayoutError> {
    let array_size = valid_extent(sizes, size_of::<T>())?;

    if data_length != array_size {
        Err(LayoutError::DataLength {
            data_length,
            array_size,
        })
    } else {
        Ok(())
    }
}

/// Byte layout for element `strides`, after checking every reachable element
/// index stays inside `0..data_length`.
fn strided_layout<T>(
    data_length: usize,
    sizes: &[usize],
    strides: &[isize],
    offset: usize,
) -> Result<Layout> {
    let layout = Layout::new(sizes, strides)?;
    valid_extent(sizes, size_of::<T>())?;

    let overflow = || LayoutError::StrideOverflow {
        sizes: sizes.to_vec(),
        strides: strides.to_vec(),
    };

    if layout.numel() > 0 {
        let (low, high) = layout.reach().ok_or_else(overflow)?;
        let in_bounds = isize::try_from(offset)
            .ok()
            .and_then(|start| Some((start.checked_add(low)?, start.checked_add(high)?)))
            .is_some_and(|(low, high)| low >= 0 && high < data_length as isize);

        if !in_bounds {
            bail!(LayoutError::OutOfBounds {
                sizes: sizes.to_vec(),
                strides: strides.to_vec(),
                offset,
                data_length,
            });
        }
    }

    let itemsize = size_of::<T>() as isize;
    let byte_strides = strides
        .iter()
        .map(|&stride| stride.checked_mul(itemsize))
        .collect::<Option<Vec<isize>>>()
        .ok_or_else(overflow)?;

    Ok(Layout::from_parts(sizes, &byte_strides))
}
