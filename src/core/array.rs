use crate::core::{
    errors::*,
    layout::{valid_extent, valid_rank, Layout},
    view::{ArrayView, ArrayViewMut},
};
use anyhow::{bail, Result};
use num_traits::{FromPrimitive, Zero};
use std::{any::type_name, mem::size_of};

/// Owned, contiguous, row-major array. Results of the reductions come back
/// in this form.
pub struct NdArray<T> {
    pub(crate) data: Vec<T>,
    pub(crate) layout: Layout,
}

impl<T: Copy> NdArray<T> {
    // Init

    pub fn new(data: &[T], sizes: &[usize]) -> Result<NdArray<T>> {
        NdArray::from_vec(data.to_vec(), sizes)
    }

    pub fn from_vec(data: Vec<T>, sizes: &[usize]) -> Result<NdArray<T>> {
        valid_rank(sizes.len())?;

        let data_length = data.len();
        let array_size = valid_extent(sizes, size_of::<T>())?;
        if data_length != array_size {
            bail!(LayoutError::DataLength {
                data_length,
                array_size
            });
        }

        Ok(NdArray::from_parts(data, sizes))
    }

    // `sizes` come from an existing layout, so the rank is in range.
    pub(crate) fn from_parts(data: Vec<T>, sizes: &[usize]) -> NdArray<T> {
        debug_assert_eq!(data.len(), sizes.iter().product::<usize>());

        NdArray {
            data,
            layout: Layout::row_major(sizes, size_of::<T>()),
        }
    }

    pub fn scalar(value: T) -> NdArray<T> {
        NdArray::from_parts(vec![value], &[])
    }

    pub fn full(value: T, sizes: &[usize]) -> Result<NdArray<T>> {
        let numel = valid_extent(sizes, size_of::<T>())?;
        NdArray::from_vec(vec![value; numel], sizes)
    }

    pub fn zeros(sizes: &[usize]) -> Result<NdArray<T>>
    where
        T: Zero,
    {
        NdArray::full(T::zero(), sizes)
    }

    /// `0, 1, 2, ...` laid out in row-major order over `sizes`.
    pub fn arange(sizes: &[usize]) -> Result<NdArray<T>>
    where
        T: FromPrimitive,
    {
        let numel = valid_extent(sizes, size_of::<T>())?;
        let data = (0..numel)
            .map(cast_usize)
            .collect::<Result<Vec<T>, CastError>>()?;

        NdArray::from_vec(data, sizes)
    }

    // Attributes

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn sizes(&self) -> &[usize] {
        self.layout.sizes()
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    // Elements

    pub fn get(&self, indices: &[usize]) -> Option<T> {
        self.view().get(indices)
    }

    /// The single element of a rank-0 array.
    pub fn item(&self) -> Option<T> {
        (self.rank() == 0).then(|| self.data[0])
    }

    // Views

    pub fn view(&self) -> ArrayView<'_, T> {
        ArrayView::from_raw(self.data.as_ptr().cast_mut().cast(), self.layout)
    }

    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T> {
        ArrayViewMut::from_raw(self.data.as_mut_ptr().cast(), self.layout)
    }

    pub fn reshape(self, sizes: &[usize]) -> Result<NdArray<T>> {
        if self.numel() != valid_extent(sizes, size_of::<T>())? {
            bail!(LayoutError::Reshape {
                current_shape: self.sizes().to_vec(),
                new_shape: sizes.to_vec(),
            });
        }

        NdArray::from_vec(self.data, sizes)
    }

    // Maps

    pub fn map<R: Copy>(&self, f: impl Fn(T) -> R) -> NdArray<R> {
        let data = self.data.iter().map(|&x| f(x)).collect();
        NdArray::from_parts(data, self.sizes())
    }

    pub(crate) fn try_map<R: Copy>(&self, f: impl Fn(T) -> Result<R>) -> Result<NdArray<R>> {
        let data = self.data.iter().map(|&x| f(x)).collect::<Result<Vec<R>>>()?;
        Ok(NdArray::from_parts(data, self.sizes()))
    }
}

fn cast_usize<T: FromPrimitive>(value: usize) -> Result<T, CastError> {
    T::from_usize(value).ok_or(CastError {
        value,
        dtype: type_name::<T>(),
    })
}

impl<T: PartialEq> PartialEq for NdArray<T> {
    fn eq(&self, rhs: &NdArray<T>) -> bool {
        self.layout.sizes() == rhs.layout.sizes() && self.data == rhs.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction() {
        let a = NdArray::new(&[1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        assert_eq!(a.sizes(), &[2, 3]);
        assert_eq!(a.get(&[1, 0]), Some(4));
        assert!(NdArray::new(&[1, 2, 3], &[2, 2]).is_err());

        let s = NdArray::scalar(2.5f64);
        assert_eq!(s.rank(), 0);
        assert_eq!(s.item(), Some(2.5));
        assert_eq!(a.item(), None);
    }

    #[test]
    fn arange_and_reshape() {
        let a = NdArray::<f32>::arange(&[2, 2]).unwrap();
        assert_eq!(a.data(), &[0.0, 1.0, 2.0, 3.0]);

        let b = a.reshape(&[4]).unwrap();
        assert_eq!(b.sizes(), &[4]);
        assert!(b.reshape(&[3]).is_err());

        // 300 does not fit in a u8
        assert!(NdArray::<u8>::arange(&[300]).is_err());
    }

    #[test]
    fn oversized_shapes() {
        let half = usize::MAX / 2;
        assert!(NdArray::<f64>::zeros(&[half, 2]).is_err());
        assert!(NdArray::<u8>::arange(&[half, 4]).is_err());
        assert!(NdArray::<u8>::from_vec(vec![], &[half, 4, 0]).is_err());
        assert!(NdArray::new(&[1, 2], &[2]).unwrap().reshape(&[half, 4]).is_err());

        let empty = NdArray::<f64>::from_vec(vec![], &[0, half / 8]).unwrap();
        assert_eq!(empty.view().nansum(Some(1)).unwrap().numel(), 0);
    }

    #[test]
    fn map_and_into_data() {
        let a = NdArray::<i32>::arange(&[2, 2]).unwrap();
        let halves = a.map(|x| x as f64 / 2.0);
        assert_eq!(halves.sizes(), &[2, 2]);
        assert_eq!(halves.into_data(), vec![0.0, 0.5, 1.0, 1.5]);

        let odd = a.map(|x| x % 2 == 1);
        assert_eq!(odd.get(&[1, 1]), Some(true));
    }

    #[test]
    fn view_round_trip() {
        let mut a = NdArray::<i64>::zeros(&[2, 3]).unwrap();
        a.view_mut().fill(4);
        assert_eq!(a.view().to_owned(), NdArray::full(4, &[2, 3]).unwrap());
    }
}
