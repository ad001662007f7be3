use thiserror::Error;

// --- Rank, Layout ---

#[derive(Error, Debug)]
pub(crate) enum RankError {
    #[error("Rank {rank} exceeds the maximum supported rank, {max_rank}.")]
    TooLarge { rank: usize, max_rank: usize },
}

#[derive(Error, Debug)]
pub(crate) enum LayoutError {
    #[error("Number of strides ({num_strides}) does not match the number of dimensions ({num_dimensions}).")]
    StridesLength {
        num_strides: usize,
        num_dimensions: usize,
    },

    #[error("View of shape {sizes:?} with strides {strides:?} and offset {offset} reaches outside a buffer of length {data_length}.")]
    OutOfBounds {
        sizes: Vec<usize>,
        strides: Vec<isize>,
        offset: usize,
        data_length: usize,
    },

    #[error("Data length ({data_length}) does not match size of array ({array_size}).")]
    DataLength {
        data_length: usize,
        array_size: usize,
    },

    #[error("Array of shape {current_shape:?} cannot be reshaped to {new_shape:?}.")]
    Reshape {
        current_shape: Vec<usize>,
        new_shape: Vec<usize>,
    },

    #[error("Step size cannot be zero.")]
    ZeroStep,

    #[error("Array of shape {sizes:?} is too large.")]
    TooLarge { sizes: Vec<usize> },

    #[error("Strides {strides:?} overflow for shape {sizes:?}.")]
    StrideOverflow {
        sizes: Vec<usize>,
        strides: Vec<isize>,
    },
}

// --- Axis ---

#[derive(Error, Debug)]
pub enum AxisError {
    #[error("Axis {axis} is out of bounds for array of rank {rank}.")]
    OutOfRange { axis: isize, rank: usize },

    #[error("Axis {0} repeats.")]
    Repetition(usize),

    #[error("Permutation of length {num_axes} does not match rank {rank}.")]
    PermutationLength { num_axes: usize, rank: usize },

    #[error("Array of rank 0 can only be reduced with `axis = None`.")]
    ZeroRank,
}

#[derive(Error, Debug)]
#[error("Target of shape {target_shape:?} does not match source shape {source_shape:?} with axis {axis} removed.")]
pub(crate) struct PairedShapeError {
    pub source_shape: Vec<usize>,
    pub target_shape: Vec<usize>,
    pub axis: usize,
}

// --- Reduce ---

#[derive(Error, Debug)]
pub(crate) enum EmptyReductionError {
    #[error("Zero-size lane. No min.")]
    Min,

    #[error("Zero-size lane. No max.")]
    Max,

    #[error("Zero-size or all-NaN lane. No argmin.")]
    ArgMin,

    #[error("Zero-size or all-NaN lane. No argmax.")]
    ArgMax,
}

// --- Misc ---

#[derive(Error, Debug)]
#[error("Cannot convert {value} from `usize` to type {dtype}.")]
pub(crate) struct CastError {
    pub value: usize,
    pub dtype: &'static str,
}
