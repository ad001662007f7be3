use prettytable::{
    format::consts::FORMAT_BOX_CHARS,
    {Cell, Row, Table},
};
use std::{
    any::type_name,
    fmt::{Debug, Display, Formatter, Result},
};

use crate::core::array::NdArray;

impl<T: Debug + Copy> Debug for NdArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("NdArray")
            .field("dtype", &type_name::<T>())
            .field("dims", &self.rank())
            .field("elems", &self.numel())
            .field("shape", &self.sizes())
            .finish()
    }
}

impl<T: Display + Debug + Copy> Display for NdArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let n = self.rank();

        if n == 0 {
            writeln!(f, "{}", self.data[0])?;
        } else if (1..=8).contains(&n) {
            let table = if n % 2 == 1 {
                let row = odd_dimensions(self, n, 0);
                let table = Table::init(vec![row]);
                set_style(table)
            } else {
                even_dimensions(self, n, 0)
            };

            write!(f, "{}", table)?;
        }

        writeln!(f, "{:?}", self)
    }
}

// Row-major element stride of `dim`.
fn element_stride<T: Copy>(array: &NdArray<T>, dim: usize) -> usize {
    array.sizes()[dim + 1..].iter().product()
}

fn odd_dimensions<T>(array: &NdArray<T>, n: usize, offset: usize) -> Row
where
    T: Copy + Display,
{
    let dim = array.rank() - n;
    let size = array.sizes()[dim];
    let stride = element_stride(array, dim);

    if n == 1 {
        Row::from((0..size).map(|index| {
            let element = array.data[offset + index * stride];
            Cell::from(&element)
        }))
    } else {
        Row::from((0..size).map(|index| even_dimensions(array, n - 1, offset + index * stride)))
    }
}

fn even_dimensions<T>(array: &NdArray<T>, n: usize, offset: usize) -> Table
where
    T: Copy + Display,
{
    let dim = array.rank() - n;
    let size = array.sizes()[dim];
    let stride = element_stride(array, dim);

    let rows = (0..size)
        .map(|index| odd_dimensions(array, n - 1, offset + index * stride))
        .collect();

    let table = Table::init(rows);
    set_style(table)
}

fn set_style(mut table: Table) -> Table {
    table.set_format(*FORMAT_BOX_CHARS);
    table
}
