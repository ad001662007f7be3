use anyhow::{bail, Result};
use axiter::{ArrayView, Element, Indexer, NdArray};
use num_traits::FromPrimitive;
use std::{
    hint::black_box,
    time::{Duration, Instant},
};

const REPEAT: usize = 3;

#[derive(Clone, Copy, Debug)]
enum Order {
    C,
    F,
}

#[derive(Clone, Copy)]
enum Dtype {
    F64,
    F32,
    I64,
    I32,
}

impl Dtype {
    fn name(self) -> &'static str {
        match self {
            Dtype::F64 => "f64",
            Dtype::F32 => "f32",
            Dtype::I64 => "i64",
            Dtype::I32 => "i32",
        }
    }

    fn run(self, sizes: &[usize], axis: usize, order: Order) -> Result<[f64; 2]> {
        match self {
            Dtype::F64 => run::<f64>(sizes, axis, order),
            Dtype::F32 => run::<f32>(sizes, axis, order),
            Dtype::I64 => run::<i64>(sizes, axis, order),
            Dtype::I32 => run::<i32>(sizes, axis, order),
        }
    }
}

struct Case {
    sizes: &'static [usize],
    dtype: Dtype,
    axis: usize,
}

const SQUARE: &[usize] = &[1000, 1000];
const CUBE: &[usize] = &[100, 100, 100];

fn main() -> Result<()> {
    let dtypes = [Dtype::F64, Dtype::F32, Dtype::I64, Dtype::I32];

    for order in [Order::C, Order::F] {
        for axis in 0..2 {
            let cases: Vec<Case> = dtypes
                .iter()
                .map(|&dtype| Case {
                    sizes: SQUARE,
                    dtype,
                    axis,
                })
                .collect();
            bench(&format!("axis {axis}"), &cases, order)?;
        }

        let cases: Vec<Case> = (0..3)
            .map(|axis| Case {
                sizes: CUBE,
                dtype: Dtype::F64,
                axis,
            })
            .collect();
        bench("3d", &cases, order)?;
    }

    Ok(())
}

fn bench(title: &str, cases: &[Case], order: Order) -> Result<()> {
    println!("axiter benchmark: {title}, {order:?} order");
    println!("    Speed is naive time divided by axiter time");
    println!("    Score is harmonic mean of speeds");
    println!();

    let row = |cells: Vec<String>| {
        print!("{:10}", "");
        for cell in cells {
            print!("{cell:>14}");
        }
        println!();
    };
    row(cases
        .iter()
        .map(|c| format!("{:?}", c.sizes).replace(' ', ""))
        .collect());
    row(cases.iter().map(|c| c.dtype.name().to_string()).collect());
    row(cases.iter().map(|c| format!("axis={}", c.axis)).collect());

    let speeds = cases
        .iter()
        .map(|c| c.dtype.run(c.sizes, c.axis, order))
        .collect::<Result<Vec<_>>>()?;

    for (k, name) in ["nansum", "sum_axis"].iter().enumerate() {
        print!("{name:<10}");
        for speed in &speeds {
            print!("{:>14.2}", speed[k]);
        }
        let score = speeds.len() as f64 / speeds.iter().map(|s| 1.0 / s[k]).sum::<f64>();
        println!("{score:>14.2}");
    }
    println!();

    Ok(())
}

fn run<T>(sizes: &[usize], axis: usize, order: Order) -> Result<[f64; 2]>
where
    T: Element + FromPrimitive,
{
    let array = NdArray::<T>::arange(sizes)?;
    let view = match order {
        Order::C => array.view(),
        Order::F => ArrayView::with_strides(array.data(), sizes, &column_major(sizes), 0)?,
    };

    let expected = naive_nansum(&view, axis);
    let signed = axis as isize;
    if view.nansum(Some(signed))?.data() != expected.as_slice()
        || view.sum_axis(signed)?.data() != expected.as_slice()
    {
        bail!("{sizes:?} along axis {axis} disagrees with the naive sum");
    }

    let naive = best_of(|| naive_nansum(&view, axis));
    let reduced = best_of(|| view.nansum(Some(signed)));
    let folded = best_of(|| view.sum_axis(signed));

    Ok([ratio(naive, reduced), ratio(naive, folded)])
}

// Element strides of a column-major array.
fn column_major(sizes: &[usize]) -> Vec<isize> {
    let mut strides = Vec::with_capacity(sizes.len());
    let mut current = 1;
    for &size in sizes {
        strides.push(current);
        current *= size as isize;
    }
    strides
}

// One pass over every index, recomputing each offset from scratch.
fn naive_nansum<T: Element>(view: &ArrayView<'_, T>, axis: usize) -> Vec<T> {
    let sizes = view.sizes();
    let numel = sizes
        .iter()
        .enumerate()
        .filter(|&(d, _)| d != axis)
        .map(|(_, &size)| size)
        .product();
    let mut sums = vec![T::zero(); numel];

    for index in Indexer::new(sizes) {
        let flat = index
            .iter()
            .zip(sizes)
            .enumerate()
            .filter(|&(d, _)| d != axis)
            .fold(0, |flat, (_, (&i, &size))| flat * size + i);

        if let Some(value) = view.get(&index) {
            if !value.is_nan() {
                sums[flat] = sums[flat].wrapping_add(value);
            }
        }
    }

    sums
}

fn best_of<R>(mut f: impl FnMut() -> R) -> Duration {
    (0..REPEAT)
        .map(|_| {
            let now = Instant::now();
            black_box(f());
            now.elapsed()
        })
        .min()
        .unwrap_or_default()
}

fn ratio(slow: Duration, fast: Duration) -> f64 {
    slow.as_secs_f64() / fast.as_secs_f64().max(f64::MIN_POSITIVE)
}
