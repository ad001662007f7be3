use axiter::{fold_into, ArrayViewMut, NdArray, Res};

fn main() -> Res<()> {
    let a = NdArray::<i64>::arange(&[2, 3, 4])?;
    println!("{}", a);

    for axis in 0..3 {
        println!("{}", a.view().sum_axis(axis)?);
    }

    let t = a.view().transpose(0, 2)?;
    println!("{}", t.max_axis(1)?);

    // products along axis 1, written into a column-major (2, 4) buffer
    let mut out = [1i64; 8];
    let mut target = ArrayViewMut::with_strides(&mut out, &[2, 4], &[1, 2], 0)?;
    fold_into(&a.view(), &mut target, 1, 2, |acc, v| acc * (v + 1))?;
    println!("{:?}", out);

    Ok(())
}
