use num_traits::{NumCast, ToPrimitive, WrappingAdd, WrappingMul, Zero};
use std::{
    fmt::Debug,
    ops::{Add, Mul},
};

/// Scalar types the reductions accept.
///
/// Integers are never NaN, so the NaN-skipping reductions behave like their
/// plain counterparts on them. Integer sums and products wrap on overflow.
pub trait Element:
    Copy + Debug + PartialOrd + NumCast + Zero + Add<Output = Self> + Mul<Output = Self>
{
    fn is_nan(self) -> bool;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_mul(self, rhs: Self) -> Self;

    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

macro_rules! float_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                #[inline]
                fn is_nan(self) -> bool {
                    <$t>::is_nan(self)
                }

                #[inline]
                fn wrapping_add(self, rhs: $t) -> $t {
                    self + rhs
                }

                #[inline]
                fn wrapping_mul(self, rhs: $t) -> $t {
                    self * rhs
                }
            }
        )*
    };
}

macro_rules! int_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                #[inline]
                fn is_nan(self) -> bool {
                    false
                }

                #[inline]
                fn wrapping_add(self, rhs: $t) -> $t {
                    WrappingAdd::wrapping_add(&self, &rhs)
                }

                #[inline]
                fn wrapping_mul(self, rhs: $t) -> $t {
                    WrappingMul::wrapping_mul(&self, &rhs)
                }
            }
        )*
    };
}

float_element!(f32, f64);
int_element!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn integers_wrap() {
        assert_eq!(Element::wrapping_add(200u8, 100), 44);
        assert_eq!(Element::wrapping_mul(50_000i32, 50_000), -1_794_967_296);
        assert_eq!(Element::wrapping_add(i64::MAX, 1), i64::MIN);
    }

    #[test]
    fn floats_do_not() {
        assert_eq!(Element::wrapping_add(f32::MAX, f32::MAX), f32::INFINITY);
        assert!(Element::is_nan(f64::NAN));
        assert!(!Element::is_nan(3u16));
    }
}
