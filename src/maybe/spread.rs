//! Calling a function with the elements of a tuple as separate arguments

/// A function that can be called with the elements of `A` spread as positional
/// arguments
///
/// Implemented for every `FnOnce` of arity 1 to 12 over the matching tuple, so
/// `|a, b| a + b` is `Spread<(i32, i32)>`.
///
/// # Example
///
/// ```
/// use guarded_dsp::Spread;
///
/// let sum = |a: i32, b: i32| a + b;
/// assert_eq!(sum.call_spread((3, 4)), 7);
/// ```
pub trait Spread<A> {
    /// Return type of the function
    type Output;

    /// Call the function with `args` spread out
    fn call_spread(self, args: A) -> Self::Output;
}

macro_rules! recurse {
    ($m:ident) => {};
    ($m:ident, $p:ident, $t:ident $(,$ps:ident, $ts:ident)* $(,)?) => {
        $m!($p, $t $(,$ps, $ts)*);
        recurse!($m $(,$ps, $ts)*);
    };
}

macro_rules! spread {
    ($($p:ident, $t:ident),+) => {
        impl<$($t),+, O, F: FnOnce($($t),+) -> O> Spread<($($t),+,)> for F {
            type Output = O;

            #[inline]
            fn call_spread(self, ($($p),+,): ($($t),+,)) -> O {
                self($($p),+)
            }
        }
    };
}

recurse!(
    spread, a1, A1, a2, A2, a3, A3, a4, A4, a5, A5, a6, A6, a7, A7, a8, A8, a9, A9, a10, A10,
    a11, A11, a12, A12
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element_tuple() {
        let double = |x: i32| x * 2;
        assert_eq!(double.call_spread((21,)), 42);
    }

    #[test]
    fn test_heterogeneous_arguments() {
        let describe = |name: &str, rate: u32, gain: f32| format!("{name}@{rate}:{gain:.1}");
        assert_eq!(describe.call_spread(("kick", 44100, 0.5)), "kick@44100:0.5");
    }

    #[test]
    fn test_twelve_arguments() {
        let sum = |a: u8, b: u8, c: u8, d: u8, e: u8, f: u8, g: u8, h: u8, i: u8, j: u8, k: u8, l: u8| {
            [a, b, c, d, e, f, g, h, i, j, k, l].iter().map(|&x| x as u32).sum::<u32>()
        };
        assert_eq!(sum.call_spread((1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12)), 78);
    }
}
