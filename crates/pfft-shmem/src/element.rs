//! Types that can live in the shared heap.
//!
//! Every element is stored as one 64-bit atomic word, so concurrent
//! one-sided accesses are race free; ordering between phases comes from
//! the barrier.

/// A plain value that fits in one 64-bit heap word.
pub trait Element: Copy + Send + Sync + 'static {
    /// Encode the value as a heap word.
    fn to_word(self) -> u64;

    /// Decode a heap word written by [`Element::to_word`].
    fn from_word(word: u64) -> Self;
}

impl Element for f64 {
    #[inline]
    fn to_word(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn from_word(word: u64) -> Self {
        f64::from_bits(word)
    }
}

impl Element for f32 {
    #[inline]
    fn to_word(self) -> u64 {
        u64::from(self.to_bits())
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_word(word: u64) -> Self {
        f32::from_bits(word as u32)
    }
}

macro_rules! impl_int_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                #[inline]
                #[allow(
                    clippy::cast_sign_loss,
                    clippy::cast_possible_wrap,
                    clippy::cast_lossless
                )]
                fn to_word(self) -> u64 {
                    self as u64
                }

                #[inline]
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_possible_wrap,
                    clippy::cast_sign_loss
                )]
                fn from_word(word: u64) -> Self {
                    word as $t
                }
            }
        )*
    };
}

impl_int_element!(u32, u64, usize, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_words_preserve_bits() {
        for v in [0.0f64, -0.0, 1.5, -2.25, f64::MAX, f64::MIN_POSITIVE] {
            assert_eq!(f64::from_word(v.to_word()).to_bits(), v.to_bits());
        }
        assert!(f64::from_word(f64::NAN.to_word()).is_nan());
        assert_eq!(f32::from_word(3.5f32.to_word()), 3.5);
    }

    #[test]
    fn negative_integers_survive() {
        assert_eq!(i64::from_word((-42i64).to_word()), -42);
        assert_eq!(i32::from_word(i32::MIN.to_word()), i32::MIN);
        assert_eq!(usize::from_word(usize::MAX.to_word()), usize::MAX);
    }
}
