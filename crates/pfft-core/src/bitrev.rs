//! Bit-reversal permutation and the bit-reversed seeding of the shared arrays.

use crate::constants::SENTINEL;
use crate::error::FftError;

/// Mirror the low `bit_width` bits of `index`.
///
/// Bits above `bit_width` are ignored; a width of zero maps everything to 0.
#[must_use]
pub const fn reverse_bits(index: usize, bit_width: u32) -> usize {
    if bit_width == 0 {
        0
    } else if bit_width >= usize::BITS {
        index.reverse_bits()
    } else {
        index.reverse_bits() >> (usize::BITS - bit_width)
    }
}

/// `floor(log2(input_size))`, or 0 for an empty size.
#[must_use]
pub const fn max_bit_width(input_size: usize) -> u32 {
    match input_size.checked_ilog2() {
        Some(width) => width,
        None => 0,
    }
}

/// Lay `samples` out in butterfly order with a leading sentinel slot.
///
/// Position `reverse_bits(i - 1, w) + 1` receives the sample at logical
/// position `i` (1-based), where `w = max_bit_width(samples.len() + 1)`.
/// Slot 0 holds [`SENTINEL`].
pub fn seed_order(samples: &[f64]) -> Result<Vec<f64>, FftError> {
    let points = samples.len();
    if !points.is_power_of_two() {
        return Err(FftError::Config(format!(
            "cannot bit-reverse {points} points: not a power of two"
        )));
    }

    let input_size = points + 1;
    let width = max_bit_width(input_size);
    let mut seeded = vec![SENTINEL; input_size];
    for (i, &sample) in samples.iter().enumerate() {
        seeded[reverse_bits(i, width) + 1] = sample;
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_known_values() {
        assert_eq!(reverse_bits(0b001, 3), 0b100);
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(1, 1), 1);
        assert_eq!(reverse_bits(5, 0), 0);
        assert_eq!(reverse_bits(1, usize::BITS), 1 << (usize::BITS - 1));
    }

    #[test]
    fn reverse_ignores_high_bits() {
        assert_eq!(reverse_bits(0b1_0001, 4), 0b1000);
    }

    #[test]
    fn max_bit_width_is_floor_log2() {
        assert_eq!(max_bit_width(0), 0);
        assert_eq!(max_bit_width(1), 0);
        assert_eq!(max_bit_width(2), 1);
        assert_eq!(max_bit_width(9), 3);
        assert_eq!(max_bit_width(17), 4);
    }

    #[test]
    fn seed_eight_points() {
        let samples: Vec<f64> = (1..=8).map(f64::from).collect();
        let seeded = seed_order(&samples).unwrap();
        assert_eq!(seeded, vec![0.0, 1.0, 5.0, 3.0, 7.0, 2.0, 6.0, 4.0, 8.0]);
    }

    #[test]
    fn seed_single_point() {
        assert_eq!(seed_order(&[4.5]).unwrap(), vec![SENTINEL, 4.5]);
    }

    #[test]
    fn seed_rejects_non_power_of_two() {
        assert!(matches!(seed_order(&[1.0, 2.0, 3.0]), Err(FftError::Config(_))));
        assert!(matches!(seed_order(&[]), Err(FftError::Config(_))));
    }
}
