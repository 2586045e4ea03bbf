//! Stage schedule and the butterfly at one global index.

use std::f64::consts::PI;

use num_complex::Complex64;

/// One butterfly stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// 1-based stage number.
    pub index: u32,
    /// Distance between butterfly partners, `2^(index - 1)`.
    pub span: usize,
}

/// Iterator over the stages of a transform, spans 1, 2, 4, ...
#[derive(Debug, Clone)]
pub struct StageSchedule {
    next: u32,
    total: u32,
}

impl StageSchedule {
    /// Schedule of `total` stages.
    #[must_use]
    pub fn new(total: u32) -> Self {
        Self { next: 1, total }
    }
}

impl Iterator for StageSchedule {
    type Item = Stage;

    fn next(&mut self) -> Option<Stage> {
        if self.next > self.total {
            return None;
        }
        let stage = Stage {
            index: self.next,
            span: 1 << (self.next - 1),
        };
        self.next += 1;
        Some(stage)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total + 1 - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for StageSchedule {}

/// Partners and twiddle angle of the butterfly writing global index `index`.
///
/// Within each block of `2 * span` indices the first half takes
/// `odd + w * even` and the second half `odd - w * even`, with
/// `w = e^{-i * angle}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Butterfly {
    /// Global index written by this butterfly.
    pub index: usize,
    /// Index of the first-half partner.
    pub odd: usize,
    /// Index of the second-half partner.
    pub even: usize,
    /// Twiddle angle in radians.
    pub angle: f64,
}

impl Butterfly {
    /// Butterfly for 1-based global `index` at stage span `span`.
    #[must_use]
    pub fn at(index: usize, span: usize) -> Self {
        let group_position = (index + span - 1) / span;
        let is_even_group = group_position % 2;
        let is_odd_group = 1 - is_even_group;
        #[allow(clippy::cast_precision_loss)]
        let angle = PI * ((index - 1) % (2 * span)) as f64 / span as f64;
        Self {
            index,
            odd: index - span * is_odd_group,
            even: index + span * is_even_group,
            angle,
        }
    }

    /// Combine the partner values.
    #[must_use]
    pub fn combine(&self, odd: Complex64, even: Complex64) -> Complex64 {
        let (sin, cos) = self.angle.sin_cos();
        Complex64::new(
            odd.re + cos * even.re + sin * even.im,
            odd.im + cos * even.im - sin * even.re,
        )
    }
}
