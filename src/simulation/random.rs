use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`.
///
/// The simulation only ever asks for plain unit floats, so tests can script
/// exact sequences without reproducing a PRNG.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Default source backed by `StdRng`.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Clamps a draw into `[0, 1)` so a misbehaving source cannot push values out of range.
pub(crate) fn unit(rng: &mut dyn RandomSource) -> f64 {
    let value = rng.next_f64();
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Uniform integer in `[min, min + span)`.
pub(crate) fn uniform_u32(rng: &mut dyn RandomSource, min: u32, span: u32) -> u32 {
    let offset = (unit(rng) * f64::from(span)).floor() as u32;
    min + offset.min(span.saturating_sub(1))
}

/// Uniform index into a collection of `len` items.
pub(crate) fn pick_index(rng: &mut dyn RandomSource, len: usize) -> usize {
    let index = (unit(rng) * len as f64).floor() as usize;
    index.min(len.saturating_sub(1))
}
