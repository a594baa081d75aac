use crate::foundation::core::Canvas;
use crate::foundation::math::{Fnv1a32, lerp};

/// Deterministic uniform stream seeded from a string.
///
/// The seed string is hashed with 32-bit FNV-1a and drives a mulberry32 generator, so the same
/// string always yields the same infinite sequence of values in `[0, 1)`.
#[derive(Clone, Debug)]
pub struct SceneRng {
    state: u32,
}

impl SceneRng {
    /// Seed from a raw 32-bit state.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from a scene-identifying string.
    pub fn from_seed_str(seed: &str) -> Self {
        let mut h = Fnv1a32::new_default();
        h.write_str(seed);
        Self::new(h.finish())
    }

    pub fn next_u32(&mut self) -> u32 {
        // mulberry32
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform value between `a` and `b`.
    pub fn range(&mut self, a: f64, b: f64) -> f64 {
        let t = self.next_f64();
        lerp(a, b, t)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        let i = (self.next_f64() * len as f64).floor() as usize;
        i.min(len.saturating_sub(1))
    }
}

/// Seed string for a question scene: stable across re-renders of the same scenario, question
/// and canvas size.
pub fn scene_seed(scenario_id: &str, question_index: u32, canvas: Canvas) -> String {
    format!(
        "{scenario_id}|q{question_index}|{}x{}",
        canvas.width, canvas.height
    )
}

/// Seed string for the closing scene of a session.
pub fn final_seed(canvas: Canvas) -> String {
    format!("final|{}x{}", canvas.width, canvas.height)
}

#[cfg(test)]
#[path = "../../tests/unit/scatter/rng.rs"]
mod tests;
