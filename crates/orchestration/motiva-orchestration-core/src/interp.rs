//! Interpolation helpers: easing curves on normalized time and value
//! blending. Floats blend linearly under the eased time; text steps to the
//! target only at completion.

use crate::transition::Ease;
use motiva_api_core::Value;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Apply an easing curve to normalized time t in [0, 1].
#[inline]
pub fn ease(curve: Ease, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match curve {
        Ease::Linear => t,
        Ease::EaseIn => t * t * t,
        Ease::EaseOut => {
            let u = 1.0 - t;
            1.0 - u * u * u
        }
        Ease::EaseInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let u = -2.0 * t + 2.0;
                1.0 - u * u * u / 2.0
            }
        }
    }
}

/// Blend between two values at eased progress t.
/// Mixed kinds fall back to step behavior (hold `from` until completion).
pub fn sample(from: &Value, to: &Value, t: f32) -> Value {
    match (from, to) {
        (Value::Float(a), Value::Float(b)) => Value::Float(lerp_f32(*a, *b, t)),
        _ => {
            if t >= 1.0 {
                to.clone()
            } else {
                from.clone()
            }
        }
    }
}
