//! Easing function catalogue
//!
//! Classic four-argument easing curves: `(elapsed, start, delta, total)` in
//! logical animation frames. Families are addressed by dotted names
//! (`"Quad.easeOut"`, `"Bounce.easeOut"`); `"Linear"` stands alone. Unknown
//! names are a schedule-time configuration error, never a silent default:
//! a missing mapping renders as a frozen no-op animation, the defect class
//! the fail-fast path exists to catch.

use thiserror::Error;

/// Fatal configuration errors raised at schedule time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown easing `{0}`")]
    UnknownEasing(String),
}

/// An easing curve from the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    BounceOut,
}

impl Easing {
    /// Resolve a `Family.Variant` name (or bare `Linear`).
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "Linear" => Ok(Easing::Linear),
            "Quad.easeIn" => Ok(Easing::QuadIn),
            "Quad.easeOut" => Ok(Easing::QuadOut),
            "Quad.easeInOut" => Ok(Easing::QuadInOut),
            "Cubic.easeIn" => Ok(Easing::CubicIn),
            "Cubic.easeOut" => Ok(Easing::CubicOut),
            "Bounce.easeOut" => Ok(Easing::BounceOut),
            _ => Err(ConfigError::UnknownEasing(name.to_string())),
        }
    }

    /// Evaluate the curve: `t` elapsed frames out of `d`, start value `b`,
    /// total change `c`. A zero-length animation holds its start value; the
    /// scheduler emits the terminal value separately.
    pub fn apply(self, t: f32, b: f32, c: f32, d: f32) -> f32 {
        if d <= 0.0 {
            return b;
        }
        match self {
            Easing::Linear => c * t / d + b,
            Easing::QuadIn => {
                let t = t / d;
                c * t * t + b
            }
            Easing::QuadOut => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Easing::QuadInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t + b
                } else {
                    let t = t - 1.0;
                    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
                }
            }
            Easing::CubicIn => {
                let t = t / d;
                c * t * t * t + b
            }
            Easing::CubicOut => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            Easing::BounceOut => {
                let t = t / d;
                if t < 1.0 / 2.75 {
                    c * (7.5625 * t * t) + b
                } else if t < 2.0 / 2.75 {
                    let t = t - 1.5 / 2.75;
                    c * (7.5625 * t * t + 0.75) + b
                } else if t < 2.5 / 2.75 {
                    let t = t - 2.25 / 2.75;
                    c * (7.5625 * t * t + 0.9375) + b
                } else {
                    let t = t - 2.625 / 2.75;
                    c * (7.5625 * t * t + 0.984375) + b
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0, 5.0, 10.0, 60.0), 5.0);
        assert_eq!(Easing::Linear.apply(60.0, 5.0, 10.0, 60.0), 15.0);
        assert_eq!(Easing::Linear.apply(30.0, 5.0, 10.0, 60.0), 10.0);
    }

    #[test]
    fn test_all_curves_hit_endpoints() {
        let curves = [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::BounceOut,
        ];
        for curve in curves {
            let start = curve.apply(0.0, 2.0, 8.0, 40.0);
            let end = curve.apply(40.0, 2.0, 8.0, 40.0);
            assert!((start - 2.0).abs() < 1e-4, "{curve:?} start = {start}");
            assert!((end - 10.0).abs() < 1e-4, "{curve:?} end = {end}");
        }
    }

    #[test]
    fn test_quad_out_decelerates() {
        // Ease-out covers more ground in the first half than the second
        let mid = Easing::QuadOut.apply(30.0, 0.0, 100.0, 60.0);
        assert!(mid > 50.0);
    }

    #[test]
    fn test_name_resolution() {
        assert_eq!(Easing::from_name("Linear"), Ok(Easing::Linear));
        assert_eq!(Easing::from_name("Bounce.easeOut"), Ok(Easing::BounceOut));
        assert_eq!(Easing::from_name("Quad.easeInOut"), Ok(Easing::QuadInOut));
    }

    #[test]
    fn test_unknown_name_fails_fast() {
        assert_eq!(
            Easing::from_name("Elastic.easeOut"),
            Err(ConfigError::UnknownEasing("Elastic.easeOut".to_string()))
        );
        // Family without a variant is not silently coerced
        assert!(Easing::from_name("Quad").is_err());
        assert!(Easing::from_name("linear").is_err());
    }

    #[test]
    fn test_zero_duration_holds_start() {
        assert_eq!(Easing::Linear.apply(0.0, 3.0, 7.0, 0.0), 3.0);
    }
}
