// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f64 = 1e-9;
    pub const SQRT_3: f64 = 1.7320508075688772;
    pub const TAU: f64 = std::f64::consts::TAU;
}

/// Vergleichsfunktionen mit Toleranz
pub mod comparison {
    /// Clamping, das NaN auf die untere Grenze abbildet statt es durchzureichen
    pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
        if value.is_nan() {
            return min;
        }
        value.clamp(min, max)
    }

    /// Lineare Interpolation
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::comparison::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_handles_nan() {
        assert_eq!(clamp(f64::NAN, -1.0, 1.0), -1.0);
        assert_eq!(clamp(3.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, -1.0, 1.0), -0.5);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(-2.0, 2.0, 0.5), 0.0);
        assert_eq!(lerp(-2.0, 2.0, 0.0), -2.0);
        assert_relative_eq!(lerp(0.0, 10.0, 0.3), 3.0);
    }
}
