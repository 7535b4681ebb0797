// src/math/probability/noise/functions.rs

//! Katalog der eingebauten Noise-Funktionen.
//!
//! Jede Funktion hat die Form `f(x, y, w, h) -> Wert`, ist deterministisch und
//! liefert ungefähr [-1, 1]. Aufrufer klemmen das Ergebnis selbst.

use std::fmt;
use std::str::FromStr;

use super::simplex::SimplexNoise;
use crate::math::error::MathError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinNoise {
    Line,
    LinesSum,
    LinesMul,
    Diagonal,
    Simplex,
    CosMul,
    Circle,
    Cubic,
    Quadratic,
}

impl BuiltinNoise {
    pub const ALL: [BuiltinNoise; 9] = [
        BuiltinNoise::Line,
        BuiltinNoise::LinesSum,
        BuiltinNoise::LinesMul,
        BuiltinNoise::Diagonal,
        BuiltinNoise::Simplex,
        BuiltinNoise::CosMul,
        BuiltinNoise::Circle,
        BuiltinNoise::Cubic,
        BuiltinNoise::Quadratic,
    ];

    /// Bezeichner, wie er in Szenen-Dokumenten steht.
    pub fn id(self) -> &'static str {
        match self {
            BuiltinNoise::Line => "line",
            BuiltinNoise::LinesSum => "linesSum",
            BuiltinNoise::LinesMul => "linesMul",
            BuiltinNoise::Diagonal => "diagonal",
            BuiltinNoise::Simplex => "simplex",
            BuiltinNoise::CosMul => "cosMul",
            BuiltinNoise::Circle => "circle",
            BuiltinNoise::Cubic => "cubic",
            BuiltinNoise::Quadratic => "quadratic",
        }
    }

    /// Wertet die Funktion an `(x, y)` aus. `w`/`h` normieren nur `circle`.
    pub fn sample(self, noise: &SimplexNoise, x: f64, y: f64, w: f64, h: f64) -> f64 {
        match self {
            BuiltinNoise::Line => noise.get_noise_1d(x),
            BuiltinNoise::LinesSum => noise.get_noise_1d(x) + noise.get_noise_1d(y),
            BuiltinNoise::LinesMul => noise.get_noise_1d(x) * noise.get_noise_1d(y),
            BuiltinNoise::Diagonal => x + y,
            BuiltinNoise::Simplex => noise.get_noise_2d(x, y),
            BuiltinNoise::CosMul => {
                if x != 0.0 {
                    (y * x * 10.0).cos()
                } else {
                    (y * 10.0).cos()
                }
            }
            BuiltinNoise::Circle => ((x / w).powi(2) + (y / h).powi(2)).sqrt() - 0.5,
            BuiltinNoise::Cubic => (x.powi(3) + y).clamp(-1.0, 1.0),
            BuiltinNoise::Quadratic => (x.powi(2) + y).clamp(-1.0, 1.0),
        }
    }
}

impl fmt::Display for BuiltinNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BuiltinNoise {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinNoise::ALL
            .iter()
            .copied()
            .find(|n| n.id() == s)
            .ok_or_else(|| MathError::InvalidConfiguration {
                message: format!("Unknown noise function id '{s}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::probability::seed::SeedResource;
    use approx::assert_relative_eq;

    fn table() -> SimplexNoise {
        SimplexNoise::new(SeedResource::from_text("functions"))
    }

    #[test]
    fn test_ids_round_trip() {
        for n in BuiltinNoise::ALL {
            assert_eq!(n.id().parse::<BuiltinNoise>().unwrap(), n);
        }
        assert!("perlin".parse::<BuiltinNoise>().is_err());
    }

    #[test]
    fn test_closed_form_functions() {
        let t = table();
        assert_relative_eq!(BuiltinNoise::Diagonal.sample(&t, 0.25, 0.5, 1.0, 1.0), 0.75);
        assert_relative_eq!(
            BuiltinNoise::Circle.sample(&t, 3.0, 4.0, 1.0, 1.0),
            4.5,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            BuiltinNoise::Circle.sample(&t, 1.0, 0.0, 2.0, 1.0),
            0.0,
            epsilon = 1e-12
        );
        assert_eq!(BuiltinNoise::Cubic.sample(&t, 2.0, 0.0, 1.0, 1.0), 1.0);
        assert_relative_eq!(BuiltinNoise::Cubic.sample(&t, 0.5, -0.5, 1.0, 1.0), -0.375);
        assert_eq!(BuiltinNoise::Quadratic.sample(&t, 0.0, -3.0, 1.0, 1.0), -1.0);
        assert_relative_eq!(BuiltinNoise::Quadratic.sample(&t, 0.5, 0.25, 1.0, 1.0), 0.5);
    }

    #[test]
    fn test_cos_mul_zero_x_branch() {
        let t = table();
        assert_relative_eq!(
            BuiltinNoise::CosMul.sample(&t, 0.0, 0.3, 1.0, 1.0),
            (3.0f64).cos()
        );
        assert_relative_eq!(
            BuiltinNoise::CosMul.sample(&t, 0.5, 0.3, 1.0, 1.0),
            (1.5f64).cos()
        );
    }

    #[test]
    fn test_line_functions_share_simplex_field() {
        let t = table();
        let (x, y) = (0.37, -1.21);
        let nx = t.get_noise_2d(x, 0.0);
        let ny = t.get_noise_2d(y, 0.0);
        assert_eq!(BuiltinNoise::Line.sample(&t, x, y, 1.0, 1.0), nx);
        assert_eq!(BuiltinNoise::LinesSum.sample(&t, x, y, 1.0, 1.0), nx + ny);
        assert_eq!(BuiltinNoise::LinesMul.sample(&t, x, y, 1.0, 1.0), nx * ny);
        assert_eq!(
            BuiltinNoise::Simplex.sample(&t, x, y, 1.0, 1.0),
            t.get_noise_2d(x, y)
        );
    }
}
