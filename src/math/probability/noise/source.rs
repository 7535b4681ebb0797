// src/math/probability/noise/source.rs

use std::sync::Arc;

use super::expression::CompiledExpression;
use super::functions::BuiltinNoise;
use super::simplex::SimplexNoise;
use crate::math::error::MathResult;

/// Id, unter der eine Szene einen eigenen Ausdruck verlangt.
pub const CUSTOM_NOISE_ID: &str = "custom";
/// Id für den Bild-Modus.
pub const IMAGE_NOISE_ID: &str = "image";

/// Konstanter Wert, den der Bild-Modus als Noise liefert.
/// Ohne geladenes Bild wird damit trotzdem Geometrie erzeugt.
pub const IMAGE_PLACEHOLDER_VALUE: f64 = 0.0;

/// Quelle des Basis-Noise einer Szene.
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseSource {
    Builtin(BuiltinNoise),
    Expression(CompiledExpression),
    Image,
}

impl NoiseSource {
    /// Löst `id` (und ggf. den eigenen Ausdruck) einmal pro Generierung auf.
    /// Ungültige Ausdrücke und unbekannte Ids liefern einen Fehler, den der
    /// Aufrufer in einen leeren Buffer übersetzt.
    pub fn resolve(id: &str, custom_fn: &str) -> MathResult<Self> {
        match id {
            CUSTOM_NOISE_ID => Ok(NoiseSource::Expression(CompiledExpression::compile(
                custom_fn,
            )?)),
            IMAGE_NOISE_ID => Ok(NoiseSource::Image),
            other => Ok(NoiseSource::Builtin(other.parse()?)),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, NoiseSource::Image)
    }
}

/// Aufgelöste Noise-Funktion: Quelle plus die seed-abhängige Simplex-Tabelle.
#[derive(Debug, Clone)]
pub struct NoiseField {
    source: NoiseSource,
    simplex: Arc<SimplexNoise>,
}

impl NoiseField {
    pub fn new(source: NoiseSource, simplex: Arc<SimplexNoise>) -> Self {
        Self { source, simplex }
    }

    pub fn source(&self) -> &NoiseSource {
        &self.source
    }

    pub fn sample(&self, x: f64, y: f64, w: f64, h: f64) -> f64 {
        match &self.source {
            NoiseSource::Builtin(builtin) => builtin.sample(&self.simplex, x, y, w, h),
            NoiseSource::Expression(expr) => expr.evaluate(x, y, w, h),
            NoiseSource::Image => IMAGE_PLACEHOLDER_VALUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::error::MathError;
    use crate::math::probability::seed::SeedResource;

    fn simplex() -> Arc<SimplexNoise> {
        Arc::new(SimplexNoise::new(SeedResource::from_seed(1)))
    }

    #[test]
    fn test_resolve_variants() {
        assert_eq!(
            NoiseSource::resolve("diagonal", "").unwrap(),
            NoiseSource::Builtin(BuiltinNoise::Diagonal)
        );
        assert!(NoiseSource::resolve("image", "").unwrap().is_image());
        assert!(matches!(
            NoiseSource::resolve("custom", "x * y").unwrap(),
            NoiseSource::Expression(_)
        ));
    }

    #[test]
    fn test_resolve_failures() {
        assert!(matches!(
            NoiseSource::resolve("custom", "x +* y"),
            Err(MathError::InvalidExpression(_))
        ));
        assert!(matches!(
            NoiseSource::resolve("nope", ""),
            Err(MathError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_field_sampling() {
        let field = NoiseField::new(NoiseSource::resolve("custom", "x - y").unwrap(), simplex());
        assert_eq!(field.sample(0.75, 0.25, 1.0, 1.0), 0.5);

        let image = NoiseField::new(NoiseSource::Image, simplex());
        assert_eq!(image.sample(3.0, 4.0, 1.0, 1.0), IMAGE_PLACEHOLDER_VALUE);
    }
}
