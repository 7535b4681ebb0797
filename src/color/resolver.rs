// src/color/resolver.rs

//! Abbildung eines Noise-Wertes in [-1, 1] auf eine HSLA-Füllfarbe.

use super::model::{Hsla, Oklab, Rgba};
use crate::math::error::{MathError, MathResult};
use crate::math::utils::comparison::clamp;

/// Faktor, der verhindert, dass `t = 1` über das letzte Palettenelement hinausläuft.
const BUCKET_SHRINK: f64 = 0.999_999;

/// Amplituden der HSL-Verschiebung, multipliziert mit dem Noise-Wert.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HslJitter {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslJitter {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// `h + H*v`, `s + S*v`, `l + L*v`, Alpha unverändert. Kein Wrapping, kein Klemmen.
    pub fn apply(&self, color: Hsla, noise: f64) -> Hsla {
        Hsla::new(
            color.h + self.hue * noise,
            color.s + self.saturation * noise,
            color.l + self.lightness * noise,
            color.a,
        )
    }
}

#[derive(Debug, Clone)]
enum Lookup {
    /// Palette bereits nach HSL umgerechnet.
    Discrete(Vec<Hsla>),
    /// Stützstellen in OKLab, gleichmäßig über [0, 1] verteilt, mit Alpha.
    Gradient(Vec<(Oklab, f64)>),
}

/// Wird einmal pro Generierung aus der Palette gebaut und dann pro Zelle abgefragt.
#[derive(Debug, Clone)]
pub struct ColorResolver {
    lookup: Lookup,
    jitter: HslJitter,
}

impl ColorResolver {
    pub fn new(palette: &[Rgba], is_gradient: bool, jitter: HslJitter) -> MathResult<Self> {
        if palette.is_empty() {
            return Err(MathError::DegenerateScene {
                reason: "palette is empty".to_string(),
            });
        }

        let lookup = if is_gradient {
            Lookup::Gradient(palette.iter().map(|c| (c.to_oklab(), c.a)).collect())
        } else {
            Lookup::Discrete(palette.iter().map(|c| c.to_hsla()).collect())
        };

        Ok(Self { lookup, jitter })
    }

    pub fn jitter(&self) -> &HslJitter {
        &self.jitter
    }

    /// Noise-Wert -> Parameter `t` in [0, 1]. NaN landet bei 0.
    pub fn noise_to_t(noise: f64) -> f64 {
        clamp((noise + 1.0) / 2.0, 0.0, 1.0)
    }

    /// Index in eine diskrete Palette der Länge `len`, immer in `[0, len - 1]`.
    pub fn bucket_index(noise: f64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let t = Self::noise_to_t(noise);
        let raw = (t * BUCKET_SHRINK * len as f64).floor();
        clamp(raw, 0.0, (len - 1) as f64) as usize
    }

    /// Farbe vor der HSL-Verschiebung.
    pub fn base_color(&self, noise: f64) -> Hsla {
        match &self.lookup {
            Lookup::Discrete(colors) => colors[Self::bucket_index(noise, colors.len())],
            Lookup::Gradient(stops) => Self::sample_gradient(stops, Self::noise_to_t(noise)),
        }
    }

    /// Vollständig aufgelöste Farbe. Ein voll transparenter Grundton wird ohne
    /// Verschiebung zurückgegeben, der Rasterizer überspringt ihn ohnehin.
    pub fn resolve(&self, noise: f64) -> Hsla {
        let base = self.base_color(noise);
        if base.is_transparent() {
            return base;
        }
        self.jitter.apply(base, noise)
    }

    fn sample_gradient(stops: &[(Oklab, f64)], t: f64) -> Hsla {
        let (first_lab, first_alpha) = stops[0];
        if stops.len() == 1 {
            return first_lab.to_rgba(first_alpha).to_hsla();
        }

        let segments = (stops.len() - 1) as f64;
        let position = t * segments;
        let index = clamp(position.floor(), 0.0, segments - 1.0) as usize;
        let local = position - index as f64;

        let (lab_a, alpha_a) = stops[index];
        let (lab_b, alpha_b) = stops[index + 1];
        let alpha = alpha_a + (alpha_b - alpha_a) * local;
        lab_a.lerp(lab_b, local).to_rgba(alpha).to_hsla()
    }
}
