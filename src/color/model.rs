// src/color/model.rs

//! Farbmodelle: sRGB mit Alpha, HSLA (CSS-Konvention) und OKLab.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::error::{MathError, MathResult};
use crate::math::utils::comparison::clamp;

/// sRGB-Farbe, Kanäle 0..=255, Alpha 0..=1.
///
/// Im Szenen-Dokument entweder als `{ "r": .., "g": .., "b": .., "a": .. }` oder als
/// Hex-String `"#rrggbb"` / `"#rrggbbaa"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RgbaRepr")]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbaRepr {
    Hex(String),
    Channels {
        r: f64,
        g: f64,
        b: f64,
        #[serde(default = "opaque_alpha")]
        a: f64,
    },
}

fn opaque_alpha() -> f64 {
    1.0
}

impl TryFrom<RgbaRepr> for Rgba {
    type Error = MathError;

    fn try_from(repr: RgbaRepr) -> Result<Self, Self::Error> {
        match repr {
            RgbaRepr::Hex(hex) => Rgba::from_hex(&hex),
            RgbaRepr::Channels { r, g, b, a } => Ok(Rgba::new(r, g, b, a)),
        }
    }
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(255.0, 255.0, 255.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parst `#rgb`, `#rrggbb` oder `#rrggbbaa` (das `#` ist optional).
    pub fn from_hex(text: &str) -> MathResult<Self> {
        let digits = text.trim().trim_start_matches('#');
        let invalid = || MathError::InvalidConfiguration {
            message: format!("Invalid hex color '{text}'"),
        };
        let channel = |i: usize, width: usize| -> MathResult<f64> {
            let part = digits.get(i * width..(i + 1) * width).ok_or_else(invalid)?;
            let value = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
            let value = if width == 1 { value * 17 } else { value };
            Ok(f64::from(value))
        };

        match digits.len() {
            3 => Ok(Rgba::opaque(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Ok(Rgba::opaque(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
            8 => Ok(Rgba::new(
                channel(0, 2)?,
                channel(1, 2)?,
                channel(2, 2)?,
                channel(3, 2)? / 255.0,
            )),
            _ => Err(invalid()),
        }
    }

    /// Wandelt nach HSL: Farbton in Grad [0, 360), Sättigung und Helligkeit in Prozent.
    pub fn to_hsla(self) -> Hsla {
        let r = clamp(self.r / 255.0, 0.0, 1.0);
        let g = clamp(self.g / 255.0, 0.0, 1.0);
        let b = clamp(self.b / 255.0, 0.0, 1.0);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d == 0.0 {
            return Hsla::new(0.0, 0.0, l * 100.0, self.a);
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsla::new(h * 60.0, s * 100.0, l * 100.0, self.a)
    }

    /// Relative Luminanz (Rec. 709) der gamma-kodierten Kanäle, 0..=1.
    pub fn luminance(self) -> f64 {
        (0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b) / 255.0
    }

    pub fn to_oklab(self) -> Oklab {
        let r = srgb_to_linear(self.r / 255.0);
        let g = srgb_to_linear(self.g / 255.0);
        let b = srgb_to_linear(self.b / 255.0);

        let l = 0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b;
        let m = 0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b;
        let s = 0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b;

        let (l, m, s) = (l.cbrt(), m.cbrt(), s.cbrt());

        Oklab {
            l: 0.210_454_255_3 * l + 0.793_617_785_0 * m - 0.004_072_046_8 * s,
            a: 1.977_998_495_1 * l - 2.428_592_205_0 * m + 0.450_593_709_9 * s,
            b: 0.025_904_037_1 * l + 0.782_771_766_2 * m - 0.808_675_766_0 * s,
        }
    }

    /// Kanäle als 8-Bit-Werte, gerundet und geklemmt.
    pub fn to_u8(self) -> [u8; 4] {
        let c = |v: f64| clamp(v.round(), 0.0, 255.0) as u8;
        [c(self.r), c(self.g), c(self.b), c(self.a * 255.0)]
    }
}

/// HSLA wie in CSS: Farbton in Grad, Sättigung/Helligkeit in Prozent, Alpha 0..=1.
///
/// Werte werden nicht normalisiert. Ein Farbton von 420 oder eine Helligkeit von 110
/// ist gültig, erst [`Hsla::to_rgba`] wendet die CSS-Regeln an.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub const fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }

    /// CSS-Semantik: Farbton modulo 360, Sättigung/Helligkeit/Alpha geklemmt.
    pub fn to_rgba(self) -> Rgba {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = clamp(self.s, 0.0, 100.0) / 100.0;
        let l = clamp(self.l, 0.0, 100.0) / 100.0;
        let a = clamp(self.a, 0.0, 1.0);

        if s == 0.0 {
            let v = l * 255.0;
            return Rgba::new(v, v, v, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgba::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_rgb(p, q, h) * 255.0,
            hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
            a,
        )
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsla({}, {}%, {}%, {})", self.h, self.s, self.l, self.a)
    }
}

/// Perzeptuell gleichmäßiger Farbraum für Verläufe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Oklab {
    pub fn lerp(self, other: Oklab, t: f64) -> Oklab {
        Oklab {
            l: self.l + (other.l - self.l) * t,
            a: self.a + (other.a - self.a) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Zurück nach sRGB; Werte außerhalb des Gamuts werden geklemmt.
    pub fn to_rgba(self, alpha: f64) -> Rgba {
        let l = self.l + 0.396_337_777_4 * self.a + 0.215_803_757_3 * self.b;
        let m = self.l - 0.105_561_345_8 * self.a - 0.063_854_172_8 * self.b;
        let s = self.l - 0.089_484_177_5 * self.a - 1.291_485_548_0 * self.b;

        let (l, m, s) = (l * l * l, m * m * m, s * s * s);

        let r = 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s;
        let g = -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s;
        let b = -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s;

        let channel = |v: f64| clamp(linear_to_srgb(v), 0.0, 1.0) * 255.0;
        Rgba::new(channel(r), channel(g), channel(b), alpha)
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
