// src/math/probability/noise/simplex.rs

use rand::seq::SliceRandom;

use crate::math::probability::seed::SeedResource;
use crate::math::utils::constants::SQRT_3;

/// Gradienten für 2D-Simplex (die 12 Kantenmitten eines Würfels, z ignoriert).
const GRAD3: [[f64; 2]; 12] = [
    [1., 1.],
    [-1., 1.],
    [1., -1.],
    [-1., -1.],
    [1., 0.],
    [-1., 0.],
    [1., 0.],
    [-1., 0.],
    [0., 1.],
    [0., -1.],
    [0., 1.],
    [0., -1.],
];

/// Skalierung, damit die Ausgabe ungefähr in [-1, 1] liegt.
const OUTPUT_SCALE: f64 = 70.0;

/// Seed-abhängige 2D-Simplex-Noise.
///
/// Die Permutationstabelle wird einmal pro Seed aufgebaut und danach nur noch gelesen.
/// Ein Seed-Wechsel erzeugt eine neue Instanz, es gibt keinen Update-Pfad.
#[derive(Clone, Debug)]
pub struct SimplexNoise {
    seed: u64,
    perm: [u8; 512],
    perm_mod12: [u8; 512],
}

impl SimplexNoise {
    // =====================
    // Constructor functions
    // =====================

    /// Baut die Permutationstabelle für den gegebenen Seed.
    pub fn new(seed: SeedResource) -> Self {
        let mut rng = seed.stream("simplex-permutation");
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(rng.rng_mut());

        let mut perm = [0u8; 512];
        let mut perm_mod12 = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
            perm_mod12[i] = perm[i] % 12;
        }

        Self {
            seed: seed.seed,
            perm,
            perm_mod12,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // =======================
    // Noise generation
    // =======================

    /// 1D-Noise entlang x, mit y = 0 aus demselben Feld wie [`get_noise_2d`](Self::get_noise_2d).
    pub fn get_noise_1d(&self, x: f64) -> f64 {
        self.get_noise_2d(x, 0.0)
    }

    /// 2D-Simplex-Noise, Ergebnis ungefähr in [-1, 1].
    pub fn get_noise_2d(&self, x: f64, y: f64) -> f64 {
        let f2 = 0.5 * (SQRT_3 - 1.);
        let g2 = (3. - SQRT_3) / 6.;

        // Skew in den Simplex-Raum
        let s = (x + y) * f2;
        let i = Self::fast_floor(x + s);
        let j = Self::fast_floor(y + s);

        let t = (i + j) as f64 * g2;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);

        // Oberes oder unteres Dreieck der Zelle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + g2;
        let y1 = y0 - j1 as f64 + g2;
        let x2 = x0 - 1. + 2. * g2;
        let y2 = y0 - 1. + 2. * g2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let gi0 = self.perm_mod12[ii + self.perm[jj] as usize] as usize;
        let gi1 = self.perm_mod12[ii + i1 + self.perm[jj + j1] as usize] as usize;
        let gi2 = self.perm_mod12[ii + 1 + self.perm[jj + 1] as usize] as usize;

        let n0 = Self::corner_contribution(gi0, x0, y0);
        let n1 = Self::corner_contribution(gi1, x1, y1);
        let n2 = Self::corner_contribution(gi2, x2, y2);

        OUTPUT_SCALE * (n0 + n1 + n2)
    }

    // ==================
    // Utility functions
    // ==================

    #[inline]
    fn fast_floor(f: f64) -> i64 {
        if f >= 0. { f as i64 } else { f as i64 - 1 }
    }

    #[inline]
    fn corner_contribution(gradient_index: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0. {
            0.
        } else {
            let g = GRAD3[gradient_index];
            (t * t) * (t * t) * (g[0] * x + g[1] * y)
        }
    }
}
