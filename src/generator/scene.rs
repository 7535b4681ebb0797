// src/generator/scene.rs

//! Deklarative Szenenbeschreibung, wie sie die Oberfläche (oder ein JSON-Dokument) liefert.
//!
//! Die Szene wird pro Generierung als unveränderlicher Schnappschuss übergeben.
//! Alle Felder haben Defaults, ein unvollständiges Dokument ist also gültig.

use serde::{Deserialize, Serialize};

use crate::color::model::Rgba;
use crate::math::error::{MathError, MathResult};
use crate::math::geometry::hexagon::{HexGrid, HexOrientation};
use crate::math::geometry::lattice::JitteredLattice;
use crate::math::probability::noise::functions::BuiltinNoise;
use crate::math::probability::noise::source::CUSTOM_NOISE_ID;
use crate::math::probability::seed::SeedResource;

/// Teiler, mit dem `cell.size` (1..=20) in eine Zellgröße in Pixeln umgerechnet wird:
/// `cellPx = size * min(width, height) / CELL_SIZE_DIVISOR`.
pub const CELL_SIZE_DIVISOR: f64 = 40.0;

/// Obergrenze für Zellen (Hexagone) bzw. Gitterpunkte (Dreiecke/Voronoi) pro Szene.
pub const MAX_CELLS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    #[default]
    Hexagons,
    Triangles,
    Voronoi,
}

/// Seed als Text oder Zahl. Text wird gehasht.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    pub fn to_resource(&self) -> SeedResource {
        match self {
            Seed::Number(n) => SeedResource::from_seed(*n),
            Seed::Text(text) => SeedResource::from_text(text),
        }
    }

    /// Numerischer Seed, Schlüssel für den Noise-Tabellen-Cache.
    pub fn value(&self) -> u64 {
        self.to_resource().seed
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Text("hexweave".to_string())
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed::Number(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_string())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellSettings {
    /// Relative Zellgröße, 1..=20.
    pub size: f64,
    pub orientation: HexOrientation,
    pub border_width: f64,
    /// Verschiebung der Gitterpunkte in Prozent (nur Dreiecke/Voronoi).
    pub variance: f64,
}

impl Default for CellSettings {
    fn default() -> Self {
        Self {
            size: 5.0,
            orientation: HexOrientation::Pointy,
            border_width: 0.0,
            variance: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseNoise {
    /// Id einer eingebauten Funktion, `custom` oder `image`.
    pub id: String,
    /// Eigener Ausdruck über `x, y, w, h`, nur bei `id = custom` benutzt.
    pub custom_fn: String,
}

impl Default for BaseNoise {
    fn default() -> Self {
        Self {
            id: BuiltinNoise::Simplex.id().to_string(),
            custom_fn: "sin(x * 3) * cos(y * 3)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoiseSettings {
    pub zoom: f64,
    pub seed: Seed,
    /// Amplituden der HSL-Verschiebung.
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub base_noise: BaseNoise,
    /// Amplitude des zweiten, unkorrelierten Zufallsanteils (0..=1).
    pub noise2_strength: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            zoom: 5.0,
            seed: Seed::default(),
            hue: 0.0,
            saturation: 0.0,
            lightness: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            base_noise: BaseNoise::default(),
            noise2_strength: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettings {
    #[serde(rename = "type")]
    pub grid_type: GridType,
    /// Ausdünnung des Hex-Gitters, >= 1.
    pub sparse: u32,
    pub sign_x: f64,
    pub sign_y: f64,
    #[serde(rename = "isXYSwapped")]
    pub is_xy_swapped: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            grid_type: GridType::Hexagons,
            sparse: 1,
            sign_x: 1.0,
            sign_y: 1.0,
            is_xy_swapped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorSettings {
    pub palette: Vec<Rgba>,
    pub is_gradient: bool,
    pub border: Rgba,
    pub background: Option<Rgba>,
    pub no_fill: bool,
    pub use_body_color: bool,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            palette: vec![
                Rgba::opaque(38.0, 70.0, 83.0),
                Rgba::opaque(42.0, 157.0, 143.0),
                Rgba::opaque(233.0, 196.0, 106.0),
                Rgba::opaque(231.0, 111.0, 81.0),
            ],
            is_gradient: false,
            border: Rgba::BLACK,
            background: None,
            no_fill: false,
            use_body_color: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    pub canvas_size: CanvasSize,
    pub cell: CellSettings,
    pub noise: NoiseSettings,
    pub grid: GridSettings,
    pub colors: ColorSettings,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_size = CanvasSize::new(width, height);
        self
    }

    pub fn with_grid(mut self, grid_type: GridType) -> Self {
        self.grid.grid_type = grid_type;
        self
    }

    pub fn with_cell_size(mut self, size: f64) -> Self {
        self.cell.size = size;
        self
    }

    pub fn with_orientation(mut self, orientation: HexOrientation) -> Self {
        self.cell.orientation = orientation;
        self
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.cell.variance = variance;
        self
    }

    pub fn with_border(mut self, width: f64, color: Rgba) -> Self {
        self.cell.border_width = width;
        self.colors.border = color;
        self
    }

    pub fn with_sparse(mut self, sparse: u32) -> Self {
        self.grid.sparse = sparse;
        self
    }

    pub fn with_mirror(mut self, sign_x: f64, sign_y: f64) -> Self {
        self.grid.sign_x = sign_x;
        self.grid.sign_y = sign_y;
        self
    }

    pub fn with_xy_swapped(mut self, swapped: bool) -> Self {
        self.grid.is_xy_swapped = swapped;
        self
    }

    pub fn with_noise(mut self, id: impl Into<String>) -> Self {
        self.noise.base_noise.id = id.into();
        self
    }

    /// Setzt einen eigenen Ausdruck und schaltet auf `custom`.
    pub fn with_custom_fn(mut self, source: impl Into<String>) -> Self {
        self.noise.base_noise.id = CUSTOM_NOISE_ID.to_string();
        self.noise.base_noise.custom_fn = source.into();
        self
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.noise.seed = seed.into();
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.noise.zoom = zoom;
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.noise.offset_x = x;
        self.noise.offset_y = y;
        self
    }

    pub fn with_jitter(mut self, hue: f64, saturation: f64, lightness: f64) -> Self {
        self.noise.hue = hue;
        self.noise.saturation = saturation;
        self.noise.lightness = lightness;
        self
    }

    pub fn with_noise2_strength(mut self, strength: f64) -> Self {
        self.noise.noise2_strength = strength;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Rgba>) -> Self {
        self.colors.palette = palette;
        self
    }

    pub fn with_gradient(mut self, is_gradient: bool) -> Self {
        self.colors.is_gradient = is_gradient;
        self
    }

    pub fn with_background(mut self, background: Option<Rgba>) -> Self {
        self.colors.background = background;
        self
    }

    pub fn with_no_fill(mut self, no_fill: bool) -> Self {
        self.colors.no_fill = no_fill;
        self
    }

    pub fn with_body_colored_border(mut self, use_body_color: bool) -> Self {
        self.colors.use_body_color = use_body_color;
        self
    }

    // =======================
    // Abgeleitete Größen
    // =======================

    /// Zellgröße in Pixeln.
    pub fn cell_px(&self) -> f64 {
        let short_side = f64::from(self.canvas_size.width.min(self.canvas_size.height));
        self.cell.size * short_side / CELL_SIZE_DIVISOR
    }

    /// Sparse-Faktor, nie kleiner als 1.
    pub fn sparse(&self) -> usize {
        self.grid.sparse.max(1) as usize
    }

    /// Hex-Gitter über die Canvas (nur für `hexagons` sinnvoll).
    pub fn hex_grid(&self) -> HexGrid {
        HexGrid::for_canvas(
            f64::from(self.canvas_size.width),
            f64::from(self.canvas_size.height),
            self.cell_px(),
            self.cell.orientation,
            self.sparse(),
        )
    }

    /// `(cellsNumW, cellsNumH)`: Anzahl Zellen pro Achse. 0 bei ungültiger Zellgröße.
    pub fn cell_counts(&self) -> (usize, usize) {
        match self.grid.grid_type {
            GridType::Hexagons => {
                let grid = self.hex_grid();
                (grid.columns, grid.rows)
            }
            GridType::Triangles | GridType::Voronoi => {
                let cell_px = self.cell_px();
                let count = |length: u32| -> usize {
                    let n = f64::from(length) / cell_px;
                    if n.is_finite() && n > 0.0 {
                        n.ceil() as usize
                    } else {
                        0
                    }
                };
                (count(self.canvas_size.width), count(self.canvas_size.height))
            }
        }
    }

    /// Meldet die erste Bedingung, unter der keine Geometrie entstehen kann.
    pub fn validate(&self) -> MathResult<()> {
        if self.canvas_size.width == 0 || self.canvas_size.height == 0 {
            return Err(MathError::DegenerateScene {
                reason: format!(
                    "canvas {}x{} has no area",
                    self.canvas_size.width, self.canvas_size.height
                ),
            });
        }

        if !(self.cell.size.is_finite() && self.cell.size > 0.0) {
            return Err(MathError::InvalidConfiguration {
                message: format!("Cell size must be positive, got {}", self.cell.size),
            });
        }

        if !(self.noise.zoom.is_finite() && self.noise.zoom > 0.0) {
            return Err(MathError::InvalidConfiguration {
                message: format!("Zoom must be positive, got {}", self.noise.zoom),
            });
        }

        if !self.cell.variance.is_finite() || !self.noise.noise2_strength.is_finite() {
            return Err(MathError::InvalidConfiguration {
                message: "Variance and noise2 strength must be finite".to_string(),
            });
        }

        if self.colors.palette.is_empty() {
            return Err(MathError::DegenerateScene {
                reason: "palette is empty".to_string(),
            });
        }

        let (columns, rows) = self.cell_counts();
        if columns == 0 || rows == 0 {
            return Err(MathError::DegenerateScene {
                reason: format!("cell counts {columns}x{rows}"),
            });
        }

        let total = match self.grid.grid_type {
            GridType::Hexagons => self.hex_grid().cell_count(),
            GridType::Triangles | GridType::Voronoi => JitteredLattice::new(
                self.cell_px(),
                columns,
                rows,
                self.cell.variance,
            )
            .point_count(),
        };
        match total {
            Some(total) if total <= MAX_CELLS => Ok(()),
            _ => Err(MathError::DegenerateScene {
                reason: format!(
                    "{columns}x{rows} cells exceed the limit of {MAX_CELLS} (cell size {})",
                    self.cell.size
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_is_valid() {
        assert!(Scene::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r##"{
            "canvasSize": { "width": 200, "height": 100 },
            "grid": { "type": "voronoi", "isXYSwapped": true },
            "noise": { "seed": 42, "noise2Strength": 0.5, "baseNoise": { "id": "diagonal" } },
            "colors": { "palette": ["#ff0000", { "r": 0, "g": 0, "b": 255, "a": 0.5 }] }
        }"##;
        let scene: Scene = serde_json::from_str(json).unwrap();

        assert_eq!(scene.canvas_size, CanvasSize::new(200, 100));
        assert_eq!(scene.grid.grid_type, GridType::Voronoi);
        assert!(scene.grid.is_xy_swapped);
        assert_eq!(scene.grid.sign_x, 1.0);
        assert_eq!(scene.noise.seed, Seed::Number(42));
        assert_eq!(scene.noise.noise2_strength, 0.5);
        assert_eq!(scene.noise.base_noise.id, "diagonal");
        assert_eq!(scene.noise.zoom, NoiseSettings::default().zoom);
        assert_eq!(scene.colors.palette.len(), 2);
        assert_eq!(scene.colors.palette[1].a, 0.5);
        assert_eq!(scene.cell, CellSettings::default());
    }

    #[test]
    fn test_text_seed_deserializes() {
        let scene: Scene = serde_json::from_str(r#"{ "noise": { "seed": "test" } }"#).unwrap();
        assert_eq!(scene.noise.seed, Seed::Text("test".to_string()));
        assert_eq!(scene.noise.seed.value(), SeedResource::from_text("test").seed);
    }

    #[test]
    fn test_lattice_cell_counts() {
        let scene = Scene::new()
            .with_canvas_size(200, 200)
            .with_grid(GridType::Triangles)
            .with_cell_size(10.0);
        assert_eq!(scene.cell_px(), 50.0);
        assert_eq!(scene.cell_counts(), (4, 4));

        let wide = scene.clone().with_canvas_size(300, 200);
        assert_eq!(wide.cell_counts(), (6, 4));
    }

    #[test]
    fn test_validate_reports_degenerate_input() {
        assert!(Scene::new().with_palette(vec![]).validate().is_err());
        assert!(Scene::new().with_cell_size(0.0).validate().is_err());
        assert!(Scene::new().with_zoom(0.0).validate().is_err());
        assert!(Scene::new().with_canvas_size(0, 10).validate().is_err());
        assert!(Scene::new().with_cell_size(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_grids() {
        for grid in [GridType::Hexagons, GridType::Triangles, GridType::Voronoi] {
            let tiny = Scene::new()
                .with_canvas_size(1000, 1000)
                .with_grid(grid)
                .with_cell_size(0.0008);
            assert!(matches!(
                tiny.validate(),
                Err(MathError::DegenerateScene { .. })
            ));

            // kleinste übliche Zellgröße bleibt erlaubt
            let small = tiny.with_canvas_size(1920, 1080).with_cell_size(1.0);
            assert!(small.validate().is_ok());
        }
    }

    #[test]
    fn test_round_trip_through_json() {
        let scene = Scene::new()
            .with_grid(GridType::Triangles)
            .with_seed("abc")
            .with_custom_fn("x * y");
        let json = serde_json::to_string(&scene).unwrap();
        assert!(json.contains("\"isXYSwapped\""));
        assert!(json.contains("\"customFn\""));
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }
}
