// src/generator/engine.rs

//! Generierung: Szene -> Zellgeometrie -> Farbe pro Zelle -> [`PolygonBuffer`].

use std::sync::Arc;

use bevy::log::{debug, warn};

use super::buffer::PolygonBuffer;
use super::scene::{GridType, Scene};
use crate::color::model::Hsla;
use crate::color::raster::ImageRaster;
use crate::color::resolver::{ColorResolver, HslJitter};
use crate::math::geometry::{JitteredLattice, Tessellation, vertex_mean};
use crate::math::probability::noise::{NoiseField, NoiseSource, SimplexNoise};
use crate::math::probability::seed::SeededRng;
use crate::math::utils::comparison::clamp;
use crate::math::{MathResult, types::*};

/// Zusätzlicher Zoom-Teiler für Dreiecke und Voronoi gegenüber Hexagonen.
/// Bestehende Szenen hängen davon ab, deshalb bleibt der Wert bei 2.
pub const LATTICE_ZOOM_DIVISOR: f64 = 2.0;

const LATTICE_STREAM: &str = "lattice-jitter";
const NOISE2_STREAM: &str = "noise2";

/// Erzeugt den Buffer für `scene`. Schlägt nie fehl: jede Fehlerbedingung
/// (leere Palette, ungültiger Ausdruck, degenerierte Canvas) ergibt einen leeren Buffer.
pub fn generate(scene: &Scene, image: Option<&ImageRaster>) -> PolygonBuffer {
    let simplex = Arc::new(SimplexNoise::new(scene.noise.seed.to_resource()));
    generate_with_noise(scene, image, simplex)
}

/// Wie [`generate`], mit einer bereits gebauten (z.B. gecachten) Noise-Tabelle.
pub fn generate_with_noise(
    scene: &Scene,
    image: Option<&ImageRaster>,
    simplex: Arc<SimplexNoise>,
) -> PolygonBuffer {
    match try_generate(scene, image, simplex) {
        Ok(buffer) => buffer,
        Err(err) => {
            warn!("Pattern generation produced no geometry: {err}");
            PolygonBuffer::empty(scene.grid.grid_type, scene.canvas_size)
        }
    }
}

/// Fehlerbehaftete Variante, für Aufrufer, die den Grund wissen wollen.
pub fn try_generate(
    scene: &Scene,
    image: Option<&ImageRaster>,
    simplex: Arc<SimplexNoise>,
) -> MathResult<PolygonBuffer> {
    scene.validate()?;

    let seed = scene.noise.seed.to_resource();
    let simplex = if simplex.seed() == seed.seed {
        simplex
    } else {
        warn!(
            "Noise table for seed {} does not match scene seed {}, rebuilding",
            simplex.seed(),
            seed.seed
        );
        Arc::new(SimplexNoise::new(seed))
    };

    let base = &scene.noise.base_noise;
    let source = NoiseSource::resolve(&base.id, &base.custom_fn)?;
    let mut painter = CellPainter::new(scene, NoiseField::new(source, simplex), image)?;

    let buffer = match scene.grid.grid_type {
        GridType::Hexagons => hexagons(scene, &mut painter)?,
        GridType::Triangles => triangles(scene, &mut painter)?,
        GridType::Voronoi => voronoi(scene, &mut painter)?,
    };

    debug!(
        "Generated {} {:?} polygons ({} vertex values) for {}x{}",
        buffer.polygon_count(),
        buffer.grid_type(),
        buffer.vertices().len(),
        scene.canvas_size.width,
        scene.canvas_size.height
    );
    Ok(buffer)
}

fn hexagons(scene: &Scene, painter: &mut CellPainter<'_>) -> MathResult<PolygonBuffer> {
    let grid = scene.hex_grid();
    let column_spacing = grid.layout.column_spacing();
    let row_spacing = grid.layout.row_spacing();

    let mut builder = PolygonBuffer::builder(GridType::Hexagons, scene.canvas_size);
    for cell in grid.cells() {
        let color = painter.paint(
            cell.center.x / column_spacing,
            cell.center.y / row_spacing,
            1.0,
        );
        builder.push(&cell.corners, color)?;
    }
    Ok(builder.finish())
}

fn lattice_tessellation(scene: &Scene) -> MathResult<Tessellation> {
    let (columns, rows) = scene.cell_counts();
    let lattice = JitteredLattice::new(scene.cell_px(), columns, rows, scene.cell.variance);
    let canvas = Bounds2D::from_size(
        f64::from(scene.canvas_size.width),
        f64::from(scene.canvas_size.height),
    );

    let mut rng = scene.noise.seed.to_resource().stream(LATTICE_STREAM);
    let points = lattice.points(&mut rng, &canvas)?;
    debug!("Triangulating {} lattice points", points.len());
    Tessellation::new(&points)
}

fn triangles(scene: &Scene, painter: &mut CellPainter<'_>) -> MathResult<PolygonBuffer> {
    let tessellation = lattice_tessellation(scene)?;
    let cell_px = scene.cell_px();

    let mut builder = PolygonBuffer::builder(GridType::Triangles, scene.canvas_size);
    for triangle in tessellation.triangles() {
        let centroid = vertex_mean(&triangle);
        let color = painter.paint(
            centroid.x / cell_px,
            centroid.y / cell_px,
            LATTICE_ZOOM_DIVISOR,
        );
        builder.push(&triangle, color)?;
    }
    Ok(builder.finish())
}

fn voronoi(scene: &Scene, painter: &mut CellPainter<'_>) -> MathResult<PolygonBuffer> {
    let tessellation = lattice_tessellation(scene)?;
    let cell_px = scene.cell_px();
    let clip = Bounds2D::from_size(
        f64::from(scene.canvas_size.width) + cell_px,
        f64::from(scene.canvas_size.height) + cell_px,
    );

    let mut builder = PolygonBuffer::builder(GridType::Voronoi, scene.canvas_size);
    for cell in tessellation.voronoi_cells(&clip) {
        let centroid = cell.centroid();
        let color = painter.paint(
            centroid.x / cell_px,
            centroid.y / cell_px,
            LATTICE_ZOOM_DIVISOR,
        );
        builder.push(&cell.vertices, color)?;
    }
    Ok(builder.finish())
}

/// Pro Generierung einmal aufgebauter Kontext, der einer Zellposition eine Farbe gibt.
struct CellPainter<'a> {
    scene: &'a Scene,
    field: NoiseField,
    resolver: ColorResolver,
    image: Option<&'a ImageRaster>,
    noise2: SeededRng,
    columns: f64,
    rows: f64,
}

impl<'a> CellPainter<'a> {
    fn new(scene: &'a Scene, field: NoiseField, image: Option<&'a ImageRaster>) -> MathResult<Self> {
        let noise = &scene.noise;
        let resolver = ColorResolver::new(
            &scene.colors.palette,
            scene.colors.is_gradient,
            HslJitter::new(noise.hue, noise.saturation, noise.lightness),
        )?;
        let (columns, rows) = scene.cell_counts();

        Ok(Self {
            scene,
            field,
            resolver,
            image,
            noise2: noise.seed.to_resource().stream(NOISE2_STREAM),
            columns: columns as f64,
            rows: rows as f64,
        })
    }

    /// Auswertungskoordinate `(x, y, w, h)` einer Zellposition in Zelleinheiten.
    /// Spiegelung und Vertauschung betreffen nur die Auswertung, nie die Geometrie.
    fn eval_coordinates(&self, column: f64, row: f64, zoom_divisor: f64) -> (f64, f64, f64, f64) {
        let noise = &self.scene.noise;
        let grid = &self.scene.grid;
        let zoom = noise.zoom * zoom_divisor;

        let x = (column - self.columns / 2.0 + noise.offset_x) / zoom * grid.sign_x;
        let y = (row - self.rows / 2.0 + noise.offset_y) / zoom * grid.sign_y;
        let w = self.columns / zoom;
        let h = self.rows / zoom;

        if grid.is_xy_swapped {
            (y, x, h, w)
        } else {
            (x, y, w, h)
        }
    }

    fn paint(&mut self, column: f64, row: f64, zoom_divisor: f64) -> Hsla {
        // Immer ziehen, damit die Sequenz nicht von der Quelle abhängt
        let secondary = self.noise2.rnd(self.scene.noise.noise2_strength);

        if let (true, Some(raster)) = (self.field.source().is_image(), self.image) {
            let pixel = raster.sample(
                column * raster.width() as f64 / self.columns,
                row * raster.height() as f64 / self.rows,
            );
            let color = pixel.to_hsla();
            if color.is_transparent() {
                return color;
            }
            let value = clamp(pixel.luminance() * 2.0 - 1.0 + secondary, -1.0, 1.0);
            return self.resolver.jitter().apply(color, value);
        }

        let (x, y, w, h) = self.eval_coordinates(column, row, zoom_divisor);
        let base = clamp(self.field.sample(x, y, w, h), -1.0, 1.0);
        let value = clamp(base + secondary, -1.0, 1.0);
        self.resolver.resolve(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::model::Rgba;
    use crate::math::geometry::HexOrientation;

    fn two_colors() -> Vec<Rgba> {
        vec![Rgba::opaque(200.0, 30.0, 30.0), Rgba::opaque(30.0, 30.0, 200.0)]
    }

    fn painter_scene() -> Scene {
        Scene::new()
            .with_canvas_size(200, 200)
            .with_grid(GridType::Triangles)
            .with_cell_size(10.0)
            .with_zoom(10.0)
            .with_noise("diagonal")
            .with_palette(two_colors())
    }

    fn field(scene: &Scene) -> NoiseField {
        let base = &scene.noise.base_noise;
        NoiseField::new(
            NoiseSource::resolve(&base.id, &base.custom_fn).unwrap(),
            Arc::new(SimplexNoise::new(scene.noise.seed.to_resource())),
        )
    }

    #[test]
    fn test_eval_coordinates_center_is_origin() {
        let scene = painter_scene();
        let painter = CellPainter::new(&scene, field(&scene), None).unwrap();
        let (x, y, w, h) = painter.eval_coordinates(2.0, 2.0, 1.0);
        assert_eq!((x, y), (0.0, 0.0));
        assert_eq!((w, h), (0.4, 0.4));

        let (x, _, w, _) = painter.eval_coordinates(4.0, 2.0, LATTICE_ZOOM_DIVISOR);
        assert_eq!(x, 0.1);
        assert_eq!(w, 0.2);
    }

    #[test]
    fn test_eval_coordinates_mirror_and_swap() {
        let scene = painter_scene()
            .with_offset(1.0, 0.0)
            .with_mirror(-1.0, 1.0)
            .with_xy_swapped(true);
        let painter = CellPainter::new(&scene, field(&scene), None).unwrap();
        let (x, y, _, _) = painter.eval_coordinates(2.0, 3.0, 1.0);
        // vor dem Tausch: x = -(0 + 1) / 10, y = 1 / 10
        assert_eq!(x, 0.1);
        assert_eq!(y, -0.1);
    }

    #[test]
    fn test_image_mode_without_raster_uses_placeholder() {
        let scene = painter_scene().with_noise("image");
        let buffer = generate(&scene, None);
        assert!(!buffer.is_empty());
        // Platzhalter 0 -> t = 0.5, liegt durch den Schrumpffaktor noch im ersten Eimer
        let expected = two_colors()[0].to_hsla();
        for poly in buffer.polygons() {
            assert_eq!(poly.color.h as f32, expected.h as f32);
        }
    }

    #[test]
    fn test_image_mode_samples_raster() {
        let scene = painter_scene().with_noise("image");
        let raster = ImageRaster::from_rgba8(1, 1, &[0, 255, 0, 255]).unwrap();
        let buffer = generate(&scene, Some(&raster));
        for poly in buffer.polygons() {
            assert_eq!(poly.color.h, 120.0);
            assert_eq!(poly.color.a, 1.0);
        }
    }

    #[test]
    fn test_mismatched_noise_table_is_rebuilt() {
        let scene = painter_scene().with_noise("simplex").with_seed(5);
        let wrong = Arc::new(SimplexNoise::new(crate::math::probability::seed::SeedResource::from_seed(6)));
        assert_eq!(generate_with_noise(&scene, None, wrong), generate(&scene, None));
    }

    #[test]
    fn test_hex_grid_buffer() {
        let scene = Scene::new()
            .with_canvas_size(300, 200)
            .with_orientation(HexOrientation::Flat)
            .with_cell_size(4.0);
        let buffer = generate(&scene, None);
        let grid = scene.hex_grid();
        assert_eq!(buffer.polygon_count(), grid.columns * grid.rows);
        assert_eq!(buffer.vertices().len(), buffer.polygon_count() * 12);
    }

    #[test]
    fn test_errors_become_empty_buffers() {
        let invalid = painter_scene().with_custom_fn("sin(");
        assert!(try_generate(&invalid, None, Arc::new(SimplexNoise::new(invalid.noise.seed.to_resource()))).is_err());
        let buffer = generate(&invalid, None);
        assert!(buffer.is_empty());
        assert!(buffer.vertices().is_empty());
        assert_eq!(buffer.grid_type(), GridType::Triangles);
    }
}
