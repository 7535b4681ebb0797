// src/math/geometry/hexagon.rs

//! Hexagonales Gitter in axialen Koordinaten.
//!
//! Ein Gitter besteht aus einem Ursprung, zwei axialen Basisvektoren (abhängig von
//! der Orientierung) und einer reinen Funktion Axial -> 6 Eckpunkte. Es gibt keinen
//! veränderlichen Builder, alle Zellen sind einfache, unveränderliche Datensätze.

use serde::{Deserialize, Serialize};

use crate::math::types::Point2D;
use crate::math::utils::constants::SQRT_3;

/// Orientierung der Sechsecke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexOrientation {
    /// Spitze nach oben, Zeilen horizontal versetzt.
    #[default]
    Pointy,
    /// Kante nach oben, Spalten vertikal versetzt.
    Flat,
}

impl HexOrientation {
    /// Faktor Kantenlänge -> horizontaler Zellabstand.
    pub fn width_factor(self) -> f64 {
        match self {
            HexOrientation::Pointy => SQRT_3,
            HexOrientation::Flat => 1.5,
        }
    }

    /// Faktor Kantenlänge -> vertikaler Zellabstand.
    pub fn height_factor(self) -> f64 {
        match self {
            HexOrientation::Pointy => 1.5,
            HexOrientation::Flat => SQRT_3,
        }
    }

    /// Winkel der ersten Ecke in Grad.
    fn corner_angle_offset(self) -> f64 {
        match self {
            HexOrientation::Pointy => -30.0,
            HexOrientation::Flat => 0.0,
        }
    }
}

/// Axiale Hex-Koordinate (q, r).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Wandelt Offset-Koordinaten (Spalte, Zeile) in axiale um.
    /// Pointy: ungerade Zeilen sind nach rechts versetzt, Flat: ungerade Spalten nach unten.
    pub fn from_offset(col: i32, row: i32, orientation: HexOrientation) -> Self {
        match orientation {
            HexOrientation::Pointy => Self::new(col - (row - (row & 1)) / 2, row),
            HexOrientation::Flat => Self::new(col, row - (col - (col & 1)) / 2),
        }
    }

    pub fn scale(self, factor: i32) -> Self {
        Self::new(self.q * factor, self.r * factor)
    }
}

/// Abbildung axialer Koordinaten in Pixelkoordinaten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub orientation: HexOrientation,
    /// Kantenlänge (= Umkreisradius) eines Sechsecks in Pixeln.
    pub size: f64,
    pub origin: Point2D,
    basis_q: Point2D,
    basis_r: Point2D,
}

impl HexLayout {
    pub fn new(orientation: HexOrientation, size: f64, origin: Point2D) -> Self {
        let (basis_q, basis_r) = match orientation {
            HexOrientation::Pointy => (
                Point2D::new(SQRT_3 * size, 0.0),
                Point2D::new(SQRT_3 / 2.0 * size, 1.5 * size),
            ),
            HexOrientation::Flat => (
                Point2D::new(1.5 * size, SQRT_3 / 2.0 * size),
                Point2D::new(0.0, SQRT_3 * size),
            ),
        };
        Self {
            orientation,
            size,
            origin,
            basis_q,
            basis_r,
        }
    }

    /// Abstand benachbarter Spalten in Pixeln.
    pub fn column_spacing(&self) -> f64 {
        self.orientation.width_factor() * self.size
    }

    /// Abstand benachbarter Zeilen in Pixeln.
    pub fn row_spacing(&self) -> f64 {
        self.orientation.height_factor() * self.size
    }

    pub fn center(&self, hex: Axial) -> Point2D {
        self.origin + self.basis_q * hex.q as f64 + self.basis_r * hex.r as f64
    }

    pub fn corners(&self, hex: Axial) -> [Point2D; 6] {
        let center = self.center(hex);
        let offset = self.orientation.corner_angle_offset();
        std::array::from_fn(|i| {
            let angle = (60.0 * i as f64 + offset).to_radians();
            center + Point2D::new(angle.cos(), angle.sin()) * self.size
        })
    }
}

/// Eine erzeugte Gitterzelle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexCell {
    pub axial: Axial,
    pub center: Point2D,
    pub corners: [Point2D; 6],
}

/// Rechteckiger Ausschnitt eines Hex-Gitters, optional ausgedünnt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    pub layout: HexLayout,
    /// Spalten, die die Canvas-Breite abdecken (ohne Ausdünnung).
    pub columns: usize,
    /// Zeilen, die die Canvas-Höhe abdecken (ohne Ausdünnung).
    pub rows: usize,
    /// Ausdünnungsfaktor >= 1; jede axiale Koordinate wird damit multipliziert.
    pub sparse: usize,
}

impl HexGrid {
    /// Legt ein Gitter über die Canvas. `cell_width` ist die gewünschte Zellbreite
    /// in Pixeln entlang der Breitenachse der Orientierung.
    pub fn for_canvas(
        width: f64,
        height: f64,
        cell_width: f64,
        orientation: HexOrientation,
        sparse: usize,
    ) -> Self {
        let size = cell_width / orientation.width_factor();
        let layout = HexLayout::new(orientation, size, Point2D::ZERO);
        let columns = Self::cover(width, layout.column_spacing());
        let rows = Self::cover(height, layout.row_spacing());
        Self {
            layout,
            columns,
            rows,
            sparse: sparse.max(1),
        }
    }

    /// Anzahl Zellen, die eine Strecke inklusive der angeschnittenen Randzelle abdecken.
    fn cover(length: f64, spacing: f64) -> usize {
        if !(length > 0.0) || !(spacing > 0.0) {
            return 0;
        }
        ((length / spacing).ceil() as usize).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Anzahl Zellen nach Ausdünnung. `None`, wenn das Gitter zu groß für
    /// `i32`-Achsenkoordinaten ist oder das Produkt überläuft.
    pub fn cell_count(&self) -> Option<usize> {
        let (cols, rows) = self.sparse_extent()?;
        (cols as usize).checked_mul(rows as usize)
    }

    fn sparse_extent(&self) -> Option<(i32, i32)> {
        let k = self.sparse;
        // skalierte Koordinaten reichen bis knapp über `columns` bzw. `rows`
        i32::try_from(self.columns.checked_add(k)?).ok()?;
        i32::try_from(self.rows.checked_add(k)?).ok()?;
        let cols = i32::try_from(self.columns.div_ceil(k)).ok()?;
        let rows = i32::try_from(self.rows.div_ceil(k)).ok()?;
        Some((cols, rows))
    }

    /// Alle Zellen zeilenweise. Bei `sparse = k` wird ein um `k` verkleinertes
    /// Rechteck erzeugt und jede axiale Koordinate mit `k` multipliziert, dadurch
    /// entstehen Lücken statt größerer Sechsecke.
    pub fn cells(&self) -> Vec<HexCell> {
        if self.is_empty() {
            return Vec::new();
        }
        let (Some((cols, rows)), Some(count)) = (self.sparse_extent(), self.cell_count()) else {
            return Vec::new();
        };
        let k = self.sparse as i32;

        let mut cells = Vec::with_capacity(count);
        for row in 0..rows {
            for col in 0..cols {
                let axial = Axial::from_offset(col, row, self.layout.orientation).scale(k);
                cells.push(HexCell {
                    axial,
                    center: self.layout.center(axial),
                    corners: self.layout.corners(axial),
                });
            }
        }
        cells
    }
}
