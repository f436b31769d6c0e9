//! Map projection and coordinate transformation.
//!
//! Converts geographic coordinates (lon/lat) to map coordinates using the
//! composite "Albers USA" layout: a conic equal-area projection of the
//! conterminous states with Alaska and Hawaii drawn as insets in the lower
//! left corner. Each part clips to its own rectangle; a point outside all
//! three is not projectable.

use eframe::egui::Pos2;
use geo_types::Coord;
use std::f64::consts::{PI, TAU};

const EPSILON: f64 = 1e-6;

/// Raw conic equal-area (Albers) projection for a pair of standard parallels.
#[derive(Debug, Clone, Copy)]
struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
}

impl ConicEqualArea {
    fn new(phi0_deg: f64, phi1_deg: f64) -> Self {
        let sy0 = phi0_deg.to_radians().sin();
        let n = (sy0 + phi1_deg.to_radians().sin()) / 2.0;
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        let r0 = c.sqrt() / n;
        Self { n, c, r0 }
    }

    /// Projects (lambda, phi) in radians to unit-scale plane coordinates (y up).
    fn project(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let r = (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let theta = lambda * self.n;
        (r * theta.sin(), self.r0 - r * theta.cos())
    }
}

/// Axis-aligned clip rectangle in map coordinates.
#[derive(Debug, Clone, Copy)]
struct ClipExtent {
    min: (f64, f64),
    max: (f64, f64),
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl ClipExtent {
    fn contains(&self, (x, y): (f64, f64)) -> bool {
        self.min.0 <= x && x <= self.max.0 && self.min.1 <= y && y <= self.max.1
    }

    fn inside(&self, side: Side, (x, y): (f64, f64)) -> bool {
        match side {
            Side::Left => x >= self.min.0,
            Side::Right => x <= self.max.0,
            Side::Top => y >= self.min.1,
            Side::Bottom => y <= self.max.1,
        }
    }

    /// Where segment (a, b) meets `side`. Only called when a and b straddle it.
    fn intersect(&self, side: Side, a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
        match side {
            Side::Left | Side::Right => {
                let x = if matches!(side, Side::Left) { self.min.0 } else { self.max.0 };
                let t = (x - a.0) / (b.0 - a.0);
                (x, a.1 + t * (b.1 - a.1))
            }
            Side::Top | Side::Bottom => {
                let y = if matches!(side, Side::Top) { self.min.1 } else { self.max.1 };
                let t = (y - a.1) / (b.1 - a.1);
                (a.0 + t * (b.0 - a.0), y)
            }
        }
    }

    /// Sutherland-Hodgman clip of a ring to the rectangle.
    ///
    /// A ring already inside comes back unchanged.
    fn clip_ring(&self, ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let mut out = ring.to_vec();
        for side in [Side::Left, Side::Right, Side::Top, Side::Bottom] {
            let input = std::mem::take(&mut out);
            let Some(&last) = input.last() else {
                break;
            };
            let mut prev = last;
            for &cur in &input {
                match (self.inside(side, prev), self.inside(side, cur)) {
                    (true, true) => out.push(cur),
                    (false, true) => {
                        out.push(self.intersect(side, prev, cur));
                        out.push(cur);
                    }
                    (true, false) => out.push(self.intersect(side, prev, cur)),
                    (false, false) => {}
                }
                prev = cur;
            }
        }
        out
    }
}

/// One part of the composite: rotated, scaled, translated and clipped.
#[derive(Debug, Clone, Copy)]
struct InsetProjection {
    raw: ConicEqualArea,
    /// Longitude rotation in radians
    rotate: f64,
    k: f64,
    dx: f64,
    dy: f64,
    extent: ClipExtent,
}

impl InsetProjection {
    /// `center` is given in the rotated frame, so it maps exactly to `translate`.
    fn new(
        parallels: (f64, f64),
        rotate_deg: f64,
        center: (f64, f64),
        k: f64,
        translate: (f64, f64),
        extent: ClipExtent,
    ) -> Self {
        let raw = ConicEqualArea::new(parallels.0, parallels.1);
        let (cx, cy) = raw.project(center.0.to_radians(), center.1.to_radians());
        Self {
            raw,
            rotate: rotate_deg.to_radians(),
            k,
            dx: translate.0 - k * cx,
            dy: translate.1 + k * cy,
            extent,
        }
    }

    /// Projects without clipping. Screen y increases downward.
    fn project(&self, coord: Coord<f64>) -> (f64, f64) {
        let lambda = wrap_longitude(coord.x.to_radians() + self.rotate);
        let (x, y) = self.raw.project(lambda, coord.y.to_radians());
        (self.dx + self.k * x, self.dy - self.k * y)
    }

    /// Projects and returns the point only if it lands inside the clip extent.
    fn project_clipped(&self, coord: Coord<f64>) -> Option<(f64, f64)> {
        let p = self.project(coord);
        (p.0.is_finite() && p.1.is_finite() && self.extent.contains(p)).then_some(p)
    }
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}

/// Map projection for converting geographic to map coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Scale factor (the lower-48 map is roughly `scale` pixels wide)
    pub scale: f64,
    /// Map position of the center of the conterminous states
    pub translate: (f64, f64),
    lower48: InsetProjection,
    alaska: InsetProjection,
    hawaii: InsetProjection,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self::albers_usa(1070.0, (480.0, 250.0))
    }
}

impl MapProjection {
    /// Creates the composite projection for a scale and translation.
    pub fn albers_usa(scale: f64, translate: (f64, f64)) -> Self {
        let k = scale;
        let (x, y) = translate;

        let lower48 = InsetProjection::new(
            (29.5, 45.5),
            96.0,
            (-0.6, 38.7),
            k,
            (x, y),
            ClipExtent {
                min: (x - 0.455 * k, y - 0.238 * k),
                max: (x + 0.455 * k, y + 0.238 * k),
            },
        );

        let alaska = InsetProjection::new(
            (55.0, 65.0),
            154.0,
            (-2.0, 58.5),
            k * 0.35,
            (x - 0.307 * k, y + 0.201 * k),
            ClipExtent {
                min: (x - 0.425 * k + EPSILON, y + 0.120 * k + EPSILON),
                max: (x - 0.214 * k - EPSILON, y + 0.234 * k - EPSILON),
            },
        );

        let hawaii = InsetProjection::new(
            (8.0, 18.0),
            157.0,
            (-3.0, 19.9),
            k,
            (x - 0.205 * k, y + 0.212 * k),
            ClipExtent {
                min: (x - 0.214 * k + EPSILON, y + 0.166 * k + EPSILON),
                max: (x - 0.115 * k - EPSILON, y + 0.234 * k - EPSILON),
            },
        );

        Self {
            scale,
            translate,
            lower48,
            alaska,
            hawaii,
        }
    }

    /// Creates a projection that fills a map of the given size.
    pub fn for_map_size(width: f32, height: f32) -> Self {
        let width = width as f64;
        Self::albers_usa(width, (width / 2.0, height as f64 / 2.0))
    }

    fn insets(&self) -> [&InsetProjection; 3] {
        [&self.lower48, &self.alaska, &self.hawaii]
    }

    /// Converts geographic coordinates (lon, lat) to a map position.
    ///
    /// Returns `None` for coordinates outside the projectable region
    /// (anything not in the lower 48, Alaska or Hawaii boxes) and for
    /// non-finite input.
    pub fn project(&self, coord: Coord<f64>) -> Option<Pos2> {
        self.insets()
            .iter()
            .find_map(|inset| inset.project_clipped(coord))
            .map(|(x, y)| Pos2::new(x as f32, y as f32))
    }

    /// Projects a whole ring with a single inset so it stays connected.
    ///
    /// The inset that keeps the most vertices inside its clip box wins (ties
    /// go to lower 48, then Alaska, then Hawaii), and the ring is clipped to
    /// that box. Returns `None` when no vertex falls inside any box.
    pub fn project_ring(&self, ring: &[Coord<f64>]) -> Option<Vec<Pos2>> {
        let mut best: Option<(&InsetProjection, usize)> = None;
        for inset in self.insets() {
            let inside = ring
                .iter()
                .filter(|c| inset.project_clipped(**c).is_some())
                .count();
            if inside > best.map_or(0, |(_, n)| n) {
                best = Some((inset, inside));
            }
        }

        let (inset, _) = best?;
        let projected: Vec<(f64, f64)> = ring
            .iter()
            .map(|c| inset.project(*c))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        Some(
            inset
                .extent
                .clip_ring(&projected)
                .into_iter()
                .map(|(x, y)| Pos2::new(x as f32, y as f32))
                .collect(),
        )
    }
}
