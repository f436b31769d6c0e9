//! Map layout and rendering.
//!
//! State outlines are projected and triangulated once per boundary load, in
//! unit map space (map width 1). The map layout is a pure scale of that space,
//! so a width change only rescales the cached shapes and re-places markers.
//! Painting translates the cached layout into egui shapes.

use super::triangulate::{ring_contains, simplify_ring, triangulate_polygon};
use super::{GeoLayer, MapProjection};
use crate::data::ResortRecord;
use crate::ui::colors;
use eframe::egui::{Color32, Mesh, Painter, Pos2, Shape, Stroke, Vec2};
use geo_types::Coord;

/// Map height as a fraction of map width.
pub const MAP_RATIO: f32 = 0.5;
/// Margin around the map inside the drawing surface.
pub const MARGIN: f32 = 10.0;
/// Marker radius at rest.
pub const MARKER_RADIUS: f32 = 5.0;
/// Marker radius while hovered.
pub const MARKER_HOVER_RADIUS: f32 = 10.0;

/// Projected vertices closer than this (in pixels) are merged.
const MIN_SEGMENT_PX: f32 = 0.5;
/// Map width at which `MIN_SEGMENT_PX` is applied to the unit-space outlines.
const REFERENCE_MAP_WIDTH: f32 = 2000.0;

/// One projected polygon with its fill triangulation.
///
/// Triangle indices refer to the exterior followed by each hole.
#[derive(Debug, Clone)]
pub struct ProjectedPolygon {
    pub exterior: Vec<Pos2>,
    pub holes: Vec<Vec<Pos2>>,
    triangles: Vec<[u32; 3]>,
}

impl ProjectedPolygon {
    fn contains(&self, p: Pos2) -> bool {
        ring_contains(&self.exterior, p) && !self.holes.iter().any(|h| ring_contains(h, p))
    }

    fn vertices(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.exterior
            .iter()
            .chain(self.holes.iter().flatten())
            .copied()
    }

    fn transformed(&self, f: impl Fn(Pos2) -> Pos2) -> Self {
        Self {
            exterior: self.exterior.iter().map(|p| f(*p)).collect(),
            holes: self
                .holes
                .iter()
                .map(|h| h.iter().map(|p| f(*p)).collect())
                .collect(),
            triangles: self.triangles.clone(),
        }
    }
}

/// A state drawn on the surface.
#[derive(Debug, Clone)]
pub struct StateShape {
    pub name: Option<String>,
    pub polygons: Vec<ProjectedPolygon>,
    pub fill: Color32,
}

/// A resort marker; `record` indexes the record list it was placed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub record: usize,
    pub pos: Pos2,
}

/// The single drawing surface: its size, projection and cached layout.
///
/// Positions are local to the surface's top-left corner and already include
/// the margin.
#[derive(Debug, Clone)]
pub struct MapSurface {
    pub container_width: f32,
    pub size: Vec2,
    pub projection: MapProjection,
    pub shapes: Vec<StateShape>,
    pub markers: Vec<Marker>,
}

impl MapSurface {
    fn new(container_width: f32) -> Self {
        let (size, projection) = layout_for_width(container_width);
        Self {
            container_width,
            size,
            projection,
            shapes: Vec::new(),
            markers: Vec::new(),
        }
    }

    fn relayout(&mut self, container_width: f32) {
        let (size, projection) = layout_for_width(container_width);
        self.container_width = container_width;
        self.size = size;
        self.projection = projection;
    }

    fn to_local(&self, p: Pos2) -> Pos2 {
        p + Vec2::splat(MARGIN)
    }

    fn map_width(&self) -> f32 {
        self.size.x - 2.0 * MARGIN
    }

    /// Places unit-space shapes on this surface.
    fn scale_shapes(&self, unit_shapes: &[StateShape]) -> Vec<StateShape> {
        let width = self.map_width();
        unit_shapes
            .iter()
            .map(|shape| StateShape {
                name: shape.name.clone(),
                polygons: shape
                    .polygons
                    .iter()
                    .map(|p| p.transformed(|v| self.to_local(Pos2::new(v.x * width, v.y * width))))
                    .collect(),
                fill: shape.fill,
            })
            .collect()
    }
}

/// Surface size and projection for a container width.
fn layout_for_width(container_width: f32) -> (Vec2, MapProjection) {
    let width = (container_width - 2.0 * MARGIN).max(1.0);
    let height = width * MAP_RATIO;
    (
        Vec2::new(width + 2.0 * MARGIN, height + 2.0 * MARGIN),
        MapProjection::for_map_size(width, height),
    )
}

/// Owns the map surface and the inputs needed to rebuild its layout.
#[derive(Default)]
pub struct MapView {
    surface: Option<MapSurface>,
    /// Projected and triangulated boundaries at map width 1
    unit_shapes: Vec<StateShape>,
    coords: Vec<Option<Coord<f64>>>,
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self) -> Option<&MapSurface> {
        self.surface.as_ref()
    }

    /// Creates the drawing surface if there is none yet.
    ///
    /// Returns `true` only when a surface was created.
    pub fn mount(&mut self, container_width: f32) -> bool {
        if self.surface.is_some() {
            return false;
        }

        log::debug!("Mounting map surface at width {}", container_width);
        self.surface = Some(MapSurface::new(container_width));
        self.rebuild_shapes();
        self.rebuild_markers();
        true
    }

    /// Recomputes projection, shapes and markers for a new container width.
    pub fn resize(&mut self, container_width: f32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if (surface.container_width - container_width).abs() < 0.5 {
            return;
        }

        log::debug!(
            "Resizing map surface {} -> {}",
            surface.container_width,
            container_width
        );
        surface.relayout(container_width);
        self.rebuild_shapes();
        self.rebuild_markers();
    }

    /// Replaces the state boundaries.
    pub fn set_boundaries(&mut self, layer: GeoLayer) {
        self.unit_shapes = build_unit_shapes(&layer);
        self.rebuild_shapes();
    }

    /// Places one marker per record whose coordinates project.
    ///
    /// Records that cannot be projected are skipped with a warning.
    pub fn set_records(&mut self, records: &[ResortRecord]) {
        self.coords = records.iter().map(ResortRecord::coord).collect();
        self.rebuild_markers();

        let projection = self
            .surface
            .as_ref()
            .map(|s| s.projection.clone())
            .unwrap_or_default();
        for (record, coord) in records.iter().zip(&self.coords) {
            if coord.and_then(|c| projection.project(c)).is_none() {
                log::warn!(
                    "Coordinates could not be projected for {} ({:?}, {:?})",
                    record.name,
                    record.lon,
                    record.lat
                );
            }
        }
    }

    fn rebuild_shapes(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.shapes = surface.scale_shapes(&self.unit_shapes);
        }
    }

    fn rebuild_markers(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.markers = place_markers(&self.coords, surface);
        }
    }

    /// Topmost marker under a surface-local position.
    ///
    /// `radius` gives each marker's hit radius by record index.
    pub fn marker_at(&self, local: Pos2, radius: impl Fn(usize) -> f32) -> Option<Marker> {
        let surface = self.surface.as_ref()?;
        surface
            .markers
            .iter()
            .rev()
            .find(|m| {
                let r = radius(m.record);
                m.pos.distance_sq(local) <= r * r
            })
            .copied()
    }

    /// Name of the state under a surface-local position.
    pub fn state_at(&self, local: Pos2) -> Option<&str> {
        let surface = self.surface.as_ref()?;
        surface
            .shapes
            .iter()
            .find(|s| s.polygons.iter().any(|p| p.contains(local)))
            .and_then(|s| s.name.as_deref())
    }

    /// Paints states and markers with the surface's top-left at `origin`.
    ///
    /// `marker_radius` maps a record index to its current radius.
    pub fn paint(&self, painter: &Painter, origin: Pos2, marker_radius: impl Fn(usize) -> f32) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let offset = origin.to_vec2();
        let dark_mode = painter.ctx().style().visuals.dark_mode;
        let outline = Stroke::new(0.8, colors::map::state_outline(dark_mode));

        for shape in &surface.shapes {
            for polygon in &shape.polygons {
                let mut mesh = Mesh::default();
                for p in polygon.vertices() {
                    mesh.colored_vertex(p + offset, shape.fill);
                }
                for [a, b, c] in &polygon.triangles {
                    mesh.add_triangle(*a, *b, *c);
                }
                painter.add(Shape::mesh(mesh));

                for ring in std::iter::once(&polygon.exterior).chain(&polygon.holes) {
                    let points: Vec<Pos2> = ring.iter().map(|p| *p + offset).collect();
                    painter.add(Shape::closed_line(points, outline));
                }
            }
        }

        for marker in &surface.markers {
            let pos = marker.pos + offset;
            let radius = marker_radius(marker.record);
            painter.circle_filled(pos, radius, colors::map::MARKER);
            painter.circle_stroke(pos, radius, Stroke::new(0.3, colors::map::MARKER_STROKE));
        }
    }
}

/// Projects and triangulates every boundary feature at map width 1.
fn build_unit_shapes(layer: &GeoLayer) -> Vec<StateShape> {
    let projection = MapProjection::for_map_size(1.0, MAP_RATIO);
    let min_step = MIN_SEGMENT_PX / REFERENCE_MAP_WIDTH;

    let project_ring = |ring: &[Coord<f64>]| -> Option<Vec<Pos2>> {
        let projected = projection.project_ring(ring)?;
        let ring = simplify_ring(&projected, min_step);
        (ring.len() >= 3).then_some(ring)
    };

    layer
        .features
        .iter()
        .enumerate()
        .map(|(idx, feature)| {
            let polygons = feature
                .shape
                .0
                .iter()
                .filter_map(|polygon| {
                    let exterior = project_ring(&polygon.exterior().0)?;
                    let holes: Vec<Vec<Pos2>> = polygon
                        .interiors()
                        .iter()
                        .filter_map(|h| project_ring(&h.0))
                        .collect();
                    let triangles = triangulate_polygon(&exterior, &holes);
                    Some(ProjectedPolygon {
                        exterior,
                        holes,
                        triangles,
                    })
                })
                .collect();

            StateShape {
                name: feature.name.clone(),
                polygons,
                fill: colors::map::state_fill(idx),
            }
        })
        .collect()
}

/// Places a marker for every coordinate that projects.
fn place_markers(coords: &[Option<Coord<f64>>], surface: &MapSurface) -> Vec<Marker> {
    coords
        .iter()
        .enumerate()
        .filter_map(|(record, coord)| {
            let pos = surface.projection.project((*coord)?)?;
            Some(Marker {
                record,
                pos: surface.to_local(pos),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTAH: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "Utah" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-114.05, 42.0], [-111.05, 42.0], [-111.05, 41.0],
                                 [-109.05, 41.0], [-109.05, 37.0], [-114.05, 37.0],
                                 [-114.05, 42.0]]]
            }
        }, {
            "type": "Feature",
            "properties": { "name": "Colorado" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-109.05, 41.0], [-102.05, 41.0], [-102.05, 37.0],
                                 [-109.05, 37.0], [-109.05, 41.0]]]
            }
        }]
    }"#;

    fn record(name: &str, state: &str, lon: Option<f64>, lat: Option<f64>) -> ResortRecord {
        ResortRecord {
            name: name.to_string(),
            state: state.to_string(),
            snowfall_72h: "0\"".to_string(),
            base_depth: "0\"".to_string(),
            trails_open: "0".to_string(),
            lon,
            lat,
        }
    }

    fn alta() -> ResortRecord {
        record("Alta", "UT", Some(-111.8), Some(40.6))
    }

    #[test]
    fn test_alta_marker_lands_in_utah() {
        let mut view = MapView::new();
        assert!(view.mount(960.0));
        view.set_boundaries(GeoLayer::from_geojson(UTAH).unwrap());
        view.set_records(&[alta()]);

        let surface = view.surface().unwrap();
        assert_eq!(surface.shapes.len(), 2);
        assert_eq!(surface.markers.len(), 1);

        let marker = surface.markers[0];
        assert_eq!(marker.record, 0);
        assert_eq!(view.state_at(marker.pos), Some("Utah"));
    }

    #[test]
    fn test_unprojectable_records_get_no_marker() {
        let mut view = MapView::new();
        view.mount(800.0);
        view.set_records(&[
            record("Verbier", "VS", Some(7.22), Some(46.1)),
            alta(),
            record("Mystery Hill", "??", None, Some(40.0)),
            record("Bad Data", "??", Some(f64::NAN), Some(f64::INFINITY)),
        ]);

        let markers = &view.surface().unwrap().markers;
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].record, 1);
    }

    #[test]
    fn test_mount_is_idempotent_across_resizes() {
        let mut view = MapView::new();
        assert!(view.surface().is_none());
        assert!(view.mount(800.0));
        view.resize(1200.0);
        assert!(!view.mount(1200.0));
        assert!(!view.mount(600.0));

        // The second mount must not have replaced the resized surface
        assert_eq!(view.surface().unwrap().container_width, 1200.0);
    }

    #[test]
    fn test_resize_repositions_markers_and_shapes() {
        let mut view = MapView::new();
        view.mount(500.0);
        view.set_boundaries(GeoLayer::from_geojson(UTAH).unwrap());
        view.set_records(&[alta()]);
        let small = view.surface().unwrap().markers[0].pos;

        view.resize(1000.0);
        let surface = view.surface().unwrap();
        let large = surface.markers[0].pos;

        // Map width scales from 480 to 980 inside the margins
        let ratio = 980.0 / 480.0;
        assert!(((large.x - MARGIN) - (small.x - MARGIN) * ratio).abs() < 0.5);
        assert!(((large.y - MARGIN) - (small.y - MARGIN) * ratio).abs() < 0.5);
        assert_eq!(surface.size, Vec2::new(1000.0, 510.0));
        assert_eq!(view.state_at(large), Some("Utah"));
    }

    #[test]
    fn test_resize_before_mount_does_nothing() {
        let mut view = MapView::new();
        view.resize(800.0);
        assert!(view.surface().is_none());
    }

    #[test]
    fn test_records_before_mount_are_placed_on_mount() {
        let mut view = MapView::new();
        view.set_records(&[alta()]);
        view.mount(800.0);
        assert_eq!(view.surface().unwrap().markers.len(), 1);
    }

    #[test]
    fn test_marker_hit_testing() {
        let mut view = MapView::new();
        view.mount(800.0);
        view.set_records(&[alta()]);
        let pos = view.surface().unwrap().markers[0].pos;
        let at_rest = |_: usize| MARKER_RADIUS;
        let hovered = |_: usize| MARKER_HOVER_RADIUS;

        assert_eq!(
            view.marker_at(pos + Vec2::new(3.0, 0.0), at_rest)
                .map(|m| m.record),
            Some(0)
        );
        // Between the resting and hovered radius only a hovered marker hits
        assert!(view.marker_at(pos + Vec2::new(7.0, 0.0), at_rest).is_none());
        assert!(view.marker_at(pos + Vec2::new(7.0, 0.0), hovered).is_some());
        assert!(view.marker_at(pos + Vec2::new(30.0, 0.0), hovered).is_none());
    }

    const DONUT: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "Donut" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[-110.0, 35.0], [-100.0, 35.0], [-100.0, 45.0], [-110.0, 45.0], [-110.0, 35.0]],
                    [[-107.0, 38.0], [-103.0, 38.0], [-103.0, 42.0], [-107.0, 42.0], [-107.0, 38.0]]
                ]
            }
        }]
    }"#;

    fn fill_covers(polygon: &ProjectedPolygon, p: Pos2) -> bool {
        let vertices: Vec<Pos2> = polygon.vertices().collect();
        polygon.triangles.iter().any(|t| {
            let [a, b, c] = t.map(|i| vertices[i as usize]);
            let d1 = (b - a).x * (p - a).y - (b - a).y * (p - a).x;
            let d2 = (c - b).x * (p - b).y - (c - b).y * (p - b).x;
            let d3 = (a - c).x * (p - c).y - (a - c).y * (p - c).x;
            (d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0) || (d1 <= 0.0 && d2 <= 0.0 && d3 <= 0.0)
        })
    }

    #[test]
    fn test_holes_are_not_filled() {
        let mut view = MapView::new();
        view.mount(1000.0);
        view.set_boundaries(GeoLayer::from_geojson(DONUT).unwrap());
        view.set_records(&[
            record("Hole", "??", Some(-105.0), Some(40.0)),
            record("Ring", "??", Some(-108.5), Some(40.0)),
        ]);

        let surface = view.surface().unwrap();
        let polygon = &surface.shapes[0].polygons[0];
        assert_eq!(polygon.holes.len(), 1);

        let hole = surface.markers[0].pos;
        assert_eq!(view.state_at(hole), None);
        assert!(!fill_covers(polygon, hole));

        let ring = surface.markers[1].pos;
        assert_eq!(view.state_at(ring), Some("Donut"));
        assert!(fill_covers(polygon, ring));
    }

    #[test]
    fn test_resize_rescales_cached_triangulation() {
        let mut view = MapView::new();
        view.mount(500.0);
        view.set_boundaries(GeoLayer::from_geojson(DONUT).unwrap());
        let small = view.surface().unwrap().shapes[0].polygons[0].clone();

        view.resize(1000.0);
        let large = &view.surface().unwrap().shapes[0].polygons[0];

        assert_eq!(large.triangles, small.triangles);
        assert_eq!(large.exterior.len(), small.exterior.len());
        let ratio = 980.0 / 480.0;
        for (s, l) in small.exterior.iter().zip(&large.exterior) {
            assert!(((l.x - MARGIN) - (s.x - MARGIN) * ratio).abs() < 0.01);
            assert!(((l.y - MARGIN) - (s.y - MARGIN) * ratio).abs() < 0.01);
        }
    }
}
