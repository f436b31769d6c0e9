//! Map canvas UI: state shapes, resort markers, and hover tooltip.

use crate::data::ResortRecord;
use crate::geo::{MapView, MARKER_HOVER_RADIUS, MARKER_RADIUS};
use crate::ui::colors;
use eframe::egui::{self, FontId, Painter, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};

/// Marker grow/shrink animation time in seconds.
const HOVER_ANIMATION_SECS: f32 = 0.2;

/// Render the map at the current container width.
///
/// Mounts the surface on first use and resizes it in place afterwards.
pub fn render_map(ui: &mut egui::Ui, map_view: &mut MapView, records: &[ResortRecord]) {
    let width = ui.available_width();
    if !map_view.mount(width) {
        map_view.resize(width);
    }

    let Some(size) = map_view.surface().map(|s| s.size) else {
        return;
    };
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let origin = rect.min;

    let ctx = ui.ctx().clone();
    let hover_id = egui::Id::new("hovered_resort_marker");
    let previous: Option<usize> = ctx.data(|d| d.get_temp(hover_id));

    // A marker only grows its hit area once it is hovered
    let hover_local = response.hover_pos().map(|p| p - origin.to_vec2());
    let hovered_marker = hover_local
        .and_then(|p| map_view.marker_at(p, |record| hit_radius(previous, record)));
    ctx.data_mut(|d| match hovered_marker {
        Some(marker) => d.insert_temp(hover_id, marker.record),
        None => d.remove::<usize>(hover_id),
    });

    let painter = ui.painter_at(rect);
    map_view.paint(&painter, origin, |record| {
        let target = if hovered_marker.is_some_and(|m| m.record == record) {
            MARKER_HOVER_RADIUS
        } else {
            MARKER_RADIUS
        };
        ctx.animate_value_with_time(
            egui::Id::new(("resort_marker", record)),
            target,
            HOVER_ANIMATION_SECS,
        )
    });

    let Some(pointer) = response.hover_pos() else {
        return;
    };
    let text = match hovered_marker {
        Some(marker) => records.get(marker.record).map(marker_tooltip),
        None => hover_local
            .and_then(|p| map_view.state_at(p))
            .map(str::to_string),
    };
    if let Some(text) = text {
        draw_tooltip(&painter, rect, pointer, text);
    }
}

/// Hit radius of a marker given the marker hovered on the previous frame.
fn hit_radius(hovered: Option<usize>, record: usize) -> f32 {
    if hovered == Some(record) {
        MARKER_HOVER_RADIUS
    } else {
        MARKER_RADIUS
    }
}

fn marker_tooltip(record: &ResortRecord) -> String {
    format!(
        "{}\n{}\n72hr Snowfall: {}",
        record.name, record.state, record.snowfall_72h
    )
}

/// Draws a boxed label next to the pointer, kept inside `bounds`.
fn draw_tooltip(painter: &Painter, bounds: Rect, pointer: Pos2, text: String) {
    let galley = painter.layout_no_wrap(text, FontId::proportional(12.0), colors::map::TOOLTIP_TEXT);
    let padding = Vec2::splat(6.0);
    let size = galley.size() + 2.0 * padding;

    let mut min = pointer + Vec2::new(12.0, 12.0);
    if min.x + size.x > bounds.max.x {
        min.x = pointer.x - 12.0 - size.x;
    }
    if min.y + size.y > bounds.max.y {
        min.y = pointer.y - 12.0 - size.y;
    }
    let frame = Rect::from_min_size(min, size);

    painter.rect_filled(frame, 4.0, colors::map::tooltip_background());
    painter.rect_stroke(
        frame,
        4.0,
        Stroke::new(1.0, colors::map::TOOLTIP_BORDER),
        StrokeKind::Inside,
    );
    painter.galley(frame.min + padding, galley, colors::map::TOOLTIP_TEXT);
}
