// Resize handles
//
// Hit zones and drawing for the top/bottom edges of an appointment block.

use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::services::interaction::ResizeEdge;

/// Height of the grab zone along each edge
pub const HANDLE_ZONE: f32 = 8.0;
/// Visual size of the handle circle
pub const HANDLE_VISUAL_SIZE: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleRects {
    pub top: Option<Rect>,
    pub bottom: Rect,
}

impl HandleRects {
    /// Handle zones for a block. Short blocks only get the bottom handle.
    pub fn for_block(block: Rect, show_top: bool) -> Self {
        let zone = HANDLE_ZONE.min(block.height() / 2.0);
        let top = show_top.then(|| Rect::from_min_size(block.min, Vec2::new(block.width(), zone)));
        let bottom = Rect::from_min_size(
            Pos2::new(block.left(), block.bottom() - zone),
            Vec2::new(block.width(), zone),
        );

        Self { top, bottom }
    }

    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeEdge> {
        if self.bottom.contains(pos) {
            return Some(ResizeEdge::Bottom);
        }
        self.top
            .filter(|rect| rect.contains(pos))
            .map(|_| ResizeEdge::Top)
    }
}

pub fn draw_handles(
    painter: &Painter,
    handles: &HandleRects,
    hovered: Option<ResizeEdge>,
    color: Color32,
) {
    let draw = |rect: Rect, edge: ResizeEdge| {
        let is_hovered = hovered == Some(edge);
        let y = match edge {
            ResizeEdge::Top => rect.top() + HANDLE_VISUAL_SIZE / 2.0 + 1.0,
            ResizeEdge::Bottom => rect.bottom() - HANDLE_VISUAL_SIZE / 2.0 - 1.0,
        };
        let center = Pos2::new(rect.center().x, y);
        let half_bar = rect.width().min(40.0) / 2.0;
        let radius = if is_hovered {
            HANDLE_VISUAL_SIZE / 2.0 + 1.0
        } else {
            HANDLE_VISUAL_SIZE / 2.0
        };
        let bar_color = if is_hovered {
            Color32::WHITE
        } else {
            Color32::from_rgba_unmultiplied(255, 255, 255, 180)
        };

        painter.line_segment(
            [
                Pos2::new(center.x - half_bar, y),
                Pos2::new(center.x + half_bar, y),
            ],
            Stroke::new(if is_hovered { 3.0 } else { 2.0 }, bar_color),
        );
        painter.circle_filled(center, radius, Color32::WHITE);
        painter.circle_stroke(center, radius, Stroke::new(1.5, color.linear_multiply(0.8)));
    };

    if let Some(rect) = handles.top {
        draw(rect, ResizeEdge::Top);
    }
    draw(handles.bottom, ResizeEdge::Bottom);
}
