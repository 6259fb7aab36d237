//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in track coordinates
//! (origin top-left, y down).

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering `rect`
pub fn fill_rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let min = rect.pos;
    let max = rect.pos + rect.size;
    if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
        return;
    }

    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

/// Outline of `rect`; the stroke is centered on the edge like a canvas stroke
pub fn stroke_rect(out: &mut Vec<Vertex>, rect: &Rect, line_width: f32, color: [f32; 4]) {
    let half = line_width / 2.0;
    let outer = rect.inset(-half);
    let min = outer.pos;
    let size = outer.size;

    // Top and bottom span the full outer width; sides fill between them
    fill_rect(out, &Rect::new(min.x, min.y, size.x, line_width), color);
    fill_rect(
        out,
        &Rect::new(min.x, min.y + size.y - line_width, size.x, line_width),
        color,
    );
    let side_height = size.y - line_width * 2.0;
    fill_rect(
        out,
        &Rect::new(min.x, min.y + line_width, line_width, side_height),
        color,
    );
    fill_rect(
        out,
        &Rect::new(
            min.x + size.x - line_width,
            min.y + line_width,
            line_width,
            side_height,
        ),
        color,
    );
}

/// Dashed vertical line from `start` down to `end_y`, pattern beginning at `start`
pub fn dashed_vline(
    out: &mut Vec<Vertex>,
    start: Vec2,
    end_y: f32,
    line_width: f32,
    pattern: (f32, f32),
    color: [f32; 4],
) {
    let (dash, gap) = pattern;
    if dash <= 0.0 || dash + gap <= 0.0 {
        return;
    }

    let x = start.x - line_width / 2.0;
    let mut y = start.y;
    while y < end_y {
        let len = dash.min(end_y - y);
        fill_rect(out, &Rect::new(x, y, line_width, len), color);
        y += dash + gap;
    }
}

/// Soft glow behind `rect`: translucent layers growing out to `blur`
pub fn glow(out: &mut Vec<Vertex>, rect: &Rect, blur: f32, color: [f32; 4]) {
    const LAYERS: u32 = 4;
    for i in (1..=LAYERS).rev() {
        let t = i as f32 / LAYERS as f32;
        let alpha = color[3] * 0.35 * (1.0 - t * 0.75);
        fill_rect(
            out,
            &rect.inset(-blur * t),
            [color[0], color[1], color[2], alpha],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_fill_rect_corners() {
        let mut out = Vec::new();
        fill_rect(&mut out, &Rect::new(10.0, 20.0, 30.0, 40.0), RED);
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_degenerate_rect_emits_nothing() {
        let mut out = Vec::new();
        fill_rect(&mut out, &Rect::new(0.0, 0.0, 0.0, 10.0), RED);
        fill_rect(&mut out, &Rect::new(0.0, 0.0, -5.0, 10.0), RED);
        assert!(out.is_empty());
    }

    #[test]
    fn test_stroke_rect_is_four_bands() {
        let mut out = Vec::new();
        stroke_rect(&mut out, &Rect::new(4.0, 0.0, 472.0, 800.0), 8.0, RED);
        assert_eq!(out.len(), 24);
        let min_x = out.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = out.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(min_x, 0.0);
        assert_eq!(max_x, 480.0);
    }

    #[test]
    fn test_dash_count_and_phase() {
        let mut out = Vec::new();
        dashed_vline(&mut out, Vec2::new(160.0, 0.0), 800.0, 4.0, (40.0, 40.0), RED);
        assert_eq!(out.len(), 10 * 6);

        let mut shifted = Vec::new();
        dashed_vline(&mut shifted, Vec2::new(160.0, -20.0), 800.0, 4.0, (40.0, 40.0), RED);
        let first_top = shifted[0].position[1];
        assert_eq!(first_top, -20.0);
        // Last dash is clipped at the bottom edge
        let bottom = shifted.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!(bottom <= 800.0);
    }

    #[test]
    fn test_glow_layers_extend_past_rect() {
        let mut out = Vec::new();
        let rect = Rect::new(100.0, 100.0, 60.0, 100.0);
        glow(&mut out, &rect, 15.0, RED);
        assert_eq!(out.len(), 4 * 6);
        let min_x = out.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        assert_eq!(min_x, 85.0);
        assert!(out.iter().all(|v| v.color[3] < 1.0));
    }
}
