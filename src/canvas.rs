//! The drawing contract between this crate and the embedding toolkit.
//!
//! This crate computes what to draw; an embedder supplies a retained mode canvas that creates
//! elements and hands back ids. The readout controller later repositions elements and rewrites
//! text through the same ids instead of destroying and recreating them on every pointer event.

/// Opaque handle to an element created on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Horizontal anchor for text placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// The coordinate is the left edge of the text.
    West,
    /// The coordinate is the center of the text.
    Center,
}

/// Minimal retained mode drawing surface the display renders into.
pub trait Canvas {
    /// Draw a line segment, returning a handle to it.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64)
        -> ElementId;

    /// Draw a filled rectangle, returning a handle to it.
    fn draw_rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, fill: &str) -> ElementId;

    /// Draw a text label, returning a handle to it.
    fn draw_text(&mut self, x: f64, y: f64, text: &str, color: &str, anchor: TextAnchor)
        -> ElementId;

    /// Reposition an existing element vertically, keeping its horizontal placement.
    fn move_element(&mut self, id: ElementId, y: f64);

    /// Replace the text of an existing text element.
    fn set_text(&mut self, id: ElementId, text: &str);
}
