//! The live pointer readout over the skew-T pane.
//!
//! The first pointer event inside the plot creates a horizontal guide line and five value
//! labels. Every later event repositions those same elements and rewrites their text in place,
//! so tracking the pointer never churns canvas elements.

use crate::{
    canvas::{Canvas, ElementId, TextAnchor},
    config::SkewTConfig,
    coords::{SampledLevel, Sampler},
    sounding::MISSING,
};
use metfor::{Celsius, HectoPascal, Meters, Quantity};
use optional::Optioned;

/// Half height of a label background box in pixels.
const BOX_HALF_HEIGHT: f64 = 5.0;

/// Width of a label background box in pixels.
const BOX_WIDTH: f64 = 50.0;

/// One label with its background box.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LabelPair {
    rect: ElementId,
    text: ElementId,
}

/// Canvas elements owned by an active readout: the guide line and five label pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutElements {
    guide: ElementId,
    pressure: LabelPair,
    dew_point: LabelPair,
    wet_bulb: LabelPair,
    temperature: LabelPair,
    height: LabelPair,
}

// The readout is a two state machine. It starts uninitialized, becomes active on the first
// pointer event inside the plot, and stays active for the life of the view.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ReadoutState {
    Uninitialized,
    Active(ReadoutElements),
}

/// Drives the readout overlay from pointer motion events against the primary sounding.
pub struct ReadoutController<'a> {
    sampler: Sampler<'a>,
    config: SkewTConfig,
    state: ReadoutState,
}

impl<'a> ReadoutController<'a> {
    /// Create a controller in the uninitialized state.
    pub fn new(sampler: Sampler<'a>, config: SkewTConfig) -> Self {
        ReadoutController {
            sampler,
            config,
            state: ReadoutState::Uninitialized,
        }
    }

    /// Whether the overlay elements have been created yet.
    pub fn is_active(&self) -> bool {
        match self.state {
            ReadoutState::Uninitialized => false,
            ReadoutState::Active(_) => true,
        }
    }

    /// The element handles of the active overlay, if it has been created.
    pub fn elements(&self) -> Option<ReadoutElements> {
        match self.state {
            ReadoutState::Uninitialized => None,
            ReadoutState::Active(elements) => Some(elements),
        }
    }

    /// Handle one pointer motion event at vertical pixel coordinate `y`.
    ///
    /// Events that resolve to a pressure outside the plotted range are ignored before any state
    /// is touched.
    pub fn pointer_moved<C: Canvas>(&mut self, canvas: &mut C, y: f64) {
        let frame = *self.sampler.frame();
        if !frame.contains_pressure(frame.pressure_from_y(y)) {
            return;
        }

        let sample = self.sampler.sample_at_y(y);

        match self.state {
            ReadoutState::Uninitialized => {
                let elements = self.create_elements(canvas, y, &sample);
                self.state = ReadoutState::Active(elements);
            }
            ReadoutState::Active(elements) => self.update_elements(canvas, elements, y, &sample),
        }
    }

    fn create_elements<C: Canvas>(
        &self,
        canvas: &mut C,
        y: f64,
        sample: &SampledLevel,
    ) -> ReadoutElements {
        let frame = self.sampler.frame();
        let left = frame.left();
        let right = frame.right();
        let cfg = &self.config;

        let guide = canvas.draw_line(
            left + 1.0,
            y,
            right - 1.0,
            y,
            &cfg.readout_line_color,
            0.5,
        );

        let label = |canvas: &mut C, x1: f64, text_x: f64, text: String, color: &str, anchor| {
            let rect = canvas.draw_rect(
                x1,
                y - BOX_HALF_HEIGHT,
                x1 + BOX_WIDTH,
                y + BOX_HALF_HEIGHT,
                &cfg.frame_background,
            );
            let text = canvas.draw_text(text_x, y, &text, color, anchor);
            LabelPair { rect, text }
        };

        let pressure = label(
            canvas,
            left + 1.0,
            left + 6.0,
            fmt_pressure(sample.pressure),
            &cfg.frame_foreground,
            TextAnchor::West,
        );
        let dew_point = label(
            canvas,
            left + 51.0,
            left + 76.0,
            fmt_temperature(sample.dew_point),
            &cfg.dew_point_color,
            TextAnchor::Center,
        );
        let wet_bulb = label(
            canvas,
            left + 101.0,
            left + 126.0,
            fmt_temperature(sample.wet_bulb),
            &cfg.wet_bulb_color,
            TextAnchor::Center,
        );
        let temperature = label(
            canvas,
            right - 101.0,
            right - 76.0,
            fmt_temperature(sample.temperature),
            &cfg.temperature_color,
            TextAnchor::Center,
        );
        let height = label(
            canvas,
            right - 51.0,
            right - 46.0,
            fmt_height(sample.height),
            &cfg.frame_foreground,
            TextAnchor::West,
        );

        ReadoutElements {
            guide,
            pressure,
            dew_point,
            wet_bulb,
            temperature,
            height,
        }
    }

    fn update_elements<C: Canvas>(
        &self,
        canvas: &mut C,
        elements: ReadoutElements,
        y: f64,
        sample: &SampledLevel,
    ) {
        canvas.move_element(elements.guide, y);

        let update = |canvas: &mut C, pair: LabelPair, text: String| {
            canvas.move_element(pair.rect, y);
            canvas.move_element(pair.text, y);
            canvas.set_text(pair.text, &text);
        };

        update(canvas, elements.pressure, fmt_pressure(sample.pressure));
        update(canvas, elements.dew_point, fmt_temperature(sample.dew_point));
        update(canvas, elements.wet_bulb, fmt_temperature(sample.wet_bulb));
        update(
            canvas,
            elements.temperature,
            fmt_temperature(sample.temperature),
        );
        update(canvas, elements.height, fmt_height(sample.height));
    }
}

fn fmt_pressure(p: HectoPascal) -> String {
    format!("{:<4} hPa", p.unpack().round() as i64)
}

fn fmt_height(h: Optioned<Meters>) -> String {
    let h = h.into_option().map_or(MISSING, Quantity::unpack);
    format!("{:<5} m", h.round() as i64)
}

fn fmt_temperature(t: Optioned<Celsius>) -> String {
    let t = t.into_option().map_or(MISSING, Quantity::unpack);
    format!("{:<3.1} C", t)
}
