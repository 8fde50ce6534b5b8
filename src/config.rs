//! Typed display configuration.
//!
//! Every recognized option is enumerated here with a default, and the coordinate frames are
//! built from these values once at construction time. Embedders override fields with struct
//! update syntax rather than passing loose keyword bags.

use metfor::{Celsius, HectoPascal};

/// Options for the skew-T pane.
#[derive(Debug, Clone)]
pub struct SkewTConfig {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Margin in pixels between the canvas edge and the plot frame.
    pub margin: f64,
    /// Pressure at the top of the plot.
    pub pmin: HectoPascal,
    /// Pressure at the bottom of the plot.
    pub pmax: HectoPascal,
    /// Temperature at the left end of the bottom edge.
    pub tmin: Celsius,
    /// Temperature at the right end of the bottom edge.
    pub tmax: Celsius,
    /// Horizontal pixels the temperature axis shifts per vertical pixel climbed.
    pub skew: f64,
    /// Canvas background color.
    pub background: String,
    /// Fill color for readout label backgrounds.
    pub frame_background: String,
    /// Text color for neutral readout labels.
    pub frame_foreground: String,
    /// Color of the temperature trace and readout.
    pub temperature_color: String,
    /// Color of the dew point trace and readout.
    pub dew_point_color: String,
    /// Color of the wet bulb readout.
    pub wet_bulb_color: String,
    /// Color of parcel ascent traces.
    pub parcel_color: String,
    /// Color of the readout guide line.
    pub readout_line_color: String,
    /// Color of the wind barbs.
    pub barb_color: String,
    /// Scale factor for wind barb glyphs.
    pub barb_size: f64,
}

impl Default for SkewTConfig {
    fn default() -> Self {
        SkewTConfig {
            width: 800.0,
            height: 800.0,
            margin: 35.0,
            pmin: HectoPascal(100.0),
            pmax: HectoPascal(1050.0),
            tmin: Celsius(-50.0),
            tmax: Celsius(50.0),
            skew: 1.0,
            background: "#000000".to_owned(),
            frame_background: "#000000".to_owned(),
            frame_foreground: "#FFFFFF".to_owned(),
            temperature_color: "#FF0000".to_owned(),
            dew_point_color: "#00FF00".to_owned(),
            wet_bulb_color: "#00FFFF".to_owned(),
            parcel_color: "#FFFF00".to_owned(),
            readout_line_color: "#333333".to_owned(),
            barb_color: "#FFFFFF".to_owned(),
            barb_size: 3.33,
        }
    }
}

/// Options for the hodograph pane.
#[derive(Debug, Clone)]
pub struct HodoConfig {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Pixels per knot of wind speed.
    pub scale: f64,
    /// Canvas background color.
    pub background: String,
    /// Color of the wind trace.
    pub trace_color: String,
}

impl Default for HodoConfig {
    fn default() -> Self {
        HodoConfig {
            width: 600.0,
            height: 600.0,
            scale: 2.5,
            background: "#000000".to_owned(),
            trace_color: "#FF0000".to_owned(),
        }
    }
}
