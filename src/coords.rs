//! Pixel to physical coordinate transforms for the skew-T and hodograph panes.

use crate::{
    config::{HodoConfig, SkewTConfig},
    interpolation::linear_interpolate,
    sounding::{screen_height, screen_temperature, Sounding},
};
use metfor::{Celsius, HectoPascal, Knots, Meters, Quantity, WindSpdDir, WindUV};
use optional::{none, Optioned};

/// Immutable skew-T geometry, fixed when the diagram is built.
///
/// The vertical axis is log pressure and the temperature axis is skewed: an isotherm leans to
/// the right as it climbs. All of the transforms here are pure functions of the frame.
#[derive(Debug, Clone, Copy)]
pub struct SkewTFrame {
    x0: f64,
    y0: f64,
    width: f64,
    height: f64,
    pmin: HectoPascal,
    pmax: HectoPascal,
    tmin: Celsius,
    tmax: Celsius,
    skew: f64,
}

impl SkewTFrame {
    /// Build the frame from a configuration.
    pub fn new(config: &SkewTConfig) -> Self {
        SkewTFrame {
            x0: config.margin,
            y0: config.margin,
            width: config.width - 2.0 * config.margin,
            height: config.height - 2.0 * config.margin,
            pmin: config.pmin,
            pmax: config.pmax,
            tmin: config.tmin,
            tmax: config.tmax,
            skew: config.skew,
        }
    }

    /// Pressure at the top of the plot.
    #[inline]
    pub fn pmin(&self) -> HectoPascal {
        self.pmin
    }

    /// Pressure at the bottom of the plot.
    #[inline]
    pub fn pmax(&self) -> HectoPascal {
        self.pmax
    }

    /// Left edge of the plot frame in pixels.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x0
    }

    /// Right edge of the plot frame in pixels.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x0 + self.width
    }

    /// Top edge of the plot frame in pixels.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y0
    }

    /// Bottom edge of the plot frame in pixels.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y0 + self.height
    }

    /// Map a pressure to a vertical pixel coordinate.
    #[inline]
    pub fn y_from_pressure(&self, p: HectoPascal) -> f64 {
        let frac = (self.pmax.unpack() / p.unpack()).ln()
            / (self.pmax.unpack() / self.pmin.unpack()).ln();
        self.y0 + self.height * (1.0 - frac)
    }

    /// Map a vertical pixel coordinate to a pressure.
    #[inline]
    pub fn pressure_from_y(&self, y: f64) -> HectoPascal {
        let frac = 1.0 - (y - self.y0) / self.height;
        HectoPascal(
            self.pmax.unpack() * (self.pmin.unpack() / self.pmax.unpack()).powf(frac),
        )
    }

    /// Whether a pressure is within the plotted range.
    #[inline]
    pub fn contains_pressure(&self, p: HectoPascal) -> bool {
        p >= self.pmin && p <= self.pmax
    }

    /// Map a temperature at a given vertical pixel coordinate to a horizontal one.
    #[inline]
    pub fn x_from_temperature(&self, t: Celsius, y: f64) -> f64 {
        let x_bottom = self.x0
            + self.width * (t.unpack() - self.tmin.unpack())
                / (self.tmax.unpack() - self.tmin.unpack());
        x_bottom + self.skew * (self.bottom() - y)
    }

    /// Map a horizontal pixel coordinate at a given vertical one to a temperature.
    #[inline]
    pub fn temperature_from_x(&self, x: f64, y: f64) -> Celsius {
        let x_bottom = x - self.skew * (self.bottom() - y);
        Celsius(
            self.tmin.unpack()
                + (x_bottom - self.x0) / self.width
                    * (self.tmax.unpack() - self.tmin.unpack()),
        )
    }
}

/// Immutable hodograph geometry, fixed when the diagram is built.
#[derive(Debug, Clone, Copy)]
pub struct HodoFrame {
    center_x: f64,
    center_y: f64,
    scale: f64,
}

impl HodoFrame {
    /// Build the frame from a configuration.
    pub fn new(config: &HodoConfig) -> Self {
        HodoFrame {
            center_x: config.width / 2.0,
            center_y: config.height / 2.0,
            scale: config.scale,
        }
    }

    /// Map a wind report to a pixel position.
    #[inline]
    pub fn pixel_from_wind(&self, wind: WindSpdDir<Knots>) -> (f64, f64) {
        let WindUV { u, v } = WindUV::<Knots>::from(wind);
        (
            self.center_x + u.unpack() * self.scale,
            self.center_y - v.unpack() * self.scale,
        )
    }

    /// Map a pixel position back to a wind report.
    #[inline]
    pub fn wind_from_pixel(&self, x: f64, y: f64) -> WindSpdDir<Knots> {
        let u = Knots((x - self.center_x) / self.scale);
        let v = Knots((self.center_y - y) / self.scale);
        WindSpdDir::from(WindUV { u, v })
    }
}

/// Readout values sampled at one vertical coordinate, sentinel screened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledLevel {
    /// The resolved pressure, clamped to the surface.
    pub pressure: HectoPascal,
    /// Interpolated height, missing when below ground.
    pub height: Optioned<Meters>,
    /// Interpolated temperature.
    pub temperature: Optioned<Celsius>,
    /// Interpolated dew point.
    pub dew_point: Optioned<Celsius>,
    /// Wet bulb temperature derived from the interpolated values.
    pub wet_bulb: Optioned<Celsius>,
    /// Interpolated wind, converted back to direction and speed.
    pub wind: Optioned<WindSpdDir<Knots>>,
}

/// Samples interpolated values from the primary sounding for the live readout.
///
/// The wind profile is broken into u and v components once at construction so every pointer
/// event interpolates components instead of converting the whole profile again.
pub struct Sampler<'a> {
    frame: SkewTFrame,
    snd: &'a Sounding,
    wind_u: Vec<Knots>,
    wind_v: Vec<Knots>,
}

impl<'a> Sampler<'a> {
    /// Pair a frame with the primary sounding it samples from.
    pub fn new(frame: SkewTFrame, snd: &'a Sounding) -> Self {
        let (wind_u, wind_v) = snd
            .wind_profile()
            .iter()
            .map(|&w| {
                let WindUV { u, v } = WindUV::<Knots>::from(w);
                (u, v)
            })
            .unzip();

        Sampler {
            frame,
            snd,
            wind_u,
            wind_v,
        }
    }

    /// The frame this sampler resolves pixels against.
    #[inline]
    pub fn frame(&self) -> &SkewTFrame {
        &self.frame
    }

    /// The sounding this sampler reads from.
    #[inline]
    pub fn sounding(&self) -> &Sounding {
        self.snd
    }

    /// Resolve a vertical pixel coordinate to a pressure and sample there.
    ///
    /// Pressures greater than the surface pressure are clamped to the surface, there is nothing
    /// to read below ground.
    pub fn sample_at_y(&self, y: f64) -> SampledLevel {
        let mut target_p = self.frame.pressure_from_y(y);
        if let Some(sfc_p) = self.snd.surface_pressure() {
            if target_p > sfc_p {
                target_p = sfc_p;
            }
        }
        self.sample_at_pressure(target_p)
    }

    /// Sample every readout field at a pressure, in fixed field order.
    pub fn sample_at_pressure(&self, target_p: HectoPascal) -> SampledLevel {
        let press = self.snd.pressure_profile();

        let height = linear_interpolate(press, self.snd.height_profile(), target_p)
            .into_option()
            .map_or(none(), screen_height);
        let temperature = linear_interpolate(press, self.snd.temperature_profile(), target_p)
            .into_option()
            .map_or(none(), screen_temperature);
        let dew_point = linear_interpolate(press, self.snd.dew_point_profile(), target_p)
            .into_option()
            .map_or(none(), screen_temperature);

        let wet_bulb = match (temperature.into_option(), dew_point.into_option()) {
            (Some(t), Some(dp)) => Optioned::from(metfor::wet_bulb(t, dp, target_p)),
            _ => none(),
        };

        let u = linear_interpolate(press, &self.wind_u, target_p).into_option();
        let v = linear_interpolate(press, &self.wind_v, target_p).into_option();
        let wind = match (u, v) {
            (Some(u), Some(v)) => Optioned::from(Some(WindSpdDir::from(WindUV { u, v }))),
            _ => none(),
        };

        SampledLevel {
            pressure: target_p,
            height,
            temperature,
            dew_point,
            wet_bulb,
            wind,
        }
    }
}
