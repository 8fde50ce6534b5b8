//! Issues the draw calls for profile traces, parcel traces, wind barbs, and the hodograph.
//!
//! The base charts (isotherms, adiabats, hodograph rings) belong to the embedding toolkit;
//! this module only draws the data driven overlays on top of them. The first profile in a set
//! is the primary one: it is drawn wide, carries the wind barbs, and is the one the readout
//! samples from.

use crate::{
    canvas::Canvas,
    config::{HodoConfig, SkewTConfig},
    coords::{HodoFrame, SkewTFrame},
    parcel::ParcelAscent,
    sounding::{screen_temperature, screen_wind, Sounding},
};
use itertools::{izip, Itertools};
use metfor::{Celsius, HectoPascal, Knots, Quantity, WindSpdDir};

/// Trace width of the primary profile.
const PRIMARY_TRACE_WIDTH: f64 = 4.0;

/// Trace width of secondary profiles and secondary parcels.
const SECONDARY_TRACE_WIDTH: f64 = 1.0;

/// Trace width of the first buoyant parcel.
const PRIMARY_PARCEL_WIDTH: f64 = 3.0;

/// Horizontal inset of the wind barb column from the right edge of the plot.
const BARB_COLUMN_INSET: f64 = 30.0;

/// Draws the data overlays for both panes.
pub struct OverlayRenderer {
    skewt: SkewTFrame,
    hodo: HodoFrame,
    config: SkewTConfig,
    hodo_config: HodoConfig,
}

impl OverlayRenderer {
    /// Build a renderer and its frames from the pane configurations.
    pub fn new(config: SkewTConfig, hodo_config: HodoConfig) -> Self {
        OverlayRenderer {
            skewt: SkewTFrame::new(&config),
            hodo: HodoFrame::new(&hodo_config),
            config,
            hodo_config,
        }
    }

    /// The skew-T frame, for wiring up a sampler and readout.
    pub fn skewt_frame(&self) -> SkewTFrame {
        self.skewt
    }

    /// The hodograph frame.
    pub fn hodo_frame(&self) -> HodoFrame {
        self.hodo
    }

    /// Draw temperature and dew point traces for every profile, primary first and wide.
    pub fn draw_profiles<C: Canvas>(&self, canvas: &mut C, profiles: &[Sounding]) {
        for (i, snd) in profiles.iter().enumerate() {
            let width = if i == 0 {
                PRIMARY_TRACE_WIDTH
            } else {
                SECONDARY_TRACE_WIDTH
            };

            self.draw_skewt_trace(
                canvas,
                snd.pressure_profile(),
                snd.temperature_profile(),
                &self.config.temperature_color,
                width,
            );
            self.draw_skewt_trace(
                canvas,
                snd.pressure_profile(),
                snd.dew_point_profile(),
                &self.config.dew_point_color,
                width,
            );
        }
    }

    /// Draw the ascent traces of buoyant parcels. The first buoyant parcel is drawn wide.
    pub fn draw_parcels<C: Canvas>(&self, canvas: &mut C, ascents: &[ParcelAscent]) {
        let mut first = true;
        for ascent in ascents.iter().filter(|a| a.has_positive_area()) {
            let width = if first {
                PRIMARY_PARCEL_WIDTH
            } else {
                SECONDARY_TRACE_WIDTH
            };
            first = false;

            self.draw_skewt_trace(
                canvas,
                ascent.trace_pressure(),
                ascent.trace_temperature(),
                &self.config.parcel_color,
                width,
            );
        }
    }

    // A temperature-against-pressure polyline, sentinel screened and clipped to the plot.
    fn draw_skewt_trace<C: Canvas>(
        &self,
        canvas: &mut C,
        pressure: &[HectoPascal],
        temperature: &[Celsius],
        color: &str,
        width: f64,
    ) {
        izip!(pressure, temperature)
            .filter(|(p, t)| {
                self.skewt.contains_pressure(**p) && screen_temperature(**t).is_some()
            })
            .map(|(p, t)| {
                let y = self.skewt.y_from_pressure(*p);
                (self.skewt.x_from_temperature(*t, y), y)
            })
            .tuple_windows::<(_, _)>()
            .for_each(|((x1, y1), (x2, y2))| {
                canvas.draw_line(x1, y1, x2, y2, color, width);
            });
    }

    /// Draw wind barbs for the primary profile in a column at the right edge of the plot.
    pub fn draw_wind_barbs<C: Canvas>(&self, canvas: &mut C, snd: &Sounding) {
        let size = self.config.barb_size;
        let x = self.skewt.right() - BARB_COLUMN_INSET;
        let min_spacing = 9.0 * size;

        let mut last_y = std::f64::MAX;
        for (p, w) in izip!(snd.pressure_profile(), snd.wind_profile()) {
            if !self.skewt.contains_pressure(*p) || screen_wind(*w).is_none() {
                continue;
            }

            let y = self.skewt.y_from_pressure(*p);
            if (last_y - y).abs() < min_spacing {
                continue;
            }
            last_y = y;

            self.draw_barb(canvas, x, y, *w);
        }
    }

    // One conventional wind barb: a staff pointing into the wind with flags for every 50 kt,
    // full barbs for 10 kt, and a half barb for 5 kt, after rounding to the nearest 5 kt.
    fn draw_barb<C: Canvas>(&self, canvas: &mut C, x: f64, y: f64, wind: WindSpdDir<Knots>) {
        let size = self.config.barb_size;
        let color = &self.config.barb_color;

        let speed = wind.speed.unpack();
        let mut remaining = ((speed / 5.0).round() as i64) * 5;
        if remaining < 5 {
            return; // calm, no glyph
        }

        let rad = wind.direction.to_radians();
        let (ux, uy) = (rad.sin(), -rad.cos());
        let (px, py) = (-uy, ux);

        let staff = 9.0 * size;
        let full = 4.0 * size;
        let spacing = 2.0 * size;

        canvas.draw_line(x, y, x + ux * staff, y + uy * staff, color, 1.0);

        let mut pos = staff;
        while remaining >= 50 {
            let (bx, by) = (x + ux * pos, y + uy * pos);
            let (tip_x, tip_y) = (bx + px * full, by + py * full);
            let (cx, cy) = (x + ux * (pos - spacing), y + uy * (pos - spacing));
            canvas.draw_line(bx, by, tip_x, tip_y, color, 1.0);
            canvas.draw_line(tip_x, tip_y, cx, cy, color, 1.0);
            pos -= 1.5 * spacing;
            remaining -= 50;
        }
        while remaining >= 10 {
            let (bx, by) = (x + ux * pos, y + uy * pos);
            canvas.draw_line(
                bx,
                by,
                bx + px * full + ux * spacing,
                by + py * full + uy * spacing,
                color,
                1.0,
            );
            pos -= spacing;
            remaining -= 10;
        }
        if remaining >= 5 {
            let (bx, by) = (x + ux * pos, y + uy * pos);
            canvas.draw_line(
                bx,
                by,
                bx + px * full / 2.0 + ux * spacing / 2.0,
                by + py * full / 2.0 + uy * spacing / 2.0,
                color,
                1.0,
            );
        }
    }

    /// Draw the wind trace of every profile on the hodograph, primary first and wide.
    pub fn draw_hodograph<C: Canvas>(&self, canvas: &mut C, profiles: &[Sounding]) {
        for (i, snd) in profiles.iter().enumerate() {
            let width = if i == 0 {
                PRIMARY_TRACE_WIDTH
            } else {
                SECONDARY_TRACE_WIDTH
            };

            snd.wind_profile()
                .iter()
                .filter(|w| screen_wind(**w).is_some())
                .map(|w| self.hodo.pixel_from_wind(*w))
                .tuple_windows::<(_, _)>()
                .for_each(|((x1, y1), (x2, y2))| {
                    canvas.draw_line(x1, y1, x2, y2, &self.hodo_config.trace_color, width);
                });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::mock::MockCanvas;
    use crate::parcel::{lift_parcel, surface_parcel, ParcelOrigin};
    use crate::test_data::standard_sounding;

    fn renderer() -> OverlayRenderer {
        OverlayRenderer::new(SkewTConfig::default(), HodoConfig::default())
    }

    #[test]
    fn test_profile_traces_draw_segments() {
        let snd = standard_sounding();
        let renderer = renderer();
        let mut canvas = MockCanvas::new();

        renderer.draw_profiles(&mut canvas, &[snd]);

        // temperature and dew point traces, one segment per level pair
        assert!(canvas.lines > 0);
        assert_eq!(canvas.rects + canvas.texts, 0);
    }

    #[test]
    fn test_sentinel_levels_break_out_of_traces() {
        let snd = standard_sounding();
        let n = snd.len();
        let full = {
            let mut canvas = MockCanvas::new();
            renderer().draw_profiles(&mut canvas, &[snd.clone()]);
            canvas.lines
        };

        let mut temps = snd.temperature_profile().to_vec();
        temps[2] = Celsius(-9999.0);
        let snd = snd.with_temperature_profile(temps);
        assert_eq!(snd.len(), n);

        let mut canvas = MockCanvas::new();
        renderer().draw_profiles(&mut canvas, &[snd]);
        assert!(canvas.lines < full);
    }

    #[test]
    fn test_only_buoyant_parcels_are_drawn() {
        let snd = standard_sounding();
        let pcl = surface_parcel(&snd).unwrap();
        let buoyant = lift_parcel(ParcelOrigin::SurfaceBased, pcl, &snd).unwrap();
        assert!(buoyant.has_positive_area());

        let mut canvas = MockCanvas::new();
        renderer().draw_parcels(&mut canvas, &[buoyant]);
        assert!(canvas.lines > 0);

        // a single level sounding lifts to a zero energy ascent, which is not drawn
        let flat_snd = crate::bulletin::parse_profile_block(
            "OUN",
            None,
            "PRES HGHT TMPC DWPC DRCT SPED\n1000 10 20 15 180 10",
        )
        .unwrap();
        let flat_pcl = surface_parcel(&flat_snd).unwrap();
        let flat = lift_parcel(ParcelOrigin::SurfaceBased, flat_pcl, &flat_snd).unwrap();

        let mut canvas = MockCanvas::new();
        renderer().draw_parcels(&mut canvas, &[flat]);
        assert_eq!(canvas.lines, 0);
    }

    #[test]
    fn test_barbs_skip_sentinel_winds() {
        let snd = standard_sounding();
        let n = snd.len();
        let snd = snd.with_wind_profile(vec![
            WindSpdDir {
                direction: -9999.0,
                speed: Knots(-9999.0),
            };
            n
        ]);

        let mut canvas = MockCanvas::new();
        renderer().draw_wind_barbs(&mut canvas, &snd);
        assert_eq!(canvas.lines, 0);
    }

    #[test]
    fn test_hodograph_traces_all_profiles() {
        let snd = standard_sounding();
        let mut canvas = MockCanvas::new();
        renderer().draw_hodograph(&mut canvas, &[snd.clone(), snd]);
        assert!(canvas.lines > 0);
    }
}
