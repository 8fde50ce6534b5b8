//! Data type and methods to store a parsed vertical sounding.

use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use optional::{none, some, Optioned};

/// Marker value written into readout text when a value is missing.
pub const MISSING: f64 = -9999.0;

/// Temperature type values below this threshold are treated as missing at display time.
pub const MISSING_T_THRESHOLD: Celsius = Celsius(-110.0);

/// One vertical profile from one station at one valid time.
///
/// The profile variables are stored in parallel vectors with the surface at index 0 and pressure
/// strictly decreasing with index. Sentinel values from the source text (eg -9999.0) are kept
/// verbatim so the parsed data always round trips; screening them out is a display time concern
/// handled by [`screen_temperature`], [`screen_height`], and [`screen_wind`].
#[derive(Clone, Debug, Default)]
pub struct Sounding {
    // Station identifier from the bulletin marker line.
    station_id: String,

    // Valid time of the sounding.
    valid_time: Option<NaiveDateTime>,

    // Profiles
    pressure: Vec<HectoPascal>,
    height: Vec<Meters>,
    temperature: Vec<Celsius>,
    dew_point: Vec<Celsius>,
    wind: Vec<WindSpdDir<Knots>>,
}

impl Sounding {
    /// Create a new sounding with default values. This is a proxy for default with a clearer name.
    #[inline]
    pub fn new() -> Self {
        Sounding::default()
    }

    /// Builder method for the station identifier.
    #[inline]
    pub fn with_station_id<S>(mut self, station_id: S) -> Self
    where
        S: Into<String>,
    {
        self.station_id = station_id.into();
        self
    }

    /// Get the station identifier.
    #[inline]
    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    /// Builder method for the valid time.
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Get the valid time.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// Builder method for the pressure profile.
    ///
    /// Pressure is the vertical coordinate for everything else in this crate, so it must be
    /// strictly decreasing with index, surface first.
    #[inline]
    pub fn with_pressure_profile(self, profile: Vec<HectoPascal>) -> Self {
        Self {
            pressure: profile,
            ..self
        }
    }

    /// Get the pressure profile.
    #[inline]
    pub fn pressure_profile(&self) -> &[HectoPascal] {
        &self.pressure
    }

    /// Builder method for the geopotential height profile.
    #[inline]
    pub fn with_height_profile(self, profile: Vec<Meters>) -> Self {
        Self {
            height: profile,
            ..self
        }
    }

    /// Get the geopotential height profile.
    #[inline]
    pub fn height_profile(&self) -> &[Meters] {
        &self.height
    }

    /// Builder method for the temperature profile.
    #[inline]
    pub fn with_temperature_profile(self, profile: Vec<Celsius>) -> Self {
        Self {
            temperature: profile,
            ..self
        }
    }

    /// Get the temperature profile.
    #[inline]
    pub fn temperature_profile(&self) -> &[Celsius] {
        &self.temperature
    }

    /// Builder method for the dew point profile.
    #[inline]
    pub fn with_dew_point_profile(self, profile: Vec<Celsius>) -> Self {
        Self {
            dew_point: profile,
            ..self
        }
    }

    /// Get the dew point profile.
    #[inline]
    pub fn dew_point_profile(&self) -> &[Celsius] {
        &self.dew_point
    }

    /// Builder method for the wind profile. Direction and speed are stored as parsed, without
    /// conversion to components.
    #[inline]
    pub fn with_wind_profile(self, profile: Vec<WindSpdDir<Knots>>) -> Self {
        Self {
            wind: profile,
            ..self
        }
    }

    /// Get the wind profile.
    #[inline]
    pub fn wind_profile(&self) -> &[WindSpdDir<Knots>] {
        &self.wind
    }

    /// Number of vertical levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// Returns `true` if there are no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// The surface pressure, ie the pressure of the first level.
    #[inline]
    pub fn surface_pressure(&self) -> Option<HectoPascal> {
        self.pressure.get(0).copied()
    }
}

/// Screen a temperature type value, mapping the source sentinel to a missing value.
#[inline]
pub fn screen_temperature(t: Celsius) -> Optioned<Celsius> {
    if t < MISSING_T_THRESHOLD {
        none()
    } else {
        some(t)
    }
}

/// Screen a geopotential height, mapping below ground sentinels to a missing value.
#[inline]
pub fn screen_height(h: Meters) -> Optioned<Meters> {
    if h < Meters(0.0) {
        none()
    } else {
        some(h)
    }
}

/// Screen a wind report, mapping sentinel directions and speeds to a missing value.
#[inline]
pub fn screen_wind(w: WindSpdDir<Knots>) -> Optioned<WindSpdDir<Knots>> {
    if w.direction < 0.0 || w.speed < Knots(0.0) {
        none()
    } else {
        some(w)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builder_round_trip() {
        let snd = Sounding::new()
            .with_station_id("OUN")
            .with_pressure_profile(vec![HectoPascal(1000.0), HectoPascal(850.0)])
            .with_temperature_profile(vec![Celsius(20.0), Celsius(12.0)]);

        assert_eq!(snd.station_id(), "OUN");
        assert_eq!(snd.len(), 2);
        assert_eq!(snd.surface_pressure(), Some(HectoPascal(1000.0)));
        assert_eq!(snd.temperature_profile()[1], Celsius(12.0));
    }

    #[test]
    fn test_screening() {
        assert!(screen_temperature(Celsius(-120.0)).is_none());
        assert_eq!(screen_temperature(Celsius(-50.0)), some(Celsius(-50.0)));
        assert!(screen_height(Meters(-9999.0)).is_none());
        assert_eq!(screen_height(Meters(0.0)), some(Meters(0.0)));
        assert!(screen_wind(WindSpdDir {
            direction: -9999.0,
            speed: Knots(-9999.0),
        })
        .is_none());
    }
}
