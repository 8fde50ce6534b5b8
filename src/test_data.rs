//! Data used in tests.

use crate::sounding::Sounding;
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};

// A warm season, strongly unstable profile. Surface based parcels lifted from it should have
// plenty of positive area.
pub fn standard_sounding() -> Sounding {
    let pressure = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 400.0, 300.0, 200.0]
        .into_iter()
        .map(HectoPascal)
        .collect();
    let height = vec![110.0, 800.0, 1500.0, 3100.0, 5800.0, 7500.0, 9600.0, 12400.0]
        .into_iter()
        .map(Meters)
        .collect();
    let temperature = vec![30.0, 24.0, 19.0, 8.0, -12.0, -26.0, -44.0, -62.0]
        .into_iter()
        .map(Celsius)
        .collect();
    let dew_point = vec![24.0, 20.0, 16.0, 2.0, -20.0, -35.0, -55.0, -75.0]
        .into_iter()
        .map(Celsius)
        .collect();
    let wind = vec![
        (170.0, 12.0),
        (185.0, 22.0),
        (200.0, 28.0),
        (225.0, 35.0),
        (245.0, 48.0),
        (250.0, 55.0),
        (255.0, 68.0),
        (260.0, 80.0),
    ]
    .into_iter()
    .map(|(direction, speed)| WindSpdDir {
        direction,
        speed: Knots(speed),
    })
    .collect();

    Sounding::new()
        .with_station_id("OUN")
        .with_pressure_profile(pressure)
        .with_height_profile(height)
        .with_temperature_profile(temperature)
        .with_dew_point_profile(dew_point)
        .with_wind_profile(wind)
}

pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    assert!(eps > 0.0);

    (val1 - val2).abs() < eps
}
