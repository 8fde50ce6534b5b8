//! Parcel origin selection and ascent for the four display parcels.
//!
//! The thermodynamics all comes from the metfor crate; this module picks the origin levels,
//! lifts the parcels against their environment, and packages the traces for drawing.

use crate::{
    error::{Result, SkewtError},
    interpolation::linear_interpolate,
    sounding::{screen_height, screen_temperature, Sounding},
};
use itertools::izip;
use metfor::{self, Celsius, HectoPascal, JpKg, Kelvin, Meters, Quantity};
use strum_macros::EnumIter;

/// Minimum buoyant energy for a level to count toward the effective inflow layer.
const EFFECTIVE_ENERGY_THRESHOLD: JpKg = JpKg(100.0);

/// Inflow layers and unstable parcels are searched for within this depth above the surface.
const SEARCH_DEPTH_HPA: f64 = 300.0;

/// Depth of the layer averaged for the mixed layer parcel.
const MIXED_LAYER_DEPTH_HPA: f64 = 100.0;

/// Variables defining a parcel as used in parcel analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parcel {
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Temperature in C
    pub temperature: Celsius,
    /// Dew point in C
    pub dew_point: Celsius,
}

impl Parcel {
    /// Get the potential temperature of the parcel.
    pub fn theta(&self) -> Kelvin {
        metfor::potential_temperature(self.pressure, self.temperature)
    }

    /// Get the equivalent potential temperature of the parcel.
    pub fn theta_e(&self) -> Result<Kelvin> {
        metfor::equiv_pot_temperature(self.temperature, self.dew_point, self.pressure)
            .ok_or(SkewtError::MetForError)
    }

    /// Get the mixing ratio of the parcel.
    pub fn mixing_ratio(&self) -> Result<f64> {
        metfor::mixing_ratio(self.dew_point, self.pressure).ok_or(SkewtError::MetForError)
    }
}

/// The rule used to choose a parcel's starting level.
///
/// The iteration order of this enum is the fixed order analyses are run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ParcelOrigin {
    /// Start from the surface values.
    SurfaceBased,
    /// Mean of the lowest 100 hPa.
    MixedLayer,
    /// The level with the highest equivalent potential temperature in the lowest 300 hPa.
    MostUnstable,
    /// Mean of the effective inflow layer.
    Effective,
}

/// The product of lifting one parcel through its environment.
#[derive(Debug, Clone)]
pub struct ParcelAscent {
    origin: ParcelOrigin,
    parcel: Parcel,
    trace_pressure: Vec<HectoPascal>,
    trace_temperature: Vec<Celsius>,
    buoyant_energy: JpKg,
}

impl ParcelAscent {
    /// The rule that chose this parcel.
    pub fn origin(&self) -> ParcelOrigin {
        self.origin
    }

    /// The starting values of the lifted parcel.
    pub fn parcel(&self) -> Parcel {
        self.parcel
    }

    /// Pressure coordinates of the ascent trace, origin first.
    pub fn trace_pressure(&self) -> &[HectoPascal] {
        &self.trace_pressure
    }

    /// Parcel virtual temperature along the ascent trace.
    pub fn trace_temperature(&self) -> &[Celsius] {
        &self.trace_temperature
    }

    /// The integrated positive buoyant energy of the ascent.
    pub fn buoyant_energy(&self) -> JpKg {
        self.buoyant_energy
    }

    /// Whether any part of the ascent was positively buoyant. Only such traces are drawn.
    pub fn has_positive_area(&self) -> bool {
        self.buoyant_energy.unpack() > 0.0
    }
}

/// Run the four canonical parcel analyses for a sounding.
///
/// Always returns the analyses in the order [surface based, mixed layer, most unstable,
/// effective]. Failures from the thermodynamic layer propagate unchanged.
pub fn parcel_analyses(snd: &Sounding) -> Result<Vec<ParcelAscent>> {
    use strum::IntoEnumIterator;

    ParcelOrigin::iter()
        .map(|origin| define_parcel(snd, origin).and_then(|pcl| lift_parcel(origin, pcl, snd)))
        .collect()
}

/// Choose the starting values for a parcel according to an origin rule.
pub fn define_parcel(snd: &Sounding, origin: ParcelOrigin) -> Result<Parcel> {
    match origin {
        ParcelOrigin::SurfaceBased => surface_parcel(snd),
        ParcelOrigin::MixedLayer => mixed_layer_parcel(snd),
        ParcelOrigin::MostUnstable => most_unstable_parcel(snd),
        ParcelOrigin::Effective => effective_parcel(snd),
    }
}

// Levels with plausible temperature and dew point values.
fn valid_levels<'a>(
    snd: &'a Sounding,
) -> impl Iterator<Item = (HectoPascal, Celsius, Celsius)> + 'a {
    izip!(
        snd.pressure_profile(),
        snd.temperature_profile(),
        snd.dew_point_profile()
    )
    .map(|(p, t, dp)| (*p, *t, *dp))
    .filter(|&(p, t, dp)| {
        p.unpack() > 0.0 && screen_temperature(t).is_some() && screen_temperature(dp).is_some()
    })
}

/// Get a surface parcel.
pub fn surface_parcel(snd: &Sounding) -> Result<Parcel> {
    let pressure = snd.surface_pressure().ok_or(SkewtError::MissingProfile)?;
    let temperature = *snd
        .temperature_profile()
        .get(0)
        .ok_or(SkewtError::MissingProfile)?;
    let dew_point = *snd
        .dew_point_profile()
        .get(0)
        .ok_or(SkewtError::MissingProfile)?;

    if screen_temperature(temperature).is_none() || screen_temperature(dew_point).is_none() {
        return Err(SkewtError::MissingValue);
    }

    Ok(Parcel {
        pressure,
        temperature,
        dew_point,
    })
}

/// Create a mixed layer parcel.
///
/// The values in this parcel are the simple mean of the lowest 100 hPa of the sounding.
pub fn mixed_layer_parcel(snd: &Sounding) -> Result<Parcel> {
    let bottom_p = snd.surface_pressure().ok_or(SkewtError::MissingProfile)?;

    let (sum_p, sum_t, sum_dp, count) = valid_levels(snd)
        .take_while(|&(p, _, _)| p.unpack() >= bottom_p.unpack() - MIXED_LAYER_DEPTH_HPA)
        .fold((0.0f64, 0.0f64, 0.0f64, 0.0f64), |acc, (p, t, dp)| {
            let (sum_p, sum_t, sum_dp, count) = acc;
            (
                sum_p + p.unpack(),
                sum_t + t.unpack(),
                sum_dp + dp.unpack(),
                count + 1.0,
            )
        });

    if count == 0.0 {
        return Err(SkewtError::NotEnoughData);
    }

    Ok(Parcel {
        pressure: HectoPascal(sum_p / count),
        temperature: Celsius(sum_t / count),
        dew_point: Celsius(sum_dp / count),
    })
}

/// Get the most unstable parcel.
///
/// This is the level in the lowest 300 hPa of the sounding with the highest equivalent potential
/// temperature.
pub fn most_unstable_parcel(snd: &Sounding) -> Result<Parcel> {
    let bottom_p = snd.surface_pressure().ok_or(SkewtError::MissingProfile)?;

    valid_levels(snd)
        .take_while(|&(p, _, _)| p.unpack() >= bottom_p.unpack() - SEARCH_DEPTH_HPA)
        .filter_map(|(p, t, dp)| metfor::equiv_pot_temperature(t, dp, p).map(|th_e| (p, t, dp, th_e)))
        .fold(
            None,
            |acc: Option<(HectoPascal, Celsius, Celsius, Kelvin)>, lvl| match acc {
                Some(best) if best.3 >= lvl.3 => Some(best),
                _ => Some(lvl),
            },
        )
        .map(|(pressure, temperature, dew_point, _)| Parcel {
            pressure,
            temperature,
            dew_point,
        })
        .ok_or(SkewtError::NoDataProfile)
}

/// Create an effective parcel.
///
/// The values are the simple mean of the effective inflow layer: the contiguous run of levels,
/// scanned up from the surface, whose lifted parcels have at least 100 J/kg of buoyant energy.
/// When no such layer exists the parcel degenerates to the surface parcel.
pub fn effective_parcel(snd: &Sounding) -> Result<Parcel> {
    let bottom_p = snd.surface_pressure().ok_or(SkewtError::MissingProfile)?;

    let mut layer: Vec<(HectoPascal, Celsius, Celsius)> = Vec::new();
    for (p, t, dp) in valid_levels(snd) {
        if layer.is_empty() && p.unpack() < bottom_p.unpack() - SEARCH_DEPTH_HPA {
            break; // inflow layers start near the surface
        }

        let candidate = Parcel {
            pressure: p,
            temperature: t,
            dew_point: dp,
        };
        let qualifies = lift_parcel(ParcelOrigin::Effective, candidate, snd)
            .map(|ascent| {
                ascent.buoyant_energy().unpack() >= EFFECTIVE_ENERGY_THRESHOLD.unpack()
            })
            .unwrap_or(false);

        if qualifies {
            layer.push((p, t, dp));
        } else if !layer.is_empty() {
            break; // the inflow layer is contiguous
        }
    }

    if layer.is_empty() {
        return surface_parcel(snd);
    }

    let count = layer.len() as f64;
    let (sum_p, sum_t, sum_dp) = layer.iter().fold((0.0, 0.0, 0.0), |acc, &(p, t, dp)| {
        (
            acc.0 + p.unpack(),
            acc.1 + t.unpack(),
            acc.2 + dp.unpack(),
        )
    });

    Ok(Parcel {
        pressure: HectoPascal(sum_p / count),
        temperature: Celsius(sum_t / count),
        dew_point: Celsius(sum_dp / count),
    })
}

/// Lift a parcel from its origin to the top of the sounding.
///
/// The parcel follows a dry adiabat up to its lifting condensation level and a moist adiabat
/// above it. Both the parcel trace and the buoyant energy are computed against the virtual
/// temperature of the environment.
pub fn lift_parcel(origin: ParcelOrigin, parcel: Parcel, snd: &Sounding) -> Result<ParcelAscent> {
    let theta = parcel.theta();
    let theta_e = parcel.theta_e()?;
    let parcel_mw = parcel.mixing_ratio()?;

    let (lcl_pressure, _lcl_temperature) = metfor::pressure_and_temperature_at_lcl(
        parcel.temperature,
        parcel.dew_point,
        parcel.pressure,
    )
    .ok_or(SkewtError::MetForError)?;

    let mut trace_pressure: Vec<HectoPascal> = Vec::with_capacity(snd.len() + 1);
    let mut trace_height: Vec<Meters> = Vec::with_capacity(snd.len() + 1);
    let mut parcel_vt: Vec<Celsius> = Vec::with_capacity(snd.len() + 1);
    let mut environment_vt: Vec<Celsius> = Vec::with_capacity(snd.len() + 1);

    // The origin level first. Use the exact level when the origin sits on one, otherwise
    // interpolate the environment to the origin pressure.
    let (origin_h, origin_env_t, origin_env_dp) = origin_environment(parcel.pressure, snd)?;
    {
        let pcl_vt = metfor::virtual_temperature(parcel.temperature, parcel.dew_point, parcel.pressure)
            .ok_or(SkewtError::MetForError)?;
        let env_vt = metfor::virtual_temperature(origin_env_t, origin_env_dp, parcel.pressure)
            .ok_or(SkewtError::MetForError)?;

        trace_pressure.push(parcel.pressure);
        trace_height.push(origin_h);
        parcel_vt.push(Celsius::from(pcl_vt));
        environment_vt.push(Celsius::from(env_vt));
    }

    // Then every level above the origin.
    for (p, h, env_t, env_dp) in izip!(
        snd.pressure_profile(),
        snd.height_profile(),
        snd.temperature_profile(),
        snd.dew_point_profile()
    )
    .map(|(p, h, t, dp)| (*p, *h, *t, *dp))
    {
        if p >= parcel.pressure {
            continue;
        }
        if screen_temperature(env_t).is_none()
            || screen_temperature(env_dp).is_none()
            || screen_height(h).is_none()
        {
            continue;
        }

        let pcl_t = if p > lcl_pressure {
            Celsius::from(metfor::temperature_from_pot_temp(theta, p))
        } else {
            match metfor::temperature_from_equiv_pot_temp_saturated_and_pressure(p, theta_e) {
                Some(t) => t,
                None => continue,
            }
        };

        let pcl_dp = if p > lcl_pressure {
            match metfor::dew_point_from_p_and_mw(p, parcel_mw) {
                Some(dp) => dp,
                None => continue,
            }
        } else {
            pcl_t
        };

        let pcl_vt = match metfor::virtual_temperature(pcl_t, pcl_dp, p) {
            Some(vt) => Celsius::from(vt),
            None => continue,
        };
        let env_vt = match metfor::virtual_temperature(env_t, env_dp, p) {
            Some(vt) => Celsius::from(vt),
            None => continue,
        };

        trace_pressure.push(p);
        trace_height.push(h);
        parcel_vt.push(pcl_vt);
        environment_vt.push(env_vt);
    }

    let buoyant_energy = positive_buoyant_energy(&trace_height, &parcel_vt, &environment_vt);

    Ok(ParcelAscent {
        origin,
        parcel,
        trace_pressure,
        trace_temperature: parcel_vt,
        buoyant_energy,
    })
}

// Environment height, temperature, and dew point at the parcel origin pressure.
fn origin_environment(
    origin_p: HectoPascal,
    snd: &Sounding,
) -> Result<(Meters, Celsius, Celsius)> {
    let exact = izip!(
        snd.pressure_profile(),
        snd.height_profile(),
        snd.temperature_profile(),
        snd.dew_point_profile()
    )
    .find(|(p, _, _, _)| (p.unpack() - origin_p.unpack()).abs() < std::f64::EPSILON)
    .map(|(_, h, t, dp)| (*h, *t, *dp));

    if let Some(lvl) = exact {
        return Ok(lvl);
    }

    let press = snd.pressure_profile();
    let h = linear_interpolate(press, snd.height_profile(), origin_p)
        .into_option()
        .ok_or(SkewtError::MissingValue)?;
    let t = linear_interpolate(press, snd.temperature_profile(), origin_p)
        .into_option()
        .ok_or(SkewtError::MissingValue)?;
    let dp = linear_interpolate(press, snd.dew_point_profile(), origin_p)
        .into_option()
        .ok_or(SkewtError::MissingValue)?;

    Ok((h, t, dp))
}

// Trapezoid rule integration of the positive area between the parcel and environment virtual
// temperature traces.
fn positive_buoyant_energy(
    heights: &[Meters],
    parcel_vt: &[Celsius],
    environment_vt: &[Celsius],
) -> JpKg {
    let mut energy = 0.0;
    let mut prev_h = Meters(std::f64::MAX);
    let mut prev_pt = Kelvin(0.0);
    let mut prev_et = Kelvin(0.0);

    for (&h, &pt, &et) in izip!(heights, parcel_vt, environment_vt) {
        let (pt, et) = (Kelvin::from(pt), Kelvin::from(et));

        let dz = h - prev_h;
        if dz > Meters(0.0) {
            let buoyancy = ((pt - et).unpack() / et.unpack()
                + (prev_pt - prev_et).unpack() / prev_et.unpack())
                * dz.unpack();
            if buoyancy > 0.0 {
                energy += buoyancy;
            }
        }

        prev_h = h;
        prev_pt = pt;
        prev_et = et;
    }

    JpKg(energy / 2.0 * -metfor::g)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::{approx_equal, standard_sounding};

    #[test]
    fn test_four_analyses_in_fixed_order() {
        let snd = standard_sounding();
        let analyses = parcel_analyses(&snd).unwrap();

        assert_eq!(analyses.len(), 4);
        let origins: Vec<ParcelOrigin> = analyses.iter().map(|a| a.origin()).collect();
        assert_eq!(
            origins,
            vec![
                ParcelOrigin::SurfaceBased,
                ParcelOrigin::MixedLayer,
                ParcelOrigin::MostUnstable,
                ParcelOrigin::Effective,
            ]
        );
    }

    #[test]
    fn test_surface_parcel_takes_level_zero() {
        let snd = standard_sounding();
        let pcl = surface_parcel(&snd).unwrap();

        assert_eq!(pcl.pressure, snd.pressure_profile()[0]);
        assert_eq!(pcl.temperature, snd.temperature_profile()[0]);
        assert_eq!(pcl.dew_point, snd.dew_point_profile()[0]);
    }

    #[test]
    fn test_mixed_layer_parcel_averages_the_lowest_layer() {
        let snd = standard_sounding();
        let pcl = mixed_layer_parcel(&snd).unwrap();

        let sfc = snd.surface_pressure().unwrap().unpack();
        assert!(pcl.pressure.unpack() < sfc);
        assert!(pcl.pressure.unpack() > sfc - MIXED_LAYER_DEPTH_HPA);

        // the mean temperature must sit between the extremes of the layer
        assert!(pcl.temperature.unpack() <= snd.temperature_profile()[0].unpack());
    }

    #[test]
    fn test_mixed_layer_parcel_skips_sentinel_levels() {
        let snd = standard_sounding();
        let mut dew_points = snd.dew_point_profile().to_vec();
        dew_points[1] = Celsius(-9999.0);
        let snd = snd.with_dew_point_profile(dew_points);

        // the sentinel level drops out of the mean instead of poisoning it
        let pcl = mixed_layer_parcel(&snd).unwrap();
        assert!(pcl.dew_point.unpack() > -100.0);
    }

    #[test]
    fn test_unstable_surface_parcel_has_positive_area() {
        let snd = standard_sounding();
        let pcl = surface_parcel(&snd).unwrap();
        let ascent = lift_parcel(ParcelOrigin::SurfaceBased, pcl, &snd).unwrap();

        assert!(ascent.has_positive_area());
        assert_eq!(ascent.trace_pressure().len(), ascent.trace_temperature().len());

        // the trace starts at the origin and pressure decreases along it
        assert!(approx_equal(
            ascent.trace_pressure()[0].unpack(),
            pcl.pressure.unpack(),
            1.0e-9
        ));
        assert!(ascent
            .trace_pressure()
            .windows(2)
            .all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_single_level_profile_still_yields_four_results() {
        let snd = crate::bulletin::parse_profile_block(
            "OUN",
            None,
            "PRES HGHT TMPC DWPC DRCT SPED\n1000 10 20 15 180 10",
        )
        .unwrap();

        let analyses = parcel_analyses(&snd).unwrap();
        assert_eq!(analyses.len(), 4);
        for ascent in &analyses {
            assert!(!ascent.has_positive_area());
        }
    }
}
