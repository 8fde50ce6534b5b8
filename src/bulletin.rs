//! Split a multi-station text bulletin into per-station records and build soundings from the
//! tabular blocks.
//!
//! Bulletins are a sequence of station sections. Each section starts with a marker line holding
//! `STID = <id> ... TIME = <yymmdd/hhmm>` tokens, followed by three metadata lines, the tabular
//! profile block, and two trailer lines before the next marker.

use crate::{
    error::{Result, SkewtError},
    sounding::Sounding,
};
use chrono::NaiveDateTime;
use itertools::Itertools;
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use std::collections::HashMap;

/// Line token that marks the start of a station section.
const STATION_MARKER: &str = "STID";

/// Number of metadata lines between a marker line and the start of the tabular block.
const HEADER_SKIP: usize = 3;

/// Number of trailer lines between the end of the tabular block and the next marker line.
const TRAILER_SKIP: usize = 2;

/// Valid time format used in the marker line, eg `210518/1200`.
const TIME_FORMAT: &str = "%y%m%d/%H%M";

/// Column labels a profile block header must provide.
const REQUIRED_COLUMNS: [&str; 6] = ["PRES", "HGHT", "TMPC", "DWPC", "DRCT", "SPED"];

/// One raw record windowed out of a bulletin: the tabular text for a single station and valid
/// time, ready to be parsed into a [`Sounding`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    /// Valid time parsed from the marker line, when present and parseable.
    pub valid_time: Option<NaiveDateTime>,
    /// The tabular text, header line first.
    pub text: String,
}

/// Mapping from station identifier to that station's records in discovery order.
pub type StationRecords = HashMap<String, Vec<RawRecord>>;

/// Split the full text of a bulletin into per-station raw records.
///
/// Records are windowed between consecutive marker lines, so a final marker with no marker after
/// it never yields a record and the last section of a bulletin is not extracted.
pub fn split_bulletin(text: &str) -> Result<StationRecords> {
    let lines: Vec<&str> = text.lines().collect();

    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(STATION_MARKER))
        .map(|(i, _)| i)
        .collect();

    if markers.len() < 2 {
        return Err(SkewtError::BulletinTooShort);
    }

    let mut records = StationRecords::new();

    for (a, z) in markers.iter().copied().tuple_windows() {
        let id = match station_id(lines[a]) {
            Some(id) => id,
            None => {
                tracing::warn!("marker on line {} has no station identifier, skipping", a + 1);
                continue;
            }
        };

        let start = a + HEADER_SKIP;
        let end = z.saturating_sub(TRAILER_SKIP);
        let text = if start < end {
            lines[start..end].join("\n")
        } else {
            String::new()
        };

        let record = RawRecord {
            valid_time: valid_time(lines[a]),
            text,
        };

        records
            .entry(id.to_owned())
            .or_insert_with(Vec::new)
            .push(record);
    }

    Ok(records)
}

// The identifier is the first whitespace delimited token after the first '=' in the marker line.
fn station_id(marker_line: &str) -> Option<&str> {
    marker_line
        .splitn(2, '=')
        .nth(1)?
        .split_whitespace()
        .next()
}

// The valid time is the first whitespace delimited token after the last '=' in the marker line.
fn valid_time(marker_line: &str) -> Option<NaiveDateTime> {
    let token = marker_line.rsplit('=').next()?.split_whitespace().next()?;
    NaiveDateTime::parse_from_str(token, TIME_FORMAT).ok()
}

/// Parse one tabular profile block into a [`Sounding`].
///
/// The first line is a whitespace delimited header that must name all of the `PRES`, `HGHT`,
/// `TMPC`, `DWPC`, `DRCT`, and `SPED` columns (extra columns are allowed and ignored). Every
/// following row must have exactly as many fields as the header. Sentinel values are kept
/// verbatim, screening them is a display time concern.
pub fn parse_profile_block(
    station_id: &str,
    valid_time: Option<NaiveDateTime>,
    block: &str,
) -> Result<Sounding> {
    let mut lines = block.lines();
    let header: Vec<&str> = lines.next().unwrap_or("").split_whitespace().collect();

    let mut columns = [0usize; 6];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
        *slot = header
            .iter()
            .position(|tok| tok == name)
            .ok_or(SkewtError::MissingColumn(*name))?;
    }
    let [pres_col, hght_col, tmpc_col, dwpc_col, drct_col, sped_col] = columns;

    let mut pressure: Vec<HectoPascal> = Vec::new();
    let mut height: Vec<Meters> = Vec::new();
    let mut temperature: Vec<Celsius> = Vec::new();
    let mut dew_point: Vec<Celsius> = Vec::new();
    let mut wind: Vec<WindSpdDir<Knots>> = Vec::new();

    for (i, line) in lines.enumerate() {
        let row = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() != header.len() {
            return Err(SkewtError::RowLengthMismatch {
                row,
                expected: header.len(),
                found: fields.len(),
            });
        }

        let value = |col: usize| -> Result<f64> {
            fields[col]
                .parse()
                .map_err(|_| SkewtError::InvalidNumber(row))
        };

        pressure.push(HectoPascal(value(pres_col)?));
        height.push(Meters(value(hght_col)?));
        temperature.push(Celsius(value(tmpc_col)?));
        dew_point.push(Celsius(value(dwpc_col)?));
        wind.push(WindSpdDir {
            direction: value(drct_col)?,
            speed: Knots(value(sped_col)?),
        });
    }

    Ok(Sounding::new()
        .with_station_id(station_id)
        .with_valid_time(valid_time)
        .with_pressure_profile(pressure)
        .with_height_profile(height)
        .with_temperature_profile(temperature)
        .with_dew_point_profile(dew_point)
        .with_wind_profile(wind))
}

/// Split a bulletin and build every record into a [`Sounding`], keyed by station.
///
/// A record that fails to build is logged with its station and valid time and dropped; the rest
/// of the bulletin stays usable.
pub fn load_bulletin(text: &str) -> Result<HashMap<String, Vec<Sounding>>> {
    let records = split_bulletin(text)?;

    let mut soundings: HashMap<String, Vec<Sounding>> = HashMap::new();
    for (id, recs) in records {
        let built = build_station(&id, &recs);
        if !built.is_empty() {
            soundings.insert(id, built);
        }
    }

    Ok(soundings)
}

/// Split a bulletin and build the records for a single station, in bulletin order.
pub fn load_station(text: &str, station: &str) -> Result<Vec<Sounding>> {
    let records = split_bulletin(text)?;

    let recs = records
        .get(station)
        .ok_or_else(|| SkewtError::UnknownStation(station.to_owned()))?;

    Ok(build_station(station, recs))
}

fn build_station(id: &str, recs: &[RawRecord]) -> Vec<Sounding> {
    recs.iter()
        .filter_map(
            |rec| match parse_profile_block(id, rec.valid_time, &rec.text) {
                Ok(snd) => {
                    tracing::debug!("built sounding for {} at {:?}", id, rec.valid_time);
                    Some(snd)
                }
                Err(err) => {
                    tracing::warn!(
                        "dropping unusable record for {} at {:?}: {}",
                        id,
                        rec.valid_time,
                        err
                    );
                    None
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn section(id: &str, time: &str, rows: &[&str]) -> String {
        let mut text = format!(
            " STID = {} STNM = 72357 TIME = {}\n SLAT = 35.18 SLON = -97.44 SELV = 345.0\n STIM = 1200\n",
            id, time
        );
        text.push_str(" PRES HGHT TMPC DWPC DRCT SPED\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.push_str("\n\n");
        text
    }

    fn three_site_bulletin() -> String {
        let mut text = section(
            "OUN",
            "210518/1200",
            &[" 1000.0 362.0 21.2 17.2 175.0 14.0", " 850.0 1543.0 12.6 10.1 190.0 25.0"],
        );
        text.push_str(&section(
            "DDC",
            "210518/1200",
            &[" 925.0 793.0 18.4 12.0 160.0 18.0"],
        ));
        text.push_str(&section("OUN", "210519/0000", &[" 1000.0 360.0 24.0 18.0 180.0 12.0"]));
        text
    }

    #[test]
    fn test_marker_count_yields_one_less_block() {
        let records = split_bulletin(&three_site_bulletin()).unwrap();

        let total: usize = records.values().map(Vec::len).sum();
        assert_eq!(total, 2); // three markers, the final section is never extracted

        assert_eq!(records["OUN"].len(), 1);
        assert_eq!(records["DDC"].len(), 1);
    }

    #[test]
    fn test_block_windowing_skips_metadata_and_trailer() {
        let records = split_bulletin(&three_site_bulletin()).unwrap();

        let block = &records["OUN"][0].text;
        assert!(block.starts_with(" PRES HGHT TMPC DWPC DRCT SPED"));
        assert!(block.contains("1000.0"));
        assert!(!block.contains("SLAT"));
        assert!(!block.contains("STID"));
    }

    #[test]
    fn test_valid_time_parsed_from_marker() {
        let records = split_bulletin(&three_site_bulletin()).unwrap();

        assert_eq!(
            records["OUN"][0].valid_time,
            Some(NaiveDate::from_ymd(2021, 5, 18).and_hms(12, 0, 0))
        );
    }

    #[test]
    fn test_repeated_station_appends_in_order() {
        let mut text = three_site_bulletin();
        // One more trailing section so the second OUN record gets windowed out too.
        text.push_str(&section("END", "210519/1200", &[]));

        let records = split_bulletin(&text).unwrap();
        assert_eq!(records["OUN"].len(), 2);
        assert_eq!(
            records["OUN"][1].valid_time,
            Some(NaiveDate::from_ymd(2021, 5, 19).and_hms(0, 0, 0))
        );
    }

    #[test]
    fn test_too_few_markers_is_an_error() {
        assert_eq!(split_bulletin("").unwrap_err(), SkewtError::BulletinTooShort);
        assert_eq!(
            split_bulletin(" STID = OUN TIME = 210518/1200\n").unwrap_err(),
            SkewtError::BulletinTooShort
        );
    }

    #[test]
    fn test_parse_profile_block_single_row() {
        let block = "PRES HGHT TMPC DWPC DRCT SPED\n1000 0 20 15 180 10";
        let snd = parse_profile_block("OUN", None, block).unwrap();

        assert_eq!(snd.len(), 1);
        assert_eq!(snd.surface_pressure(), Some(HectoPascal(1000.0)));
        assert_eq!(snd.temperature_profile()[0], Celsius(20.0));
        assert_eq!(snd.dew_point_profile()[0], Celsius(15.0));
        // direction and speed are stored unconverted
        assert_eq!(snd.wind_profile()[0].direction, 180.0);
        assert_eq!(snd.wind_profile()[0].speed, Knots(10.0));
    }

    #[test]
    fn test_parse_profile_block_reordered_and_extra_columns() {
        let block = "HGHT PRES LIFT TMPC DWPC DRCT SPED\n0 1000 1.2 20 15 180 10";
        let snd = parse_profile_block("OUN", None, block).unwrap();

        assert_eq!(snd.surface_pressure(), Some(HectoPascal(1000.0)));
        assert_eq!(snd.height_profile()[0], Meters(0.0));
    }

    #[test]
    fn test_parse_profile_block_sentinels_preserved() {
        let block = "PRES HGHT TMPC DWPC DRCT SPED\n850 -9999.0 -9999.0 -9999.0 190 25";
        let snd = parse_profile_block("OUN", None, block).unwrap();

        assert_eq!(snd.height_profile()[0], Meters(-9999.0));
        assert_eq!(snd.temperature_profile()[0], Celsius(-9999.0));
    }

    #[test]
    fn test_parse_profile_block_missing_column() {
        let block = "PRES HGHT TMPC DWPC DRCT\n1000 0 20 15 180";
        assert_eq!(
            parse_profile_block("OUN", None, block).unwrap_err(),
            SkewtError::MissingColumn("SPED")
        );
    }

    #[test]
    fn test_parse_profile_block_row_mismatch() {
        let block = "PRES HGHT TMPC DWPC DRCT SPED\n1000 0 20 15 180 10\n850 1543 12.6";
        assert_eq!(
            parse_profile_block("OUN", None, block).unwrap_err(),
            SkewtError::RowLengthMismatch {
                row: 2,
                expected: 6,
                found: 3
            }
        );
    }

    #[test]
    fn test_load_station_tolerates_bad_records() {
        let mut text = section(
            "OUN",
            "210518/1200",
            &[" 1000.0 362.0 21.2 17.2 175.0 14.0", " 850.0 1543.0 12.6"],
        );
        text.push_str(&section("OUN", "210519/0000", &[" 1000.0 360.0 24.0 18.0 180.0 12.0"]));
        text.push_str(&section("END", "210519/1200", &[]));

        let soundings = load_station(&text, "OUN").unwrap();

        // the first record has a short row and is dropped, the second survives
        assert_eq!(soundings.len(), 1);
        assert_eq!(soundings[0].surface_pressure(), Some(HectoPascal(1000.0)));
        assert_eq!(soundings[0].temperature_profile()[0], Celsius(24.0));
    }

    #[test]
    fn test_load_station_unknown_id() {
        assert_eq!(
            load_station(&three_site_bulletin(), "XXX").unwrap_err(),
            SkewtError::UnknownStation("XXX".to_owned())
        );
    }
}
