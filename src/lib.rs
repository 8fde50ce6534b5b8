#![warn(missing_docs)]
//! An interactive skew-T log-P and hodograph display core for weather soundings.
//!
//! This crate holds the display side logic of a sounding viewer: splitting multi-station text
//! bulletins into per-station records and rebuilding tabular profiles from them, choosing and
//! lifting the four display parcels, mapping pixels to pressure and temperature coordinates in
//! both panes, and driving the live pointer readout without churning canvas elements.
//!
//! The thermodynamics comes from the [metfor](https://crates.io/crates/metfor) crate and all
//! drawing is delegated to the embedding toolkit through the [`Canvas`] trait, so the crate
//! never touches pixels or the event loop itself.

//
// API
//
pub use crate::{
    bulletin::{
        load_bulletin, load_station, parse_profile_block, split_bulletin, RawRecord,
        StationRecords,
    },
    canvas::{Canvas, ElementId, TextAnchor},
    config::{HodoConfig, SkewTConfig},
    coords::{HodoFrame, SampledLevel, Sampler, SkewTFrame},
    error::{Result, SkewtError},
    interpolation::linear_interpolate,
    parcel::{
        define_parcel, effective_parcel, lift_parcel, mixed_layer_parcel, most_unstable_parcel,
        parcel_analyses, surface_parcel, Parcel, ParcelAscent, ParcelOrigin,
    },
    readout::{ReadoutController, ReadoutElements},
    render::OverlayRenderer,
    sounding::{
        screen_height, screen_temperature, screen_wind, Sounding, MISSING, MISSING_T_THRESHOLD,
    },
};

// Modules
mod bulletin;
mod canvas;
mod config;
mod coords;
mod error;
mod interpolation;
mod parcel;
mod readout;
mod render;
mod sounding;

#[cfg(test)]
mod test_data;
