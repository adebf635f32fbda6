use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{GeoUrbanError, Result};

/// Category of simulated agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Bike,
    Pedestrian,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
            VehicleType::Pedestrian => "pedestrian",
        }
    }

    pub const fn all() -> &'static [VehicleType] {
        &[VehicleType::Car, VehicleType::Bike, VehicleType::Pedestrian]
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for VehicleType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "car" => Ok(VehicleType::Car),
            "bike" => Ok(VehicleType::Bike),
            "pedestrian" => Ok(VehicleType::Pedestrian),
            _ => Err(anyhow::anyhow!(
                "Unknown vehicle type '{value}'. Supported vehicle types: car, bike, pedestrian."
            )),
        }
    }
}

impl FromStr for VehicleType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Spatial partition used to aggregate movements into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    Agent,
    Hexagon,
    Square,
}

impl GridType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridType::Agent => "agent",
            GridType::Hexagon => "hexagon",
            GridType::Square => "square",
        }
    }

    pub const fn all() -> &'static [GridType] {
        &[GridType::Agent, GridType::Hexagon, GridType::Square]
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GridType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "agent" => Ok(GridType::Agent),
            "hexagon" => Ok(GridType::Hexagon),
            "square" => Ok(GridType::Square),
            _ => Err(anyhow::anyhow!(
                "Unknown grid type '{value}'. Supported grid types: agent, hexagon, square."
            )),
        }
    }
}

impl FromStr for GridType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Wire format of the returned payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutFormat {
    Esri,
    Json,
    #[default]
    GeoJson,
}

impl OutFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutFormat::Esri => "esri",
            OutFormat::Json => "json",
            OutFormat::GeoJson => "geojson",
        }
    }

    pub const fn all() -> &'static [OutFormat] {
        &[OutFormat::Esri, OutFormat::Json, OutFormat::GeoJson]
    }
}

impl fmt::Display for OutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OutFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "esri" => Ok(OutFormat::Esri),
            "json" => Ok(OutFormat::Json),
            "geojson" => Ok(OutFormat::GeoJson),
            _ => Err(anyhow::anyhow!(
                "Unknown output format '{value}'. Supported formats: esri, json, geojson."
            )),
        }
    }
}

impl FromStr for OutFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

pub const DEFAULT_SECONDS: u32 = 60;
pub const DEFAULT_METERS: f64 = 500.0;
pub const DEFAULT_LIMIT: u32 = 10;

/// Query pairs in wire order, ready for the transport.
pub type QueryPairs = Vec<(&'static str, String)>;

/// ISO-8601 without offset. Fractional seconds are written as six digits,
/// and only when the microsecond part is non-zero.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() / 1_000 == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateParams {
    pub region: String,
    pub datetime: NaiveDateTime,
    pub vehicle: VehicleType,
    pub grid: GridType,
    pub format: OutFormat,
}

impl AggregateParams {
    pub fn new(
        region: impl Into<String>,
        datetime: NaiveDateTime,
        vehicle: VehicleType,
        grid: GridType,
    ) -> Self {
        Self { region: region.into(), datetime, vehicle, grid, format: OutFormat::default() }
    }

    pub fn format(mut self, format: OutFormat) -> Self {
        self.format = format;
        self
    }

    pub fn query_pairs(&self) -> QueryPairs {
        vec![
            ("region", self.region.clone()),
            ("time", format_datetime(&self.datetime)),
            ("vehicle", self.vehicle.as_str().to_string()),
            ("grid", self.grid.as_str().to_string()),
            ("format", self.format.as_str().to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub datetime: NaiveDateTime,
    pub vehicle: VehicleType,
    pub latitude: f64,
    pub longitude: f64,
    pub seconds: u32,
    pub meters: f64,
    pub format: OutFormat,
}

impl QueryParams {
    pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
    pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);
    pub const SECONDS_RANGE: (u32, u32) = (1, 120);
    pub const METERS_RANGE: (f64, f64) = (1.0, 1000.0);

    pub fn new(datetime: NaiveDateTime, vehicle: VehicleType, latitude: f64, longitude: f64) -> Self {
        Self {
            datetime,
            vehicle,
            latitude,
            longitude,
            seconds: DEFAULT_SECONDS,
            meters: DEFAULT_METERS,
            format: OutFormat::default(),
        }
    }

    pub fn seconds(mut self, seconds: u32) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn meters(mut self, meters: f64) -> Self {
        self.meters = meters;
        self
    }

    pub fn format(mut self, format: OutFormat) -> Self {
        self.format = format;
        self
    }

    /// Checks every numeric input against its inclusive range.
    /// NaN and infinities never pass.
    pub fn validate(&self) -> Result<()> {
        check_f64("latitude", self.latitude, Self::LATITUDE_RANGE, "[-90.0, 90.0]")?;
        check_f64("longitude", self.longitude, Self::LONGITUDE_RANGE, "[-180.0, 180.0]")?;

        let (min, max) = Self::SECONDS_RANGE;
        if !(min..=max).contains(&self.seconds) {
            return Err(GeoUrbanError::Validation {
                field: "seconds",
                value: self.seconds.to_string(),
                range: "[1, 120]",
            });
        }

        check_f64("meters", self.meters, Self::METERS_RANGE, "[1.0, 1000.0]")
    }

    pub fn query_pairs(&self) -> QueryPairs {
        vec![
            ("datetime", format_datetime(&self.datetime)),
            ("seconds", self.seconds.to_string()),
            ("vehicle", self.vehicle.as_str().to_string()),
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
            ("meters", self.meters.to_string()),
            ("format", self.format.as_str().to_string()),
        ]
    }
}

fn check_f64(field: &'static str, value: f64, (min, max): (f64, f64), range: &'static str) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GeoUrbanError::Validation { field, value: value.to_string(), range })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopParams {
    pub region: String,
    pub date: NaiveDate,
    pub vehicle: VehicleType,
    pub grid: GridType,
    pub limit: u32,
    pub format: OutFormat,
}

impl TopParams {
    pub fn new(region: impl Into<String>, date: NaiveDate, vehicle: VehicleType, grid: GridType) -> Self {
        Self {
            region: region.into(),
            date,
            vehicle,
            grid,
            limit: DEFAULT_LIMIT,
            format: OutFormat::default(),
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn format(mut self, format: OutFormat) -> Self {
        self.format = format;
        self
    }

    pub fn query_pairs(&self) -> QueryPairs {
        vec![
            ("region", self.region.clone()),
            ("date", format_date(&self.date)),
            ("vehicle", self.vehicle.as_str().to_string()),
            ("grid", self.grid.as_str().to_string()),
            ("limit", self.limit.to_string()),
            ("format", self.format.as_str().to_string()),
        ]
    }
}
