//! Local place resolution from a static table of country bounding boxes.

use crate::geo::GeoCoordinate;
use crate::lookup::{LookupRequest, LookupResult, PlaceResolver, UNKNOWN_COUNTRY};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// What the popup shows for a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceInfo {
    pub country: String,
    pub timezone: String,
    pub local_time: String,
}

/// An axis-aligned rectangle in latitude/longitude, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryBox {
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl CountryBox {
    pub fn new(name: &str, lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            name: name.to_string(),
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    #[inline]
    pub fn contains(&self, c: GeoCoordinate) -> bool {
        (self.lat_min..=self.lat_max).contains(&c.lat_deg)
            && (self.lon_min..=self.lon_max).contains(&c.lon_deg)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read country table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("country table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("box {0:?} has min > max")]
    Inverted(String),
}

/// Ordered country boxes. Boxes may overlap or leave gaps; the first box that
/// contains a coordinate wins.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    boxes: Vec<CountryBox>,
}

impl CountryTable {
    pub fn new(boxes: Vec<CountryBox>) -> Self {
        Self { boxes }
    }

    /// Parses a JSON array of `{name, latMin, latMax, lonMin, lonMax}` records.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let boxes: Vec<CountryBox> = serde_json::from_str(json)?;
        if let Some(b) = boxes
            .iter()
            .find(|b| b.lat_min > b.lat_max || b.lon_min > b.lon_max)
        {
            return Err(TableError::Inverted(b.name.clone()));
        }
        Ok(Self { boxes })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Coarse built-in rectangles. Smaller countries come before the larger
    /// ones whose boxes swallow them.
    pub fn builtin() -> Self {
        #[rustfmt::skip]
        let boxes = vec![
            CountryBox::new("Switzerland",     45.8,  47.8,    5.9,   10.5),
            CountryBox::new("Netherlands",     50.7,  53.6,    3.3,    7.2),
            CountryBox::new("United Kingdom",  49.9,  60.9,   -8.2,    1.8),
            CountryBox::new("Ireland",         51.4,  55.4,  -10.5,   -6.0),
            CountryBox::new("Portugal",        36.9,  42.2,   -9.6,   -6.2),
            CountryBox::new("Spain",           36.0,  43.8,   -9.3,    3.3),
            CountryBox::new("Italy",           36.6,  47.1,    6.6,   18.5),
            CountryBox::new("Germany",         47.3,  55.1,    5.9,   15.0),
            CountryBox::new("France",          42.3,  51.1,   -4.8,    8.2),
            CountryBox::new("Japan",           24.0,  45.6,  122.9,  145.8),
            CountryBox::new("South Korea",     33.1,  38.6,  124.6,  131.9),
            CountryBox::new("New Zealand",    -47.3, -34.4,  166.4,  178.6),
            CountryBox::new("Egypt",           22.0,  31.7,   24.7,   36.9),
            CountryBox::new("South Africa",   -34.8, -22.1,   16.5,   32.9),
            CountryBox::new("Kenya",           -4.7,   5.0,   33.9,   41.9),
            CountryBox::new("Nigeria",          4.3,  13.9,    2.7,   14.7),
            CountryBox::new("Mexico",          14.5,  32.7, -118.4,  -86.7),
            CountryBox::new("Argentina",      -55.1, -21.8,  -73.6,  -53.6),
            CountryBox::new("Brazil",         -33.8,   5.3,  -74.0,  -34.8),
            CountryBox::new("India",            6.7,  35.5,   68.1,   97.4),
            CountryBox::new("China",           18.2,  53.6,   73.5,  134.8),
            CountryBox::new("Australia",      -43.7, -10.7,  113.3,  153.6),
            CountryBox::new("United States",   24.5,  49.4, -124.8,  -66.9),
            CountryBox::new("Canada",          41.7,  83.1, -141.0,  -52.6),
            CountryBox::new("Russia",          41.2,  81.9,   27.3,  180.0),
        ];
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// First containing box by table order, else [`UNKNOWN_COUNTRY`].
    pub fn lookup(&self, c: GeoCoordinate) -> &str {
        self.boxes
            .iter()
            .find(|b| b.contains(c))
            .map_or(UNKNOWN_COUNTRY, |b| b.name.as_str())
    }
}

/// Resolves synchronously from a [`CountryTable`].
///
/// Timezone and time are the viewer's own (environment `TZ`, else the local
/// UTC offset), not those of the hovered region.
#[derive(Debug)]
pub struct LocalResolver {
    table: CountryTable,
    ready: VecDeque<LookupResult>,
}

impl LocalResolver {
    pub fn new(table: CountryTable) -> Self {
        Self {
            table,
            ready: VecDeque::new(),
        }
    }

    pub fn table(&self) -> &CountryTable {
        &self.table
    }

    pub fn resolve(&self, c: GeoCoordinate) -> PlaceInfo {
        let now = chrono::Local::now();
        let timezone = std::env::var("TZ")
            .ok()
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or_else(|| now.format("UTC%:z").to_string());

        PlaceInfo {
            country: self.table.lookup(c).to_string(),
            timezone,
            local_time: now.format("%H:%M:%S").to_string(),
        }
    }
}

impl PlaceResolver for LocalResolver {
    fn cooldown(&self) -> Option<Duration> {
        None
    }

    fn submit(&mut self, request: LookupRequest) {
        let place = self.resolve(request.coord);
        self.ready.push_back(LookupResult {
            ticket: request.ticket,
            outcome: Ok(place),
        });
    }

    fn poll(&mut self) -> Option<LookupResult> {
        self.ready.pop_front()
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
