use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::location_map_repo::{self, EntityKind};
use crate::models::CountryAggregateRow;
use crate::services::country_reference;

#[derive(Debug, thiserror::Error)]
pub enum LocationMapError {
    #[error("location data unavailable: {0}")]
    DataAccess(#[from] sqlx::Error),
    #[error("invalid location filter: {0}")]
    InvalidFilter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationType {
    Members,
    Organizations,
    #[default]
    Both,
}

impl LocationType {
    /// Parses the `type` query value. Absent or blank means `Both`; an
    /// unrecognized value is `None` so the caller decides how strict to be.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Some(LocationType::Both),
            Some("members") => Some(LocationType::Members),
            Some("organizations") => Some(LocationType::Organizations),
            Some("both") => Some(LocationType::Both),
            Some(_) => None,
        }
    }

    pub fn includes(self, kind: EntityKind) -> bool {
        match self {
            LocationType::Both => true,
            LocationType::Members => kind == EntityKind::Members,
            LocationType::Organizations => kind == EntityKind::Organizations,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    pub location_type: LocationType,
    pub segments: BTreeSet<Uuid>,
}

impl LocationFilter {
    /// Builds a filter from the raw `type` and comma separated `segments`
    /// query values. With `strict_type` an unknown type is rejected instead
    /// of widening to both collections.
    pub fn from_query(
        raw_type: Option<&str>,
        raw_segments: Option<&str>,
        strict_type: bool,
    ) -> Result<Self, LocationMapError> {
        let location_type = match LocationType::parse(raw_type) {
            Some(t) => t,
            None if strict_type => {
                return Err(LocationMapError::InvalidFilter(format!(
                    "unknown type '{}'",
                    raw_type.unwrap_or_default()
                )))
            }
            None => {
                debug!(raw_type = ?raw_type, "Unknown location map type, using both");
                LocationType::Both
            }
        };

        let mut segments = BTreeSet::new();
        for part in raw_segments
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let id = Uuid::parse_str(part).map_err(|_| {
                LocationMapError::InvalidFilter(format!("segment id '{}' is not a uuid", part))
            })?;
            segments.insert(id);
        }

        Ok(Self {
            location_type,
            segments,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryAggregate {
    pub country_code: String,
    pub count: u64,
    pub mean_latitude: Option<f64>,
    pub mean_longitude: Option<f64>,
}

impl From<CountryAggregateRow> for CountryAggregate {
    fn from(row: CountryAggregateRow) -> Self {
        Self {
            country_code: row.country_code,
            count: u64::try_from(row.record_count).unwrap_or(0),
            mean_latitude: row.mean_latitude,
            mean_longitude: row.mean_longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "coordinateSource", rename_all = "camelCase")]
pub enum Coordinates {
    Computed { latitude: f64, longitude: f64 },
    StaticFallback { latitude: f64, longitude: f64 },
    Unknown,
}

impl Coordinates {
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match *self {
            Coordinates::Computed {
                latitude,
                longitude,
            }
            | Coordinates::StaticFallback {
                latitude,
                longitude,
            } => Some((latitude, longitude)),
            Coordinates::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedLocation {
    pub country_code: String,
    pub country_name: String,
    pub count: u64,
    #[serde(flatten)]
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationTotals {
    pub members: u64,
    pub organizations: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationMapResult {
    pub members: Vec<EnrichedLocation>,
    pub organizations: Vec<EnrichedLocation>,
    pub totals: LocationTotals,
}

pub async fn aggregate(
    pool: &SqlitePool,
    kind: EntityKind,
    segments: &BTreeSet<Uuid>,
) -> Result<Vec<CountryAggregate>, LocationMapError> {
    let segment_ids: Vec<Uuid> = segments.iter().copied().collect();
    let rows = location_map_repo::load_country_aggregates(pool, kind, &segment_ids).await?;
    debug!(
        kind = kind.as_str(),
        countries = rows.len(),
        segments = segment_ids.len(),
        "Loaded country aggregates"
    );
    Ok(rows.into_iter().map(CountryAggregate::from).collect())
}

pub fn enrich(aggregate: &CountryAggregate) -> EnrichedLocation {
    let country_name = country_reference::country_name(&aggregate.country_code)
        .map(|s| s.to_string())
        .unwrap_or_else(|| aggregate.country_code.clone());

    let coordinates = match (aggregate.mean_latitude, aggregate.mean_longitude) {
        (Some(latitude), Some(longitude)) => Coordinates::Computed {
            latitude,
            longitude,
        },
        _ => match country_reference::country_coordinates(&aggregate.country_code) {
            Some((latitude, longitude)) => Coordinates::StaticFallback {
                latitude,
                longitude,
            },
            None => Coordinates::Unknown,
        },
    };

    EnrichedLocation {
        country_code: aggregate.country_code.clone(),
        country_name,
        count: aggregate.count,
        coordinates,
    }
}

async fn load_enriched(
    pool: &SqlitePool,
    filter: &LocationFilter,
    kind: EntityKind,
) -> Result<Vec<EnrichedLocation>, LocationMapError> {
    if !filter.location_type.includes(kind) {
        return Ok(Vec::new());
    }
    let aggregates = aggregate(pool, kind, &filter.segments).await?;
    Ok(aggregates.iter().map(enrich).collect())
}

pub async fn get_location_map(
    pool: &SqlitePool,
    filter: &LocationFilter,
) -> Result<LocationMapResult, LocationMapError> {
    let (members, organizations) = tokio::try_join!(
        load_enriched(pool, filter, EntityKind::Members),
        load_enriched(pool, filter, EntityKind::Organizations),
    )?;

    let totals = LocationTotals {
        members: members.iter().map(|l| l.count).sum(),
        organizations: organizations.iter().map(|l| l.count).sum(),
    };

    info!(
        location_type = ?filter.location_type,
        segments = filter.segments.len(),
        member_countries = members.len(),
        organization_countries = organizations.len(),
        total_members = totals.members,
        total_organizations = totals.organizations,
        "Location map built"
    );

    Ok(LocationMapResult {
        members,
        organizations,
        totals,
    })
}
