use std::fmt::Display;

use chrono::{Local, TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Coordinates, Entry};

/// Spread applied to marker positions so entries logged at the same spot
/// remain individually visible.
pub const DEFAULT_MARKER_JITTER: f64 = 0.001;

const MARKER_TITLE: &str = "Snus Entry Date & Time";
const SNIPPET_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub entry_id: i64,
    pub position: Coordinates,
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub size: usize,
    pub first: String,
    pub last: String,
}

impl ClusterSummary {
    pub fn from_markers(markers: &[MapMarker]) -> Option<Self> {
        let first = markers.iter().map(|marker| &marker.snippet).min()?;
        let last = markers.iter().map(|marker| &marker.snippet).max()?;
        Some(Self {
            size: markers.len(),
            first: first.clone(),
            last: last.clone(),
        })
    }
}

pub fn markers_for(entries: &[Entry], jitter: f64) -> Vec<MapMarker> {
    markers_in(entries, jitter, &Local, &mut rand::thread_rng())
}

pub fn markers_in<Tz, R>(entries: &[Entry], jitter: f64, tz: &Tz, rng: &mut R) -> Vec<MapMarker>
where
    Tz: TimeZone,
    Tz::Offset: Display,
    R: Rng + ?Sized,
{
    entries
        .iter()
        .map(|entry| {
            let snippet = entry
                .recorded_at()
                .map(|ts| ts.with_timezone(tz).format(SNIPPET_FORMAT).to_string())
                .unwrap_or_default();
            MapMarker {
                entry_id: entry.id,
                position: Coordinates::new(
                    entry.latitude + offset(rng, jitter),
                    entry.longitude + offset(rng, jitter),
                ),
                title: MARKER_TITLE.to_string(),
                snippet,
            }
        })
        .collect()
}

fn offset<R: Rng + ?Sized>(rng: &mut R, jitter: f64) -> f64 {
    if jitter <= 0.0 {
        return 0.0;
    }
    (rng.r#gen::<f64>() - 0.5) * jitter
}
