use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Local;
use serde::Serialize;
use snus_app::{AppSnapshot, Coordinator, format_timestamp, parse_window};
use snus_core::{
    ClusterSummary, Entry, MapMarker, Settings, TimeWindow, WindowBounds, WindowStats,
    filter_window,
};

use tracing::debug;

use crate::args::{Command, SettingKey};

const SNAPSHOT_WAIT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct Logged {
    id: i64,
    today_count: usize,
}

#[derive(Debug, Serialize)]
struct Removed {
    id: Option<i64>,
    removed: bool,
}

#[derive(Debug, Serialize)]
struct Markers {
    markers: Vec<MapMarker>,
    summary: Option<ClusterSummary>,
}

pub async fn run(coordinator: &Coordinator, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Log => {
            let id = coordinator.log_entry().await?;
            let snapshot =
                wait_for_snapshot(coordinator, |snapshot| {
                    snapshot.today_entries.iter().any(|entry| entry.id == id)
                })
                .await;
            let logged = Logged {
                id,
                today_count: snapshot.today_count,
            };
            if json {
                print_json(&logged)?;
            } else {
                println!("Logged entry #{} ({} today)", logged.id, logged.today_count);
            }
        }
        Command::Undo => {
            let id = coordinator.undo_latest_today().await?;
            if json {
                print_json(&Removed {
                    id,
                    removed: id.is_some(),
                })?;
            } else {
                match id {
                    Some(id) => println!("Removed entry #{id}"),
                    None => println!("Nothing logged today"),
                }
            }
        }
        Command::Delete { id } => {
            let removed = coordinator.delete_entry(id).await?;
            if json {
                print_json(&Removed {
                    id: Some(id),
                    removed,
                })?;
            } else if removed {
                println!("Deleted entry #{id}");
            } else {
                println!("No entry #{id}");
            }
        }
        Command::List { window, limit } => {
            let snapshot = coordinator.snapshot();
            let entries = list_entries(&snapshot, window.map(TimeWindow::from), limit);
            if json {
                print_json(&entries)?;
            } else {
                print_entries(&entries);
            }
        }
        Command::Stats { window } => {
            if let Some(window) = window {
                coordinator.select_window(window.into());
            }
            let stats = coordinator.snapshot().stats;
            if json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Command::Settings => {
            let settings = coordinator.snapshot().settings;
            if json {
                print_json(&settings)?;
            } else {
                print_settings(&settings);
            }
        }
        Command::Set { key, value } => {
            let settings = apply_setting(coordinator, key, &value).await?;
            if json {
                print_json(&settings)?;
            } else {
                print_settings(&settings);
            }
        }
        Command::Markers => {
            let markers = coordinator.markers();
            let summary = ClusterSummary::from_markers(&markers);
            if json {
                print_json(&Markers { markers, summary })?;
            } else {
                print_markers(&markers, summary.as_ref());
            }
        }
    }
    Ok(())
}

async fn apply_setting(coordinator: &Coordinator, key: SettingKey, value: &str) -> Result<Settings> {
    let settings = match key {
        SettingKey::Cost => {
            let cost = parse_number(value).context("cost must be a number")?;
            coordinator.set_cost_per_package(cost).await?
        }
        SettingKey::Portions => {
            let units = parse_number(value).context("portions must be a number")?;
            coordinator.set_units_per_package(units).await?
        }
        SettingKey::Period => coordinator.set_display_window(parse_window(value)?).await?,
        SettingKey::DarkMode => coordinator.set_dark_mode(parse_switch(value)?).await?,
    };
    Ok(settings)
}

fn parse_number(value: &str) -> Result<f64> {
    Ok(value.trim().parse::<f64>()?)
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("expected on/off, got '{other}'"),
    }
}

/// Waits briefly for the live listener to catch up with a write made by this
/// process, then returns whatever the snapshot holds.
async fn wait_for_snapshot<F>(coordinator: &Coordinator, mut ready: F) -> AppSnapshot
where
    F: FnMut(&AppSnapshot) -> bool,
{
    let mut rx = coordinator.subscribe();
    match tokio::time::timeout(SNAPSHOT_WAIT, rx.wait_for(|snapshot| ready(snapshot))).await {
        Ok(Ok(_)) => {}
        Ok(Err(_)) => debug!("coordinator state closed while waiting for snapshot"),
        Err(_) => debug!(
            waited_ms = SNAPSHOT_WAIT.as_millis() as u64,
            "snapshot wait timed out; output may be stale"
        ),
    }
    coordinator.snapshot()
}

fn list_entries(snapshot: &AppSnapshot, window: Option<TimeWindow>, limit: usize) -> Vec<Entry> {
    let mut entries = match window {
        Some(window) => filter_window(
            &snapshot.all_entries,
            &WindowBounds::resolve(window, &Local::now()),
        ),
        None => snapshot.all_entries.as_ref().clone(),
    };
    entries.truncate(limit);
    entries
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No entries");
        return;
    }
    for entry in entries {
        let location = if entry.coordinates().is_sentinel() {
            "-".to_string()
        } else {
            format!("{:.5}, {:.5}", entry.latitude, entry.longitude)
        };
        println!(
            "#{:<6} {}  {}",
            entry.id,
            format_timestamp(entry.timestamp),
            location
        );
    }
}

fn print_stats(stats: &WindowStats) {
    let kind = if stats.projection.is_actual {
        "actual"
    } else {
        "estimated"
    };
    println!("Window:    {}", stats.window);
    println!("Total:     {}", stats.total);
    println!(
        "Projected: {:.1} ({kind})",
        stats.projection.projected_count
    );
    println!("Packages:  {:.2}", stats.packages);
    println!("Cost:      {:.2}", stats.cost);
}

fn print_settings(settings: &Settings) {
    println!("cost       {}", settings.cost_per_package);
    println!("portions   {}", settings.units_per_package);
    println!("period     {}", settings.display_window);
    println!(
        "dark-mode  {}",
        if settings.dark_mode { "on" } else { "off" }
    );
}

fn print_markers(markers: &[MapMarker], summary: Option<&ClusterSummary>) {
    for marker in markers {
        println!(
            "#{:<6} {:.5}, {:.5}  {}",
            marker.entry_id, marker.position.latitude, marker.position.longitude, marker.snippet
        );
    }
    match summary {
        Some(summary) => println!(
            "{} entries, {} to {}",
            summary.size, summary.first, summary.last
        ),
        None => println!("No entries"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use snus_app::{AppConfig, AppState, NoLocation};

    use super::*;

    fn snapshot_with(entries: Vec<Entry>) -> AppSnapshot {
        AppSnapshot {
            all_entries: Arc::new(entries),
            ..AppSnapshot::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_wait_gives_up_with_current_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = AppState::new(AppConfig::new(dir.path().join("cli.sqlite")));
        let coordinator = state.coordinator(Arc::new(NoLocation::new()));

        let snapshot = wait_for_snapshot(&coordinator, |snapshot| snapshot.today_count > 0).await;
        assert_eq!(snapshot.today_count, 0);
        assert!(snapshot.all_entries.is_empty());
    }

    #[test]
    fn switch_values() {
        assert!(parse_switch("On").expect("on"));
        assert!(!parse_switch("false").expect("false"));
        assert!(parse_switch("maybe").is_err());
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(parse_number(" 42.5 ").expect("number"), 42.5);
        assert!(parse_number("abc").is_err());
    }

    #[test]
    fn list_respects_limit_and_order() {
        let entries = (1..=5)
            .rev()
            .map(|id| Entry {
                id,
                ..Entry::new(id * 1_000)
            })
            .collect();
        let listed = list_entries(&snapshot_with(entries), None, 2);
        assert_eq!(listed.iter().map(|entry| entry.id).collect::<Vec<_>>(), vec![5, 4]);
    }

    #[test]
    fn list_filters_by_window() {
        let old = Entry {
            id: 1,
            ..Entry::new(86_400_000)
        };
        let now = Entry { id: 2, ..Entry::now() };
        let listed = list_entries(&snapshot_with(vec![now, old]), Some(TimeWindow::Daily), 10);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 2);
    }
}
