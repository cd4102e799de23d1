use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::types::{BackendDescriptor, StatusSnapshot};

#[derive(Clone, Debug, Deserialize)]
struct RawBackend {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

fn entry_list<'a>(parsed: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    if let Some(entries) = parsed.as_array() {
        return Ok(entries);
    }

    parsed
        .as_object()
        .and_then(|object| object.get("servers"))
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("unexpected JSON shape for {what} response"))
}

pub(super) fn parse_servers(raw: &str) -> Result<Vec<BackendDescriptor>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in server list")?;
    let entries = entry_list(&parsed, "server list")?;

    let mut seen = HashSet::with_capacity(entries.len());
    let mut servers = Vec::with_capacity(entries.len());
    for value in entries {
        let Ok(entry) = RawBackend::deserialize(value) else {
            continue;
        };
        let Some(name) = entry.name.filter(|name| !name.is_empty()) else {
            continue;
        };
        if !seen.insert(name.clone()) {
            log::warn!("ignoring duplicate backend `{name}` in server list");
            continue;
        }

        servers.push(BackendDescriptor {
            name,
            address: entry.address,
        });
    }

    Ok(servers)
}

fn lenient_u32(value: Option<&Value>) -> Option<u32> {
    let value = value?;
    if let Some(integer) = value.as_u64() {
        return u32::try_from(integer).ok();
    }

    value
        .as_f64()
        .filter(|number| number.is_finite() && *number >= 0.0 && *number <= u32::MAX as f64)
        .map(|number| number as u32)
}

fn lenient_f32(value: Option<&Value>) -> Option<f32> {
    value?
        .as_f64()
        .filter(|number| number.is_finite())
        .map(|number| number as f32)
}

fn snapshot_from_value(value: &Value) -> Option<StatusSnapshot> {
    let object = value.as_object()?;
    let name = object.get("name")?.as_str()?.to_string();

    Some(StatusSnapshot {
        name,
        online: object.get("online").and_then(Value::as_bool),
        player_count: lenient_u32(object.get("playerCount")),
        max_players: lenient_u32(object.get("maxPlayers")),
        tps: lenient_f32(object.get("tps")),
        latency_ms: lenient_u32(object.get("latency")),
        restricted: object.get("restricted").and_then(Value::as_bool),
    })
}

pub(super) fn parse_statuses(raw: &str) -> Result<Vec<StatusSnapshot>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in status list")?;
    let entries = entry_list(&parsed, "status")?;

    Ok(entries.iter().filter_map(snapshot_from_value).collect())
}
