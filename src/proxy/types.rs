#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub name: String,
    pub address: Option<String>,
}

/// Live status of one backend, keyed by backend name.
///
/// Every field is optional: a missing or malformed value is left as `None` and
/// resolved to its default when the snapshot is applied to a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusSnapshot {
    pub name: String,
    pub online: Option<bool>,
    pub player_count: Option<u32>,
    pub max_players: Option<u32>,
    pub tps: Option<f32>,
    pub latency_ms: Option<u32>,
    pub restricted: Option<bool>,
}

impl StatusSnapshot {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
