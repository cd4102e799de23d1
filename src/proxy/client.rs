use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use super::parse::{parse_servers, parse_statuses};
use super::types::{BackendDescriptor, StatusSnapshot};

pub trait TopologySource: Send + Sync {
    fn fetch_servers(&self, proxy_id: &str) -> Result<Vec<BackendDescriptor>>;

    fn fetch_status(&self, proxy_id: &str) -> Result<Vec<StatusSnapshot>>;
}

pub struct HttpTopologySource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpTopologySource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn endpoint(&self, proxy_id: &str, resource: &str) -> String {
        format!("{}/api/proxies/{proxy_id}/{resource}", self.base_url)
    }

    fn get_text(&self, url: &str) -> Result<String> {
        match self.agent.get(url).call() {
            Ok(response) => response
                .into_string()
                .with_context(|| format!("failed to read response body from {url}")),
            Err(ureq::Error::Status(code, _)) => Err(anyhow!("{url} answered with HTTP {code}")),
            Err(error) => Err(error).with_context(|| format!("request to {url} failed")),
        }
    }
}

impl TopologySource for HttpTopologySource {
    fn fetch_servers(&self, proxy_id: &str) -> Result<Vec<BackendDescriptor>> {
        let url = self.endpoint(proxy_id, "servers");
        let raw = self.get_text(&url)?;
        parse_servers(&raw).with_context(|| format!("failed to parse server list from {url}"))
    }

    fn fetch_status(&self, proxy_id: &str) -> Result<Vec<StatusSnapshot>> {
        let url = self.endpoint(proxy_id, "status");
        let raw = self.get_text(&url)?;
        parse_statuses(&raw).with_context(|| format!("failed to parse status list from {url}"))
    }
}
