use reqwest::StatusCode;
use tracing::{debug, warn};

/// Outcome of probing the Ollama root endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    /// 200, with the server banner ("Ollama is running")
    Reachable { banner: String },
    /// Something answered, but not with 200
    Unhealthy { status: u16 },
    /// Connection failed, or dropped before the body was read
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Reachability::Reachable { .. })
    }
}

// Single GET on the base url, no retry
pub async fn probe(client: &reqwest::Client, base_url: &str) -> Reachability {
    let res = match client.get(base_url).send().await {
        Ok(res) => res,
        Err(e) => {
            warn!(url = base_url, error = %e, "ollama is not running");
            return Reachability::Unreachable;
        }
    };

    let status = res.status();
    if status != StatusCode::OK {
        warn!(url = base_url, status = status.as_u16(), "ollama answered with unexpected status");
        return Reachability::Unhealthy {
            status: status.as_u16(),
        };
    }

    // connection dropped before the body arrived
    let banner = match res.text().await {
        Ok(banner) => banner,
        Err(e) => {
            warn!(url = base_url, error = %e, "can not read ollama status body");
            return Reachability::Unreachable;
        }
    };
    debug!(url = base_url, banner = %banner.trim(), "ollama reachable");
    Reachability::Reachable { banner }
}
