use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::schema::Request;

/// Reads a snapshot of request records exported from the record store.
/// `.json` files hold a JSON array, `.yaml`/`.yml` files a YAML sequence.
pub fn load_requests(path: &Path) -> Result<Vec<Request>> {
    let raw = fs::read_to_string(path)?;
    let requests: Vec<Request> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw)?,
        Some("yaml" | "yml") => serde_yaml::from_str(&raw)?,
        _ => return Err(anyhow!("Unsupported snapshot format: {}", path.display())),
    };

    let mut seen = HashSet::new();
    for request in &requests {
        if !seen.insert(request.request_id.as_str()) {
            return Err(anyhow!("Duplicate request_id in snapshot: {}", request.request_id));
        }
    }

    tracing::info!(path = %path.display(), count = requests.len(), "loaded request snapshot");
    Ok(requests)
}

pub fn find_request<'a>(requests: &'a [Request], request_id: &str) -> Option<&'a Request> {
    let wanted = request_id.trim();
    requests.iter().find(|request| request.request_id == wanted)
}
