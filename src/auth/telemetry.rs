//! Request telemetry capture

use super::request::IncomingRequest;
use crate::types::Telemetry;
use chrono::Utc;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

impl Telemetry {
    /// Snapshot `request`, stamped with the current time
    pub fn capture<R>(request: &R, client_ip_header: &str) -> Self
    where
        R: IncomingRequest + ?Sized,
    {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in request.headers() {
            let value = String::from_utf8_lossy(value.as_bytes());
            match headers.entry(name.as_str().to_string()) {
                Entry::Occupied(mut entry) => {
                    let joined = entry.get_mut();
                    joined.push_str(", ");
                    joined.push_str(&value);
                }
                Entry::Vacant(entry) => {
                    entry.insert(value.into_owned());
                }
            }
        }

        let ipaddress = request
            .headers()
            .get(client_ip_header)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
            .unwrap_or_default()
            .to_string();

        Self {
            url: request.url(),
            method: request.method().to_string(),
            headers,
            ipaddress,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
