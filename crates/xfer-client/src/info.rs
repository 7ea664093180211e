//! Post-transfer metadata.

use serde::Serialize;
use serde_json::{Map, Value};

/// Snapshot of what the engine reports about the last transfer.
///
/// Field names are the short getinfo keys (`http_code`, `total_time`, ...).
/// Empty until a transfer has been performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferInfo {
    /// Last effective URL.
    pub url: Option<String>,
    pub content_type: Option<String>,
    /// Last HTTP response code, 0 if none was received.
    pub http_code: u32,
    pub header_size: u64,
    pub request_size: u64,
    pub redirect_count: u32,
    pub redirect_url: Option<String>,
    /// Seconds, whole transfer.
    pub total_time: f64,
    pub namelookup_time: f64,
    pub connect_time: f64,
    pub pretransfer_time: f64,
    pub starttransfer_time: f64,
    pub redirect_time: f64,
    /// Bytes downloaded.
    pub size_download: f64,
    /// `Content-Length` of the download, -1 if unknown.
    pub download_content_length: f64,
    pub primary_ip: Option<String>,
    pub primary_port: u16,
    pub local_ip: Option<String>,
    pub local_port: u16,
}

impl TransferInfo {
    /// The snapshot as a JSON mapping.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// One field by its getinfo key (`"http_code"`, `"total_time"`, ...).
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }

    /// `true` when no transfer has filled this snapshot in.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
