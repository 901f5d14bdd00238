//! Proxy backend trait and capability flags

use serde::{Deserialize, Serialize};

/// What the active proxy implementation supports
///
/// Fixed when a backend is selected and read-only for the rest of the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyCapabilities {
    /// Payloads are structured enough to present as JSON
    pub json_data: bool,
    /// Edit-and-resend is supported
    pub modify_packets: bool,
    /// Raw/hex representation is available
    pub raw_data: bool,
}

impl ProxyCapabilities {
    pub const fn new(json_data: bool, modify_packets: bool, raw_data: bool) -> Self {
        Self {
            json_data,
            modify_packets,
            raw_data,
        }
    }
}

/// A proxy implementation the inspector can sit behind
pub trait ProxyBackend: Send + Sync {
    /// Full name of the backend (e.g., "Java Edition proxy")
    fn name(&self) -> &'static str;

    /// Short name used to select it (e.g., "java")
    fn shortname(&self) -> &'static str;

    /// Capability flags for sessions on this backend
    fn capabilities(&self) -> ProxyCapabilities;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capabilities_wire_names() {
        let caps = ProxyCapabilities::new(true, false, true);
        assert_eq!(
            serde_json::to_value(caps).unwrap(),
            json!({"jsonData": true, "modifyPackets": false, "rawData": true})
        );
    }

    #[test]
    fn test_capabilities_default_is_all_off() {
        let caps = ProxyCapabilities::default();
        assert!(!caps.json_data && !caps.modify_packets && !caps.raw_data);
    }
}
