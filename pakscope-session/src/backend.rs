//! Built-in proxy backends

use pakscope_core::{ProxyBackend, ProxyCapabilities};

/// Java Edition proxy: decoded JSON payloads, resend and raw bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaProxy;

impl ProxyBackend for JavaProxy {
    fn name(&self) -> &'static str {
        "Java Edition proxy"
    }

    fn shortname(&self) -> &'static str {
        "java"
    }

    fn capabilities(&self) -> ProxyCapabilities {
        ProxyCapabilities::new(true, true, true)
    }
}

/// Bedrock Edition proxy: decoded JSON payloads only
#[derive(Debug, Clone, Copy, Default)]
pub struct BedrockProxy;

impl ProxyBackend for BedrockProxy {
    fn name(&self) -> &'static str {
        "Bedrock Edition proxy"
    }

    fn shortname(&self) -> &'static str {
        "bedrock"
    }

    fn capabilities(&self) -> ProxyCapabilities {
        ProxyCapabilities::new(true, false, false)
    }
}
