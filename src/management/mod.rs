mod position;
mod settings;

pub use position::PositionManager;
pub use settings::SettingsManager;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encodes a client-supplied key for use as a single path segment.
///
/// User ids and track URIs arrive from the network and may contain
/// separators or characters that are not filename-safe; encoding keeps every
/// document inside the store's directory.
pub(crate) fn encode_key(raw: &str) -> String {
    URL_SAFE_NO_PAD.encode(raw)
}
