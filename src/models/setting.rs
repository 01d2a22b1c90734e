use serde::{Deserialize, Serialize};

/// Named global configuration value (admin-managed key/value store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

/// Setting key for the raw admin-submitted QRIS payload, kept verbatim for
/// display on the settings page.
pub const QRIS_RAW_PAYLOAD: &str = "QRIS_RAW_PAYLOAD";

/// Setting key for the normalized base payload consumed by the builder.
pub const QRIS_BASE_PAYLOAD: &str = "QRIS_BASE_PAYLOAD";
