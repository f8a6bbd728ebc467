use serde::{Deserialize, Serialize};

/// One coin from the feed's catalog listing.
///
/// This is what catalog sync turns into a stored instrument; `coin_id` is
/// the feed's stable identifier and the only unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDescriptor {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
}
