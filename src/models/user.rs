use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An authenticated identity as returned by the provider's user endpoint.
///
/// Only `id` is interpreted by this application; every other profile field
/// (display name, avatar, ...) is carried through untouched so the home view
/// can show whatever the provider supplies.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    /// Best-effort human-readable name for rendering.
    ///
    /// Prefers the provider's `displayName`, then `name`, then `username`,
    /// and falls back to the opaque id.
    pub fn display_name(&self) -> &str {
        ["displayName", "name", "username"]
            .iter()
            .find_map(|key| self.profile.get(*key).and_then(Value::as_str))
            .unwrap_or(&self.id)
    }
}
