use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A room record from the provider's room list endpoint.
///
/// Rooms are display-only: decoded, never mutated, and any metadata beyond
/// `id` and `name` is kept opaque.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Provider-defined metadata is preserved through a decode.
    #[test]
    fn test_room_metadata_is_opaque() {
        let room: Room = serde_json::from_value(json!({
            "id": "abc",
            "name": "gitterlogin/demo",
            "topic": "demo room",
            "oneToOne": false,
        }))
        .unwrap();

        assert_eq!(room.name, "gitterlogin/demo");
        assert_eq!(room.metadata.get("oneToOne"), Some(&json!(false)));
    }
}
