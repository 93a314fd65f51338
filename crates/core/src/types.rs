//! Shared identifier and timestamp aliases.

/// Campaign and scene primary keys are opaque strings
/// (`camp_<hex12>` / `scene_<hex12>`).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a new prefixed entity ID, e.g. `new_entity_id("camp")`
/// returns `camp_3f9a0c71d2b4`.
pub fn new_entity_id(prefix: &str) -> EntityId {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..12])
}
