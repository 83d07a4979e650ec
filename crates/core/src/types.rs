//! Shared primitive types for the map engine.

/// Entity identifiers are opaque strings assigned by the backend.
///
/// Optimistically created entities carry a client-generated UUID v4
/// string until the server-assigned id is absorbed after the CREATE
/// mutation acknowledges.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh client-side entity id (UUID v4 string).
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}
