//! Prefixed entity identifier generation.
//!
//! Entities in the fulfillment module carry string identifiers of the form
//! `<prefix>_<ULID>`. The prefix names the entity kind so ids stay readable in
//! logs and foreign-key columns; the ULID suffix keeps them unique and sortable
//! by creation time.

use ulid::Ulid;

/// Separator placed between an id prefix and its ULID suffix.
pub const ENTITY_ID_SEPARATOR: char = '_';

/// Return `current` when it is present and non-empty, otherwise mint a new id.
///
/// Fresh ids are `"{prefix}_{ULID}"`; an empty prefix yields a bare ULID.
///
/// # Examples
/// ```
/// use fulfillment::domain::generate_entity_id;
///
/// let fresh = generate_entity_id(None, "fuladdr");
/// assert!(fresh.starts_with("fuladdr_"));
///
/// let kept = generate_entity_id(Some(fresh.as_str()), "fuladdr");
/// assert_eq!(kept, fresh);
/// ```
pub fn generate_entity_id(current: Option<&str>, prefix: &str) -> String {
    match current {
        Some(existing) if !existing.is_empty() => existing.to_owned(),
        _ => {
            let suffix = Ulid::new().to_string();
            if prefix.is_empty() {
                suffix
            } else {
                format!("{prefix}{ENTITY_ID_SEPARATOR}{suffix}")
            }
        }
    }
}
