use metapaste_types::EntityId;
use std::collections::HashSet;
use std::str::FromStr;

// ── EntityId ──────────────────────────────────────────────────────

#[test]
fn entity_id_wraps_raw_value() {
    let id = EntityId::new(42);
    assert_eq!(id.get(), 42);
    assert_eq!(EntityId::from(42), id);
}

#[test]
fn entity_id_display_and_parse() {
    let id = EntityId::new(1234);
    let s = id.to_string();
    assert_eq!(s, "1234");
    assert_eq!(EntityId::parse(&s).unwrap(), id);
}

#[test]
fn entity_id_parse_tolerates_whitespace() {
    assert_eq!(EntityId::parse(" 7 ").unwrap(), EntityId::new(7));
}

#[test]
fn entity_id_from_str() {
    let parsed: EntityId = EntityId::from_str("99").unwrap();
    assert_eq!(parsed.get(), 99);
}

#[test]
fn entity_id_parse_invalid() {
    assert!(EntityId::parse("not-a-number").is_err());
    assert!(EntityId::parse("-3").is_err());
    assert!(EntityId::from_str("").is_err());
}

#[test]
fn entity_id_hash_and_eq() {
    let id = EntityId::new(5);
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    set.insert(EntityId::new(6));
    assert_eq!(set.len(), 2);
}

#[test]
fn entity_id_serializes_as_number() {
    let id = EntityId::new(42);
    assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    let back: EntityId = serde_json::from_str("42").unwrap();
    assert_eq!(back, id);
}

#[test]
fn parse_error_converts_into_crate_error() {
    let err: metapaste_types::Error = EntityId::parse("x").unwrap_err().into();
    assert!(err.to_string().starts_with("invalid entity id"));
}
