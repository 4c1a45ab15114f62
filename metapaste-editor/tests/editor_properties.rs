//! Property-based tests for the editor.
//!
//! These verify properties that must hold for any metadata and any body:
//! - the rendered panel text decodes to exactly the stored metadata
//! - an unchecked box never changes storage
//! - a bad token never changes storage
//! - excluded keys never change, whatever else is applied
//! - a submitted list becomes exactly the stored list

mod common;

use common::*;
use metapaste_editor::SaveContext;
use metapaste_host::InMemoryMetadataStore;
use metapaste_types::{EntityId, MetaValue, MetadataCollection, Submission};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("_?[a-z][a-z0-9_]{0,10}").unwrap()
}

fn scalar_strategy() -> impl Strategy<Value = MetaValue> {
    prop_oneof![
        "\\PC{0,24}".prop_map(Value::String),
        any::<i32>().prop_map(|n| json!(n)),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(|f| json!(f)),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

fn collection_strategy() -> impl Strategy<Value = MetadataCollection> {
    prop::collection::vec(
        (key_strategy(), prop::collection::vec(scalar_strategy(), 1..4)),
        0..8,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

fn body_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::collection::vec((key_strategy(), scalar_strategy()), 0..6).prop_map(|pairs| {
            let map: serde_json::Map<String, Value> = pairs.into_iter().collect();
            Value::Object(map).to_string()
        }),
        "\\PC{0,40}",
    ]
}

fn store_with(meta: MetadataCollection) -> Arc<InMemoryMetadataStore> {
    Arc::new(InMemoryMetadataStore::new().with_entity(EntityId::new(POST_ID), meta))
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// The panel's text block decodes to exactly the stored collection.
    #[test]
    fn panel_text_decodes_to_stored_metadata(meta in collection_strategy()) {
        let store = store_with(meta.clone());
        let panel = editor(store).render_panel(&post()).unwrap().unwrap();
        let decoded = MetadataCollection::from_json_text(&panel.body).unwrap();
        prop_assert_eq!(decoded, meta);
    }

    /// Without the apply flag, nothing changes, whatever the body says.
    #[test]
    fn unchecked_box_never_writes(meta in collection_strategy(), body in body_strategy()) {
        let store = store_with(meta.clone());
        let sub = Submission::new(body).with_token(valid_token());
        let mut ctx = SaveContext::new();
        editor(store.clone()).handle_save(&post(), &sub, &mut ctx).unwrap();
        prop_assert_eq!(stored(&store), meta);
        prop_assert!(!ctx.is_suppressed());
    }

    /// With a bad or missing token, nothing changes.
    #[test]
    fn bad_token_never_writes(
        meta in collection_strategy(),
        body in body_strategy(),
        token in prop::option::of("[0-9a-f]{0,12}"),
    ) {
        prop_assume!(token.as_deref() != Some(valid_token().as_str()));
        let store = store_with(meta.clone());
        let mut sub = Submission::new(body).with_apply(true);
        sub.token = token;
        let mut ctx = SaveContext::new();
        editor(store.clone()).handle_save(&post(), &sub, &mut ctx).unwrap();
        prop_assert_eq!(stored(&store), meta);
    }

    /// Excluded keys keep their stored values even when submitted.
    #[test]
    fn excluded_keys_are_immune(
        lock in "\\PC{0,12}",
        submitted_lock in scalar_strategy(),
        other in scalar_strategy(),
    ) {
        let mut meta = MetadataCollection::new();
        meta.add("_edit_lock", json!(lock));
        let store = store_with(meta);
        let body = json!({ "_edit_lock": submitted_lock, "_edit_last": "9", "other": other }).to_string();
        let mut ctx = SaveContext::new();
        editor(store.clone()).handle_save(&post(), &submit(&body), &mut ctx).unwrap();

        let after = stored(&store);
        prop_assert_eq!(after.get("_edit_lock").unwrap(), &[json!(lock)][..]);
        prop_assert!(!after.contains_key("_edit_last"));
        prop_assert!(after.contains_key("other"));
    }

    /// A submitted list becomes exactly the stored list for that key.
    #[test]
    fn submitted_list_is_stored_exactly(
        old in prop::collection::vec("[a-z]{1,6}", 0..6),
        new in prop::collection::vec("[a-z]{1,6}", 0..6),
    ) {
        let mut meta = MetadataCollection::new();
        for v in &old {
            meta.add("tags", json!(v));
        }
        let store = store_with(meta);
        let body = json!({ "tags": new }).to_string();
        let mut ctx = SaveContext::new();
        editor(store.clone()).handle_save(&post(), &submit(&body), &mut ctx).unwrap();

        let expected: Vec<Value> = new.iter().map(|v| json!(v)).collect();
        let after = stored(&store);
        prop_assert_eq!(after.get("tags").unwrap_or(&[]), expected.as_slice());
    }
}
