mod common;

use common::*;
use metapaste_editor::{
    BulkMetaEditor, EditTarget, EditorConfig, EditorError, EditorPolicy, DEFAULT_TOKEN_NAMESPACE,
};
use metapaste_host::{InMemoryMetadataStore, StaticCapabilities, StoreError, TokenService};
use metapaste_types::{EntityId, MetadataCollection};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn editor_for(
    store: Arc<InMemoryMetadataStore>,
    caps: StaticCapabilities,
    config: EditorConfig,
    policy: EditorPolicy,
) -> BulkMetaEditor {
    BulkMetaEditor::new(
        services(store).with_capabilities(Arc::new(caps)),
        config,
        policy,
    )
}

// ── Content ──────────────────────────────────────────────────────

#[test]
fn panel_body_decodes_to_stored_metadata() {
    let store = scenario_store();
    let panel = editor(store.clone()).render_panel(&post()).unwrap().unwrap();

    let decoded = MetadataCollection::from_json_text(&panel.body).unwrap();
    assert_eq!(decoded, stored(&store));
    assert_eq!(panel.body, r#"{"color":["red","blue"],"_edit_lock":["123:1"]}"#);
}

#[test]
fn panel_is_unchecked_and_carries_a_valid_token() {
    let panel = editor(scenario_store()).render_panel(&post()).unwrap().unwrap();
    assert!(!panel.apply_checked);
    assert!(tokens().verify(&panel.token, DEFAULT_TOKEN_NAMESPACE));
    assert_eq!(panel.entity_id, EntityId::new(POST_ID));
}

#[test]
fn token_namespace_is_shared_across_entities() {
    let store = scenario_store();
    store
        .insert_entity(EntityId::new(7), MetadataCollection::new())
        .unwrap();
    let editor = editor(store);

    let a = editor.render_panel(&post()).unwrap().unwrap();
    let b = editor
        .render_panel(&EditTarget::new(EntityId::new(7), "page"))
        .unwrap()
        .unwrap();
    assert_eq!(a.token, b.token);
}

#[test]
fn rendering_does_not_mutate_storage() {
    let store = scenario_store();
    let before = stored(&store);
    let editor = editor(store.clone());
    for _ in 0..3 {
        editor.render_panel(&post()).unwrap();
    }
    assert_eq!(stored(&store), before);
}

#[test]
fn empty_metadata_renders_empty_object() {
    let store = Arc::new(
        InMemoryMetadataStore::new().with_entity(EntityId::new(POST_ID), MetadataCollection::new()),
    );
    let panel = editor(store).render_panel(&post()).unwrap().unwrap();
    assert_eq!(panel.body, "{}");
}

#[test]
fn html_round_trips_through_textarea() {
    let store = Arc::new(InMemoryMetadataStore::new().with_entity(
        EntityId::new(POST_ID),
        collection(vec![("note", vec![json!("<b>\"bold\" & 'quoted'</b>")])]),
    ));
    let panel = editor(store).render_panel(&post()).unwrap().unwrap();
    let html = panel.to_html();
    assert!(html.contains("&lt;b&gt;"));
    assert!(!html.contains("<b>"));
}

// ── Gates ────────────────────────────────────────────────────────

#[test]
fn user_without_capability_sees_nothing() {
    let editor = editor_for(
        scenario_store(),
        StaticCapabilities::editor(),
        EditorConfig::default(),
        EditorPolicy::new(),
    );
    assert!(editor.render_panel(&post()).unwrap().is_none());
}

#[test]
fn capability_override_can_widen_access() {
    let editor = editor_for(
        scenario_store(),
        StaticCapabilities::editor(),
        EditorConfig::default(),
        EditorPolicy::new().with_capability(|_| "edit_posts".to_string()),
    );
    assert!(editor.render_panel(&post()).unwrap().is_some());
}

#[test]
fn configured_capability_is_honoured() {
    let config = EditorConfig {
        capability: "edit_posts".into(),
        ..Default::default()
    };
    let editor = editor_for(
        scenario_store(),
        StaticCapabilities::editor(),
        config,
        EditorPolicy::new(),
    );
    assert!(editor.render_panel(&post()).unwrap().is_some());
}

#[test]
fn disallowed_entity_type_sees_nothing() {
    let editor = editor_for(
        scenario_store(),
        StaticCapabilities::administrator(),
        EditorConfig::default(),
        EditorPolicy::new().with_entity_types(|t| t == "page"),
    );
    assert!(editor.render_panel(&post()).unwrap().is_none());
}

#[test]
fn configured_type_list_gates_panel() {
    let config = EditorConfig {
        allowed_entity_types: Some(vec!["product".into()]),
        ..Default::default()
    };
    let editor = editor_for(
        scenario_store(),
        StaticCapabilities::administrator(),
        config,
        EditorPolicy::new(),
    );
    assert!(editor.render_panel(&post()).unwrap().is_none());
    assert!(
        editor
            .render_panel(&EditTarget::new(EntityId::new(POST_ID), "product"))
            .unwrap()
            .is_some()
    );
}

#[test]
fn gate_failure_skips_storage_read() {
    // Unknown entity would be a store error if it were read.
    let editor = editor_for(
        Arc::new(InMemoryMetadataStore::new()),
        StaticCapabilities::none(),
        EditorConfig::default(),
        EditorPolicy::new(),
    );
    assert!(editor.render_panel(&post()).unwrap().is_none());
}

#[test]
fn unknown_entity_is_a_store_error() {
    let editor = editor(Arc::new(InMemoryMetadataStore::new()));
    let err = editor.render_panel(&post()).unwrap_err();
    assert!(matches!(err, EditorError::Store(StoreError::EntityNotFound(_))));
}
