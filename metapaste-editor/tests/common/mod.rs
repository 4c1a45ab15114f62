//! Shared test helpers for editor tests.

#![allow(dead_code)]

use metapaste_editor::{BulkMetaEditor, EditTarget, EditorConfig, EditorPolicy, DEFAULT_TOKEN_NAMESPACE};
use metapaste_host::{HashTokenService, HostServices, InMemoryMetadataStore, MetadataStore, TokenService};
use metapaste_types::{EntityId, MetaValue, MetadataCollection, Submission};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Fixed wall clock for token issuance and verification.
pub const NOW: i64 = 1_700_000_000;

pub const POST_ID: u64 = 42;

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn tokens() -> Arc<HashTokenService> {
    Arc::new(HashTokenService::new(b"test-secret".to_vec(), 1, "session").with_clock(|| NOW))
}

pub fn valid_token() -> String {
    tokens().issue(DEFAULT_TOKEN_NAMESPACE)
}

pub fn post() -> EditTarget {
    EditTarget::new(EntityId::new(POST_ID), "post")
}

pub fn collection(pairs: Vec<(&str, Vec<MetaValue>)>) -> MetadataCollection {
    pairs
        .into_iter()
        .map(|(k, values)| (k.to_string(), values))
        .collect()
}

/// Entity 42 with `color = [red, blue]` and `_edit_lock = 123:1`.
pub fn scenario_store() -> Arc<InMemoryMetadataStore> {
    let meta = collection(vec![
        ("color", vec![json!("red"), json!("blue")]),
        ("_edit_lock", vec![json!("123:1")]),
    ]);
    Arc::new(InMemoryMetadataStore::new().with_entity(EntityId::new(POST_ID), meta))
}

pub fn services(store: Arc<InMemoryMetadataStore>) -> HostServices {
    HostServices::in_process(store).with_tokens(tokens())
}

pub fn editor(store: Arc<InMemoryMetadataStore>) -> BulkMetaEditor {
    init_tracing();
    BulkMetaEditor::new(services(store), EditorConfig::default(), EditorPolicy::new())
}

/// An opted-in submission with a valid token.
pub fn submit(body: &str) -> Submission {
    Submission::new(body).with_apply(true).with_token(valid_token())
}

pub fn stored(store: &InMemoryMetadataStore) -> MetadataCollection {
    store.all_metadata(EntityId::new(POST_ID)).unwrap()
}
