//! Bundle of host collaborators injected into the editor.

use crate::{
    CapabilityChecker, HashTokenService, InMemoryMetadataStore, MetadataStore,
    PhpSerializedCodec, ScalarCodec, StaticCapabilities, TokenService,
};
use std::sync::Arc;

/// One handle per host service the editor consumes.
#[derive(Clone)]
pub struct HostServices {
    pub store: Arc<dyn MetadataStore>,
    pub capabilities: Arc<dyn CapabilityChecker>,
    pub codec: Arc<dyn ScalarCodec>,
    pub tokens: Arc<dyn TokenService>,
}

impl HostServices {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        capabilities: Arc<dyn CapabilityChecker>,
        codec: Arc<dyn ScalarCodec>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            store,
            capabilities,
            codec,
            tokens,
        }
    }

    /// In-process services: the given store, an administrator session, the
    /// PHP codec, and a token service with a random secret.
    pub fn in_process(store: Arc<InMemoryMetadataStore>) -> Self {
        Self::new(
            store,
            Arc::new(StaticCapabilities::administrator()),
            Arc::new(PhpSerializedCodec::new()),
            Arc::new(HashTokenService::with_random_secret(1, "local")),
        )
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Arc<dyn CapabilityChecker>) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: Arc<dyn TokenService>) -> Self {
        self.tokens = tokens;
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn ScalarCodec>) -> Self {
        self.codec = codec;
        self
    }
}
