//! Anti-forgery tokens.
//!
//! A token proves a save request was produced by a panel this host rendered
//! for the same user session. Tokens are bound to a namespace string that is
//! fixed for the whole add-on (not per entity).
//!
//! [`HashTokenService`] derives tokens the way WordPress nonces are built: time
//! is cut into ticks of half the token lifetime, and a token is the truncated
//! SHA-256 of `secret ‖ tick | namespace | user | session`. A token stays
//! valid for the tick it was issued in and the one after it.

use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Default token lifetime in seconds (one day).
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Number of hex characters kept from the digest.
const TOKEN_LEN: usize = 10;

/// Issues and verifies namespace-bound anti-forgery tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, namespace: &str) -> String;

    fn verify(&self, token: &str, namespace: &str) -> bool;
}

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Keyed-hash token service for one user session.
#[derive(Clone)]
pub struct HashTokenService {
    secret: Vec<u8>,
    user_id: u64,
    session: String,
    lifetime_secs: i64,
    clock: Clock,
}

impl HashTokenService {
    /// Creates a service with an explicit secret.
    pub fn new(secret: impl Into<Vec<u8>>, user_id: u64, session: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            user_id,
            session: session.into(),
            lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            clock: Arc::new(|| chrono::Utc::now().timestamp()),
        }
    }

    /// Creates a service with a freshly generated 32-byte secret.
    pub fn with_random_secret(user_id: u64, session: impl Into<String>) -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::new(secret.to_vec(), user_id, session)
    }

    /// Overrides the token lifetime. Values below two seconds are clamped.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime_secs: i64) -> Self {
        self.lifetime_secs = lifetime_secs.max(2);
        self
    }

    /// Replaces the wall clock (unix seconds). Used to pin time in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current tick: `ceil(now / (lifetime / 2))`.
    pub fn tick(&self) -> i64 {
        let half = self.lifetime_secs / 2;
        let now = (self.clock)();
        now.div_euclid(half) + i64::from(now.rem_euclid(half) != 0)
    }

    fn derive(&self, tick: i64, namespace: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(format!("{tick}|{namespace}|{}|{}", self.user_id, self.session).as_bytes());
        let mut token = hex::encode(hasher.finalize());
        token.truncate(TOKEN_LEN);
        token
    }
}

impl TokenService for HashTokenService {
    fn issue(&self, namespace: &str) -> String {
        self.derive(self.tick(), namespace)
    }

    fn verify(&self, token: &str, namespace: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        let tick = self.tick();
        [tick, tick - 1]
            .into_iter()
            .any(|t| constant_time_eq(self.derive(t, namespace).as_bytes(), token.as_bytes()))
    }
}

impl fmt::Debug for HashTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTokenService")
            .field("user_id", &self.user_id)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
