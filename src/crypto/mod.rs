/*!
The pluggable cryptographic primitive facade.

Generalizes the teacher crate's `hash.rs` (a single hard-coded
`HashFunc = sha1::Sha1`) into a capability trait with two concrete
providers, per the source's "provider polymorphism" design note.
*/
#[cfg(feature = "nacl-crypto")]
pub mod nacl;
#[cfg(feature = "openssl-crypto")]
pub mod openssl;

use crate::value::Value;

/// Abstract provider of hashing, password hashing, keyed hashing, randomness
/// and constant-time comparison. An [`Engine`](crate::engine::Engine) never
/// touches randomness directly; `random`/`salt` exist on this trait purely
/// for session code to call.
pub trait Crypto {
    /// Concatenates the chosen representation of each non-null input and
    /// hashes the result.
    fn h(&self, values: &[&Value]) -> Value;

    /// Deterministic password-based key derivation over `(salt, password)`.
    fn password_hash(&self, salt: &Value, password: &str) -> Value;

    /// MAC of `msg` keyed by `key`.
    fn keyed_hash(&self, key: &Value, msg: &Value) -> Value;

    /// A cryptographically random value the length of this provider's hash
    /// digest.
    fn salt(&self) -> Value;

    /// `n` cryptographically random bytes.
    fn random(&self, n: usize) -> Value;

    /// Constant-time equality check.
    fn secure_compare(&self, a: &Value, b: &Value) -> bool;
}

/// Free-form configuration record accepted by both concrete providers'
/// `TryFrom` constructors.
///
/// An explicit, strongly-typed builder rather than a stringly-typed map:
/// idiomatic Rust favors this over the source's duck-typed options bag (see
/// the crate-level design notes on preferring explicit constructors).
#[derive(Debug, Clone, Default)]
pub struct CryptoConfig {
    pub hash: Option<String>,
    pub kdf: Option<String>,
    pub kdf_iter: Option<u32>,
    pub mac: Option<String>,
    pub hex: Option<bool>,
    pub blake_digest_size: Option<u32>,
    pub kdf_opslimit: Option<u32>,
    pub kdf_memlimit: Option<u32>,
    pub kdf_digest_size: Option<u32>,
}

impl CryptoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn kdf(mut self, kdf: impl Into<String>) -> Self {
        self.kdf = Some(kdf.into());
        self
    }

    pub fn kdf_iter(mut self, iter: u32) -> Self {
        self.kdf_iter = Some(iter);
        self
    }

    pub fn mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    pub fn hex(mut self, hex: bool) -> Self {
        self.hex = Some(hex);
        self
    }

    pub fn blake_digest_size(mut self, size: u32) -> Self {
        self.blake_digest_size = Some(size);
        self
    }

    pub fn kdf_opslimit(mut self, v: u32) -> Self {
        self.kdf_opslimit = Some(v);
        self
    }

    pub fn kdf_memlimit(mut self, v: u32) -> Self {
        self.kdf_memlimit = Some(v);
        self
    }

    pub fn kdf_digest_size(mut self, v: u32) -> Self {
        self.kdf_digest_size = Some(v);
        self
    }

    /// Normalizes a recognized-keyword field: lowercased, dashes stripped.
    pub(crate) fn normalize(raw: &str) -> String {
        raw.chars()
            .filter(|c| *c != '-')
            .flat_map(|c| c.to_lowercase())
            .collect()
    }
}
