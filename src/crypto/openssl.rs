/*!
The OpenSSL-style [`Crypto`] provider: SHA family + PBKDF2 + HMAC, with the
legacy `H(msg‖key)` variants preserved for interop with older deployments.

Generalizes the teacher crate's `hash.rs`, which hard-codes `HashFunc =
sha1::Sha1`, into a small `HashChoice` enum dispatched through match arms
(kept monomorphized rather than boxed as `dyn Digest`, the same way the
teacher's single-algorithm type alias avoided indirection).
*/
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use super::{Crypto, CryptoConfig};
use crate::error::CryptoConfigError;
use crate::value::Value;

const DEFAULT_KDF_ITER: u32 = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashChoice {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashChoice {
    fn parse(raw: &str) -> Option<Self> {
        match CryptoConfig::normalize(raw).as_str() {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    fn digest(self, chunks: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Sha1 => digest_chunks::<Sha1>(chunks),
            Self::Sha256 => digest_chunks::<Sha256>(chunks),
            Self::Sha384 => digest_chunks::<Sha384>(chunks),
            Self::Sha512 => digest_chunks::<Sha512>(chunks),
        }
    }

    fn pbkdf2(self, password: &[u8], salt: &[u8], iter: u32) -> Vec<u8> {
        let mut out = vec![0u8; self.digest_len()];
        match self {
            Self::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, iter, &mut out),
            Self::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, iter, &mut out),
            Self::Sha384 => pbkdf2_hmac::<Sha384>(password, salt, iter, &mut out),
            Self::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, iter, &mut out),
        }
        out
    }

    fn hmac(self, key: &[u8], msg: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => hmac_bytes::<Sha1>(key, msg),
            Self::Sha256 => hmac_bytes::<Sha256>(key, msg),
            Self::Sha384 => hmac_bytes::<Sha384>(key, msg),
            Self::Sha512 => hmac_bytes::<Sha512>(key, msg),
        }
    }
}

fn digest_chunks<D: Digest>(chunks: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().to_vec()
}

fn hmac_bytes<D>(key: &[u8], msg: &[u8]) -> Vec<u8>
where
    D: Digest + hmac::digest::core_api::BlockSizeUser + hmac::digest::FixedOutputReset + Clone,
{
    let mut mac = Hmac::<D>::new_from_slice(key).expect("Hmac accepts any key length");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kdf {
    Pbkdf2,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MacChoice {
    Hmac,
    Legacy,
}

/// Concrete OpenSSL-style [`Crypto`] provider.
#[derive(Debug, Clone)]
pub struct OpenSslCrypto {
    hash: HashChoice,
    kdf: Kdf,
    kdf_iter: u32,
    mac: MacChoice,
    hex: bool,
}

impl OpenSslCrypto {
    /// `H`'s concatenated view of one input, honoring the `hex` flag.
    fn view<'v>(&self, value: &'v Value) -> std::borrow::Cow<'v, [u8]> {
        if self.hex {
            std::borrow::Cow::Owned(value.hex().as_bytes().to_vec())
        } else {
            std::borrow::Cow::Borrowed(value.bin())
        }
    }
}

impl TryFrom<CryptoConfig> for OpenSslCrypto {
    type Error = CryptoConfigError;

    fn try_from(config: CryptoConfig) -> Result<Self, Self::Error> {
        let hash = match &config.hash {
            None => HashChoice::Sha256,
            Some(raw) => HashChoice::parse(raw).ok_or_else(|| CryptoConfigError {
                field: "hash",
                value: raw.clone(),
                allowed: &["sha1", "sha256", "sha384", "sha512"],
            })?,
        };

        let kdf = match config.kdf.as_deref().map(CryptoConfig::normalize) {
            None => Kdf::Pbkdf2,
            Some(ref s) if s == "pbkdf2" => Kdf::Pbkdf2,
            Some(ref s) if s == "legacy" => Kdf::Legacy,
            Some(other) => {
                return Err(CryptoConfigError {
                    field: "kdf",
                    value: other,
                    allowed: &["pbkdf2", "legacy"],
                })
            }
        };

        let mac = match config.mac.as_deref().map(CryptoConfig::normalize) {
            None => MacChoice::Hmac,
            Some(ref s) if s == "hmac" => MacChoice::Hmac,
            Some(ref s) if s == "legacy" => MacChoice::Legacy,
            Some(other) => {
                return Err(CryptoConfigError {
                    field: "mac",
                    value: other,
                    allowed: &["hmac", "legacy"],
                })
            }
        };

        Ok(OpenSslCrypto {
            hash,
            kdf,
            kdf_iter: config.kdf_iter.unwrap_or(DEFAULT_KDF_ITER),
            mac,
            hex: config.hex.unwrap_or(false),
        })
    }
}

impl Crypto for OpenSslCrypto {
    fn h(&self, values: &[&Value]) -> Value {
        let views: Vec<_> = values.iter().map(|v| self.view(v)).collect();
        let chunks: Vec<&[u8]> = views.iter().map(|v| v.as_ref()).collect();
        Value::from_bytes(self.hash.digest(&chunks))
    }

    fn password_hash(&self, salt: &Value, password: &str) -> Value {
        match self.kdf {
            Kdf::Pbkdf2 => Value::from_bytes(self.hash.pbkdf2(
                password.as_bytes(),
                salt.bin(),
                self.kdf_iter,
            )),
            Kdf::Legacy => {
                let mut msg = salt.hex().as_bytes().to_vec();
                msg.extend_from_slice(password.as_bytes());
                Value::from_bytes(self.hash.digest(&[&msg]))
            }
        }
    }

    fn keyed_hash(&self, key: &Value, msg: &Value) -> Value {
        match self.mac {
            MacChoice::Hmac => Value::from_bytes(self.hash.hmac(key.bin(), msg.bin())),
            MacChoice::Legacy => {
                let msg_view = self.view(msg);
                let key_view = self.view(key);
                let mut combined = msg_view.to_vec();
                combined.extend_from_slice(&key_view);
                Value::from_bytes(self.hash.digest(&[&combined]))
            }
        }
    }

    fn salt(&self) -> Value {
        self.random(self.hash.digest_len())
    }

    fn random(&self, n: usize) -> Value {
        let mut buf = vec![0u8; n];
        rand::thread_rng().fill_bytes(&mut buf);
        Value::from_bytes(buf)
    }

    fn secure_compare(&self, a: &Value, b: &Value) -> bool {
        let (a, b) = (a.hex().as_bytes(), b.hex().as_bytes());
        if a.len() != b.len() {
            return false;
        }
        let mut diff = 0u8;
        for (x, y) in a.iter().zip(b.iter()) {
            diff |= x ^ y;
        }
        diff == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(hash: &str) -> OpenSslCrypto {
        OpenSslCrypto::try_from(CryptoConfig::new().hash(hash)).unwrap()
    }

    #[test]
    fn h_matches_published_sha256_vector() {
        let crypto = provider("sha256");
        let v = Value::from_hex("07c0").unwrap();
        let digest = crypto.h(&[&v]);
        assert_eq!(
            digest.hex(),
            "34b902c818ebdb547c4aa8d161dd701bd5f78ac3df6b5ab7fac3c35dae795e56"
        );
    }

    #[test]
    fn h_matches_published_sha1_vector() {
        let crypto = provider("sha1");
        let v = Value::from_hex("07c0").unwrap();
        let digest = crypto.h(&[&v]);
        assert_eq!(digest.hex(), "00ff3b16b0f555d3feb62f988fb3aab81c1c50ea");
    }

    #[test]
    fn keyed_hash_matches_published_hmac_vector() {
        let crypto = provider("sha256");
        let key = Value::from_hex(
            "f4ffd830b255f778b9d88966e87ae1d72702227cfcbeae4bd1e4b39fff136060",
        )
        .unwrap();
        let msg = Value::from_hex("07c0").unwrap();
        let mac = crypto.keyed_hash(&key, &msg);
        assert_eq!(
            mac.hex(),
            "ecfa17f317164259824287aa9feabeda9c784e7d672b118965ebff33f5373abe"
        );
    }

    #[test]
    fn legacy_keyed_hash_matches_published_vector() {
        let crypto = OpenSslCrypto::try_from(CryptoConfig::new().hash("sha1").mac("legacy"))
            .unwrap();
        let key = Value::from_hex("abcd").unwrap();
        let msg = Value::from_hex("07c0").unwrap();
        let mac = crypto.keyed_hash(&key, &msg);
        assert_eq!(mac.hex(), "a19b96e98cae5ba7b41a8a389bdb61cebe2d0a17");
    }

    #[test]
    fn unknown_hash_is_rejected() {
        let err = OpenSslCrypto::try_from(CryptoConfig::new().hash("md5")).unwrap_err();
        assert_eq!(err.field, "hash");
    }

    #[test]
    fn secure_compare_is_symmetric_and_length_sensitive() {
        let crypto = provider("sha256");
        let a = Value::from_hex("abcd").unwrap();
        let b = Value::from_hex("abcd").unwrap();
        let c = Value::from_hex("abce").unwrap();
        let short = Value::from_hex("ab").unwrap();
        assert!(crypto.secure_compare(&a, &b));
        assert!(!crypto.secure_compare(&a, &c));
        assert!(!crypto.secure_compare(&a, &short));
    }

    #[test]
    fn password_hash_is_deterministic() {
        let crypto = provider("sha256");
        let salt = Value::from_hex("1117").unwrap();
        let a = crypto.password_hash(&salt, "verysecure");
        let b = crypto.password_hash(&salt, "verysecure");
        assert_eq!(a, b);
    }
}
