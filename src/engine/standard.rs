/*!
Concrete [`EngineVariant`]s.

[`StandardVariant`] is this core's chosen "enhanced RFC5054-leaning" formula
set. [`Rfc5054Variant`] documents the Stanford RFC 5054 formula set the
teacher crate's `calculate_private_key_x` already implements; its `calc_x`
is ported from that function, while `calc_M`/`calc_M2` are deliberately
left unimplemented — the source material only publishes enough detail (and
the teacher crate only implements enough) to cover `calc_x`, not the
RFC 5054 string-mixing variant of the proof messages.
*/
use super::EngineVariant;
use crate::crypto::Crypto;
use crate::error::Srp6Error;
use crate::value::Value;

/// `calc_x = password_hash(salt, password)`; `calc_M`/`calc_M2` use a plain
/// keyed hash over the concatenated public transcript.
pub struct StandardVariant;

impl EngineVariant for StandardVariant {
    fn calc_x<C: Crypto>(crypto: &C, password: &str, salt: &Value, _username: &str) -> Value {
        crypto.password_hash(salt, password)
    }

    fn calc_m<C: Crypto>(
        crypto: &C,
        k: &Value,
        a_pub: &Value,
        b_pub: &Value,
        _s: &Value,
        salt: &Value,
        _username: &str,
    ) -> crate::Result<Value> {
        let mut transcript = a_pub.bin().to_vec();
        transcript.extend_from_slice(salt.bin());
        transcript.extend_from_slice(b_pub.bin());
        Ok(crypto.keyed_hash(k, &Value::from_bytes(transcript)))
    }

    fn calc_m2<C: Crypto>(
        crypto: &C,
        k: &Value,
        a_pub: &Value,
        m: &Value,
        _s: &Value,
    ) -> crate::Result<Value> {
        let mut transcript = a_pub.bin().to_vec();
        transcript.extend_from_slice(m.bin());
        Ok(crypto.keyed_hash(k, &Value::from_bytes(transcript)))
    }
}

/// The RFC 5054 / Stanford formula set: `calc_x = H(s ‖ H(I ‖ ':' ‖ p))`.
/// `calc_M`/`calc_M2` (`H(H(N) xor H(g), H(I), s, A, B, K)` and its
/// successor) are not implemented by this core.
pub struct Rfc5054Variant;

impl EngineVariant for Rfc5054Variant {
    fn calc_x<C: Crypto>(crypto: &C, password: &str, salt: &Value, username: &str) -> Value {
        let mut identity = username.as_bytes().to_vec();
        identity.push(b':');
        identity.extend_from_slice(password.as_bytes());
        let p_hash = crypto.h(&[&Value::from_bytes(identity)]);
        crypto.h(&[salt, &p_hash])
    }

    fn calc_m<C: Crypto>(
        _crypto: &C,
        _k: &Value,
        _a_pub: &Value,
        _b_pub: &Value,
        _s: &Value,
        _salt: &Value,
        _username: &str,
    ) -> crate::Result<Value> {
        Err(Srp6Error::Unimplemented {
            operation: "Rfc5054Variant::calc_m",
        })
    }

    fn calc_m2<C: Crypto>(
        _crypto: &C,
        _k: &Value,
        _a_pub: &Value,
        _m: &Value,
        _s: &Value,
    ) -> crate::Result<Value> {
        Err(Srp6Error::Unimplemented {
            operation: "Rfc5054Variant::calc_m2",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::openssl::OpenSslCrypto;
    use crate::crypto::CryptoConfig;

    #[test]
    fn standard_calc_x_matches_published_vector() {
        let crypto = OpenSslCrypto::try_from(CryptoConfig::new().hash("sha256")).unwrap();
        let salt = Value::from_hex("1117").unwrap();
        let x = StandardVariant::calc_x(&crypto, "verysecure", &salt, "alice");
        assert_eq!(
            x.hex(),
            "9e4cae19d40bc58571ae7237cb13563f5598da5d596389cb55e8311be2d90cbe"
        );
    }

    #[test]
    fn rfc5054_variant_proofs_are_unimplemented() {
        let crypto = OpenSslCrypto::try_from(CryptoConfig::new().hash("sha1")).unwrap();
        let k = Value::from_hex("ab").unwrap();
        let a_pub = Value::from_hex("ab").unwrap();
        let b_pub = Value::from_hex("ab").unwrap();
        let s = Value::from_hex("ab").unwrap();
        let salt = Value::from_hex("ab").unwrap();
        let result = Rfc5054Variant::calc_m(&crypto, &k, &a_pub, &b_pub, &s, &salt, "alice");
        assert!(matches!(result, Err(Srp6Error::Unimplemented { .. })));
    }
}
