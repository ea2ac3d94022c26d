/*!
The abstract SRP-6a arithmetic engine.

Generalizes the teacher crate's free functions in `primitives.rs`
(`calculate_session_key_S_for_host`, `calculate_pubkey_B`, `calculate_k`,
...) — which are hard-coded to a single const-generic key length and a
single `HashFunc = sha1::Sha1` — into methods on an `Engine<C, V>` generic
over a [`Crypto`] implementation and an [`EngineVariant`], so the same
arithmetic core serves any hash/KDF/MAC combination and any `calc_x`/`calc_M`
formulation.
*/
pub mod standard;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::crypto::Crypto;
use crate::group::Group;
use crate::value::Value;

/// The three formulas an SRP-6a deployment is free to vary without changing
/// the surrounding arithmetic: private-key derivation and the two proof
/// messages.
pub trait EngineVariant {
    /// `x = calc_x(password, salt, username)`.
    fn calc_x<C: Crypto>(crypto: &C, password: &str, salt: &Value, username: &str) -> Value;

    /// `M = calc_M(K, A, B, S, salt, username)`.
    #[allow(clippy::too_many_arguments)]
    fn calc_m<C: Crypto>(
        crypto: &C,
        k: &Value,
        a_pub: &Value,
        b_pub: &Value,
        s: &Value,
        salt: &Value,
        username: &str,
    ) -> crate::Result<Value>;

    /// `M2 = calc_M2(K, A, M, S)`.
    fn calc_m2<C: Crypto>(
        crypto: &C,
        k: &Value,
        a_pub: &Value,
        m: &Value,
        s: &Value,
    ) -> crate::Result<Value>;
}

/// Core SRP-6a arithmetic over a fixed `(Crypto, Group)` pair.
///
/// `k` and `N`'s byte length are computed once at construction, the same
/// eager-memoization resolution the teacher crate applies to its own
/// per-session constants (there is no first-class lazy field in safe,
/// `Send + Sync` Rust, so construction pays the cost once instead of on
/// first use).
pub struct Engine<C: Crypto, V: EngineVariant> {
    crypto: C,
    group: Group,
    k: Value,
    _variant: std::marker::PhantomData<V>,
}

impl<C: Crypto, V: EngineVariant> Engine<C, V> {
    pub fn new(crypto: C, group: Group) -> Self {
        let padded_g = Value::from_bytes(pad(&group.g, group.n_len()));
        let k = crypto.h(&[&group.n, &padded_g]);
        log::debug!("k = {k:?}");
        Engine {
            crypto,
            group,
            k,
            _variant: std::marker::PhantomData,
        }
    }

    pub fn crypto(&self) -> &C {
        &self.crypto
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn k(&self) -> &Value {
        &self.k
    }

    pub fn calc_x(&self, password: &str, salt: &Value, username: &str) -> Value {
        V::calc_x(&self.crypto, password, salt, username)
    }

    /// `v = g^x mod N`.
    pub fn calc_v(&self, x: &Value) -> Value {
        let v = self.group.g.int().modpow(x.int(), self.group.n.int());
        Value::from_integer(v)
    }

    /// `A = g^a mod N`.
    pub fn calc_a_pub(&self, a: &Value) -> Value {
        let a_pub = self.group.g.int().modpow(a.int(), self.group.n.int());
        log::debug!("A = {a_pub:?}");
        Value::from_integer(a_pub)
    }

    /// `B = (k*v + g^b) mod N`, reduced exactly once.
    pub fn calc_b_pub(&self, b: &Value, v: &Value) -> Value {
        let n = self.group.n.int();
        let g_b = self.group.g.int().modpow(b.int(), n);
        let kv = self.k.int() * v.int();
        let b_pub = (kv + g_b) % n;
        log::debug!("B = {b_pub:?}");
        Value::from_integer(b_pub)
    }

    /// `u = H(PAD(A), PAD(B))`.
    pub fn calc_u(&self, a_pub: &Value, b_pub: &Value) -> Value {
        let n_len = self.group.n_len();
        let padded_a = Value::from_bytes(pad(a_pub, n_len));
        let padded_b = Value::from_bytes(pad(b_pub, n_len));
        let u = self.crypto.h(&[&padded_a, &padded_b]);
        log::debug!("u = {u:?}");
        u
    }

    /// `S = (B - k*g^x) ^ (a + u*x) mod N`, client side.
    ///
    /// The intermediate base and exponent are left un-reduced, per the
    /// arithmetic contract; `modpow` performs the only reduction, and a
    /// negative base is folded back into `[0, N)` first.
    pub fn calc_client_s(&self, b_pub: &Value, a: &Value, x: &Value, u: &Value) -> Value {
        let n = self.group.n.int();
        let g_x = self.group.g.int().modpow(x.int(), n);
        let to_sub = (self.k.int() * &g_x) % n;
        let base = if b_pub.int() < &to_sub {
            n - (&to_sub - b_pub.int())
        } else {
            b_pub.int() - &to_sub
        };
        let exp = a.int() + (u.int() * x.int());
        let s = base.modpow(&exp, n);
        log::debug!("S (client) = {s:?}");
        Value::from_integer(s)
    }

    /// `S = (A * v^u) ^ b mod N`, server side.
    pub fn calc_server_s(&self, a_pub: &Value, b: &Value, v: &Value, u: &Value) -> Value {
        let n = self.group.n.int();
        let v_u = v.int().modpow(u.int(), n);
        let base = (a_pub.int() * &v_u) % n;
        let s = base.modpow(b.int(), n);
        log::debug!("S (server) = {s:?}");
        Value::from_integer(s)
    }

    /// `K = H(S)`.
    pub fn calc_k_session(&self, s: &Value) -> Value {
        let k = self.crypto.h(&[s]);
        log::debug!("K = {k:?}");
        k
    }

    pub fn calc_m(
        &self,
        k: &Value,
        a_pub: &Value,
        b_pub: &Value,
        s: &Value,
        salt: &Value,
        username: &str,
    ) -> crate::Result<Value> {
        V::calc_m(&self.crypto, k, a_pub, b_pub, s, salt, username)
    }

    pub fn calc_m2(&self, k: &Value, a_pub: &Value, m: &Value, s: &Value) -> crate::Result<Value> {
        V::calc_m2(&self.crypto, k, a_pub, m, s)
    }
}

/// `PAD(v)`: left-pads `v`'s big-endian bytes with zeros to `len`.
pub fn pad(v: &Value, len: usize) -> Vec<u8> {
    v.padded(len)
}

/// Reports whether `value mod N == 0` — callers (session code) use this to
/// reject degenerate public keys / scrambling parameters, per §4.4's note
/// that the engine itself does not perform these checks.
pub fn is_zero_mod_n(value: &Value, group: &Group) -> bool {
    (value.int() % group.n.int()).is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::openssl::OpenSslCrypto;
    use crate::crypto::CryptoConfig;
    use crate::engine::standard::StandardVariant;
    use rand::RngCore;

    fn engine() -> Engine<OpenSslCrypto, StandardVariant> {
        let crypto = OpenSslCrypto::try_from(CryptoConfig::new().hash("sha256")).unwrap();
        Engine::new(crypto, Group::default_group())
    }

    #[test]
    fn k_is_deterministic_and_independent_of_session_state() {
        let e1 = engine();
        let e2 = engine();
        assert_eq!(e1.k(), e2.k());
    }

    #[test]
    fn b_pub_is_always_reduced_below_n() {
        let e = engine();
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let mut buf = [0u8; 32];
            rng.fill_bytes(&mut buf);
            let x = Value::from_bytes(buf.to_vec());
            let v = e.calc_v(&x);
            let mut bbuf = [0u8; 32];
            rng.fill_bytes(&mut bbuf);
            let b = Value::from_bytes(bbuf.to_vec());
            let b_pub = e.calc_b_pub(&b, &v);
            assert!(b_pub.int() < e.group().n.int());
        }
    }

    #[test]
    fn client_and_server_premaster_secrets_match() {
        let e = engine();
        let mut rng = rand::thread_rng();

        let mut salt_buf = [0u8; 16];
        rng.fill_bytes(&mut salt_buf);
        let salt = Value::from_bytes(salt_buf.to_vec());

        let x = e.calc_x("verysecure", &salt, "alice");
        let v = e.calc_v(&x);

        let mut a_buf = [0u8; 32];
        rng.fill_bytes(&mut a_buf);
        let a = Value::from_bytes(a_buf.to_vec());
        let a_pub = e.calc_a_pub(&a);

        let mut b_buf = [0u8; 32];
        rng.fill_bytes(&mut b_buf);
        let b = Value::from_bytes(b_buf.to_vec());
        let b_pub = e.calc_b_pub(&b, &v);

        let u = e.calc_u(&a_pub, &b_pub);

        let s_client = e.calc_client_s(&b_pub, &a, &x, &u);
        let s_server = e.calc_server_s(&a_pub, &b, &v, &u);

        assert_eq!(s_client, s_server);
    }
}
