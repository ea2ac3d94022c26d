/*!
Thin client/server session orchestration.

Generalizes the teacher crate's `api::{host::Srp6, user::Srp6User}` — which
hold per-handshake state fixed to one const-generic key length and one
fixed variant/crypto pair — to be generic over any [`Crypto`] and
[`EngineVariant`], while keeping the same "hold ephemeral state across a
handful of method calls" shape. These are orchestration, not core: the
arithmetic they call into lives entirely in [`crate::engine::Engine`].
*/
use log::debug;
use serde::{Deserialize, Serialize};

use crate::crypto::Crypto;
use crate::engine::{is_zero_mod_n, Engine, EngineVariant};
use crate::error::Srp6Error;
use crate::value::Value;
use crate::Result;

/// Persisted per-user state, produced by registration and consumed by
/// [`ServerSession::start`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub salt: Value,
    pub verifier: Value,
}

/// Message the client sends to open a handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientHandshake {
    pub username: String,
    pub a_pub: Value,
}

/// Message the server replies with after [`ServerSession::start`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerHandshake {
    pub salt: Value,
    pub b_pub: Value,
}

/// Registers a new user: chooses a random salt, derives `(x, v)`, and
/// returns the record the caller is responsible for persisting.
pub fn register<C: Crypto, V: EngineVariant>(
    engine: &Engine<C, V>,
    username: &str,
    password: &str,
) -> UserRecord {
    let salt = engine.crypto().salt();
    let x = engine.calc_x(password, &salt, username);
    let verifier = engine.calc_v(&x);
    UserRecord {
        username: username.to_owned(),
        salt,
        verifier,
    }
}

/// Client-side handshake state. Holds the ephemeral secret `a` and the
/// public values the protocol needs at later steps; destroyed along with
/// the session once the exchange completes or aborts.
#[derive(Debug)]
pub struct ClientSession {
    username: String,
    a: Value,
    a_pub: Value,
    m: Option<Value>,
    s: Option<Value>,
    k: Option<Value>,
}

impl ClientSession {
    /// Starts a handshake: draws a fresh ephemeral `a` and computes `A`.
    pub fn start<C: Crypto, V: EngineVariant>(
        engine: &Engine<C, V>,
        username: &str,
    ) -> (Self, ClientHandshake) {
        let a = engine.crypto().random(engine.group().n_len());
        debug!("a = {a:?}");
        let a_pub = engine.calc_a_pub(&a);
        let session = ClientSession {
            username: username.to_owned(),
            a,
            a_pub: a_pub.clone(),
            m: None,
            s: None,
            k: None,
        };
        let handshake = ClientHandshake {
            username: username.to_owned(),
            a_pub,
        };
        (session, handshake)
    }

    /// Given the server's reply, derives the shared secret and proof `M`.
    pub fn step<C: Crypto, V: EngineVariant>(
        &mut self,
        engine: &Engine<C, V>,
        server_handshake: &ServerHandshake,
        password: &str,
    ) -> Result<Value> {
        let ServerHandshake { salt, b_pub } = server_handshake;
        if is_zero_mod_n(b_pub, engine.group()) {
            return Err(Srp6Error::ProtocolAbort {
                reason: "B mod N == 0",
            });
        }

        let x = engine.calc_x(password, salt, &self.username);
        let u = engine.calc_u(&self.a_pub, b_pub);
        if u.is_zero() {
            return Err(Srp6Error::ProtocolAbort { reason: "u == 0" });
        }

        let s = engine.calc_client_s(b_pub, &self.a, &x, &u);
        let k = engine.calc_k_session(&s);
        let m = engine.calc_m(&k, &self.a_pub, b_pub, &s, salt, &self.username)?;

        self.s = Some(s);
        self.k = Some(k);
        self.m = Some(m.clone());
        Ok(m)
    }

    /// Verifies the server's strong proof `M2` against the locally derived
    /// transcript.
    pub fn verify<C: Crypto, V: EngineVariant>(
        &self,
        engine: &Engine<C, V>,
        m2: &Value,
    ) -> Result<Value> {
        let (s, k, m) = match (&self.s, &self.k, &self.m) {
            (Some(s), Some(k), Some(m)) => (s, k, m),
            _ => {
                return Err(Srp6Error::ProtocolAbort {
                    reason: "verify called before step",
                })
            }
        };
        let expected = engine.calc_m2(k, &self.a_pub, m, s)?;
        if !engine.crypto().secure_compare(&expected, m2) {
            return Err(Srp6Error::InvalidStrongProof(m2.clone()));
        }
        Ok(s.clone())
    }
}

/// Server-side handshake state.
#[derive(Debug)]
pub struct ServerSession {
    a_pub: Value,
    b_pub: Value,
    b: Value,
    salt: Value,
    username: String,
    m: Option<Value>,
    k: Option<Value>,
    s: Option<Value>,
}

impl ServerSession {
    /// Starts the server side of a handshake against a stored
    /// [`UserRecord`] and the client's public key.
    pub fn start<C: Crypto, V: EngineVariant>(
        engine: &Engine<C, V>,
        user: &UserRecord,
        client: &ClientHandshake,
    ) -> Result<(Self, ServerHandshake)> {
        if is_zero_mod_n(&client.a_pub, engine.group()) {
            return Err(Srp6Error::ProtocolAbort {
                reason: "A mod N == 0",
            });
        }

        let b = engine.crypto().random(engine.group().n_len());
        debug!("b = {b:?}");
        let b_pub = engine.calc_b_pub(&b, &user.verifier);

        let session = ServerSession {
            a_pub: client.a_pub.clone(),
            b_pub: b_pub.clone(),
            b,
            salt: user.salt.clone(),
            username: user.username.clone(),
            m: None,
            k: None,
            s: None,
        };
        let handshake = ServerHandshake {
            salt: user.salt.clone(),
            b_pub,
        };
        Ok((session, handshake))
    }

    /// Verifies the client's proof `M` and, on success, returns the strong
    /// proof `M2` to send back along with the shared secret.
    pub fn verify<C: Crypto, V: EngineVariant>(
        &mut self,
        engine: &Engine<C, V>,
        user: &UserRecord,
        m: &Value,
    ) -> Result<(Value, Value)> {
        let u = engine.calc_u(&self.a_pub, &self.b_pub);
        let s = engine.calc_server_s(&self.a_pub, &self.b, &user.verifier, &u);
        let k = engine.calc_k_session(&s);
        let expected_m = engine.calc_m(&k, &self.a_pub, &self.b_pub, &s, &self.salt, &self.username)?;

        if !engine.crypto().secure_compare(&expected_m, m) {
            return Err(Srp6Error::InvalidProof(m.clone()));
        }

        let m2 = engine.calc_m2(&k, &self.a_pub, m, &s)?;
        self.s = Some(s.clone());
        self.k = Some(k);
        self.m = Some(m.clone());
        Ok((m2, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::openssl::OpenSslCrypto;
    use crate::crypto::CryptoConfig;
    use crate::engine::standard::StandardVariant;
    use crate::group::Group;

    fn engine() -> Engine<OpenSslCrypto, StandardVariant> {
        let crypto = OpenSslCrypto::try_from(CryptoConfig::new().hash("sha256")).unwrap();
        Engine::new(crypto, Group::default_group())
    }

    #[test]
    fn full_handshake_round_trips() {
        let engine = engine();
        let username = "alice";
        let password = "verysecure";

        let user_record = register(&engine, username, password);

        let (mut client, client_handshake) = ClientSession::start(&engine, username);
        let (mut server, server_handshake) =
            ServerSession::start(&engine, &user_record, &client_handshake).unwrap();

        let m = client
            .step(&engine, &server_handshake, password)
            .unwrap();

        let (m2, server_secret) = server.verify(&engine, &user_record, &m).unwrap();
        let client_secret = client.verify(&engine, &m2).unwrap();

        assert_eq!(client_secret, server_secret);
    }

    #[test]
    fn wrong_password_fails_server_verification() {
        let engine = engine();
        let username = "bob";
        let user_record = register(&engine, username, "correct-horse");

        let (mut client, client_handshake) = ClientSession::start(&engine, username);
        let (mut server, server_handshake) =
            ServerSession::start(&engine, &user_record, &client_handshake).unwrap();

        let m = client
            .step(&engine, &server_handshake, "wrong-password")
            .unwrap();

        let result = server.verify(&engine, &user_record, &m);
        assert!(matches!(result, Err(Srp6Error::InvalidProof(_))));
    }
}
