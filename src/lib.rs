/*!
Core of an Enhanced Secure Remote Password (SRP-6a) authentication library.

SRP is an augmented password-authenticated key exchange: a client proves
knowledge of a password to a server that only stores a verifier derived
from it, and both parties derive a shared session key without ever
transmitting the password. This crate provides the mathematical engine,
the [`Value`] representation type, a pluggable [`Crypto`](crate::crypto::Crypto)
facade with two concrete providers, and the engine variants that select
among documented formulations of `x`, `M`, `M2`.

**NOTE**: use a group of 2048 bits or larger in production;
[`Group::default_group`] already does.

# Usage
See `demos/01_signup.rs` and `demos/02_authentication.rs`.

# Further details
- [RFC2945](https://datatracker.ietf.org/doc/html/rfc2945) describes SRP in detail.
- [RFC5054](https://datatracker.ietf.org/doc/html/rfc5054) describes SRP6 for TLS authentication and is the source of the groups in [`group`].
*/
pub mod crypto;
pub mod engine;
pub mod error;
pub mod group;
pub mod session;
pub mod value;

pub use crypto::{Crypto, CryptoConfig};
pub use engine::standard::{Rfc5054Variant, StandardVariant};
pub use engine::{Engine, EngineVariant};
pub use error::{CryptoConfigError, Result, Srp6Error};
pub use group::{Group, UnknownGroup};
pub use session::{ClientHandshake, ClientSession, ServerHandshake, ServerSession, UserRecord};
pub use value::{Value, ValueError};
