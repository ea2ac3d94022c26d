//! Crate-wide error types.
//!
//! Mirrors the teacher crate's two-tier shape: small `thiserror` leaf errors
//! live next to the module they describe ([`ValueError`], [`CryptoConfigError`],
//! [`UnknownGroup`]) and are folded into the single [`Srp6Error`] that every
//! public operation returns, the same way the original crate folded
//! `BigNumberError` into its top-level `Srp6Error`.

use derive_more::{Display, Error};

use crate::group::UnknownGroup;
use crate::value::{Value, ValueError};

/// encapsulates a [`Srp6Error`]
pub type Result<T> = std::result::Result<T, Srp6Error>;

/// Raised by a [`crate::crypto::Crypto`] provider's constructor when a
/// configuration field names an option the provider does not implement.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} = {value:?} is not applicable (allowed: {allowed:?})")]
pub struct CryptoConfigError {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

#[derive(Error, Display, Debug)]
pub enum Srp6Error {
    #[display("{_0}")]
    Value(#[error(source)] ValueError),

    #[display("{_0}")]
    UnknownGroup(#[error(source)] UnknownGroup),

    #[display("{_0}")]
    NotApplicable(#[error(source)] CryptoConfigError),

    #[display("{operation} is not implemented by this engine variant")]
    Unimplemented { operation: &'static str },

    #[display(
        "The provided key length ({given} bytes) does not match the expected ({expected} byte)"
    )]
    KeyLengthMismatch { given: usize, expected: usize },

    #[display("protocol aborted: {reason}")]
    ProtocolAbort { reason: &'static str },

    #[display("The provided proof is invalid")]
    InvalidProof(#[error(not(source))] Value),

    #[display("The provided strong proof is invalid")]
    InvalidStrongProof(#[error(not(source))] Value),

    #[display("The provided public key is invalid")]
    InvalidPublicKey(#[error(not(source))] Value),
}

impl From<ValueError> for Srp6Error {
    fn from(e: ValueError) -> Self {
        Srp6Error::Value(e)
    }
}

impl From<UnknownGroup> for Srp6Error {
    fn from(e: UnknownGroup) -> Self {
        Srp6Error::UnknownGroup(e)
    }
}

impl From<CryptoConfigError> for Srp6Error {
    fn from(e: CryptoConfigError) -> Self {
        Srp6Error::NotApplicable(e)
    }
}
