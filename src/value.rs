/*!
The representation-agnostic holder of one SRP quantity.

Every number that crosses an SRP operation boundary — `N`, `g`, `k`, `s`,
`x`, `v`, `A`, `B`, `u`, `S`, `K`, `M`, `M2` — is the same mathematical
object viewed three ways: an arbitrary-precision unsigned integer, a
big-endian byte string, and a lowercase hexadecimal string. [`Value`]
mediates between the three so the rest of the crate never has to care which
one a caller happened to hand it.

This plays the same role the teacher crate's `BigNumber` plays in
`big_number.rs`, generalized to the spec's explicit tri-view contract (the
teacher's `BigNumber` is little-endian internally and recomputes every view
on each call; this type is big-endian, as the wire format requires, and
memoizes each view the first time it is asked for).
*/
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::OnceLock;
use thiserror::Error;

/// Failure produced while constructing or parsing a [`Value`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("malformed value: {0:?} is not valid hexadecimal")]
    MalformedValue(String),
    #[error("negative integers cannot be represented as a Value")]
    NegativeValue,
}

/// The view a [`Value`] was constructed from; this view is authoritative,
/// the other two are derived lazily and memoized in the sibling `*_cache`
/// fields.
#[derive(Clone)]
enum Repr {
    Int(BigUint),
    Bin(Vec<u8>),
    Hex(String),
}

/// A non-negative integer, interchangeably an integer, a big-endian byte
/// string, or a lowercase even-length hex string.
///
/// `Value` is immutable after construction; every derived view is computed
/// once and cached in a [`OnceLock`], so a `Value` can be shared across
/// threads (`Send + Sync`) without re-deriving a view on every access.
#[derive(Clone)]
pub struct Value {
    repr: Repr,
    int_cache: OnceLock<BigUint>,
    bin_cache: OnceLock<Vec<u8>>,
    hex_cache: OnceLock<String>,
}

impl Value {
    fn new(repr: Repr) -> Self {
        Value {
            repr,
            int_cache: OnceLock::new(),
            bin_cache: OnceLock::new(),
            hex_cache: OnceLock::new(),
        }
    }

    /// Constructs a `Value` from a non-negative integer.
    pub fn from_integer(n: impl Into<BigUint>) -> Self {
        Self::new(Repr::Int(n.into()))
    }

    /// Constructs a `Value` from a possibly-negative integer, rejecting
    /// negative magnitudes with [`ValueError::NegativeValue`].
    pub fn try_from_signed(n: impl Into<num_bigint::BigInt>) -> Result<Self, ValueError> {
        let (sign, magnitude) = n.into().into_parts();
        if sign == num_bigint::Sign::Minus {
            return Err(ValueError::NegativeValue);
        }
        Ok(Self::new(Repr::Int(magnitude)))
    }

    /// Constructs a `Value` from a big-endian byte string.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Repr::Bin(bytes.into()))
    }

    /// Constructs a `Value` from a hexadecimal string. Odd-length input is
    /// left-padded with a single `'0'`; non-hex characters fail with
    /// [`ValueError::MalformedValue`].
    pub fn from_hex(hex: impl AsRef<str>) -> Result<Self, ValueError> {
        let hex = hex.as_ref();
        if hex.is_empty() {
            return Ok(Self::new(Repr::Hex(String::from("00"))));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValueError::MalformedValue(hex.to_owned()));
        }
        let mut canonical = hex.to_ascii_lowercase();
        if canonical.len() % 2 != 0 {
            canonical.insert(0, '0');
        }
        Ok(Self::new(Repr::Hex(canonical)))
    }

    /// The integer view.
    pub fn int(&self) -> &BigUint {
        match &self.repr {
            Repr::Int(n) => n,
            Repr::Bin(b) => self.int_cache.get_or_init(|| BigUint::from_bytes_be(b)),
            Repr::Hex(h) => self
                .int_cache
                .get_or_init(|| BigUint::parse_bytes(h.as_bytes(), 16).expect("validated hex")),
        }
    }

    /// The big-endian byte-string view.
    pub fn bin(&self) -> &[u8] {
        match &self.repr {
            Repr::Bin(b) => b,
            _ => self.bin_cache.get_or_init(|| self.int().to_bytes_be()),
        }
    }

    /// The lowercase, even-length hexadecimal view.
    pub fn hex(&self) -> &str {
        match &self.repr {
            Repr::Hex(h) => h,
            _ => self.hex_cache.get_or_init(|| {
                let s = self.int().to_str_radix(16);
                if s.len() % 2 != 0 {
                    format!("0{s}")
                } else {
                    s
                }
            }),
        }
    }

    /// Number of bytes in the big-endian encoding.
    pub fn len(&self) -> usize {
        self.bin().len()
    }

    pub fn is_zero(&self) -> bool {
        self.int().is_zero()
    }

    /// Left-pads the big-endian encoding with zero bytes to `len` bytes
    /// (the `PAD()` operation of RFC 2945 / RFC 5054).
    pub fn padded(&self, len: usize) -> Vec<u8> {
        let bin = self.bin();
        if bin.len() >= len {
            return bin.to_vec();
        }
        let mut out = vec![0u8; len - bin.len()];
        out.extend_from_slice(bin);
        out
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Value(\"{}\")", self.hex())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.int() == other.int()
    }
}
impl Eq for Value {}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::from_integer(BigUint::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::from_integer(BigUint::from(n))
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.hex())
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Value::from_hex(hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_hex_bin_round_trip() {
        let v = Value::from(14159265359u64);
        assert_eq!(v.hex(), "034bf53e4f");
        assert_eq!(v.bin(), &[0x03, 0x4b, 0xf5, 0x3e, 0x4f]);

        let from_hex = Value::from_hex("034bf53e4f").unwrap();
        assert_eq!(*from_hex.int(), *v.int());

        let from_bin = Value::from_bytes(vec![0x03, 0x4b, 0xf5, 0x3e, 0x4f]);
        assert_eq!(*from_bin.int(), *v.int());
    }

    #[test]
    fn odd_length_hex_is_left_padded() {
        let v = Value::from_hex("6").unwrap();
        assert_eq!(v.hex(), "06");
        assert_eq!(*v.int(), BigUint::from(6u32));
    }

    #[test]
    fn odd_length_int_hex_gets_leading_zero() {
        // 0xabc -> odd length "abc" -> canonical hex is "0abc"
        let v = Value::from_integer(BigUint::from(0xabcu32));
        assert_eq!(v.hex(), "0abc");
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(matches!(
            Value::from_hex("not-hex"),
            Err(ValueError::MalformedValue(_))
        ));
    }

    #[test]
    fn negative_integers_are_rejected() {
        let negative = num_bigint::BigInt::from(-1);
        assert_eq!(
            Value::try_from_signed(negative),
            Err(ValueError::NegativeValue)
        );
    }

    #[test]
    fn equality_is_by_integer_value_regardless_of_input_view() {
        let from_hex = Value::from_hex("ab").unwrap();
        let from_int = Value::from_integer(BigUint::from(0xabu32));
        let from_bin = Value::from_bytes(vec![0xab]);
        assert_eq!(from_hex, from_int);
        assert_eq!(from_hex, from_bin);
    }

    #[test]
    fn padding_left_pads_with_zero_bytes() {
        let v = Value::from_bytes(vec![0x11, 0xcd]);
        assert_eq!(v.padded(4), vec![0x00, 0x00, 0x11, 0xcd]);
        // padding to a length shorter than the value is a no-op (never truncates)
        assert_eq!(v.padded(1), vec![0x11, 0xcd]);
    }
}
