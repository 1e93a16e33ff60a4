//! # ECDSA (secp256k1)
//!
//! Signing and signer recovery for Ethereum-style 65-byte `r || s || v`
//! signatures.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be in the lower half of the
//!   curve order; high-S encodings of an otherwise valid signature are rejected
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - Uses the k256 crate for all curve arithmetic

use crate::errors::SignatureError;
use crate::hashing::keccak256;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared_types::{Address, Hash};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SIGNATURE
// =============================================================================

/// ECDSA signature on the secp256k1 curve.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl EcdsaSignature {
    /// Serialized length: `r || s || v`.
    pub const LEN: usize = 65;

    /// Encodes as `r || s || v`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Decodes `r || s || v`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != Self::LEN {
            return Err(SignatureError::InvalidFormat);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// `0x`-prefixed hex of the 65-byte encoding.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for EcdsaSignature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidFormat)?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for EcdsaSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EcdsaSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// RECOVERY PORT
// =============================================================================

/// Recovers the address that produced a signature over a 32-byte digest.
///
/// Keeps the ledger and mint authorizer independent of any particular
/// signature library.
pub trait SignatureRecovery: Send + Sync {
    /// Recover the signer of `digest`.
    fn recover(&self, digest: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError>;
}

/// k256-backed recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Recovery;

impl SignatureRecovery for Secp256k1Recovery {
    fn recover(&self, digest: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError> {
        recover_address(digest, signature)
    }
}

// =============================================================================
// CORE FUNCTIONS
// =============================================================================

/// Recover the signer's Ethereum address from a signature.
///
/// Security validations performed:
/// 1. Recovery ID (v) is valid (0, 1, 27 or 28)
/// 2. R and S are in range [1, n-1]
/// 3. S is in the lower half of the order (EIP-2)
/// 4. Public key recovery succeeds
pub fn recover_address(message_hash: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::InvalidFormat)?;

    // normalize_s returns Some only when S was in the upper half
    if sig.normalize_s().is_some() {
        return Err(SignatureError::MalleableSignature);
    }

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

/// Derive Ethereum address from public key: last 20 bytes of
/// keccak256 of the uncompressed point without its 0x04 prefix.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

/// Parse recovery ID from v value.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::from_byte(id).ok_or(SignatureError::InvalidRecoveryId(v))
}

// =============================================================================
// KEYPAIR
// =============================================================================

/// secp256k1 signing key with its derived address.
///
/// Used by the backend attester and by permit signers.
#[derive(Clone)]
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignatureError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| SignatureError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Create from a `0x`-optional hex secret key.
    pub fn from_hex(secret: &str) -> Result<Self, SignatureError> {
        let digits = secret.trim().strip_prefix("0x").unwrap_or(secret.trim());
        let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidPrivateKey)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidPrivateKey)?;
        Self::from_bytes(bytes)
    }

    /// Address controlled by this key.
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest. The result is low-S with `v` in {27, 28}.
    pub fn sign_prehash(&self, digest: &Hash) -> Result<EcdsaSignature, SignatureError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| SignatureError::SigningFailed)?;

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        Ok(EcdsaSignature {
            r,
            s,
            v: recid.to_byte() + 27,
        })
    }
}

impl fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
