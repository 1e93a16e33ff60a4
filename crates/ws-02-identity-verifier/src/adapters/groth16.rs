//! # Groth16 Verifier (BN254)
//!
//! Verifies Semaphore-style proofs with a verifying key exported by
//! snarkjs (`verification_key.json`).
//!
//! ## Input Validation
//!
//! - G1/G2 points must be on the curve and in the prime-order subgroup
//! - Coordinates must be below the base field modulus
//! - Public inputs must be below the scalar field modulus
//! - The `(0, 0)` encoding is the point at infinity

use crate::domain::entities::{ProofContext, SemaphoreProof};
use crate::domain::errors::ProofError;
use crate::domain::hashing::signal_hash;
use crate::ports::inbound::IdentityProofVerifier;
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInt, PrimeField};
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use serde::Deserialize;
use shared_types::{Address, U256};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Number of public inputs of a Semaphore proof.
pub const PUBLIC_INPUTS: usize = 4;

/// Which identity roots are acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RootPolicy {
    /// Any root; the caller trusts whoever supplies it.
    #[default]
    AnyRoot,
    /// Only the listed roots.
    Allowlist(BTreeSet<U256>),
}

impl RootPolicy {
    /// Whether `root` passes.
    pub fn accepts(&self, root: &U256) -> bool {
        match self {
            RootPolicy::AnyRoot => true,
            RootPolicy::Allowlist(roots) => roots.contains(root),
        }
    }
}

// =============================================================================
// SNARKJS VERIFYING KEY
// =============================================================================

/// `verification_key.json` as written by `snarkjs zkey export verificationkey`.
#[derive(Debug, Clone, Deserialize)]
struct SnarkjsVerifyingKey {
    protocol: String,
    curve: String,
    #[serde(rename = "nPublic")]
    n_public: usize,
    vk_alpha_1: Vec<String>,
    vk_beta_2: Vec<Vec<String>>,
    vk_gamma_2: Vec<Vec<String>>,
    vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    ic: Vec<Vec<String>>,
}

fn parse_dec(value: &str) -> Result<U256, ProofError> {
    U256::from_dec_str(value)
        .map_err(|_| ProofError::InvalidVerifyingKey(format!("not a decimal integer: {value}")))
}

fn parse_g1_json(coords: &[String]) -> Result<G1Affine, ProofError> {
    let [x, y, z] = coords else {
        return Err(ProofError::InvalidVerifyingKey(
            "G1 point needs three coordinates".into(),
        ));
    };
    if parse_dec(z)?.is_zero() {
        return Ok(G1Affine::zero());
    }
    g1_point(parse_dec(x)?, parse_dec(y)?)
        .map_err(|e| ProofError::InvalidVerifyingKey(e.to_string()))
}

fn parse_g2_json(coords: &[Vec<String>]) -> Result<G2Affine, ProofError> {
    let [x, y, z] = coords else {
        return Err(ProofError::InvalidVerifyingKey(
            "G2 point needs three coordinates".into(),
        ));
    };
    let pair = |c: &Vec<String>| -> Result<(U256, U256), ProofError> {
        match c.as_slice() {
            [c0, c1] => Ok((parse_dec(c0)?, parse_dec(c1)?)),
            _ => Err(ProofError::InvalidVerifyingKey(
                "Fq2 element needs two limbs".into(),
            )),
        }
    };
    if pair(z)? == (U256::zero(), U256::zero()) {
        return Ok(G2Affine::zero());
    }
    let (x0, x1) = pair(x)?;
    let (y0, y1) = pair(y)?;
    g2_point(x0, x1, y0, y1).map_err(|e| ProofError::InvalidVerifyingKey(e.to_string()))
}

// =============================================================================
// FIELD AND CURVE DECODING
// =============================================================================

fn fq(value: U256) -> Result<Fq, ProofError> {
    Fq::from_bigint(BigInt::new(value.0))
        .ok_or_else(|| ProofError::MalformedProof("coordinate exceeds base field".into()))
}

fn fr(value: U256, name: &'static str) -> Result<Fr, ProofError> {
    Fr::from_bigint(BigInt::new(value.0)).ok_or(ProofError::InputOutOfField { name })
}

fn g1_point(x: U256, y: U256) -> Result<G1Affine, ProofError> {
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::zero());
    }
    let point = G1Affine::new_unchecked(fq(x)?, fq(y)?);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ProofError::MalformedProof("G1 point not on curve".into()));
    }
    Ok(point)
}

fn g2_point(x0: U256, x1: U256, y0: U256, y1: U256) -> Result<G2Affine, ProofError> {
    if [x0, x1, y0, y1].iter().all(U256::is_zero) {
        return Ok(G2Affine::zero());
    }
    let point = G2Affine::new_unchecked(Fq2::new(fq(x0)?, fq(x1)?), Fq2::new(fq(y0)?, fq(y1)?));
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ProofError::MalformedProof(
            "G2 point not on curve or not in subgroup".into(),
        ));
    }
    Ok(point)
}

/// Decodes the eight-word blob (`B` limbs are `c1, c0` ordered).
fn decode_proof(proof: &SemaphoreProof) -> Result<Proof<Bn254>, ProofError> {
    let w = proof.words();
    Ok(Proof {
        a: g1_point(w[0], w[1])?,
        b: g2_point(w[3], w[2], w[5], w[4])?,
        c: g1_point(w[6], w[7])?,
    })
}

// =============================================================================
// VERIFIER
// =============================================================================

/// Groth16 BN254 verifier for Semaphore proofs.
#[derive(Clone)]
pub struct Groth16ProofVerifier {
    pvk: PreparedVerifyingKey<Bn254>,
    roots: RootPolicy,
}

impl fmt::Debug for Groth16ProofVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Groth16ProofVerifier")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl Groth16ProofVerifier {
    /// Wraps an arkworks verifying key.
    pub fn new(vk: &VerifyingKey<Bn254>) -> Result<Self, ProofError> {
        if vk.gamma_abc_g1.len() != PUBLIC_INPUTS + 1 {
            return Err(ProofError::InvalidVerifyingKey(format!(
                "expected {} IC points, got {}",
                PUBLIC_INPUTS + 1,
                vk.gamma_abc_g1.len()
            )));
        }
        Ok(Self {
            pvk: prepare_verifying_key(vk),
            roots: RootPolicy::AnyRoot,
        })
    }

    /// Parses a snarkjs `verification_key.json` document.
    pub fn from_snarkjs_json(json: &str) -> Result<Self, ProofError> {
        let raw: SnarkjsVerifyingKey = serde_json::from_str(json)
            .map_err(|e| ProofError::InvalidVerifyingKey(e.to_string()))?;
        if raw.protocol != "groth16" || raw.curve != "bn128" {
            return Err(ProofError::InvalidVerifyingKey(format!(
                "unsupported {}/{}",
                raw.protocol, raw.curve
            )));
        }
        if raw.n_public != PUBLIC_INPUTS {
            return Err(ProofError::InvalidVerifyingKey(format!(
                "expected {PUBLIC_INPUTS} public inputs, got {}",
                raw.n_public
            )));
        }

        let vk = VerifyingKey::<Bn254> {
            alpha_g1: parse_g1_json(&raw.vk_alpha_1)?,
            beta_g2: parse_g2_json(&raw.vk_beta_2)?,
            gamma_g2: parse_g2_json(&raw.vk_gamma_2)?,
            delta_g2: parse_g2_json(&raw.vk_delta_2)?,
            gamma_abc_g1: raw
                .ic
                .iter()
                .map(|p| parse_g1_json(p))
                .collect::<Result<_, _>>()?,
        };
        Self::new(&vk)
    }

    /// Reads a snarkjs verifying key from disk.
    pub fn from_snarkjs_file(path: impl AsRef<Path>) -> Result<Self, ProofError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ProofError::InvalidVerifyingKey(format!("{}: {e}", path.display())))?;
        Self::from_snarkjs_json(&json)
    }

    /// Restricts accepted roots.
    pub fn with_root_policy(mut self, roots: RootPolicy) -> Self {
        self.roots = roots;
        self
    }

    /// Current root policy.
    pub fn root_policy(&self) -> &RootPolicy {
        &self.roots
    }
}

impl IdentityProofVerifier for Groth16ProofVerifier {
    fn verify(
        &self,
        root: U256,
        context: &ProofContext,
        signal: &Address,
        nullifier: U256,
        proof: &SemaphoreProof,
    ) -> Result<(), ProofError> {
        if !self.roots.accepts(&root) {
            warn!(root = %format!("{root:#x}"), "Proof against unknown root");
            return Err(ProofError::UnknownRoot(root));
        }

        let inputs = [
            fr(root, "root")?,
            fr(nullifier, "nullifier")?,
            fr(signal_hash(signal), "signal_hash")?,
            fr(context.external_nullifier(), "external_nullifier")?,
        ];
        let proof = decode_proof(proof)?;

        let valid = Groth16::<Bn254>::verify_proof(&self.pvk, &proof, &inputs)
            .map_err(|e| ProofError::MalformedProof(e.to_string()))?;
        if valid {
            debug!(%signal, "Groth16 proof verified");
            Ok(())
        } else {
            warn!(%signal, "Groth16 proof rejected");
            Err(ProofError::VerificationFailed)
        }
    }
}
