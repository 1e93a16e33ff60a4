//! # Deployment Configuration
//!
//! TOML file describing a deployment: owner, attester, mint parameters,
//! proof context, permit domain, reward policies and the proof verifier.
//!
//! ```toml
//! [token]
//! chain_id = 480
//! verifying_contract = "0x00000000000000000000000000000000000057c1"
//! initial_supply = { tokens = 0 }
//!
//! [admin]
//! owner = "0x1111111111111111111111111111111111111111"
//! attester = "0x2222222222222222222222222222222222222222"
//!
//! [mint]
//! amount_per_mint = { tokens = 10 }
//! wait_between_mints_secs = 3600
//! enforce_unique_nullifiers = true
//!
//! [identity]
//! app_id = "app_staging_worldsocial"
//! action = "mint"
//!
//! [rewards]
//! callers = { mode = "owner_only" }
//! remainder = { mode = "not_issued" }
//!
//! [verifier]
//! kind = "groth16"
//! verifying_key = "verification_key.json"
//! accepted_roots = []
//! ```

use crate::domain::errors::IssuanceError;
use crate::state::{GenesisParams, DEFAULT_CHAIN_ID};
use serde::{Deserialize, Serialize};
use shared_types::units::tokens;
use shared_types::{Address, RemainderPolicy, RewardCallerPolicy, U256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use ws_02_identity_verifier::{
    Groth16ProofVerifier, IdentityProofVerifier, ProofContext, ProofError, RootPolicy,
};
#[cfg(any(test, feature = "mock"))]
use ws_02_identity_verifier::{MockMode, MockProofVerifier};

/// Errors while loading or validating a deployment file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Not valid TOML or wrong shape.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An amount string is not a decimal integer.
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount {
        /// Offending field.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// `kind = "mock"` in a build without the `mock` feature.
    #[error("verifier.kind = \"mock\" is not available in this build")]
    MockUnavailable,

    /// Groth16 verifier selected without a verifying key.
    #[error("verifier.kind = \"groth16\" requires verifier.verifying_key")]
    MissingVerifyingKey,

    /// Verifying key could not be loaded.
    #[error("Verifier setup failed: {0}")]
    Verifier(#[from] ProofError),

    /// Parameters rejected by genesis validation.
    #[error("Invalid deployment parameters: {0}")]
    Invalid(#[from] IssuanceError),
}

/// An amount given either in whole tokens or in base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenAmount {
    /// Whole tokens (scaled by 10^18).
    Tokens {
        /// Whole-token count.
        tokens: u64,
    },
    /// Exact base units as a decimal string.
    BaseUnits {
        /// Decimal base-unit count.
        base_units: String,
    },
}

impl Default for TokenAmount {
    fn default() -> Self {
        TokenAmount::Tokens { tokens: 0 }
    }
}

impl TokenAmount {
    /// Amount in base units.
    pub fn to_base_units(&self, field: &'static str) -> Result<U256, ConfigError> {
        match self {
            TokenAmount::Tokens { tokens: whole } => Ok(tokens(*whole)),
            TokenAmount::BaseUnits { base_units } => {
                U256::from_dec_str(base_units.trim()).map_err(|_| ConfigError::InvalidAmount {
                    field,
                    value: base_units.clone(),
                })
            }
        }
    }
}

/// `[token]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSection {
    /// Permit domain chain id.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Permit domain verifying contract.
    #[serde(default)]
    pub verifying_contract: Address,
    /// Supply credited to the owner at genesis.
    #[serde(default)]
    pub initial_supply: TokenAmount,
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            verifying_contract: Address::ZERO,
            initial_supply: TokenAmount::default(),
        }
    }
}

/// `[admin]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSection {
    /// Initial owner.
    pub owner: Address,
    /// Initial attestation signer.
    pub attester: Address,
}

/// `[mint]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MintSection {
    /// Amount per successful mint.
    pub amount_per_mint: TokenAmount,
    /// Cooldown in seconds.
    pub wait_between_mints_secs: u64,
    /// Reject reused nullifiers.
    #[serde(default = "default_true")]
    pub enforce_unique_nullifiers: bool,
}

/// `[identity]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    /// Application identifier.
    pub app_id: String,
    /// Action identifier.
    pub action: String,
}

/// `[rewards]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewardSection {
    /// Who may distribute rewards.
    #[serde(default)]
    pub callers: RewardCallerPolicy,
    /// Where the undistributed part goes.
    #[serde(default)]
    pub remainder: RemainderPolicy,
}

/// Which proof verifier backs minting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifierKind {
    /// BN254 Groth16 with a snarkjs verifying key.
    #[default]
    Groth16,
    /// Deterministic mock; never use in production.
    Mock,
}

/// `[verifier]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifierConfig {
    /// Verifier backend.
    #[serde(default)]
    pub kind: VerifierKind,
    /// snarkjs `verification_key.json`, relative to the config file.
    #[serde(default)]
    pub verifying_key: Option<PathBuf>,
    /// Mock behaviour when `kind = "mock"`.
    #[cfg(any(test, feature = "mock"))]
    #[serde(default)]
    pub mock_mode: MockMode,
    /// Accepted identity roots; empty accepts any root.
    #[serde(default)]
    pub accepted_roots: Vec<U256>,
}

impl VerifierConfig {
    /// Builds the configured verifier. Relative key paths resolve against
    /// `base_dir`.
    pub fn build(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<Box<dyn IdentityProofVerifier>, ConfigError> {
        match self.kind {
            VerifierKind::Mock => self.build_mock(),
            VerifierKind::Groth16 => {
                let key = self
                    .verifying_key
                    .as_ref()
                    .ok_or(ConfigError::MissingVerifyingKey)?;
                let key = match base_dir {
                    Some(dir) if key.is_relative() => dir.join(key),
                    _ => key.clone(),
                };
                let roots = if self.accepted_roots.is_empty() {
                    RootPolicy::AnyRoot
                } else {
                    RootPolicy::Allowlist(self.accepted_roots.iter().copied().collect())
                };
                let verifier = Groth16ProofVerifier::from_snarkjs_file(&key)?.with_root_policy(roots);
                Ok(Box::new(verifier))
            }
        }
    }

    #[cfg(any(test, feature = "mock"))]
    fn build_mock(&self) -> Result<Box<dyn IdentityProofVerifier>, ConfigError> {
        tracing::warn!(mode = ?self.mock_mode, "Using mock identity verifier");
        Ok(Box::new(MockProofVerifier::new(self.mock_mode)))
    }

    #[cfg(not(any(test, feature = "mock")))]
    fn build_mock(&self) -> Result<Box<dyn IdentityProofVerifier>, ConfigError> {
        Err(ConfigError::MockUnavailable)
    }
}

/// A whole deployment file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Token and permit domain.
    #[serde(default)]
    pub token: TokenSection,
    /// Owner and attester.
    pub admin: AdminSection,
    /// Mint parameters.
    pub mint: MintSection,
    /// Proof context.
    pub identity: IdentitySection,
    /// Reward policies.
    #[serde(default)]
    pub rewards: RewardSection,
    /// Proof verifier.
    #[serde(default)]
    pub verifier: VerifierConfig,
}

impl DeploymentConfig {
    /// Loads and validates a deployment file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything genesis would reject, plus verifier wiring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.genesis_params()?;
        if self.verifier.kind == VerifierKind::Groth16 && self.verifier.verifying_key.is_none() {
            return Err(ConfigError::MissingVerifyingKey);
        }
        #[cfg(not(any(test, feature = "mock")))]
        if self.verifier.kind == VerifierKind::Mock {
            return Err(ConfigError::MockUnavailable);
        }
        Ok(())
    }

    /// Genesis parameters described by this file.
    pub fn genesis_params(&self) -> Result<GenesisParams, ConfigError> {
        let amount_per_mint = self.mint.amount_per_mint.to_base_units("amount_per_mint")?;
        if amount_per_mint.is_zero() {
            return Err(IssuanceError::ZeroAmount {
                field: "amount_per_mint",
            }
            .into());
        }
        for (field, address) in [("owner", self.admin.owner), ("attester", self.admin.attester)] {
            if address.is_zero() {
                return Err(IssuanceError::ZeroAddress { field }.into());
            }
        }
        if let RemainderPolicy::Treasury(treasury) = self.rewards.remainder {
            if treasury.is_zero() {
                return Err(IssuanceError::ZeroAddress { field: "treasury" }.into());
            }
        }

        let mut params = GenesisParams::new(
            self.admin.owner,
            self.admin.attester,
            amount_per_mint,
            self.mint.wait_between_mints_secs,
            ProofContext::new(&self.identity.app_id, &self.identity.action),
        );
        params.chain_id = U256::from(self.token.chain_id);
        params.verifying_contract = self.token.verifying_contract;
        params.initial_supply = self.token.initial_supply.to_base_units("initial_supply")?;
        params.enforce_unique_nullifiers = self.mint.enforce_unique_nullifiers;
        params.reward_callers = self.rewards.callers.clone();
        params.remainder = self.rewards.remainder;
        Ok(params)
    }
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_true() -> bool {
    true
}
