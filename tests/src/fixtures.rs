//! # Test Fixtures
//!
//! A deployment wired to the mock verifier and a manual clock, plus helpers
//! that build correctly signed mint requests.

use shared_crypto::Secp256k1KeyPair;
use shared_types::units::tokens;
use shared_types::{Address, Timestamp, U256};
use std::sync::Arc;
use ws_02_identity_verifier::{MockProofVerifier, ProofContext};
use ws_03_token_issuance::{
    sign_attestation, GenesisParams, ManualTimeSource, MintRequest, TokenState, WorldSocialToken,
};

/// Deployment owner.
pub const OWNER: Address = Address([0x01; 20]);
/// A content creator.
pub const CREATOR: Address = Address([0xC0; 20]);
/// A viewer.
pub const VIEWER: Address = Address([0xE0; 20]);
/// A verified human who mints.
pub const ALICE: Address = Address([0xA1; 20]);
/// Someone with no privileges.
pub const MALLORY: Address = Address([0x66; 20]);

/// Identity root used by mock proofs.
pub const ROOT: u64 = 0x5eed;

/// Cooldown used by the default harness.
pub const WAIT: u64 = 3_600;

/// Token under test.
pub type TestToken = WorldSocialToken<MockProofVerifier, Arc<ManualTimeSource>>;

/// A running deployment with its attester key and clock.
pub struct Harness {
    /// The system under test.
    pub token: TestToken,
    /// Key behind the configured attester address.
    pub attester: Secp256k1KeyPair,
    /// Shared manual clock.
    pub clock: Arc<ManualTimeSource>,
}

impl Harness {
    /// 10 tokens per mint, one-hour cooldown, bound mock verifier, t = 0.
    pub fn new() -> Self {
        Self::with_params(|_| {})
    }

    /// Like `new`, after letting `customize` adjust the genesis parameters.
    pub fn with_params(customize: impl FnOnce(&mut GenesisParams)) -> Self {
        let attester = Secp256k1KeyPair::generate();
        let mut params = GenesisParams::new(
            OWNER,
            attester.address(),
            tokens(10),
            WAIT,
            ProofContext::new("app_staging_worldsocial", "mint"),
        );
        customize(&mut params);

        let clock = Arc::new(ManualTimeSource::new(0));
        let state = TokenState::genesis(params, 0).expect("valid genesis parameters");
        let token = WorldSocialToken::new(state, MockProofVerifier::bound(), Arc::clone(&clock));
        Self {
            token,
            attester,
            clock,
        }
    }

    /// Moves the clock to `time`.
    pub fn at(&self, time: Timestamp) -> &Self {
        self.clock.set(time);
        self
    }

    /// A request the configured attester signed and the mock verifier accepts.
    pub fn mint_request(&self, account: Address, nullifier: u64) -> MintRequest {
        self.mint_request_signed_by(&self.attester, account, nullifier)
    }

    /// A request with a valid proof, signed by `signer`.
    pub fn mint_request_signed_by(
        &self,
        signer: &Secp256k1KeyPair,
        account: Address,
        nullifier: u64,
    ) -> MintRequest {
        let nullifier = U256::from(nullifier);
        let root = U256::from(ROOT);
        let context = self.token.state().config().proof_context();
        MintRequest {
            account,
            root,
            nullifier,
            proof: MockProofVerifier::expected_proof(root, context, &account, nullifier),
            signature: sign_attestation(signer, &account, nullifier).expect("signing succeeds"),
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
