//! # Groth16 Flows
//!
//! Minting with real BN254 proofs, the verifier loaded from a snarkjs
//! `verification_key.json` on disk exactly as a deployment would.

#[cfg(test)]
mod tests {
    use crate::fixtures::{ALICE, MALLORY, OWNER};
    use crate::zk::ZkDeployment;
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::units::tokens;
    use shared_types::{Classify, U256};
    use std::fs;
    use std::sync::Arc;
    use ws_02_identity_verifier::{hash_to_field, IdentityProofVerifier, ProofError};
    use ws_03_token_issuance::{
        sign_attestation, DeploymentConfig, IssuanceError, ManualTimeSource, MintRequest,
        TokenIssuanceApi, TokenState, WorldSocialToken,
    };

    type ZkToken = WorldSocialToken<Box<dyn IdentityProofVerifier>, Arc<ManualTimeSource>>;

    struct Setup {
        token: ZkToken,
        zk: ZkDeployment,
        attester: Secp256k1KeyPair,
        clock: Arc<ManualTimeSource>,
        _dir: tempfile::TempDir,
    }

    /// Writes the key next to a deployment file and boots from both.
    fn boot(accepted_roots: &str) -> Setup {
        let zk = ZkDeployment::setup(7);
        let attester = Secp256k1KeyPair::generate();
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("verification_key.json"),
            zk.verification_key_json(),
        )
        .unwrap();

        let config = DeploymentConfig::parse(&format!(
            r#"
            [admin]
            owner = "{OWNER}"
            attester = "{attester}"

            [mint]
            amount_per_mint = {{ tokens = 10 }}
            wait_between_mints_secs = 3600

            [identity]
            app_id = "app_staging_worldsocial"
            action = "mint"

            [verifier]
            kind = "groth16"
            verifying_key = "verification_key.json"
            accepted_roots = {accepted_roots}
            "#,
            attester = attester.address(),
        ))
        .unwrap();

        let verifier = config.verifier.build(Some(dir.path())).unwrap();
        let clock = Arc::new(ManualTimeSource::new(0));
        let state = TokenState::genesis(config.genesis_params().unwrap(), 0).unwrap();
        Setup {
            token: WorldSocialToken::new(state, verifier, Arc::clone(&clock)),
            zk,
            attester,
            clock,
            _dir: dir,
        }
    }

    fn request(s: &mut Setup, account: shared_types::Address, seed: &[u8]) -> MintRequest {
        let nullifier = hash_to_field(seed);
        let context = s.token.state().config().proof_context().clone();
        MintRequest {
            account,
            root: s.zk.root(),
            nullifier,
            proof: s.zk.prove(&context, &account, nullifier),
            signature: sign_attestation(&s.attester, &account, nullifier).unwrap(),
        }
    }

    #[test]
    fn test_real_proof_mints_once() {
        let mut s = boot("[]");
        let req = request(&mut s, ALICE, b"alice-identity");
        s.token.request_mint(&req).unwrap();
        assert_eq!(s.token.balance_of(&ALICE), tokens(10));

        s.clock.set(3_600);
        assert_eq!(
            s.token.request_mint(&req).unwrap_err().reason_code(),
            "PROOF_REPLAYED"
        );
    }

    #[test]
    fn test_proof_for_other_account_rejected() {
        let mut s = boot("[]");
        let mut req = request(&mut s, ALICE, b"alice-identity");
        req.account = MALLORY;
        req.signature = sign_attestation(&s.attester, &MALLORY, req.nullifier).unwrap();

        assert_eq!(
            s.token.request_mint(&req).unwrap_err(),
            IssuanceError::InvalidProof(ProofError::VerificationFailed)
        );
        assert_eq!(s.token.balance_of(&MALLORY), U256::zero());
    }

    #[test]
    fn test_unknown_root_rejected_by_allowlist() {
        let mut s = boot(r#"["0x1"]"#);
        let req = request(&mut s, ALICE, b"alice-identity");
        assert!(matches!(
            s.token.request_mint(&req),
            Err(IssuanceError::InvalidProof(ProofError::UnknownRoot(_)))
        ));
    }

    #[test]
    fn test_accepted_root_in_allowlist() {
        let root = ZkDeployment::setup(7).root();
        let mut s = boot(&format!(r#"["{root:#x}"]"#));
        let req = request(&mut s, ALICE, b"alice-identity");
        s.token.request_mint(&req).unwrap();
    }
}
