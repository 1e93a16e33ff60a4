//! # Mint Flows
//!
//! The proof-gated mint state machine observed through the public facade:
//! cooldown timeline, nullifier replay, and all-or-nothing rejection.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, ALICE, MALLORY, OWNER, WAIT};
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::units::tokens;
    use shared_types::{Classify, ErrorKind, TokenEvent, U256};
    use ws_02_identity_verifier::ProofError;
    use ws_03_token_issuance::{IssuanceError, TokenIssuanceApi};

    // =========================================================================
    // COOLDOWN
    // =========================================================================

    #[test]
    fn test_cooldown_timeline() {
        let mut h = Harness::new();

        h.at(0);
        let events = h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();
        assert_eq!(h.token.balance_of(&ALICE), tokens(10));
        assert_eq!(h.token.last_mint(&ALICE), Some(0));
        assert_eq!(
            events.last(),
            Some(&TokenEvent::Minted {
                account: ALICE,
                amount: tokens(10)
            })
        );

        h.at(1_800);
        let err = h.token.request_mint(&h.mint_request(ALICE, 2)).unwrap_err();
        assert_eq!(
            err,
            IssuanceError::CooldownNotElapsed {
                account: ALICE,
                remaining: 1_800
            }
        );
        assert_eq!(err.kind(), ErrorKind::RateLimit);
        assert_eq!(h.token.balance_of(&ALICE), tokens(10));

        h.at(WAIT);
        h.token.request_mint(&h.mint_request(ALICE, 2)).unwrap();
        assert_eq!(h.token.balance_of(&ALICE), tokens(20));
        assert_eq!(h.token.last_mint(&ALICE), Some(WAIT));
    }

    #[test]
    fn test_cooldown_is_per_account() {
        let mut h = Harness::new();
        h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();
        h.at(1);
        h.token.request_mint(&h.mint_request(MALLORY, 2)).unwrap();

        assert_eq!(h.token.balance_of(&ALICE), tokens(10));
        assert_eq!(h.token.balance_of(&MALLORY), tokens(10));
        assert_eq!(h.token.ledger().total_supply(), tokens(20));
    }

    #[test]
    fn test_zero_wait_allows_back_to_back_mints() {
        let mut h = Harness::with_params(|p| p.wait_between_mints = 0);
        for nullifier in 1..=3 {
            h.token
                .request_mint(&h.mint_request(ALICE, nullifier))
                .unwrap();
        }
        assert_eq!(h.token.balance_of(&ALICE), tokens(30));
    }

    // =========================================================================
    // NULLIFIER REPLAY
    // =========================================================================

    #[test]
    fn test_reused_proof_rejected_after_cooldown() {
        let mut h = Harness::new();
        let request = h.mint_request(ALICE, 42);
        h.token.request_mint(&request).unwrap();

        h.at(WAIT * 10);
        let err = h.token.request_mint(&request).unwrap_err();
        assert_eq!(
            err,
            IssuanceError::ProofReplayed {
                nullifier: U256::from(42u64)
            }
        );
        assert_eq!(err.kind(), ErrorKind::Replay);
        assert_eq!(h.token.balance_of(&ALICE), tokens(10));
    }

    #[test]
    fn test_nullifier_is_global_across_accounts() {
        let mut h = Harness::new();
        h.token.request_mint(&h.mint_request(ALICE, 7)).unwrap();
        let err = h
            .token
            .request_mint(&h.mint_request(MALLORY, 7))
            .unwrap_err();
        assert_eq!(err.reason_code(), "PROOF_REPLAYED");
    }

    #[test]
    fn test_disabled_enforcement_only_cooldown_limits_reuse() {
        let mut h = Harness::new();
        h.token.set_nullifier_enforcement(&OWNER, false).unwrap();
        let request = h.mint_request(ALICE, 42);
        h.token.request_mint(&request).unwrap();

        h.at(WAIT - 1);
        assert_eq!(
            h.token.request_mint(&request).unwrap_err().reason_code(),
            "COOLDOWN_NOT_ELAPSED"
        );
        h.at(WAIT);
        h.token.request_mint(&request).unwrap();
        assert_eq!(h.token.balance_of(&ALICE), tokens(20));
    }

    // =========================================================================
    // CHECK ORDER AND ATOMICITY
    // =========================================================================

    #[test]
    fn test_foreign_signer_rejected_before_proof() {
        let mut h = Harness::new();
        let forger = Secp256k1KeyPair::generate();
        let err = h
            .token
            .request_mint(&h.mint_request_signed_by(&forger, ALICE, 1))
            .unwrap_err();
        assert!(matches!(err, IssuanceError::InvalidSignature(_)));
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(h.token.verifier().calls(), 0);
    }

    #[test]
    fn test_signature_bound_to_account() {
        let mut h = Harness::new();
        let mut request = h.mint_request(ALICE, 1);
        request.account = MALLORY;
        assert!(matches!(
            h.token.request_mint(&request),
            Err(IssuanceError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_bad_proof_rejected() {
        let mut h = Harness::new();
        let mut request = h.mint_request(ALICE, 1);
        request.proof.0[0] = request.proof.0[0] ^ U256::one();
        assert_eq!(
            h.token.request_mint(&request).unwrap_err(),
            IssuanceError::InvalidProof(ProofError::VerificationFailed)
        );
    }

    #[test]
    fn test_every_rejection_leaves_state_untouched() {
        let mut h = Harness::new();
        h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();
        let forger = Secp256k1KeyPair::generate();

        let mut bad_proof = h.mint_request(ALICE, 3);
        bad_proof.proof.0[7] = U256::zero();
        let mut zero_account = h.mint_request(ALICE, 4);
        zero_account.account = shared_types::Address::ZERO;

        let rejected = [
            h.mint_request_signed_by(&forger, ALICE, 2),
            bad_proof,
            h.mint_request(ALICE, 1),
            h.mint_request(ALICE, 5),
            zero_account,
        ];

        h.at(10);
        for request in &rejected {
            let before = h.token.state().clone();
            assert!(h.token.request_mint(request).is_err());
            assert_eq!(h.token.state(), &before);
        }
        assert!(!h.token.state().registry().is_consumed(&U256::from(5u64)));
    }

    #[test]
    fn test_mint_events_are_logged_in_order() {
        let mut h = Harness::new();
        h.at(5);
        h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();

        let records = h.token.events().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, 0);
        assert!(matches!(records[0].event, TokenEvent::Transfer { .. }));
        assert!(matches!(records[1].event, TokenEvent::Minted { .. }));
        assert!(records.iter().all(|r| r.timestamp == 5));
    }
}
