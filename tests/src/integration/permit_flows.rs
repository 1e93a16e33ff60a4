//! # Permit Flows
//!
//! Offline-signed approvals redeemed through the facade, then spent.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, ALICE, MALLORY};
    use shared_crypto::{EcdsaSignature, Secp256k1KeyPair};
    use shared_types::units::tokens;
    use shared_types::{Classify, ErrorKind, TokenEvent, U256};
    use ws_01_token_ledger::PermitMessage;
    use ws_03_token_issuance::TokenIssuanceApi;

    fn signed(
        h: &Harness,
        holder: &Secp256k1KeyPair,
        value: U256,
        nonce: u64,
        deadline: u64,
    ) -> (PermitMessage, EcdsaSignature) {
        let message = PermitMessage {
            owner: holder.address(),
            spender: ALICE,
            value,
            nonce: U256::from(nonce),
            deadline: U256::from(deadline),
        };
        let signature = holder
            .sign_prehash(&h.token.ledger().permit_digest(&message))
            .unwrap();
        (message, signature)
    }

    /// Gives `holder` some tokens through a mint.
    fn fund(h: &mut Harness, holder: &Secp256k1KeyPair) {
        let request = h.mint_request(holder.address(), 99);
        h.token.request_mint(&request).unwrap();
    }

    #[test]
    fn test_permit_then_spend() {
        let mut h = Harness::new();
        let holder = Secp256k1KeyPair::generate();
        fund(&mut h, &holder);

        let (message, signature) = signed(&h, &holder, tokens(4), 0, 100);
        let events = h.token.permit(&message, &signature).unwrap();
        assert_eq!(
            events,
            vec![TokenEvent::Approval {
                owner: holder.address(),
                spender: ALICE,
                value: tokens(4)
            }]
        );

        h.token
            .transfer_from(ALICE, holder.address(), MALLORY, tokens(3))
            .unwrap();
        assert_eq!(h.token.balance_of(&MALLORY), tokens(3));
        assert_eq!(h.token.balance_of(&holder.address()), tokens(7));
        assert_eq!(
            h.token.ledger().allowance(&holder.address(), &ALICE),
            tokens(1)
        );

        let err = h
            .token
            .transfer_from(ALICE, holder.address(), MALLORY, tokens(2))
            .unwrap_err();
        assert_eq!(err.reason_code(), "INSUFFICIENT_ALLOWANCE");
    }

    #[test]
    fn test_permit_replay_is_stale() {
        let mut h = Harness::new();
        let holder = Secp256k1KeyPair::generate();
        let (message, signature) = signed(&h, &holder, tokens(1), 0, 100);

        h.token.permit(&message, &signature).unwrap();
        assert_eq!(h.token.ledger().nonces(&holder.address()), U256::one());

        let err = h.token.permit(&message, &signature).unwrap_err();
        assert_eq!(err.reason_code(), "STALE_NONCE");
        assert_eq!(err.kind(), ErrorKind::Replay);
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let mut h = Harness::new();
        let holder = Secp256k1KeyPair::generate();

        h.at(100);
        let (message, signature) = signed(&h, &holder, tokens(1), 0, 100);
        h.token.permit(&message, &signature).unwrap();

        h.at(101);
        let (message, signature) = signed(&h, &holder, tokens(1), 1, 100);
        let err = h.token.permit(&message, &signature).unwrap_err();
        assert_eq!(err.reason_code(), "EXPIRED_APPROVAL");
        assert_eq!(err.kind(), ErrorKind::Replay);
    }

    #[test]
    fn test_signature_from_other_key_rejected() {
        let mut h = Harness::new();
        let holder = Secp256k1KeyPair::generate();
        let thief = Secp256k1KeyPair::generate();
        let (message, _) = signed(&h, &holder, tokens(1), 0, 100);
        let forged = thief
            .sign_prehash(&h.token.ledger().permit_digest(&message))
            .unwrap();

        let before = h.token.state().clone();
        let err = h.token.permit(&message, &forged).unwrap_err();
        assert_eq!(err.reason_code(), "INVALID_SIGNATURE");
        assert_eq!(h.token.state(), &before);
    }

    #[test]
    fn test_plain_transfer_and_approve() {
        let mut h = Harness::new();
        h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();
        h.token.transfer(ALICE, MALLORY, tokens(4)).unwrap();
        h.token.approve(MALLORY, ALICE, U256::MAX).unwrap();
        h.token
            .transfer_from(ALICE, MALLORY, ALICE, tokens(4))
            .unwrap();

        assert_eq!(h.token.balance_of(&ALICE), tokens(10));
        assert_eq!(h.token.ledger().allowance(&MALLORY, &ALICE), U256::MAX);
        assert_eq!(h.token.ledger().total_supply(), tokens(10));
    }
}
