//! # Admin Flows
//!
//! Owner-gated configuration and how changes take effect on later requests.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, ALICE, CREATOR, MALLORY, OWNER, WAIT};
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::units::tokens;
    use shared_types::{Address, Classify, ErrorKind, TokenEvent};
    use ws_03_token_issuance::{IssuanceError, TokenIssuanceApi};

    #[test]
    fn test_attester_rotation() {
        let mut h = Harness::new();
        let old = h.attester.address();
        let new_signer = Secp256k1KeyPair::generate();

        let before = h.token.state().clone();
        let err = h
            .token
            .set_attester(&MALLORY, new_signer.address())
            .unwrap_err();
        assert_eq!(err, IssuanceError::Unauthorized { caller: MALLORY });
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(h.token.state(), &before);

        let events = h.token.set_attester(&OWNER, new_signer.address()).unwrap();
        assert_eq!(
            events,
            vec![TokenEvent::AttesterUpdated {
                old,
                new: new_signer.address()
            }]
        );

        assert!(matches!(
            h.token.request_mint(&h.mint_request(ALICE, 1)),
            Err(IssuanceError::InvalidSignature(_))
        ));
        h.token
            .request_mint(&h.mint_request_signed_by(&new_signer, ALICE, 1))
            .unwrap();
        assert_eq!(h.token.balance_of(&ALICE), tokens(10));
    }

    #[test]
    fn test_amount_change_applies_to_next_mint() {
        let mut h = Harness::with_params(|p| p.wait_between_mints = 0);
        h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();
        let events = h.token.set_amount_per_mint(&OWNER, tokens(25)).unwrap();
        assert_eq!(
            events,
            vec![TokenEvent::AmountPerMintUpdated {
                old: tokens(10),
                new: tokens(25)
            }]
        );
        h.token.request_mint(&h.mint_request(ALICE, 2)).unwrap();
        assert_eq!(h.token.balance_of(&ALICE), tokens(35));
    }

    #[test]
    fn test_shorter_wait_applies_to_existing_cooldown() {
        let mut h = Harness::new();
        h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();
        h.at(600);
        assert!(h.token.request_mint(&h.mint_request(ALICE, 2)).is_err());

        h.token.set_wait_between_mints(&OWNER, 600).unwrap();
        h.token.request_mint(&h.mint_request(ALICE, 2)).unwrap();
        assert_eq!(h.token.last_mint(&ALICE), Some(600));
    }

    #[test]
    fn test_non_owner_cannot_change_anything() {
        let mut h = Harness::new();
        let before = h.token.state().clone();

        let attempts = [
            h.token.set_amount_per_mint(&MALLORY, tokens(1_000)),
            h.token.set_wait_between_mints(&MALLORY, 0),
            h.token.set_nullifier_enforcement(&MALLORY, false),
            h.token.register_creator(&MALLORY, MALLORY),
            h.token.transfer_ownership(&MALLORY, MALLORY),
            h.token.propose_owner(&MALLORY, MALLORY),
        ];
        for result in attempts {
            assert_eq!(result.unwrap_err().reason_code(), "UNAUTHORIZED");
        }
        assert_eq!(h.token.state(), &before);
    }

    #[test]
    fn test_zero_values_rejected_by_owner_too() {
        let mut h = Harness::new();
        assert!(matches!(
            h.token.set_attester(&OWNER, Address::ZERO),
            Err(IssuanceError::ZeroAddress { .. })
        ));
        assert!(matches!(
            h.token.set_amount_per_mint(&OWNER, 0u64.into()),
            Err(IssuanceError::ZeroAmount { .. })
        ));
    }

    #[test]
    fn test_single_step_ownership_transfer() {
        let mut h = Harness::new();
        let events = h.token.transfer_ownership(&OWNER, ALICE).unwrap();
        assert_eq!(
            events,
            vec![TokenEvent::OwnershipTransferred {
                previous: OWNER,
                new: ALICE
            }]
        );
        assert!(h.token.register_creator(&OWNER, CREATOR).is_err());
        h.token.register_creator(&ALICE, CREATOR).unwrap();
    }

    #[test]
    fn test_two_step_ownership_transfer() {
        let mut h = Harness::new();
        h.token.propose_owner(&OWNER, ALICE).unwrap();
        assert_eq!(h.token.state().config().owner(), OWNER);
        assert!(h.token.accept_ownership(&MALLORY).is_err());

        h.token.accept_ownership(&ALICE).unwrap();
        assert_eq!(h.token.state().config().owner(), ALICE);
        assert_eq!(h.token.state().config().pending_owner(), None);
        h.token.set_wait_between_mints(&ALICE, WAIT * 2).unwrap();
    }

    #[test]
    fn test_config_events_carry_clock_time() {
        let mut h = Harness::new();
        h.at(1_234);
        h.token.set_wait_between_mints(&OWNER, 60).unwrap();
        let record = h.token.events().records().last().unwrap();
        assert_eq!(record.timestamp, 1_234);
        assert_eq!(
            record.event,
            TokenEvent::WaitBetweenMintsUpdated {
                old: WAIT,
                new: 60
            }
        );
    }
}
