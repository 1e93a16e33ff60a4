//! # Reward Flows
//!
//! Creator/viewer distribution through the facade, including the caller and
//! remainder policies and the share property over arbitrary amounts.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, ALICE, CREATOR, MALLORY, OWNER, VIEWER};
    use proptest::prelude::*;
    use shared_types::units::tokens;
    use shared_types::{Address, RemainderPolicy, RewardCallerPolicy, TokenEvent, U256};
    use ws_03_token_issuance::{creator_share, viewer_share, IssuanceError, TokenIssuanceApi};

    const TREASURY: Address = Address([0x7E; 20]);

    #[test]
    fn test_creator_and_viewer_scenario() {
        let mut h = Harness::new();
        h.token.register_creator(&OWNER, CREATOR).unwrap();
        h.token
            .reward_creator(&OWNER, CREATOR, U256::from(100u64))
            .unwrap();
        h.token
            .reward_viewer(&OWNER, VIEWER, U256::from(100u64))
            .unwrap();

        assert_eq!(h.token.creator_rewards(&CREATOR), U256::from(70u64));
        assert_eq!(h.token.balance_of(&CREATOR), U256::from(70u64));
        assert_eq!(h.token.viewer_rewards(&VIEWER), U256::from(30u64));
        assert_eq!(h.token.balance_of(&VIEWER), U256::from(30u64));
        assert_eq!(h.token.ledger().total_supply(), U256::from(100u64));
    }

    #[test]
    fn test_creator_reward_requires_registration() {
        let mut h = Harness::new();
        let err = h
            .token
            .reward_creator(&OWNER, VIEWER, tokens(100))
            .unwrap_err();
        assert_eq!(err, IssuanceError::NotRegisteredCreator { account: VIEWER });
        assert_eq!(h.token.balance_of(&VIEWER), U256::zero());
        assert!(h.token.events().is_empty());
    }

    #[test]
    fn test_rewards_accumulate_alongside_mints() {
        let mut h = Harness::new();
        h.token.register_creator(&OWNER, ALICE).unwrap();
        h.token.request_mint(&h.mint_request(ALICE, 1)).unwrap();
        h.token.reward_creator(&OWNER, ALICE, tokens(10)).unwrap();
        h.token.reward_viewer(&OWNER, ALICE, tokens(10)).unwrap();

        assert_eq!(h.token.balance_of(&ALICE), tokens(20));
        assert_eq!(h.token.creator_rewards(&ALICE), tokens(7));
        assert_eq!(h.token.viewer_rewards(&ALICE), tokens(3));
    }

    #[test]
    fn test_tiny_amount_emits_zero_share_without_transfer() {
        let mut h = Harness::new();
        let events = h.token.reward_viewer(&OWNER, VIEWER, U256::one()).unwrap();
        assert_eq!(
            events,
            vec![TokenEvent::ViewerRewarded {
                account: VIEWER,
                share: U256::zero()
            }]
        );
        assert_eq!(h.token.ledger().total_supply(), U256::zero());
    }

    // =========================================================================
    // POLICIES
    // =========================================================================

    #[test]
    fn test_owner_only_by_default() {
        let mut h = Harness::new();
        let err = h
            .token
            .reward_viewer(&MALLORY, VIEWER, tokens(1))
            .unwrap_err();
        assert_eq!(err, IssuanceError::Unauthorized { caller: MALLORY });
    }

    #[test]
    fn test_allowlisted_distributor() {
        let mut h = Harness::new();
        h.token
            .set_reward_caller_policy(&OWNER, RewardCallerPolicy::Allowlist(vec![ALICE]))
            .unwrap();

        h.token.reward_viewer(&ALICE, VIEWER, tokens(10)).unwrap();
        assert_eq!(h.token.balance_of(&VIEWER), tokens(3));
        h.token.reward_viewer(&OWNER, VIEWER, tokens(10)).unwrap();
        assert!(h.token.reward_viewer(&MALLORY, VIEWER, tokens(10)).is_err());
    }

    #[test]
    fn test_unrestricted_callers() {
        let mut h = Harness::with_params(|p| p.reward_callers = RewardCallerPolicy::Unrestricted);
        h.token.reward_viewer(&MALLORY, VIEWER, tokens(10)).unwrap();
        assert_eq!(h.token.viewer_rewards(&VIEWER), tokens(3));
    }

    #[test]
    fn test_treasury_remainder_keeps_supply_equal_to_amount() {
        let mut h = Harness::with_params(|p| p.remainder = RemainderPolicy::Treasury(TREASURY));
        h.token.register_creator(&OWNER, CREATOR).unwrap();
        h.token
            .reward_creator(&OWNER, CREATOR, U256::from(1_001u64))
            .unwrap();

        assert_eq!(h.token.balance_of(&CREATOR), U256::from(700u64));
        assert_eq!(h.token.balance_of(&TREASURY), U256::from(301u64));
        assert_eq!(h.token.ledger().total_supply(), U256::from(1_001u64));
        assert_eq!(h.token.creator_rewards(&TREASURY), U256::zero());
    }

    #[test]
    fn test_switching_remainder_policy_is_owner_gated() {
        let mut h = Harness::new();
        let before = h.token.state().clone();
        assert!(h
            .token
            .set_remainder_policy(&MALLORY, RemainderPolicy::Treasury(MALLORY))
            .is_err());
        assert_eq!(h.token.state(), &before);
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    fn any_u256() -> impl Strategy<Value = U256> {
        prop::array::uniform4(any::<u64>()).prop_map(U256)
    }

    proptest! {
        /// Both shares of one amount never add up to more than the amount.
        #[test]
        fn prop_shares_never_exceed_amount(amount in any_u256()) {
            let creator = creator_share(amount);
            let viewer = viewer_share(amount);
            prop_assert!(creator <= amount);
            prop_assert!(viewer <= amount - creator);
        }

        /// Shares are exactly floor(amount * pct / 100).
        #[test]
        fn prop_shares_match_floor_division(amount in any::<u64>()) {
            let wide = u128::from(amount);
            prop_assert_eq!(creator_share(U256::from(amount)), U256::from(wide * 70 / 100));
            prop_assert_eq!(viewer_share(U256::from(amount)), U256::from(wide * 30 / 100));
        }

        /// Distribution credits exactly the share, whatever the amount.
        #[test]
        fn prop_viewer_reward_credits_share(amount in 1u64..) {
            let mut h = Harness::new();
            h.token.reward_viewer(&OWNER, VIEWER, U256::from(amount)).unwrap();
            prop_assert_eq!(h.token.balance_of(&VIEWER), viewer_share(U256::from(amount)));
            prop_assert_eq!(h.token.ledger().total_supply(), viewer_share(U256::from(amount)));
        }
    }
}
