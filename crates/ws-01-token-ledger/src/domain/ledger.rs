//! # Token Ledger
//!
//! Balances, allowances and permit nonces for one token deployment.
//!
//! Every operation validates completely (including all checked arithmetic)
//! before writing anything, so an `Err` return leaves the ledger exactly as
//! it was.

use super::entities::{MinterRole, PermitMessage, TokenMetadata};
use super::errors::LedgerError;
use serde::{Deserialize, Serialize};
use shared_crypto::{EcdsaSignature, SignatureRecovery};
use shared_types::{Address, Hash, Timestamp, TokenEvent, U256};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// The token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    metadata: TokenMetadata,
    total_supply: U256,
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<Address, BTreeMap<Address, U256>>,
    nonces: BTreeMap<Address, U256>,
    minters: BTreeSet<MinterRole>,
}

impl TokenLedger {
    /// Creates an empty ledger. No role may mint until granted.
    pub fn new(metadata: TokenMetadata) -> Self {
        Self {
            metadata,
            total_supply: U256::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            nonces: BTreeMap::new(),
            minters: BTreeSet::new(),
        }
    }

    /// Creates a ledger whose entire initial supply belongs to `holder`.
    ///
    /// This is deployment bookkeeping, not a mint path: no role is needed.
    pub fn with_initial_supply(
        metadata: TokenMetadata,
        holder: Address,
        initial_supply: U256,
    ) -> Result<(Self, Option<TokenEvent>), LedgerError> {
        let mut ledger = Self::new(metadata);
        if initial_supply.is_zero() {
            return Ok((ledger, None));
        }
        require_nonzero(&holder, "initial holder")?;
        ledger.total_supply = initial_supply;
        ledger.set_balance(holder, initial_supply);
        let event = TokenEvent::Transfer {
            from: Address::ZERO,
            to: holder,
            value: initial_supply,
        };
        Ok((ledger, Some(event)))
    }

    /// Grants `role` the right to mint.
    pub fn grant_minter(&mut self, role: MinterRole) {
        self.minters.insert(role);
    }

    /// Whether `role` may mint.
    pub fn is_minter(&self, role: MinterRole) -> bool {
        self.minters.contains(&role)
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Token metadata and signing domain.
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Token symbol.
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Fixed-point decimals.
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance of `account`; zero if never credited.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Remaining amount `spender` may move on behalf of `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or_default()
    }

    /// Next permit nonce expected from `owner`.
    pub fn nonces(&self, owner: &Address) -> U256 {
        self.nonces.get(owner).copied().unwrap_or_default()
    }

    /// EIP-712 domain separator for permits.
    pub fn domain_separator(&self) -> Hash {
        self.metadata.domain.separator()
    }

    /// Digest the owner must sign for `message`.
    pub fn permit_digest(&self, message: &PermitMessage) -> Hash {
        message.digest(&self.metadata.domain)
    }

    // =========================================================================
    // TRANSFERS
    // =========================================================================

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TokenEvent, LedgerError> {
        require_nonzero(&from, "sender")?;
        require_nonzero(&to, "recipient")?;

        let (from_balance, to_balance) = self.compute_move(&from, &to, amount)?;
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);

        debug!(%from, %to, %amount, "Transfer");
        Ok(TokenEvent::Transfer {
            from,
            to,
            value: amount,
        })
    }

    /// Sets the allowance of `spender` over `owner`'s balance.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<TokenEvent, LedgerError> {
        require_nonzero(&owner, "owner")?;
        require_nonzero(&spender, "spender")?;

        self.set_allowance(owner, spender, value);

        debug!(%owner, %spender, %value, "Approval");
        Ok(TokenEvent::Approval {
            owner,
            spender,
            value,
        })
    }

    /// Moves `amount` from `from` to `to` using `spender`'s allowance.
    ///
    /// An allowance of `U256::MAX` is infinite and is not decremented.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TokenEvent, LedgerError> {
        require_nonzero(&from, "sender")?;
        require_nonzero(&to, "recipient")?;

        let current = self.allowance(&from, &spender);
        let remaining = if current == U256::MAX {
            None
        } else {
            Some(current.checked_sub(amount).ok_or(
                LedgerError::InsufficientAllowance {
                    required: amount,
                    available: current,
                },
            )?)
        };
        let (from_balance, to_balance) = self.compute_move(&from, &to, amount)?;

        if let Some(remaining) = remaining {
            self.set_allowance(from, spender, remaining);
        }
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);

        debug!(%spender, %from, %to, %amount, "TransferFrom");
        Ok(TokenEvent::Transfer {
            from,
            to,
            value: amount,
        })
    }

    // =========================================================================
    // PRIVILEGED MINT
    // =========================================================================

    /// Creates `amount` new tokens for `to`. Only granted roles may mint.
    pub fn mint(
        &mut self,
        role: MinterRole,
        to: Address,
        amount: U256,
    ) -> Result<TokenEvent, LedgerError> {
        self.mint_batch(role, &[(to, amount)])?;
        Ok(TokenEvent::Transfer {
            from: Address::ZERO,
            to,
            value: amount,
        })
    }

    /// Credits several accounts in one all-or-nothing step.
    pub fn mint_batch(
        &mut self,
        role: MinterRole,
        credits: &[(Address, U256)],
    ) -> Result<Vec<TokenEvent>, LedgerError> {
        self.ensure_minter(role)?;

        let mut supply = self.total_supply;
        let mut staged: BTreeMap<Address, U256> = BTreeMap::new();
        for (to, amount) in credits {
            require_nonzero(to, "recipient")?;
            supply = supply
                .checked_add(*amount)
                .ok_or(LedgerError::SupplyOverflow)?;
            let balance = staged
                .get(to)
                .copied()
                .unwrap_or_else(|| self.balance_of(to));
            // Bounded by supply, so this cannot fail once the supply check passed.
            let balance = balance
                .checked_add(*amount)
                .ok_or(LedgerError::SupplyOverflow)?;
            staged.insert(*to, balance);
        }

        self.total_supply = supply;
        for (account, balance) in staged {
            self.set_balance(account, balance);
        }

        let events = credits
            .iter()
            .map(|(to, amount)| {
                debug!(%role, %to, %amount, "Mint");
                TokenEvent::Transfer {
                    from: Address::ZERO,
                    to: *to,
                    value: *amount,
                }
            })
            .collect();
        Ok(events)
    }

    // =========================================================================
    // PERMIT
    // =========================================================================

    /// Redeems an offline-signed approval.
    ///
    /// Checks, in order: deadline (`now > deadline` is expired), nonce, then
    /// that the recovered signer is `message.owner`. On success the allowance
    /// is set and the owner's nonce increments.
    pub fn permit(
        &mut self,
        recovery: &dyn SignatureRecovery,
        message: &PermitMessage,
        signature: &EcdsaSignature,
        now: Timestamp,
    ) -> Result<TokenEvent, LedgerError> {
        require_nonzero(&message.owner, "owner")?;
        require_nonzero(&message.spender, "spender")?;

        if U256::from(now) > message.deadline {
            warn!(owner = %message.owner, deadline = %message.deadline, now, "Permit expired");
            return Err(LedgerError::ExpiredApproval {
                deadline: message.deadline,
                now,
            });
        }

        let expected = self.nonces(&message.owner);
        if message.nonce != expected {
            warn!(owner = %message.owner, %expected, actual = %message.nonce, "Stale permit nonce");
            return Err(LedgerError::StaleNonce {
                expected,
                actual: message.nonce,
            });
        }

        let signer = recovery.recover(&self.permit_digest(message), signature)?;
        if signer != message.owner {
            warn!(owner = %message.owner, %signer, "Permit signed by another account");
            return Err(LedgerError::InvalidSignature(format!(
                "recovered signer {signer} is not owner {}",
                message.owner
            )));
        }

        self.nonces
            .insert(message.owner, expected.saturating_add(U256::one()));
        self.approve(message.owner, message.spender, message.value)
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn ensure_minter(&self, role: MinterRole) -> Result<(), LedgerError> {
        if self.is_minter(role) {
            Ok(())
        } else {
            warn!(%role, "Mint by role without minter grant");
            Err(LedgerError::UnauthorizedMinter(role))
        }
    }

    /// Post-move balances of `(from, to)`, or the reason the move fails.
    fn compute_move(
        &self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(U256, U256), LedgerError> {
        let available = self.balance_of(from);
        let from_balance =
            available
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    account: *from,
                    required: amount,
                    available,
                })?;
        let to_base = if from == to {
            from_balance
        } else {
            self.balance_of(to)
        };
        let to_balance = to_base
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        if from == to {
            Ok((to_balance, to_balance))
        } else {
            Ok((from_balance, to_balance))
        }
    }

    fn set_balance(&mut self, account: Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, value: U256) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, value);
    }
}

fn require_nonzero(address: &Address, role: &'static str) -> Result<(), LedgerError> {
    if address.is_zero() {
        Err(LedgerError::ZeroAddress { role })
    } else {
        Ok(())
    }
}
