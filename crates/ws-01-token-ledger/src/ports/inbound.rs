//! # Inbound Ports
//!
//! What the issuance subsystems may do with the ledger. Reward and mint
//! components only see `PrivilegedMint`; read-only callers (CLI queries,
//! tests) only see `LedgerReader`.

use crate::domain::entities::MinterRole;
use crate::domain::errors::LedgerError;
use crate::domain::ledger::TokenLedger;
use shared_types::{Address, TokenEvent, U256};

/// Read access to balances and supply.
pub trait LedgerReader {
    /// Balance of `account`.
    fn balance_of(&self, account: &Address) -> U256;

    /// Sum of all balances.
    fn total_supply(&self) -> U256;

    /// Remaining allowance of `spender` over `owner`.
    fn allowance(&self, owner: &Address, spender: &Address) -> U256;
}

/// Supply creation, restricted to granted roles.
pub trait PrivilegedMint: LedgerReader {
    /// Credits `amount` to `to` as `role`.
    fn mint(&mut self, role: MinterRole, to: Address, amount: U256) -> Result<TokenEvent, LedgerError>;

    /// Credits every `(account, amount)` pair, or nothing.
    fn mint_batch(
        &mut self,
        role: MinterRole,
        credits: &[(Address, U256)],
    ) -> Result<Vec<TokenEvent>, LedgerError>;
}

impl LedgerReader for TokenLedger {
    fn balance_of(&self, account: &Address) -> U256 {
        TokenLedger::balance_of(self, account)
    }

    fn total_supply(&self) -> U256 {
        TokenLedger::total_supply(self)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        TokenLedger::allowance(self, owner, spender)
    }
}

impl PrivilegedMint for TokenLedger {
    fn mint(&mut self, role: MinterRole, to: Address, amount: U256) -> Result<TokenEvent, LedgerError> {
        TokenLedger::mint(self, role, to, amount)
    }

    fn mint_batch(
        &mut self,
        role: MinterRole,
        credits: &[(Address, U256)],
    ) -> Result<Vec<TokenEvent>, LedgerError> {
        TokenLedger::mint_batch(self, role, credits)
    }
}
