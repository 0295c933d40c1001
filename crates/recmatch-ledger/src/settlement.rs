//! In-memory settlement-asset ledger.
//!
//! Plain balances with no recovery semantics. Owners grant the exchange an
//! allowance with [`SettlementLedger::approve`]; `transfer_from` spends it.

use std::collections::HashMap;

use recmatch_types::{AccountId, Journaled, RecmatchError, Result, SettlementAsset};
use rust_decimal::Decimal;

use crate::supply_conservation::SupplyConservation;

const ASSET: &str = "settlement";

/// Reference implementation of [`SettlementAsset`].
pub struct SettlementLedger {
    balances: HashMap<AccountId, Decimal>,
    /// Amount each owner lets the exchange move on their behalf.
    allowances: HashMap<AccountId, Decimal>,
    supply: SupplyConservation,
}

/// Prior balance and allowance entries of the accounts a mutation is about
/// to touch. `None` means the account had no entry.
#[derive(Debug, Clone)]
pub struct SettlementCheckpoint {
    entries: Vec<(AccountId, Option<Decimal>, Option<Decimal>)>,
}

fn restore(map: &mut HashMap<AccountId, Decimal>, account: AccountId, prior: Option<Decimal>) {
    match prior {
        Some(value) => map.insert(account, value),
        None => map.remove(&account),
    };
}

impl SettlementLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            allowances: HashMap::new(),
            supply: SupplyConservation::new(),
        }
    }

    /// Issue `amount` to `account`.
    pub fn mint(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
        self.supply.record_mint(amount);
    }

    /// Destroy `amount` from `account` (withdrawal off the ledger).
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the account holds less than `amount`.
    pub fn burn(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(RecmatchError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances.insert(account, available - amount);
        self.supply.record_burn(amount);
        Ok(())
    }

    /// Set the exchange's allowance over `owner`'s balance.
    pub fn approve(&mut self, owner: AccountId, amount: Decimal) {
        self.allowances.insert(owner, amount);
    }

    #[must_use]
    pub fn allowance(&self, owner: AccountId) -> Decimal {
        self.allowances.get(&owner).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    /// Verify Σ balances == Σ mints - Σ burns.
    pub fn verify_supply(&self) -> Result<()> {
        self.supply.verify(ASSET, self.total_supply())
    }
}

impl Default for SettlementLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Journaled for SettlementLedger {
    type Checkpoint = SettlementCheckpoint;

    fn checkpoint(&self, accounts: &[AccountId]) -> Self::Checkpoint {
        SettlementCheckpoint {
            entries: accounts
                .iter()
                .map(|a| {
                    (
                        *a,
                        self.balances.get(a).copied(),
                        self.allowances.get(a).copied(),
                    )
                })
                .collect(),
        }
    }

    fn rollback(&mut self, checkpoint: Self::Checkpoint) {
        for (account, balance, allowance) in checkpoint.entries.into_iter().rev() {
            restore(&mut self.balances, account, balance);
            restore(&mut self.allowances, account, allowance);
        }
    }
}

impl SettlementAsset for SettlementLedger {
    fn transfer_from(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(RecmatchError::InvalidAmount {
                reason: format!("transfer amount {amount} must be positive"),
            });
        }

        let approved = self.allowance(from);
        if approved < amount {
            return Err(RecmatchError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(RecmatchError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        self.allowances.insert(from, approved - amount);
        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_insert(Decimal::ZERO) += amount;

        tracing::debug!(%from, %to, %amount, "Settlement transfer");
        Ok(())
    }
}
