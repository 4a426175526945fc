//! Explicit application state. The caller owns it; every operation takes it
//! by reference and nothing is cached between calls.

use cuentas_core::{
    CoreError, HouseholdId, HouseholdMember, MemberDirectory, Result, Transaction, TransactionStore,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::period::Selection;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub household: HouseholdId,
    pub transactions: Vec<Transaction>,
    pub members: Vec<HouseholdMember>,
    pub selection: Selection,
    /// Count credit-card payments as expenses
    pub include_card_payments: bool,
}

/// What a remote change feed reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotice {
    pub household: HouseholdId,
    pub kind: ChangeKind,
    #[serde(default)]
    pub id: Option<String>,
}

impl AppState {
    pub fn new(household: HouseholdId) -> Self {
        Self {
            household,
            ..Self::default()
        }
    }

    pub fn with_members(mut self, members: Vec<HouseholdMember>) -> Self {
        self.members = members;
        self
    }

    pub fn load_members(&mut self, directory: &dyn MemberDirectory) -> Result<()> {
        self.members = directory.list(&self.household)?;
        Ok(())
    }

    /// Replace the in-memory transactions with what the store holds.
    /// On failure the current transactions are kept.
    pub fn refresh(&mut self, store: &dyn TransactionStore) -> Result<usize> {
        let fetched = store.fetch(&self.household)?;
        let foreign = fetched.iter().filter(|t| !t.belongs_to(&self.household)).count();
        if foreign > 0 {
            warn!(household = %self.household, foreign, "store returned rows of another household");
        }
        self.transactions = fetched
            .into_iter()
            .filter(|t| t.belongs_to(&self.household))
            .collect();
        debug!(household = %self.household, rows = self.transactions.len(), "state refreshed");
        Ok(self.transactions.len())
    }

    /// User correction of one transaction's category. Memory changes only
    /// after the store accepted the write.
    pub fn update_category(&mut self, store: &dyn TransactionStore, id: &str, category: &str) -> Result<()> {
        let id = id.trim();
        let category = category.trim();
        if id.is_empty() {
            return Err(CoreError::InvalidRecord("empty transaction id".to_string()));
        }
        if category.is_empty() {
            return Err(CoreError::InvalidRecord("empty category".to_string()));
        }
        let index = self
            .transactions
            .iter()
            .position(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| CoreError::UnknownTransaction(id.to_string()))?;

        store.update_category(&self.household, id, category)?;
        self.transactions[index].category = category.to_string();
        info!(household = %self.household, id, category, "category corrected");
        Ok(())
    }

    /// React to a remote change: notices for other households are ignored,
    /// anything else triggers a full re-fetch. Returns whether state changed.
    pub fn on_remote_change(&mut self, notice: &ChangeNotice, store: &dyn TransactionStore) -> Result<bool> {
        if notice.household != self.household {
            warn!(
                household = %self.household,
                notice_household = %notice.household,
                "ignoring change notice for another household"
            );
            return Ok(false);
        }
        debug!(kind = ?notice.kind, id = ?notice.id, "remote change");
        self.refresh(store)?;
        Ok(true)
    }
}
