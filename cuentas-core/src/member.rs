//! Household members (external registry) and owner resolution.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::text::fold;
use crate::transaction::HouseholdId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub initials: String,
    /// Presentation colour token, opaque to the core
    #[serde(default)]
    pub color: String,
}

impl HouseholdMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            initials: initials_of(&name),
            name,
            color: String::new(),
        }
    }

    /// True if `owner` references this member by id, or by display name for
    /// legacy records.
    pub fn matches_owner(&self, owner: &str) -> bool {
        let owner = owner.trim();
        !owner.is_empty() && (owner == self.id || fold(owner) == fold(&self.name))
    }
}

/// The member registry as the core sees it.
pub trait MemberDirectory {
    fn list(&self, household: &HouseholdId) -> Result<Vec<HouseholdMember>>;
}

/// Owner of a transaction after looking it up in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOwner {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub known: bool,
}

/// Resolve a raw owner reference. Unmatched owners get a placeholder derived
/// from the raw string so they are still attributed, never dropped.
pub fn resolve_owner(owner: &str, members: &[HouseholdMember]) -> ResolvedOwner {
    if let Some(m) = members
        .iter()
        .find(|m| m.id == owner.trim())
        .or_else(|| members.iter().find(|m| m.matches_owner(owner)))
    {
        return ResolvedOwner {
            id: m.id.clone(),
            name: m.name.clone(),
            initials: m.initials.clone(),
            known: true,
        };
    }

    let name = owner.trim();
    let name = if name.is_empty() { "Sin asignar" } else { name };
    ResolvedOwner {
        id: format!("unknown:{}", fold(name)),
        name: name.to_string(),
        initials: initials_of(name),
        known: false,
    }
}

fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
