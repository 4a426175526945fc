//! cuentas-core: canonical transaction types, normalizers and storage boundary

pub mod amounts;
pub mod dates;
pub mod error;
pub mod kind;
pub mod member;
pub mod record;
pub mod store;
pub mod text;
pub mod transaction;

pub use amounts::{RawAmount, parse_amount, parse_signed_amount};
pub use dates::{RawDate, parse_date, today_in_zone};
pub use error::{CoreError, Result};
pub use kind::Kind;
pub use member::{HouseholdMember, MemberDirectory, ResolvedOwner, resolve_owner};
pub use record::{RawRecord, StoredRecord};
pub use store::{MemoryStore, TransactionStore};
pub use transaction::{HouseholdId, Transaction, INCOME_CATEGORY, OTHER_CATEGORY};
