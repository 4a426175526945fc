//! Transaction kind: the cash-flow nature of a record, derived from the
//! source's free-text type field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::text::fold;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    Deposit,
    Purchase,
    Withdrawal,
    TransferIn,
    TransferOut,
    CreditCardPayment,
    Interest,
    Income,
    Expense,
}

/// Income-side synonyms, checked in order after the abono/interes rules.
const INCOME_SYNONYMS: &[(&str, Kind)] = &[
    ("transferencia recibida", Kind::TransferIn),
    ("transf recibida", Kind::TransferIn),
    ("transfer in", Kind::TransferIn),
    ("recibid", Kind::TransferIn),
    ("deposito", Kind::Deposit),
    ("consignacion", Kind::Deposit),
    ("deposit", Kind::Deposit),
    ("ingreso", Kind::Income),
    ("income", Kind::Income),
    ("nomina", Kind::Income),
    ("salario", Kind::Income),
    ("sueldo", Kind::Income),
    ("salary", Kind::Income),
    ("payroll", Kind::Income),
];

/// Expense-side synonyms.
const EXPENSE_SYNONYMS: &[(&str, Kind)] = &[
    ("transferencia enviada", Kind::TransferOut),
    ("transf enviada", Kind::TransferOut),
    ("transf a ", Kind::TransferOut),
    ("transfer out", Kind::TransferOut),
    ("compra", Kind::Purchase),
    ("purchase", Kind::Purchase),
    ("retiro", Kind::Withdrawal),
    ("withdrawal", Kind::Withdrawal),
    ("debito", Kind::Expense),
    ("debit", Kind::Expense),
    ("gasto", Kind::Expense),
    ("expense", Kind::Expense),
    ("pago", Kind::Expense),
    ("payment", Kind::Expense),
    ("cargo", Kind::Expense),
    ("charge", Kind::Expense),
];

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Deposit,
        Kind::Purchase,
        Kind::Withdrawal,
        Kind::TransferIn,
        Kind::TransferOut,
        Kind::CreditCardPayment,
        Kind::Interest,
        Kind::Income,
        Kind::Expense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Deposit => "deposit",
            Kind::Purchase => "purchase",
            Kind::Withdrawal => "withdrawal",
            Kind::TransferIn => "transfer-in",
            Kind::TransferOut => "transfer-out",
            Kind::CreditCardPayment => "credit-card-payment",
            Kind::Interest => "interest",
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    /// Derive a kind from a free-text type such as "Compra", "Pago/Abono" or
    /// "Abono Interés Ahorros".
    ///
    /// `signed_amount` is only consulted when the text is not recognised; pass
    /// `None` once the record's sign has been stripped.
    pub fn from_hint(type_hint: &str, signed_amount: Option<f64>) -> Kind {
        let t = fold(type_hint);

        if let Ok(kind) = t.parse::<Kind>() {
            return kind;
        }

        let is_interest = t.contains("interes");
        if t.contains("abono") && !is_interest {
            return Kind::CreditCardPayment;
        }
        if is_interest {
            return Kind::Interest;
        }

        // Trailing space lets "transf a " match at the end of the text too.
        let padded = format!("{t} ");
        for (needle, kind) in INCOME_SYNONYMS.iter().chain(EXPENSE_SYNONYMS) {
            if padded.contains(needle) {
                return *kind;
            }
        }

        match signed_amount {
            Some(v) if v > 0.0 => Kind::Income,
            _ => Kind::Expense,
        }
    }

    /// Interest counts as income; card payments never do.
    pub fn counts_as_income(&self) -> bool {
        matches!(
            self,
            Kind::Deposit | Kind::TransferIn | Kind::Interest | Kind::Income
        )
    }

    /// Card payments count as expense only when the caller opts in.
    pub fn counts_as_expense(&self, include_card_payments: bool) -> bool {
        match self {
            Kind::Purchase | Kind::Withdrawal | Kind::TransferOut | Kind::Expense => true,
            Kind::CreditCardPayment => include_card_payments,
            _ => false,
        }
    }

    pub fn is_card_payment(&self) -> bool {
        matches!(self, Kind::CreditCardPayment)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Kind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidRecord(format!("unknown kind: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abono_with_interest_is_interest() {
        assert_eq!(Kind::from_hint("Abono Interés Ahorros", None), Kind::Interest);
        assert_eq!(Kind::from_hint("ABONO INTERESES AHORROS", Some(-1.0)), Kind::Interest);
        assert!(Kind::Interest.counts_as_income());
        assert!(!Kind::Interest.is_card_payment());
    }

    #[test]
    fn test_abono_is_card_payment() {
        assert_eq!(Kind::from_hint("Abono", None), Kind::CreditCardPayment);
        assert_eq!(Kind::from_hint("Pago/Abono", Some(10.0)), Kind::CreditCardPayment);
        let k = Kind::CreditCardPayment;
        assert!(!k.counts_as_income());
        assert!(!k.counts_as_expense(false));
        assert!(k.counts_as_expense(true));
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(Kind::from_hint("Depósito", None), Kind::Deposit);
        assert_eq!(Kind::from_hint("Transferencia recibida", None), Kind::TransferIn);
        assert_eq!(Kind::from_hint("PAGO DE NOMI MIBANCO SA", None), Kind::Expense);
        assert_eq!(Kind::from_hint("Nómina", None), Kind::Income);
        assert_eq!(Kind::from_hint("Compra", None), Kind::Purchase);
        assert_eq!(Kind::from_hint("Retiro cajero", None), Kind::Withdrawal);
        assert_eq!(Kind::from_hint("TRANSF A ANGELA MARIA", None), Kind::TransferOut);
        assert_eq!(Kind::from_hint("Cargo automático", None), Kind::Expense);
    }

    #[test]
    fn test_sign_fallback() {
        assert_eq!(Kind::from_hint("Movimiento", Some(1500.0)), Kind::Income);
        assert_eq!(Kind::from_hint("Movimiento", Some(-1500.0)), Kind::Expense);
        assert_eq!(Kind::from_hint("Movimiento", Some(0.0)), Kind::Expense);
        assert_eq!(Kind::from_hint("", None), Kind::Expense);
    }

    #[test]
    fn test_canonical_tokens_round_trip() {
        for k in Kind::ALL {
            assert_eq!(Kind::from_hint(k.as_str(), Some(-1.0)), k);
            let json = serde_json::to_string(&k).unwrap();
            assert_eq!(json, format!("\"{}\"", k.as_str()));
        }
    }
}
