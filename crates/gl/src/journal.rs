use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockbook_core::TenantId;

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

/// Account identifier + metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub code: String, // e.g. "1300"
    pub name: String, // e.g. "Inventory"
    pub kind: AccountKind,
}

impl Account {
    pub fn new(code: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
        }
    }
}

/// One side of a journal entry (immutable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub line_number: u32,
    pub account: Account,
    /// Positive amount; exactly one of debit/credit per line.
    pub amount: Decimal,
    /// true = debit, false = credit.
    pub is_debit: bool,
    pub description: Option<String>,
}

impl JournalLine {
    pub fn debit(account: Account, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            line_number: 0,
            account,
            amount,
            is_debit: true,
            description: Some(description.into()),
        }
    }

    pub fn credit(account: Account, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            line_number: 0,
            account,
            amount,
            is_debit: false,
            description: Some(description.into()),
        }
    }
}

/// Journal entry construction error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("journal entry must have lines")]
    EmptyEntry,

    #[error("line amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("debits must equal credits (debits {debits}, credits {credits})")]
    Unbalanced { debits: Decimal, credits: Decimal },
}

/// A posted, balanced double-entry journal entry.
///
/// Construction is the validation boundary: an unbalanced or empty entry is
/// structurally unrepresentable past [`JournalEntry::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub journal_number: String,
    pub tenant_id: TenantId,
    pub posting_date: DateTime<Utc>,
    pub reference: String,
    pub narration: Option<String>,
    pub lines: Vec<JournalLine>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

impl JournalEntry {
    pub fn new(
        journal_number: impl Into<String>,
        tenant_id: TenantId,
        posting_date: DateTime<Utc>,
        reference: impl Into<String>,
        narration: Option<String>,
        lines: Vec<JournalLine>,
    ) -> Result<Self, JournalError> {
        if lines.is_empty() {
            return Err(JournalError::EmptyEntry);
        }

        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for line in &lines {
            if line.amount <= Decimal::ZERO {
                return Err(JournalError::InvalidAmount(line.amount));
            }
            if line.is_debit {
                total_debit += line.amount;
            } else {
                total_credit += line.amount;
            }
        }

        if total_debit != total_credit {
            return Err(JournalError::Unbalanced {
                debits: total_debit,
                credits: total_credit,
            });
        }

        // Renumber lines 1..=n in the order given.
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, mut line)| {
                line.line_number = i as u32 + 1;
                line
            })
            .collect();

        Ok(Self {
            journal_number: journal_number.into(),
            tenant_id,
            posting_date,
            reference: reference.into(),
            narration,
            lines,
            total_debit,
            total_credit,
        })
    }
}
