// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Typed failure taxonomy for the ledger core. Callers match on variants;
/// nothing in here is retried automatically.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Budget not found: {0}")]
    BudgetNotFound(i64),
    #[error("Budget item not found: {0}")]
    BudgetItemNotFound(i64),
    #[error("Recurring rule not found: {0}")]
    RecurringRuleNotFound(i64),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    #[error("Amount must be greater than zero")]
    InvalidAmount,
    #[error("Invalid transaction type '{0}'")]
    InvalidTransactionType(String),
    #[error("Category type '{category}' does not match transaction type '{requested}'")]
    CategoryTypeMismatch { requested: String, category: String },
    #[error("End date must not fall before start date")]
    InvalidDateRange,
    #[error("Invalid period type '{0}'")]
    InvalidPeriodType(String),
    #[error("Invalid frequency '{0}'")]
    InvalidFrequency(String),
    #[error("Interval must be at least 1")]
    InvalidInterval,
    #[error("Day of month must be between 1 and 31")]
    InvalidDayOfMonth,
    #[error("Invalid day of week")]
    InvalidDayOfWeek,
    #[error("Invalid amount range: {0}")]
    InvalidAmountRange(String),

    #[error("Insufficient balance: have {balance}, need {required} (--allow-negative overrides)")]
    InsufficientBalance { balance: Decimal, required: Decimal },
    #[error("Account still holds a balance of {0} (--force archives anyway)")]
    AccountHasBalance(Decimal),
    #[error("Account has recorded transactions; currency cannot be changed")]
    AccountHasTransactions,
    #[error("Account '{0}' is archived")]
    ArchivedAccount(String),
    #[error("Currency mismatch: {0} vs {1}")]
    CurrencyMismatch(String, String),
    #[error("Source and destination accounts must differ")]
    SameAccountTransfer,

    #[error("Persistence error: {0}")]
    Storage(String),
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
