// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub r#type: String,
    pub currency: String,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub r#type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "EXPENSE" => Ok(Self::Expense),
            "INCOME" => Ok(Self::Income),
            "TRANSFER" => Ok(Self::Transfer),
            other => Err(LedgerError::InvalidTransactionType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "EXPENSE",
            Self::Income => "INCOME",
            Self::Transfer => "TRANSFER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Cleared,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Cleared => "CLEARED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub r#type: String,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub status: String,
    pub linked_transaction_id: Option<i64>,
    pub description: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            other => Err(LedgerError::InvalidFrequency(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecurringRule {
    pub id: i64,
    pub owner_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub r#type: String,
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub interval: i64,
    pub day_of_month: Option<u32>,
    pub day_of_week: Option<Weekday>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_run_date: NaiveDate,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    Monthly,
    Weekly,
    Yearly,
    Custom,
}

impl PeriodType {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "MONTHLY" => Ok(Self::Monthly),
            "WEEKLY" => Ok(Self::Weekly),
            "YEARLY" => Ok(Self::Yearly),
            "CUSTOM" => Ok(Self::Custom),
            other => Err(LedgerError::InvalidPeriodType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Weekly => "WEEKLY",
            Self::Yearly => "YEARLY",
            Self::Custom => "CUSTOM",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub period_type: PeriodType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_limit: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BudgetItem {
    pub id: i64,
    pub budget_id: i64,
    pub category_id: i64,
    pub limit_amount: Decimal,
    pub warning_percent: i64,
}

/// Derived from the budget's date range against "today"; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Upcoming,
    Active,
    Expired,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "ON_TRACK",
            Self::Warning => "WARNING",
            Self::OverBudget => "OVER_BUDGET",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetItemProgress {
    pub budget_item_id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub budgeted: Decimal,
    pub actual: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub status: ItemStatus,
    pub warning_percent: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgress {
    pub budget_id: i64,
    pub budget_name: String,
    pub budget_start_date: NaiveDate,
    pub budget_end_date: NaiveDate,
    pub budget_status: BudgetStatus,
    pub total_budgeted: Decimal,
    pub total_actual: Decimal,
    pub total_remaining: Decimal,
    pub overall_percentage: Decimal,
    pub overall_status: ItemStatus,
    pub items: Vec<BudgetItemProgress>,
    pub report_start_date: NaiveDate,
    pub report_end_date: NaiveDate,
}

/// Both legs of a completed transfer with balances on either side.
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub out_transaction_id: i64,
    pub in_transaction_id: i64,
    pub source_account_id: i64,
    pub source_account_name: String,
    pub source_balance_before: Decimal,
    pub source_balance_after: Decimal,
    pub destination_account_id: i64,
    pub destination_account_name: String,
    pub destination_balance_before: Decimal,
    pub destination_balance_after: Decimal,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
}
