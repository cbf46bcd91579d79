// 💸 Finance - transactions, payment processors and accounts
//
// Processors are polymorphic over a small trait (one per payment channel),
// accounts decide for themselves whether a transaction may be applied.

use crate::error::{RecordError, RecordResult};
use crate::repository::{Entity, KeyedRepository, Stocked};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, warn};

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub category: String,
}

impl Transaction {
    pub fn new(id: i32, date: DateTime<Utc>, amount: f64, category: &str) -> Self {
        Transaction {
            id,
            date,
            amount,
            category: category.to_string(),
        }
    }
}

impl Entity for Transaction {
    type Key = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

/// Format an amount the way a receipt would: `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

// ============================================================================
// PROCESSORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentChannel {
    BankTransfer,
    MobileMoney,
    CryptoWallet,
}

/// One implementation per payment channel
pub trait TransactionProcessor {
    /// Label shown in brackets in front of every processed line
    fn name(&self) -> &'static str;

    fn process(&self, transaction: &Transaction) -> String {
        debug!(processor = self.name(), id = transaction.id, "processing transaction");
        format!(
            "[{}] Processing {} for {}",
            self.name(),
            format_currency(transaction.amount),
            transaction.category
        )
    }
}

pub struct BankTransferProcessor;

impl TransactionProcessor for BankTransferProcessor {
    fn name(&self) -> &'static str {
        "BankTransfer"
    }
}

pub struct MobileMoneyProcessor;

impl TransactionProcessor for MobileMoneyProcessor {
    fn name(&self) -> &'static str {
        "MobileMoney"
    }
}

pub struct CryptoWalletProcessor;

impl TransactionProcessor for CryptoWalletProcessor {
    fn name(&self) -> &'static str {
        "CryptoWallet"
    }
}

/// Processor for a channel
pub fn get_processor(channel: PaymentChannel) -> Box<dyn TransactionProcessor> {
    match channel {
        PaymentChannel::BankTransfer => Box::new(BankTransferProcessor),
        PaymentChannel::MobileMoney => Box::new(MobileMoneyProcessor),
        PaymentChannel::CryptoWallet => Box::new(CryptoWalletProcessor),
    }
}

// ============================================================================
// ACCOUNT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    /// Deducts unconditionally, may go negative
    Standard,

    /// Refuses any transaction larger than the balance
    Savings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_number: String,
    pub balance: f64,
    pub kind: AccountKind,
}

impl Account {
    pub fn new(account_number: &str, initial_balance: f64) -> Self {
        Account {
            account_number: account_number.to_string(),
            balance: initial_balance,
            kind: AccountKind::Standard,
        }
    }

    pub fn savings(account_number: &str, initial_balance: f64) -> Self {
        Account {
            kind: AccountKind::Savings,
            ..Account::new(account_number, initial_balance)
        }
    }

    /// Deduct the transaction amount and return the new balance
    pub fn apply_transaction(&mut self, transaction: &Transaction) -> RecordResult<f64> {
        if self.kind == AccountKind::Savings && transaction.amount > self.balance {
            warn!(
                account = %self.account_number,
                id = transaction.id,
                "insufficient funds"
            );
            return Err(RecordError::invalid(
                "amount",
                format!(
                    "Insufficient funds: {} requested, {} available.",
                    format_currency(transaction.amount),
                    format_currency(self.balance)
                ),
            ));
        }

        self.balance -= transaction.amount;
        Ok(self.balance)
    }
}

impl Entity for Account {
    type Key = String;

    fn id(&self) -> String {
        self.account_number.clone()
    }
}

impl Stocked for Account {
    type Quantity = f64;

    fn quantity(&self) -> f64 {
        self.balance
    }

    fn set_quantity(&mut self, quantity: f64) {
        self.balance = quantity;
    }
}

// ============================================================================
// FINANCE APP
// ============================================================================

#[derive(Default)]
pub struct FinanceApp {
    accounts: KeyedRepository<String, Account>,
    transactions: KeyedRepository<i32, Transaction>,
}

impl FinanceApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_account(&mut self, account: Account) -> RecordResult<()> {
        self.accounts.add(account)
    }

    pub fn record(&mut self, transaction: Transaction) -> RecordResult<()> {
        self.transactions.add(transaction)
    }

    pub fn account(&self, account_number: &str) -> RecordResult<&Account> {
        self.accounts.get_by_id(&account_number.to_string())
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.get_all()
    }

    /// Apply a recorded transaction to a stored account
    pub fn apply(&mut self, account_number: &str, transaction_id: i32) -> RecordResult<f64> {
        let transaction = self.transactions.get_by_id(&transaction_id)?;
        self.accounts
            .update(&account_number.to_string(), |account| {
                account.apply_transaction(transaction)
            })
    }

    /// Overwrite a balance, e.g. after a manual correction
    pub fn set_balance(&mut self, account_number: &str, balance: f64) -> RecordResult<()> {
        self.accounts
            .update_quantity(&account_number.to_string(), balance)
    }

    /// Demo: one savings account, three transactions over three channels
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let account_number = "SB9040010470271";
        self.open_account(Account::savings(account_number, 1000.0))?;

        let now = Utc::now();
        let plan = [
            (Transaction::new(1, now, 150.0, "Groceries"), PaymentChannel::MobileMoney),
            (Transaction::new(2, now, 300.0, "Utilities"), PaymentChannel::BankTransfer),
            (Transaction::new(3, now, 700.0, "Entertainment"), PaymentChannel::CryptoWallet),
        ];

        for (transaction, channel) in &plan {
            writeln!(out, "{}", get_processor(*channel).process(transaction))?;
            self.record(transaction.clone())?;
        }

        for (transaction, _) in &plan {
            match self.apply(account_number, transaction.id) {
                Ok(balance) => writeln!(
                    out,
                    "[Account] {} deducted. New Balance: {}",
                    format_currency(transaction.amount),
                    format_currency(balance)
                )?,
                Err(err) => writeln!(out, "[{}] {}", err.kind(), err)?,
            }
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
