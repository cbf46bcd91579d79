// 📦 Warehouse - electronics and groceries in separate typed repositories
//
// Every failure below is recoverable: the demo prints it and moves on.

use crate::error::{RecordError, RecordResult};
use crate::repository::{Entity, KeyedRepository, Stocked};
use anyhow::Result;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use tracing::info;

// ============================================================================
// STOCK ITEMS
// ============================================================================

/// Anything the warehouse can count
pub trait StockItem: Entity<Key = i32> + Stocked<Quantity = i32> + fmt::Display + Clone {
    fn name(&self) -> &str;
}

pub type StockRepository<T> = KeyedRepository<i32, T>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectronicItem {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub brand: String,
    pub warranty_months: u32,
}

impl ElectronicItem {
    pub fn new(id: i32, name: &str, quantity: i32, brand: &str, warranty_months: u32) -> Self {
        ElectronicItem {
            id,
            name: name.to_string(),
            quantity,
            brand: brand.to_string(),
            warranty_months,
        }
    }
}

impl fmt::Display for ElectronicItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Electronic: {} (ID: {}, Brand: {}, Warranty: {} months, Qty: {})",
            self.name, self.id, self.brand, self.warranty_months, self.quantity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
}

impl GroceryItem {
    pub fn new(id: i32, name: &str, quantity: i32, expiry_date: NaiveDate) -> Self {
        GroceryItem {
            id,
            name: name.to_string(),
            quantity,
            expiry_date,
        }
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }
}

impl fmt::Display for GroceryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grocery: {} (ID: {}, Expires: {}, Qty: {})",
            self.name,
            self.id,
            self.expiry_date.format("%Y-%m-%d"),
            self.quantity
        )
    }
}

// Both item kinds share identity and stock handling
macro_rules! impl_stock_item {
    ($ty:ty) => {
        impl Entity for $ty {
            type Key = i32;

            fn id(&self) -> i32 {
                self.id
            }
        }

        impl Stocked for $ty {
            type Quantity = i32;

            fn quantity(&self) -> i32 {
                self.quantity
            }

            fn set_quantity(&mut self, quantity: i32) {
                self.quantity = quantity;
            }
        }

        impl StockItem for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

impl_stock_item!(ElectronicItem);
impl_stock_item!(GroceryItem);

// ============================================================================
// WAREHOUSE MANAGER
// ============================================================================

#[derive(Default)]
pub struct WarehouseManager {
    electronics: StockRepository<ElectronicItem>,
    groceries: StockRepository<GroceryItem>,
}

impl WarehouseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_data(&mut self, today: NaiveDate) -> RecordResult<()> {
        self.electronics
            .add(ElectronicItem::new(1, "Laptop", 10, "Dell", 24))?;
        self.electronics
            .add(ElectronicItem::new(2, "Smartphone", 15, "Samsung", 12))?;

        self.groceries
            .add(GroceryItem::new(101, "Milk", 20, today + Days::new(5)))?;
        self.groceries
            .add(GroceryItem::new(102, "Bread", 30, today + Days::new(2)))?;
        Ok(())
    }

    pub fn electronics(&mut self) -> &mut StockRepository<ElectronicItem> {
        &mut self.electronics
    }

    pub fn groceries(&mut self) -> &mut StockRepository<GroceryItem> {
        &mut self.groceries
    }

    pub fn print_all_items<T: StockItem, W: Write>(repo: &StockRepository<T>, out: &mut W) -> Result<()> {
        for item in repo.iter() {
            writeln!(out, "{}", item)?;
        }
        Ok(())
    }

    /// Add `amount` units (may be negative) and return the new quantity
    pub fn increase_stock<T: StockItem>(repo: &mut StockRepository<T>, id: i32, amount: i32) -> RecordResult<i32> {
        let current = repo.get_by_id(&id)?.quantity();
        let next = current
            .checked_add(amount)
            .ok_or_else(|| RecordError::invalid("quantity", "Quantity overflow."))?;
        repo.update_quantity(&id, next)?;
        info!(id, quantity = next, "stock updated");
        Ok(next)
    }

    pub fn remove_item_by_id<T: StockItem>(repo: &mut StockRepository<T>, id: i32) -> RecordResult<T> {
        repo.remove(&id)
    }

    /// Drop every grocery past its expiry date and hand the removed items back
    pub fn discard_expired(&mut self, today: NaiveDate) -> Vec<GroceryItem> {
        let expired = self.groceries.remove_where(|item| item.is_expired(today));
        if !expired.is_empty() {
            info!(count = expired.len(), %today, "discarded expired groceries");
        }
        expired
    }

    /// Demo: list both categories, then recover from three bad operations
    pub fn run<W: Write>(&mut self, today: NaiveDate, out: &mut W) -> Result<()> {
        self.seed_data(today)?;

        writeln!(out, "== Grocery Items ==")?;
        Self::print_all_items(&self.groceries, out)?;

        writeln!(out, "\n== Electronic Items ==")?;
        Self::print_all_items(&self.electronics, out)?;

        writeln!(out, "\n== TEST CASES ==")?;

        if let Err(err) = self
            .electronics
            .add(ElectronicItem::new(1, "TV", 5, "LG", 18))
        {
            writeln!(out, "[{}] {}", err.kind(), err)?;
        }

        match Self::remove_item_by_id(&mut self.groceries, 999) {
            Ok(item) => writeln!(out, "Item with ID {} removed.", item.id)?,
            Err(err) => writeln!(out, "[Error] {}", err)?,
        }

        if let Err(err) = self.groceries.update_quantity(&101, -5) {
            writeln!(out, "[{}] {}", err.kind(), err)?;
        }

        match Self::increase_stock(&mut self.electronics, 2, 5) {
            Ok(quantity) => {
                let name = self.electronics.get_by_id(&2)?.name().to_string();
                writeln!(out, "Stock updated: {} now has {} units.", name, quantity)?;
            }
            Err(err) => writeln!(out, "[Error] {}", err)?,
        }

        let expired = self.discard_expired(today);
        if expired.is_empty() {
            writeln!(out, "No expired groceries.")?;
        }
        for item in &expired {
            writeln!(out, "Discarded expired item: {}", item)?;
        }

        writeln!(out, "\n== Final Grocery Inventory ==")?;
        Self::print_all_items(&self.groceries, out)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
