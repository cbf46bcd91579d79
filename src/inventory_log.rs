// 🧾 Inventory Log - keyed inventory persisted as a JSON array
//
// Last write wins: `save_to_file` overwrites the whole file, `load_from_file`
// replaces the whole in-memory set. Order in the file carries no meaning.

use crate::error::RecordResult;
use crate::repository::{Entity, KeyedRepository, Stocked};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// INVENTORY ITEM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryItem {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub date_added: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(id: i32, name: &str, quantity: i32, date_added: DateTime<Utc>) -> Self {
        InventoryItem {
            id,
            name: name.to_string(),
            quantity,
            date_added,
        }
    }
}

impl Entity for InventoryItem {
    type Key = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

impl Stocked for InventoryItem {
    type Quantity = i32;

    fn quantity(&self) -> i32 {
        self.quantity
    }

    fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
    }
}

// ============================================================================
// INVENTORY LOGGER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File read; this many items are now held
    Loaded(usize),
    /// Nothing at the path; in-memory contents untouched
    NoFile,
}

pub struct InventoryLogger<T: Entity> {
    items: KeyedRepository<T::Key, T>,
    file_path: PathBuf,
}

impl<T> InventoryLogger<T>
where
    T: Entity + Clone + Serialize + DeserializeOwned,
{
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        InventoryLogger {
            items: KeyedRepository::new(),
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn add(&mut self, item: T) -> RecordResult<()> {
        self.items.add(item)
    }

    pub fn remove(&mut self, key: &T::Key) -> RecordResult<T> {
        self.items.remove(key)
    }

    pub fn get_all(&self) -> Vec<T> {
        self.items.get_all()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write every item as a pretty-printed JSON array, replacing the file
    pub fn save_to_file(&self) -> Result<()> {
        let snapshot = self.items.get_all();
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize inventory")?;
        fs::write(&self.file_path, json)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        info!(count = snapshot.len(), path = %self.file_path.display(), "inventory saved");
        Ok(())
    }

    /// Replace the in-memory items with the file contents
    ///
    /// Undecodable JSON or duplicate ids leave the logger unchanged.
    pub fn load_from_file(&mut self) -> Result<LoadOutcome> {
        let json = match fs::read_to_string(&self.file_path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.file_path.display(), "no inventory file");
                return Ok(LoadOutcome::NoFile);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.file_path.display()))
            }
        };

        let items: Vec<T> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        let count = self.items.replace_all(items)?;
        info!(count, path = %self.file_path.display(), "inventory loaded");
        Ok(LoadOutcome::Loaded(count))
    }
}

impl<T> InventoryLogger<T>
where
    T: Entity + Stocked + Clone + Serialize + DeserializeOwned,
{
    pub fn update_quantity(&mut self, key: &T::Key, quantity: T::Quantity) -> RecordResult<()> {
        self.items.update_quantity(key, quantity)
    }
}

// ============================================================================
// INVENTORY APP
// ============================================================================

pub struct InventoryApp {
    logger: InventoryLogger<InventoryItem>,
}

impl InventoryApp {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        InventoryApp {
            logger: InventoryLogger::new(file_path),
        }
    }

    pub fn seed_sample_data(&mut self, now: DateTime<Utc>) -> RecordResult<()> {
        let seeds = [
            (1, "Laptop", 5),
            (2, "Mouse", 15),
            (3, "Keyboard", 10),
            (4, "Monitor", 7),
            (5, "Printer", 3),
        ];
        for (id, name, quantity) in seeds {
            self.logger.add(InventoryItem::new(id, name, quantity, now))?;
        }
        Ok(())
    }

    pub fn save_data(&self) -> Result<()> {
        self.logger.save_to_file()
    }

    pub fn load_data(&mut self) -> Result<LoadOutcome> {
        self.logger.load_from_file()
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.logger.get_all()
    }

    pub fn print_all_items<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut items = self.logger.get_all();
        items.sort_by_key(|item| item.id);
        for item in items {
            writeln!(
                out,
                "{}: {} - Qty: {} (Added: {})",
                item.id,
                item.name,
                item.quantity,
                item.date_added.format("%Y-%m-%d")
            )?;
        }
        Ok(())
    }

    /// Demo: seed, save, then prove the file restores into a fresh session
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.seed_sample_data(Utc::now())?;
        self.save_data()?;
        writeln!(out, "Data saved successfully.")?;

        let mut restored = InventoryApp::new(self.logger.file_path());
        match restored.load_data()? {
            LoadOutcome::Loaded(_) => writeln!(out, "Data loaded successfully.")?,
            LoadOutcome::NoFile => writeln!(out, "No data file found.")?,
        }
        restored.print_all_items(out)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
