// Storekeeper - Core Library
// Keyed in-memory repositories and the exercises built on them

pub mod error;
pub mod repository;
pub mod finance;
pub mod health;
pub mod warehouse;
pub mod grades;
pub mod inventory_log;
pub mod console;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{InputDefect, RecordError, RecordResult};
pub use repository::{Entity, KeyedRepository, Stocked};
pub use finance::{
    Account, AccountKind, FinanceApp, PaymentChannel, Transaction, TransactionProcessor,
    BankTransferProcessor, MobileMoneyProcessor, CryptoWalletProcessor,
    format_currency, get_processor,
};
pub use health::{Gender, HealthSystem, Patient, Prescription, parse_patient_id};
pub use warehouse::{ElectronicItem, GroceryItem, StockItem, StockRepository, WarehouseManager};
pub use grades::{
    Grade, Student,
    generate_report, parse_line, read_students, read_students_from_reader, write_report, write_report_to,
};
pub use inventory_log::{InventoryApp, InventoryItem, InventoryLogger, LoadOutcome};
pub use console::{ErrorClass, classify_error, describe_error, exit_code, run_grades};
pub use config::{Cli, Command};
pub use logging::init_logging;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
