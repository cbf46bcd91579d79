// ⚙️ Configuration - command line with environment fallbacks

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "storekeeper", about = "Keyed record exercises: accounts, patients, stock, grades", version)]
pub struct Cli {
    #[arg(
        long,
        env = "STOREKEEPER_LOG",
        default_value = "warn",
        global = true,
        help = "Diagnostic log filter (e.g. warn, info, storekeeper=debug)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Process three transactions against a savings account
    Finance,

    /// List patients and show prescriptions for one of them
    Health {
        /// Patient to look up; read from stdin when omitted
        #[arg(long, value_name = "ID")]
        patient_id: Option<i32>,
    },

    /// Electronics and groceries inventory with recovery scenarios
    Warehouse,

    /// Turn a CSV of student scores into a graded text report
    Grades {
        #[arg(long, env = "STOREKEEPER_STUDENTS", default_value = "students.txt", value_name = "FILE")]
        input: PathBuf,

        #[arg(long, env = "STOREKEEPER_REPORT", default_value = "report.txt", value_name = "FILE")]
        output: PathBuf,
    },

    /// Save inventory to JSON and load it back
    Inventory {
        #[arg(long, env = "STOREKEEPER_INVENTORY", default_value = "inventory.json", value_name = "FILE")]
        file: PathBuf,
    },
}
