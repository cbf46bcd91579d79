use anyhow::Result;
use chrono::{Local, Utc};
use clap::Parser;
use std::io::{self, BufRead, Write};

use storekeeper::{
    describe_error, exit_code, init_logging, parse_patient_id, run_grades, Cli, Command,
    FinanceApp, HealthSystem, InventoryApp, WarehouseManager,
};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_level) {
        eprintln!("⚠️  {}", err);
    }

    if let Err(err) = run(cli.command) {
        eprintln!("❌ {}", describe_error(&err));
        std::process::exit(exit_code(&err));
    }
}

fn run(command: Command) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Finance => FinanceApp::new().run(&mut out)?,
        Command::Health { patient_id } => run_health(patient_id, &mut out)?,
        Command::Warehouse => WarehouseManager::new().run(Local::now().date_naive(), &mut out)?,
        Command::Grades { input, output } => run_grades(&input, &output, &mut out)?,
        Command::Inventory { file } => InventoryApp::new(file).run(&mut out)?,
    }

    Ok(())
}

fn run_health<W: Write>(patient_id: Option<i32>, out: &mut W) -> Result<()> {
    let mut system = HealthSystem::new();
    system.seed_data(Utc::now().date_naive())?;
    system.build_prescription_map();
    system.print_all_patients(out)?;

    let parsed = match patient_id {
        Some(id) => Ok(id),
        None => {
            write!(out, "Enter Patient ID to view prescriptions: ")?;
            out.flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            parse_patient_id(&line)
        }
    };

    match parsed {
        Ok(id) => system.print_prescriptions_for_patient(out, id)?,
        Err(_) => writeln!(out, "Invalid input.")?,
    }
    Ok(())
}
