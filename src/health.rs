// 🏥 Health System - patients, prescriptions and per-patient grouping

use crate::error::{InputDefect, RecordError, RecordResult};
use crate::repository::{Entity, KeyedRepository};
use anyhow::Result;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use tracing::debug;

// ============================================================================
// PATIENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i32,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
}

impl Patient {
    pub fn new(id: i32, name: &str, age: u32, gender: Gender) -> Self {
        Patient {
            id,
            name: name.to_string(),
            age,
            gender,
        }
    }
}

impl Entity for Patient {
    type Key = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Patient [Id={}, Name={}, Age={}, Gender={}]",
            self.id,
            self.name,
            self.age,
            self.gender.as_str()
        )
    }
}

// ============================================================================
// PRESCRIPTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i32,
    pub patient_id: i32,
    pub medication_name: String,
    pub date_issued: NaiveDate,
}

impl Prescription {
    pub fn new(id: i32, patient_id: i32, medication_name: &str, date_issued: NaiveDate) -> Self {
        Prescription {
            id,
            patient_id,
            medication_name: medication_name.to_string(),
            date_issued,
        }
    }
}

impl Entity for Prescription {
    type Key = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

impl fmt::Display for Prescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Prescription [Id={}, PatientId={}, Medication={}, DateIssued={}]",
            self.id,
            self.patient_id,
            self.medication_name,
            self.date_issued.format("%Y-%m-%d")
        )
    }
}

// ============================================================================
// HEALTH SYSTEM
// ============================================================================

#[derive(Default)]
pub struct HealthSystem {
    patients: KeyedRepository<i32, Patient>,
    prescriptions: KeyedRepository<i32, Prescription>,
    /// patient id → prescriptions, rebuilt by `build_prescription_map`
    prescription_map: HashMap<i32, Vec<Prescription>>,
}

impl HealthSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three patients and five prescriptions issued in the days before `today`
    pub fn seed_data(&mut self, today: NaiveDate) -> RecordResult<()> {
        self.add_patient(Patient::new(1, "Alice Johnson", 30, Gender::Female))?;
        self.add_patient(Patient::new(2, "Bob Smith", 45, Gender::Male))?;
        self.add_patient(Patient::new(3, "Carla Davis", 27, Gender::Female))?;

        let seeds = [
            (101, 1, "Amoxicillin", 5),
            (102, 1, "Ibuprofen", 2),
            (103, 2, "Metformin", 7),
            (104, 3, "Lisinopril", 3),
            (105, 1, "Paracetamol", 1),
        ];
        for (id, patient_id, medication, days_ago) in seeds {
            let issued = today - Days::new(days_ago);
            self.add_prescription(Prescription::new(id, patient_id, medication, issued))?;
        }

        Ok(())
    }

    pub fn add_patient(&mut self, patient: Patient) -> RecordResult<()> {
        self.patients.add(patient)
    }

    /// Store a prescription; its patient must already be known
    pub fn add_prescription(&mut self, prescription: Prescription) -> RecordResult<()> {
        if !self.patients.contains(&prescription.patient_id) {
            return Err(RecordError::not_found(prescription.patient_id));
        }
        self.prescriptions.add(prescription)
    }

    pub fn patient(&self, id: i32) -> RecordResult<&Patient> {
        self.patients.get_by_id(&id)
    }

    pub fn patients(&self) -> Vec<Patient> {
        self.patients.get_all()
    }

    /// Group every stored prescription by patient id, from scratch
    pub fn build_prescription_map(&mut self) {
        self.prescription_map.clear();

        for prescription in self.prescriptions.iter() {
            self.prescription_map
                .entry(prescription.patient_id)
                .or_default()
                .push(prescription.clone());
        }

        debug!(
            patients = self.prescription_map.len(),
            prescriptions = self.prescriptions.len(),
            "built prescription map"
        );
    }

    pub fn prescriptions_for_patient(&self, patient_id: i32) -> RecordResult<&[Prescription]> {
        self.prescription_map
            .get(&patient_id)
            .map(Vec::as_slice)
            .ok_or_else(|| RecordError::not_found(patient_id))
    }

    pub fn print_all_patients<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "=== Patient List ===")?;
        for patient in self.patients.iter() {
            writeln!(out, "{}", patient)?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn print_prescriptions_for_patient<W: Write>(&self, out: &mut W, patient_id: i32) -> Result<()> {
        match self.prescriptions_for_patient(patient_id) {
            Ok(prescriptions) => {
                writeln!(out, "=== Prescriptions for Patient ID {} ===", patient_id)?;
                for prescription in prescriptions {
                    writeln!(out, "{}", prescription)?;
                }
            }
            Err(_) => writeln!(out, "No prescriptions found for patient ID {}.", patient_id)?,
        }
        Ok(())
    }
}

/// Parse a patient id typed at the console
pub fn parse_patient_id(input: &str) -> RecordResult<i32> {
    let trimmed = input.trim();
    trimmed.parse::<i32>().map_err(|_| {
        RecordError::malformed(
            1,
            InputDefect::NotANumber {
                field: "patient id".to_string(),
                value: trimmed.to_string(),
            },
        )
    })
}

// ============================================================================
// TESTS
// ============================================================================
