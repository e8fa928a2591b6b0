//! Business rules and reference data

use rust_decimal::Decimal;

/// Q10,000
pub const MIN_LOAN_AMOUNT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// 40%
pub const MAX_LTV: Decimal = Decimal::from_parts(40, 0, 0, false, 2);

/// 10% per month
pub const DEFAULT_INTEREST_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// 5% of the installment
pub const LATE_FEE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

pub const GRACE_PERIOD_DAYS: i64 = 5;
pub const DEFAULT_TRIGGER_DAYS: i64 = 15;
pub const LEGAL_READY_DAYS: i64 = 30;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Longest term any calculation accepts (40 years)
pub const MAX_TERM_MONTHS: u32 = 480;

/// The 22 departments of Guatemala
pub const DEPARTMENTS: [&str; 22] = [
    "Guatemala",
    "El Progreso",
    "Sacatepéquez",
    "Chimaltenango",
    "Escuintla",
    "Santa Rosa",
    "Sololá",
    "Totonicapán",
    "Quetzaltenango",
    "Suchitepéquez",
    "Retalhuleu",
    "San Marcos",
    "Huehuetenango",
    "Quiché",
    "Baja Verapaz",
    "Alta Verapaz",
    "Petén",
    "Izabal",
    "Zacapa",
    "Chiquimula",
    "Jalapa",
    "Jutiapa",
];

/// Case-insensitive department lookup; returns the canonical spelling.
pub fn find_department(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    DEPARTMENTS
        .iter()
        .copied()
        .find(|d| d.to_lowercase() == wanted)
}
