use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::AttendanceStatus;

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LedgerConfig {
    pub payroll: PayrollPolicy,
    pub drafts: DraftPolicy,
    pub emi: EmiPolicy,
}

/// salary computation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// fixed divisor for the daily rate, independent of calendar length
    pub working_days_per_month: u32,
    /// pay the full month when a staff member has no attendance records
    pub full_attendance_fallback: bool,
    /// statuses that count as an attended day
    pub counted_statuses: Vec<AttendanceStatus>,
}

/// server-held payroll draft lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftPolicy {
    pub ttl_hours: i64,
}

/// emi reconciliation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmiPolicy {
    /// allowed gap between expected and received installment money
    pub reconciliation_tolerance: Money,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            working_days_per_month: 30,
            full_attendance_fallback: true,
            counted_statuses: vec![AttendanceStatus::Present],
        }
    }
}

impl Default for DraftPolicy {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

impl Default for EmiPolicy {
    fn default() -> Self {
        Self {
            reconciliation_tolerance: Money::ZERO,
        }
    }
}

impl PayrollPolicy {
    pub fn counts(&self, status: AttendanceStatus) -> bool {
        self.counted_statuses.contains(&status)
    }
}

impl LedgerConfig {
    /// the institution's standard rules: 30-day month, present days only
    pub fn institutional() -> Self {
        Self::default()
    }

    /// load from json, filling unspecified sections with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LedgerConfig =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.payroll.working_days_per_month == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "working_days_per_month must be positive".to_string(),
            });
        }
        if self.drafts.ttl_hours <= 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "draft ttl_hours must be positive".to_string(),
            });
        }
        if self.emi.reconciliation_tolerance.is_negative() {
            return Err(LedgerError::InvalidConfiguration {
                message: "reconciliation_tolerance cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}
