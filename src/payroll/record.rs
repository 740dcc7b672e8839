use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{PayPeriod, PayrollId, PayrollStatus, StaffId};

use super::salary::SalaryBreakdown;

/// persisted payroll result, one per staff member and period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub id: PayrollId,
    pub staff_id: StaffId,
    pub period: PayPeriod,
    pub basic_salary: Money,
    pub allowances: Money,
    /// attendance deduction plus manual deductions
    pub deductions: Money,
    pub net_salary: Money,
    pub attended_days: u32,
    pub status: PayrollStatus,
    pub breakdown: SalaryBreakdown,
    pub generated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl PayrollRecord {
    /// new pending record from a computed breakdown
    pub fn from_breakdown(
        id: PayrollId,
        staff_id: StaffId,
        period: PayPeriod,
        breakdown: SalaryBreakdown,
        time_provider: &SafeTimeProvider,
    ) -> Self {
        Self {
            id,
            staff_id,
            period,
            basic_salary: breakdown.basic_salary,
            allowances: breakdown.allowances,
            deductions: breakdown.total_deductions(),
            net_salary: breakdown.net_salary,
            attended_days: breakdown.attended_days,
            status: PayrollStatus::Pending,
            breakdown,
            generated_at: time_provider.now(),
            processed_at: None,
        }
    }

    /// Replace the figures of a pending record, keeping its id.
    ///
    /// Processed records are immutable until reverted.
    pub fn regenerate(&mut self, breakdown: SalaryBreakdown, time_provider: &SafeTimeProvider) -> Result<()> {
        if self.status == PayrollStatus::Processed {
            return Err(LedgerError::PayrollProcessed {
                staff_id: self.staff_id.clone(),
                period: self.period,
            });
        }

        let (id, period) = (self.id, self.period);
        let staff_id = std::mem::take(&mut self.staff_id);
        *self = Self::from_breakdown(id, staff_id, period, breakdown, time_provider);
        Ok(())
    }

    /// pending -> processed
    pub fn process(&mut self, time_provider: &SafeTimeProvider) -> Result<()> {
        if self.status != PayrollStatus::Pending {
            return Err(LedgerError::InvalidStatusTransition {
                from: self.status,
                to: PayrollStatus::Processed,
            });
        }
        self.status = PayrollStatus::Processed;
        self.processed_at = Some(time_provider.now());
        Ok(())
    }

    /// processed -> pending
    pub fn revert(&mut self) -> Result<()> {
        if self.status != PayrollStatus::Processed {
            return Err(LedgerError::InvalidStatusTransition {
                from: self.status,
                to: PayrollStatus::Pending,
            });
        }
        self.status = PayrollStatus::Pending;
        self.processed_at = None;
        Ok(())
    }

    pub fn is_processed(&self) -> bool {
        self.status == PayrollStatus::Processed
    }
}
