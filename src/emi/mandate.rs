use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{EmiFrequency, MandateId, PlanId};

/// e-mandate status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateStatus {
    Active,
    Paused,
    Cancelled,
}

/// recurring bank-debit authorization backing an emi plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EMandate {
    pub id: MandateId,
    pub plan_id: PlanId,
    /// bank-issued mandate reference (UMRN)
    pub bank_reference: String,
    pub max_debit_amount: Money,
    pub frequency: EmiFrequency,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub status: MandateStatus,
}

impl EMandate {
    /// whether a debit of `amount` on `date` falls inside this mandate
    pub fn covers(&self, amount: Money, date: NaiveDate) -> bool {
        self.status == MandateStatus::Active
            && amount <= self.max_debit_amount
            && date >= self.valid_from
            && self.valid_until.map_or(true, |until| date <= until)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.transition(MandateStatus::Paused)
    }

    pub fn resume(&mut self) -> Result<()> {
        self.transition(MandateStatus::Active)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.transition(MandateStatus::Cancelled)
    }

    fn transition(&mut self, to: MandateStatus) -> Result<()> {
        let allowed = matches!(
            (self.status, to),
            (MandateStatus::Active, MandateStatus::Paused)
                | (MandateStatus::Paused, MandateStatus::Active)
                | (MandateStatus::Active, MandateStatus::Cancelled)
                | (MandateStatus::Paused, MandateStatus::Cancelled)
        );
        if !allowed {
            return Err(LedgerError::InvalidMandateTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
