use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{EmiFrequency, EmiStatus, PlanId, StudentId};

/// installment plan for a student's fees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiPlan {
    pub id: PlanId,
    pub student_id: StudentId,
    pub total_amount: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub discount: Money,
    pub number_of_installments: u32,
    pub installment_amount: Money,
    pub start_date: NaiveDate,
    pub frequency: EmiFrequency,
    pub status: EmiStatus,
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
}

/// terms for a new plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiTerms {
    pub total_amount: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub discount: Money,
    pub number_of_installments: u32,
    pub start_date: NaiveDate,
    pub frequency: EmiFrequency,
}

impl EmiPlan {
    /// Create an active plan from its terms.
    ///
    /// The installment amount is the financed amount split evenly and
    /// rounded to paise; the last installment absorbs the rounding remainder
    /// (see [`EmiPlan::amount_due`]).
    pub fn create(id: PlanId, student_id: StudentId, terms: EmiTerms) -> Result<Self> {
        if terms.number_of_installments == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "emi plan needs at least one installment".to_string(),
            });
        }
        if terms.total_amount.is_negative()
            || terms.down_payment.is_negative()
            || terms.discount.is_negative()
        {
            return Err(LedgerError::InvalidConfiguration {
                message: "emi amounts cannot be negative".to_string(),
            });
        }

        let financed = terms.total_amount - terms.down_payment - terms.discount;
        if financed.is_negative() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "down payment {} and discount {} exceed total {}",
                    terms.down_payment, terms.discount, terms.total_amount
                ),
            });
        }

        let installment_amount = financed / Decimal::from(terms.number_of_installments);

        let plan = Self {
            id,
            student_id,
            total_amount: terms.total_amount,
            down_payment: terms.down_payment,
            discount: terms.discount,
            number_of_installments: terms.number_of_installments,
            installment_amount,
            start_date: terms.start_date,
            frequency: terms.frequency,
            status: EmiStatus::Active,
            completed_on: None,
        };

        // every installment must have a representable due date
        plan.due_date(plan.number_of_installments)?;

        Ok(plan)
    }

    /// amount spread over the installments
    pub fn financed_amount(&self) -> Money {
        self.total_amount.saturating_sub(self.down_payment + self.discount)
    }

    pub fn contains_installment(&self, installment: u32) -> bool {
        (1..=self.number_of_installments).contains(&installment)
    }

    pub fn check_installment(&self, installment: u32) -> Result<()> {
        if self.contains_installment(installment) {
            Ok(())
        } else {
            Err(LedgerError::InstallmentOutOfRange {
                installment,
                installments: self.number_of_installments,
            })
        }
    }

    /// `start_date + (installment - 1) * period` in calendar months;
    /// days past the end of a short month clamp to its last day
    pub fn due_date(&self, installment: u32) -> Result<NaiveDate> {
        self.check_installment(installment)?;

        (installment - 1)
            .checked_mul(self.frequency.months())
            .and_then(|offset| self.start_date.checked_add_months(Months::new(offset)))
            .ok_or_else(|| LedgerError::InvalidDate {
                message: format!("installment {} due date out of range", installment),
            })
    }

    /// Amount due for one installment.
    ///
    /// All installments are `installment_amount` except the last, which
    /// carries whatever the rounded split left over so the schedule sums to
    /// the financed amount.
    pub fn amount_due(&self, installment: u32) -> Money {
        if installment != self.number_of_installments || installment == 0 {
            return self.installment_amount;
        }

        let earlier = self.installment_amount * Decimal::from(installment - 1);
        let remainder = self.financed_amount().saturating_sub(earlier);

        // only absorb rounding drift; a stored plan whose figures disagree
        // wildly keeps its nominal installment
        if (remainder - self.installment_amount).abs() < Money::from_major(1) {
            remainder
        } else {
            self.installment_amount
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == EmiStatus::Completed
    }

    /// One-way `Active -> Completed` transition.
    ///
    /// Returns whether the status changed.
    pub fn mark_completed(&mut self, on: NaiveDate) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status = EmiStatus::Completed;
        self.completed_on = Some(on);
        true
    }
}
