use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EmiPolicy;
use crate::decimal::{Money, Percentage};
use crate::errors::{LedgerError, Result};
use crate::types::{FeePayment, PlanId};

use super::plan::EmiPlan;

/// one row of the installment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentStatus {
    pub installment: u32,
    pub due_date: NaiveDate,
    pub amount_due: Money,
    pub amount_paid: Money,
    pub paid_on: Option<NaiveDate>,
}

impl InstallmentStatus {
    pub fn is_paid(&self) -> bool {
        self.paid_on.is_some()
    }
}

/// installment still waiting for a completed payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingInstallment {
    pub installment: u32,
    pub due_date: NaiveDate,
    pub amount_due: Money,
    pub overdue: bool,
}

/// progress of a plan against its recorded payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentProgress {
    pub plan_id: PlanId,
    pub total_amount: Money,
    pub financed_amount: Money,
    pub total_paid: Money,
    pub remaining_amount: Money,
    pub paid_installments: u32,
    pub number_of_installments: u32,
    pub next_installment: Option<u32>,
    pub next_due_date: Option<NaiveDate>,
    pub overdue_installments: u32,
    pub completion_percentage: Percentage,
    pub is_completed: bool,
    /// installment money matches the amounts due for the paid slots
    pub reconciled: bool,
}

/// completed installment payments matched to plan slots
#[derive(Debug, Default)]
struct Attribution {
    /// first completed payment per installment: (amount, date)
    paid: BTreeMap<u32, (Money, NaiveDate)>,
    /// every completed payment attributed to the plan
    total_paid: Money,
}

/// tracks installment payments against an emi plan
#[derive(Debug, Clone, Default)]
pub struct EmiProgressTracker {
    policy: EmiPolicy,
}

impl EmiProgressTracker {
    pub fn new(policy: EmiPolicy) -> Self {
        Self { policy }
    }

    /// Match completed payments to installment slots.
    ///
    /// A slot counts once no matter how many payments claim it; the extra
    /// money still shows up in `total_paid` and surfaces through
    /// reconciliation.
    fn attribute(&self, plan: &EmiPlan, payments: &[FeePayment]) -> Attribution {
        let mut attribution = Attribution::default();

        let attributed = payments
            .iter()
            .filter(|p| p.student_id == plan.student_id && p.is_installment_of(plan.id));

        for payment in attributed {
            attribution.total_paid += payment.amount;

            let Some(installment) = payment.installment_number else {
                continue;
            };

            if !plan.contains_installment(installment) {
                tracing::warn!(
                    plan_id = %plan.id,
                    payment_id = %payment.id,
                    installment,
                    "payment claims installment outside plan range"
                );
                continue;
            }

            if attribution.paid.contains_key(&installment) {
                tracing::warn!(
                    plan_id = %plan.id,
                    payment_id = %payment.id,
                    installment,
                    "installment paid more than once"
                );
                continue;
            }

            attribution
                .paid
                .insert(installment, (payment.amount, payment.payment_date));
        }

        attribution
    }

    /// full schedule with payment state per installment
    pub fn schedule(&self, plan: &EmiPlan, payments: &[FeePayment]) -> Result<Vec<InstallmentStatus>> {
        let attribution = self.attribute(plan, payments);

        (1..=plan.number_of_installments)
            .map(|installment| {
                let paid = attribution.paid.get(&installment);
                Ok(InstallmentStatus {
                    installment,
                    due_date: plan.due_date(installment)?,
                    amount_due: plan.amount_due(installment),
                    amount_paid: paid.map(|(amount, _)| *amount).unwrap_or(Money::ZERO),
                    paid_on: paid.map(|(_, date)| *date),
                })
            })
            .collect()
    }

    /// Unpaid installments in ascending order.
    ///
    /// With `as_of`, installments due strictly before that date are flagged
    /// overdue.
    pub fn pending_installments(
        &self,
        plan: &EmiPlan,
        payments: &[FeePayment],
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<PendingInstallment>> {
        let pending = self
            .schedule(plan, payments)?
            .into_iter()
            .filter(|row| !row.is_paid())
            .map(|row| PendingInstallment {
                installment: row.installment,
                due_date: row.due_date,
                amount_due: row.amount_due,
                overdue: as_of.map_or(false, |today| row.due_date < today),
            })
            .collect();

        Ok(pending)
    }

    /// whether the plan has every installment paid
    pub fn should_complete(&self, plan: &EmiPlan, payments: &[FeePayment]) -> bool {
        let paid = self.attribute(plan, payments).paid.len() as u32;
        paid >= plan.number_of_installments
    }

    /// Check the money received against the amounts due for paid slots.
    ///
    /// Partial, duplicate or irregular payments make these diverge; the
    /// mismatch is logged and returned as `Unreconciled`.
    pub fn reconcile(&self, plan: &EmiPlan, payments: &[FeePayment]) -> Result<()> {
        let attribution = self.attribute(plan, payments);
        self.check_reconciled(plan, &attribution)
    }

    fn check_reconciled(&self, plan: &EmiPlan, attribution: &Attribution) -> Result<()> {
        let expected: Money = attribution
            .paid
            .keys()
            .map(|&installment| plan.amount_due(installment))
            .sum();
        let actual = attribution.total_paid;

        if (expected - actual).abs() > self.policy.reconciliation_tolerance {
            tracing::warn!(
                plan_id = %plan.id,
                expected = %expected,
                actual = %actual,
                paid_installments = attribution.paid.len(),
                "emi plan payments do not reconcile"
            );
            return Err(LedgerError::Unreconciled {
                plan_id: plan.id,
                expected,
                actual,
            });
        }

        Ok(())
    }

    /// summary of how far the plan has progressed
    pub fn progress(
        &self,
        plan: &EmiPlan,
        payments: &[FeePayment],
        as_of: Option<NaiveDate>,
    ) -> Result<PaymentProgress> {
        let attribution = self.attribute(plan, payments);
        let reconciled = self.check_reconciled(plan, &attribution).is_ok();

        let paid_installments = attribution.paid.len() as u32;
        let next_installment =
            (1..=plan.number_of_installments).find(|n| !attribution.paid.contains_key(n));
        let next_due_date = next_installment.map(|n| plan.due_date(n)).transpose()?;

        let overdue_installments = match as_of {
            Some(today) => {
                let mut overdue = 0;
                for installment in 1..=plan.number_of_installments {
                    if !attribution.paid.contains_key(&installment) && plan.due_date(installment)? < today {
                        overdue += 1;
                    }
                }
                overdue
            }
            None => 0,
        };

        let financed_amount = plan.financed_amount();

        Ok(PaymentProgress {
            plan_id: plan.id,
            total_amount: plan.total_amount,
            financed_amount,
            total_paid: attribution.total_paid,
            remaining_amount: financed_amount.saturating_sub(attribution.total_paid),
            paid_installments,
            number_of_installments: plan.number_of_installments,
            next_installment,
            next_due_date,
            overdue_installments,
            completion_percentage: Percentage::of(paid_installments, plan.number_of_installments),
            is_completed: paid_installments >= plan.number_of_installments,
            reconciled,
        })
    }
}
