use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::emi::MandateStatus;
use crate::types::{PayPeriod, PayrollStatus};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("invalid input for {field}: {message}")]
    InvalidInput {
        field: String,
        message: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    #[error("emi plan {plan_id} unreconciled: expected {expected}, received {actual}")]
    Unreconciled {
        plan_id: Uuid,
        expected: Money,
        actual: Money,
    },

    #[error("installment {installment} of plan {plan_id} already paid")]
    DuplicateInstallment {
        plan_id: Uuid,
        installment: u32,
    },

    #[error("installment {installment} outside plan range 1..={installments}")]
    InstallmentOutOfRange {
        installment: u32,
        installments: u32,
    },

    #[error("emi plan {plan_id} already completed")]
    PlanCompleted {
        plan_id: Uuid,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payroll for staff {staff_id} period {period} already processed")]
    PayrollProcessed {
        staff_id: String,
        period: PayPeriod,
    },

    #[error("payroll for staff {staff_id} period {period} already exists as {existing}")]
    DuplicatePayroll {
        staff_id: String,
        period: PayPeriod,
        existing: Uuid,
    },

    #[error("invalid mandate transition: {from:?} -> {to:?}")]
    InvalidMandateTransition {
        from: MandateStatus,
        to: MandateStatus,
    },

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        from: PayrollStatus,
        to: PayrollStatus,
    },

    #[error("payroll draft {draft_id} expired")]
    DraftExpired {
        draft_id: Uuid,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// maps onto a 404 response in the http layer
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
