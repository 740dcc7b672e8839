use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{DraftId, PayPeriod, PaymentId, PayrollId, PlanId, StaffId, StudentId};

/// payroll, draft and fee events emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // payroll events
    PayrollGenerated {
        payroll_id: PayrollId,
        staff_id: StaffId,
        period: PayPeriod,
        net_salary: Money,
        attended_days: u32,
        overwritten: bool,
        timestamp: DateTime<Utc>,
    },
    PayrollProcessed {
        payroll_id: PayrollId,
        net_salary: Money,
        timestamp: DateTime<Utc>,
    },
    PayrollReverted {
        payroll_id: PayrollId,
        timestamp: DateTime<Utc>,
    },

    // draft events
    DraftCreated {
        draft_id: DraftId,
        staff_id: StaffId,
        period: PayPeriod,
        expires_at: DateTime<Utc>,
    },
    DraftCommitted {
        draft_id: DraftId,
        payroll_id: PayrollId,
        timestamp: DateTime<Utc>,
    },
    DraftsPurged {
        count: usize,
        timestamp: DateTime<Utc>,
    },

    // fee and emi events
    LumpSumReceived {
        payment_id: PaymentId,
        student_id: StudentId,
        amount: Money,
        payment_date: NaiveDate,
    },
    InstallmentPaid {
        payment_id: PaymentId,
        plan_id: PlanId,
        installment: u32,
        amount: Money,
        payment_date: NaiveDate,
    },
    EmiPlanCompleted {
        plan_id: PlanId,
        student_id: StudentId,
        total_paid: Money,
        completed_on: NaiveDate,
    },
    PlanUnreconciled {
        plan_id: PlanId,
        expected: Money,
        actual: Money,
    },
}

/// events recorded by ledger operations, drained by the caller
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
