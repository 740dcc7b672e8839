use std::collections::HashMap;

use crate::emi::{EMandate, EmiPlan};
use crate::errors::{LedgerError, Result};
use crate::fees::{FeeStructure, GlobalClassFee};
use crate::payroll::{AttendanceRecord, PayrollDraft, PayrollRecord};
use crate::types::{
    DraftId, FeePayment, PayPeriod, PayrollId, PlanId, StaffId, StaffMember, StudentId,
    StudentProfile,
};

/// staff and attendance lookups
pub trait StaffRepository {
    fn staff(&self, staff_id: &str) -> Option<StaffMember>;
    fn attendance(&self, staff_id: &str, period: PayPeriod) -> Vec<AttendanceRecord>;
}

/// payroll records and drafts; at most one record per staff member and period
pub trait PayrollRepository {
    fn payroll(&self, id: PayrollId) -> Option<PayrollRecord>;
    fn payroll_for_period(&self, staff_id: &str, period: PayPeriod) -> Option<PayrollRecord>;
    /// insert or replace the record for its (staff, period)
    fn save_payroll(&mut self, record: PayrollRecord) -> Result<()>;

    fn draft(&self, id: DraftId) -> Option<PayrollDraft>;
    fn save_draft(&mut self, draft: PayrollDraft);
    fn remove_draft(&mut self, id: DraftId) -> Option<PayrollDraft>;
    fn drafts(&self) -> Vec<PayrollDraft>;
}

/// emi plans, mandates and fee payments
pub trait EmiRepository {
    fn plan(&self, id: PlanId) -> Option<EmiPlan>;
    fn plans_for_student(&self, student_id: &str) -> Vec<EmiPlan>;
    fn save_plan(&mut self, plan: EmiPlan);

    fn mandate_for_plan(&self, plan_id: PlanId) -> Option<EMandate>;
    fn save_mandate(&mut self, mandate: EMandate);

    fn payments_for_student(&self, student_id: &str) -> Vec<FeePayment>;
    /// store a payment; a completed installment payment must not claim a
    /// slot already held by another completed payment on the same plan
    fn record_payment(&mut self, payment: FeePayment) -> Result<()>;
}

/// students and fee templates
pub trait FeeRepository {
    fn student(&self, student_id: &str) -> Option<StudentProfile>;
    fn class_fees(&self, class_name: &str, academic_year: &str) -> Vec<GlobalClassFee>;
    fn fee_overrides(&self, student_id: &str, academic_year: &str) -> Vec<FeeStructure>;
}

/// everything the ledger needs from storage
pub trait Store: StaffRepository + PayrollRepository + EmiRepository + FeeRepository {}

impl<T> Store for T where T: StaffRepository + PayrollRepository + EmiRepository + FeeRepository {}

/// in-memory store used by tests and demos
#[derive(Debug, Default)]
pub struct InMemoryStore {
    staff: HashMap<StaffId, StaffMember>,
    attendance: Vec<AttendanceRecord>,
    payroll: HashMap<(StaffId, PayPeriod), PayrollRecord>,
    drafts: HashMap<DraftId, PayrollDraft>,
    plans: HashMap<PlanId, EmiPlan>,
    mandates: HashMap<PlanId, EMandate>,
    payments: Vec<FeePayment>,
    students: HashMap<StudentId, StudentProfile>,
    class_fees: Vec<GlobalClassFee>,
    fee_structures: Vec<FeeStructure>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_staff(&mut self, staff: StaffMember) {
        self.staff.insert(staff.id.clone(), staff);
    }

    pub fn add_attendance(&mut self, record: AttendanceRecord) {
        self.attendance.push(record);
    }

    pub fn add_student(&mut self, student: StudentProfile) {
        self.students.insert(student.id.clone(), student);
    }

    pub fn add_class_fee(&mut self, fee: GlobalClassFee) {
        self.class_fees.push(fee);
    }

    pub fn add_fee_structure(&mut self, structure: FeeStructure) {
        self.fee_structures.push(structure);
    }
}

impl StaffRepository for InMemoryStore {
    fn staff(&self, staff_id: &str) -> Option<StaffMember> {
        self.staff.get(staff_id).cloned()
    }

    fn attendance(&self, staff_id: &str, period: PayPeriod) -> Vec<AttendanceRecord> {
        self.attendance
            .iter()
            .filter(|r| r.staff_id == staff_id && period.contains(r.date))
            .cloned()
            .collect()
    }
}

impl PayrollRepository for InMemoryStore {
    fn payroll(&self, id: PayrollId) -> Option<PayrollRecord> {
        self.payroll.values().find(|r| r.id == id).cloned()
    }

    fn payroll_for_period(&self, staff_id: &str, period: PayPeriod) -> Option<PayrollRecord> {
        self.payroll.get(&(staff_id.to_string(), period)).cloned()
    }

    fn save_payroll(&mut self, record: PayrollRecord) -> Result<()> {
        let key = (record.staff_id.clone(), record.period);
        if let Some(existing) = self.payroll.get(&key) {
            if existing.id != record.id {
                return Err(LedgerError::DuplicatePayroll {
                    staff_id: record.staff_id,
                    period: record.period,
                    existing: existing.id,
                });
            }
        }
        self.payroll.insert(key, record);
        Ok(())
    }

    fn draft(&self, id: DraftId) -> Option<PayrollDraft> {
        self.drafts.get(&id).cloned()
    }

    fn save_draft(&mut self, draft: PayrollDraft) {
        self.drafts.insert(draft.id, draft);
    }

    fn remove_draft(&mut self, id: DraftId) -> Option<PayrollDraft> {
        self.drafts.remove(&id)
    }

    fn drafts(&self) -> Vec<PayrollDraft> {
        self.drafts.values().cloned().collect()
    }
}

impl EmiRepository for InMemoryStore {
    fn plan(&self, id: PlanId) -> Option<EmiPlan> {
        self.plans.get(&id).cloned()
    }

    fn plans_for_student(&self, student_id: &str) -> Vec<EmiPlan> {
        let mut plans: Vec<EmiPlan> = self
            .plans
            .values()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect();
        plans.sort_by_key(|p| p.start_date);
        plans
    }

    fn save_plan(&mut self, plan: EmiPlan) {
        self.plans.insert(plan.id, plan);
    }

    fn mandate_for_plan(&self, plan_id: PlanId) -> Option<EMandate> {
        self.mandates.get(&plan_id).cloned()
    }

    fn save_mandate(&mut self, mandate: EMandate) {
        self.mandates.insert(mandate.plan_id, mandate);
    }

    fn payments_for_student(&self, student_id: &str) -> Vec<FeePayment> {
        self.payments
            .iter()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect()
    }

    fn record_payment(&mut self, payment: FeePayment) -> Result<()> {
        if let (Some(plan_id), Some(installment), true) =
            (payment.emi_plan_id, payment.installment_number, payment.is_completed())
        {
            let taken = self.payments.iter().any(|p| {
                p.student_id == payment.student_id
                    && p.is_installment_of(plan_id)
                    && p.installment_number == Some(installment)
            });
            if taken {
                return Err(LedgerError::DuplicateInstallment { plan_id, installment });
            }
        }
        self.payments.push(payment);
        Ok(())
    }
}

impl FeeRepository for InMemoryStore {
    fn student(&self, student_id: &str) -> Option<StudentProfile> {
        self.students.get(student_id).cloned()
    }

    fn class_fees(&self, class_name: &str, academic_year: &str) -> Vec<GlobalClassFee> {
        crate::fees::applicable_class_fees(class_name, academic_year, &self.class_fees)
            .into_iter()
            .cloned()
            .collect()
    }

    fn fee_overrides(&self, student_id: &str, academic_year: &str) -> Vec<FeeStructure> {
        self.fee_structures
            .iter()
            .filter(|s| s.student_id == student_id && s.academic_year.trim() == academic_year.trim())
            .cloned()
            .collect()
    }
}
