use chrono::{Duration, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::emi::{EMandate, EmiPlan, EmiProgressTracker, PaymentProgress, PendingInstallment};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::fees::{FeeOutstandingAggregator, FeeSummary};
use crate::payroll::{
    AttendanceBasis, AttendanceToSalaryCalculator, PayrollDraft, PayrollRecord, SalaryBreakdown,
};
use crate::repository::Store;
use crate::types::{DraftId, FeePayment, PayPeriod, PayrollId, PlanId};
use crate::views::{EmiPlanRequest, FeePaymentRequest, PayrollRequest};

/// Wires storage to the payroll, emi and fee calculators.
///
/// Calculators stay pure; the ledger fetches the snapshot they need, writes
/// results back and records what happened in its event store.
pub struct Ledger<S: Store> {
    store: S,
    config: LedgerConfig,
    salary: AttendanceToSalaryCalculator,
    tracker: EmiProgressTracker,
    fees: FeeOutstandingAggregator,
    pub events: EventStore,
}

impl<S: Store> Ledger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            salary: AttendanceToSalaryCalculator::new(config.payroll.clone()),
            tracker: EmiProgressTracker::new(config.emi.clone()),
            fees: FeeOutstandingAggregator::new(),
            config,
            events: EventStore::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn compute_salary(&self, request: &PayrollRequest, period: PayPeriod) -> Result<SalaryBreakdown> {
        let staff = self
            .store
            .staff(&request.staff_id)
            .ok_or_else(|| LedgerError::not_found("staff member", &request.staff_id))?;

        if !staff.active {
            tracing::debug!(staff_id = %staff.id, "computing payroll for inactive staff member");
        }

        let base_salary = request.base_salary.or(staff.base_salary);
        let adjustments = request.adjustments();

        let breakdown = match request.days_worked {
            Some(days) => self.salary.calculate_with_adjustments(
                base_salary,
                AttendanceBasis::Manual(days),
                adjustments,
            ),
            None => {
                let records = self.store.attendance(&staff.id, period);
                self.salary.calculate_with_adjustments(
                    base_salary,
                    AttendanceBasis::Recorded {
                        staff_id: &staff.id,
                        period,
                        records: &records,
                    },
                    adjustments,
                )
            }
        };

        Ok(breakdown)
    }

    /// store a breakdown as the period's payroll, overwriting a pending one
    fn write_payroll(
        &mut self,
        staff_id: &str,
        period: PayPeriod,
        breakdown: SalaryBreakdown,
        time_provider: &SafeTimeProvider,
    ) -> Result<(PayrollRecord, bool)> {
        let (record, overwritten) = match self.store.payroll_for_period(staff_id, period) {
            Some(mut existing) => {
                existing.regenerate(breakdown, time_provider)?;
                (existing, true)
            }
            None => (
                PayrollRecord::from_breakdown(Uuid::new_v4(), staff_id.to_string(), period, breakdown, time_provider),
                false,
            ),
        };

        self.store.save_payroll(record.clone())?;

        self.events.emit(Event::PayrollGenerated {
            payroll_id: record.id,
            staff_id: record.staff_id.clone(),
            period,
            net_salary: record.net_salary,
            attended_days: record.attended_days,
            overwritten,
            timestamp: time_provider.now(),
        });

        tracing::info!(
            payroll_id = %record.id,
            staff_id,
            period = %period,
            net_salary = %record.net_salary,
            overwritten,
            "payroll generated"
        );

        Ok((record, overwritten))
    }

    /// compute and store payroll for one staff member and month
    pub fn generate_payroll(
        &mut self,
        request: &PayrollRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PayrollRecord> {
        let period = request.period()?;
        let breakdown = self.compute_salary(request, period)?;
        let (record, _) = self.write_payroll(&request.staff_id, period, breakdown, time_provider)?;
        Ok(record)
    }

    pub fn payroll(&self, id: PayrollId) -> Result<PayrollRecord> {
        self.store
            .payroll(id)
            .ok_or_else(|| LedgerError::not_found("payroll record", id))
    }

    /// mark a pending payroll record as processed
    pub fn process_payroll(&mut self, id: PayrollId, time_provider: &SafeTimeProvider) -> Result<PayrollRecord> {
        let mut record = self.payroll(id)?;
        record.process(time_provider)?;
        self.store.save_payroll(record.clone())?;

        self.events.emit(Event::PayrollProcessed {
            payroll_id: id,
            net_salary: record.net_salary,
            timestamp: time_provider.now(),
        });

        Ok(record)
    }

    /// explicit reversion of a processed record back to pending
    pub fn revert_payroll(&mut self, id: PayrollId, time_provider: &SafeTimeProvider) -> Result<PayrollRecord> {
        let mut record = self.payroll(id)?;
        record.revert()?;
        self.store.save_payroll(record.clone())?;

        self.events.emit(Event::PayrollReverted {
            payroll_id: id,
            timestamp: time_provider.now(),
        });
        tracing::info!(payroll_id = %id, "payroll reverted to pending");

        Ok(record)
    }

    /// compute payroll into a server-held draft without touching records
    pub fn create_draft(
        &mut self,
        request: &PayrollRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PayrollDraft> {
        let period = request.period()?;
        let breakdown = self.compute_salary(request, period)?;

        let draft = PayrollDraft::new(
            Uuid::new_v4(),
            request.staff_id.clone(),
            period,
            breakdown,
            Duration::hours(self.config.drafts.ttl_hours),
            time_provider,
        );
        self.store.save_draft(draft.clone());

        self.events.emit(Event::DraftCreated {
            draft_id: draft.id,
            staff_id: draft.staff_id.clone(),
            period,
            expires_at: draft.expires_at,
        });

        Ok(draft)
    }

    pub fn draft(&self, id: DraftId) -> Result<PayrollDraft> {
        self.store
            .draft(id)
            .ok_or_else(|| LedgerError::not_found("payroll draft", id))
    }

    /// Turn a draft into the period's payroll record.
    ///
    /// The draft is consumed either way; an expired draft is discarded.
    pub fn commit_draft(&mut self, id: DraftId, time_provider: &SafeTimeProvider) -> Result<PayrollRecord> {
        let draft = self
            .store
            .remove_draft(id)
            .ok_or_else(|| LedgerError::not_found("payroll draft", id))?;

        if draft.is_expired(time_provider) {
            return Err(LedgerError::DraftExpired { draft_id: id });
        }

        let (record, _) = self.write_payroll(&draft.staff_id, draft.period, draft.breakdown, time_provider)?;

        self.events.emit(Event::DraftCommitted {
            draft_id: id,
            payroll_id: record.id,
            timestamp: time_provider.now(),
        });

        Ok(record)
    }

    /// drop expired drafts, returning how many were removed
    pub fn purge_expired_drafts(&mut self, time_provider: &SafeTimeProvider) -> usize {
        let expired: Vec<DraftId> = self
            .store
            .drafts()
            .into_iter()
            .filter(|d| d.is_expired(time_provider))
            .map(|d| d.id)
            .collect();

        for id in &expired {
            self.store.remove_draft(*id);
        }

        if !expired.is_empty() {
            self.events.emit(Event::DraftsPurged {
                count: expired.len(),
                timestamp: time_provider.now(),
            });
            tracing::debug!(count = expired.len(), "expired payroll drafts purged");
        }

        expired.len()
    }

    /// create an active emi plan for an existing student
    pub fn create_emi_plan(&mut self, request: &EmiPlanRequest) -> Result<EmiPlan> {
        let student = self
            .store
            .student(&request.student_id)
            .ok_or_else(|| LedgerError::not_found("student", &request.student_id))?;

        let plan = EmiPlan::create(Uuid::new_v4(), student.id, request.terms())?;
        self.store.save_plan(plan.clone());

        tracing::info!(
            plan_id = %plan.id,
            student_id = %plan.student_id,
            installments = plan.number_of_installments,
            installment_amount = %plan.installment_amount,
            "emi plan created"
        );

        Ok(plan)
    }

    pub fn emi_plan(&self, id: PlanId) -> Result<EmiPlan> {
        self.store.plan(id).ok_or_else(|| LedgerError::not_found("emi plan", id))
    }

    /// attach an e-mandate record to an existing plan
    pub fn attach_mandate(&mut self, mandate: EMandate) -> Result<()> {
        let plan = self.emi_plan(mandate.plan_id)?;
        if !mandate.covers(plan.installment_amount, mandate.valid_from) {
            tracing::warn!(
                plan_id = %plan.id,
                max_debit = %mandate.max_debit_amount,
                installment_amount = %plan.installment_amount,
                "mandate does not cover the plan installment"
            );
        }
        self.store.save_mandate(mandate);
        Ok(())
    }

    /// plan an installment payment is attributed to
    fn resolve_plan(&self, request: &FeePaymentRequest) -> Result<EmiPlan> {
        let plan = match request.emi_plan_id {
            Some(id) => self.emi_plan(id)?,
            None => self
                .store
                .plans_for_student(&request.student_id)
                .into_iter()
                .find(|p| !p.is_completed())
                .ok_or_else(|| LedgerError::not_found("active emi plan for student", &request.student_id))?,
        };

        if plan.student_id != request.student_id {
            return Err(LedgerError::not_found("emi plan for student", plan.id));
        }

        Ok(plan)
    }

    /// Record a fee payment, then re-evaluate the plan it belongs to.
    ///
    /// An installment payment that completes the last open slot moves the
    /// plan to completed. Payment money that does not match the amounts due
    /// is reported as [`Event::PlanUnreconciled`].
    pub fn record_fee_payment(
        &mut self,
        request: &FeePaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<FeePayment> {
        self.store
            .student(&request.student_id)
            .ok_or_else(|| LedgerError::not_found("student", &request.student_id))?;

        if !request.amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount: request.amount });
        }

        let plan = match (request.installment_number, request.emi_plan_id) {
            (Some(installment), _) => {
                let plan = self.resolve_plan(request)?;
                if plan.is_completed() {
                    return Err(LedgerError::PlanCompleted { plan_id: plan.id });
                }
                plan.check_installment(installment)?;
                Some(plan)
            }
            (None, Some(_)) => Some(self.resolve_plan(request)?),
            (None, None) => None,
        };

        let payment = FeePayment {
            id: Uuid::new_v4(),
            student_id: request.student_id.clone(),
            emi_plan_id: plan.as_ref().map(|p| p.id),
            amount: request.amount,
            payment_date: request
                .payment_date
                .unwrap_or_else(|| time_provider.now().date_naive()),
            payment_mode: request.payment_mode,
            installment_number: request.installment_number,
            status: request.status,
        };

        self.store.record_payment(payment.clone())?;

        if !payment.is_completed() {
            tracing::debug!(payment_id = %payment.id, status = ?payment.status, "payment recorded, not yet completed");
            return Ok(payment);
        }

        match (&plan, payment.installment_number) {
            (Some(plan), Some(installment)) => self.events.emit(Event::InstallmentPaid {
                payment_id: payment.id,
                plan_id: plan.id,
                installment,
                amount: payment.amount,
                payment_date: payment.payment_date,
            }),
            _ => self.events.emit(Event::LumpSumReceived {
                payment_id: payment.id,
                student_id: payment.student_id.clone(),
                amount: payment.amount,
                payment_date: payment.payment_date,
            }),
        }

        if let Some(plan) = plan {
            self.evaluate_plan(plan, payment.payment_date)?;
        }

        Ok(payment)
    }

    /// completion and reconciliation check after a payment
    fn evaluate_plan(&mut self, mut plan: EmiPlan, as_of: NaiveDate) -> Result<()> {
        let payments = self.store.payments_for_student(&plan.student_id);

        if let Err(LedgerError::Unreconciled { plan_id, expected, actual }) =
            self.tracker.reconcile(&plan, &payments)
        {
            self.events.emit(Event::PlanUnreconciled { plan_id, expected, actual });
        }

        if self.tracker.should_complete(&plan, &payments) && plan.mark_completed(as_of) {
            let progress = self.tracker.progress(&plan, &payments, None)?;
            self.store.save_plan(plan.clone());

            self.events.emit(Event::EmiPlanCompleted {
                plan_id: plan.id,
                student_id: plan.student_id.clone(),
                total_paid: progress.total_paid,
                completed_on: as_of,
            });
            tracing::info!(plan_id = %plan.id, student_id = %plan.student_id, "emi plan completed");
        }

        Ok(())
    }

    /// unpaid installments of a plan, overdue relative to `as_of`
    pub fn emi_pending_installments(
        &self,
        plan_id: PlanId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<PendingInstallment>> {
        let plan = self.emi_plan(plan_id)?;
        let payments = self.store.payments_for_student(&plan.student_id);
        self.tracker.pending_installments(&plan, &payments, as_of)
    }

    pub fn emi_progress(&self, plan_id: PlanId, as_of: Option<NaiveDate>) -> Result<PaymentProgress> {
        let plan = self.emi_plan(plan_id)?;
        let payments = self.store.payments_for_student(&plan.student_id);
        self.tracker.progress(&plan, &payments, as_of)
    }

    /// Fee totals for a student; defaults to the student's current year.
    pub fn fee_summary(&self, student_id: &str, academic_year: Option<&str>) -> Result<FeeSummary> {
        let student = self
            .store
            .student(student_id)
            .ok_or_else(|| LedgerError::not_found("student", student_id))?;

        let year = academic_year.unwrap_or(&student.academic_year).to_string();
        let overrides = self.store.fee_overrides(&student.id, &year);
        let globals = self.store.class_fees(&student.class_name, &year);
        let payments = self.store.payments_for_student(&student.id);

        Ok(self.fees.summarize(&student, &year, &overrides, &globals, &payments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::fees::{FeeStructure, GlobalClassFee};
    use crate::payroll::AttendanceRecord;
    use crate::repository::{EmiRepository, InMemoryStore};
    use crate::types::{
        AttendanceStatus, EmiFrequency, EmiStatus, FeeFrequency, PaymentMode, PaymentStatus,
        PayrollStatus, StaffMember, StudentProfile,
    };
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap(),
        ))
    }

    fn ledger() -> Ledger<InMemoryStore> {
        let mut store = InMemoryStore::new();
        store.add_staff(StaffMember {
            id: "EMP-1".to_string(),
            name: "R. Iyer".to_string(),
            base_salary: Some(Money::from_major(30_000)),
            join_date: date(2021, 6, 1),
            active: true,
        });
        store.add_staff(StaffMember {
            id: "EMP-2".to_string(),
            name: "S. Khan".to_string(),
            base_salary: None,
            join_date: date(2023, 1, 9),
            active: true,
        });
        for day in 1..=20 {
            store.add_attendance(AttendanceRecord {
                staff_id: "EMP-1".to_string(),
                date: date(2024, 4, day),
                status: if day % 5 == 0 { AttendanceStatus::Absent } else { AttendanceStatus::Present },
                hours_worked: dec!(8),
            });
        }
        store.add_student(StudentProfile {
            id: "STU-10".to_string(),
            name: "Meera".to_string(),
            class_name: "Class 10".to_string(),
            academic_year: "2024-25".to_string(),
            is_lead: false,
        });
        store.add_class_fee(GlobalClassFee {
            id: Uuid::new_v4(),
            class_name: "Class 10".to_string(),
            fee_type: "tuition".to_string(),
            amount: Money::from_major(5_000),
            frequency: FeeFrequency::Yearly,
            academic_year: "2024-25".to_string(),
            is_active: true,
        });

        Ledger::new(store, LedgerConfig::institutional()).unwrap()
    }

    fn payroll_request(staff: &str, days: Option<i64>) -> PayrollRequest {
        PayrollRequest {
            staff_id: staff.to_string(),
            month: 4,
            year: 2024,
            days_worked: days,
            base_salary: None,
            allowances: Money::ZERO,
            other_deductions: Money::ZERO,
        }
    }

    fn plan_request(installments: u32) -> EmiPlanRequest {
        EmiPlanRequest {
            student_id: "STU-10".to_string(),
            total_amount: Money::from_major(12_000),
            down_payment: Money::ZERO,
            discount: Money::ZERO,
            number_of_installments: installments,
            start_date: date(2024, 4, 5),
            frequency: EmiFrequency::Monthly,
        }
    }

    fn installment(plan_id: PlanId, number: u32, amount: i64) -> FeePaymentRequest {
        FeePaymentRequest {
            student_id: "STU-10".to_string(),
            emi_plan_id: Some(plan_id),
            amount: Money::from_major(amount),
            payment_date: Some(date(2024, 4, 5)),
            payment_mode: PaymentMode::Upi,
            installment_number: Some(number),
            status: PaymentStatus::Completed,
        }
    }

    #[test]
    fn test_generate_payroll_from_attendance() {
        let mut ledger = ledger();
        let record = ledger.generate_payroll(&payroll_request("EMP-1", None), &time()).unwrap();

        // 20 records, every fifth day absent
        assert_eq!(record.attended_days, 16);
        assert_eq!(record.net_salary, Money::from_major(16_000));
        assert_eq!(record.status, PayrollStatus::Pending);
    }

    #[test]
    fn test_regenerate_overwrites_same_period() {
        let mut ledger = ledger();
        let time = time();
        let first = ledger.generate_payroll(&payroll_request("EMP-1", Some(25)), &time).unwrap();
        let second = ledger.generate_payroll(&payroll_request("EMP-1", Some(28)), &time).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(ledger.payroll(first.id).unwrap().net_salary, Money::from_major(28_000));

        let events = ledger.take_events();
        assert!(matches!(events[1], Event::PayrollGenerated { overwritten: true, .. }));
    }

    #[test]
    fn test_processed_payroll_blocks_regeneration() {
        let mut ledger = ledger();
        let time = time();
        let record = ledger.generate_payroll(&payroll_request("EMP-1", Some(25)), &time).unwrap();
        ledger.process_payroll(record.id, &time).unwrap();

        let err = ledger.generate_payroll(&payroll_request("EMP-1", Some(30)), &time).unwrap_err();
        assert!(matches!(err, LedgerError::PayrollProcessed { .. }));

        ledger.revert_payroll(record.id, &time).unwrap();
        let regenerated = ledger.generate_payroll(&payroll_request("EMP-1", Some(30)), &time).unwrap();
        assert_eq!(regenerated.net_salary, Money::from_major(30_000));
    }

    #[test]
    fn test_unknown_staff_is_not_found() {
        let mut ledger = ledger();
        let err = ledger.generate_payroll(&payroll_request("EMP-404", None), &time()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_base_salary_and_no_attendance() {
        let mut ledger = ledger();
        let record = ledger.generate_payroll(&payroll_request("EMP-2", None), &time()).unwrap();

        assert_eq!(record.attended_days, 30);
        assert_eq!(record.net_salary, Money::ZERO);
    }

    #[test]
    fn test_draft_commit_and_purge() {
        let mut ledger = ledger();
        let time = time();
        let controller = time.test_control().unwrap();

        let kept = ledger.create_draft(&payroll_request("EMP-1", Some(25)), &time).unwrap();
        let record = ledger.commit_draft(kept.id, &time).unwrap();
        assert_eq!(record.net_salary, Money::from_major(25_000));
        assert!(ledger.draft(kept.id).unwrap_err().is_not_found());

        let stale = ledger.create_draft(&payroll_request("EMP-2", Some(10)), &time).unwrap();
        controller.advance(Duration::hours(25));
        assert_eq!(ledger.purge_expired_drafts(&time), 1);
        assert!(ledger.commit_draft(stale.id, &time).unwrap_err().is_not_found());

        let late = ledger.create_draft(&payroll_request("EMP-2", Some(10)), &time).unwrap();
        controller.advance(Duration::hours(30));
        assert_eq!(
            ledger.commit_draft(late.id, &time).unwrap_err(),
            LedgerError::DraftExpired { draft_id: late.id }
        );
    }

    #[test]
    fn test_emi_lifecycle() {
        let mut ledger = ledger();
        let time = time();
        let plan = ledger.create_emi_plan(&plan_request(3)).unwrap();

        ledger.record_fee_payment(&installment(plan.id, 1, 4_000), &time).unwrap();
        ledger.record_fee_payment(&installment(plan.id, 2, 4_000), &time).unwrap();
        assert_eq!(ledger.emi_plan(plan.id).unwrap().status, EmiStatus::Active);

        let pending = ledger.emi_pending_installments(plan.id, None).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].installment, 3);
        assert_eq!(pending[0].due_date, date(2024, 6, 5));

        ledger.record_fee_payment(&installment(plan.id, 3, 4_000), &time).unwrap();
        let completed = ledger.emi_plan(plan.id).unwrap();
        assert_eq!(completed.status, EmiStatus::Completed);
        assert_eq!(completed.completed_on, Some(date(2024, 4, 5)));

        let progress = ledger.emi_progress(plan.id, None).unwrap();
        assert!(progress.is_completed);
        assert_eq!(progress.total_paid, Money::from_major(12_000));

        let completion_events = ledger
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, Event::EmiPlanCompleted { .. }))
            .count();
        assert_eq!(completion_events, 1);

        let err = ledger.record_fee_payment(&installment(plan.id, 3, 4_000), &time).unwrap_err();
        assert_eq!(err, LedgerError::PlanCompleted { plan_id: plan.id });
    }

    #[test]
    fn test_installment_validation() {
        let mut ledger = ledger();
        let time = time();
        let plan = ledger.create_emi_plan(&plan_request(3)).unwrap();

        let err = ledger.record_fee_payment(&installment(plan.id, 4, 4_000), &time).unwrap_err();
        assert!(matches!(err, LedgerError::InstallmentOutOfRange { .. }));

        ledger.record_fee_payment(&installment(plan.id, 1, 4_000), &time).unwrap();
        let err = ledger.record_fee_payment(&installment(plan.id, 1, 4_000), &time).unwrap_err();
        assert_eq!(err, LedgerError::DuplicateInstallment { plan_id: plan.id, installment: 1 });

        let err = ledger.record_fee_payment(&installment(plan.id, 2, 0), &time).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPaymentAmount { .. }));

        let err = ledger.record_fee_payment(&installment(Uuid::new_v4(), 1, 4_000), &time).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_installment_without_plan_id_uses_active_plan() {
        let mut ledger = ledger();
        let time = time();
        let plan = ledger.create_emi_plan(&plan_request(2)).unwrap();

        let mut request = installment(plan.id, 1, 6_000);
        request.emi_plan_id = None;
        let payment = ledger.record_fee_payment(&request, &time).unwrap();

        assert_eq!(payment.emi_plan_id, Some(plan.id));
        assert_eq!(ledger.emi_progress(plan.id, None).unwrap().paid_installments, 1);
    }

    #[test]
    fn test_partial_installment_emits_unreconciled() {
        let mut ledger = ledger();
        let time = time();
        let plan = ledger.create_emi_plan(&plan_request(3)).unwrap();

        ledger.record_fee_payment(&installment(plan.id, 1, 1_000), &time).unwrap();

        let events = ledger.take_events();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PlanUnreconciled { plan_id, .. } if *plan_id == plan.id
        )));
        assert!(!ledger.emi_progress(plan.id, None).unwrap().reconciled);
    }

    #[test]
    fn test_missing_plan_is_not_found() {
        let ledger = ledger();
        assert!(ledger.emi_progress(Uuid::new_v4(), None).unwrap_err().is_not_found());
        assert!(ledger.emi_pending_installments(Uuid::new_v4(), None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_fee_summary_with_override_and_lump_sum() {
        let mut ledger = ledger();
        let time = time();

        let summary = ledger.fee_summary("STU-10", None).unwrap();
        assert_eq!(summary.outstanding, Money::from_major(5_000));

        ledger.store_mut().add_fee_structure(FeeStructure {
            student_id: "STU-10".to_string(),
            fee_type: "tuition".to_string(),
            amount: Money::from_major(4_000),
            academic_year: "2024-25".to_string(),
        });
        ledger
            .record_fee_payment(
                &FeePaymentRequest {
                    student_id: "STU-10".to_string(),
                    emi_plan_id: None,
                    amount: Money::from_major(6_000),
                    payment_date: None,
                    payment_mode: PaymentMode::Cash,
                    installment_number: None,
                    status: PaymentStatus::Completed,
                },
                &time,
            )
            .unwrap();

        let summary = ledger.fee_summary("STU-10", None).unwrap();
        assert_eq!(summary.total_fees, Money::from_major(4_000));
        assert_eq!(summary.total_paid, Money::from_major(6_000));
        assert_eq!(summary.outstanding, Money::ZERO);

        let payments = ledger.store().payments_for_student("STU-10");
        assert_eq!(payments[0].payment_date, date(2024, 4, 30));

        assert!(ledger.fee_summary("STU-404", None).unwrap_err().is_not_found());
    }
}
