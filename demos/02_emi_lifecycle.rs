/// emi plan from creation to completion
use campus_finance_rs::chrono::{NaiveDate, TimeZone, Utc};
use campus_finance_rs::views::{EmiProgressView, PendingInstallmentView};
use campus_finance_rs::{
    EMandate, EmiFrequency, EmiPlanRequest, FeePaymentRequest, InMemoryStore, Ledger,
    LedgerConfig, LedgerResponse, MandateStatus, Money, PaymentMode, PaymentStatus,
    SafeTimeProvider, StudentProfile, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()));

    let mut store = InMemoryStore::new();
    store.add_student(StudentProfile {
        id: "STU-21".to_string(),
        name: "Kabir".to_string(),
        class_name: "Class 8".to_string(),
        academic_year: "2024-25".to_string(),
        is_lead: false,
    });

    let mut ledger = Ledger::new(store, LedgerConfig::institutional())?;

    // 10000 over 3 monthly installments: 3333.33, 3333.33, 3333.34
    let plan = ledger.create_emi_plan(&EmiPlanRequest {
        student_id: "STU-21".to_string(),
        total_amount: Money::from_major(10_000),
        down_payment: Money::ZERO,
        discount: Money::ZERO,
        number_of_installments: 3,
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        frequency: EmiFrequency::Monthly,
    })?;

    ledger.attach_mandate(EMandate {
        id: Uuid::new_v4(),
        plan_id: plan.id,
        bank_reference: "NACH-000123".to_string(),
        max_debit_amount: Money::from_major(5_000),
        frequency: EmiFrequency::Monthly,
        valid_from: plan.start_date,
        valid_until: None,
        status: MandateStatus::Active,
    })?;

    let pay = |installment: u32| FeePaymentRequest {
        student_id: "STU-21".to_string(),
        emi_plan_id: Some(plan.id),
        amount: plan.amount_due(installment),
        payment_date: None,
        payment_mode: PaymentMode::EMandate,
        installment_number: Some(installment),
        status: PaymentStatus::Completed,
    };

    ledger.record_fee_payment(&pay(1), &time)?;

    let today = time.now().date_naive();
    let pending = ledger.emi_pending_installments(plan.id, Some(today))?;
    let views = pending.iter().map(PendingInstallmentView::from).collect();
    println!("{}", LedgerResponse::PendingInstallments(views).to_json_pretty()?);

    ledger.record_fee_payment(&pay(2), &time)?;
    ledger.record_fee_payment(&pay(3), &time)?;

    let progress = ledger.emi_progress(plan.id, Some(today))?;
    println!("{}", LedgerResponse::EmiProgress(EmiProgressView::from(&progress)).to_json_pretty()?);

    for event in ledger.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
