/// outstanding fees with class templates and per-student overrides
use campus_finance_rs::chrono::{TimeZone, Utc};
use campus_finance_rs::views::FeeSummaryView;
use campus_finance_rs::{
    FeeFrequency, FeePaymentRequest, FeeStructure, GlobalClassFee, InMemoryStore, Ledger,
    LedgerConfig, LedgerResponse, Money, PaymentMode, PaymentStatus, SafeTimeProvider,
    StudentProfile, TimeSource, Uuid,
};

fn class_fee(fee_type: &str, amount: i64) -> GlobalClassFee {
    GlobalClassFee {
        id: Uuid::new_v4(),
        class_name: "Class 10".to_string(),
        fee_type: fee_type.to_string(),
        amount: Money::from_major(amount),
        frequency: FeeFrequency::Yearly,
        academic_year: "2024-25".to_string(),
        is_active: true,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap()));

    let mut store = InMemoryStore::new();
    store.add_student(StudentProfile {
        id: "STU-10".to_string(),
        name: "Meera".to_string(),
        class_name: "Class 10".to_string(),
        academic_year: "2024-25".to_string(),
        is_lead: false,
    });
    store.add_class_fee(class_fee("tuition", 5_000));
    store.add_class_fee(class_fee("transport", 1_200));
    // scholarship: tuition reduced for this student only
    store.add_fee_structure(FeeStructure {
        student_id: "STU-10".to_string(),
        fee_type: "Tuition".to_string(),
        amount: Money::from_major(4_000),
        academic_year: "2024-25".to_string(),
    });

    let mut ledger = Ledger::new(store, LedgerConfig::institutional())?;

    ledger.record_fee_payment(
        &FeePaymentRequest {
            student_id: "STU-10".to_string(),
            emi_plan_id: None,
            amount: Money::from_major(3_000),
            payment_date: None,
            payment_mode: PaymentMode::Upi,
            installment_number: None,
            status: PaymentStatus::Completed,
        },
        &time,
    )?;

    let summary = ledger.fee_summary("STU-10", None)?;
    println!("{}", LedgerResponse::FeeSummary(FeeSummaryView::from(&summary)).to_json_pretty()?);

    Ok(())
}
