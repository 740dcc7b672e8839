/// payroll from attendance records, drafts and processing
use campus_finance_rs::chrono::{Duration, NaiveDate, TimeZone, Utc};
use campus_finance_rs::{
    AttendanceRecord, AttendanceStatus, InMemoryStore, Ledger, LedgerConfig, Money,
    PayrollRequest, SafeTimeProvider, StaffMember, TimeSource,
};
use rust_decimal_macros::dec;

fn request(days_worked: Option<i64>) -> PayrollRequest {
    PayrollRequest {
        staff_id: "EMP-7".to_string(),
        month: 4,
        year: 2024,
        days_worked,
        base_salary: None,
        allowances: Money::from_major(1_500),
        other_deductions: Money::from_major(200),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 4, 30, 17, 0, 0).unwrap()));
    let control = time.test_control().unwrap();

    let mut store = InMemoryStore::new();
    store.add_staff(StaffMember {
        id: "EMP-7".to_string(),
        name: "A. Menon".to_string(),
        base_salary: Some(Money::from_major(36_000)),
        join_date: NaiveDate::from_ymd_opt(2022, 7, 1).unwrap(),
        active: true,
    });
    for day in 1..=26 {
        let status = match day % 9 {
            0 => AttendanceStatus::Absent,
            4 => AttendanceStatus::HalfDay,
            _ => AttendanceStatus::Present,
        };
        store.add_attendance(AttendanceRecord {
            staff_id: "EMP-7".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            status,
            hours_worked: dec!(8),
        });
    }

    let mut ledger = Ledger::new(store, LedgerConfig::institutional())?;

    // preview as a draft first, then commit
    let draft = ledger.create_draft(&request(None), &time)?;
    println!("draft {} net {} expires {}", draft.id, draft.breakdown.net_salary, draft.expires_at);

    let record = ledger.commit_draft(draft.id, &time)?;
    println!(
        "committed {}: {} days attended, basic {}, net {}",
        record.id, record.attended_days, record.basic_salary, record.net_salary
    );

    // a manual override replaces the pending record for the same month
    let record = ledger.generate_payroll(&request(Some(30)), &time)?;
    println!("regenerated {}: net {}", record.id, record.net_salary);

    ledger.process_payroll(record.id, &time)?;
    if let Err(e) = ledger.generate_payroll(&request(Some(20)), &time) {
        println!("regeneration refused: {}", e);
    }

    // stale drafts are purged after their ttl
    ledger.create_draft(&request(Some(10)), &time)?;
    control.advance(Duration::hours(48));
    println!("purged {} expired drafts", ledger.purge_expired_drafts(&time));

    for event in ledger.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
