/// quick start - payroll for one staff member from a manual day count
use campus_finance_rs::chrono::{TimeZone, Utc};
use campus_finance_rs::views::PayrollView;
use campus_finance_rs::{
    chrono::NaiveDate, InMemoryStore, Ledger, LedgerConfig, LedgerResponse, Money,
    PayrollRequest, SafeTimeProvider, StaffMember, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 3, 31, 9, 0, 0).unwrap()));

    let mut store = InMemoryStore::new();
    store.add_staff(StaffMember {
        id: "EMP-1".to_string(),
        name: "R. Iyer".to_string(),
        base_salary: Some(Money::from_major(30_000)),
        join_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
        active: true,
    });

    let mut ledger = Ledger::new(store, LedgerConfig::institutional())?;

    // 25 of 30 working days: 30000 * 25 / 30 = 25000
    let record = ledger.generate_payroll(
        &PayrollRequest {
            staff_id: "EMP-1".to_string(),
            month: 3,
            year: 2024,
            days_worked: Some(25),
            base_salary: None,
            allowances: Money::ZERO,
            other_deductions: Money::ZERO,
        },
        &time,
    )?;

    println!("{}", LedgerResponse::Payroll(PayrollView::from(&record)).to_json_pretty()?);

    Ok(())
}
