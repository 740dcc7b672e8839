pub mod mandate;
pub mod plan;
pub mod tracker;

pub use mandate::{EMandate, MandateStatus};
pub use plan::{EmiPlan, EmiTerms};
pub use tracker::{
    EmiProgressTracker, InstallmentStatus, PaymentProgress, PendingInstallment,
};
