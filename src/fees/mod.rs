pub mod aggregator;
pub mod resolution;

pub use aggregator::{FeeOutstandingAggregator, FeeSummary};
pub use resolution::{
    applicable_class_fees, resolve_effective_fees, EffectiveFee, FeeSource, FeeStructure,
    GlobalClassFee,
};
