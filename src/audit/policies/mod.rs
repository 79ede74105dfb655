mod staleness;

pub use staleness::{StalenessPolicy, DEFAULT_STALENESS_HOURS};
