use chrono::Utc;

/// Clock seam for everything time-dependent (token freshness, purge
/// cutoffs), swappable for a fixed clock in tests.
pub trait ISys: Send + Sync {
    /// Current unix timestamp in milliseconds
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock, the default outside of tests
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
