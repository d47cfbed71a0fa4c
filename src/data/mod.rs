//! In-memory summary of one cpustat run

pub mod hardware;
pub mod system;

pub use hardware::{CpuInfo, FrequencyInfo};
pub use system::{DistributionInfo, HardwareSummary, KernelInfo};

/// Placeholder printed wherever a field could not be determined
pub const UNKNOWN: &str = "Unknown";

/// Borrow an optional field as display text
pub fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN)
}

/// Serializers that round at the output boundary; the structs keep full precision.
pub(crate) mod rounded {
    use crate::utils::parsing::round_to;
    use serde::Serializer;

    pub fn two_places<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(round_to(*value, 2))
    }

    pub fn one_place_opt<S: Serializer>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&round_to(*v, 1)),
            None => serializer.serialize_none(),
        }
    }
}
