//! Header names of the spillage source file.

pub const DETECTION_START_TIME: &str = "Detection Start time";
pub const TOTAL_DETECTION_TIME: &str = "Total detection time";
pub const WASTAGE_PERCENTAGE: &str = "Approx. Wastage Percentage";
pub const ALERT_STATUS: &str = "Alert status";

/// Header row in the order the detector exports it.
pub const HEADER: [&str; 4] = [
    DETECTION_START_TIME,
    WASTAGE_PERCENTAGE,
    TOTAL_DETECTION_TIME,
    ALERT_STATUS,
];

/// Default path the source file is served under.
pub const DEFAULT_RESOURCE_PATH: &str = "/milk_spillage.csv";
