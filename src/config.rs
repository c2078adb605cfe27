//! Calibrated constants for the EPS fault-detection core.
//!
//! Every value here is fixed at compile time; per the system spec there is
//! no configuration file and no runtime config surface; these are all the
//! knobs a ground-side firmware rebuild would turn to recalibrate.

/// Main-loop passes per ~1 minute. Calibrated against the target MCU's
/// superloop period; the detectors express every other cadence as a
/// multiple of this value.
pub const PASS_REQ: u32 = 7999;

/// Temperature floor (°C) above which the vehicle is considered sunlit.
pub const DAYLIGHT_TEMP_LIM: f32 = 50.0;

/// Bus-voltage floor (mV) above which the vehicle is considered sunlit.
///
/// Tentative: zero makes this gate trivially true until recalibrated
/// against flight data.
pub const DAYLIGHT_VOLT_LIM: f32 = 0.0;

/// Data-sheet conversion factor, °C per LSB.
pub const TEMP_CONVERT_FAC: f32 = 0.125;

/// Data-sheet conversion factor, mV per LSB.
pub const VOLT_CONVERT_FAC: f32 = 3.125;

/// Full-scale current used to derive `CURRENT_LSB` for the power conversion.
pub const MAXIMUM_EXPECTED_CURRENT: f32 = 32768.0;

/// Fraction of the baseline monthly average below which source decay is
/// declared.
pub const CAP_THRESHOLD: f32 = 0.8;

/// Depth of the circular monthly-average log.
pub const MONTHS_LOG_SZ: usize = 128;

/// Minutes per day, used to derive the daily-probe cadence.
pub const READ_ERROR_PASS_CONSTANT: u32 = 1440;

/// Ticks between a sensor read failure and the delayed follow-up recheck
/// (~1 hour).
pub const READ_ERROR_DELAY: u32 = PASS_REQ * 60;

/// Ticks between daily read-error probes (~1 day).
pub const DAILY_READ_PERIOD: u32 = PASS_REQ * READ_ERROR_PASS_CONSTANT;

/// Samples per minute-average (§4.4 stage 1).
pub const MINUTES_PER_HOUR: u32 = 60;

/// Samples per hour-average (§4.4 stage 2).
pub const HOURS_PER_DAY: u32 = 24;

/// Samples per day-average (§4.4 stage 3).
pub const DAYS_PER_MONTH: u32 = 30;
