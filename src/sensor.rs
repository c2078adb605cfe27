//! Power-monitor sensor interface (consumed, spec §6).
//!
//! The two-wire bus driver is an external collaborator: it knows how to
//! address the power monitor and return a raw register value or a failure.
//! This module only defines the contract the detectors program against.

/// One of the four power-monitor measurement channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SensorChannel {
    Temperature,
    Voltage,
    Current,
    Power,
}

impl SensorChannel {
    /// The exact wire status tag the existing two-wire driver emits for this
    /// channel on failure. Preserved verbatim for wire compatibility even
    /// though the Rust-side error type is structured.
    pub const fn error_tag(self) -> &'static str {
        match self {
            SensorChannel::Temperature => "ERRORT\r\n",
            SensorChannel::Voltage => "ERRORV\r\n",
            SensorChannel::Current => "ERRORC\r\n",
            SensorChannel::Power => "ERRORP\r\n",
        }
    }
}

/// A failed power-monitor register read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct SensorFault(pub SensorChannel);

impl SensorFault {
    /// The exact wire status tag associated with this failure.
    pub const fn tag(&self) -> &'static str {
        self.0.error_tag()
    }
}

/// Result of a single power-monitor register read.
pub type SensorResult<T> = core::result::Result<T, SensorFault>;

/// Bus device addressing, primary + secondary per spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusAddress {
    pub primary: u8,
    pub secondary: u8,
}

/// The four synchronous power-monitor register reads the core depends on.
///
/// Implemented by the two-wire bus driver. Each read is assumed atomic and
/// bounded in time (spec §5); the core never retries at this layer — retry
/// and confirmation policy live in [`crate::detectors::read_error`].
pub trait PowerMonitorBus {
    /// Read the die temperature register (raw LSB, data-sheet scaled by
    /// [`crate::units::raw_to_celsius`]).
    fn read_temperature(&mut self, addr: BusAddress) -> SensorResult<i16>;

    /// Read the shunt bus-voltage register (raw LSB, scaled by
    /// [`crate::units::raw_to_millivolts`]).
    fn read_bus_voltage(&mut self, addr: BusAddress) -> SensorResult<i16>;

    /// Read the shunt current register (raw LSB).
    fn read_current(&mut self, addr: BusAddress) -> SensorResult<i16>;

    /// Read the computed power register (raw LSB, scaled by
    /// [`crate::units::raw_to_watts`]).
    fn read_power(&mut self, addr: BusAddress) -> SensorResult<i32>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Scripted [`PowerMonitorBus`] for detector unit tests: each channel
    /// reads an injected value until told otherwise, or errors when armed.
    pub struct MockPowerMonitor {
        pub temp: SensorResult<i16>,
        pub volt: SensorResult<i16>,
        pub current: SensorResult<i16>,
        pub power: SensorResult<i32>,
    }

    impl MockPowerMonitor {
        pub fn all_ok(temp: i16, volt: i16, current: i16, power: i32) -> Self {
            Self {
                temp: Ok(temp),
                volt: Ok(volt),
                current: Ok(current),
                power: Ok(power),
            }
        }

        pub fn zeroed() -> Self {
            Self::all_ok(0, 0, 0, 0)
        }
    }

    impl PowerMonitorBus for MockPowerMonitor {
        fn read_temperature(&mut self, _addr: BusAddress) -> SensorResult<i16> {
            self.temp
        }

        fn read_bus_voltage(&mut self, _addr: BusAddress) -> SensorResult<i16> {
            self.volt
        }

        fn read_current(&mut self, _addr: BusAddress) -> SensorResult<i16> {
            self.current
        }

        fn read_power(&mut self, _addr: BusAddress) -> SensorResult<i32> {
            self.power
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_tags_match_wire_protocol() {
        assert_eq!(SensorChannel::Temperature.error_tag(), "ERRORT\r\n");
        assert_eq!(SensorChannel::Voltage.error_tag(), "ERRORV\r\n");
        assert_eq!(SensorChannel::Current.error_tag(), "ERRORC\r\n");
        assert_eq!(SensorChannel::Power.error_tag(), "ERRORP\r\n");
    }
}
