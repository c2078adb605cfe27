//! Power-monitor read-error detector (spec §4.3).
//!
//! Two independent probes share the `read_error` flag:
//!
//! - a daily liveness probe requiring two consecutive failures before
//!   escalating (single transient reads are tolerated);
//! - a delayed follow-up probe, armed whenever any other detector sets the
//!   shared flag, that rechecks all four registers about an hour later.
//!
//! Either probe failing declares `pwr_mon_read_error` with no recovery
//! attempt (spec §4.3, §7).

use crate::config::{DAILY_READ_PERIOD, READ_ERROR_DELAY};
use crate::context::SharedFlags;
use crate::fault::Fault;
use crate::safe_mode::{enter_safe_mode, SafeModeAnnouncer};
use crate::sensor::{BusAddress, PowerMonitorBus, SensorResult};
use crate::time::Cadence;

/// Attempt all four register reads, stopping at the first failure — the
/// same short-circuit the two-wire driver's original call sequence used.
fn probe_all_registers<P: PowerMonitorBus>(power: &mut P, addr: BusAddress) -> SensorResult<()> {
    power.read_temperature(addr)?;
    power.read_bus_voltage(addr)?;
    power.read_current(addr)?;
    power.read_power(addr)?;
    Ok(())
}

/// Detects a non-responsive power monitor (spec §4.3).
pub struct ReadErrorDetector {
    daily_cadence: Cadence,
    last_test_failed: bool,
    delay_counter: u32,
    follow_up_delay: u32,
    addr: BusAddress,
}

impl ReadErrorDetector {
    /// Construct with the flight-calibrated daily cadence and follow-up
    /// delay.
    pub fn new(addr: BusAddress) -> Self {
        Self::with_periods(addr, DAILY_READ_PERIOD, READ_ERROR_DELAY)
    }

    /// Construct with explicit daily-probe and follow-up-delay tick counts,
    /// for deterministic tests.
    pub fn with_periods(addr: BusAddress, daily_period: u32, follow_up_delay: u32) -> Self {
        Self {
            daily_cadence: Cadence::new(daily_period),
            last_test_failed: false,
            delay_counter: 0,
            follow_up_delay,
            addr,
        }
    }

    /// `true` if the previous daily probe failed and is awaiting
    /// confirmation.
    pub fn last_test_failed(&self) -> bool {
        self.last_test_failed
    }

    /// One scheduler tick: advances both probes and escalates to safe mode
    /// if either confirms a failure.
    pub fn tick<P, A>(&mut self, power: &mut P, announcer: &mut A, flags: &mut SharedFlags)
    where
        P: PowerMonitorBus,
        A: SafeModeAnnouncer,
    {
        let follow_up_failed = self.follow_up_read(power, flags);
        let daily_failed = self.daily_read(power);

        if follow_up_failed || daily_failed {
            defmt::error!("pwr_mon_read_error: confirmed, declaring fault");
            enter_safe_mode(announcer, Fault::PwrMonReadError);
        }
    }

    /// Delayed recheck, armed while `flags.read_error` is set by another
    /// detector. Returns `true` if the recheck fired and still failed.
    fn follow_up_read<P: PowerMonitorBus>(&mut self, power: &mut P, flags: &mut SharedFlags) -> bool {
        if !flags.read_error {
            return false;
        }

        if self.delay_counter >= self.follow_up_delay {
            self.delay_counter = 0;
            flags.read_error = false;
            let failed = probe_all_registers(power, self.addr).is_err();
            if failed {
                defmt::warn!("pwr_mon_read_error: follow-up recheck still failing");
            } else {
                defmt::info!("pwr_mon_read_error: follow-up recheck cleared");
            }
            failed
        } else {
            self.delay_counter += 1;
            false
        }
    }

    /// Daily liveness probe with two-strike confirmation. Returns `true`
    /// only on the *second* consecutive failure.
    fn daily_read<P: PowerMonitorBus>(&mut self, power: &mut P) -> bool {
        if !self.daily_cadence.tick() {
            return false;
        }

        if probe_all_registers(power, self.addr).is_err() {
            if self.last_test_failed {
                self.last_test_failed = false;
                true
            } else {
                defmt::warn!("pwr_mon_read_error: daily probe failed once, awaiting confirmation");
                self.last_test_failed = true;
                false
            }
        } else {
            self.last_test_failed = false;
            false
        }
    }
}
