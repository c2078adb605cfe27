//! Chronic-idle detector (spec §4.2).
//!
//! Observes the MPPT's charge status every firing. A run of 8 consecutive
//! idle observations — roughly 4 hours, given the calibrated cadence —
//! triggers a reinit attempt; if the idle persists through a second run of
//! 8, the fault is declared and the core enters safe mode. A single
//! non-idle observation anywhere in the run resets all evidence.

use crate::config::{DAYLIGHT_TEMP_LIM, DAYLIGHT_VOLT_LIM, PASS_REQ};
use crate::context::SharedFlags;
use crate::fault::Fault;
use crate::mppt::{MpptBus, MpptStatus};
use crate::safe_mode::{enter_safe_mode, SafeModeAnnouncer};
use crate::sensor::{BusAddress, PowerMonitorBus};
use crate::time::Cadence;
use crate::units::{raw_to_celsius, raw_to_millivolts};

/// Sliding-window consecutive-idle counter (spec §3, §9).
///
/// Bit *i* records whether the MPPT was idle at the *i*-th most recent
/// firing. `0xFF` means the last 8 firings were all idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct IdleEvidenceWindow(u8);

impl IdleEvidenceWindow {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Record one observation. A non-idle observation clears all evidence;
    /// an idle observation shifts it in.
    pub fn record_event(&mut self, idle: bool) {
        self.0 = if idle { (self.0 << 1) | 1 } else { 0 };
    }

    /// `true` once 8 consecutive idle observations have been recorded.
    pub fn saturated(&self) -> bool {
        self.0 == 0xFF
    }

    /// Raw bit pattern, exposed for tests asserting partial evidence.
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl Default for IdleEvidenceWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Detects a solar MPPT stuck in its idle charge state while the vehicle is
/// illuminated (spec §4.2).
pub struct ChronicIdleDetector {
    cadence: Cadence,
    base_pass_req: u32,
    evidence: IdleEvidenceWindow,
    mppt_was_reset: bool,
    addr: BusAddress,
}

impl ChronicIdleDetector {
    /// Construct with the flight-calibrated cadence.
    pub fn new(addr: BusAddress) -> Self {
        Self::with_pass_req(addr, PASS_REQ)
    }

    /// Construct with an explicit pass-count threshold, for deterministic
    /// tests that don't want to spend real `PASS_REQ` ticks per firing.
    pub fn with_pass_req(addr: BusAddress, pass_req: u32) -> Self {
        Self {
            cadence: Cadence::new(pass_req),
            base_pass_req: pass_req,
            evidence: IdleEvidenceWindow::new(),
            mppt_was_reset: false,
            addr,
        }
    }

    /// Current evidence window, for diagnostics and tests.
    pub fn evidence(&self) -> IdleEvidenceWindow {
        self.evidence
    }

    /// `true` if a reinit has been issued and not yet cleared by a non-idle
    /// observation.
    pub fn mppt_was_reset(&self) -> bool {
        self.mppt_was_reset
    }

    /// One scheduler tick. `flags.source_decay` divides the firing cadence
    /// (spec §4.2); `flags.read_error` is set if the handler's illumination
    /// check hits a sensor fault.
    pub fn tick<M, P, A>(
        &mut self,
        mppt: &mut M,
        power: &mut P,
        announcer: &mut A,
        flags: &mut SharedFlags,
    ) where
        M: MpptBus,
        P: PowerMonitorBus,
        A: SafeModeAnnouncer,
    {
        let divisor = if flags.source_decay { 2 } else { 1 };
        self.cadence.set_threshold(self.base_pass_req / divisor);

        if !self.cadence.tick() {
            return;
        }

        match mppt.charge_status() {
            MpptStatus::ChargingIdle => {
                self.evidence.record_event(true);
                defmt::info!("chronic idle: idle observed, evidence = {:08b}", self.evidence.bits());
                if self.evidence.saturated() {
                    self.handle(mppt, power, announcer, flags);
                }
            }
            _ => {
                self.evidence.record_event(false);
                self.mppt_was_reset = false;
            }
        }
    }

    fn handle<M, P, A>(&mut self, mppt: &mut M, power: &mut P, announcer: &mut A, flags: &mut SharedFlags)
    where
        M: MpptBus,
        P: PowerMonitorBus,
        A: SafeModeAnnouncer,
    {
        if self.mppt_was_reset {
            defmt::error!("chronic idle: reinit did not clear idle, declaring fault");
            enter_safe_mode(announcer, Fault::ChronicIdle);
            return;
        }

        let temp = power.read_temperature(self.addr);
        let volt = power.read_bus_voltage(self.addr);

        match (temp, volt) {
            (Ok(temp_raw), Ok(volt_raw)) => {
                let temp_c = raw_to_celsius(temp_raw);
                let volt_mv = raw_to_millivolts(volt_raw);
                if temp_c >= DAYLIGHT_TEMP_LIM && volt_mv >= DAYLIGHT_VOLT_LIM {
                    defmt::info!("chronic idle: sunlit and idle, reinitializing MPPT");
                    mppt.reinit();
                    self.mppt_was_reset = true;
                } else {
                    defmt::info!("chronic idle: not sunlit, deferring to eclipse explanation");
                }
            }
            _ => {
                defmt::warn!("chronic idle: illumination check hit a sensor fault");
                flags.read_error = true;
            }
        }
    }
}
