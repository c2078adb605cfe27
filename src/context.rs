//! Shared state & dispatch (spec §5).
//!
//! The three detectors communicate through two flags. Rather than expose
//! those as process-wide statics behind a lock (the pattern the rest of the
//! stack uses for genuinely concurrent peripherals), `EpsFaultCore` owns
//! them as plain fields of a single context passed to each detector's tick
//! method, per spec §9's "global mutable state -> single owner" guidance:
//! the scheduler is the only caller, execution is single-threaded and
//! cooperative, so there is nothing a lock would protect against here.

use crate::detectors::{ChronicIdleDetector, ReadErrorDetector, SourceDecayDetector};
use crate::mppt::MpptBus;
use crate::safe_mode::SafeModeAnnouncer;
use crate::sensor::{BusAddress, PowerMonitorBus};

/// Flags shared across the three detectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, defmt::Format)]
pub struct SharedFlags {
    /// Set by chronic-idle or source-decay when a sensor read errors; read
    /// and cleared only by the read-error detector's follow-up probe.
    pub read_error: bool,
    /// Latched by the source-decay handler; once set, also halves the
    /// chronic-idle firing cadence.
    pub source_decay: bool,
}

/// Owns the three detectors and the flags they share, and is the single
/// entry point a scheduler calls once per main-loop pass.
pub struct EpsFaultCore {
    pub chronic_idle: ChronicIdleDetector,
    pub read_error: ReadErrorDetector,
    pub source_decay: SourceDecayDetector,
    flags: SharedFlags,
}

impl EpsFaultCore {
    /// Construct with the flight-calibrated cadences, addressing the power
    /// monitor at `addr` on every read.
    pub fn new(addr: BusAddress) -> Self {
        Self {
            chronic_idle: ChronicIdleDetector::new(addr),
            read_error: ReadErrorDetector::new(addr),
            source_decay: SourceDecayDetector::new(addr),
            flags: SharedFlags::default(),
        }
    }

    /// Current shared-flag snapshot.
    pub fn flags(&self) -> SharedFlags {
        self.flags
    }

    /// Run one tick of all three detectors, in the deterministic order spec
    /// §5 documents: chronic-idle, read-error, source-decay.
    pub fn tick<M, P, A>(&mut self, mppt: &mut M, power: &mut P, announcer: &mut A)
    where
        M: MpptBus,
        P: PowerMonitorBus,
        A: SafeModeAnnouncer,
    {
        self.chronic_idle.tick(mppt, power, announcer, &mut self.flags);
        self.read_error.tick(power, announcer, &mut self.flags);
        self.source_decay.tick(power, announcer, &mut self.flags);
    }
}
