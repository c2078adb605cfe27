//! MPPT status interface (consumed, spec §6).

/// MPPT charge-tracking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum MpptStatus {
    /// Tracker is not drawing current from the array.
    ChargingIdle,
    /// Tracker is actively harvesting.
    Charging,
    /// Tracker has declared an internal fault.
    Fault,
}

/// The MPPT driver's status query and reinit operation.
///
/// Implemented by the MPPT driver. `reinit` has no return per spec §6: the
/// core treats it as fire-and-forget and relies on the next status sample
/// to observe whether it took effect.
pub trait MpptBus {
    /// Query the current charge-tracking status.
    fn charge_status(&mut self) -> MpptStatus;

    /// Power-cycle / reinitialize the tracker.
    fn reinit(&mut self);
}
