//! Fault identifiers declared by the three detectors (spec §6, §7).

/// A terminal fault declaration. Each variant is irreversible within a
/// mission phase per spec §7: recovery is out of scope for this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Fault {
    ChronicIdle,
    PwrMonReadError,
    SourceDecay,
}

impl Fault {
    /// The exact fault identifier emitted in the safe-mode announcement.
    pub const fn name(&self) -> &'static str {
        match self {
            Fault::ChronicIdle => "chronic_idle",
            Fault::PwrMonReadError => "pwr_mon_read_error",
            Fault::SourceDecay => "source_decay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_names_match_wire_identifiers() {
        assert_eq!(Fault::ChronicIdle.name(), "chronic_idle");
        assert_eq!(Fault::PwrMonReadError.name(), "pwr_mon_read_error");
        assert_eq!(Fault::SourceDecay.name(), "source_decay");
    }
}
