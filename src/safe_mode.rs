//! Safe-mode announcement interface (produced, spec §6).
//!
//! The wire format is exactly specified: `"Entering Safety Mode\n"` followed
//! by `"Fault: <name>\n"`. This module owns building that text; the sink it
//! is written to (UART, log buffer, whatever the platform provides) is an
//! external collaborator.
//!
//! Not every declared fault enters safe mode: `chronic_idle` and
//! `pwr_mon_read_error` are terminal and announce both lines via
//! [`enter_safe_mode`], but `source_decay` is a sticky, non-terminal
//! condition that only feeds back into chronic-idle's cadence (spec §4.4)
//! and announces just its fault line via [`declare_fault`].

use core::fmt::Write as _;

use crate::fault::Fault;

/// Maximum length of a single announcement line, sized generously for the
/// longest fault name (`pwr_mon_read_error`).
const LINE_CAP: usize = 32;

/// Receives the exact safe-mode announcement text, one line at a time
/// (each line includes its trailing `\n`).
pub trait SafeModeAnnouncer {
    fn announce_line(&mut self, line: &str);
}

fn fault_line(fault: Fault) -> heapless::String<LINE_CAP> {
    let mut line: heapless::String<LINE_CAP> = heapless::String::new();
    // heapless::String's Write impl cannot fail for content that fits LINE_CAP.
    let _ = write!(line, "Fault: {}\n", fault.name());
    line
}

/// Enter safe mode: emit the two specified lines through `announcer`.
///
/// This is the sole user-visible output of the core (spec §7) for the two
/// terminal faults (`chronic_idle`, `pwr_mon_read_error`). It also logs
/// structurally via `defmt` so the event shows up in the platform's normal
/// diagnostic stream, independent of the exact wire text.
pub fn enter_safe_mode<A: SafeModeAnnouncer>(announcer: &mut A, fault: Fault) {
    defmt::error!("entering safe mode, fault = {}", fault);

    announcer.announce_line("Entering Safety Mode\n");
    announcer.announce_line(fault_line(fault).as_str());
}

/// Declare a non-terminal fault: emit only the fault-identifier line, with
/// no `"Entering Safety Mode\n"` line.
///
/// Used by `source_decay`, whose handler sets a sticky flag and alters
/// chronic-idle's cadence rather than placing the vehicle into safe mode
/// (spec §4.4; the original source's `handle_source_decay` only ever prints
/// its fault line, unlike `handle_chronic_idle` and
/// `handle_pwr_mon_read_error`).
pub fn declare_fault<A: SafeModeAnnouncer>(announcer: &mut A, fault: Fault) {
    defmt::error!("fault declared (non-terminal), fault = {}", fault);

    announcer.announce_line(fault_line(fault).as_str());
}
