#![cfg_attr(not(test), no_std)]

//! Fault-detection core for a CubeSat Electrical Power System (EPS).
//!
//! This crate implements three cooperating fault detectors that a scheduler
//! invokes once per main-loop pass:
//!
//! - [`detectors::chronic_idle`] — sliding-window MPPT idle detection gated
//!   on illumination evidence.
//! - [`detectors::read_error`] — daily liveness probe of the power monitor
//!   plus a delayed follow-up recheck.
//! - [`detectors::source_decay`] — hierarchical power-aggregation pipeline
//!   comparing long-term production against a first-month baseline.
//!
//! The three detectors never touch a peripheral directly: all hardware
//! access goes through the [`sensor::PowerMonitorBus`] and [`mppt::MpptBus`]
//! traits, and all fault escalation goes through [`safe_mode::SafeModeAnnouncer`].
//! [`context::EpsFaultCore`] owns the three detectors plus the flags they
//! share and is the single entry point a scheduler calls each tick.
//!
//! Unit tests run on the host: this crate is `no_std` only outside of
//! `cfg(test)`, the same pattern the wider embedded stack this crate shares
//! an ancestry with uses to keep pure logic host-testable without dragging
//! in a target toolchain.

pub mod config;
pub mod context;
pub mod detectors;
pub mod fault;
pub mod mppt;
pub mod safe_mode;
pub mod sensor;
pub mod time;
pub mod units;

pub use context::EpsFaultCore;
pub use fault::Fault;
