//! Source-decay detector (spec §4.4).
//!
//! A hierarchical averaging pipeline — minute, hour, day, month — feeds a
//! 128-slot monthly log. The first completed month becomes the baseline;
//! every later month is compared against `baseline * CAP_THRESHOLD` the
//! instant it closes, using the value just computed rather than re-reading
//! the ring buffer (spec §9's fix for the documented off-by-one).

use heapless::HistoryBuffer;

use crate::config::{CAP_THRESHOLD, DAYS_PER_MONTH, HOURS_PER_DAY, MINUTES_PER_HOUR, MONTHS_LOG_SZ, PASS_REQ};
use crate::context::SharedFlags;
use crate::fault::Fault;
use crate::safe_mode::{declare_fault, SafeModeAnnouncer};
use crate::sensor::{BusAddress, PowerMonitorBus};
use crate::time::Cadence;
use crate::units::raw_to_watts;

/// Fixed-capacity running sum that closes out and resets once `CAP` values
/// have been added, handing its caller the stage average.
#[derive(Debug, Clone, Copy, defmt::Format)]
struct Accumulator<const CAP: u32> {
    sum: f32,
    count: u32,
}

impl<const CAP: u32> Accumulator<CAP> {
    const fn new() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    /// Add one sample. Returns the stage average exactly on the sample that
    /// fills the stage, and resets for the next period.
    fn add(&mut self, value: f32) -> Option<f32> {
        self.sum += value;
        self.count += 1;
        if self.count == CAP {
            let avg = self.sum / CAP as f32;
            self.sum = 0.0;
            self.count = 0;
            Some(avg)
        } else {
            None
        }
    }
}

/// Detects sustained production decay against a first-month baseline (spec
/// §4.4).
pub struct SourceDecayDetector {
    cadence: Cadence,
    addr: BusAddress,
    minutes: Accumulator<MINUTES_PER_HOUR>,
    hours: Accumulator<HOURS_PER_DAY>,
    days: Accumulator<DAYS_PER_MONTH>,
    months_log: HistoryBuffer<f32, MONTHS_LOG_SZ>,
    baseline: Option<f32>,
    decayed: bool,
}

impl SourceDecayDetector {
    /// Construct with the flight-calibrated cadence.
    pub fn new(addr: BusAddress) -> Self {
        Self::with_pass_req(addr, PASS_REQ)
    }

    /// Construct with an explicit pass-count threshold, for deterministic
    /// tests.
    pub fn with_pass_req(addr: BusAddress, pass_req: u32) -> Self {
        Self {
            cadence: Cadence::new(pass_req),
            addr,
            minutes: Accumulator::new(),
            hours: Accumulator::new(),
            days: Accumulator::new(),
            months_log: HistoryBuffer::new(),
            baseline: None,
            decayed: false,
        }
    }

    /// The captured first-month baseline, once set.
    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    /// Most recently logged monthly averages, oldest first.
    pub fn months_log(&self) -> &HistoryBuffer<f32, MONTHS_LOG_SZ> {
        &self.months_log
    }

    /// One scheduler tick. Inert once decay has been declared (spec §4.4).
    pub fn tick<P, A>(&mut self, power: &mut P, announcer: &mut A, flags: &mut SharedFlags)
    where
        P: PowerMonitorBus,
        A: SafeModeAnnouncer,
    {
        if self.decayed {
            return;
        }

        if !self.cadence.tick() {
            return;
        }

        self.log_current_power(power, announcer, flags);
    }

    fn log_current_power<P, A>(&mut self, power: &mut P, announcer: &mut A, flags: &mut SharedFlags)
    where
        P: PowerMonitorBus,
        A: SafeModeAnnouncer,
    {
        let raw = match power.read_power(self.addr) {
            Ok(raw) => raw,
            Err(_) => {
                defmt::warn!("source decay: power read failed");
                flags.read_error = true;
                return;
            }
        };

        let Some(minute_avg) = self.minutes.add(raw_to_watts(raw)) else {
            return;
        };
        let Some(hour_avg) = self.hours.add(minute_avg) else {
            return;
        };
        let Some(day_avg) = self.days.add(hour_avg) else {
            return;
        };

        self.months_log.write(day_avg);

        match self.baseline {
            None => {
                defmt::info!("source decay: baseline captured, {} W", day_avg);
                self.baseline = Some(day_avg);
            }
            Some(baseline) => {
                let floor = baseline * CAP_THRESHOLD;
                defmt::info!("source decay: month closed at {} W, floor {} W", day_avg, floor);
                if day_avg < floor {
                    self.handle(announcer, flags);
                }
            }
        }
    }

    /// Sets the sticky `source_decay` flag and announces the fault
    /// identifier. Unlike the other two detectors' handlers, this does not
    /// enter safe mode: source decay is a non-terminal condition that only
    /// feeds back into chronic-idle's cadence (spec §4.2, §4.4).
    fn handle<A: SafeModeAnnouncer>(&mut self, announcer: &mut A, flags: &mut SharedFlags) {
        defmt::error!("source decay: monthly average below baseline floor, declaring fault");
        self.decayed = true;
        flags.source_decay = true;
        declare_fault(announcer, Fault::SourceDecay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe_mode::mock::RecordingAnnouncer;
    use crate::sensor::mock::MockPowerMonitor;

    const ADDR: BusAddress = BusAddress {
        primary: 0,
        secondary: 0,
    };

    const MONTH_TICKS: u32 = MINUTES_PER_HOUR * HOURS_PER_DAY * DAYS_PER_MONTH;

    #[test]
    fn accumulator_closes_out_on_the_capacity_th_sample() {
        let mut acc: Accumulator<3> = Accumulator::new();
        assert_eq!(acc.add(1.0), None);
        assert_eq!(acc.add(2.0), None);
        assert_eq!(acc.add(3.0), Some(2.0));
        // resets after closing
        assert_eq!(acc.add(9.0), None);
    }

    #[test]
    fn read_error_sets_shared_flag_and_does_not_advance_pipeline() {
        let mut detector = SourceDecayDetector::with_pass_req(ADDR, 0);
        let mut power = MockPowerMonitor {
            temp: Ok(0),
            volt: Ok(0),
            current: Ok(0),
            power: Err(crate::sensor::SensorFault(crate::sensor::SensorChannel::Power)),
        };
        let mut announcer = RecordingAnnouncer::new();
        let mut flags = SharedFlags::default();

        detector.tick(&mut power, &mut announcer, &mut flags);

        assert!(flags.read_error);
        assert_eq!(detector.minutes.count, 0);
    }

    #[test]
    fn first_full_month_of_constant_power_becomes_the_baseline_exactly() {
        let mut detector = SourceDecayDetector::with_pass_req(ADDR, 0);
        // 1.0 W constant, per spec §8's "every minute records power p" property.
        let mut power = MockPowerMonitor::all_ok(0, 0, 0, 5);
        let mut announcer = RecordingAnnouncer::new();
        let mut flags = SharedFlags::default();

        for _ in 0..MONTH_TICKS {
            detector.tick(&mut power, &mut announcer, &mut flags);
        }

        assert_eq!(detector.baseline(), Some(1.0));
        assert!(announcer.lines.is_empty());
    }

    #[test]
    fn second_month_below_cap_threshold_declares_decay() {
        let mut detector = SourceDecayDetector::with_pass_req(ADDR, 0);
        let mut announcer = RecordingAnnouncer::new();
        let mut flags = SharedFlags::default();

        let mut baseline_power = MockPowerMonitor::all_ok(0, 0, 0, 50); // 10.0 W
        for _ in 0..MONTH_TICKS {
            detector.tick(&mut baseline_power, &mut announcer, &mut flags);
        }
        assert_eq!(detector.baseline(), Some(10.0));

        let mut decayed_power = MockPowerMonitor::all_ok(0, 0, 0, 35); // 7.0 W, below 10*0.8=8.0
        for _ in 0..MONTH_TICKS {
            detector.tick(&mut decayed_power, &mut announcer, &mut flags);
        }

        assert!(flags.source_decay);
        assert_eq!(announcer.lines.len(), 1, "source decay must not enter safe mode");
        assert_eq!(announcer.lines[0].as_str(), "Fault: source_decay\n");
    }

    #[test]
    fn month_at_or_above_cap_threshold_does_not_declare_decay() {
        let mut detector = SourceDecayDetector::with_pass_req(ADDR, 0);
        let mut announcer = RecordingAnnouncer::new();
        let mut flags = SharedFlags::default();

        let mut baseline_power = MockPowerMonitor::all_ok(0, 0, 0, 50); // 10.0 W
        for _ in 0..MONTH_TICKS {
            detector.tick(&mut baseline_power, &mut announcer, &mut flags);
        }

        let mut steady_power = MockPowerMonitor::all_ok(0, 0, 0, 45); // 9.0 W, above the 8.0 floor
        for _ in 0..MONTH_TICKS {
            detector.tick(&mut steady_power, &mut announcer, &mut flags);
        }

        assert!(!flags.source_decay);
        assert!(announcer.lines.is_empty());
    }

    #[test]
    fn detector_goes_inert_after_decay_is_declared() {
        let mut detector = SourceDecayDetector::with_pass_req(ADDR, 0);
        let mut announcer = RecordingAnnouncer::new();
        let mut flags = SharedFlags::default();

        let mut baseline_power = MockPowerMonitor::all_ok(0, 0, 0, 50);
        for _ in 0..MONTH_TICKS {
            detector.tick(&mut baseline_power, &mut announcer, &mut flags);
        }
        let mut decayed_power = MockPowerMonitor::all_ok(0, 0, 0, 35);
        for _ in 0..MONTH_TICKS {
            detector.tick(&mut decayed_power, &mut announcer, &mut flags);
        }
        assert_eq!(announcer.lines.len(), 1);

        // A third month, also below floor, must not produce further output.
        for _ in 0..MONTH_TICKS {
            detector.tick(&mut decayed_power, &mut announcer, &mut flags);
        }
        assert_eq!(announcer.lines.len(), 1, "detector must stay inert once decayed");
    }
}
