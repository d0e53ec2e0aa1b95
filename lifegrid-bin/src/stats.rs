//! Named phase timers and gauges for the demo loop.
//!
//! Counters record a start and stop stamp in milliseconds; the latest stamp
//! wins, so in a loop each counter reports the most recent pass. Gauges hold
//! a plain value. `Display` renders everything sorted by name.

use std::collections::BTreeMap;
use std::fmt;

pub const ITERATE: &str = "Iterate";
pub const RENDER: &str = "Render";
pub const GEN_RATE: &str = "Generation Rate";

#[derive(Default)]
struct Counter {
    start: u64,
    stop: u64,
}

#[derive(Default)]
pub struct Stats {
    counters: BTreeMap<&'static str, Counter>,
    values: BTreeMap<&'static str, u64>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, name: &'static str, time: u64) {
        self.counters.entry(name).or_default().start = time;
    }

    pub fn stop(&mut self, name: &'static str, time: u64) {
        self.counters.entry(name).or_default().stop = time;
    }

    pub fn set(&mut self, name: &'static str, value: u64) {
        self.values.insert(name, value);
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics:")?;
        for (name, counter) in &self.counters {
            // A counter stopped before (or without) starting reads as 0
            // rather than underflowing.
            writeln!(f, "{name}: {} ms", counter.stop.saturating_sub(counter.start))?;
        }
        for (name, value) in &self.values {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_no_stats() {
        let stats = Stats::new();
        assert_eq!(stats.to_string(), "Statistics:\n");
    }

    #[test]
    fn start_stop_single_counter() {
        let mut stats = Stats::new();
        stats.start("TestCounter", 100);
        stats.stop("TestCounter", 150);
        assert_eq!(stats.to_string(), "Statistics:\nTestCounter: 50 ms\n");
    }

    #[test]
    fn multiple_counters_print_sorted_by_name() {
        let mut stats = Stats::new();
        stats.start("CounterB", 50);
        stats.stop("CounterB", 150);
        stats.start("CounterA", 10);
        stats.stop("CounterA", 30);
        assert_eq!(
            stats.to_string(),
            "Statistics:\nCounterA: 20 ms\nCounterB: 100 ms\n"
        );
    }

    #[test]
    fn later_start_overwrites_earlier() {
        let mut stats = Stats::new();
        stats.start("Overwrite", 10);
        stats.start("Overwrite", 20);
        stats.stop("Overwrite", 50);
        assert_eq!(stats.to_string(), "Statistics:\nOverwrite: 30 ms\n");
    }

    #[test]
    fn later_stop_overwrites_earlier() {
        let mut stats = Stats::new();
        stats.start("Overwrite", 10);
        stats.stop("Overwrite", 50);
        stats.stop("Overwrite", 60);
        assert_eq!(stats.to_string(), "Statistics:\nOverwrite: 50 ms\n");
    }

    #[test]
    fn stop_before_start_still_measures() {
        let mut stats = Stats::new();
        stats.stop("BeforeStart", 50);
        stats.start("BeforeStart", 10);
        assert_eq!(stats.to_string(), "Statistics:\nBeforeStart: 40 ms\n");
    }

    #[test]
    fn start_without_stop_saturates_to_zero() {
        let mut stats = Stats::new();
        stats.start("NotStopped", 10);
        assert_eq!(stats.to_string(), "Statistics:\nNotStopped: 0 ms\n");
    }

    #[test]
    fn gauges_print_after_counters() {
        let mut stats = Stats::new();
        stats.start(ITERATE, 1000);
        stats.stop(ITERATE, 1050);
        stats.set(GEN_RATE, 120);
        assert_eq!(
            stats.to_string(),
            "Statistics:\nIterate: 50 ms\nGeneration Rate: 120\n"
        );
    }
}
