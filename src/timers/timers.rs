use std::collections::HashMap;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use web_time::{Duration, Instant};
    } else {
        use std::time::{Duration, Instant};
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Stopwatch {
    start: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }

    fn elapsed(&self) -> Duration {
        // include the running interval if still active
        match self.start {
            Some(instant) => self.elapsed + instant.elapsed(),
            None => self.elapsed,
        }
    }
}

/// A flat collection of named timers.  Timers may be nested through
/// [`timeit!`](crate::timers::timeit), in which case the inner time is
/// also counted in the outer one.
#[derive(Default, Debug, Clone)]
pub struct Timers {
    stack: Vec<&'static str>,
    watches: HashMap<&'static str, Stopwatch>,
}

impl Timers {
    /// zero the timer named `key`, creating it if necessary
    pub fn reset_timer(&mut self, key: &'static str) {
        self.watches.insert(key, Stopwatch::default());
    }

    /// start the timer named `key` and make it the current one
    pub fn start_as_current(&mut self, key: &'static str) {
        self.watches.entry(key).or_default().start();
        self.stack.push(key);
    }

    /// stop the most recently started timer
    pub fn stop_current(&mut self) {
        if let Some(key) = self.stack.pop() {
            if let Some(w) = self.watches.get_mut(key) {
                w.stop();
            }
        }
    }

    /// accumulated time of the timer named `key`
    pub fn elapsed(&self, key: &'static str) -> Duration {
        self.watches
            .get(key)
            .map_or(Duration::ZERO, |w| w.elapsed())
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {

        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

#[test]
fn test_timers() {
    let mut timers = Timers::default();
    let mut count = 0;
    timeit! {timers => "outer"; {
        timeit! {timers => "inner"; {
            count += 1;
        }}
    }}
    assert_eq!(count, 1);
    assert!(timers.elapsed("outer") >= timers.elapsed("inner"));
    assert_eq!(timers.elapsed("missing"), Duration::ZERO);

    timers.reset_timer("outer");
    assert_eq!(timers.elapsed("outer"), Duration::ZERO);
}
