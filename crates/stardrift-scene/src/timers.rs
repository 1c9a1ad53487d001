//! Millisecond timer queue pumped by the frame driver.
//!
//! Nothing here runs on its own: the driver calls [`Timers::take_due`] with
//! the current clock reading and acts on the events it gets back.

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// Arm the periodic star spawner.
    StartSpawnInterval,
    /// Spawn one shooting star from the periodic spawner.
    SpawnStar,
    /// Spawn one shooting star of an input-triggered burst.
    BurstStar,
    /// Scroll input went quiet.
    ScrollSettled,
    /// Begin sampling frame rate.
    StartQualityMonitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
    event: TimerEvent,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once, `delay_ms` after `now_ms`.
    pub fn after(&mut self, now_ms: u64, delay_ms: u64, event: TimerEvent) -> TimerId {
        self.schedule(now_ms.saturating_add(delay_ms), None, event)
    }

    /// Fire `event` every `period_ms`, first at `now_ms + period_ms`.
    pub fn every(&mut self, now_ms: u64, period_ms: u64, event: TimerEvent) -> TimerId {
        let period = period_ms.max(1);
        self.schedule(now_ms.saturating_add(period), Some(period), event)
    }

    fn schedule(&mut self, due_ms: u64, period_ms: Option<u64>, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due_ms,
            period_ms,
            event,
        });
        id
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every outstanding timer, returning how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Drop every outstanding timer carrying `event`, returning how many.
    pub fn cancel_event(&mut self, event: TimerEvent) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.event != event);
        before - self.entries.len()
    }

    /// Pop every timer due at or before `now_ms`, in due order (ties broken
    /// by scheduling order). Interval timers are rescheduled; an interval
    /// that fell behind fires once and skips the missed periods.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<(TimerId, TimerEvent)> {
        let mut due: Vec<(u64, TimerId, TimerEvent)> = Vec::new();

        self.entries.retain_mut(|entry| {
            if entry.due_ms > now_ms {
                return true;
            }
            due.push((entry.due_ms, entry.id, entry.event));
            match entry.period_ms {
                Some(period) => {
                    let missed = (now_ms - entry.due_ms) / period;
                    entry.due_ms += (missed + 1) * period;
                    true
                }
                None => false,
            }
        });

        due.sort_by_key(|&(due_ms, id, _)| (due_ms, id));
        due.into_iter().map(|(_, id, event)| (id, event)).collect()
    }
}
