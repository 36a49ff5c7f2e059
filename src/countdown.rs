//! Election phase and the live countdown shown on the home and voting screens.

use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::model::{Election, ElectionStatus};

/// Where `now` falls relative to an election's voting window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElectionPhase {
    PreElection,
    Active,
    Closed,
}

impl ElectionPhase {
    /// Both boundaries belong to the voting window.
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start {
            ElectionPhase::PreElection
        } else if now <= end {
            ElectionPhase::Active
        } else {
            ElectionPhase::Closed
        }
    }
}

impl fmt::Display for ElectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElectionPhase::PreElection => "Voting opens in",
            ElectionPhase::Active => "Voting closes in",
            ElectionPhase::Closed => "Voting has closed",
        };
        write!(f, "{name}")
    }
}

/// A phase and the time left until the next boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub phase: ElectionPhase,
    pub remaining: Duration,
}

impl Countdown {
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let phase = ElectionPhase::at(start, end, now);
        let remaining = match phase {
            ElectionPhase::PreElection => start - now,
            ElectionPhase::Active => end - now,
            ElectionPhase::Closed => Duration::zero(),
        };
        Self { phase, remaining }
    }

    pub fn for_election(election: &Election, now: DateTime<Utc>) -> Self {
        Self::at(election.start_date, election.end_date, now)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            ElectionPhase::Closed => write!(f, "{}", self.phase),
            _ => write!(f, "{} {}", self.phase, format_remaining(self.remaining)),
        }
    }
}

/// `"{d}d {hh}h {mm}m {ss}s"`. Negative durations show as zero.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;
    let seconds = total % 60;
    format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
}

/// Election status as shown to voters. Differs from the server's status in
/// that an election past its end date but not yet completed is "Tallying".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisplayStatus {
    Upcoming,
    Ongoing,
    Tallying,
    Ended,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayStatus::Upcoming => "Upcoming",
            DisplayStatus::Ongoing => "Ongoing",
            DisplayStatus::Tallying => "Tallying",
            DisplayStatus::Ended => "Ended",
        };
        write!(f, "{name}")
    }
}

pub fn display_status(election: &Election, now: DateTime<Utc>) -> DisplayStatus {
    if election.status == ElectionStatus::Completed {
        return DisplayStatus::Ended;
    }
    match ElectionPhase::at(election.start_date, election.end_date, now) {
        ElectionPhase::PreElection => DisplayStatus::Upcoming,
        ElectionPhase::Active => DisplayStatus::Ongoing,
        ElectionPhase::Closed => DisplayStatus::Tallying,
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Recompute the countdown once a second. Each tick reads the clock afresh,
/// so a late tick never accumulates drift. The task stops after publishing
/// a `Closed` countdown, or once every receiver is gone.
///
/// Must be called from within a tokio runtime.
pub fn ticker(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    clock: Arc<dyn Clock>,
) -> watch::Receiver<Countdown> {
    let (tx, rx) = watch::channel(Countdown::at(start, end, clock.now()));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(StdDuration::from_secs(1));
        loop {
            interval.tick().await;
            let countdown = Countdown::at(start, end, clock.now());
            if tx.send(countdown).is_err() {
                debug!("Countdown receiver dropped, stopping ticker");
                break;
            }
            if countdown.phase == ElectionPhase::Closed {
                break;
            }
        }
    });
    rx
}
