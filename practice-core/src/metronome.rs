//! # Metronome Clock
//!
//! A single free-running clock producing accented/unaccented beat events at
//! a tempo- and time-signature-derived interval.
//!
//! ## Architecture
//! - **Pure core**: [`tick_interval`], [`clamp_bpm`] and [`BeatCounter`] are
//!   plain math and fully testable without threads.
//! - **Clock worker**: while Running, a dedicated thread owned by
//!   [`Metronome`] ticks on a deadline schedule and emits [`Tick`] events
//!   over a crossbeam channel. Ticks are strictly sequential; the worker
//!   consumes re-arm/stop commands between ticks, so no two schedules can
//!   ever coexist.
//! - **Audio**: the worker acquires the click playback handle when it starts
//!   and releases it when it stops. Audio failure never stops the clock.

use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::click::ClickPlayer;

/// Slowest supported tempo.
pub const MIN_BPM: u32 = 30;
/// Fastest supported tempo.
pub const MAX_BPM: u32 = 240;
/// Tempo the metronome starts out at.
pub const DEFAULT_BPM: u32 = 60;

/// A time signature from the fixed supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    /// The signatures offered by the transport select.
    pub const SUPPORTED: [TimeSignature; 4] = [
        TimeSignature { numerator: 1, denominator: 4 },
        TimeSignature { numerator: 2, denominator: 4 },
        TimeSignature { numerator: 3, denominator: 4 },
        TimeSignature { numerator: 4, denominator: 4 },
    ];

    /// Parses a `"4/4"`-style label into a supported signature.
    ///
    /// Returns `None` for malformed input and for signatures outside the
    /// supported set.
    pub fn parse(label: &str) -> Option<Self> {
        let (numerator, denominator) = label.split_once('/')?;
        let signature = TimeSignature {
            numerator: numerator.trim().parse().ok()?,
            denominator: denominator.trim().parse().ok()?,
        };
        Self::SUPPORTED.contains(&signature).then_some(signature)
    }

    /// Beats in one measure; the numerator.
    pub fn beats_per_measure(&self) -> u32 {
        self.numerator
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature { numerator: 4, denominator: 4 }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Clamps a requested tempo into the supported [`MIN_BPM`]..=[`MAX_BPM`]
/// range.
pub fn clamp_bpm(bpm: u32) -> u32 {
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// Interval between ticks for a tempo and signature: `60000 / bpm` ms.
///
/// Compound-time convention: a `/8` denominator ticks twice per notated
/// beat, halving the interval. Unreachable with the supported signature set,
/// kept for forward compatibility.
pub fn tick_interval(bpm: u32, signature: TimeSignature) -> Duration {
    let base_ms = 60_000.0 / clamp_bpm(bpm) as f64;
    let ms = if signature.denominator == 8 { base_ms / 2.0 } else { base_ms };
    Duration::from_secs_f64(ms / 1000.0)
}

/// One beat event: the beat number within the measure (1-based) and whether
/// it is the accented downbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub beat: u32,
    pub is_accent: bool,
}

/// Cyclic beat counter in `[1, beats_per_measure]`, accent on beat 1.
///
/// Freshly constructed (or reset) counters sit at 0, so the next advance
/// lands on the accented beat 1.
#[derive(Debug, Clone)]
pub struct BeatCounter {
    beats_per_measure: u32,
    beat: u32,
}

impl BeatCounter {
    pub fn new(signature: TimeSignature) -> Self {
        Self { beats_per_measure: signature.beats_per_measure(), beat: 0 }
    }

    /// Advances to the next beat and reports it.
    pub fn advance(&mut self) -> Tick {
        self.beat = self.beat % self.beats_per_measure + 1;
        Tick { beat: self.beat, is_accent: self.beat == 1 }
    }

    /// Back to 0; the next tick is beat 1 again.
    pub fn reset(&mut self) {
        self.beat = 0;
    }

    pub fn beat(&self) -> u32 {
        self.beat
    }
}

/// Commands consumed by the clock worker between ticks.
enum WorkerCommand {
    /// Cancel the pending tick and re-arm at a new interval. Carries the new
    /// signature when the beat counter must reset too.
    Retime {
        interval: Duration,
        signature: Option<TimeSignature>,
    },
    Stop,
}

struct ClockWorker {
    commands: Sender<WorkerCommand>,
    handle: JoinHandle<()>,
}

/// The metronome transport: {Stopped, Running} with re-arm-in-place tempo
/// and signature changes.
///
/// Subscribe to beat events with [`ticks`](Metronome::ticks) before calling
/// [`start`](Metronome::start). Dropping the metronome stops the clock.
pub struct Metronome {
    bpm: u32,
    signature: TimeSignature,
    ticks_tx: Sender<Tick>,
    ticks_rx: Receiver<Tick>,
    worker: Option<ClockWorker>,
}

impl Metronome {
    /// A stopped metronome at [`DEFAULT_BPM`] in 4/4.
    pub fn new() -> Self {
        let (ticks_tx, ticks_rx) = crossbeam_channel::unbounded();
        Self {
            bpm: DEFAULT_BPM,
            signature: TimeSignature::default(),
            ticks_tx,
            ticks_rx,
            worker: None,
        }
    }

    /// A receiver for beat events. May be cloned and read from any thread.
    pub fn ticks(&self) -> Receiver<Tick> {
        self.ticks_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.signature
    }

    /// Stopped → Running. Resets the beat counter, acquires the audio
    /// handle on the worker, and arms the clock. No-op while Running.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let (commands, command_rx) = crossbeam_channel::unbounded();
        let ticks = self.ticks_tx.clone();
        let interval = tick_interval(self.bpm, self.signature);
        let signature = self.signature;
        let handle = thread::spawn(move || run_clock(command_rx, ticks, interval, signature));
        self.worker = Some(ClockWorker { commands, handle });
    }

    /// Running → Stopped. Cancels the pending tick, releases the audio
    /// handle, and freezes the counter. No-op while Stopped.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.commands.send(WorkerCommand::Stop);
            let _ = worker.handle.join();
        }
    }

    /// Sets the tempo (clamped). While Running the clock re-arms at the new
    /// interval without leaving the Running state or resetting the beat.
    pub fn set_tempo(&mut self, bpm: u32) {
        self.bpm = clamp_bpm(bpm);
        self.rearm(None);
    }

    /// Sets the time signature. While Running the clock re-arms and the beat
    /// counter resets to 0, without requiring stop/start.
    pub fn set_time_signature(&mut self, signature: TimeSignature) {
        self.signature = signature;
        self.rearm(Some(signature));
    }

    fn rearm(&self, signature: Option<TimeSignature>) {
        if let Some(worker) = &self.worker {
            let _ = worker.commands.send(WorkerCommand::Retime {
                interval: tick_interval(self.bpm, self.signature),
                signature,
            });
        }
    }
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Metronome {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The clock loop. Ticks when the deadline passes; commands arriving before
/// the deadline cancel the pending tick (re-arm) or end the loop (stop).
fn run_clock(
    commands: Receiver<WorkerCommand>,
    ticks: Sender<Tick>,
    mut interval: Duration,
    signature: TimeSignature,
) {
    // Audio lives and dies with this worker. No sound is not an error for
    // the clock: beats keep flowing either way.
    let click = match ClickPlayer::new() {
        Ok(player) => Some(player),
        Err(err) => {
            eprintln!("[METRONOME] Audio unavailable, ticking silently: {err}");
            None
        }
    };

    let mut counter = BeatCounter::new(signature);
    let mut deadline = Instant::now() + interval;

    loop {
        match commands.recv_deadline(deadline) {
            Ok(WorkerCommand::Retime { interval: new_interval, signature }) => {
                interval = new_interval;
                if let Some(signature) = signature {
                    counter = BeatCounter::new(signature);
                }
                deadline = Instant::now() + interval;
            }
            Ok(WorkerCommand::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                let tick = counter.advance();
                if let Some(player) = &click {
                    player.trigger(tick.is_accent);
                }
                // Receiver gone means nobody is listening; keep ticking, the
                // transport still owns one.
                let _ = ticks.send(tick);
                deadline += interval;
            }
        }
    }
}
