use bytering::consumer::{DrainStats, FrameConsumer, FrameDispatcher};
use bytering::ring::{RingBuffer, RingError};
use clap::Parser;
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "bytering", version, about = "Relays delimited records through a ring buffer")]
struct Args {
    /// Ring buffer capacity in bytes
    #[arg(long, default_value_t = RingBuffer::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Pause between producer rounds
    #[arg(long, default_value_t = 10)]
    interval_ms: u64,

    /// Seconds between status lines
    #[arg(long, default_value_t = 5)]
    report_secs: u64,

    /// Frame delimiter byte
    #[arg(long, default_value_t = b'\n')]
    delimiter: u8,
}

struct CountingConsumer {
    frames: u64,
    bytes: u64,
}

impl FrameConsumer for CountingConsumer {
    fn consume(&mut self, frame: &[u8]) -> bool {
        self.frames += 1;
        self.bytes += frame.len() as u64;
        true
    }

    fn flush(&mut self) {
        debug!("counter at {} frames, {} bytes", self.frames, self.bytes);
    }

    fn name(&self) -> &str {
        "counter"
    }
}

/// Emits `record <n>` followed by the delimiter, cut into uneven chunks so
/// frames regularly straddle writes and the wrap point.
struct Producer {
    seq: u64,
    pending: Vec<u8>,
    delimiter: u8,
}

impl Producer {
    fn new(delimiter: u8) -> Self {
        Self {
            seq: 0,
            pending: Vec::new(),
            delimiter,
        }
    }

    fn next_chunk(&mut self, limit: usize) -> &[u8] {
        if self.pending.is_empty() {
            self.pending = format!("record {}", self.seq).into_bytes();
            self.pending.push(self.delimiter);
            self.seq += 1;
        }
        let len = (self.seq as usize % 7 + 1)
            .min(self.pending.len())
            .min(limit);
        &self.pending[..len]
    }

    fn commit(&mut self, len: usize) {
        self.pending.drain(..len);
    }
}

/// Writes up to 64 chunks, then drains. Chunks never exceed the free space,
/// so a record longer than the ring fills it and gets discarded instead of
/// stalling the relay.
fn relay_round(
    producer: &mut Producer,
    ring: &mut RingBuffer,
    dispatcher: &mut FrameDispatcher,
) -> Result<DrainStats, RingError> {
    let mut stats = DrainStats::default();
    for _ in 0..64 {
        let chunk = producer.next_chunk(ring.available());
        let len = chunk.len();
        if len == 0 {
            break;
        }
        match ring.write(chunk) {
            Ok(()) => producer.commit(len),
            Err(RingError::Overflow { .. }) => {
                stats.merge(dispatcher.drain(ring));
                break;
            }
            Err(e) => return Err(e),
        }
    }

    stats.merge(dispatcher.drain(ring));
    Ok(stats)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    info!("bytering v{}", env!("CARGO_PKG_VERSION"));
    info!("Press Ctrl+C to stop");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("Shutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let mut ring = RingBuffer::new(args.capacity)?;
    let mut dispatcher = FrameDispatcher::new(args.delimiter);
    dispatcher.add_consumer(CountingConsumer { frames: 0, bytes: 0 });

    let mut producer = Producer::new(args.delimiter);
    let mut total = DrainStats::default();
    let mut last_report = Instant::now();
    let report_every = Duration::from_secs(args.report_secs);

    info!("Relay running with capacity {}", ring.capacity());

    while running.load(Ordering::SeqCst) {
        total.merge(relay_round(&mut producer, &mut ring, &mut dispatcher)?);

        if last_report.elapsed() >= report_every {
            info!(
                "[STATUS] frames={} dropped_bytes={} ring_used={} ring_available={} success_rate={:.3}",
                total.frames_read,
                total.bytes_dropped,
                ring.len(),
                ring.available(),
                total.success_rate()
            );
            last_report = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(args.interval_ms));
    }

    info!(
        "Total frames processed: {} ({} bytes still buffered)",
        total.frames_read,
        ring.len()
    );
    Ok(())
}
