use bytering::ring::RingBuffer;
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "stress", about = "Ring buffer throughput and integrity check")]
struct Args {
    #[arg(long, default_value_t = 64 * 1024)]
    capacity: usize,

    #[arg(long, default_value_t = 5)]
    seconds: u64,
}

#[inline(always)]
fn pattern(pos: u64) -> u8 {
    (pos ^ (pos >> 8)) as u8
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    info!("ring buffer stress test, capacity {}", args.capacity);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let mut ring = RingBuffer::new(args.capacity)
        .map_err(|e| format!("Failed to create ring buffer: {}", e))?;

    let max_chunk = (args.capacity / 3).max(1);
    let mut chunk = vec![0u8; max_chunk];
    let mut written = 0u64;
    let mut consumed = 0u64;
    let mut round = 0usize;

    let started = Instant::now();
    let deadline = started + Duration::from_secs(args.seconds);
    info!("Running for {} seconds...", args.seconds);

    while running.load(Ordering::Relaxed) && Instant::now() < deadline {
        round += 1;

        let len = (round * 31 % max_chunk + 1).min(ring.available());
        for (i, b) in chunk[..len].iter_mut().enumerate() {
            *b = pattern(written + i as u64);
        }
        ring.write(&chunk[..len])?;
        written += len as u64;

        let want = round * 17 % max_chunk + 1;
        let out = if round % 2 == 0 {
            ring.read(want)
        } else {
            match ring.peek(want) {
                Some(bytes) => {
                    ring.seek(bytes.len())?;
                    bytes
                }
                None => ring.read(want),
            }
        };

        for (i, &b) in out.iter().enumerate() {
            let pos = consumed + i as u64;
            if b != pattern(pos) {
                return Err(format!(
                    "corrupt byte at stream offset {}: expected {:#04x}, got {:#04x}",
                    pos,
                    pattern(pos),
                    b
                )
                .into());
            }
        }
        consumed += out.len() as u64;

        if ring.len() as u64 != written - consumed {
            return Err(format!(
                "occupancy drift: len {} but {} written, {} consumed",
                ring.len(),
                written,
                consumed
            )
            .into());
        }
    }

    let secs = started.elapsed().as_secs_f64().max(f64::EPSILON);
    info!("Results:");
    info!("  Rounds: {}", round);
    info!("  Written: {} bytes", written);
    info!("  Consumed: {} bytes", consumed);
    info!(
        "  Throughput: {:.2} MB/s",
        written as f64 / secs / 1024.0 / 1024.0
    );

    Ok(())
}
