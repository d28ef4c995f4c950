//! Rep sim: drives a scripted exercise motion through the counting engine at a
//! fixed frame rate and logs rep events as they fire.
//!
//! Usage: rep_sim [cycles]

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use rep_counter::config::Config;
use rep_counter::counter::RepSession;
use rep_counter::feed::{SessionEvent, SessionRunner};
use rep_counter::sim::MotionScript;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

type LogFile = Arc<Mutex<std::io::BufWriter<std::fs::File>>>;

fn open_log_file() -> Result<LogFile> {
    std::fs::create_dir_all("logs")?;
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("logs/rep_sim_{}.log", ts);
    let file = std::fs::File::create(&path)?;
    eprintln!("Log: {}", path);
    Ok(Arc::new(Mutex::new(std::io::BufWriter::new(file))))
}

macro_rules! log {
    ($logfile:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("{}", msg);
        if let Ok(mut f) = $logfile.lock() {
            let _ = writeln!(f, "{}", msg);
            let _ = f.flush();
        }
    }};
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::load_or_default("config.toml");
    let logfile = open_log_file()?;
    log!(logfile, "Rep Sim ({})", env!("GIT_VERSION"));
    log!(
        logfile,
        "[config] exercise={:?}, thresholds={}-{}, target_reps={}, fps={}",
        config.counter.exercise,
        config.counter.down_threshold,
        config.counter.up_threshold,
        config.counter.target_reps,
        config.app.target_fps
    );

    let cycles: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(5);

    let mut script = MotionScript::new(config.counter.exercise, 0.9);
    for _ in 0..cycles {
        script.push_sweep(170.0, 90.0, 15);
        script.push_hold(90.0, 10);
        script.push_sweep(90.0, 170.0, 15);
        script.push_hold(170.0, 10);
    }
    log!(
        logfile,
        "[script] {} cycles, {} frames",
        cycles,
        script.total_frames()
    );

    let session = RepSession::new(&config.counter);
    let runner = SessionRunner::start(session, script, config.app.target_fps);

    loop {
        match runner.poll_event() {
            Some(SessionEvent::RepCompleted(count)) => {
                let snap = runner.snapshot();
                log!(
                    logfile,
                    "[rep] {} at frame {} (angle {:.1})",
                    count,
                    snap.frames,
                    snap.smoothed_angle
                );
            }
            Some(SessionEvent::TargetReached(count)) => {
                log!(logfile, "[target] reached at {} reps", count);
            }
            Some(SessionEvent::Finished { reps }) => {
                log!(logfile, "[feed] exhausted at {} reps", reps);
                break;
            }
            None => {
                std::thread::sleep(Duration::from_millis(10));
            }
        }
    }

    let mut session = runner.stop()?;
    let reps = session.finish();
    let frames = session.frames();
    let seconds = session.duration().as_secs_f64();
    let fps = if seconds > 0.0 {
        frames as f64 / seconds
    } else {
        0.0
    };
    log!(
        logfile,
        "[done] {} reps, {} frames in {:.1}s ({:.1} fps)",
        reps,
        frames,
        seconds,
        fps
    );

    Ok(())
}
