use crate::counter::RepSession;
use crate::pose::JointMap;
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// フレーム単位で検出結果を供給するソース。
/// カメラ入力でも合成データでも同じ形で扱う
pub trait PoseSource: Send {
    /// 次のフレームの検出結果。供給終了でNone
    fn next_frame(&mut self) -> Option<JointMap>;
}

/// 駆動スレッドからのイベント通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// レップ成立 (成立後の累計)
    RepCompleted(u32),
    /// 目標回数到達。1セッション1回のみ
    TargetReached(u32),
    /// ソースが尽きた (その時点の累計)
    Finished { reps: u32 },
}

/// 駆動スレッドが公開する最新状態
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub frames: u64,
    pub rep_count: u32,
    pub smoothed_angle: f32,
    pub observed: bool,
    pub joints: JointMap,
}

/// セッションを専用スレッドで一定FPS駆動するランナー。
/// フレーム処理は単一スレッドで順序どおりに行う
pub struct SessionRunner {
    snapshot: Arc<Mutex<Snapshot>>,
    stop: Arc<AtomicBool>,
    events: Receiver<SessionEvent>,
    handle: thread::JoinHandle<RepSession>,
}

impl SessionRunner {
    pub fn start<S: PoseSource + 'static>(
        mut session: RepSession,
        mut source: S,
        target_fps: u32,
    ) -> Self {
        let snapshot = Arc::new(Mutex::new(Snapshot {
            frames: session.frames(),
            rep_count: session.rep_count(),
            smoothed_angle: session.smoothed_angle(),
            observed: false,
            joints: session.joints().clone(),
        }));
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let snapshot_ref = Arc::clone(&snapshot);
        let stop_ref = Arc::clone(&stop);
        let frame_duration = Duration::from_secs_f64(1.0 / target_fps.max(1) as f64);

        let handle = thread::spawn(move || {
            while !stop_ref.load(Ordering::Relaxed) {
                let loop_start = Instant::now();

                let Some(frame) = source.next_frame() else {
                    let _ = tx.send(SessionEvent::Finished {
                        reps: session.rep_count(),
                    });
                    break;
                };
                let update = session.process_frame(&frame);

                {
                    let mut snap = snapshot_ref.lock().unwrap();
                    snap.frames = session.frames();
                    snap.rep_count = session.rep_count();
                    snap.smoothed_angle = update.smoothed_angle;
                    snap.observed = update.observed;
                    snap.joints = session.joints().clone();
                }
                if let Some(count) = update.rep_completed {
                    let _ = tx.send(SessionEvent::RepCompleted(count));
                }
                if let Some(count) = update.target_reached {
                    let _ = tx.send(SessionEvent::TargetReached(count));
                }

                let elapsed = loop_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
            session
        });

        Self {
            snapshot,
            stop,
            events: rx,
            handle,
        }
    }

    /// 最新状態のコピー
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().unwrap().clone()
    }

    /// 溜まっているイベントを1件取り出す。なければNone
    pub fn poll_event(&self) -> Option<SessionEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// 駆動を止めてセッションを回収する
    pub fn stop(self) -> Result<RepSession> {
        self.stop.store(true, Ordering::Relaxed);
        self.handle
            .join()
            .map_err(|_| anyhow!("session thread panicked"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CounterConfig, Exercise};
    use crate::counter::SessionState;
    use crate::sim::MotionScript;

    fn cycle_script(cycles: u32) -> MotionScript {
        let mut script = MotionScript::new(Exercise::Pushup, 0.9);
        for _ in 0..cycles {
            script.push_sweep(170.0, 90.0, 15);
            script.push_hold(90.0, 10);
            script.push_sweep(90.0, 170.0, 15);
            script.push_hold(170.0, 10);
        }
        script
    }

    fn collect_until_finished(runner: &SessionRunner) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(event) = runner.poll_event() {
                let done = matches!(event, SessionEvent::Finished { .. });
                events.push(event);
                if done {
                    return events;
                }
            } else {
                assert!(Instant::now() < deadline, "feed did not finish in time");
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    #[test]
    fn test_runner_completes_feed() {
        let runner = SessionRunner::start(
            RepSession::new(&CounterConfig::default()),
            cycle_script(2),
            1000,
        );
        let events = collect_until_finished(&runner);
        assert_eq!(
            events,
            [
                SessionEvent::RepCompleted(1),
                SessionEvent::RepCompleted(2),
                SessionEvent::Finished { reps: 2 }
            ]
        );

        let mut session = runner.stop().unwrap();
        assert_eq!(session.rep_count(), 2);
        assert_eq!(session.frames(), 100);
        assert_eq!(session.finish(), 2);
    }

    #[test]
    fn test_stop_midway_keeps_session_inspectable() {
        let runner = SessionRunner::start(
            RepSession::new(&CounterConfig::default()),
            cycle_script(2),
            100,
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(SessionEvent::RepCompleted(count)) = runner.poll_event() {
                assert_eq!(count, 1);
                break;
            }
            assert!(Instant::now() < deadline, "no rep within deadline");
            thread::sleep(Duration::from_millis(1));
        }

        let snap = runner.snapshot();
        assert!(snap.rep_count >= 1);
        assert!(snap.frames >= 40);
        assert!(!snap.joints.is_empty());

        let mut session = runner.stop().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.rep_count() >= 1);
        assert!(session.frames() < 100, "stop must interrupt the feed");

        assert_eq!(session.finish(), session.rep_count());
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn test_target_event_order() {
        let mut config = CounterConfig::default();
        config.target_reps = 2;
        let runner = SessionRunner::start(RepSession::new(&config), cycle_script(3), 1000);

        let events = collect_until_finished(&runner);
        assert_eq!(
            events,
            [
                SessionEvent::RepCompleted(1),
                SessionEvent::RepCompleted(2),
                SessionEvent::TargetReached(2),
                SessionEvent::RepCompleted(3),
                SessionEvent::Finished { reps: 3 }
            ]
        );
        runner.stop().unwrap();
    }

    #[test]
    fn test_empty_source_finishes_immediately() {
        let runner = SessionRunner::start(
            RepSession::new(&CounterConfig::default()),
            cycle_script(0),
            1000,
        );

        let events = collect_until_finished(&runner);
        assert_eq!(events, [SessionEvent::Finished { reps: 0 }]);

        let session = runner.stop().unwrap();
        assert_eq!(session.rep_count(), 0);
        assert_eq!(session.frames(), 0);
    }
}
