use crate::config::{CounterConfig, Exercise};
use crate::counter::angle::{self, AngleFilter};
use crate::counter::hysteresis::{Phase, RepCounter};
use crate::counter::merge::JointMerger;
use crate::pose::JointMap;
use std::time::{Duration, Instant};

/// セッションのライフサイクル状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished,
    Cancelled,
}

/// 1フレーム処理の結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// このフレームで角度を観測できたか
    pub observed: bool,
    /// 現在の平滑化角度 (度)
    pub smoothed_angle: f32,
    /// このフレームでレップが成立した場合、成立後の累計
    pub rep_completed: Option<u32>,
    /// このフレームで目標回数に到達した場合、その時点の累計。1セッション1回のみ
    pub target_reached: Option<u32>,
}

/// 1セッション分のレップ計測パイプライン。
/// 検出マージ、角度算出、平滑化、ヒステリシス判定をフレーム順に適用する
#[derive(Debug)]
pub struct RepSession {
    exercise: Exercise,
    target_reps: u32,
    merger: JointMerger,
    filter: AngleFilter,
    counter: RepCounter,
    target_reached: bool,
    state: SessionState,
    frames: u64,
    started_at: Instant,
    ended_at: Option<Instant>,
}

impl RepSession {
    /// 新規セッション。生成時点でActive
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            exercise: config.exercise,
            target_reps: config.target_reps,
            merger: JointMerger::from_config(config),
            filter: AngleFilter::from_config(config),
            counter: RepCounter::from_config(config),
            target_reached: false,
            state: SessionState::Active,
            frames: 0,
            started_at: Instant::now(),
            ended_at: None,
        }
    }

    /// 終了済みセッションを初期状態に戻して再開する
    pub fn start(&mut self) {
        debug_assert!(
            self.state != SessionState::Active,
            "start() called on an active session"
        );
        self.merger.reset();
        self.filter.reset();
        self.counter.reset();
        self.target_reached = false;
        self.state = SessionState::Active;
        self.frames = 0;
        self.started_at = Instant::now();
        self.ended_at = None;
    }

    /// 1フレーム分の検出結果を処理する。Active以外では何も起きない
    pub fn process_frame(&mut self, detected: &JointMap) -> FrameUpdate {
        if self.state != SessionState::Active {
            return FrameUpdate {
                observed: false,
                smoothed_angle: self.filter.value(),
                rep_completed: None,
                target_reached: None,
            };
        }
        self.frames += 1;

        let merged = self.merger.merge(detected);
        let instant = angle::instant_angle(merged, self.exercise);
        let Some(instant) = instant else {
            // 両側とも関節がそろわないフレーム: 平滑値を保持しFSMも評価しない
            return FrameUpdate {
                observed: false,
                smoothed_angle: self.filter.value(),
                rep_completed: None,
                target_reached: None,
            };
        };

        let smoothed = self.filter.update(instant);
        let mut rep_completed = None;
        let mut target_reached = None;
        if self.counter.update(smoothed) {
            let count = self.counter.count();
            rep_completed = Some(count);
            if self.target_reps > 0 && count >= self.target_reps && !self.target_reached {
                self.target_reached = true;
                target_reached = Some(count);
            }
        }

        FrameUpdate {
            observed: true,
            smoothed_angle: smoothed,
            rep_completed,
            target_reached,
        }
    }

    /// セッションを正常終了し、確定カウントを返す。
    /// Cancelled状態からは呼んでも状態は変わらない
    pub fn finish(&mut self) -> u32 {
        if self.state == SessionState::Active {
            self.state = SessionState::Finished;
            self.ended_at = Some(Instant::now());
        }
        self.counter.count()
    }

    /// セッションを破棄扱いで終了する。カウントは参照用に残る
    pub fn cancel(&mut self) {
        if self.state == SessionState::Active {
            self.state = SessionState::Cancelled;
            self.ended_at = Some(Instant::now());
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn rep_count(&self) -> u32 {
        self.counter.count()
    }

    pub fn smoothed_angle(&self) -> f32 {
        self.filter.value()
    }

    pub fn phase(&self) -> Phase {
        self.counter.phase()
    }

    /// 直近のマージ済み関節マップ
    pub fn joints(&self) -> &JointMap {
        self.merger.last()
    }

    pub fn target_reached(&self) -> bool {
        self.target_reached
    }

    /// Active中に処理したフレーム数
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// セッションの経過時間。終了後は終了時点で固定
    pub fn duration(&self) -> Duration {
        match self.ended_at {
            Some(end) => end.duration_since(self.started_at),
            None => self.started_at.elapsed(),
        }
    }
}
