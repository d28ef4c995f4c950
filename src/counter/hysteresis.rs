use crate::config::CounterConfig;

/// レップ検出FSMの位相
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 伸展中 (アンロード)
    Extended,
    /// 屈曲中 (アームド)
    Flexed,
}

/// 2閾値ヒステリシスによるレップカウンタ。
/// down_threshold未満でアーム、その後up_threshold超えで1カウント。
/// 2閾値の間はデッドゾーンで状態遷移しない
#[derive(Debug)]
pub struct RepCounter {
    down_threshold: f32,
    up_threshold: f32,
    phase: Phase,
    count: u32,
}

impl RepCounter {
    pub fn new(down_threshold: f32, up_threshold: f32) -> Self {
        Self {
            down_threshold,
            up_threshold,
            phase: Phase::Extended,
            count: 0,
        }
    }

    pub fn from_config(config: &CounterConfig) -> Self {
        Self::new(config.down_threshold, config.up_threshold)
    }

    /// 平滑化済み角度を1サンプル評価する。レップ成立時のみtrue
    pub fn update(&mut self, angle: f32) -> bool {
        if angle < self.down_threshold {
            self.phase = Phase::Flexed;
            false
        } else if self.phase == Phase::Flexed && angle > self.up_threshold {
            self.count += 1;
            self.phase = Phase::Extended;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Extended;
        self.count = 0;
    }
}
