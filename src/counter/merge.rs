use crate::config::CounterConfig;
use crate::pose::{JointId, JointMap, JointSample};

/// フレームごとの検出結果を前回状態へマージして関節マップを安定化する。
///
/// - 検出あり + 前回あり: 位置はEMA、信頼度は新しい値をそのまま採用
/// - 検出あり + 前回なし: そのまま登録
/// - 検出なし + 前回あり: 位置を保持し信頼度を減衰 (下限あり)
/// - 検出なし + 前回なし: 未登録のまま
#[derive(Debug)]
pub struct JointMerger {
    position_alpha: f32,
    confidence_decay: f32,
    min_confidence: f32,
    last: JointMap,
}

impl JointMerger {
    pub fn new(position_alpha: f32, confidence_decay: f32, min_confidence: f32) -> Self {
        Self {
            position_alpha,
            confidence_decay,
            min_confidence,
            last: JointMap::new(),
        }
    }

    pub fn from_config(config: &CounterConfig) -> Self {
        Self::new(
            config.position_alpha,
            config.confidence_decay,
            config.min_confidence,
        )
    }

    /// 1フレーム分の検出結果を取り込み、マージ後のマップを返す
    pub fn merge(&mut self, detected: &JointMap) -> &JointMap {
        let alpha = self.position_alpha;
        for id in JointId::ALL {
            match (detected.get(id), self.last.get(id).copied()) {
                (Some(new), Some(prev)) => {
                    self.last.insert(
                        id,
                        JointSample::new(
                            alpha * new.x + (1.0 - alpha) * prev.x,
                            alpha * new.y + (1.0 - alpha) * prev.y,
                            new.confidence,
                        ),
                    );
                }
                (Some(new), None) => {
                    self.last.insert(id, *new);
                }
                (None, Some(prev)) => {
                    let decayed = (prev.confidence * self.confidence_decay).max(self.min_confidence);
                    self.last
                        .insert(id, JointSample::new(prev.x, prev.y, decayed));
                }
                (None, None) => {}
            }
        }
        &self.last
    }

    /// 直近のマージ結果
    pub fn last(&self) -> &JointMap {
        &self.last
    }

    pub fn reset(&mut self) {
        self.last.clear();
    }
}
