/// 姿勢検出器が返す 17 関節のインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointId {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl JointId {
    pub const COUNT: usize = 17;

    /// 全関節をインデックス順に並べたテーブル
    pub const ALL: [JointId; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }
}

/// 1フレーム分の単一関節検出
///
/// 座標は検出器の正規化座標系 (0.0〜1.0) をそのまま保持する。
/// 軸の反転や表示向きへの変換は行わない (挟角計算は向きに依存しない)。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSample {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0)
    pub confidence: f32,
}

impl JointSample {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// 信頼度が閾値以上か
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_id_count() {
        assert_eq!(JointId::COUNT, 17);
        assert_eq!(JointId::ALL.len(), JointId::COUNT);
    }

    #[test]
    fn test_joint_id_from_index() {
        assert_eq!(JointId::from_index(0), Some(JointId::Nose));
        assert_eq!(JointId::from_index(7), Some(JointId::LeftElbow));
        assert_eq!(JointId::from_index(16), Some(JointId::RightAnkle));
        assert_eq!(JointId::from_index(17), None);
    }

    #[test]
    fn test_joint_id_all_matches_indices() {
        for (i, &id) in JointId::ALL.iter().enumerate() {
            assert_eq!(id as usize, i);
            assert_eq!(JointId::from_index(i), Some(id));
        }
    }

    #[test]
    fn test_sample_is_visible() {
        let sample = JointSample::new(0.5, 0.5, 0.7);
        assert!(sample.is_visible(0.5));
        assert!(!sample.is_visible(0.8));
    }

    #[test]
    fn test_sample_position() {
        let sample = JointSample::new(0.25, 0.75, 1.0);
        assert_eq!(sample.position(), (0.25, 0.75));
    }
}
