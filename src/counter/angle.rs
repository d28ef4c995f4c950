use crate::config::{CounterConfig, Exercise};
use crate::pose::{JointId, JointMap};

/// いずれかのベクトル長がこれ未満なら角度は定義できない
const DEGENERATE_EPS: f32 = 1e-4;

/// 頂点を挟む2ベクトルのなす角 (度)。
/// 退化ケース (端点が頂点と一致) は完全伸展の180度として扱う
pub fn joint_angle(a: (f32, f32), vertex: (f32, f32), b: (f32, f32)) -> f32 {
    let v1 = (a.0 - vertex.0, a.1 - vertex.1);
    let v2 = (b.0 - vertex.0, b.1 - vertex.1);
    let m1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let m2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if m1 < DEGENERATE_EPS || m2 < DEGENERATE_EPS {
        return 180.0;
    }
    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    (dot / (m1 * m2)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// 種目ごとの計測関節列。[端点, 頂点, 端点] を左右1本ずつ
pub fn tracked_sides(exercise: Exercise) -> [[JointId; 3]; 2] {
    match exercise {
        Exercise::Pushup => [
            [JointId::LeftShoulder, JointId::LeftElbow, JointId::LeftWrist],
            [
                JointId::RightShoulder,
                JointId::RightElbow,
                JointId::RightWrist,
            ],
        ],
        Exercise::Squat => [
            [JointId::LeftHip, JointId::LeftKnee, JointId::LeftAnkle],
            [JointId::RightHip, JointId::RightKnee, JointId::RightAnkle],
        ],
    }
}

/// マージ済みマップから現フレームの関節角を求める。
/// 3点そろった側の平均。どちらの側もそろわなければNone
pub fn instant_angle(joints: &JointMap, exercise: Exercise) -> Option<f32> {
    let mut sum = 0.0;
    let mut count = 0;
    for [a, vertex, b] in tracked_sides(exercise) {
        if let (Some(pa), Some(pv), Some(pb)) =
            (joints.get(a), joints.get(vertex), joints.get(b))
        {
            sum += joint_angle(pa.position(), pv.position(), pb.position());
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

/// 関節角のEMAフィルタ。初期値は完全伸展付近から始める
#[derive(Debug)]
pub struct AngleFilter {
    alpha: f32,
    initial: f32,
    value: f32,
}

impl AngleFilter {
    pub fn new(alpha: f32, initial: f32) -> Self {
        Self {
            alpha,
            initial,
            value: initial,
        }
    }

    pub fn from_config(config: &CounterConfig) -> Self {
        Self::new(config.angle_alpha, config.initial_angle)
    }

    pub fn update(&mut self, sample: f32) -> f32 {
        self.value = self.alpha * sample + (1.0 - self.alpha) * self.value;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = self.initial;
    }
}
