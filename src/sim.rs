use crate::config::Exercise;
use crate::feed::PoseSource;
use crate::pose::{JointId, JointMap, JointSample};

/// 頂点から端点までの距離 (正規化座標)
const LIMB_RADIUS: f32 = 0.25;

/// 指定角度の関節3点 (端点・頂点・端点) をマップへ書き込む。
/// 頂点を中心に左右対称へ開いた形で配置する
fn limb(
    map: &mut JointMap,
    vertex: (f32, f32),
    angle_deg: f32,
    confidence: f32,
    end_a: JointId,
    mid: JointId,
    end_b: JointId,
) {
    let half = (angle_deg / 2.0).to_radians();
    let (vx, vy) = vertex;
    map.insert(
        end_a,
        JointSample::new(
            vx - LIMB_RADIUS * half.sin(),
            vy - LIMB_RADIUS * half.cos(),
            confidence,
        ),
    );
    map.insert(mid, JointSample::new(vx, vy, confidence));
    map.insert(
        end_b,
        JointSample::new(
            vx + LIMB_RADIUS * half.sin(),
            vy - LIMB_RADIUS * half.cos(),
            confidence,
        ),
    );
}

/// 両肘が指定角度になる腕立て姿勢の検出フレームを生成する
pub fn arm_frame(angle_deg: f32, confidence: f32) -> JointMap {
    let mut map = JointMap::new();
    map.insert(JointId::Nose, JointSample::new(0.5, 0.2, confidence));
    limb(
        &mut map,
        (0.35, 0.5),
        angle_deg,
        confidence,
        JointId::LeftShoulder,
        JointId::LeftElbow,
        JointId::LeftWrist,
    );
    limb(
        &mut map,
        (0.65, 0.5),
        angle_deg,
        confidence,
        JointId::RightShoulder,
        JointId::RightElbow,
        JointId::RightWrist,
    );
    map.insert(JointId::LeftHip, JointSample::new(0.45, 0.8, confidence));
    map.insert(JointId::RightHip, JointSample::new(0.55, 0.8, confidence));
    map
}

/// 両膝が指定角度になるスクワット姿勢の検出フレームを生成する
pub fn squat_frame(angle_deg: f32, confidence: f32) -> JointMap {
    let mut map = JointMap::new();
    map.insert(JointId::Nose, JointSample::new(0.5, 0.1, confidence));
    map.insert(
        JointId::LeftShoulder,
        JointSample::new(0.42, 0.25, confidence),
    );
    map.insert(
        JointId::RightShoulder,
        JointSample::new(0.58, 0.25, confidence),
    );
    limb(
        &mut map,
        (0.4, 0.55),
        angle_deg,
        confidence,
        JointId::LeftHip,
        JointId::LeftKnee,
        JointId::LeftAnkle,
    );
    limb(
        &mut map,
        (0.6, 0.55),
        angle_deg,
        confidence,
        JointId::RightHip,
        JointId::RightKnee,
        JointId::RightAnkle,
    );
    map
}

/// 再現性のための簡易PRNG (xorshift32)
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9e37_79b9 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// [0, 1) の一様乱数
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16_777_216.0
    }
}

enum Segment {
    Sweep { from: f32, to: f32, frames: u32 },
    Hold { angle: f32, frames: u32 },
}

impl Segment {
    fn frames(&self) -> u32 {
        match *self {
            Segment::Sweep { frames, .. } => frames,
            Segment::Hold { frames, .. } => frames,
        }
    }

    fn angle_at(&self, frame: u32) -> f32 {
        match *self {
            Segment::Sweep { from, to, frames } => {
                if frames <= 1 {
                    to
                } else {
                    from + (to - from) * frame as f32 / (frames - 1) as f32
                }
            }
            Segment::Hold { angle, .. } => angle,
        }
    }
}

/// 角度の台本を順に再生する合成ポーズ供給源。
/// ジッタと関節ドロップアウトを乗せて実環境の検出ゆらぎを模擬できる
pub struct MotionScript {
    exercise: Exercise,
    confidence: f32,
    segments: Vec<Segment>,
    segment: usize,
    frame_in_segment: u32,
    jitter: f32,
    dropout: f32,
    rng: XorShift32,
}

impl MotionScript {
    pub fn new(exercise: Exercise, confidence: f32) -> Self {
        Self {
            exercise,
            confidence,
            segments: Vec::new(),
            segment: 0,
            frame_in_segment: 0,
            jitter: 0.0,
            dropout: 0.0,
            rng: XorShift32::new(1),
        }
    }

    /// from度からto度まで線形に動く区間を追加する
    pub fn push_sweep(&mut self, from: f32, to: f32, frames: u32) {
        self.segments.push(Segment::Sweep { from, to, frames });
    }

    /// 同じ角度を保つ区間を追加する
    pub fn push_hold(&mut self, angle: f32, frames: u32) {
        self.segments.push(Segment::Hold { angle, frames });
    }

    /// フレームごとの角度ジッタ振幅 (度)
    pub fn set_jitter(&mut self, amplitude: f32) {
        self.jitter = amplitude;
    }

    /// 関節ごとの欠落確率 [0, 1)
    pub fn set_dropout(&mut self, probability: f32) {
        self.dropout = probability;
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.rng = XorShift32::new(seed);
    }

    /// 台本全体のフレーム数
    pub fn total_frames(&self) -> u32 {
        self.segments.iter().map(Segment::frames).sum()
    }

    fn advance(&mut self) -> Option<f32> {
        while let Some(segment) = self.segments.get(self.segment) {
            if self.frame_in_segment < segment.frames() {
                let angle = segment.angle_at(self.frame_in_segment);
                self.frame_in_segment += 1;
                return Some(angle);
            }
            self.segment += 1;
            self.frame_in_segment = 0;
        }
        None
    }
}

impl PoseSource for MotionScript {
    fn next_frame(&mut self) -> Option<JointMap> {
        let base = self.advance()?;
        let angle = if self.jitter > 0.0 {
            base + (self.rng.next_f32() * 2.0 - 1.0) * self.jitter
        } else {
            base
        };
        let mut frame = match self.exercise {
            Exercise::Pushup => arm_frame(angle, self.confidence),
            Exercise::Squat => squat_frame(angle, self.confidence),
        };
        if self.dropout > 0.0 {
            for id in JointId::ALL {
                if frame.contains(id) && self.rng.next_f32() < self.dropout {
                    frame.remove(id);
                }
            }
        }
        Some(frame)
    }
}
