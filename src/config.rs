use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub app: AppConfig,
}

/// 計測する種目。左右それぞれの計測関節列 (端点・頂点・端点) が変わる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    /// 腕立て伏せ: 肩-肘-手首
    Pushup,
    /// スクワット: 腰-膝-足首
    Squat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CounterConfig {
    /// 屈曲判定の下閾値 (度)。これ未満でFlexedへ
    #[serde(default = "default_down_threshold")]
    pub down_threshold: f32,
    /// 伸展判定の上閾値 (度)。Flexed中にこれ超えで1レップ
    #[serde(default = "default_up_threshold")]
    pub up_threshold: f32,
    /// 関節位置EMAの係数
    #[serde(default = "default_position_alpha")]
    pub position_alpha: f32,
    /// 角度EMAの係数
    #[serde(default = "default_angle_alpha")]
    pub angle_alpha: f32,
    /// 未検出フレームでの信頼度減衰率
    #[serde(default = "default_confidence_decay")]
    pub confidence_decay: f32,
    /// 減衰後の信頼度下限
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// 平滑化角度の初期値 (完全伸展)
    #[serde(default = "default_initial_angle")]
    pub initial_angle: f32,
    /// 計測種目
    #[serde(default = "default_exercise")]
    pub exercise: Exercise,
    /// 目標回数。0で無効
    #[serde(default)]
    pub target_reps: u32,
}

fn default_down_threshold() -> f32 { 110.0 }
fn default_up_threshold() -> f32 { 140.0 }
fn default_position_alpha() -> f32 { 0.35 }
fn default_angle_alpha() -> f32 { 0.25 }
fn default_confidence_decay() -> f32 { 0.85 }
fn default_min_confidence() -> f32 { 0.05 }
fn default_initial_angle() -> f32 { 170.0 }
fn default_exercise() -> Exercise { Exercise::Pushup }

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            down_threshold: default_down_threshold(),
            up_threshold: default_up_threshold(),
            position_alpha: default_position_alpha(),
            angle_alpha: default_angle_alpha(),
            confidence_decay: default_confidence_decay(),
            min_confidence: default_min_confidence(),
            initial_angle: default_initial_angle(),
            exercise: default_exercise(),
            target_reps: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// シミュレーション駆動時の目標FPS
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_target_fps() -> u32 { 30 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            counter: CounterConfig::default(),
            app: AppConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 読み込みに失敗した場合はデフォルト設定で続行する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("config: {e:#} - デフォルト設定を使用します");
                Self::default()
            }
        }
    }

    /// 設定値の整合性チェック
    pub fn validate(&self) -> Result<()> {
        let c = &self.counter;
        if !c.down_threshold.is_finite() || !c.up_threshold.is_finite() {
            bail!(
                "thresholds must be finite: down={}, up={}",
                c.down_threshold,
                c.up_threshold
            );
        }
        if c.down_threshold >= c.up_threshold {
            bail!(
                "down_threshold ({}) must be below up_threshold ({})",
                c.down_threshold,
                c.up_threshold
            );
        }
        if !(c.position_alpha > 0.0 && c.position_alpha <= 1.0) {
            bail!("position_alpha must be in (0, 1], got {}", c.position_alpha);
        }
        if !(c.angle_alpha > 0.0 && c.angle_alpha <= 1.0) {
            bail!("angle_alpha must be in (0, 1], got {}", c.angle_alpha);
        }
        if !(c.confidence_decay > 0.0 && c.confidence_decay < 1.0) {
            bail!(
                "confidence_decay must be in (0, 1), got {}",
                c.confidence_decay
            );
        }
        if !(c.min_confidence >= 0.0 && c.min_confidence < 1.0) {
            bail!("min_confidence must be in [0, 1), got {}", c.min_confidence);
        }
        if !(c.initial_angle >= 0.0 && c.initial_angle <= 180.0) {
            bail!("initial_angle must be in [0, 180], got {}", c.initial_angle);
        }
        if self.app.target_fps == 0 {
            bail!("target_fps must be at least 1");
        }
        Ok(())
    }
}
