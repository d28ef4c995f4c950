use anyhow::Result;
use rep_counter::config::{Config, Exercise};
use rep_counter::counter::{FrameUpdate, RepSession, SessionState};
use rep_counter::pose::JointMap;
use rep_counter::sim::{arm_frame, squat_frame};
use std::io::{self, Write};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Rep Counter - Engine Test ===");
    println!("種目: {:?}", config.counter.exercise);
    println!(
        "閾値: 屈曲 {} 度 / 伸展 {} 度",
        config.counter.down_threshold, config.counter.up_threshold
    );
    if config.counter.target_reps > 0 {
        println!("目標回数: {}", config.counter.target_reps);
    }
    println!();
    println!("コマンド:");
    println!("  a <角度>             - 1フレーム処理 (例: a 120)");
    println!("  s <から> <まで> <数>  - 角度を線形に動かす (例: s 170 90 15)");
    println!("  h <角度> <数>        - 同じ角度を維持 (例: h 90 10)");
    println!("  d <数>               - 未検出フレーム (例: d 5)");
    println!("  i                    - セッション状態を表示");
    println!("  f                    - セッション終了 (カウント確定)");
    println!("  c                    - セッション中断");
    println!("  n                    - 新しいセッション");
    println!("  q                    - 終了");
    println!();

    let exercise = config.counter.exercise;
    let mut session = RepSession::new(&config.counter);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let parts: Vec<&str> = input.trim().split_whitespace().collect();

        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "a" if parts.len() == 2 => {
                let angle: f32 = parts[1].parse()?;
                let update = session.process_frame(&detection_frame(exercise, angle));
                println!(
                    "入力: {:.1} 度 / 平滑: {:.1} 度",
                    angle, update.smoothed_angle
                );
                report(&update);
            }
            "s" if parts.len() == 4 => {
                let from: f32 = parts[1].parse()?;
                let to: f32 = parts[2].parse()?;
                let frames: u32 = parts[3].parse()?;
                for i in 0..frames {
                    let angle = if frames <= 1 {
                        to
                    } else {
                        from + (to - from) * i as f32 / (frames - 1) as f32
                    };
                    let update = session.process_frame(&detection_frame(exercise, angle));
                    report(&update);
                }
                println!("平滑: {:.1} 度", session.smoothed_angle());
            }
            "h" if parts.len() == 3 => {
                let angle: f32 = parts[1].parse()?;
                let frames: u32 = parts[2].parse()?;
                for _ in 0..frames {
                    let update = session.process_frame(&detection_frame(exercise, angle));
                    report(&update);
                }
                println!("平滑: {:.1} 度", session.smoothed_angle());
            }
            "d" if parts.len() == 2 => {
                let frames: u32 = parts[1].parse()?;
                let empty = JointMap::new();
                for _ in 0..frames {
                    session.process_frame(&empty);
                }
                println!(
                    "未検出 {} フレーム / 平滑: {:.1} 度",
                    frames,
                    session.smoothed_angle()
                );
            }
            "i" => {
                println!("状態: {:?}", session.state());
                println!(
                    "カウント: {} 回 ({:?})",
                    session.rep_count(),
                    session.phase()
                );
                println!("平滑角度: {:.1} 度", session.smoothed_angle());
                println!(
                    "フレーム: {} ({:.1} 秒)",
                    session.frames(),
                    session.duration().as_secs_f32()
                );
                for (id, sample) in session.joints().iter() {
                    println!(
                        "  {:?}: ({:.2}, {:.2}) conf {:.2}",
                        id, sample.x, sample.y, sample.confidence
                    );
                }
            }
            "f" => {
                let reps = session.finish();
                println!("セッション終了: {} 回", reps);
            }
            "c" => {
                session.cancel();
                println!("セッションを中断しました");
            }
            "n" => {
                if session.state() == SessionState::Active {
                    println!("先に f または c で終了してください");
                } else {
                    session.start();
                    println!("新しいセッションを開始しました");
                }
            }
            "q" => {
                println!("終了します");
                break;
            }
            _ => {
                println!("不明なコマンド: {}", parts[0]);
            }
        }
    }

    Ok(())
}

fn detection_frame(exercise: Exercise, angle: f32) -> JointMap {
    match exercise {
        Exercise::Pushup => arm_frame(angle, 0.9),
        Exercise::Squat => squat_frame(angle, 0.9),
    }
}

fn report(update: &FrameUpdate) {
    if let Some(count) = update.rep_completed {
        println!("レップ成立! 累計 {} 回", count);
    }
    if let Some(count) = update.target_reached {
        println!("目標回数に到達! ({} 回)", count);
    }
}
