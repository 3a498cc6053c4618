//! Runs the gate-steps fixture clip through a full evaluation session with an
//! in-memory skeleton that drifts onto the first reference pose.
//!
//! `RUST_LOG=debug cargo run -p choreo-orchestrator-core --example headless_session`

use choreo_eval::{parse_reference_pose, CueLog};
use choreo_haptics::RecordingActuator;
use choreo_motion::{JointTable, MemorySkeleton, Recorder};
use choreo_orchestrator::{ChoreoConfig, Conductor, SessionState};
use choreo_test_fixtures::{clips, configs, poses};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = ChoreoConfig::from_json_str(&configs::json("gate-steps")?)?;
    let table = JointTable::humanoid();
    let skeleton = MemorySkeleton::with_joints(table.iter().map(|(id, _)| id));
    let pose_texts = poses::texts("arm-wave")?;
    let target = parse_reference_pose(&pose_texts[0], &table);

    let mut recorder = Recorder::new(table.clone(), &cfg.recorder);
    let mut conductor = Conductor::new(
        cfg,
        table.clone(),
        skeleton,
        RecordingActuator::default(),
        CueLog::default(),
    )?
    .with_clip_text(&clips::text("gate-steps")?)
    .with_reference_texts(&pose_texts);

    conductor.start()?;
    recorder.start();

    let dt = 1.0 / 60.0;
    for tick in 0..600u32 {
        // ease every tracked joint towards the target pose
        for joint in table.tracked() {
            let Some(goal) = target.get(joint) else {
                continue;
            };
            let k = (tick as f32 / 240.0).min(1.0);
            conductor
                .skeleton_mut()
                .set_world_position(joint, goal.map(|v| v * k));
        }

        let frame = conductor.step(dt)?;
        recorder.tick(dt, conductor.skeleton());
        for event in &frame.events {
            println!("[{:>4}] {}", tick, event);
        }
        if frame.state == SessionState::Completed {
            break;
        }
    }

    println!("cues: {:?}", conductor.cues().played);
    println!(
        "actuator commands: {} (stop_all x{})",
        conductor.actuator().commands.len(),
        conductor.actuator().stop_count()
    );
    if let Some(text) = recorder.stop() {
        println!("recorded {} rows", text.lines().count().saturating_sub(1));
    }
    Ok(())
}
