use choreo_eval::{parse_reference_pose, CueLog};
use choreo_haptics::{HapticMode, RecordingActuator};
use choreo_motion::{JointTable, MemorySkeleton};
use choreo_orchestrator::{
    ChoreoConfig, Conductor, PreviewEvent, SessionState, StageFrame, StageState,
};

const DT: f32 = 0.25;

type TestConductor = Conductor<MemorySkeleton, RecordingActuator, CueLog>;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn gate_steps_config() -> ChoreoConfig {
    let json = choreo_test_fixtures::configs::json("gate-steps").expect("gate-steps config");
    ChoreoConfig::from_json_str(&json).unwrap()
}

fn conductor(cfg: ChoreoConfig) -> TestConductor {
    init_logs();
    let table = JointTable::humanoid();
    let skeleton = MemorySkeleton::with_joints(table.iter().map(|(id, _)| id));
    let clip = choreo_test_fixtures::clips::text("gate-steps").expect("gate-steps clip");
    let poses = choreo_test_fixtures::poses::texts("arm-wave").expect("arm-wave poses");
    Conductor::new(cfg, table, skeleton, RecordingActuator::default(), CueLog::default())
        .unwrap()
        .with_clip_text(&clip)
        .with_reference_texts(poses)
}

/// Place the live tracked joints exactly on the first reference pose.
fn match_first_pose(c: &mut TestConductor) {
    let texts = choreo_test_fixtures::poses::texts("arm-wave").unwrap();
    let table = c.table().clone();
    let pose = parse_reference_pose(&texts[0], &table);
    for joint in table.tracked() {
        let p = pose.get(joint).unwrap();
        c.skeleton_mut().set_world_position(joint, p);
    }
}

fn event_types(frame: &StageFrame) -> Vec<String> {
    frame
        .events
        .iter()
        .filter_map(|e| e["type"].as_str().map(str::to_owned))
        .collect()
}

/// it should stay not ready without a playable clip and refuse to start
#[test]
fn not_ready_without_clip() {
    init_logs();
    let table = JointTable::humanoid();
    let mut c: TestConductor = Conductor::new(
        ChoreoConfig::default(),
        table,
        MemorySkeleton::new(),
        RecordingActuator::default(),
        CueLog::default(),
    )
    .unwrap();
    assert_eq!(c.state(), SessionState::NotReady);
    assert!(c.start().is_err());
    let frame = c.step(DT).unwrap();
    assert_eq!(frame.state, SessionState::NotReady);
    assert!(!c.is_playing());

    c.load_clip_text("Frame,Time\n");
    assert!(!c.is_ready());
    let err = c.start().unwrap_err().to_string();
    assert!(err.contains("empty"), "{err}");
}

/// it should treat checkpoints past the end of the clip as a load failure
#[test]
fn out_of_range_checkpoint_is_not_ready() {
    let mut cfg = gate_steps_config();
    cfg.evaluation.checkpoints = vec![3];
    let c = conductor(cfg);
    assert_eq!(c.state(), SessionState::NotReady);
}

/// it should load the session config document and reject inconsistent ones
#[test]
fn config_documents() {
    let cfg = gate_steps_config();
    assert_eq!(cfg.evaluation.checkpoints, vec![1]);
    assert_eq!(cfg.evaluation.seed, Some(7));
    assert_eq!(cfg.haptics.mode, HapticMode::RhythmGuidance);
    assert_eq!(cfg.recorder.frame_rate, 120);

    assert!(ChoreoConfig::from_json_str("{}").is_ok());
    assert!(ChoreoConfig::from_json_str("{ not json").is_err());
    assert!(ChoreoConfig::from_json_str(r#"{ "playback": { "looping": true } }"#).is_err());
    assert!(ChoreoConfig::from_json_str(r#"{ "haptics": { "feedback_interval_ms": 0 } }"#).is_err());
    assert!(ChoreoConfig::preview().validate().is_ok());
}

/// it should run a whole matched session: pause, pass, settle, resume, complete
#[test]
fn matched_session_runs_to_completion() {
    let mut c = conductor(gate_steps_config());
    match_first_pose(&mut c);
    assert_eq!(c.state(), SessionState::Stopped);
    c.start().unwrap();
    assert!(c.is_playing());

    let first = c.step(DT).unwrap();
    assert_eq!(first.stage, StageState::Dance);
    assert_eq!(first.haptics.left, Some([0, 0, 30]));
    assert_eq!(first.haptics.right, Some([0, 40, 0]));

    c.step(DT).unwrap();
    c.step(DT).unwrap();
    let paused = c.step(DT).unwrap();
    assert_eq!(paused.frame_index, 1);
    assert_eq!(event_types(&paused), vec!["checkpoint_reached", "outcome"]);
    assert_eq!(paused.state, SessionState::Settling);
    assert_eq!(paused.stage, StageState::Idle);
    assert_eq!(c.cues().played.len(), 1);
    assert_eq!(c.actuator().stop_count(), 1);

    let mut resumed = None;
    for _ in 0..8 {
        resumed = Some(c.step(DT).unwrap());
    }
    let resumed = resumed.unwrap();
    assert_eq!(resumed.state, SessionState::Playing);
    assert_eq!(event_types(&resumed), vec!["resumed"]);
    assert_eq!(c.scorer().current_index(), 1);

    let mut done = None;
    for _ in 0..8 {
        let frame = c.step(DT).unwrap();
        if frame.state == SessionState::Completed {
            done = Some(frame);
            break;
        }
    }
    let done = done.expect("session completes");
    assert!(event_types(&done).contains(&"completed".to_string()));
    assert_eq!(done.frame_index, 0);
    assert_eq!(c.scorer().current_index(), 0);
    assert_eq!(c.stage.state, StageState::Idle);
    assert_eq!(c.actuator().stop_count(), 2);
    assert_eq!(c.cues().played.len(), 1);
}

/// it should abandon a paused checkpoint on pause and re-evaluate it after restarting
#[test]
fn pause_cancels_pending_evaluation() {
    let mut c = conductor(gate_steps_config());
    c.start().unwrap();
    for _ in 0..4 {
        c.step(DT).unwrap();
    }
    assert_eq!(c.state(), SessionState::PausedAwaitingPerformance);
    assert!(c.start().is_err(), "reentrant start is rejected");

    c.pause();
    assert_eq!(c.state(), SessionState::Stopped);
    let frame = c.step(DT).unwrap();
    assert_eq!(event_types(&frame), vec!["cancelled"]);
    assert_eq!(frame.events[0]["frame"], 1);
    assert!(c.cues().played.is_empty());

    c.start().unwrap();
    let again = c.step(DT).unwrap();
    assert_eq!(event_types(&again), vec!["checkpoint_reached"]);
    assert_eq!(again.state, SessionState::PausedAwaitingPerformance);
}

/// it should rewind on stop with every checkpoint pending and the reference reset
#[test]
fn stop_rewinds() {
    let mut c = conductor(gate_steps_config());
    match_first_pose(&mut c);
    c.start().unwrap();
    for _ in 0..12 {
        c.step(DT).unwrap();
    }
    assert_eq!(c.state(), SessionState::Playing);
    assert_eq!(c.current_frame_index(), 1);
    assert_eq!(c.scorer().current_index(), 1);

    c.stop();
    assert_eq!(c.current_frame_index(), 0);
    assert_eq!(c.state(), SessionState::Stopped);
    assert_eq!(c.scorer().current_index(), 0);
    assert!(!c.is_playing());

    // pull one tracked joint off the pose so the checkpoint holds
    let joint = c.table().tracked()[0];
    c.skeleton_mut().set_world_position(joint, [9.0, 9.0, 9.0]);
    c.start().unwrap();
    let mut last = None;
    for _ in 0..4 {
        last = Some(c.step(DT).unwrap());
    }
    let gated = last.unwrap();
    assert_eq!(gated.state, SessionState::PausedAwaitingPerformance);
    assert_eq!(gated.frame_index, 1);
    assert_eq!(event_types(&gated), vec!["checkpoint_reached"]);
    assert_eq!(gated.events[0]["reference"], 0);
    assert_eq!(c.cues().played.len(), 1);
}

/// it should loop the clip without pausing or cues in preview mode
#[test]
fn preview_loops_without_evaluation() {
    let mut c = conductor(ChoreoConfig::preview());
    c.set_haptic_mode(HapticMode::Rhythm);
    c.start().unwrap();
    assert_eq!(c.step(1.0).unwrap().frame_index, 1);
    assert_eq!(c.step(1.0).unwrap().frame_index, 2);
    let wrapped = c.step(0.5).unwrap();
    assert_eq!(wrapped.frame_index, 0);
    assert_eq!(event_types(&wrapped), vec!["looped"]);
    let looped: PreviewEvent = serde_json::from_value(wrapped.events[0].clone()).unwrap();
    assert_eq!(looped, PreviewEvent::Looped);
    assert_eq!(wrapped.state, SessionState::Playing);
    assert!(c.cues().played.is_empty());
    assert!(!c.actuator().commands.is_empty());

    c.pause();
    assert!(!c.is_playing());
    c.step(1.0).unwrap();
    assert_eq!(c.current_frame_index(), 0);
}

/// it should rewind and stop a one-shot preview at the end of the clip
#[test]
fn one_shot_preview_completes() {
    let mut cfg = ChoreoConfig::preview();
    cfg.playback.looping = false;
    let mut c = conductor(cfg);
    c.start().unwrap();
    let done = c.step(2.0).unwrap();
    assert_eq!(event_types(&done), vec!["completed"]);
    assert_eq!(
        serde_json::from_value::<PreviewEvent>(done.events[0].clone()).unwrap(),
        PreviewEvent::Completed
    );
    assert_eq!(done.frame_index, 0);
    assert_eq!(done.state, SessionState::Stopped);
    assert!(!c.is_playing());
}

/// it should switch haptic modes at any time without touching the session
#[test]
fn haptic_mode_switch_mid_session() {
    let mut c = conductor(gate_steps_config());
    match_first_pose(&mut c);
    c.set_haptic_mode(HapticMode::Baseline);
    c.start().unwrap();
    assert!(c.step(DT).unwrap().haptics.is_empty());
    c.set_haptic_mode(HapticMode::Error);
    let frame = c.step(DT).unwrap();
    assert!(frame.haptics.is_empty(), "matched pose gives zero error");
    assert_eq!(frame.distance, Some(0.0));
    assert_eq!(c.haptic_mode(), HapticMode::Error);
    assert_eq!(c.state(), SessionState::Playing);
}
