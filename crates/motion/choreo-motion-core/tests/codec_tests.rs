use choreo_motion::{
    clip_to_samples, decode, encode, CodecError, JointTable, LocalTransform, Recorder,
    RecorderConfig, Sample,
};
use choreo_motion::{MemorySkeleton, SkeletonSampler};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn arm_wave() -> String {
    choreo_test_fixtures::clips::text("arm-wave").expect("arm-wave fixture")
}

/// it should skip rows with an unparsable time and keep frame numbers from the source
#[test]
fn decode_skips_bad_time_rows() {
    let table = JointTable::humanoid();
    let clip = decode(&arm_wave(), &table).unwrap();
    let times: Vec<f32> = clip.frames().iter().map(|f| f.timestamp).collect();
    assert_eq!(times, vec![0.0, 0.1, 0.2, 0.3, 0.4]);
    let numbers: Vec<Option<u32>> = clip.frames().iter().map(|f| f.number).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(4), Some(5), Some(6)]);
}

/// it should match joint names case-insensitively and pick up position triples
#[test]
fn decode_resolves_joints_and_positions() {
    let table = JointTable::humanoid();
    let left = table.get("LeftUpperArm").unwrap();
    let right = table.get("RightUpperArm").unwrap();
    let clip = decode(&arm_wave(), &table).unwrap();

    let first = &clip.frames()[0];
    assert_eq!(first.joints.len(), 2);
    let l = first.get(left).unwrap();
    assert_eq!(l.rotation, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(l.position, Some([0.1, 1.4, 0.0]));
    let r = first.get(right).unwrap();
    assert_eq!(r.position, None);
    approx(clip.frames()[1].get(right).unwrap().rotation[2], -0.3827, 1e-6);
}

/// it should drop only the joint whose numeric run is truncated, not the whole row
#[test]
fn decode_drops_truncated_joint_only() {
    let table = JointTable::humanoid();
    let clip = decode(&arm_wave(), &table).unwrap();
    let truncated = &clip.frames()[3];
    assert_eq!(truncated.number, Some(5));
    assert!(truncated.get(table.get("LeftUpperArm").unwrap()).is_some());
    assert!(truncated.get(table.get("RightUpperArm").unwrap()).is_none());
}

/// it should ignore columns for joints the skeleton does not know
#[test]
fn decode_ignores_unknown_columns() {
    let table = JointTable::from_names(["LeftUpperArm"]);
    let clip = decode(&arm_wave(), &table).unwrap();
    assert!(clip.frames().iter().all(|f| f.joints.len() <= 1));
}

/// it should report empty and non-monotonic sources as errors
#[test]
fn decode_errors() {
    let table = JointTable::humanoid();
    assert_eq!(decode("", &table).unwrap_err(), CodecError::Empty);
    assert_eq!(decode("Frame,Time\n", &table).unwrap_err(), CodecError::Empty);
    assert_eq!(
        decode("Frame,Time\n1,x\n2,y\n", &table).unwrap_err(),
        CodecError::Empty
    );
    assert_eq!(
        decode("Frame,Time\n1,1.0\n2,0.5\n", &table).unwrap_err(),
        CodecError::NonMonotonicTime { row: 2 }
    );
}

/// it should accept CRLF line endings and blank lines
#[test]
fn decode_handles_crlf() {
    let table = JointTable::from_names(["Hips"]);
    let text = "Frame,Time,Hips_RotX,Hips_RotY,Hips_RotZ,Hips_RotW\r\n\r\n1,0.5,0,0,0,1\r\n";
    let clip = decode(text, &table).unwrap();
    assert_eq!(clip.len(), 1);
    assert_eq!(clip.frames()[0].timestamp, 0.5);
}

/// it should write a fixed header and 3/4-decimal fields with a `.` separator
#[test]
fn encode_exact_layout() {
    let table = JointTable::from_names(["Hips"]);
    let hips = table.get("Hips").unwrap();
    let mut sample = Sample {
        number: 1,
        time: 1.0 / 120.0,
        ..Default::default()
    };
    sample.transforms.insert(
        hips,
        LocalTransform {
            rotation: [0.0, 0.0, 0.0, 1.0],
            position: [0.1, -0.25, 2.0],
        },
    );
    let text = encode(&[sample], &table);
    assert_eq!(
        text,
        "Frame,Time,Hips_RotX,Hips_RotY,Hips_RotZ,Hips_RotW,Hips_PosX,Hips_PosY,Hips_PosZ\n\
         1,0.008,0.0000,0.0000,0.0000,1.0000,0.1000,-0.2500,2.0000\n"
    );
}

/// it should zero-fill joints without a sample so every row has the same width
#[test]
fn encode_zero_fills_missing_joints() {
    let table = JointTable::from_names(["Hips", "Spine", "Head"]);
    let mut sample = Sample {
        number: 3,
        time: 0.25,
        ..Default::default()
    };
    sample.transforms.insert(
        table.get("Spine").unwrap(),
        LocalTransform {
            rotation: [0.0, 0.0, 0.0, 1.0],
            position: [0.0; 3],
        },
    );
    let text = encode(&[sample], &table);
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 2);
    let header_cols = rows[0].split(',').count();
    assert_eq!(header_cols, 2 + 3 * 7);
    let cols: Vec<&str> = rows[1].split(',').collect();
    assert_eq!(cols.len(), header_cols);
    assert!(cols[2..9].iter().all(|c| *c == "0"));
    assert!(cols[16..23].iter().all(|c| *c == "0"));
}

/// it should reproduce sampled values within the encoded precision
#[test]
fn round_trip_within_tolerance() {
    let table = JointTable::from_names(["Hips", "LeftHand", "RightHand"]);
    let hips = table.get("Hips").unwrap();
    let left = table.get("LeftHand").unwrap();
    let samples: Vec<Sample> = (1..=5u32)
        .map(|n| {
            let mut s = Sample {
                number: n,
                time: n as f32 / 120.0,
                ..Default::default()
            };
            let k = n as f32 * 0.0371;
            s.transforms.insert(
                hips,
                LocalTransform {
                    rotation: [k, -k * 0.5, 0.1234, 0.98],
                    position: [k * 3.0, 1.0123, -0.4321],
                },
            );
            if n % 2 == 0 {
                s.transforms.insert(
                    left,
                    LocalTransform {
                        rotation: [0.0, 0.7071, 0.0, 0.7071],
                        position: [0.25, 0.0, -0.125],
                    },
                );
            }
            s
        })
        .collect();

    let clip = decode(&encode(&samples, &table), &table).unwrap();
    assert_eq!(clip.len(), samples.len());
    for (frame, sample) in clip.frames().iter().zip(&samples) {
        assert_eq!(frame.number, Some(sample.number));
        approx(frame.timestamp, sample.time, 0.0005 + 1e-6);
        assert_eq!(frame.joints.len(), sample.transforms.len());
        for pose in &frame.joints {
            let expected = sample.transforms[&pose.joint];
            for k in 0..4 {
                approx(pose.rotation[k], expected.rotation[k], 0.00005 + 1e-6);
            }
            let pos = pose.position.expect("encoded clips carry positions");
            for k in 0..3 {
                approx(pos[k], expected.position[k], 0.00005 + 1e-6);
            }
        }
    }

    // decoded clips convert back to the same samples
    let again = clip_to_samples(&clip);
    assert_eq!(again.len(), samples.len());
    assert_eq!(again[1].transforms.len(), 2);
}

/// it should sample at the configured rate, starting on the first tick
#[test]
fn recorder_samples_at_fixed_rate() {
    let table = JointTable::from_names(["Hips", "Head"]);
    let hips = table.get("Hips").unwrap();
    let mut skeleton = MemorySkeleton::new();
    skeleton.set_local_transform(
        hips,
        LocalTransform {
            rotation: [0.0, 0.0, 0.3827, 0.9239],
            position: [0.0, 1.0, 0.0],
        },
    );
    assert!(skeleton.joint_local_transform(table.get("Head").unwrap()).is_none());

    let mut rec = Recorder::new(table.clone(), &RecorderConfig { frame_rate: 4 });
    assert_eq!(rec.tick(1.0, &skeleton), 0, "idle recorder ignores ticks");
    rec.start();
    assert_eq!(rec.tick(0.125, &skeleton), 1);
    assert_eq!(rec.tick(0.125, &skeleton), 1);
    assert_eq!(rec.tick(0.5, &skeleton), 2);
    assert_eq!(rec.sample_count(), 4);

    let text = rec.stop().expect("recording produced text");
    assert!(!rec.is_recording());
    assert!(rec.stop().is_none());

    let clip = decode(&text, &table).unwrap();
    let times: Vec<f32> = clip.frames().iter().map(|f| f.timestamp).collect();
    assert_eq!(times, vec![0.25, 0.5, 0.75, 1.0]);
    for frame in clip.frames() {
        assert_eq!(frame.joints.len(), 1, "unsampled joint is zero-filled and dropped");
        approx(frame.joints[0].rotation[3], 0.9239, 1e-6);
    }
}
