//! Text frame-table codec for motion clips.
//!
//! Layout: a header row naming columns, then one row per frame:
//!
//! ```text
//! Frame,Time,<Joint>_RotX,<Joint>_RotY,<Joint>_RotZ,<Joint>_RotW[,<Joint>_PosX,<Joint>_PosY,<Joint>_PosZ]...
//! ```
//!
//! Decoding is lenient: rows with an unparsable time are dropped, joints with
//! too few numeric fields are dropped from that frame only, unknown columns are
//! ignored. Encoding always writes seven columns per joint in table order.

use hashbrown::HashMap;
use log::debug;

use crate::data::{quat_norm, Frame, JointPose, LocalTransform, MotionClip, Quat, Vec3};
use crate::error::CodecError;
use crate::ids::{JointId, JointTable};

const ROT_SUFFIXES: [&str; 4] = ["_RotX", "_RotY", "_RotZ", "_RotW"];
const POS_SUFFIXES: [&str; 3] = ["_PosX", "_PosY", "_PosZ"];

/// One recorded row: frame number, time and the sampled local transforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    pub number: u32,
    pub time: f32,
    pub transforms: HashMap<JointId, LocalTransform>,
}

/// Rotation column group for one joint, found in the header.
#[derive(Clone, Copy, Debug)]
struct ColumnGroup {
    joint: JointId,
    offset: usize,
    has_position: bool,
}

impl ColumnGroup {
    fn width(&self) -> usize {
        if self.has_position {
            7
        } else {
            4
        }
    }
}

fn strip_suffix_ignore_case<'a>(col: &'a str, suffix: &str) -> Option<&'a str> {
    if col.len() < suffix.len() || !col.is_char_boundary(col.len() - suffix.len()) {
        return None;
    }
    let (head, tail) = col.split_at(col.len() - suffix.len());
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

fn column_is(header: &[&str], idx: usize, joint: &str, suffix: &str) -> bool {
    header
        .get(idx)
        .and_then(|c| strip_suffix_ignore_case(c.trim(), suffix))
        .is_some_and(|name| name.eq_ignore_ascii_case(joint))
}

fn parse_header(header: &[&str], table: &JointTable) -> Vec<ColumnGroup> {
    let mut groups: Vec<ColumnGroup> = Vec::new();
    for (i, raw) in header.iter().enumerate() {
        let col = raw.trim();
        let Some(name) = strip_suffix_ignore_case(col, ROT_SUFFIXES[0]) else {
            continue;
        };
        let Some(joint) = table.get(name) else {
            debug!("codec: ignoring rotation column for unknown joint '{name}'");
            continue;
        };
        if groups.iter().any(|g| g.joint == joint) {
            debug!("codec: duplicate rotation columns for '{name}', keeping the first");
            continue;
        }
        let has_position = POS_SUFFIXES
            .iter()
            .enumerate()
            .all(|(k, suffix)| column_is(header, i + 4 + k, name, suffix));
        groups.push(ColumnGroup {
            joint,
            offset: i,
            has_position,
        });
    }
    groups
}

fn parse_number(token: &str) -> Option<f32> {
    token.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Parse `count` contiguous numeric tokens starting at `offset`.
fn parse_run<const N: usize>(tokens: &[&str], offset: usize) -> Option<[f32; N]> {
    let slice = tokens.get(offset..offset + N)?;
    let mut out = [0.0f32; N];
    for (dst, tok) in out.iter_mut().zip(slice) {
        *dst = parse_number(tok)?;
    }
    Some(out)
}

fn parse_joint(tokens: &[&str], group: &ColumnGroup) -> Option<JointPose> {
    if tokens.len() < group.offset + group.width() {
        return None;
    }
    let rotation: Quat = parse_run::<4>(tokens, group.offset)?;
    let position: Option<Vec3> = if group.has_position {
        Some(parse_run::<3>(tokens, group.offset + 4)?)
    } else {
        None
    };
    // Zero-filled rows mark joints that were not sampled.
    if quat_norm(rotation) <= f32::EPSILON {
        return None;
    }
    Some(JointPose {
        joint: group.joint,
        rotation,
        position,
    })
}

/// Decode clip text against the joint set of a skeleton.
pub fn decode(text: &str, table: &JointTable) -> Result<MotionClip, CodecError> {
    let mut lines = text
        .split(['\r', '\n'])
        .filter(|l| !l.trim().is_empty());

    let header_line = lines.next().ok_or(CodecError::Empty)?;
    let header: Vec<&str> = header_line.split(',').collect();
    let groups = parse_header(&header, table);

    let mut frames: Vec<Frame> = Vec::new();
    let mut last_time = -f32::INFINITY;
    for (row, line) in lines.enumerate() {
        let tokens: Vec<&str> = line.split(',').collect();
        if tokens.len() < 2 {
            continue;
        }
        let Some(time) = parse_number(tokens[1]) else {
            debug!("codec: skipping row {} with unparsable time", row + 1);
            continue;
        };
        if time < last_time {
            return Err(CodecError::NonMonotonicTime { row: row + 1 });
        }
        last_time = time;

        let mut frame = Frame::new(time);
        frame.number = tokens[0].trim().parse::<u32>().ok();
        for group in &groups {
            if let Some(pose) = parse_joint(&tokens, group) {
                frame.set(pose);
            }
        }
        frames.push(frame);
    }

    if frames.is_empty() {
        return Err(CodecError::Empty);
    }
    Ok(MotionClip::from_validated(frames))
}

fn header_row(table: &JointTable) -> String {
    let mut cols: Vec<String> = Vec::with_capacity(2 + table.len() * 7);
    cols.push("Frame".into());
    cols.push("Time".into());
    for (_, name) in table.iter() {
        for suffix in ROT_SUFFIXES.iter().chain(POS_SUFFIXES.iter()) {
            cols.push(format!("{name}{suffix}"));
        }
    }
    cols.join(",")
}

fn sample_row(sample: &Sample, table: &JointTable) -> String {
    let mut cols: Vec<String> = Vec::with_capacity(2 + table.len() * 7);
    cols.push(sample.number.to_string());
    cols.push(format!("{:.3}", sample.time));
    for (joint, _) in table.iter() {
        match sample.transforms.get(&joint) {
            Some(t) => {
                for v in t.rotation.iter().chain(t.position.iter()) {
                    cols.push(format!("{v:.4}"));
                }
            }
            None => cols.extend(std::iter::repeat("0".to_string()).take(7)),
        }
    }
    cols.join(",")
}

/// Encode samples with a fixed column layout: `Frame,Time`, then seven columns
/// per joint of `table` in table order.
pub fn encode(samples: &[Sample], table: &JointTable) -> String {
    let mut out = header_row(table);
    out.push('\n');
    for sample in samples {
        out.push_str(&sample_row(sample, table));
        out.push('\n');
    }
    out
}

/// Convert a decoded clip back into samples. Frames without a number are
/// numbered by position (1-based); missing positions become the origin.
pub fn clip_to_samples(clip: &MotionClip) -> Vec<Sample> {
    clip.frames()
        .iter()
        .enumerate()
        .map(|(i, f)| Sample {
            number: f.number.unwrap_or(i as u32 + 1),
            time: f.timestamp,
            transforms: f
                .joints
                .iter()
                .map(|p| {
                    (
                        p.joint,
                        LocalTransform {
                            rotation: p.rotation,
                            position: p.position.unwrap_or([0.0; 3]),
                        },
                    )
                })
                .collect(),
        })
        .collect()
}
