//! Fixed-rate recorder producing clip text from a live skeleton.

use log::info;

use crate::codec::{encode, Sample};
use crate::config::RecorderConfig;
use crate::ids::JointTable;
use crate::skeleton::SkeletonSampler;

#[derive(Debug)]
pub struct Recorder {
    table: JointTable,
    frame_rate: u32,
    recording: bool,
    accum: f32,
    samples: Vec<Sample>,
}

impl Recorder {
    /// Record every joint of `table`, in table order.
    pub fn new(table: JointTable, cfg: &RecorderConfig) -> Self {
        Self {
            table,
            frame_rate: cfg.frame_rate.max(1),
            recording: false,
            accum: 0.0,
            samples: Vec::new(),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    fn interval(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    /// Begin a new recording. No-op while already recording.
    pub fn start(&mut self) {
        if self.recording {
            return;
        }
        self.recording = true;
        self.samples.clear();
        // First sample is taken on the next tick.
        self.accum = self.interval();
        info!("recording started at {} fps", self.frame_rate);
    }

    /// Accumulate `dt` and capture one sample per elapsed interval. Returns the
    /// number of samples captured.
    pub fn tick<S: SkeletonSampler + ?Sized>(&mut self, dt: f32, sampler: &S) -> usize {
        if !self.recording {
            return 0;
        }
        if dt.is_finite() && dt > 0.0 {
            self.accum += dt;
        }
        let interval = self.interval();
        let mut captured = 0;
        while self.accum >= interval {
            self.accum -= interval;
            self.capture(sampler);
            captured += 1;
        }
        captured
    }

    fn capture<S: SkeletonSampler + ?Sized>(&mut self, sampler: &S) {
        let number = self.samples.len() as u32 + 1;
        let transforms = self
            .table
            .iter()
            .filter_map(|(id, _)| sampler.joint_local_transform(id).map(|t| (id, t)))
            .collect();
        self.samples.push(Sample {
            number,
            time: number as f32 / self.frame_rate as f32,
            transforms,
        });
    }

    /// Stop recording and return the encoded clip text, or `None` if idle.
    pub fn stop(&mut self) -> Option<String> {
        if !self.recording {
            return None;
        }
        self.recording = false;
        let text = encode(&self.samples, &self.table);
        info!("recording stopped after {} samples", self.samples.len());
        self.samples.clear();
        self.accum = 0.0;
        Some(text)
    }
}
