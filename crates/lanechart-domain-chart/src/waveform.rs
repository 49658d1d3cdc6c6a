use lanechart_ports::types::Seconds;

pub const PEAK_RESOLUTION: usize = 10_000;

/// Absolute-maximum envelope of a mono buffer at a fixed resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformPeaks {
    peaks: Vec<f32>,
    duration: Seconds,
}

impl WaveformPeaks {
    pub fn from_samples(samples: &[f32], duration: Seconds, resolution: usize) -> Self {
        let resolution = resolution.max(1);
        let step = samples.len() / resolution;
        let peaks = (0..resolution)
            .map(|i| {
                let start = i * step;
                samples[start..start + step]
                    .iter()
                    .fold(0.0f32, |max, sample| max.max(sample.abs()))
            })
            .collect();
        Self { peaks, duration }
    }

    pub fn resolution(&self) -> usize {
        self.peaks.len()
    }

    pub fn duration(&self) -> Seconds {
        self.duration
    }

    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    /// Peak at a position in the source (not chart time); `None` outside the buffer.
    pub fn peak_at(&self, source_time: Seconds) -> Option<f32> {
        if source_time < 0.0 || source_time > self.duration || self.duration <= 0.0 {
            return None;
        }
        let index = ((source_time / self.duration) * self.peaks.len() as f64).floor() as usize;
        Some(self.peaks.get(index).copied().unwrap_or(0.0))
    }

    /// Peak under the chart position, shifting by the audio offset.
    pub fn peak_at_chart_time(&self, chart_time: Seconds, audio_offset: Seconds) -> Option<f32> {
        self.peak_at(chart_time - audio_offset)
    }
}
