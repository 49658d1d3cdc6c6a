use lanechart_domain_chart::WaveformPeaks;
use pretty_assertions::assert_eq;

#[test]
fn peaks_take_absolute_maximum_per_bucket() {
    let samples = [0.1, -0.5, 0.2, 0.3, 0.9];
    let peaks = WaveformPeaks::from_samples(&samples, 2.0, 2);
    assert_eq!(peaks.peaks(), &[0.5, 0.3]);
}

#[test]
fn lookup_respects_buffer_bounds() {
    let peaks = WaveformPeaks::from_samples(&[0.1, -0.5, 0.2, 0.3], 2.0, 2);
    assert_eq!(peaks.peak_at(0.5), Some(0.5));
    assert_eq!(peaks.peak_at(1.5), Some(0.3));
    assert_eq!(peaks.peak_at(2.0), Some(0.0));
    assert_eq!(peaks.peak_at(-0.1), None);
    assert_eq!(peaks.peak_at(2.1), None);
}

#[test]
fn chart_lookup_applies_audio_offset() {
    let peaks = WaveformPeaks::from_samples(&[0.1, -0.5, 0.2, 0.3], 2.0, 2);
    assert_eq!(peaks.peak_at_chart_time(1.5, 1.0), Some(0.5));
    assert_eq!(peaks.peak_at_chart_time(0.5, 1.0), None);
}

#[test]
fn short_buffers_yield_silent_peaks() {
    let peaks = WaveformPeaks::from_samples(&[0.7], 1.0, 4);
    assert_eq!(peaks.peaks(), &[0.0, 0.0, 0.0, 0.0]);
}
