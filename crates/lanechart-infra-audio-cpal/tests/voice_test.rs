use lanechart_infra_audio_cpal::{DecodedTrack, Voice, VoiceCommand};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn ramp(frames: usize, sample_rate: u32) -> Arc<DecodedTrack> {
    let left: Vec<f32> = (0..frames).map(|i| i as f32 / 100.0).collect();
    Arc::new(DecodedTrack {
        right: left.iter().map(|s| -s).collect(),
        left,
        sample_rate,
    })
}

fn block(voice: &mut Voice, start: u64, frames: usize) -> (Vec<f32>, Vec<f32>, Option<u64>) {
    let mut left = vec![9.0; frames];
    let mut right = vec![9.0; frames];
    let ended = voice.render(start, &mut left, &mut right);
    (left, right, ended)
}

#[test]
fn idle_voice_renders_silence() {
    let mut voice = Voice::new(100);
    voice.apply(VoiceCommand::Load(ramp(10, 100)));
    let (left, right, ended) = block(&mut voice, 0, 4);
    assert_eq!(left, vec![0.0; 4]);
    assert_eq!(right, vec![0.0; 4]);
    assert_eq!(ended, None);
}

#[test]
fn start_waits_for_its_frame_and_offsets_into_the_source() {
    let mut voice = Voice::new(100);
    voice.apply(VoiceCommand::Load(ramp(10, 100)));
    voice.apply(VoiceCommand::Start {
        source_frame: 3.0,
        start_frame: 2,
        generation: 1,
    });

    let (left, right, ended) = block(&mut voice, 0, 4);

    assert_eq!(left, vec![0.0, 0.0, 0.03, 0.04]);
    assert_eq!(right, vec![0.0, 0.0, -0.03, -0.04]);
    assert_eq!(ended, None);
}

#[test]
fn running_out_reports_the_generation_once() {
    let mut voice = Voice::new(100);
    voice.apply(VoiceCommand::Load(ramp(3, 100)));
    voice.apply(VoiceCommand::Start {
        source_frame: 0.0,
        start_frame: 0,
        generation: 7,
    });

    let (left, _, ended) = block(&mut voice, 0, 5);
    assert_eq!(left, vec![0.0, 0.01, 0.02, 0.0, 0.0]);
    assert_eq!(ended, Some(7));
    assert!(!voice.is_active());

    assert_eq!(block(&mut voice, 5, 5).2, None);
}

#[test]
fn stop_silences_without_reporting_an_end() {
    let mut voice = Voice::new(100);
    voice.apply(VoiceCommand::Load(ramp(10, 100)));
    voice.apply(VoiceCommand::Start {
        source_frame: 0.0,
        start_frame: 0,
        generation: 2,
    });
    voice.apply(VoiceCommand::Stop);

    let (left, _, ended) = block(&mut voice, 0, 3);
    assert_eq!(left, vec![0.0; 3]);
    assert_eq!(ended, None);
}

#[test]
fn source_rate_is_converted_to_device_rate() {
    let mut voice = Voice::new(100);
    voice.apply(VoiceCommand::Load(ramp(10, 200)));
    voice.apply(VoiceCommand::Gain(0.5));
    voice.apply(VoiceCommand::Start {
        source_frame: 0.0,
        start_frame: 0,
        generation: 1,
    });

    let (left, _, _) = block(&mut voice, 0, 3);
    assert_eq!(left, vec![0.0, 0.01, 0.02]);
}
