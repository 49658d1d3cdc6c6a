use lanechart_ports::types::{Bpm, GridSnap, Seconds, Tick, BEATS_PER_BAR, TICKS_PER_BAR};

const SECONDS_PER_BAR_AT_ONE_BPM: f64 = 60.0 * BEATS_PER_BAR as f64;

fn ticks_per_second(bpm: Bpm) -> f64 {
    (TICKS_PER_BAR as f64 * bpm.get()) / SECONDS_PER_BAR_AT_ONE_BPM
}

pub fn tick_to_time(tick: Tick, bpm: Bpm) -> Seconds {
    tick as f64 / ticks_per_second(bpm)
}

pub fn time_to_tick(time: Seconds, bpm: Bpm) -> Tick {
    (time * ticks_per_second(bpm)).round() as Tick
}

/// Nearest grid tick for a chart time. Never negative.
pub fn snap_time_to_tick(time: Seconds, bpm: Bpm, snap: GridSnap) -> Tick {
    let raw = time_to_tick(time, bpm);
    let step = snap.ticks();
    let snapped = (raw as f64 / step as f64).round() as Tick * step;
    snapped.max(0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    pub tick: Tick,
    pub time: Seconds,
    pub is_bar: bool,
}

/// Beat lines covering `[time_min, time_max)`, starting from the bar at or before `time_min`.
pub fn grid_lines(time_min: Seconds, time_max: Seconds, bpm: Bpm) -> Vec<GridLine> {
    if !time_min.is_finite() || !time_max.is_finite() {
        return Vec::new();
    }
    let ticks_per_beat = TICKS_PER_BAR / BEATS_PER_BAR;
    let bar_time = tick_to_time(TICKS_PER_BAR, bpm);
    let first_bar = (time_min / bar_time).floor() as Tick;

    let mut lines = Vec::new();
    let mut tick = first_bar * TICKS_PER_BAR;
    loop {
        let time = tick_to_time(tick, bpm);
        if time >= time_max {
            break;
        }
        lines.push(GridLine {
            tick,
            time,
            is_bar: tick % TICKS_PER_BAR == 0,
        });
        tick += ticks_per_beat;
    }
    lines
}

/// `mm:ss.cc` for a chart position; negative input shows as zero.
pub fn format_time(time: Seconds) -> String {
    let t = time.max(0.0);
    let mins = (t / 60.0).floor() as u64;
    let secs = (t % 60.0).floor() as u64;
    let centis = ((t % 1.0) * 100.0).floor() as u64;
    format!("{mins:02}:{secs:02}.{centis:02}")
}

pub fn format_offset_ms(offset: Seconds) -> String {
    format!("{}ms", (offset * 1000.0).round() as i64)
}
