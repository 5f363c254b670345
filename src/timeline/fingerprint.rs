use xxhash_rust::xxh3::Xxh3;

use crate::{
    foundation::core::TimeSpan,
    timeline::model::{
        AudioTrack, ContentRef, DurationSummary, EventPayload, Segment, SegmentRole, Timeline,
        TrackEvent, TimelineMode,
    },
};

const XXH3_SEED: u64 = 0x5b1c_e7a2_40d3_9f16;

/// Content-derived timeline id, `tl-<32 hex digits>`.
///
/// Everything except the id itself is hashed, so identical compositions share an id and any
/// change in segments, tracks or durations yields a new one.
pub fn timeline_id(timeline: &Timeline) -> String {
    let mut h = StableHasher::new();
    write_timeline(&mut h, timeline);
    format!("tl-{:032x}", h.finish())
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_span(&mut self, s: TimeSpan) {
        self.write_f64(s.start);
        self.write_f64(s.end);
    }

    fn finish(self) -> u128 {
        self.inner.digest128()
    }
}

fn write_timeline(h: &mut StableHasher, tl: &Timeline) {
    h.write_u32(tl.canvas.width);
    h.write_u32(tl.canvas.height);
    h.write_u32(tl.fps.num);
    h.write_u32(tl.fps.den);
    h.write_u8(match tl.mode {
        TimelineMode::Sequence => 0,
        TimelineMode::Cutaway => 1,
    });

    h.write_u32(tl.segments.len() as u32);
    for seg in &tl.segments {
        write_segment(h, seg);
    }

    for (_, track) in tl.tracks.audio_tracks() {
        match track {
            None => h.write_u8(0),
            Some(t) => {
                h.write_u8(1);
                write_audio(h, t);
            }
        }
    }
    for (_, events) in tl.tracks.event_lists() {
        h.write_u32(events.len() as u32);
        for ev in events {
            write_event(h, ev);
        }
    }

    write_durations(h, &tl.durations);
}

fn write_content(h: &mut StableHasher, c: &ContentRef) {
    h.write_u8(u8::from(c.is_library()));
    h.write_str(c.id());
}

fn write_segment(h: &mut StableHasher, seg: &Segment) {
    h.write_str(&seg.id);
    write_content(h, &seg.content);
    h.write_str(&seg.url);
    h.write_span(seg.trim);
    match &seg.transition_out {
        None => h.write_u8(0),
        Some(tr) => {
            h.write_u8(1);
            // Serde names are the stable spelling of each kind.
            let kind = serde_json::to_string(&tr.kind).unwrap_or_default();
            h.write_str(&kind);
            h.write_f64(tr.duration);
        }
    }
    match seg.role {
        SegmentRole::Clip => h.write_u8(0),
        SegmentRole::LeadIn => h.write_u8(1),
        SegmentRole::LeadOut => h.write_u8(2),
        SegmentRole::Primary { source_audio } => {
            h.write_u8(3);
            h.write_span(source_audio);
        }
        SegmentRole::Cutaway { source_audio } => {
            h.write_u8(4);
            h.write_span(source_audio);
        }
    }
}

fn write_audio(h: &mut StableHasher, t: &AudioTrack) {
    write_content(h, &t.content);
    h.write_str(&t.url);
    h.write_f64(t.offset);
    h.write_f64(t.duration);
    h.write_f32(t.volume);
    h.write_u8(u8::from(t.looped));
}

fn write_event(h: &mut StableHasher, ev: &TrackEvent) {
    h.write_f64(ev.offset);
    h.write_f64(ev.duration);
    match &ev.payload {
        EventPayload::Content { content, url } => {
            h.write_u8(0);
            write_content(h, content);
            h.write_str(url);
        }
        EventPayload::Text { text } => {
            h.write_u8(1);
            h.write_str(text);
        }
    }
    // serde_json maps are ordered, so this is stable.
    h.write_str(&ev.params.to_string());
}

fn write_durations(h: &mut StableHasher, d: &DurationSummary) {
    h.write_f64(d.target);
    h.write_f64(d.total);
    h.write_f64(d.core);
    h.write_f64(d.lead_in);
    h.write_f64(d.lead_out);
    h.write_f64(d.transition_overlap);
    h.write_u64(d.total_frames);
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/fingerprint.rs"]
mod tests;
