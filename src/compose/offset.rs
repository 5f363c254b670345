use crate::{
    compose::diagnostics::Diagnostic,
    timeline::model::{AudioTrack, Segment, TrackEvent, TrackKind, Tracks},
};

/// Core segments wrapped with their leads, tracks in timeline time.
#[derive(Clone, Debug, PartialEq)]
pub struct Placed {
    pub segments: Vec<Segment>,
    pub tracks: Tracks,
    pub lead_in: f64,
    pub core: f64,
    pub lead_out: f64,
    /// `lead_in + core + lead_out`.
    pub total: f64,
}

/// Shift every event by `delta` seconds. Nothing else changes.
pub fn offset_events(events: Vec<TrackEvent>, delta: f64) -> Vec<TrackEvent> {
    events
        .into_iter()
        .map(|mut ev| {
            ev.offset += delta;
            ev
        })
        .collect()
}

fn offset_audio(track: Option<AudioTrack>, delta: f64) -> Option<AudioTrack> {
    track.map(|mut t| {
        t.offset += delta;
        t
    })
}

/// Shift all secondary tracks by `delta` seconds.
pub fn offset_tracks(tracks: Tracks, delta: f64) -> Tracks {
    Tracks {
        narration: offset_audio(tracks.narration, delta),
        music: offset_audio(tracks.music, delta),
        sound_effects: offset_events(tracks.sound_effects, delta),
        overlays: offset_events(tracks.overlays, delta),
        text_effects: offset_events(tracks.text_effects, delta),
        captions: offset_events(tracks.captions, delta),
    }
}

/// Keep core-relative tracks inside `[0, core]`.
///
/// Events and audio starting outside `[0, core)` are dropped and events running past the end
/// are trimmed.
/// Narration plays at most until the core ends; music always covers the rest of the core,
/// looping when its item is shorter.
pub fn fit_tracks_to_core(tracks: Tracks, core: f64, diags: &mut Vec<Diagnostic>) -> Tracks {
    let narration = fit_audio(TrackKind::Narration, tracks.narration, core, diags).map(|mut n| {
        n.duration = n.duration.min(core - n.offset);
        n
    });
    let music = fit_audio(TrackKind::Music, tracks.music, core, diags).map(|mut m| {
        let needed = core - m.offset;
        m.looped = m.duration < needed;
        m.duration = needed;
        m
    });

    Tracks {
        narration,
        music,
        sound_effects: fit_events(TrackKind::SoundEffect, tracks.sound_effects, core, diags),
        overlays: fit_events(TrackKind::Overlay, tracks.overlays, core, diags),
        text_effects: fit_events(TrackKind::TextEffect, tracks.text_effects, core, diags),
        captions: fit_events(TrackKind::Caption, tracks.captions, core, diags),
    }
}

fn fit_audio(
    track: TrackKind,
    audio: Option<AudioTrack>,
    core: f64,
    diags: &mut Vec<Diagnostic>,
) -> Option<AudioTrack> {
    let audio = audio?;
    if audio.offset < 0.0 || audio.offset >= core {
        diags.push(Diagnostic::TrackEventDropped {
            track,
            offset: audio.offset,
        });
        return None;
    }
    Some(audio)
}

fn fit_events(
    track: TrackKind,
    events: Vec<TrackEvent>,
    core: f64,
    diags: &mut Vec<Diagnostic>,
) -> Vec<TrackEvent> {
    let mut out = Vec::with_capacity(events.len());
    for mut ev in events {
        let span = ev.span();
        if span.start < 0.0 || span.start >= core {
            diags.push(Diagnostic::TrackEventDropped {
                track,
                offset: span.start,
            });
            continue;
        }
        if span.end > core {
            let room = core - span.start;
            diags.push(Diagnostic::TrackEventTrimmed {
                track,
                offset: span.start,
                from: span.len(),
                to: room,
            });
            ev.duration = room;
        }
        out.push(ev);
    }
    out
}

/// Wrap the core with optional leads and move every track past the lead-in.
///
/// Lead segments carry no transitions, so each adds exactly its visible duration. A missing
/// lead contributes zero.
pub fn propagate_offsets(
    core_segments: Vec<Segment>,
    core: f64,
    lead_in: Option<Segment>,
    lead_out: Option<Segment>,
    tracks: Tracks,
) -> Placed {
    let lead_in_dur = lead_in.as_ref().map_or(0.0, Segment::visible_duration);
    let lead_out_dur = lead_out.as_ref().map_or(0.0, Segment::visible_duration);

    let mut segments = Vec::with_capacity(core_segments.len() + 2);
    segments.extend(lead_in);
    segments.extend(core_segments);
    segments.extend(lead_out);

    Placed {
        segments,
        tracks: offset_tracks(tracks, lead_in_dur),
        lead_in: lead_in_dur,
        core,
        lead_out: lead_out_dur,
        total: lead_in_dur + core + lead_out_dur,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/offset.rs"]
mod tests;
