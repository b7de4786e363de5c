use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Turn;

/// A shaped diarization segment: a [`Turn`] plus its derived duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub speaker: String,
}

/// Aggregate talk-time statistics for one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStats {
    /// Seconds, rounded to 2 decimals.
    pub total_duration: f64,
    /// Share of the grand total, rounded to 1 decimal. Exactly 0 when the
    /// grand total is 0.
    pub percentage: f64,
    pub segment_count: usize,
}

/// The full response body of a diarization request.
///
/// This is an error-as-value type: a failed pipeline invocation produces a
/// report with `success: false` and empty collections rather than an HTTP
/// error, so the transport layer always answers 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub segments: Vec<Segment>,
    /// Keyed by speaker label; BTreeMap keeps the serialized order stable.
    pub speaker_statistics: BTreeMap<String, SpeakerStats>,
    pub total_speakers: usize,
    pub total_duration: f64,
    pub speakers_found: Vec<String>,
}

impl DiarizationReport {
    /// Shapes raw pipeline turns into segments and per-speaker statistics.
    ///
    /// Input order is preserved in `segments`. Statistics are computed from
    /// unrounded durations and rounded only for presentation.
    pub fn from_turns(turns: impl IntoIterator<Item = Turn>) -> Self {
        let mut segments = Vec::new();
        let mut durations: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut total_duration = 0.0;

        for turn in turns {
            let duration = turn.end_time - turn.start_time;
            total_duration += duration;

            let entry = durations.entry(turn.speaker.clone()).or_insert((0.0, 0));
            entry.0 += duration;
            entry.1 += 1;

            segments.push(Segment {
                start_time: turn.start_time,
                end_time: turn.end_time,
                duration: round2(duration),
                speaker: turn.speaker,
            });
        }

        let speaker_statistics: BTreeMap<String, SpeakerStats> = durations
            .iter()
            .map(|(speaker, &(duration, count))| {
                let percentage = if total_duration > 0.0 {
                    round1(duration / total_duration * 100.0)
                } else {
                    0.0
                };
                (
                    speaker.clone(),
                    SpeakerStats {
                        total_duration: round2(duration),
                        percentage,
                        segment_count: count,
                    },
                )
            })
            .collect();

        let speakers_found: Vec<String> = speaker_statistics.keys().cloned().collect();

        Self {
            success: true,
            error: None,
            total_speakers: speakers_found.len(),
            total_duration: round2(total_duration),
            segments,
            speaker_statistics,
            speakers_found,
        }
    }

    /// A failed report: the error message plus empty/zero collections.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            segments: Vec::new(),
            speaker_statistics: BTreeMap::new(),
            total_speakers: 0,
            total_duration: 0.0,
            speakers_found: Vec::new(),
        }
    }

    /// Maps a pipeline outcome into the always-200 contract.
    pub fn from_outcome(outcome: anyhow::Result<Vec<Turn>>) -> Self {
        match outcome {
            Ok(turns) => Self::from_turns(turns),
            Err(e) => Self::failure(e),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
