pub mod json;
pub mod tsv;
pub mod txt;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{
        cipher::CipherKey,
        model::{
            LengthCount, LineSummary, Report, SceneSegment, SkippedLine, SpeakerShare,
            SpeakerValue, WordCount,
        },
    };

    pub fn sample_report() -> Report {
        Report {
            key: CipherKey {
                threshold: 1.0,
                threshold_index: 2,
                shift: 1,
            },
            lines: LineSummary {
                total: 12,
                spoken: 7,
                stage_directions: 4,
                blank: 0,
                skipped: vec![SkippedLine {
                    line_no: 7,
                    text: "Exit, pursued by a bear".to_string(),
                }],
            },
            word_lengths: vec![
                LengthCount { length: 1, count: 3 },
                LengthCount { length: 4, count: 2 },
            ],
            top_words: vec![
                WordCount {
                    word: "gracious".to_string(),
                    count: 2,
                },
                WordCount {
                    word: "lord,".to_string(),
                    count: 1,
                },
            ],
            line_lengths: vec![3, 0, 5],
            longest_speeches: vec![SpeakerValue {
                speaker: "LEONTES".to_string(),
                value: 42,
            }],
            line_counts: vec![
                SpeakerShare {
                    speaker: "LEONTES".to_string(),
                    lines: 3,
                    share: 0.75,
                },
                SpeakerShare {
                    speaker: "Other".to_string(),
                    lines: 1,
                    share: 0.25,
                },
            ],
            scenes: vec![
                SceneSegment {
                    heading: "[[SCENE I]]".to_string(),
                    start: 0,
                    end: 5,
                },
                SceneSegment {
                    heading: "[[SCENE II]]".to_string(),
                    start: 5,
                    end: 9,
                },
            ],
            unsegmented_tail: 3,
        }
    }
}
