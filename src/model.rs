use serde::{Deserialize, Serialize};

use crate::cipher::CipherKey;

/// Raw script lines in file order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub lines: Vec<String>,
}

impl Corpus {
    pub fn from_text(raw: &str) -> Self {
        Self {
            lines: raw.lines().map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    StageDirection,
    Spoken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenLine {
    /// Zero-based position in the decoded corpus.
    pub index: usize,
    pub speaker: String,
    pub registered: bool,
    /// Tokens after the speaker label.
    pub words: Vec<String>,
    pub word_count: usize,
    pub char_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// One-based line number.
    pub line_no: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct TokenizedCorpus {
    pub spoken: Vec<SpokenLine>,
    pub stage_directions: usize,
    pub blank_lines: usize,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub longest: usize,
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthCount {
    pub length: usize,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerValue {
    pub speaker: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerShare {
    pub speaker: String,
    pub lines: usize,
    pub share: f64,
}

/// Lines `start..end` of the decoded corpus, opening marker included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSegment {
    pub heading: String,
    pub start: usize,
    pub end: usize,
}

impl SceneSegment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSummary {
    pub total: usize,
    pub spoken: usize,
    pub stage_directions: usize,
    pub blank: usize,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub key: CipherKey,
    pub lines: LineSummary,
    pub word_lengths: Vec<LengthCount>,
    pub top_words: Vec<WordCount>,
    pub line_lengths: Vec<usize>,
    pub longest_speeches: Vec<SpeakerValue>,
    pub line_counts: Vec<SpeakerShare>,
    pub scenes: Vec<SceneSegment>,
    /// Lines after the last scene marker, not part of any segment.
    pub unsegmented_tail: usize,
}

impl Report {
    pub fn scene_lengths(&self) -> Vec<usize> {
        self.scenes.iter().map(SceneSegment::len).collect()
    }
}
