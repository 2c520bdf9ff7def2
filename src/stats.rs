use std::collections::{BTreeMap, HashMap};

use crate::{
    cipher::CipherKey,
    config::AnalysisCfg,
    model::{
        LengthCount, LineSummary, Report, SceneSegment, SpeakerShare, SpeakerValue, SpeechRecord,
        SpokenLine, TokenizedCorpus, WordCount,
    },
    tokenize::SpeakerRegistry,
};

/// Counts keyed by string, remembering first-occurrence order for stable ranking.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    order: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&ix) => self.order[ix].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.order.len());
                self.order.push((key.to_string(), 1));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map(|&ix| self.order[ix].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Highest counts first; equal counts keep first-occurrence order.
    pub fn most_common(&self, k: usize) -> Vec<WordCount> {
        let mut ranked: Vec<&(String, usize)> = self.order.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(k)
            .map(|(word, count)| WordCount {
                word: word.clone(),
                count: *count,
            })
            .collect()
    }
}

/// Per-speaker records. Registered speakers start at zero in registry order; others are
/// appended the first time they speak.
#[derive(Debug, Clone, Default)]
pub struct SpeechTable {
    records: Vec<(String, SpeechRecord)>,
    index: HashMap<String, usize>,
}

impl SpeechTable {
    pub fn seeded(registry: &SpeakerRegistry) -> Self {
        let mut table = Self::default();
        for name in registry.names() {
            table.entry(name);
        }
        table
    }

    fn entry(&mut self, speaker: &str) -> &mut SpeechRecord {
        let ix = match self.index.get(speaker) {
            Some(&ix) => ix,
            None => {
                let ix = self.records.len();
                self.index.insert(speaker.to_string(), ix);
                self.records.push((speaker.to_string(), SpeechRecord::default()));
                ix
            }
        };
        &mut self.records[ix].1
    }

    pub fn record(&mut self, line: &SpokenLine) {
        let rec = self.entry(&line.speaker);
        rec.longest = rec.longest.max(line.char_count.saturating_sub(1));
        rec.lines += 1;
    }

    /// The record for `speaker`, or the zero record if it never spoke.
    #[cfg(test)]
    pub fn get(&self, speaker: &str) -> SpeechRecord {
        self.index
            .get(speaker)
            .map(|&ix| self.records[ix].1)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn longest_speeches(&self, k: usize) -> Vec<SpeakerValue> {
        let mut ranked: Vec<&(String, SpeechRecord)> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.1.longest.cmp(&a.1.longest));
        ranked
            .into_iter()
            .take(k)
            .map(|(speaker, rec)| SpeakerValue {
                speaker: speaker.clone(),
                value: rec.longest,
            })
            .collect()
    }

    /// Top `k` speakers by line count plus one bucket holding everyone else.
    pub fn line_counts(&self, k: usize, other_label: &str) -> Vec<SpeakerShare> {
        let mut ranked: Vec<&(String, SpeechRecord)> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.1.lines.cmp(&a.1.lines));

        let total: usize = ranked.iter().map(|(_, r)| r.lines).sum();
        let share = |lines: usize| {
            if total == 0 {
                0.0
            } else {
                lines as f64 / total as f64
            }
        };

        let mut out: Vec<SpeakerShare> = ranked
            .iter()
            .take(k)
            .map(|(speaker, rec)| SpeakerShare {
                speaker: speaker.clone(),
                lines: rec.lines,
                share: share(rec.lines),
            })
            .collect();

        let others: usize = ranked.iter().skip(k).map(|(_, r)| r.lines).sum();
        out.push(SpeakerShare {
            speaker: other_label.to_string(),
            lines: others,
            share: share(others),
        });
        out
    }
}

/// Length of every whitespace token of `raw`, in characters, counted and sorted by length.
pub fn word_length_histogram(raw: &str) -> Vec<LengthCount> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for w in raw.split_whitespace() {
        *counts.entry(w.chars().count()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(length, count)| LengthCount { length, count })
        .collect()
}

pub fn word_frequencies(
    spoken: &[SpokenLine],
    registry: &SpeakerRegistry,
    min_word_len: usize,
) -> FrequencyTable {
    let mut table = FrequencyTable::default();
    for line in spoken {
        for w in &line.words {
            if w.chars().count() > min_word_len && !registry.contains_entry(w) {
                table.add(w);
            }
        }
    }
    table
}

pub fn line_lengths(spoken: &[SpokenLine]) -> Vec<usize> {
    spoken.iter().map(|l| l.word_count).collect()
}

/// Positions of every line containing `marker`.
pub fn scene_markers(decoded: &[String], marker: &str) -> Vec<usize> {
    decoded
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(marker))
        .map(|(i, _)| i)
        .collect()
}

/// One segment per pair of consecutive markers. Returns the segments and the number of lines
/// from the last marker to the end, which belong to no segment.
pub fn scene_segments(decoded: &[String], marker: &str) -> (Vec<SceneSegment>, usize) {
    let markers = scene_markers(decoded, marker);
    let segments: Vec<SceneSegment> = markers
        .windows(2)
        .map(|w| SceneSegment {
            heading: decoded[w[0]].clone(),
            start: w[0],
            end: w[1],
        })
        .collect();
    let tail = markers.last().map(|&last| decoded.len() - last).unwrap_or(0);
    (segments, tail)
}

pub struct Aggregator<'a> {
    cfg: &'a AnalysisCfg,
    registry: &'a SpeakerRegistry,
}

impl<'a> Aggregator<'a> {
    pub fn new(cfg: &'a AnalysisCfg, registry: &'a SpeakerRegistry) -> Self {
        Self { cfg, registry }
    }

    /// Builds the report. `raw` is the undecoded text and only feeds the word-length histogram.
    pub fn aggregate(
        &self,
        key: CipherKey,
        raw: &str,
        decoded: &[String],
        tokens: TokenizedCorpus,
    ) -> Report {
        let span = tracing::info_span!("aggregate", lines = decoded.len());
        let _g = span.enter();

        let word_lengths = word_length_histogram(raw);

        let freqs = word_frequencies(&tokens.spoken, self.registry, self.cfg.min_word_len);
        let top_words = freqs.most_common(self.cfg.top_words);
        tracing::info!(distinct = freqs.len(), "counted words");

        let mut speeches = SpeechTable::seeded(self.registry);
        for line in &tokens.spoken {
            speeches.record(line);
        }
        tracing::info!(
            speakers = speeches.len(),
            registered = self.registry.len(),
            "built speech table"
        );

        let (scenes, unsegmented_tail) = scene_segments(decoded, &self.cfg.scene_marker);
        if unsegmented_tail > 0 {
            tracing::info!(
                lines = unsegmented_tail,
                "lines after the last scene marker are not part of any scene"
            );
        }
        tracing::info!(scenes = scenes.len(), "segmented scenes");

        Report {
            key,
            lines: LineSummary {
                total: decoded.len(),
                spoken: tokens.spoken.len(),
                stage_directions: tokens.stage_directions,
                blank: tokens.blank_lines,
                skipped: tokens.skipped,
            },
            word_lengths,
            top_words,
            line_lengths: line_lengths(&tokens.spoken),
            longest_speeches: speeches.longest_speeches(self.cfg.top_speakers),
            line_counts: speeches.line_counts(self.cfg.top_speakers, &self.cfg.other_label),
            scenes,
            unsegmented_tail,
        }
    }
}
