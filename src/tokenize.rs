use crate::{
    config::{MissingSeparator, TokenizerCfg},
    error::AnalysisError,
    model::{LineKind, SkippedLine, SpokenLine, TokenizedCorpus},
};

/// Speaker labels accepted for the run, kept both verbatim and with trailing separators removed.
#[derive(Debug, Clone)]
pub struct SpeakerRegistry {
    entries: Vec<String>,
    names: Vec<String>,
}

impl SpeakerRegistry {
    pub fn new(entries: &[String], separator: char) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(entries.len());
        for e in entries {
            let name = e.trim_end_matches(separator).to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self {
            entries: entries.to_vec(),
            names,
        }
    }

    /// Exact match against a label as written in the registry.
    pub fn contains_entry(&self, word: &str) -> bool {
        self.entries.iter().any(|e| e == word)
    }

    /// Match against a label with its trailing separators stripped.
    pub fn is_registered(&self, speaker: &str) -> bool {
        self.names.iter().any(|n| n == speaker)
    }

    /// Stripped names in registry order, duplicates removed.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

pub struct Tokenizer<'a> {
    cfg: &'a TokenizerCfg,
    registry: &'a SpeakerRegistry,
}

impl<'a> Tokenizer<'a> {
    pub fn new(cfg: &'a TokenizerCfg, registry: &'a SpeakerRegistry) -> Self {
        Self { cfg, registry }
    }

    pub fn classify(&self, line: &str) -> LineKind {
        match line.trim_start().chars().next() {
            None => LineKind::Blank,
            Some(c) if self.cfg.stage_openers.contains(c) => LineKind::StageDirection,
            Some(_) => LineKind::Spoken,
        }
    }

    /// Text before the first separator without leading whitespace, or `None` when the line has
    /// no separator.
    pub fn speaker<'l>(&self, line: &'l str) -> Option<&'l str> {
        line.split_once(self.cfg.separator).map(|(s, _)| s.trim_start())
    }

    /// Whitespace tokens with the separator blanked out, speaker label first.
    pub fn split_words(&self, line: &str) -> Vec<String> {
        line.replace(self.cfg.separator, " ")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn tokenize(&self, decoded: &[String]) -> Result<TokenizedCorpus, AnalysisError> {
        let span = tracing::info_span!("tokenize", lines = decoded.len());
        let _g = span.enter();

        let mut out = TokenizedCorpus::default();

        for (index, line) in decoded.iter().enumerate() {
            match self.classify(line) {
                LineKind::Blank => out.blank_lines += 1,
                LineKind::StageDirection => out.stage_directions += 1,
                LineKind::Spoken => {
                    let Some(speaker) = self.speaker(line) else {
                        match self.cfg.missing_separator {
                            MissingSeparator::Reject => {
                                return Err(AnalysisError::MalformedLine {
                                    line_no: index + 1,
                                    line: line.clone(),
                                });
                            }
                            MissingSeparator::Skip => {
                                tracing::warn!(
                                    line_no = index + 1,
                                    separator = %self.cfg.separator,
                                    "spoken line without speaker separator skipped"
                                );
                                out.skipped.push(SkippedLine {
                                    line_no: index + 1,
                                    text: line.clone(),
                                });
                                continue;
                            }
                        }
                    };

                    let all_words = self.split_words(line);
                    let word_count = all_words.len().saturating_sub(1);
                    out.spoken.push(SpokenLine {
                        index,
                        speaker: speaker.to_string(),
                        registered: self.registry.is_registered(speaker),
                        words: all_words.into_iter().skip(1).collect(),
                        word_count,
                        char_count: line.chars().count(),
                    });
                }
            }
        }

        let unregistered = out.spoken.iter().filter(|l| !l.registered).count();
        tracing::info!(
            spoken = out.spoken.len(),
            stage_directions = out.stage_directions,
            blank = out.blank_lines,
            skipped = out.skipped.len(),
            unregistered,
            "tokenized corpus"
        );

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SpeakerRegistry {
        let entries: Vec<String> = ["LEONTES:", "LEONTES", "First Lord:", "HERMIONE:"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        SpeakerRegistry::new(&entries, ':')
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn registry_strips_and_dedupes() {
        let r = registry();
        assert_eq!(r.names(), ["LEONTES", "First Lord", "HERMIONE"]);
        assert_eq!(r.len(), 3);
        assert!(r.is_registered("First Lord"));
        assert!(!r.is_registered("First Lord:"));
        assert!(r.contains_entry("LEONTES"));
        assert!(!r.contains_entry("HERMIONE"));
    }

    #[test]
    fn classifies_lines() {
        let cfg = TokenizerCfg::default();
        let r = registry();
        let t = Tokenizer::new(&cfg, &r);
        assert_eq!(t.classify("[Enter LEONTES]"), LineKind::StageDirection);
        assert_eq!(t.classify("  (aside)"), LineKind::StageDirection);
        assert_eq!(t.classify("{music}"), LineKind::StageDirection);
        assert_eq!(t.classify("LEONTES: Go."), LineKind::Spoken);
        assert_eq!(t.classify("   "), LineKind::Blank);
        assert_eq!(t.classify(""), LineKind::Blank);
    }

    #[test]
    fn speaker_and_words() {
        let cfg = TokenizerCfg::default();
        let r = registry();
        let t = Tokenizer::new(&cfg, &r);
        let line = "First Lord: Good my lord, be cured";
        assert_eq!(t.speaker(line), Some("First Lord"));
        // Only the first token is the label; "Lord" stays a word.
        assert_eq!(
            t.split_words(line),
            ["First", "Lord", "Good", "my", "lord,", "be", "cured"]
        );
        assert_eq!(t.speaker("no separator here"), None);
    }

    #[test]
    fn tokenize_builds_spoken_view() {
        let cfg = TokenizerCfg::default();
        let r = registry();
        let t = Tokenizer::new(&cfg, &r);
        let decoded = lines(&[
            "[[SCENE I]]",
            "LEONTES: Too hot, too hot!",
            "",
            "Clown: Hilloa, loa!",
            "[Exeunt]",
        ]);
        let tc = t.tokenize(&decoded).unwrap();
        assert_eq!(tc.stage_directions, 2);
        assert_eq!(tc.blank_lines, 1);
        assert_eq!(tc.spoken.len(), 2);

        let first = &tc.spoken[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.speaker, "LEONTES");
        assert!(first.registered);
        assert_eq!(first.words, ["Too", "hot,", "too", "hot!"]);
        assert_eq!(first.word_count, 4);
        assert_eq!(first.char_count, 26);

        assert_eq!(tc.spoken[1].speaker, "Clown");
        assert!(!tc.spoken[1].registered);
    }

    #[test]
    fn indented_speaker_is_the_same_speaker() {
        let cfg = TokenizerCfg::default();
        let r = registry();
        let t = Tokenizer::new(&cfg, &r);
        assert_eq!(t.speaker("  LEONTES: Stay"), Some("LEONTES"));

        let tc = t.tokenize(&lines(&["LEONTES: Go", "  LEONTES: Stay"])).unwrap();
        let speakers: Vec<&str> = tc.spoken.iter().map(|l| l.speaker.as_str()).collect();
        assert_eq!(speakers, ["LEONTES", "LEONTES"]);
        assert!(tc.spoken[1].registered);
        assert_eq!(tc.spoken[1].words, ["Stay"]);
    }

    #[test]
    fn missing_separator_is_skipped_by_default() {
        let cfg = TokenizerCfg::default();
        let r = registry();
        let t = Tokenizer::new(&cfg, &r);
        let tc = t
            .tokenize(&lines(&["LEONTES: Go.", "Exit, pursued by a bear"]))
            .unwrap();
        assert_eq!(tc.spoken.len(), 1);
        assert_eq!(tc.skipped.len(), 1);
        assert_eq!(tc.skipped[0].line_no, 2);
    }

    #[test]
    fn missing_separator_can_be_rejected() {
        let cfg = TokenizerCfg {
            missing_separator: MissingSeparator::Reject,
            ..TokenizerCfg::default()
        };
        let r = registry();
        let t = Tokenizer::new(&cfg, &r);
        let err = t
            .tokenize(&lines(&["LEONTES: Go.", "", "Exit, pursued by a bear"]))
            .unwrap_err();
        match err {
            AnalysisError::MalformedLine { line_no, line } => {
                assert_eq!(line_no, 3);
                assert_eq!(line, "Exit, pursued by a bear");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bare_separator_counts_zero_words() {
        let cfg = TokenizerCfg::default();
        let r = registry();
        let t = Tokenizer::new(&cfg, &r);
        let tc = t.tokenize(&lines(&[": "])).unwrap();
        assert_eq!(tc.spoken[0].speaker, "");
        assert_eq!(tc.spoken[0].word_count, 0);
        assert!(tc.spoken[0].words.is_empty());
    }
}
