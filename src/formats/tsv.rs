use anyhow::{Result, anyhow};
use csv::WriterBuilder;

use crate::{config::Config, model::Report};

const HEADER: [&str; 4] = ["section", "key", "value", "detail"];

/// One table per configured section, all sharing a four column layout.
pub fn write_tsv(r: &Report, cfg: &Config) -> Result<String> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(vec![]);
    wtr.write_record(HEADER)?;

    for section in &cfg.formats.tsv.sections {
        for row in rows_for_section(section, r)? {
            let [key, value, detail] = &row;
            wtr.write_record([
                section.as_str(),
                key.as_str(),
                value.as_str(),
                detail.as_str(),
            ])?;
        }
    }

    let data = wtr.into_inner().map_err(|e| anyhow!(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

fn rows_for_section(section: &str, r: &Report) -> Result<Vec<[String; 3]>> {
    let rows = match section {
        "key" => vec![
            ["threshold".to_string(), r.key.threshold.to_string(), String::new()],
            [
                "threshold_index".to_string(),
                r.key.threshold_index.to_string(),
                String::new(),
            ],
            ["shift".to_string(), r.key.shift.to_string(), String::new()],
        ],
        "word_lengths" => r
            .word_lengths
            .iter()
            .map(|h| [h.length.to_string(), h.count.to_string(), String::new()])
            .collect(),
        "top_words" => r
            .top_words
            .iter()
            .enumerate()
            .map(|(i, w)| [w.word.clone(), w.count.to_string(), (i + 1).to_string()])
            .collect(),
        "line_lengths" => r
            .line_lengths
            .iter()
            .enumerate()
            .map(|(i, n)| [(i + 1).to_string(), n.to_string(), String::new()])
            .collect(),
        "longest_speeches" => r
            .longest_speeches
            .iter()
            .map(|s| [s.speaker.clone(), s.value.to_string(), String::new()])
            .collect(),
        "line_counts" => r
            .line_counts
            .iter()
            .map(|s| [s.speaker.clone(), s.lines.to_string(), format!("{:.2}", s.share)])
            .collect(),
        "scenes" => r
            .scenes
            .iter()
            .enumerate()
            .map(|(i, s)| [(i + 1).to_string(), s.len().to_string(), s.heading.clone()])
            .collect(),
        other => return Err(anyhow!("unknown TSV section: '{other}'")),
    };
    Ok(rows)
}
