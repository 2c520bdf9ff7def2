use crate::model::Report;

pub fn write_txt(r: &Report) -> String {
    let mut out = String::new();

    out.push_str("== key\n");
    out.push_str(&format!(
        "threshold {} -> index {}\nshift {}\n",
        r.key.threshold, r.key.threshold_index, r.key.shift
    ));

    out.push_str("\n== lines\n");
    out.push_str(&format!(
        "total {}, spoken {}, stage directions {}, blank {}, skipped {}\n",
        r.lines.total,
        r.lines.spoken,
        r.lines.stage_directions,
        r.lines.blank,
        r.lines.skipped.len()
    ));
    for s in &r.lines.skipped {
        out.push_str(&format!("  skipped line {}: {}\n", s.line_no, s.text));
    }

    out.push_str("\n== word lengths\n");
    for h in &r.word_lengths {
        out.push_str(&format!("{:>4}  {}\n", h.length, h.count));
    }

    out.push_str("\n== top words\n");
    for (i, w) in r.top_words.iter().enumerate() {
        out.push_str(&format!("{:>2}. {}  {}\n", i + 1, w.word, w.count));
    }

    out.push_str("\n== words per line\n");
    let series: Vec<String> = r.line_lengths.iter().map(|n| n.to_string()).collect();
    out.push_str(&series.join(" "));
    out.push('\n');

    out.push_str("\n== longest speech\n");
    for s in &r.longest_speeches {
        out.push_str(&format!("{}  {}\n", s.speaker, s.value));
    }

    out.push_str("\n== lines per speaker\n");
    for s in &r.line_counts {
        out.push_str(&format!("{}  {}  {:.2}\n", s.speaker, s.lines, s.share));
    }

    out.push_str("\n== scenes\n");
    for (i, s) in r.scenes.iter().enumerate() {
        out.push_str(&format!("{:>2}. {}  {}\n", i + 1, s.len(), s.heading));
    }
    if r.unsegmented_tail > 0 {
        out.push_str(&format!(
            "({} lines after the last marker not counted)\n",
            r.unsegmented_tail
        ));
    }

    out
}
