use anyhow::{Context, Result, anyhow};
use std::{fs, io::ErrorKind, path::Path};

use crate::{
    cipher::{self, CipherKey, Decoder},
    cli::{AnalyzeCmd, DecodeCmd, Format, KeyCmd, OutputArgs},
    config::Config,
    error::AnalysisError,
    formats,
    model::{Corpus, Report},
    stats::Aggregator,
    tokenize::{SpeakerRegistry, Tokenizer},
};

pub fn run_analyze(cmd: AnalyzeCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("analyze", input = cmd.input.as_str(), to = ?cmd.to);
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.input)?;
    tracing::info!(bytes = raw.len(), "read input");

    let report = analyze(&raw, cfg).context("failed analyzing script")?;
    log_report_summary(&report);

    let rendered = render_any(&report, cmd.to, cfg)?;
    emit(&cmd.input, &cmd.out, &format!("report.{}", cmd.to.extension()), &rendered)
}

pub fn run_decode(cmd: DecodeCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("decode", input = cmd.input.as_str());
    let _g = span.enter();

    let raw = read_input_to_string(&cmd.input)?;
    let corpus = Corpus::from_text(&raw);
    let shift = cipher::gcd(cfg.cipher.key_a, cfg.cipher.key_b);
    tracing::info!(shift, "derived shift key");
    let decoded = Decoder::from_config(shift, &cfg.cipher).decode_corpus(&corpus.lines);
    log_decoded_samples(&decoded, cfg);

    let mut rendered = decoded.join("\n");
    if !rendered.is_empty() {
        rendered.push('\n');
    }
    emit(&cmd.input, &cmd.out, "decoded.txt", &rendered)
}

pub fn run_key(cmd: KeyCmd, cfg: &Config) -> Result<()> {
    let mut cipher_cfg = cfg.cipher.clone();
    if let Some(raw) = cmd.threshold.as_deref() {
        cipher_cfg.threshold = cipher::parse_threshold(raw)?;
    }
    let key = CipherKey::derive(&cipher_cfg)?;
    println!(
        "threshold index for {}: {}",
        key.threshold, key.threshold_index
    );
    println!(
        "shift key gcd({}, {}): {}",
        cipher_cfg.key_a, cipher_cfg.key_b, key.shift
    );
    Ok(())
}

/// Decode, tokenize and aggregate one script held in memory.
pub fn analyze(raw: &str, cfg: &Config) -> Result<Report, AnalysisError> {
    let corpus = Corpus::from_text(raw);
    if corpus.is_empty() {
        tracing::warn!("input is empty; report will be empty");
    }

    let key = CipherKey::derive(&cfg.cipher)?;
    let decoded = Decoder::from_config(key.shift, &cfg.cipher).decode_corpus(&corpus.lines);
    log_decoded_samples(&decoded, cfg);

    let registry = SpeakerRegistry::new(&cfg.registry.speakers, cfg.tokenizer.separator);
    let tokens = Tokenizer::new(&cfg.tokenizer, &registry).tokenize(&decoded)?;

    Ok(Aggregator::new(&cfg.analysis, &registry).aggregate(key, raw, &decoded, tokens))
}

fn read_input_to_string(input: &str) -> Result<String, AnalysisError> {
    if input == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(input).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AnalysisError::InputNotFound { path: input.into() },
        _ => AnalysisError::Io(e),
    })
}

fn render_any(r: &Report, fmt: Format, cfg: &Config) -> Result<String> {
    match fmt {
        Format::Json => formats::json::write_json(r, cfg.formats.json.pretty),
        Format::Tsv => formats::tsv::write_tsv(r, cfg),
        Format::Txt => Ok(formats::txt::write_txt(r)),
    }
}

fn emit(input: &str, out: &OutputArgs, suffix: &str, rendered: &str) -> Result<()> {
    if out.stdout {
        print!("{rendered}");
        tracing::info!(mode = "stdout", "wrote output");
        return Ok(());
    }

    let out_path = derive_output_path(input, out, suffix)?;
    write_output(&out_path, rendered, out.overwrite)?;
    tracing::info!(path = out_path.as_str(), "wrote output file");
    Ok(())
}

fn derive_output_path(input: &str, out: &OutputArgs, suffix: &str) -> Result<String> {
    if let Some(o) = &out.output {
        return Ok(o.clone());
    }

    if input == "-" {
        return Err(anyhow!(
            "output path required when input is stdin and --stdout is not set"
        ));
    }

    let p = Path::new(input);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("bad input filename"))?;

    let parent = p.parent().unwrap_or_else(|| Path::new("."));
    let out = parent.join(format!("{stem}.{suffix}"));
    Ok(out.to_string_lossy().to_string())
}

fn write_output(path: &str, data: &str, overwrite: bool) -> Result<()> {
    if Path::new(path).exists() && !overwrite {
        return Err(anyhow!(
            "refusing to overwrite existing file (pass --overwrite): {path}"
        ));
    }
    fs::write(path, data).with_context(|| format!("failed writing {path}"))?;
    Ok(())
}

fn log_report_summary(r: &Report) {
    tracing::info!(
        lines = r.lines.total,
        spoken = r.lines.spoken,
        skipped = r.lines.skipped.len(),
        threshold_index = r.key.threshold_index,
        shift = r.key.shift,
        scenes = r.scenes.len(),
        "report summary"
    );
}

fn log_decoded_samples(decoded: &[String], cfg: &Config) {
    tracing::info!(lines = decoded.len(), "decoded corpus");

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = cfg.logging.debug_line_samples.min(decoded.len());
        for (i, line) in decoded.iter().take(n).enumerate() {
            tracing::debug!(idx = i, text = line.as_str(), "decoded line sample");
        }
    }
}
