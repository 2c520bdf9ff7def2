use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub cipher: CipherCfg,
    pub tokenizer: TokenizerCfg,
    pub analysis: AnalysisCfg,
    pub registry: RegistryCfg,
    pub formats: Formats,
}

impl Config {
    pub fn load(path_opt: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("config.toml");
        let path = if let Some(p) = path_opt {
            Some(p)
        } else if default_path.exists() {
            Some(default_path)
        } else {
            None
        };

        let mut cfg = Config::default();

        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed reading config file: {}", path.display()))?;
            cfg = Self::from_toml(&raw)
                .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        }

        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        let s = toml::to_string_pretty(self).context("failed serializing config as TOML")?;
        Ok(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
    pub debug_line_samples: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            debug_line_samples: 20,
        }
    }
}

/// How a shifted letter that falls off the front of the alphabet is brought back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wraparound {
    /// Only `'@'` is remapped to `'Z'`; exact for a shift of one.
    #[default]
    Literal,
    /// Letters rotate within `A-Z` and `a-z` for any shift.
    Alphabet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherCfg {
    /// Target of the `k^-0.2` partial sum; reported only.
    pub threshold: f64,
    pub key_a: i64,
    pub key_b: i64,
    /// Characters copied through without shifting.
    pub exclusions: String,
    pub wraparound: Wraparound,
}

impl Default for CipherCfg {
    fn default() -> Self {
        Self {
            threshold: 540.0,
            key_a: 1973,
            key_b: 540,
            exclusions: ".,'\":;?!&/()[]{} -".to_string(),
            wraparound: Wraparound::Literal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSeparator {
    /// Drop the line from the spoken views and log a warning.
    #[default]
    Skip,
    /// Abort the run.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerCfg {
    pub separator: char,
    pub stage_openers: String,
    pub missing_separator: MissingSeparator,
}

impl Default for TokenizerCfg {
    fn default() -> Self {
        Self {
            separator: ':',
            stage_openers: "[({".to_string(),
            missing_separator: MissingSeparator::Skip,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisCfg {
    pub top_words: usize,
    pub top_speakers: usize,
    /// Words must be strictly longer than this to be counted.
    pub min_word_len: usize,
    pub scene_marker: String,
    pub other_label: String,
}

impl Default for AnalysisCfg {
    fn default() -> Self {
        Self {
            top_words: 10,
            top_speakers: 10,
            min_word_len: 3,
            scene_marker: "[[SCENE".to_string(),
            other_label: "Other".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCfg {
    pub speakers: Vec<String>,
}

impl Default for RegistryCfg {
    fn default() -> Self {
        let speakers = [
            "POLIXENES:",
            "CAMILLO:",
            "AUTOLYCUS:",
            "ARCHIDAMUS:",
            "Clown:",
            "FLORIZEL:",
            "PERDITA:",
            "king:",
            "Shepherd:",
            "DORCAS:",
            "MOPSA:",
            "Servant:",
            "herdsman:",
            "himself:",
            "MAMILLIUS:",
            "DION:",
            "PAULINA:",
            "CLEOMENES:",
            "LEONTES:",
            "Gentleman:",
            "Lord:",
            "First Lady:",
            "Second Lady:",
            "First Lord:",
            "Second Lord:",
            "LEONTES",
            "ANTIGONUS:",
            "Gaoler:",
            "First Gentleman:",
            "Third Gentleman:",
            "Second Gentleman:",
            "EMILIA:",
            "First gentleman:",
            "Lords:",
            "First Servant:",
            "Officer:",
            "Second Servant:",
            "HERMIONE:",
            "Mariner:",
            "Time:",
            "Shepard:",
        ];
        Self {
            speakers: speakers.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    pub json: JsonCfg,
    pub tsv: TsvCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonCfg {
    pub pretty: bool,
}

impl Default for JsonCfg {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TsvCfg {
    /// Report tables to emit, in order.
    pub sections: Vec<String>,
}

impl Default for TsvCfg {
    fn default() -> Self {
        Self {
            sections: vec![
                "key".to_string(),
                "word_lengths".to_string(),
                "top_words".to_string(),
                "line_lengths".to_string(),
                "longest_speeches".to_string(),
                "line_counts".to_string(),
                "scenes".to_string(),
            ],
        }
    }
}

pub fn init_tracing(logging: &Logging, cli_override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let is_json = logging.format.to_lowercase() == "json";

    if is_json {
        fmt()
            .with_env_filter(filter)
            .event_format(fmt::format().json())
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .pretty()
            .init();
    }

    tracing::info!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}
