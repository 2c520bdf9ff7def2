use crate::{
    config::{CipherCfg, Wraparound},
    error::AnalysisError,
};

const AT_SIGN: i64 = '@' as i64;

/// Largest accepted threshold. Past roughly 6e12 the added terms fall below half an ulp of the
/// running sum and it stops growing.
pub const MAX_THRESHOLD: f64 = 1e6;

/// Smallest `n >= 1` such that `1^-0.2 + 2^-0.2 + ... + n^-0.2` exceeds `threshold`.
///
/// Terms are summed in increasing order so the boundary is reproducible. Non-positive thresholds
/// yield 1; thresholds above [`MAX_THRESHOLD`] are rejected.
pub fn threshold_index(threshold: f64) -> Result<u64, AnalysisError> {
    if !threshold.is_finite() || threshold > MAX_THRESHOLD {
        return Err(AnalysisError::InvalidThreshold(threshold.to_string()));
    }

    let mut n: u64 = 1;
    let mut total: f64 = 1.0;
    while total <= threshold {
        n += 1;
        total += (n as f64).powf(-0.2);
    }
    Ok(n)
}

/// Parses a user supplied threshold, rejecting anything that is not a finite number.
pub fn parse_threshold(raw: &str) -> Result<f64, AnalysisError> {
    let t = raw.trim();
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::InvalidThreshold(t.to_string())),
    }
}

/// Euclid's algorithm on the absolute values of `a` and `b`.
pub fn gcd(a: i64, b: i64) -> u64 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The two numbers derived from the cipher constants. They are independent: only `shift` is used
/// for decoding.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CipherKey {
    pub threshold: f64,
    pub threshold_index: u64,
    pub shift: u64,
}

impl CipherKey {
    pub fn derive(cfg: &CipherCfg) -> Result<Self, AnalysisError> {
        let threshold_index = threshold_index(cfg.threshold)?;
        let shift = gcd(cfg.key_a, cfg.key_b);
        tracing::info!(
            threshold = cfg.threshold,
            threshold_index,
            key_a = cfg.key_a,
            key_b = cfg.key_b,
            shift,
            "derived cipher key"
        );
        Ok(Self {
            threshold: cfg.threshold,
            threshold_index,
            shift,
        })
    }
}

/// Shift decoder with an injected exclusion set and wraparound rule.
#[derive(Debug, Clone)]
pub struct Decoder {
    shift: i64,
    exclusions: Vec<char>,
    wraparound: Wraparound,
}

impl Decoder {
    pub fn new(shift: u64, exclusions: &str, wraparound: Wraparound) -> Self {
        Self {
            shift: i64::try_from(shift).unwrap_or(i64::MAX),
            exclusions: exclusions.chars().collect(),
            wraparound,
        }
    }

    pub fn from_config(shift: u64, cfg: &CipherCfg) -> Self {
        Self::new(shift, &cfg.exclusions, cfg.wraparound)
    }

    pub fn decode_line(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        for ch in line.chars() {
            if self.exclusions.contains(&ch) {
                out.push(ch);
            } else {
                out.push(self.shift_char(ch));
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    pub fn decode_corpus(&self, lines: &[String]) -> Vec<String> {
        lines.iter().map(|l| self.decode_line(l)).collect()
    }

    fn shift_char(&self, ch: char) -> char {
        match self.wraparound {
            Wraparound::Literal => {
                let cp = ch as i64 - self.shift;
                if cp == AT_SIGN {
                    return 'Z';
                }
                u32::try_from(cp)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            }
            Wraparound::Alphabet => {
                let base = if ch.is_ascii_uppercase() {
                    b'A'
                } else if ch.is_ascii_lowercase() {
                    b'a'
                } else {
                    return u32::try_from(ch as i64 - self.shift)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                };
                let offset = (ch as u8 - base) as i64;
                let rotated = (offset - self.shift).rem_euclid(26) as u8;
                (base + rotated) as char
            }
        }
    }
}

/// Decodes one line with the default exclusion set and the literal wraparound rule.
pub fn decode_line(line: &str, shift: u64) -> String {
    let cfg = CipherCfg::default();
    Decoder::from_config(shift, &cfg).decode_line(line)
}

/// Decodes every line, preserving order and count.
pub fn decode_corpus(lines: &[String], shift: u64) -> Vec<String> {
    let cfg = CipherCfg::default();
    Decoder::from_config(shift, &cfg).decode_corpus(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_of_cipher_constants_is_one() {
        assert_eq!(gcd(1973, 540), 1);
        assert_eq!(CipherKey::derive(&CipherCfg::default()).unwrap().shift, 1);
    }

    #[test]
    fn gcd_normalizes_negative_inputs() {
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(12, -18), 6);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(0, -7), 7);
        assert_eq!(gcd(i64::MIN, 0), 1u64 << 63);
    }

    #[test]
    fn threshold_index_of_one_needs_two_terms() {
        assert_eq!(threshold_index(1.0).unwrap(), 2);
    }

    #[test]
    fn threshold_index_floor_is_one() {
        assert_eq!(threshold_index(0.0).unwrap(), 1);
        assert_eq!(threshold_index(-25.0).unwrap(), 1);
        assert_eq!(threshold_index(0.999).unwrap(), 1);
    }

    #[test]
    fn threshold_index_grows_with_threshold() {
        let small = threshold_index(10.0).unwrap();
        let large = threshold_index(540.0).unwrap();
        assert!(large > small);

        let mut total = 0.0;
        for k in 1..=large {
            total += (k as f64).powf(-0.2);
        }
        assert!(total > 540.0);
    }

    #[test]
    fn threshold_above_maximum_is_rejected() {
        for t in [MAX_THRESHOLD * 2.0, 1e9, 1e13, f64::MAX] {
            assert!(matches!(
                threshold_index(t),
                Err(AnalysisError::InvalidThreshold(_))
            ));
        }
        let cfg = CipherCfg {
            threshold: 1e13,
            ..CipherCfg::default()
        };
        assert!(CipherKey::derive(&cfg).is_err());
    }

    #[test]
    fn threshold_rejects_non_numeric() {
        assert!(matches!(
            parse_threshold("five hundred"),
            Err(AnalysisError::InvalidThreshold(_))
        ));
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("inf").is_err());
        assert!(threshold_index(f64::NAN).is_err());
        assert_eq!(parse_threshold(" 540 ").unwrap(), 540.0);
    }

    #[test]
    fn decodes_single_shift() {
        assert_eq!(decode_line("Ifmmp", 1), "Hello");
    }

    #[test]
    fn literal_wraparound_maps_at_sign_to_z() {
        assert_eq!(decode_line("A", 1), "Z");
    }

    #[test]
    fn exclusions_pass_through_and_trailing_space_is_stripped() {
        assert_eq!(decode_line("MFPOUFT: Xibu! [Fyju]   ", 1), "LEONTES: What! [Exit]");
    }

    #[test]
    fn leading_space_is_kept() {
        assert_eq!(decode_line("  B", 1), "  A");
    }

    #[test]
    fn invalid_code_point_becomes_replacement_char() {
        assert_eq!(decode_line("\u{0}", 1), "\u{FFFD}");
    }

    #[test]
    fn literal_rule_does_not_wrap_other_shifts() {
        // 'B' - 3 = '?', which the literal rule leaves alone.
        assert_eq!(decode_line("B", 3), "?");
    }

    #[test]
    fn alphabet_rule_wraps_any_shift() {
        let d = Decoder::new(3, ".,'\":;?!&/()[]{} -", Wraparound::Alphabet);
        assert_eq!(d.decode_line("Ebc"), "Byz");
        assert_eq!(d.decode_line("A"), "X");
    }

    #[test]
    fn corpus_decode_preserves_count_and_order() {
        let lines: Vec<String> = vec!["Ifmmp".into(), "".into(), "   ".into(), "B".into()];
        for shift in [0, 1, 2, 7] {
            assert_eq!(decode_corpus(&lines, shift).len(), lines.len());
        }
        assert_eq!(decode_corpus(&lines, 1), vec!["Hello", "", "", "A"]);
    }
}
