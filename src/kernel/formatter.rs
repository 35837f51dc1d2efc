use rand::Rng;

/// Appended to roughly a third of replies.
pub const ADDRESS_SUFFIX: &str = " sir.";
pub const SUFFIX_PROBABILITY: f64 = 0.33;

const TRAILING_PUNCTUATION: [char; 4] = ['.', '!', '?', ','];
const SUFFIX_VARIANTS: [&str; 3] = [" sir.", " sir!", " sir?"];

/// `add_suffix == false` is the identity. Otherwise the trailing run of
/// `. ! ? ,` is dropped before the suffix, so the suffix never follows
/// terminal punctuation.
pub fn format(raw: &str, add_suffix: bool) -> String {
    if !add_suffix {
        return raw.to_string();
    }
    let stripped = raw.trim().trim_end_matches(TRAILING_PUNCTUATION);
    format!("{}{}", stripped, ADDRESS_SUFFIX)
}

/// Removes every suffix variant. Used before replaying a reply as backend
/// context so past suffix noise does not steer generation.
pub fn strip_suffix(text: &str) -> String {
    SUFFIX_VARIANTS
        .iter()
        .fold(text.to_string(), |acc, variant| acc.replace(variant, ""))
}

/// Synthesizers pause oddly on the punctuation after "sir".
pub fn speech_text(text: &str) -> String {
    SUFFIX_VARIANTS
        .iter()
        .fold(text.to_string(), |acc, variant| acc.replace(variant, " sir"))
}

/// Independent Bernoulli draw, once per utterance.
#[derive(Debug, Clone, Copy)]
pub struct SuffixPolicy {
    probability: f64,
}

impl Default for SuffixPolicy {
    fn default() -> Self {
        Self::new(SUFFIX_PROBABILITY)
    }
}

impl SuffixPolicy {
    /// Out-of-range probabilities are clamped to [0, 1].
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn suffix_replaces_trailing_punctuation_run() {
        assert_eq!(format("All systems go!?.", true), "All systems go sir.");
        assert_eq!(format("  Opening YouTube  ", true), "Opening YouTube sir.");
    }

    #[test]
    fn no_suffix_is_identity() {
        assert_eq!(format("  Hello!  ", false), "  Hello!  ");
    }

    #[test]
    fn strip_and_speech_variants() {
        assert_eq!(strip_suffix("Right now it's 02:05 PM sir."), "Right now it's 02:05 PM");
        assert_eq!(speech_text("Done sir! Anything else sir?"), "Done sir Anything else sir");
    }

    #[test]
    fn policy_extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..50).all(|_| SuffixPolicy::new(1.0).draw(&mut rng)));
        assert!((0..50).all(|_| !SuffixPolicy::new(0.0).draw(&mut rng)));
        assert_eq!(SuffixPolicy::new(3.0).probability(), 1.0);
    }

    #[test]
    fn default_policy_suffixes_about_a_third() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = SuffixPolicy::default();
        let hits = (0..10_000).filter(|_| policy.draw(&mut rng)).count();
        let rate = hits as f64 / 10_000.0;
        assert!((0.30..0.36).contains(&rate), "suffix rate {}", rate);
    }
}
