//! Sample texts and randomized payload construction.
use loadgen_core::{ConfigError, Instance, PredictRequest, MAX_INSTANCES, MIN_INSTANCES};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_TEXTS: [&str; 10] = [
    "I love this product, it's amazing",
    "Great service and fast delivery",
    "This is terrible, doesn't work at all",
    "Awful experience, never buying again",
    "Fantastic customer support",
    "Disappointed with the quality",
    "Best purchase I've made this year",
    "Would recommend to everyone",
    "Complete waste of money",
    "Exceeded all my expectations",
];

/// Fixed, ordered set of texts that payload instances are drawn from.
///
/// Never mutated after construction, so workers share it through an `Arc` without locking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleCorpus {
    texts: Vec<String>,
}

impl SampleCorpus {
    pub fn new(texts: Vec<String>) -> Result<Self, ConfigError> {
        if texts.is_empty() {
            return Err(ConfigError::EmptyCorpus);
        }
        Ok(Self { texts })
    }

    /// One text per line; blank lines are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let texts = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(texts)
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl Default for SampleCorpus {
    fn default() -> Self {
        Self {
            texts: DEFAULT_TEXTS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Builds a random predict payload per call.
///
/// Each payload holds between `MIN_INSTANCES` and `MAX_INSTANCES` instances, each drawn
/// uniformly (with replacement) from the corpus.
pub struct RequestBuilder<R = SmallRng> {
    corpus: Arc<SampleCorpus>,
    rng: R,
}

impl RequestBuilder<SmallRng> {
    /// Deterministic builder when `seed` is given, entropy-seeded otherwise.
    pub fn seeded(corpus: Arc<SampleCorpus>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::new(corpus, rng)
    }
}

impl<R: Rng> RequestBuilder<R> {
    pub fn new(corpus: Arc<SampleCorpus>, rng: R) -> Self {
        Self { corpus, rng }
    }

    pub fn build(&mut self) -> PredictRequest {
        let count = self.rng.gen_range(MIN_INSTANCES..=MAX_INSTANCES);
        let texts = self.corpus.texts();

        let instances = (0..count)
            .map(|_| Instance {
                text: texts[self.rng.gen_range(0..texts.len())].clone(),
            })
            .collect();

        PredictRequest { instances }
    }
}
