use std::sync::Arc;

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use tracing::debug;

use crate::sound::{Sound, SoundRegistry};

/// Sounds picked from with equal probability.
#[derive(Debug, Clone, Default)]
pub struct SoundPool {
    sounds: Vec<Arc<Sound>>,
}

impl SoundPool {
    pub fn new(sounds: Vec<Arc<Sound>>) -> Self {
        Self { sounds }
    }

    /// Resolve every name through the registry; unknown names become the
    /// fallback sound.
    pub fn from_names<S: AsRef<str>>(registry: &SoundRegistry, names: &[S]) -> Self {
        Self::new(names.iter().map(|n| registry.get(n.as_ref())).collect())
    }

    /// `count` sounds named `{base}{index}` for consecutive indices starting at
    /// `start_index`, e.g. `step1`, `step2`, `step3`.
    pub fn from_base(
        registry: &SoundRegistry,
        base: &str,
        count: usize,
        start_index: usize,
    ) -> Self {
        Self::from_names(registry, &Self::names_from_base(base, count, start_index))
    }

    pub fn names_from_base(base: &str, count: usize, start_index: usize) -> Vec<String> {
        (start_index..start_index + count).map(|i| format!("{base}{i}")).collect()
    }

    pub fn push(&mut self, sound: Arc<Sound>) {
        self.sounds.push(sound);
    }

    pub fn sounds(&self) -> &[Arc<Sound>] {
        &self.sounds
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// `None` only when the pool is empty.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<Arc<Sound>> {
        if self.sounds.is_empty() {
            return None;
        }
        let i = rng.random_range(0..self.sounds.len());
        Some(self.sounds[i].clone())
    }
}

/// Sounds picked from with probability proportional to their weight.
#[derive(Debug, Clone, Default)]
pub struct WeightedSoundPool {
    entries: Vec<(Arc<Sound>, u32)>,
    index: Option<WeightedIndex<u64>>,
}

impl WeightedSoundPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `sound` with `weight`. A zero weight could never be picked and is dropped.
    pub fn add(&mut self, sound: Arc<Sound>, weight: u32) -> &mut Self {
        if weight == 0 {
            debug!(sound = %sound.name(), "ignoring zero-weight pool entry");
            return self;
        }
        self.entries.push((sound, weight));
        self.index = WeightedIndex::new(self.entries.iter().map(|(_, w)| u64::from(*w))).ok();
        self
    }

    pub fn add_named(&mut self, registry: &SoundRegistry, name: &str, weight: u32) -> &mut Self {
        self.add(registry.get(name), weight)
    }

    pub fn entries(&self) -> &[(Arc<Sound>, u32)] {
        &self.entries
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|(_, w)| u64::from(*w)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` only when the pool is empty.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<Arc<Sound>> {
        let index = self.index.as_ref()?;
        Some(self.entries[index.sample(rng)].0.clone())
    }
}

impl FromIterator<(Arc<Sound>, u32)> for WeightedSoundPool {
    fn from_iter<I: IntoIterator<Item = (Arc<Sound>, u32)>>(iter: I) -> Self {
        let mut pool = Self::new();
        for (sound, weight) in iter {
            pool.add(sound, weight);
        }
        pool
    }
}
