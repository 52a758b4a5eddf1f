use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::instance::SoundInstance;
use crate::manager::AudioManager;
use crate::overlay::PlaybackOverrides;
use crate::pool::{SoundPool, WeightedSoundPool};
use crate::sound::Sound;
use crate::AudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What a player plays each time it starts.
#[derive(Debug, Clone)]
pub enum SoundSelection {
    Fixed(Arc<Sound>),
    Pool(SoundPool),
    Weighted(WeightedSoundPool),
}

impl SoundSelection {
    fn pick(&self, rng: &mut SmallRng) -> Option<Arc<Sound>> {
        match self {
            SoundSelection::Fixed(sound) => Some(sound.clone()),
            SoundSelection::Pool(pool) => pool.pick(rng),
            SoundSelection::Weighted(pool) => pool.pick(rng),
        }
    }
}

/// A reusable sound source with at most one live instance.
///
/// Each `play` stops the previous instance, picks a sound, starts it on the
/// player's bus and applies [`PlaybackOverrides`] followed by the optional
/// pitch jitter. The instance is stopped when the player is dropped.
#[derive(Debug)]
pub struct SoundPlayer {
    manager: AudioManager,
    selection: SoundSelection,
    bus: Option<String>,
    pitch_jitter: Option<f32>,
    pub overrides: PlaybackOverrides,
    /// Start playing from [`Self::on_enter`].
    pub autostart: bool,
    instance: Option<SoundInstance>,
    current: Option<Arc<Sound>>,
    state: PlaybackState,
    paused_at: Duration,
    rng: SmallRng,
}

impl SoundPlayer {
    pub fn with_selection(
        manager: &AudioManager,
        selection: SoundSelection,
        bus: Option<&str>,
    ) -> Self {
        Self {
            manager: manager.clone(),
            selection,
            bus: bus.map(str::to_string),
            pitch_jitter: None,
            overrides: PlaybackOverrides::default(),
            autostart: false,
            instance: None,
            current: None,
            state: PlaybackState::Stopped,
            paused_at: Duration::ZERO,
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn new(manager: &AudioManager, sound: Arc<Sound>, bus: Option<&str>) -> Self {
        Self::with_selection(manager, SoundSelection::Fixed(sound), bus)
    }

    /// Player for the sound registered as `name` (the fallback sound if there is none).
    pub fn named(manager: &AudioManager, name: &str, bus: Option<&str>) -> Self {
        Self::new(manager, manager.get_sound(name), bus)
    }

    pub fn pool(manager: &AudioManager, pool: SoundPool, bus: Option<&str>) -> Self {
        Self::with_selection(manager, SoundSelection::Pool(pool), bus)
    }

    pub fn pool_named<S: AsRef<str>>(
        manager: &AudioManager,
        names: &[S],
        bus: Option<&str>,
    ) -> Self {
        Self::pool(manager, SoundPool::from_names(manager.sounds(), names), bus)
    }

    /// See [`SoundPool::from_base`].
    pub fn pool_from_base(
        manager: &AudioManager,
        base: &str,
        count: usize,
        start_index: usize,
        bus: Option<&str>,
    ) -> Self {
        Self::pool(manager, SoundPool::from_base(manager.sounds(), base, count, start_index), bus)
    }

    pub fn weighted(manager: &AudioManager, pool: WeightedSoundPool, bus: Option<&str>) -> Self {
        Self::with_selection(manager, SoundSelection::Weighted(pool), bus)
    }

    /// Fixed sound whose pitch is offset by a uniform value in
    /// `[-pitch_range, pitch_range]` on every play.
    pub fn random_pitch(
        manager: &AudioManager,
        sound: Arc<Sound>,
        pitch_range: f32,
        bus: Option<&str>,
    ) -> Self {
        Self::new(manager, sound, bus).with_pitch_jitter(pitch_range)
    }

    /// A range that is not finite disables jitter.
    pub fn with_pitch_jitter(mut self, range: f32) -> Self {
        if range.is_finite() {
            self.pitch_jitter = Some(range.abs());
        } else {
            warn!(range, "ignoring non-finite pitch jitter range");
            self.pitch_jitter = None;
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    pub fn with_overrides(mut self, overrides: PlaybackOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn bus(&self) -> Option<&str> {
        self.bus.as_deref()
    }

    pub fn set_bus(&mut self, bus: Option<&str>) {
        self.bus = bus.map(str::to_string);
    }

    pub fn pitch_jitter(&self) -> Option<f32> {
        self.pitch_jitter
    }

    pub fn selection(&self) -> &SoundSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SoundSelection {
        &mut self.selection
    }

    /// The weighted pool, for adding entries after construction.
    pub fn weighted_pool_mut(&mut self) -> Option<&mut WeightedSoundPool> {
        match &mut self.selection {
            SoundSelection::Weighted(pool) => Some(pool),
            _ => None,
        }
    }

    /// Replace the selection with a single sound. Takes effect on the next `play`.
    pub fn set_sound(&mut self, sound: Arc<Sound>) {
        self.selection = SoundSelection::Fixed(sound);
    }

    /// The sound picked by the most recent `play`.
    pub fn current_sound(&self) -> Option<&Arc<Sound>> {
        self.current.as_ref()
    }

    /// Handle of the most recent instance, which may have been stopped since.
    pub fn instance(&self) -> Option<&SoundInstance> {
        self.instance.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
            && self.instance.as_ref().is_some_and(SoundInstance::is_playing)
    }

    /// Stop whatever is playing and start a freshly picked sound.
    pub fn play(&mut self) -> Result<(), AudioError> {
        self.stop();

        let sound = match self.selection.pick(&mut self.rng) {
            Some(sound) => sound,
            None => {
                warn!("sound pool is empty; playing the fallback sound");
                self.manager.fallback_sound()
            }
        };
        let instance = self.manager.play(&sound, self.bus.as_deref())?;
        self.overrides.apply_to(&instance);

        if let Some(range) = self.pitch_jitter.filter(|r| *r > 0.0) {
            let base = instance.pitch().unwrap_or(1.0);
            let pitch = base + self.rng.random_range(-range..=range);
            debug!(sound = %sound.name(), pitch, "pitch jitter applied");
            instance.set_pitch(pitch);
        }

        self.instance = Some(instance);
        self.current = Some(sound);
        self.state = PlaybackState::Playing;
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(instance) = &self.instance {
            instance.stop();
        }
        self.paused_at = Duration::ZERO;
        self.state = PlaybackState::Stopped;
    }

    /// Pause and remember the cursor. Does nothing unless playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Some(instance) = &self.instance {
            self.paused_at = instance.cursor().unwrap_or_default();
            instance.pause();
        }
        self.state = PlaybackState::Paused;
    }

    /// Resume from the cursor saved by `pause`. Does nothing unless paused.
    pub fn unpause(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        if let Some(instance) = &self.instance {
            instance.resume();
            instance.set_cursor(self.paused_at);
        }
        self.state = PlaybackState::Playing;
    }

    /// Scene-enter hook: plays if `autostart` is set.
    pub fn on_enter(&mut self) -> Result<(), AudioError> {
        if self.autostart {
            self.play()?;
        }
        Ok(())
    }

    /// Scene-exit hook.
    pub fn on_exit(&mut self) {
        self.stop();
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use audio_backend::mock_backend::MockInstanceState;
    use audio_backend::InstanceParam;

    #[test]
    fn play_replaces_the_previous_instance() {
        let h = Harness::with_sounds(&["a.wav"]);
        let mut player = SoundPlayer::named(&h.manager, "a", Some("Sfx"));
        player.play().unwrap();
        let first = player.instance().unwrap().id();
        player.play().unwrap();
        let second = player.instance().unwrap().id();

        assert_ne!(first, second);
        assert_eq!(h.probe.instance(first).unwrap().state, MockInstanceState::Stopped);
        assert_eq!(h.probe.live_instances(), vec![second]);
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.current_sound().unwrap().name(), "a");
    }

    #[test]
    fn pause_then_unpause_restores_cursor() {
        let h = Harness::with_sounds(&["a.wav"]);
        let mut player = SoundPlayer::named(&h.manager, "a", None);
        player.play().unwrap();
        h.manager.update();
        h.manager.update();
        let id = player.instance().unwrap().id();
        let at_pause = h.probe.instance(id).unwrap().cursor;
        assert!(at_pause > Duration::ZERO);

        player.pause();
        assert_eq!(player.state(), PlaybackState::Paused);
        h.probe.set_cursor(id, Duration::from_secs(9));

        player.unpause();
        assert_eq!(player.state(), PlaybackState::Playing);
        let inst = h.probe.instance(id).unwrap();
        assert_eq!(inst.state, MockInstanceState::Playing);
        assert_eq!(inst.cursor, at_pause);
    }

    #[test]
    fn pause_and_unpause_out_of_order_are_noops() {
        let h = Harness::with_sounds(&["a.wav"]);
        let mut player = SoundPlayer::named(&h.manager, "a", None);
        player.pause();
        assert_eq!(player.state(), PlaybackState::Stopped);
        player.unpause();
        assert_eq!(player.state(), PlaybackState::Stopped);

        player.play().unwrap();
        player.unpause();
        assert_eq!(player.state(), PlaybackState::Playing);
        player.pause();
        player.stop();
        assert_eq!(player.state(), PlaybackState::Stopped);
        player.unpause();
        assert_eq!(player.state(), PlaybackState::Stopped);
    }

    #[test]
    fn overrides_are_applied_on_play() {
        let h = Harness::with_sounds(&["a.wav"]);
        let mut player = SoundPlayer::named(&h.manager, "a", None);
        player.overrides.volume = Some(0.25);
        player.overrides.looping = Some(true);
        player.play().unwrap();
        let inst = h.probe.instance(player.instance().unwrap().id()).unwrap();
        assert_eq!(inst.params, vec![InstanceParam::Volume(0.25), InstanceParam::Looping(true)]);
    }

    #[test]
    fn pitch_jitter_stays_in_range_and_stacks_on_override() {
        let h = Harness::with_sounds(&["a.wav"]);
        let sound = h.manager.get_sound("a");
        let mut player = SoundPlayer::random_pitch(&h.manager, sound, 0.1, None).with_seed(11);
        player.overrides.pitch = Some(2.0);
        let mut seen_different = false;
        for _ in 0..50 {
            player.play().unwrap();
            let pitch = h.probe.instance(player.instance().unwrap().id()).unwrap().pitch;
            assert!((1.89..=2.11).contains(&pitch), "pitch {pitch}");
            seen_different |= (pitch - 2.0).abs() > f32::EPSILON;
        }
        assert!(seen_different);
    }

    #[test]
    fn non_finite_pitch_jitter_is_ignored() {
        let h = Harness::with_sounds(&["a.wav"]);
        for range in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let sound = h.manager.get_sound("a");
            let mut player = SoundPlayer::random_pitch(&h.manager, sound, range, None);
            assert_eq!(player.pitch_jitter(), None);
            player.play().unwrap();
            let pitch = h.probe.instance(player.instance().unwrap().id()).unwrap().pitch;
            assert_eq!(pitch, 1.0);
        }
    }

    #[test]
    fn empty_weighted_pool_plays_fallback() {
        let h = Harness::with_sounds(&[]);
        let mut player = SoundPlayer::weighted(&h.manager, WeightedSoundPool::new(), None);
        player.play().unwrap();
        assert!(player.current_sound().unwrap().is_fallback());

        let fallback = h.manager.fallback_sound();
        player.weighted_pool_mut().unwrap().add(fallback, 1);
        player.play().unwrap();
        assert_eq!(h.probe.live_instances().len(), 1);
    }

    #[test]
    fn autostart_and_exit_hooks() {
        let h = Harness::with_sounds(&["a.wav"]);
        let mut quiet = SoundPlayer::named(&h.manager, "a", None);
        quiet.on_enter().unwrap();
        assert_eq!(quiet.state(), PlaybackState::Stopped);

        let mut loud = SoundPlayer::named(&h.manager, "a", None).with_autostart(true);
        loud.on_enter().unwrap();
        assert!(loud.is_playing());
        loud.on_exit();
        assert!(h.probe.live_instances().is_empty());
    }

    #[test]
    fn dropping_the_player_stops_its_instance() {
        let h = Harness::with_sounds(&["a.wav"]);
        let mut player = SoundPlayer::named(&h.manager, "a", None);
        player.play().unwrap();
        assert_eq!(h.probe.live_instances().len(), 1);
        drop(player);
        assert!(h.probe.live_instances().is_empty());
    }

    #[test]
    fn set_sound_takes_effect_on_next_play() {
        let h = Harness::with_sounds(&["a.wav", "b.wav"]);
        let mut player = SoundPlayer::named(&h.manager, "a", None);
        player.play().unwrap();
        player.set_sound(h.manager.get_sound("b"));
        assert_eq!(player.current_sound().unwrap().name(), "a");
        player.play().unwrap();
        assert_eq!(player.current_sound().unwrap().name(), "b");
    }
}
