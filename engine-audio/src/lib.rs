use std::path::{Path, PathBuf};

use anyhow::Context;
use audio_backend::AudioBackend;
use audio_system::{AudioConfig, AudioManager, SoundPlayer};
use bevy_app::{App, AppExit, Plugin, Update};
use bevy_ecs::prelude::*;
use parking_lot::Mutex;

#[derive(Resource, Clone)]
pub struct AudioManagerRes(pub AudioManager);

/// A [`SoundPlayer`] attached to an entity. Despawning the entity stops its sound.
#[derive(Component)]
pub struct SoundPlayerComponent(pub SoundPlayer);

#[derive(Event, Debug, Clone, Copy)]
pub struct PlaySoundEvent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct StopSoundEvent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PauseSoundEvent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct UnpauseSoundEvent {
    pub entity: Entity,
}

/// Start the audio manager and make it available as [`AudioManagerRes`].
pub fn setup_audio(
    world: &mut World,
    backend: Box<dyn AudioBackend + Send>,
    root: &Path,
    config: &AudioConfig,
) -> anyhow::Result<()> {
    let manager = AudioManager::startup(backend, root, config)
        .with_context(|| format!("starting audio with asset root {}", root.display()))?;
    world.insert_resource(AudioManagerRes(manager));
    init_event_resources(world);
    Ok(())
}

/// Stop every sound player and shut the manager down.
pub fn teardown_audio(world: &mut World) {
    let mut players = world.query::<&mut SoundPlayerComponent>();
    for mut player in players.iter_mut(world) {
        player.0.stop();
    }
    if let Some(res) = world.remove_resource::<AudioManagerRes>() {
        res.0.shutdown();
    }
}

// Lets the event systems run on a bare World as well as inside an App.
fn init_event_resources(world: &mut World) {
    if !world.contains_resource::<Events<PlaySoundEvent>>() {
        world.insert_resource(Events::<PlaySoundEvent>::default());
    }
    if !world.contains_resource::<Events<StopSoundEvent>>() {
        world.insert_resource(Events::<StopSoundEvent>::default());
    }
    if !world.contains_resource::<Events<PauseSoundEvent>>() {
        world.insert_resource(Events::<PauseSoundEvent>::default());
    }
    if !world.contains_resource::<Events<UnpauseSoundEvent>>() {
        world.insert_resource(Events::<UnpauseSoundEvent>::default());
    }
}

pub fn audio_update_system(audio: Option<Res<AudioManagerRes>>) {
    if let Some(audio) = audio {
        audio.0.update();
    }
}

/// Run the enter hook of newly added players, which starts autostart players.
pub fn sound_player_enter_system(
    mut added: Query<&mut SoundPlayerComponent, Added<SoundPlayerComponent>>,
) {
    for mut player in &mut added {
        if let Err(e) = player.0.on_enter() {
            tracing::warn!(error = %e, "autostart failed");
        }
    }
}

pub fn play_sound_system(
    mut events: EventReader<PlaySoundEvent>,
    mut players: Query<&mut SoundPlayerComponent>,
) {
    for e in events.read() {
        match players.get_mut(e.entity) {
            Ok(mut player) => {
                if let Err(err) = player.0.play() {
                    tracing::warn!(entity = ?e.entity, error = %err, "play failed");
                }
            }
            Err(_) => {
                tracing::debug!(entity = ?e.entity, "play event for an entity without a player")
            }
        }
    }
}

pub fn stop_sound_system(
    mut events: EventReader<StopSoundEvent>,
    mut players: Query<&mut SoundPlayerComponent>,
) {
    for e in events.read() {
        if let Ok(mut player) = players.get_mut(e.entity) {
            player.0.stop();
        }
    }
}

pub fn pause_sound_system(
    mut events: EventReader<PauseSoundEvent>,
    mut players: Query<&mut SoundPlayerComponent>,
) {
    for e in events.read() {
        if let Ok(mut player) = players.get_mut(e.entity) {
            player.0.pause();
        }
    }
}

pub fn unpause_sound_system(
    mut events: EventReader<UnpauseSoundEvent>,
    mut players: Query<&mut SoundPlayerComponent>,
) {
    for e in events.read() {
        if let Ok(mut player) = players.get_mut(e.entity) {
            player.0.unpause();
        }
    }
}

/// On [`AppExit`], stop all players and shut the backend down.
pub fn shutdown_on_exit_system(
    mut exit: EventReader<AppExit>,
    audio: Option<Res<AudioManagerRes>>,
    mut players: Query<&mut SoundPlayerComponent>,
) {
    if exit.read().next().is_none() {
        return;
    }
    for mut player in &mut players {
        player.0.stop();
    }
    if let Some(audio) = audio {
        audio.0.shutdown();
    }
}

/// Starts audio when the app is built and wires the player systems into `Update`.
///
/// Building panics if the manager cannot start (backend startup, a malformed
/// config or an unloadable fallback sound). Call [`setup_audio`] directly to
/// handle that error instead.
pub struct AudioPlugin {
    backend: Mutex<Option<Box<dyn AudioBackend + Send>>>,
    root: PathBuf,
    config: AudioConfig,
}

impl AudioPlugin {
    pub fn new(
        backend: Box<dyn AudioBackend + Send>,
        root: impl Into<PathBuf>,
        config: AudioConfig,
    ) -> Self {
        Self { backend: Mutex::new(Some(backend)), root: root.into(), config }
    }
}

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySoundEvent>()
            .add_event::<StopSoundEvent>()
            .add_event::<PauseSoundEvent>()
            .add_event::<UnpauseSoundEvent>();

        if let Some(backend) = self.backend.lock().take() {
            if let Err(e) = setup_audio(app.world_mut(), backend, &self.root, &self.config) {
                tracing::error!(error = ?e, "audio startup failed");
                panic!("audio plugin failed to start: {e:?}");
            }
        }

        app.add_systems(
            Update,
            (
                sound_player_enter_system,
                play_sound_system,
                stop_sound_system,
                pause_sound_system,
                unpause_sound_system,
                audio_update_system,
                shutdown_on_exit_system,
            )
                .chain(),
        );
    }
}
