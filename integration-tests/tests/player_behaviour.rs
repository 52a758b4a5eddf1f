use std::collections::HashMap;
use std::time::Duration;

use audio_backend::mock_backend::MockInstanceState;
use audio_backend::{InstanceParam, Vec3};
use audio_system::{PlaybackOverrides, PlaybackState, SoundPlayer, WeightedSoundPool};
use integration_tests::{mixer_config, AssetRoot};

#[test]
fn pause_unpause_resumes_at_the_paused_position() {
    let root = AssetRoot::new();
    root.sound("music/theme.ogg");
    let (manager, probe) = root.start(&mixer_config());
    let mut player = SoundPlayer::named(&manager, "music/theme", Some("Music"));

    player.play().unwrap();
    for _ in 0..5 {
        manager.update();
    }
    let id = player.instance().unwrap().id();
    let before = probe.instance(id).unwrap().cursor;
    assert_eq!(before, Duration::from_millis(50));

    player.pause();
    manager.update();
    assert_eq!(probe.instance(id).unwrap().cursor, before);
    // some backends rewind paused instances
    probe.set_cursor(id, Duration::ZERO);

    player.unpause();
    let inst = probe.instance(id).unwrap();
    assert_eq!(inst.state, MockInstanceState::Playing);
    assert_eq!(inst.cursor, before);
    assert_eq!(player.state(), PlaybackState::Playing);
}

#[test]
fn replaying_keeps_a_single_live_instance() {
    let root = AssetRoot::new();
    root.sound("ui/click.wav");
    let (manager, probe) = root.start(&mixer_config());
    let mut player = SoundPlayer::named(&manager, "ui/click", Some("Ui"));

    for _ in 0..4 {
        player.play().unwrap();
    }
    let live = probe.live_instances();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0], player.instance().unwrap().id());
    assert_eq!(probe.instance(live[0]).unwrap().bus, Some(manager.get_bus("Ui").id()));
}

#[test]
fn players_are_independent() {
    let root = AssetRoot::new();
    root.sound("a.wav");
    let (manager, probe) = root.start(&mixer_config());
    let mut one = SoundPlayer::named(&manager, "a", None);
    let mut two = SoundPlayer::named(&manager, "a", None);
    one.play().unwrap();
    two.play().unwrap();
    assert_eq!(probe.live_instances().len(), 2);
    one.stop();
    assert_eq!(probe.live_instances(), vec![two.instance().unwrap().id()]);
}

#[test]
fn uniform_pool_spreads_over_members() {
    let root = AssetRoot::new();
    for i in 1..=4 {
        root.sound(&format!("steps/step{i}.wav"));
    }
    let (manager, _probe) = root.start(&mixer_config());
    let mut player =
        SoundPlayer::pool_from_base(&manager, "steps/step", 4, 1, Some("Sfx")).with_seed(2024);

    let mut counts: HashMap<String, u32> = HashMap::new();
    for _ in 0..1000 {
        player.play().unwrap();
        let name = player.current_sound().unwrap().name().to_string();
        *counts.entry(name).or_default() += 1;
    }
    assert_eq!(counts.len(), 4);
    for (name, n) in &counts {
        assert!((170..=330).contains(n), "{name} played {n} times");
    }
}

#[test]
fn weighted_pool_follows_relative_weights() {
    let root = AssetRoot::new();
    root.sound("x.wav").sound("y.wav");
    let (manager, _probe) = root.start(&mixer_config());
    let mut pool = WeightedSoundPool::new();
    pool.add(manager.get_sound("x"), 1).add(manager.get_sound("y"), 3);
    let mut player = SoundPlayer::weighted(&manager, pool, None).with_seed(99);

    let (mut x, mut y) = (0u32, 0u32);
    for _ in 0..4000 {
        player.play().unwrap();
        match player.current_sound().unwrap().name() {
            "x" => x += 1,
            _ => y += 1,
        }
    }
    let ratio = f64::from(y) / f64::from(x);
    assert!((2.5..=3.6).contains(&ratio), "y/x = {ratio}");
}

#[test]
fn spatial_overrides_reach_the_instance_only_when_enabled() {
    let root = AssetRoot::new();
    root.sound("engine.wav");
    let (manager, probe) = root.start(&mixer_config());
    let overrides = PlaybackOverrides {
        volume: Some(0.7),
        position: Some(Vec3::new(0.0, 0.0, -4.0)),
        max_distance: Some(30.0),
        ..Default::default()
    };
    let mut player = SoundPlayer::named(&manager, "engine", Some("Sfx")).with_overrides(overrides);

    player.play().unwrap();
    let params = probe.instance(player.instance().unwrap().id()).unwrap().params;
    assert_eq!(params, vec![InstanceParam::Volume(0.7)]);

    player.overrides.spatialized = Some(true);
    player.play().unwrap();
    let params = probe.instance(player.instance().unwrap().id()).unwrap().params;
    assert_eq!(
        params,
        vec![
            InstanceParam::Volume(0.7),
            InstanceParam::Spatialized(true),
            InstanceParam::Position(Vec3::new(0.0, 0.0, -4.0)),
            InstanceParam::MaxDistance(30.0),
        ]
    );
}

#[test]
fn shutdown_stops_everything() {
    let root = AssetRoot::new();
    root.sound("a.wav");
    let (manager, probe) = root.start(&mixer_config());
    let mut player = SoundPlayer::named(&manager, "a", None);
    player.play().unwrap();
    manager.shutdown();
    assert!(probe.live_instances().is_empty());
    assert!(player.play().is_err());
    assert_eq!(player.state(), PlaybackState::Stopped);
}
