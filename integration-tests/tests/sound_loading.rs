use std::sync::Arc;

use asset_manager::AssetError;
use audio_backend::mock_backend::MockSoundSource;
use audio_backend::LoadingMethod;
use audio_system::{AudioConfig, AudioError, SoundOrigin};
use integration_tests::{mixer_config, AssetRoot};

#[test]
fn folder_scan_applies_per_sound_overrides() {
    let root = AssetRoot::new();
    root.sound("a.wav").sound("sub/b.ogg").file(
        "Sounds/config.json",
        br#"{
            "entries": [
                { "name": "sub/b", "loadingMethod": "stream" }, // case does not matter
            ]
        }"#,
    );
    let (manager, probe) = root.start(&mixer_config());

    assert_eq!(manager.sounds().names(), vec!["a", "sub/b"]);
    let a = manager.get_sound("a");
    let b = manager.get_sound("sub/b");
    assert_eq!(a.loading_method(), LoadingMethod::Preload);
    assert_eq!(b.loading_method(), LoadingMethod::Stream);
    assert_eq!(b.origin(), &SoundOrigin::File(root.path().join("Sounds/sub/b.ogg")));

    let backend_b = probe.sound(b.id()).unwrap();
    assert_eq!(backend_b.method, LoadingMethod::Stream);
    assert_eq!(backend_b.source, MockSoundSource::Path(root.path().join("Sounds/sub/b.ogg")));
}

#[test]
fn non_sound_files_are_not_registered() {
    let root = AssetRoot::new();
    root.sound("a.wav")
        .sound("c.mp3")
        .file("Sounds/readme.txt", b"hello")
        .file("Sounds/config.json", b"{}");
    let (manager, _probe) = root.start(&mixer_config());
    assert_eq!(manager.sounds().names(), vec!["a", "c"]);
    assert!(!manager.sounds().contains("readme"));
    assert!(!manager.sounds().contains("config"));
}

#[test]
fn missing_sound_resolves_to_the_fallback() {
    let root = AssetRoot::new();
    root.sound("a.wav");
    let (manager, probe) = root.start(&mixer_config());

    let missing = manager.get_sound("does/not/exist");
    assert!(Arc::ptr_eq(&missing, manager.sounds().fallback()));
    assert!(Arc::ptr_eq(&missing, &manager.get_sound("also/missing")));
    let source = probe.sound(missing.id()).unwrap().source;
    assert!(matches!(source, MockSoundSource::Bytes(n) if n > 0));

    // still playable
    let inst = manager.play(&missing, "Sfx").unwrap();
    assert!(inst.is_playing());
}

#[test]
fn custom_folder_and_no_override_file() {
    let root = AssetRoot::new();
    root.file("Audio/hit.ogg", b"OggS").file(
        "Audio/config.json",
        br#"{ "entries": [ { "name": "hit", "loadingMethod": "Stream" } ] }"#,
    );
    let config = AudioConfig {
        sound_folder: "Audio".into(),
        sound_config: String::new(),
        ..mixer_config()
    };
    let (manager, _probe) = root.start(&config);
    assert_eq!(manager.get_sound("hit").loading_method(), LoadingMethod::Preload);
}

#[test]
fn malformed_override_file_aborts_startup() {
    let root = AssetRoot::new();
    root.sound("a.wav").file("Sounds/config.json", b"{ \"entries\": [ { \"name\": 1 } ] }");
    let backend = audio_backend::mock_backend::MockAudioBackend::new();
    let probe = backend.probe();
    let err = audio_system::AudioManager::startup(Box::new(backend), root.path(), &mixer_config())
        .unwrap_err();
    assert!(matches!(err, AudioError::Asset(AssetError::ConfigParse { .. })));
    assert!(!probe.is_running());
}

#[test]
fn config_file_round_trip_from_disk() {
    let root = AssetRoot::new();
    root.file("audio.json", integration_tests::MIXER_JSON.as_bytes());
    let config = AudioConfig::load(&root.path().join("audio.json")).unwrap();
    assert_eq!(config, mixer_config());
    assert_eq!(config.sound_folder, "Sounds");
}
