// Drives the mock through the `AudioBackend` trait object the way the
// audio system does.

use std::time::Duration;

use audio_backend::mock_backend::{MockAudioBackend, MockCall};
use audio_backend::{
    create_audio_backend, is_mock_backend_enabled, AudioBackend, InstanceParam, LoadingMethod,
};

#[test]
fn factory_returns_a_working_backend() {
    assert!(is_mock_backend_enabled());
    let mut backend = create_audio_backend();
    assert!(!backend.is_running());
    backend.startup().unwrap();
    assert!(backend.is_running());

    let info = backend.as_device_info_provider().map(|p| p.device_info());
    assert!(info.is_some_and(|i| i.sample_rate > 0 && i.channels > 0));

    backend.shutdown();
    assert!(!backend.is_running());
}

#[test]
fn full_instance_lifecycle_through_trait_object() {
    let mock = MockAudioBackend::new().with_tick(Duration::from_millis(25));
    let probe = mock.probe();
    let mut backend: Box<dyn AudioBackend + Send> = Box::new(mock);
    backend.startup().unwrap();

    let sound = backend.load_sound_bytes(b"RIFF", LoadingMethod::Stream).unwrap();
    let master = backend.create_bus("Master", None).unwrap();
    let sfx = backend.create_bus("Sfx", Some(master)).unwrap();
    backend.set_bus_volume(sfx, 0.4);
    assert_eq!(backend.bus_volume(sfx), Some(0.4));

    let inst = backend.play(sound, Some(sfx)).unwrap();
    backend.set_param(inst, InstanceParam::Volume(0.5));
    backend.update();
    backend.update();
    assert_eq!(backend.cursor(inst), Some(Duration::from_millis(50)));

    backend.pause(inst);
    backend.update();
    assert!(!backend.is_playing(inst));
    assert_eq!(backend.cursor(inst), Some(Duration::from_millis(50)));

    backend.resume(inst);
    backend.set_cursor(inst, Duration::from_millis(10));
    assert!(backend.is_playing(inst));
    assert_eq!(backend.cursor(inst), Some(Duration::from_millis(10)));

    backend.stop(inst);
    backend.stop(inst);
    assert!(!backend.is_playing(inst));
    assert!(probe.live_instances().is_empty());

    let stops = probe.calls().into_iter().filter(|c| matches!(c, MockCall::Stop(_))).count();
    assert_eq!(stops, 2);
    assert_eq!(probe.instance(inst).unwrap().params, vec![InstanceParam::Volume(0.5)]);
}
