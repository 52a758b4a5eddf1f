use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    AudioBackend, BackendError, BusId, DeviceInfo, DeviceInfoProvider, InstanceId, InstanceParam,
    LoadingMethod, SoundId,
};

/// Extensions the mock pretends to decode.
const DECODABLE_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg"];

/// Every call the mock received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Startup,
    Update,
    Shutdown,
    LoadPath(PathBuf, LoadingMethod),
    LoadBytes(usize, LoadingMethod),
    CreateBus(String, Option<BusId>),
    SetBusVolume(BusId, f32),
    Play(SoundId, Option<BusId>),
    SetParam(InstanceId, InstanceParam),
    SetCursor(InstanceId, Duration),
    Pause(InstanceId),
    Resume(InstanceId),
    Stop(InstanceId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockSoundSource {
    Path(PathBuf),
    Bytes(usize),
}

#[derive(Debug, Clone)]
pub struct MockSound {
    pub source: MockSoundSource,
    pub method: LoadingMethod,
}

#[derive(Debug, Clone)]
pub struct MockBus {
    pub name: String,
    pub parent: Option<BusId>,
    pub volume: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockInstanceState {
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct MockInstance {
    pub sound: SoundId,
    pub bus: Option<BusId>,
    pub state: MockInstanceState,
    pub cursor: Duration,
    pub pitch: f32,
    /// Parameters applied after `play`, in application order.
    pub params: Vec<InstanceParam>,
}

#[derive(Debug)]
struct MockState {
    running: bool,
    fail_startup: bool,
    tick: Duration,
    next_id: u64,
    update_count: u64,
    sounds: HashMap<SoundId, MockSound>,
    buses: HashMap<BusId, MockBus>,
    instances: HashMap<InstanceId, MockInstance>,
    calls: Vec<MockCall>,
}

impl MockState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_running(&self) -> Result<(), BackendError> {
        if self.running { Ok(()) } else { Err(BackendError::NotStarted) }
    }

    fn live_instance(&mut self, id: InstanceId) -> Option<&mut MockInstance> {
        self.instances
            .get_mut(&id)
            .filter(|i| i.state != MockInstanceState::Stopped)
    }
}

/// A recording backend: no device, no decoding. Sounds are validated for
/// existence only, and playing instances advance their cursor by a fixed
/// tick on every `update()`.
pub struct MockAudioBackend {
    info: DeviceInfo,
    state: Arc<Mutex<MockState>>,
}

impl MockAudioBackend {
    pub fn new() -> Self {
        Self {
            info: DeviceInfo {
                sample_rate: 48000,
                channels: 2,
                device_name: Some("mock-device".to_string()),
            },
            state: Arc::new(Mutex::new(MockState {
                running: false,
                fail_startup: false,
                tick: Duration::from_millis(10),
                next_id: 0,
                update_count: 0,
                sounds: HashMap::new(),
                buses: HashMap::new(),
                instances: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Make `startup` fail with `DeviceNotFound`.
    pub fn with_failing_startup(self) -> Self {
        self.state.lock().fail_startup = true;
        self
    }

    /// Cursor advance applied to playing instances per `update()`.
    pub fn with_tick(self, tick: Duration) -> Self {
        self.state.lock().tick = tick;
        self
    }

    /// A handle onto the mock's state that stays usable after the backend is boxed.
    pub fn probe(&self) -> MockProbe {
        MockProbe { state: self.state.clone() }
    }
}

impl Default for MockAudioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for MockAudioBackend {
    fn startup(&mut self) -> Result<(), BackendError> {
        let mut s = self.state.lock();
        s.calls.push(MockCall::Startup);
        if s.fail_startup {
            return Err(BackendError::DeviceNotFound);
        }
        s.running = true;
        Ok(())
    }

    fn update(&mut self) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::Update);
        s.update_count += 1;
        let tick = s.tick;
        for inst in s.instances.values_mut() {
            if inst.state == MockInstanceState::Playing {
                inst.cursor += tick;
            }
        }
    }

    fn shutdown(&mut self) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::Shutdown);
        s.running = false;
        for inst in s.instances.values_mut() {
            inst.state = MockInstanceState::Stopped;
        }
    }

    fn is_running(&self) -> bool {
        self.state.lock().running
    }

    fn load_sound_path(
        &mut self,
        path: &Path,
        method: LoadingMethod,
    ) -> Result<SoundId, BackendError> {
        let mut s = self.state.lock();
        s.calls.push(MockCall::LoadPath(path.to_path_buf(), method));
        s.require_running()?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !DECODABLE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(ext)) {
            return Err(BackendError::UnsupportedFormat(path.display().to_string()));
        }
        let meta = std::fs::metadata(path)?;
        if meta.len() == 0 {
            return Err(BackendError::Decode(format!("{} is empty", path.display())));
        }
        let id = SoundId(s.next_id());
        let source = MockSoundSource::Path(path.to_path_buf());
        s.sounds.insert(id, MockSound { source, method });
        Ok(id)
    }

    fn load_sound_bytes(
        &mut self,
        bytes: &[u8],
        method: LoadingMethod,
    ) -> Result<SoundId, BackendError> {
        let mut s = self.state.lock();
        s.calls.push(MockCall::LoadBytes(bytes.len(), method));
        s.require_running()?;
        if bytes.is_empty() {
            return Err(BackendError::Decode("empty sound data".into()));
        }
        let id = SoundId(s.next_id());
        s.sounds.insert(id, MockSound { source: MockSoundSource::Bytes(bytes.len()), method });
        Ok(id)
    }

    fn create_bus(&mut self, name: &str, parent: Option<BusId>) -> Result<BusId, BackendError> {
        let mut s = self.state.lock();
        s.calls.push(MockCall::CreateBus(name.to_string(), parent));
        s.require_running()?;
        if let Some(p) = parent {
            if !s.buses.contains_key(&p) {
                return Err(BackendError::UnknownBus(p));
            }
        }
        let id = BusId(s.next_id());
        s.buses.insert(id, MockBus { name: name.to_string(), parent, volume: 1.0 });
        Ok(id)
    }

    fn set_bus_volume(&mut self, bus: BusId, volume: f32) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::SetBusVolume(bus, volume));
        if let Some(b) = s.buses.get_mut(&bus) {
            b.volume = volume;
        }
    }

    fn bus_volume(&self, bus: BusId) -> Option<f32> {
        self.state.lock().buses.get(&bus).map(|b| b.volume)
    }

    fn play(&mut self, sound: SoundId, bus: Option<BusId>) -> Result<InstanceId, BackendError> {
        let mut s = self.state.lock();
        s.calls.push(MockCall::Play(sound, bus));
        s.require_running()?;
        if !s.sounds.contains_key(&sound) {
            return Err(BackendError::UnknownSound(sound));
        }
        if let Some(b) = bus {
            if !s.buses.contains_key(&b) {
                return Err(BackendError::UnknownBus(b));
            }
        }
        let id = InstanceId(s.next_id());
        s.instances.insert(
            id,
            MockInstance {
                sound,
                bus,
                state: MockInstanceState::Playing,
                cursor: Duration::ZERO,
                pitch: 1.0,
                params: Vec::new(),
            },
        );
        Ok(id)
    }

    fn set_param(&mut self, instance: InstanceId, param: InstanceParam) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::SetParam(instance, param));
        if let Some(inst) = s.live_instance(instance) {
            if let InstanceParam::Pitch(p) = param {
                inst.pitch = p;
            }
            inst.params.push(param);
        }
    }

    fn pitch(&self, instance: InstanceId) -> Option<f32> {
        self.state.lock().instances.get(&instance).map(|i| i.pitch)
    }

    fn cursor(&self, instance: InstanceId) -> Option<Duration> {
        self.state.lock().instances.get(&instance).map(|i| i.cursor)
    }

    fn set_cursor(&mut self, instance: InstanceId, cursor: Duration) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::SetCursor(instance, cursor));
        if let Some(inst) = s.live_instance(instance) {
            inst.cursor = cursor;
        }
    }

    fn pause(&mut self, instance: InstanceId) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::Pause(instance));
        if let Some(inst) = s.live_instance(instance) {
            inst.state = MockInstanceState::Paused;
        }
    }

    fn resume(&mut self, instance: InstanceId) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::Resume(instance));
        if let Some(inst) = s.live_instance(instance) {
            inst.state = MockInstanceState::Playing;
        }
    }

    fn stop(&mut self, instance: InstanceId) {
        let mut s = self.state.lock();
        s.calls.push(MockCall::Stop(instance));
        if let Some(inst) = s.instances.get_mut(&instance) {
            inst.state = MockInstanceState::Stopped;
        }
    }

    fn is_playing(&self, instance: InstanceId) -> bool {
        self.state
            .lock()
            .instances
            .get(&instance)
            .is_some_and(|i| i.state == MockInstanceState::Playing)
    }

    fn as_device_info_provider(&self) -> Option<&dyn DeviceInfoProvider> {
        Some(self)
    }
}

impl DeviceInfoProvider for MockAudioBackend {
    fn get_device_name(&self) -> Option<&str> {
        self.info.device_name.as_deref()
    }

    fn device_info(&self) -> DeviceInfo {
        self.info.clone()
    }
}

/// Test-side view of a `MockAudioBackend`.
#[derive(Clone)]
pub struct MockProbe {
    state: Arc<Mutex<MockState>>,
}

impl MockProbe {
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn update_count(&self) -> u64 {
        self.state.lock().update_count
    }

    pub fn sound(&self, id: SoundId) -> Option<MockSound> {
        self.state.lock().sounds.get(&id).cloned()
    }

    pub fn sound_count(&self) -> usize {
        self.state.lock().sounds.len()
    }

    pub fn bus(&self, id: BusId) -> Option<MockBus> {
        self.state.lock().buses.get(&id).cloned()
    }

    pub fn instance(&self, id: InstanceId) -> Option<MockInstance> {
        self.state.lock().instances.get(&id).cloned()
    }

    /// Instances that are playing or paused, sorted by id.
    pub fn live_instances(&self) -> Vec<InstanceId> {
        let s = self.state.lock();
        let mut ids: Vec<InstanceId> = s
            .instances
            .iter()
            .filter(|(_, i)| i.state != MockInstanceState::Stopped)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Move an instance's cursor without recording a call, as the mixer would.
    pub fn set_cursor(&self, id: InstanceId, cursor: Duration) {
        if let Some(inst) = self.state.lock().instances.get_mut(&id) {
            inst.cursor = cursor;
        }
    }
}
