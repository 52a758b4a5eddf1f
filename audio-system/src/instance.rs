use std::time::Duration;

use audio_backend::{InstanceId, InstanceParam};

use crate::context::AudioContext;

/// One live playback. Dropping the handle does not stop the sound.
#[derive(Debug)]
pub struct SoundInstance {
    id: InstanceId,
    ctx: AudioContext,
}

impl SoundInstance {
    pub(crate) fn new(id: InstanceId, ctx: AudioContext) -> Self {
        Self { id, ctx }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn stop(&self) {
        self.ctx.with(|b| b.stop(self.id));
    }

    pub fn pause(&self) {
        self.ctx.with(|b| b.pause(self.id));
    }

    pub fn resume(&self) {
        self.ctx.with(|b| b.resume(self.id));
    }

    pub fn is_playing(&self) -> bool {
        self.ctx.with(|b| b.is_playing(self.id))
    }

    /// Playback position, `None` once the backend has forgotten the instance.
    pub fn cursor(&self) -> Option<Duration> {
        self.ctx.with(|b| b.cursor(self.id))
    }

    pub fn set_cursor(&self, cursor: Duration) {
        self.ctx.with(|b| b.set_cursor(self.id, cursor));
    }

    pub fn pitch(&self) -> Option<f32> {
        self.ctx.with(|b| b.pitch(self.id))
    }

    pub fn set_pitch(&self, pitch: f32) {
        self.apply(InstanceParam::Pitch(pitch));
    }

    pub fn apply(&self, param: InstanceParam) {
        self.ctx.with(|b| b.set_param(self.id, param));
    }

    /// Apply several parameters under one backend lock, in order.
    pub fn apply_all(&self, params: impl IntoIterator<Item = InstanceParam>) {
        self.ctx.with(|b| {
            for param in params {
                b.set_param(self.id, param);
            }
        });
    }
}
