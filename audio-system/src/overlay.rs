//! Optional per-playback parameters. Only the fields that are set reach the
//! backend; everything else keeps whatever the backend defaults to.

use std::time::Duration;

use audio_backend::{AttenuationModel, InstanceParam, Positioning, SoundCone, Vec3};

use crate::instance::SoundInstance;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackOverrides {
    pub volume: Option<f32>,
    pub pitch: Option<f32>,
    pub pan: Option<f32>,
    pub looping: Option<bool>,
    pub loop_begin: Option<Duration>,
    pub loop_end: Option<Duration>,
    pub loop_begin_frames: Option<u64>,
    pub loop_end_frames: Option<u64>,

    /// Gate for every field below. When unset the spatial fields are ignored
    /// even if some of them hold values.
    pub spatialized: Option<bool>,
    pub positioning: Option<Positioning>,
    pub position: Option<Vec3>,
    pub velocity: Option<Vec3>,
    pub direction: Option<Vec3>,
    pub pinned_listener: Option<u32>,
    pub attenuation_model: Option<AttenuationModel>,
    pub rolloff: Option<f32>,
    pub min_gain: Option<f32>,
    pub max_gain: Option<f32>,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub cone: Option<SoundCone>,
    pub directional_attenuation_factor: Option<f32>,
    pub doppler_factor: Option<f32>,
}

impl PlaybackOverrides {
    pub fn is_empty(&self) -> bool {
        self.params().is_empty()
    }

    /// The parameters this overlay would apply, in application order.
    pub fn params(&self) -> Vec<InstanceParam> {
        let mut out = Vec::new();
        push(&mut out, self.volume, InstanceParam::Volume);
        push(&mut out, self.pitch, InstanceParam::Pitch);
        push(&mut out, self.pan, InstanceParam::Pan);
        push(&mut out, self.looping, InstanceParam::Looping);
        push(&mut out, self.loop_begin, InstanceParam::LoopBegin);
        push(&mut out, self.loop_end, InstanceParam::LoopEnd);
        push(&mut out, self.loop_begin_frames, InstanceParam::LoopBeginFrames);
        push(&mut out, self.loop_end_frames, InstanceParam::LoopEndFrames);

        if let Some(spatialized) = self.spatialized {
            out.push(InstanceParam::Spatialized(spatialized));
            push(&mut out, self.positioning, InstanceParam::Positioning);
            push(&mut out, self.position, InstanceParam::Position);
            push(&mut out, self.velocity, InstanceParam::Velocity);
            push(&mut out, self.direction, InstanceParam::Direction);
            push(&mut out, self.pinned_listener, InstanceParam::PinnedListener);
            push(&mut out, self.attenuation_model, InstanceParam::AttenuationModel);
            push(&mut out, self.rolloff, InstanceParam::Rolloff);
            push(&mut out, self.min_gain, InstanceParam::MinGain);
            push(&mut out, self.max_gain, InstanceParam::MaxGain);
            push(&mut out, self.min_distance, InstanceParam::MinDistance);
            push(&mut out, self.max_distance, InstanceParam::MaxDistance);
            push(&mut out, self.cone, InstanceParam::Cone);
            push(
                &mut out,
                self.directional_attenuation_factor,
                InstanceParam::DirectionalAttenuationFactor,
            );
            push(&mut out, self.doppler_factor, InstanceParam::DopplerFactor);
        }
        out
    }

    pub fn apply_to(&self, instance: &SoundInstance) {
        instance.apply_all(self.params());
    }
}

fn push<T>(out: &mut Vec<InstanceParam>, value: Option<T>, make: fn(T) -> InstanceParam) {
    if let Some(v) = value {
        out.push(make(v));
    }
}
