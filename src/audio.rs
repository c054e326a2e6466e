//! Audio cue dispatch
//!
//! The engine never plays sound itself. It maps simulation events to sound
//! cues and hands them to whatever sink the host provides (Web Audio, a
//! native mixer, or just the log). Fire-and-forget: sinks return nothing.

use crate::sim::{GameEvent, WeaponKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// New round, wind shifts
    RoundStart,
    /// Shell leaves the barrel
    Launch,
    /// Cluster shell opens
    ClusterSplit,
    /// Bouncer hits the ground and keeps going
    Bounce,
    /// Standard explosion
    Explosion,
    /// Big explosion (heavy shell)
    HeavyExplosion,
    /// EMP discharge
    EmpPulse,
    /// Concussion thump
    Concussion,
    /// Tank takes damage
    TankHit,
    /// Tank destroyed
    TankDestroyed,
    /// Match over
    GameOver,
}

/// A cue with its playback gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    /// 0.0 - 1.0, already scaled by master/sfx volume
    pub volume: f32,
}

/// Whatever actually makes noise
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Discards every cue
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&mut self, _cue: Cue) {}
}

/// Logs every cue (headless runs)
#[derive(Debug, Default)]
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: Cue) {
        log::debug!("♪ {:?} @ {:.2}", cue.effect, cue.volume);
    }
}

/// Cue for an event plus a relative loudness, if the event is audible
pub fn cue_for(event: &GameEvent) -> Option<(SoundEffect, f32)> {
    let cue = match event {
        GameEvent::RoundStarted { .. } => (SoundEffect::RoundStart, 0.5),
        GameEvent::WeaponFired { .. } => (SoundEffect::Launch, 0.7),
        GameEvent::ClusterSplit { .. } => (SoundEffect::ClusterSplit, 0.6),
        GameEvent::Bounced { .. } => (SoundEffect::Bounce, 0.4),
        GameEvent::Explosion {
            weapon,
            blast_radius,
            ..
        } => {
            // Bigger blasts are louder
            let loudness = (blast_radius / 60.0).clamp(0.3, 1.0);
            let effect = match weapon {
                WeaponKind::HeavyShell => SoundEffect::HeavyExplosion,
                WeaponKind::Emp => SoundEffect::EmpPulse,
                WeaponKind::Concussion => SoundEffect::Concussion,
                _ => SoundEffect::Explosion,
            };
            (effect, loudness)
        }
        GameEvent::TankHit { .. } => (SoundEffect::TankHit, 0.6),
        GameEvent::TankDestroyed { .. } => (SoundEffect::TankDestroyed, 1.0),
        GameEvent::MatchOver { .. } => (SoundEffect::GameOver, 0.8),
        GameEvent::AmmoConsumed { .. } | GameEvent::RoundComplete { .. } => return None,
    };
    Some(cue)
}

/// Volume control in front of a sink
pub struct AudioDispatcher<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioDispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect at a relative loudness
    pub fn play(&mut self, effect: SoundEffect, loudness: f32) {
        let volume = self.effective_volume() * loudness.clamp(0.0, 1.0);
        if volume <= 0.0 {
            return;
        }
        self.sink.play(Cue { effect, volume });
    }

    /// Play the cue for every audible event
    pub fn dispatch<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            if let Some((effect, loudness)) = cue_for(event) {
                self.play(effect, loudness);
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
