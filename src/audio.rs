//! Audio using the Web Audio API
//!
//! Sound effects are synthesized from oscillators. Playback goes through a
//! fixed set of voices used round-robin; starting a sound on a busy voice
//! cuts off whatever that voice was playing.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

#[cfg(target_arch = "wasm32")]
use crate::settings::Settings;
use crate::sim::{GameEvent, PowerTier};

/// Simultaneous sounds
#[cfg(target_arch = "wasm32")]
pub const NUM_VOICES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Missile fired or bomb dropped
    Whoosh,
    /// Invader destroyed
    Bang,
    /// Bomb hit the ship
    ShipHit,
    PowerUp,
    PowerDown,
    LevelStart,
    Victory,
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::MissileFired | GameEvent::BombDropped => Some(SoundEffect::Whoosh),
            GameEvent::InvaderDestroyed { .. } => Some(SoundEffect::Bang),
            GameEvent::ShipHit { .. } => Some(SoundEffect::ShipHit),
            GameEvent::PowerTierChanged { tier: PowerTier::Plain } => Some(SoundEffect::PowerDown),
            GameEvent::PowerTierChanged { .. } => Some(SoundEffect::PowerUp),
            GameEvent::LevelStarted { .. } => Some(SoundEffect::LevelStart),
            GameEvent::GameOver { victory: true } => Some(SoundEffect::Victory),
            GameEvent::GameOver { victory: false } => Some(SoundEffect::GameOver),
            GameEvent::SwarmSpedUp => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
struct Voice {
    gain: GainNode,
    osc: Option<OscillatorNode>,
}

#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    voices: Vec<Voice>,
    cursor: usize,
    volume: f32,
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        let voices = match &ctx {
            Some(ctx) => (0..NUM_VOICES)
                .filter_map(|_| {
                    let gain = ctx.create_gain().ok()?;
                    gain.connect_with_audio_node(&ctx.destination()).ok()?;
                    Some(Voice { gain, osc: None })
                })
                .collect(),
            None => {
                log::warn!("Failed to create AudioContext - audio disabled");
                Vec::new()
            }
        };
        Self {
            ctx,
            voices,
            cursor: 0,
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn play(&mut self, effect: SoundEffect) {
        if self.volume <= 0.0 || self.voices.is_empty() {
            return;
        }
        let Some(ctx) = self.ctx.clone() else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.voices.len();
        let vol = self.volume;
        let voice = &mut self.voices[index];

        if let Some(old) = voice.osc.take() {
            old.stop().ok();
        }

        let Ok(osc) = ctx.create_oscillator() else {
            return;
        };
        if osc.connect_with_audio_node(&voice.gain).is_err() {
            return;
        }

        let t = ctx.current_time();
        let gain = voice.gain.gain();
        gain.cancel_scheduled_values(t).ok();
        let freq = osc.frequency();

        let duration = match effect {
            SoundEffect::Whoosh => {
                osc.set_type(OscillatorType::Sawtooth);
                freq.set_value_at_time(900.0, t).ok();
                freq.exponential_ramp_to_value_at_time(200.0, t + 0.12).ok();
                gain.set_value_at_time(vol * 0.15, t).ok();
                gain.exponential_ramp_to_value_at_time(0.001, t + 0.12).ok();
                0.12
            }
            SoundEffect::Bang => {
                osc.set_type(OscillatorType::Square);
                freq.set_value_at_time(180.0, t).ok();
                freq.exponential_ramp_to_value_at_time(40.0, t + 0.25).ok();
                gain.set_value_at_time(vol * 0.3, t).ok();
                gain.exponential_ramp_to_value_at_time(0.001, t + 0.25).ok();
                0.25
            }
            SoundEffect::ShipHit => {
                osc.set_type(OscillatorType::Sawtooth);
                freq.set_value_at_time(120.0, t).ok();
                freq.linear_ramp_to_value_at_time(30.0, t + 0.5).ok();
                gain.set_value_at_time(vol * 0.5, t).ok();
                gain.exponential_ramp_to_value_at_time(0.001, t + 0.5).ok();
                0.5
            }
            SoundEffect::PowerUp | SoundEffect::PowerDown => {
                let (from, to) = if effect == SoundEffect::PowerUp {
                    (300.0, 1200.0)
                } else {
                    (1200.0, 300.0)
                };
                osc.set_type(OscillatorType::Triangle);
                freq.set_value_at_time(from, t).ok();
                freq.exponential_ramp_to_value_at_time(to, t + 0.3).ok();
                gain.set_value_at_time(vol * 0.3, t).ok();
                gain.linear_ramp_to_value_at_time(0.0, t + 0.3).ok();
                0.3
            }
            SoundEffect::LevelStart | SoundEffect::Victory => {
                // Rising arpeggio, one note every 80 ms
                let notes: &[f32] = if effect == SoundEffect::Victory {
                    &[523.0, 659.0, 784.0, 1047.0, 1319.0]
                } else {
                    &[392.0, 523.0, 659.0]
                };
                osc.set_type(OscillatorType::Square);
                for (i, note) in notes.iter().enumerate() {
                    freq.set_value_at_time(*note, t + i as f64 * 0.08).ok();
                }
                let end = notes.len() as f64 * 0.08;
                gain.set_value_at_time(vol * 0.2, t).ok();
                gain.linear_ramp_to_value_at_time(0.0, t + end).ok();
                end
            }
            SoundEffect::GameOver => {
                osc.set_type(OscillatorType::Triangle);
                freq.set_value_at_time(440.0, t).ok();
                freq.exponential_ramp_to_value_at_time(55.0, t + 1.2).ok();
                gain.set_value_at_time(vol * 0.4, t).ok();
                gain.linear_ramp_to_value_at_time(0.0, t + 1.2).ok();
                1.2
            }
        };

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.05).ok();
        voice.osc = Some(osc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_both_weapons_whoosh() {
        assert_eq!(SoundEffect::for_event(&GameEvent::MissileFired), Some(SoundEffect::Whoosh));
        assert_eq!(SoundEffect::for_event(&GameEvent::BombDropped), Some(SoundEffect::Whoosh));
    }

    #[test]
    fn test_event_sounds() {
        let destroyed = GameEvent::InvaderDestroyed { pos: Vec2::ZERO };
        assert_eq!(SoundEffect::for_event(&destroyed), Some(SoundEffect::Bang));
        let down = GameEvent::PowerTierChanged {
            tier: PowerTier::Plain,
        };
        assert_eq!(SoundEffect::for_event(&down), Some(SoundEffect::PowerDown));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver { victory: true }),
            Some(SoundEffect::Victory)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::SwarmSpedUp), None);
    }
}
