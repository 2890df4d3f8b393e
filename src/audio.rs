//! Sound cues
//!
//! The game only decides *which* cue to play; `SoundSink` implementations
//! decide how. Mute and volume are handed in as `SoundConfig`, never read
//! from global state.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run started or ball turned
    Tap,
    /// Diamond collected
    Diamond,
    /// Ball fell off the path
    Crash,
}

/// Injected audio configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundConfig {
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 1.0,
        }
    }
}

impl SoundConfig {
    /// Gain multiplier, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume.clamp(0.0, 1.0)
        }
    }
}

/// Anything that can play the game's cues
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
    fn config(&self) -> SoundConfig;
    fn set_config(&mut self, config: SoundConfig);

    fn set_muted(&mut self, muted: bool) {
        let config = SoundConfig {
            muted,
            ..self.config()
        };
        self.set_config(config);
    }
}

/// Sink for hosts without audio (native demo)
#[derive(Debug, Clone, Default)]
pub struct SilentSink {
    config: SoundConfig,
}

impl SilentSink {
    pub fn new(config: SoundConfig) -> Self {
        Self { config }
    }
}

impl SoundSink for SilentSink {
    fn play(&mut self, effect: SoundEffect) {
        if self.config.effective_volume() > 0.0 {
            log::trace!("Sound cue {:?}", effect);
        }
    }

    fn config(&self) -> SoundConfig {
        self.config
    }

    fn set_config(&mut self, config: SoundConfig) {
        self.config = config;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundConfig, SoundEffect, SoundSink};

    /// Web Audio implementation with procedurally generated cues
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        config: SoundConfig,
    }

    impl AudioManager {
        pub fn new(config: SoundConfig) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, config }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Tap - quick downward chirp
        fn play_tap(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(100.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Diamond - bright rising sparkle
        fn play_diamond(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(1200.0, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(1800.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.01, t + 0.3).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Crash - low sawtooth drop
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(10.0, t + 0.5)
                .ok();
            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }
    }

    impl SoundSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.config.effective_volume();
            if vol <= 0.0 {
                return;
            }

            match effect {
                SoundEffect::Tap => self.play_tap(ctx, vol),
                SoundEffect::Diamond => self.play_diamond(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
            }
        }

        fn config(&self) -> SoundConfig {
            self.config
        }

        fn set_config(&mut self, config: SoundConfig) {
            self.config = config;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let config = SoundConfig {
            muted: false,
            volume: 0.8,
        };
        assert_eq!(config.effective_volume(), 0.8);
        assert_eq!(
            SoundConfig {
                muted: true,
                ..config
            }
            .effective_volume(),
            0.0
        );
        assert_eq!(
            SoundConfig {
                muted: false,
                volume: 3.0
            }
            .effective_volume(),
            1.0
        );
    }

    #[test]
    fn test_set_muted_keeps_volume() {
        let mut sink = SilentSink::new(SoundConfig {
            muted: false,
            volume: 0.5,
        });
        sink.set_muted(true);
        assert_eq!(
            sink.config(),
            SoundConfig {
                muted: true,
                volume: 0.5
            }
        );
        sink.play(SoundEffect::Tap);
    }
}
