//! Audio: pooled sound channels
//!
//! Every sound is a `SoundPool` of interchangeable `AudioChannel`s, played
//! round-robin so rapid shots overlap. On the web a channel is a sample
//! element that falls back to a synthesized Web Audio tone until (or unless)
//! the sample loads.

use std::cell::Cell;
use std::collections::HashMap;

use crate::sim::{GameEvent, MatchPhase, Outcome, Presenter};

/// Channels per sound
pub const POOL_SIZE: usize = 4;

/// Something that can play a sound
pub trait AudioChannel {
    fn play(&self, volume: f32);
}

/// Round-robin pool of channels for one sound
pub struct SoundPool {
    channels: Vec<Box<dyn AudioChannel>>,
    next: Cell<usize>,
}

impl SoundPool {
    pub fn new(channels: Vec<Box<dyn AudioChannel>>) -> Self {
        Self {
            channels,
            next: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn play(&self, volume: f32) {
        if self.channels.is_empty() {
            return;
        }
        let i = self.next.get() % self.channels.len();
        self.channels[i].play(volume);
        self.next.set(i + 1);
    }
}

/// Oscillator waveform for synthesized tones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A synthesized fallback sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Start frequency (Hz)
    pub freq: f32,
    /// End frequency (Hz), swept exponentially
    pub end_freq: f32,
    pub duration: f32,
    pub waveform: Waveform,
    /// Relative gain (0-1)
    pub gain: f32,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Weapon fired
    Shot,
    /// Target hit
    Hit,
    /// Countdown tick
    CountdownBeep,
    /// Match started
    Go,
    /// Survived the clock
    Victory,
    /// Target reached the player
    Defeat,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::Shot,
        SoundEffect::Hit,
        SoundEffect::CountdownBeep,
        SoundEffect::Go,
        SoundEffect::Victory,
        SoundEffect::Defeat,
    ];

    /// Sample file for this sound
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundEffect::Shot => "sounds/shot.mp3",
            SoundEffect::Hit => "sounds/hit.mp3",
            SoundEffect::CountdownBeep => "sounds/beep.mp3",
            SoundEffect::Go => "sounds/go.mp3",
            SoundEffect::Victory => "sounds/victory.mp3",
            SoundEffect::Defeat => "sounds/defeat.mp3",
        }
    }

    /// Tone played when the sample is missing or still loading
    pub fn fallback_tone(self) -> ToneSpec {
        match self {
            // Sharp crack
            SoundEffect::Shot => ToneSpec {
                freq: 900.0,
                end_freq: 80.0,
                duration: 0.08,
                waveform: Waveform::Square,
                gain: 0.3,
            },
            // Bright ping
            SoundEffect::Hit => ToneSpec {
                freq: 1200.0,
                end_freq: 1800.0,
                duration: 0.12,
                waveform: Waveform::Triangle,
                gain: 0.5,
            },
            SoundEffect::CountdownBeep => ToneSpec {
                freq: 440.0,
                end_freq: 440.0,
                duration: 0.15,
                waveform: Waveform::Sine,
                gain: 0.4,
            },
            SoundEffect::Go => ToneSpec {
                freq: 880.0,
                end_freq: 880.0,
                duration: 0.3,
                waveform: Waveform::Sine,
                gain: 0.5,
            },
            // Rising sweep
            SoundEffect::Victory => ToneSpec {
                freq: 400.0,
                end_freq: 1200.0,
                duration: 0.6,
                waveform: Waveform::Triangle,
                gain: 0.5,
            },
            // Falling buzz
            SoundEffect::Defeat => ToneSpec {
                freq: 300.0,
                end_freq: 50.0,
                duration: 0.8,
                waveform: Waveform::Sawtooth,
                gain: 0.4,
            },
        }
    }

    /// Sound cued by a game event
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::TargetHit(_) => Some(SoundEffect::Hit),
            GameEvent::CountdownChanged(n) if *n > 0 => Some(SoundEffect::CountdownBeep),
            GameEvent::PhaseChanged(MatchPhase::Active) => Some(SoundEffect::Go),
            GameEvent::MatchEnded(summary) => Some(match summary.outcome {
                Outcome::TimeUp => SoundEffect::Victory,
                Outcome::Collision => SoundEffect::Defeat,
            }),
            _ => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    pools: HashMap<SoundEffect, SoundPool>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// Manager with no channels (silent until pools are added)
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn set_pool(&mut self, effect: SoundEffect, pool: SoundPool) {
        self.pools.insert(effect, pool);
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

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(pool) = self.pools.get(&effect) {
            pool.play(vol);
        }
    }
}

impl Presenter for AudioManager {
    fn present(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{SampleChannel, ToneChannel, build_web_audio};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{AudioContext, HtmlAudioElement, OscillatorType};

    use super::*;
    use crate::assets::{AssetSlot, LoadEvent};
    use crate::error::AssetError;

    /// Synthesized tone channel (Web Audio oscillator)
    pub struct ToneChannel {
        ctx: Rc<AudioContext>,
        tone: ToneSpec,
    }

    impl ToneChannel {
        pub fn new(ctx: Rc<AudioContext>, tone: ToneSpec) -> Self {
            Self { ctx, tone }
        }
    }

    impl AudioChannel for ToneChannel {
        fn play(&self, volume: f32) {
            let ctx = &self.ctx;
            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
                return;
            };
            osc.set_type(match self.tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });
            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }

            let t = ctx.current_time();
            let end = t + self.tone.duration as f64;
            gain.gain()
                .set_value_at_time(volume * self.tone.gain, t)
                .ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            osc.frequency().set_value_at_time(self.tone.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(self.tone.end_freq, end)
                .ok();

            osc.start().ok();
            osc.stop_with_when(end + 0.02).ok();
        }
    }

    /// Sample channel; plays its tone until the sample is ready
    pub struct SampleChannel {
        element: HtmlAudioElement,
        status: Rc<RefCell<AssetSlot<()>>>,
        fallback: ToneChannel,
    }

    impl SampleChannel {
        pub fn load(path: &str, fallback: ToneChannel) -> Option<Self> {
            let element = HtmlAudioElement::new_with_src(path).ok()?;
            element.set_preload("auto");
            let status = Rc::new(RefCell::new(AssetSlot::new()));

            {
                let status = status.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    status.borrow_mut().on_event(LoadEvent::Loaded(()), || ());
                });
                let _ = element.add_event_listener_with_callback(
                    "canplaythrough",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            {
                let status = status.clone();
                let path = path.to_string();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    status
                        .borrow_mut()
                        .on_event(LoadEvent::Failed(AssetError::NotFound(path.clone())), || ());
                });
                let _ = element
                    .add_event_listener_with_callback("error", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            Some(Self {
                element,
                status,
                fallback,
            })
        }
    }

    impl AudioChannel for SampleChannel {
        fn play(&self, volume: f32) {
            if !matches!(*self.status.borrow(), AssetSlot::Ready(())) {
                self.fallback.play(volume);
                return;
            }
            self.element.set_volume(volume as f64);
            self.element.set_current_time(0.0);
            let _ = self.element.play();
        }
    }

    /// Build pools for every effect. Without an AudioContext the game runs silent.
    pub fn build_web_audio() -> AudioManager {
        let mut manager = AudioManager::new();
        let Some(ctx) = AudioContext::new().ok().map(Rc::new) else {
            log::warn!("Failed to create AudioContext - audio disabled");
            return manager;
        };

        for effect in SoundEffect::ALL {
            let channels: Vec<Box<dyn AudioChannel>> = (0..POOL_SIZE)
                .map(|_| {
                    let tone = ToneChannel::new(ctx.clone(), effect.fallback_tone());
                    match SampleChannel::load(effect.asset_path(), tone) {
                        Some(sample) => Box::new(sample) as Box<dyn AudioChannel>,
                        None => Box::new(ToneChannel::new(ctx.clone(), effect.fallback_tone())),
                    }
                })
                .collect();
            manager.set_pool(effect, SoundPool::new(channels));
        }
        manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MatchSummary, TargetId};
    use std::rc::Rc;

    struct Counter {
        id: usize,
        log: Rc<std::cell::RefCell<Vec<(usize, f32)>>>,
    }

    impl AudioChannel for Counter {
        fn play(&self, volume: f32) {
            self.log.borrow_mut().push((self.id, volume));
        }
    }

    fn pool(n: usize, log: &Rc<std::cell::RefCell<Vec<(usize, f32)>>>) -> SoundPool {
        SoundPool::new(
            (0..n)
                .map(|id| {
                    Box::new(Counter {
                        id,
                        log: log.clone(),
                    }) as Box<dyn AudioChannel>
                })
                .collect(),
        )
    }

    #[test]
    fn test_pool_round_robin() {
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let pool = pool(3, &log);
        for _ in 0..5 {
            pool.play(1.0);
        }
        let ids: Vec<_> = log.borrow().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_empty_pool_is_silent() {
        let pool = SoundPool::new(Vec::new());
        assert!(pool.is_empty());
        pool.play(1.0);
    }

    #[test]
    fn test_mute_and_volume() {
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut audio = AudioManager::new();
        audio.set_pool(SoundEffect::Shot, pool(1, &log));

        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::Shot);
        assert_eq!(log.borrow().last().map(|(_, v)| *v), Some(0.5));

        audio.set_muted(true);
        audio.play(SoundEffect::Shot);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TargetHit(TargetId(1))),
            Some(SoundEffect::Hit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::CountdownChanged(3)),
            Some(SoundEffect::CountdownBeep)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::CountdownChanged(0)), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::MatchEnded(MatchSummary {
                level_name: "Easy".to_string(),
                score: 3,
                outcome: Outcome::Collision,
            })),
            Some(SoundEffect::Defeat)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::ScoreChanged(1)), None);
    }

    #[test]
    fn test_presenter_plays_cued_sound() {
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut audio = AudioManager::new();
        audio.set_pool(SoundEffect::Go, pool(2, &log));

        audio.present(&GameEvent::PhaseChanged(MatchPhase::Active));
        audio.present(&GameEvent::PhaseChanged(MatchPhase::Ended));
        assert_eq!(log.borrow().len(), 1);
    }
}
