//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Block destroyed - pitched by grid row
    BlockBreak { row: u32 },
    /// Ball launched from the paddle
    Launch,
    /// Ball dropped past the paddle
    BallLost,
    /// All blocks cleared
    GameWon,
    /// Last life lost
    GameLost,
}

impl SoundEffect {
    /// Map a simulation event to its sound, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BallLaunched => Some(SoundEffect::Launch),
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BlockDestroyed { row } => Some(SoundEffect::BlockBreak { row: *row }),
            GameEvent::BallLost => Some(SoundEffect::BallLost),
            GameEvent::GameWon => Some(SoundEffect::GameWon),
            GameEvent::GameLost => Some(SoundEffect::GameLost),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
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
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
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

    /// Get effective volume
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

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
            SoundEffect::WallHit => self.play_wall_hit(ctx, vol),
            SoundEffect::BlockBreak { row } => self.play_block_break(ctx, vol, row),
            SoundEffect::Launch => self.play_launch(ctx, vol),
            SoundEffect::BallLost => self.play_ball_lost(ctx, vol),
            SoundEffect::GameWon => self.play_game_won(ctx, vol),
            SoundEffect::GameLost => self.play_game_lost(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Paddle hit - solid thump
    fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 160.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(160.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Wall hit - short high ping
    fn play_wall_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 420.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Block break - bright pop, pitched higher for higher rows
    fn play_block_break(&self, ctx: &AudioContext, vol: f32, row: u32) {
        let t = ctx.current_time();
        // Top row rings highest
        let base = 880.0 - row as f32 * 90.0;

        if let Some((osc, gain)) = self.create_osc(ctx, base, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(base, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(base * 0.5, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }

        // Short noise-ish crack on top
        if let Some((osc, gain)) = self.create_osc(ctx, base * 3.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.06).ok();
        }
    }

    /// Launch - rising chirp
    fn play_launch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(660.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.22).ok();
    }

    /// Ball lost - falling tone
    fn play_ball_lost(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.45)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.55).ok();
    }

    /// Win - short ascending arpeggio
    fn play_game_won(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        for (i, freq) in [523.0_f32, 659.0, 784.0, 1047.0].iter().enumerate() {
            let start = t + i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }
    }

    /// Loss - two sagging low notes
    fn play_game_lost(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        for (i, freq) in [220.0_f32, 147.0].iter().enumerate() {
            let start = t + i as f64 * 0.3;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain().set_value_at_time(vol * 0.35, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.4)
                    .ok();
                osc.frequency().set_value_at_time(*freq, start).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(*freq * 0.8, start + 0.35)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.45).ok();
            }
        }
    }
}
