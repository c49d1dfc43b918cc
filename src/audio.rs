//! Sound effect identifiers
//!
//! Playback is the platform's problem; the core only names what should
//! play. Keys match the audio asset table the view layer loads.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bottle drop-in at round start
    Init,
    /// Charging squash (press held)
    Shrink,
    /// Looped tail once the squash bottoms out
    ShrinkEnd,
    /// Off-center landing on the next block
    Success,
    /// Center landing; the variant deepens with the combo, capped at 8
    Combo(u32),
    /// Missed everything
    Fall,
    /// Slid off a block edge
    FallFromBlock,
}

impl SoundEffect {
    /// Asset key for the platform's audio table.
    pub fn key(&self) -> String {
        match self {
            SoundEffect::Init => "init".to_string(),
            SoundEffect::Shrink => "shrink".to_string(),
            SoundEffect::ShrinkEnd => "shrink_end".to_string(),
            SoundEffect::Success => "success".to_string(),
            SoundEffect::Combo(n) => format!("combo{n}"),
            SoundEffect::Fall => "fall".to_string(),
            SoundEffect::FallFromBlock => "fall_from_block".to_string(),
        }
    }
}
