/// A single sound event at a (tick, layer) position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Note {
    /// Index into the instrument table of whatever plays the song
    pub instrument: u8,

    /// The key, where 0 is A0 and 87 is C8 on a piano keyboard
    pub key: i8,

    /// Volume in percent
    pub velocity: u8,

    /// Fine pitch offset in cents
    pub pitch: i16,
}

impl Note {
    /// The velocity of notes in formats that don't store one
    pub const DEFAULT_VELOCITY: u8 = 100;

    /// The fine pitch of notes in formats that don't store one
    pub const DEFAULT_PITCH: i16 = 0;

    pub const fn new(instrument: u8, key: i8, velocity: u8, pitch: i16) -> Self {
        Self {
            instrument,
            key,
            velocity,
            pitch,
        }
    }
}
