/// Mulberry32: small 32-bit PRNG, reproducible across platforms.
///
/// Passed explicitly to whatever needs randomness; there is no shared state.
#[derive(Clone, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from the sum of a song id's UTF-16 code units.
    pub fn from_song_id(song_id: &str) -> Self {
        Self::new(song_seed(song_id))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

pub fn song_seed(song_id: &str) -> u32 {
    song_id
        .encode_utf16()
        .fold(0u32, |acc, unit| acc.wrapping_add(unit as u32))
}
