//! Six-sided dice for combat resolution.
//!
//! [Rng] is the production source: SplitMix64, deterministic per seed, not
//! cryptographically secure. [ScriptedDice] and [CountingDice] exist so tests
//! can pin down exact roll sequences and assert how many rolls were consumed.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

pub const DIE_FACES: u8 = 6;

/// Source of independent d6 rolls. Every call returns a value in `1..=6`.
pub trait DiceSource {
    fn roll(&mut self) -> u8;
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    #[inline]
    fn roll(&mut self) -> u8 {
        (**self).roll()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Independent stream for worker `stream` of a run seeded with `seed`.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut mixer = Self::new(seed ^ stream.wrapping_mul(SPLITMIX64_M2));
        Self::new(mixer.next_u64())
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

impl DiceSource for Rng {
    #[inline]
    fn roll(&mut self) -> u8 {
        // Multiply-shift maps the full 64-bit range onto the faces without modulo skew.
        let face = (u128::from(self.next_u64()) * u128::from(DIE_FACES)) >> 64;
        face as u8 + 1
    }
}

/// Replays a fixed sequence of faces forever.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    cursor: usize,
}

impl ScriptedDice {
    /// Faces outside `1..=6` are clamped into range; an empty script behaves like `fixed(1)`.
    pub fn new(faces: impl Into<Vec<u8>>) -> Self {
        let mut faces: Vec<u8> = faces
            .into()
            .into_iter()
            .map(|face| face.clamp(1, DIE_FACES))
            .collect();
        if faces.is_empty() {
            faces.push(1);
        }
        Self { faces, cursor: 0 }
    }

    pub fn fixed(face: u8) -> Self {
        Self::new(vec![face])
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let face = self.faces[self.cursor];
        self.cursor = (self.cursor + 1) % self.faces.len();
        face
    }
}

/// Counts the rolls drawn from the wrapped source.
#[derive(Debug, Clone)]
pub struct CountingDice<D> {
    inner: D,
    rolls: u64,
}

impl<D: DiceSource> CountingDice<D> {
    pub fn new(inner: D) -> Self {
        Self { inner, rolls: 0 }
    }

    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: DiceSource> DiceSource for CountingDice<D> {
    fn roll(&mut self) -> u8 {
        self.rolls += 1;
        self.inner.roll()
    }
}
