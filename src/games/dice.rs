use rand::Rng;

pub const FACES: u8 = 6;

/// Roll one die; the face shown is also the score
pub fn roll(rng: &mut impl Rng) -> u8 {
    rng.gen_range(1..=FACES)
}
