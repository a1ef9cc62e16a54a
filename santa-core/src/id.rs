use rand::Rng;

pub const ID_LEN: usize = 9;
pub const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Short base-36 participant id. Collisions are possible and left to callers.
pub fn generate_id() -> String {
    generate_id_with(&mut rand::thread_rng())
}

pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
