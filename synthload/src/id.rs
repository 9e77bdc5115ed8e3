use rand::Rng;

pub const ROW_ID_LEN: usize = 10;

// URL-safe alphabet, 64 symbols
const ALPHABET: &[u8; 64] = b"_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random URL-safe identifier of `len` characters drawn from the OS RNG.
pub fn new_id(len: usize) -> String {
    let mut rng = rand::rngs::OsRng;
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn new_row_id() -> String {
    new_id(ROW_ID_LEN)
}
