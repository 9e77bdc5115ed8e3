use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const DEFAULT_WORDS: usize = 10;
pub const DEFAULT_SEED_SPACE: u64 = 100;

const VOCABULARY: &[&str] = &[
    "alias", "consequatur", "aut", "perferendis", "sit", "voluptatem", "accusantium", "doloremque",
    "aperiam", "eaque", "ipsa", "quae", "ab", "illo", "inventore", "veritatis", "et", "quasi",
    "architecto", "beatae", "vitae", "dicta", "sunt", "explicabo", "aspernatur", "odit", "fugit",
    "sed", "quia", "consequuntur", "magni", "dolores", "eos", "qui", "ratione", "sequi",
    "nesciunt", "neque", "dolorem", "ipsum", "dolor", "amet", "consectetur", "adipisci", "velit",
    "numquam", "eius", "modi", "tempora", "incidunt", "ut", "labore", "dolore", "magnam",
    "aliquam", "quaerat", "enim", "ad", "minima", "veniam", "quis", "nostrum", "exercitationem",
    "ullam", "corporis", "nemo", "ipsam", "voluptas", "suscipit", "laboriosam", "nisi", "aliquid",
    "ex", "ea", "commodi", "autem", "vel", "eum", "iure", "reprehenderit", "in", "voluptate",
    "esse", "quam", "nihil", "molestiae", "illum", "fugiat", "quo", "porro", "nulla",
    "pariatur", "at", "vero", "accusamus", "officiis", "debitis", "rerum", "necessitatibus",
    "saepe", "eveniet", "voluptates", "repudiandae", "recusandae", "itaque", "earum", "hic",
    "tenetur", "sapiente", "delectus", "reiciendis", "maiores", "doloribus", "asperiores",
    "repellat",
];

/// Builds the same sentence for the same seed.
pub fn sentence_for_seed(seed: u64, words: usize) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::new();
    for i in 0..words {
        let word = VOCABULARY.choose(&mut rng).copied().unwrap_or("lorem");
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push(' ');
            out.push_str(word);
        }
    }
    out.push('.');
    out
}

/// Fake sentences drawn from a bounded set of seeds, so the load is
/// random per call but reproducible across runs.
#[derive(Debug, Clone)]
pub struct SentenceGenerator {
    words: usize,
    seed_space: u64,
}

impl SentenceGenerator {
    pub fn new(words: usize) -> Self {
        Self {
            words: words.max(1),
            seed_space: DEFAULT_SEED_SPACE,
        }
    }

    pub fn with_seed_space(mut self, seed_space: u64) -> Self {
        self.seed_space = seed_space.max(1);
        self
    }

    pub fn generate(&self) -> String {
        let seed = rand::rngs::OsRng.gen_range(0..self.seed_space);
        sentence_for_seed(seed, self.words)
    }
}

impl Default for SentenceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS)
    }
}
