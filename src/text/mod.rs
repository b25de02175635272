// Text normalization: sentence/word segmentation, stop filtering, stemming
// and n-gram generation.

pub mod normalizer;
pub mod stemmer;
pub mod tokenizer;
