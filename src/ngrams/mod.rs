// N-gram statistics: frequency counts and TF-IDF term importance, ranked
// per arity and reported per topic.

pub mod frequency;
pub mod table;
pub mod tfidf;
pub mod vectorizer;
