// genlex: lexical and sentiment analytics for topic-organized generated text
//
// This is the library root. Each module corresponds to one stage of the
// analysis: input validation, normalization, n-gram statistics, sentiment,
// and report output.

pub mod config;
pub mod corpus;
pub mod error;
pub mod ngrams;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod text;
