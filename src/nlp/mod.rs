//! Text analysis routines applied to stored documents.

pub mod classifier;
pub mod ner;
pub mod sentiment;
pub mod tokens;
pub mod train;
pub mod vectorizer;
