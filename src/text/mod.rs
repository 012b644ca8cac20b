// Text preprocessing: turns raw tweet text into the token form the
// vectorizer was trained on.

pub mod normalize;
pub mod porter;
