mod build_radical_index;
mod generate_mnemonic;
mod lookup_kanji;
mod retrieve_radicals;

pub use build_radical_index::*;
pub use generate_mnemonic::*;
pub use lookup_kanji::*;
pub use retrieve_radicals::*;
