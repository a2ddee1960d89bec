mod embedding;
mod kanji_record;
mod mnemonic;
mod radical_document;
mod search_result;

pub use embedding::*;
pub use kanji_record::*;
pub use mnemonic::*;
pub use radical_document::*;
pub use search_result::*;
