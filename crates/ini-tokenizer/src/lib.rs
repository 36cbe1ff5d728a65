//! A tokenizer for inheriting INI documents

mod mark;
pub use mark::Mark;

mod error;
pub use error::{Error, ErrorKind};

mod token;
pub use token::{ScalarStyle, Token, TokenKind};

mod tokenizer;
pub use tokenizer::{Scan, Tokenizer};
