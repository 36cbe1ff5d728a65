#![doc = include_str!("../README.md")]

pub use ini_tokenizer::{Error, ErrorKind, Mark, Scan, ScalarStyle, Token, TokenKind, Tokenizer};

mod event;
pub use event::{DEFAULT_SECTION, Event, EventKind, Tag};

mod resolve;
pub use resolve::classify;

mod callback;
pub use callback::ParseCallback;

mod source;
pub use source::{TokenList, TokenSource};

mod parser;
pub use parser::{Parser, ParserState};
