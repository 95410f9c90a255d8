use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::{Address, Word};
use crate::selector::Selector;
use crate::slot::Slot;

/// A typed call argument or return value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Token {
    Address(Address),
    Uint(u128),
    Int(i128),
    Bool(bool),
    Word(Word),
    Slot(Slot),
    Str(String),
}

impl Token {
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::Word(_) => "word",
            Token::Slot(_) => "slot",
            Token::Str(_) => "string",
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Token::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Token::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Token::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_word(&self) -> Option<Word> {
        match self {
            Token::Word(w) => Some(*w),
            _ => None,
        }
    }

    /// Slots accept both structured slots and plain indices.
    pub fn as_slot(&self) -> Option<Slot> {
        match self {
            Token::Slot(s) => Some(*s),
            Token::Uint(v) => u64::try_from(*v).ok().map(Slot::Index),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(a) => write!(f, "{}", a),
            Token::Uint(v) => write!(f, "{}", v),
            Token::Int(v) => write!(f, "{}", v),
            Token::Bool(v) => write!(f, "{}", v),
            Token::Word(w) => write!(f, "{}", w),
            Token::Slot(s) => write!(f, "{}", s),
            Token::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<Address> for Token {
    fn from(a: Address) -> Self {
        Token::Address(a)
    }
}

impl From<u64> for Token {
    fn from(v: u64) -> Self {
        Token::Uint(v as u128)
    }
}

impl From<u128> for Token {
    fn from(v: u128) -> Self {
        Token::Uint(v)
    }
}

impl From<bool> for Token {
    fn from(v: bool) -> Self {
        Token::Bool(v)
    }
}

impl From<Word> for Token {
    fn from(w: Word) -> Self {
        Token::Word(w)
    }
}

impl From<Slot> for Token {
    fn from(s: Slot) -> Self {
        Token::Slot(s)
    }
}

/// A call routed through a dispatcher: a selector plus its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallData {
    pub selector: Selector,
    pub args: Vec<Token>,
}

impl CallData {
    pub fn new(signature: &str, args: Vec<Token>) -> Self {
        Self {
            selector: Selector::from_signature(signature),
            args,
        }
    }

    /// A call with no arguments.
    pub fn bare(signature: &str) -> Self {
        Self::new(signature, Vec::new())
    }

    pub fn from_selector(selector: Selector, args: Vec<Token>) -> Self {
        Self { selector, args }
    }
}
