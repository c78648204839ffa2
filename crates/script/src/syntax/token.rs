use std::fmt;

/// Lexical token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    Keyword(Keyword),
    Punct(Punct),
    Eof,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Function,
    Let,
    Const,
    Var,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,
    Throw,
    True,
    False,
    Null,
    Undefined,
    Typeof,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
pub enum Punct {
    #[strum(serialize = "(")]
    LParen,
    #[strum(serialize = ")")]
    RParen,
    #[strum(serialize = "{")]
    LBrace,
    #[strum(serialize = "}")]
    RBrace,
    #[strum(serialize = "[")]
    LBracket,
    #[strum(serialize = "]")]
    RBracket,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ";")]
    Semicolon,
    #[strum(serialize = ":")]
    Colon,
    #[strum(serialize = ".")]
    Dot,
    #[strum(serialize = "?")]
    Question,
    #[strum(serialize = "??")]
    QuestionQuestion,
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "%")]
    Percent,
    #[strum(serialize = "!")]
    Bang,
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "==")]
    EqEq,
    #[strum(serialize = "===")]
    EqEqEq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "!==")]
    NotEqEq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    LtEq,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    GtEq,
    #[strum(serialize = "&&")]
    AndAnd,
    #[strum(serialize = "||")]
    OrOr,
    #[strum(serialize = "+=")]
    PlusAssign,
    #[strum(serialize = "-=")]
    MinusAssign,
    #[strum(serialize = "*=")]
    StarAssign,
    #[strum(serialize = "/=")]
    SlashAssign,
    #[strum(serialize = "%=")]
    PercentAssign,
    #[strum(serialize = "++")]
    PlusPlus,
    #[strum(serialize = "--")]
    MinusMinus,
}

impl Punct {
    /// Longest-first so that `===` wins over `==` and `=`.
    pub(crate) const BY_LENGTH: &'static [(&'static str, Punct)] = &[
        ("===", Punct::EqEqEq),
        ("!==", Punct::NotEqEq),
        ("??", Punct::QuestionQuestion),
        ("==", Punct::EqEq),
        ("!=", Punct::NotEq),
        ("<=", Punct::LtEq),
        (">=", Punct::GtEq),
        ("&&", Punct::AndAnd),
        ("||", Punct::OrOr),
        ("+=", Punct::PlusAssign),
        ("-=", Punct::MinusAssign),
        ("*=", Punct::StarAssign),
        ("/=", Punct::SlashAssign),
        ("%=", Punct::PercentAssign),
        ("++", Punct::PlusPlus),
        ("--", Punct::MinusMinus),
        ("(", Punct::LParen),
        (")", Punct::RParen),
        ("{", Punct::LBrace),
        ("}", Punct::RBrace),
        ("[", Punct::LBracket),
        ("]", Punct::RBracket),
        (",", Punct::Comma),
        (";", Punct::Semicolon),
        (":", Punct::Colon),
        (".", Punct::Dot),
        ("?", Punct::Question),
        ("+", Punct::Plus),
        ("-", Punct::Minus),
        ("*", Punct::Star),
        ("/", Punct::Slash),
        ("%", Punct::Percent),
        ("!", Punct::Bang),
        ("=", Punct::Assign),
        ("<", Punct::Lt),
        (">", Punct::Gt),
    ];
}

/// A token with its source line and whether a line break preceded it.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub newline_before: bool,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Ident(name) => write!(f, "identifier `{name}`"),
            Self::Keyword(kw) => write!(f, "keyword `{}`", <&'static str>::from(*kw)),
            Self::Punct(p) => write!(f, "`{}`", <&'static str>::from(*p)),
            Self::Eof => f.write_str("end of input"),
        }
    }
}
