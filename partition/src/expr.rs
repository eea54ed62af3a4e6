use std::fmt;
use strum::{Display, EnumString};

// ----------------------------------------------------------------------------
// Keyword

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
enum Keyword {
    Before,
    After,
    If,
    Else,
}

// ----------------------------------------------------------------------------
// Address expression

/// Placement constraint of a single partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `0x8000`, `4096`
    Absolute(u64),
    /// `before <name>`
    Before(String),
    /// `after <name>`
    After(String),
    /// `if <name> <then> else <otherwise>`
    ///
    /// Branches are kept as raw text and parsed only once chosen.
    If {
        cond: String,
        then: String,
        otherwise: String,
    },
}

impl Expr {
    pub fn parse(text: &str) -> Option<Expr> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let (head, args) = words.split_first()?;

        match head.parse::<Keyword>() {
            Ok(Keyword::Before) => match args {
                [name] => Some(Expr::Before(name.to_string())),
                _ => None,
            },
            Ok(Keyword::After) => match args {
                [name] => Some(Expr::After(name.to_string())),
                _ => None,
            },
            Ok(Keyword::If) => {
                let (cond, rest) = args.split_first()?;
                // Branches are split at the first `else`
                let pos = rest
                    .iter()
                    .position(|w| matches!(w.parse(), Ok(Keyword::Else)))?;
                let (then, otherwise) = (&rest[..pos], &rest[pos + 1..]);
                if then.is_empty() || otherwise.is_empty() {
                    return None;
                }
                Some(Expr::If {
                    cond: cond.to_string(),
                    then: then.join(" "),
                    otherwise: otherwise.join(" "),
                })
            }
            Ok(Keyword::Else) => None,
            Err(_) => match args {
                [] => parse_with_prefix(head).map(Expr::Absolute),
                _ => None,
            },
        }
    }

    /// Partition names this expression refers to, before any branch is chosen
    pub fn refs(&self) -> Vec<&str> {
        match self {
            Expr::Absolute(_) => vec![],
            Expr::Before(name) | Expr::After(name) => vec![name.as_str()],
            Expr::If { cond, .. } => vec![cond.as_str()],
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Absolute(v) => write!(f, "0x{:X}", v),
            Expr::Before(name) => write!(f, "{} {}", Keyword::Before, name),
            Expr::After(name) => write!(f, "{} {}", Keyword::After, name),
            Expr::If {
                cond,
                then,
                otherwise,
            } => write!(
                f,
                "{} {} {} {} {}",
                Keyword::If,
                cond,
                then,
                Keyword::Else,
                otherwise
            ),
        }
    }
}

/// Integer literal with an optional `0x`, `0o` or `0b` prefix.
/// `_` may be used as a digit separator.
pub fn parse_with_prefix(s: &str) -> Option<u64> {
    let s = s.replace('_', "");
    let (radix, num) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        Some("0o" | "0O") => (8, &s[2..]),
        Some("0b" | "0B") => (2, &s[2..]),
        _ => (10, s.as_str()),
    };
    if num.is_empty() || !num.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(num, radix).ok()
}
