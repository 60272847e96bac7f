use std::fmt;
use std::str::FromStr;

/// Audience bucket a scripted broadcast is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Direct/private dispatch ("pv" on the wire)
    Private,
    Girl,
}

impl FromStr for Audience {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pv" => Ok(Audience::Private),
            "girl" => Ok(Audience::Girl),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::Private => write!(f, "pv"),
            Audience::Girl => write!(f, "girl"),
        }
    }
}

/// Scripted broadcast variant. The body table currently has a single
/// generic bucket per variant; no per-audience bodies exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptVariant {
    Msg1,
    Msg2,
    Msg3,
}

impl ScriptVariant {
    pub fn body(&self) -> &'static str {
        match self {
            ScriptVariant::Msg1 => "Primeira",
            ScriptVariant::Msg2 => "Segunda",
            ScriptVariant::Msg3 => "Terceira",
        }
    }
}

impl FromStr for ScriptVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "msg1" => Ok(ScriptVariant::Msg1),
            "msg2" => Ok(ScriptVariant::Msg2),
            "msg3" => Ok(ScriptVariant::Msg3),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ScriptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptVariant::Msg1 => write!(f, "msg1"),
            ScriptVariant::Msg2 => write!(f, "msg2"),
            ScriptVariant::Msg3 => write!(f, "msg3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_bodies() {
        assert_eq!(ScriptVariant::Msg1.body(), "Primeira");
        assert_eq!(ScriptVariant::Msg2.body(), "Segunda");
        assert_eq!(ScriptVariant::Msg3.body(), "Terceira");
    }

    #[test]
    fn wire_tokens_round_trip() {
        assert_eq!("msg1".parse::<ScriptVariant>(), Ok(ScriptVariant::Msg1));
        assert_eq!("pv".parse::<Audience>(), Ok(Audience::Private));
        assert_eq!("girl".parse::<Audience>(), Ok(Audience::Girl));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert!("msg4".parse::<ScriptVariant>().is_err());
        assert!("en".parse::<ScriptVariant>().is_err());
        assert!("group".parse::<Audience>().is_err());
    }
}
