use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

//------------------------------------------

/// Feature bits of the cluster an encoding is destined for.
///
/// Encoders that change their wire shape depending on what the peers
/// understand take one of these on every call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Features(u64);

// Nautilus reuses retired bit 21, so the incarnation bit is part of the mask.
const FEATURE_INCARNATION_2: u64 = 1 << 57;
const SERVER_NAUTILUS_BIT: u64 = 1 << 21;

impl Features {
    pub const NONE: Features = Features(0);
    pub const ALL: Features = Features(u64::MAX);
    pub const SERVER_NAUTILUS: Features = Features(SERVER_NAUTILUS_BIT | FEATURE_INCARNATION_2);

    pub const fn from_bits(bits: u64) -> Features {
        Features(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub const fn contains(&self, other: Features) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for Features {
    type Output = Features;

    fn bitor(self, rhs: Features) -> Features {
        Features(self.0 | rhs.0)
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseFeaturesError(String);

impl fmt::Display for ParseFeaturesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid feature mask '{}'", self.0)
    }
}

impl std::error::Error for ParseFeaturesError {}

impl FromStr for Features {
    type Err = ParseFeaturesError;

    fn from_str(s: &str) -> Result<Features, ParseFeaturesError> {
        let bad = || ParseFeaturesError(s.to_string());
        match s {
            "none" => Ok(Features::NONE),
            "all" => Ok(Features::ALL),
            "nautilus" => Ok(Features::SERVER_NAUTILUS),
            _ => {
                let bits = if let Some(hex) = s.strip_prefix("0x") {
                    u64::from_str_radix(hex, 16).map_err(|_| bad())?
                } else {
                    s.parse::<u64>().map_err(|_| bad())?
                };
                Ok(Features(bits))
            }
        }
    }
}

//------------------------------------------


//------------------------------------------
