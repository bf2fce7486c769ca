//! CallDuration - whole seconds, rendered as "4m 12s"

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallDuration(u32);

impl CallDuration {
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Lenient parse of provider values; anything unparseable is zero
    pub fn from_provider(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(Self)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for CallDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m {}s", self.0 / 60, self.0 % 60)
    }
}

impl std::str::FromStr for CallDuration {
    type Err = String;

    /// Accepts either plain seconds ("252") or the display form ("4m 12s")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(secs) = s.parse::<u32>() {
            return Ok(Self(secs));
        }

        let mut total = 0u32;
        let mut seen = false;
        for part in s.split_whitespace() {
            let (number, multiplier) = if let Some(m) = part.strip_suffix('m') {
                (m, 60)
            } else if let Some(sec) = part.strip_suffix('s') {
                (sec, 1)
            } else {
                return Err(format!("Invalid duration: {}", s));
            };
            let value: u32 = number
                .parse()
                .map_err(|_| format!("Invalid duration: {}", s))?;
            total = value
                .checked_mul(multiplier)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(|| format!("Duration out of range: {}", s))?;
            seen = true;
        }

        if seen {
            Ok(Self(total))
        } else {
            Err(format!("Invalid duration: {}", s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CallDuration::from_secs(252).to_string(), "4m 12s");
        assert_eq!(CallDuration::from_secs(0).to_string(), "0m 0s");
        assert_eq!(CallDuration::from_secs(59).to_string(), "0m 59s");
    }

    #[test]
    fn test_parse_display_form() {
        assert_eq!("4m 12s".parse::<CallDuration>().unwrap().as_secs(), 252);
        assert_eq!("8m 32s".parse::<CallDuration>().unwrap().as_secs(), 512);
        assert_eq!("0m 0s".parse::<CallDuration>().unwrap().as_secs(), 0);
        assert_eq!("165".parse::<CallDuration>().unwrap().as_secs(), 165);
        assert!("soon".parse::<CallDuration>().is_err());
        assert!("".parse::<CallDuration>().is_err());
    }

    #[test]
    fn test_from_provider_is_lenient() {
        assert_eq!(CallDuration::from_provider(Some("42")).as_secs(), 42);
        assert_eq!(CallDuration::from_provider(Some("NaN")).as_secs(), 0);
        assert_eq!(CallDuration::from_provider(None).as_secs(), 0);
    }
}
