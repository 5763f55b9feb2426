use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Marketing channel a piece of copy can be adapted to.
///
/// Parsing is case-insensitive; the canonical form is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesChannel {
    Instagram,
    Facebook,
    Tiktok,
    Whatsapp,
    Email,
    Amazon,
    Landing,
}

impl SalesChannel {
    pub const ALL: [SalesChannel; 7] = [
        SalesChannel::Instagram,
        SalesChannel::Facebook,
        SalesChannel::Tiktok,
        SalesChannel::Whatsapp,
        SalesChannel::Email,
        SalesChannel::Amazon,
        SalesChannel::Landing,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SalesChannel::Instagram => "instagram",
            SalesChannel::Facebook => "facebook",
            SalesChannel::Tiktok => "tiktok",
            SalesChannel::Whatsapp => "whatsapp",
            SalesChannel::Email => "email",
            SalesChannel::Amazon => "amazon",
            SalesChannel::Landing => "landing",
        }
    }

    /// Human-facing channel name used inside prompts.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            SalesChannel::Instagram => "Instagram",
            SalesChannel::Facebook => "Facebook",
            SalesChannel::Tiktok => "TikTok",
            SalesChannel::Whatsapp => "WhatsApp",
            SalesChannel::Email => "Email",
            SalesChannel::Amazon => "Amazon",
            SalesChannel::Landing => "Landing Page",
        }
    }
}

impl fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesChannel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        SalesChannel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == key)
            .ok_or_else(|| CoreError::UnsupportedChannel(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("WhatsApp".parse::<SalesChannel>(), Ok(SalesChannel::Whatsapp));
        assert_eq!("LANDING".parse::<SalesChannel>(), Ok(SalesChannel::Landing));
        assert_eq!("tiktok".parse::<SalesChannel>(), Ok(SalesChannel::Tiktok));
    }

    #[test]
    fn every_channel_round_trips_through_its_name() {
        for channel in SalesChannel::ALL {
            assert_eq!(channel.as_str().parse::<SalesChannel>(), Ok(channel));
        }
    }

    #[test]
    fn unknown_channel_is_rejected() {
        assert!(matches!(
            "myspace".parse::<SalesChannel>(),
            Err(CoreError::UnsupportedChannel(ref c)) if c == "myspace"
        ));
    }
}
