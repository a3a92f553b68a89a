//! Signal-strength bands and the encouragement quotes shown with them.
//!
//! The mapping is inverted on purpose: a weak signal gets the strongest
//! encouragement, a strong signal gets a gentler one.

use rand::seq::SliceRandom;

/// Quotes shown when the signal is weak (quality 0-30%).
const STRONG_ENCOURAGEMENT: &[&str] = &[
    "The struggle you're in today is developing the strength you need for tomorrow.",
    "Tough times never last, but tough people do.",
    "When everything seems to be against you, remember that the airplane takes off against the wind.",
];

/// Quotes shown when the signal is middling (quality 31-70%).
const MEDIUM_ENCOURAGEMENT: &[&str] = &[
    "The future belongs to those who believe in the beauty of their dreams.",
    "Keep going. Everything you need will come to you at the perfect time.",
];

/// Quotes shown when the signal is strong (quality 71-100%).
const LOW_ENCOURAGEMENT: &[&str] = &[
    "A little progress each day adds up to big results.",
    "Enjoy the good connection while it lasts.",
];

/// Shown when the signal cannot be queried at all.
const FALLBACK_QUOTE: &str = "Could not fetch a quote. Stay strong!";

/// Strength band of a signal quality percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalBand {
    /// Quality 0-30%.
    Weak,
    /// Quality 31-70%.
    Medium,
    /// Quality 71-100%.
    Strong,
}

impl SignalBand {
    /// Classify a quality percentage.
    #[must_use]
    pub fn from_quality(quality: u8) -> Self {
        if quality <= 30 {
            Self::Weak
        } else if quality <= 70 {
            Self::Medium
        } else {
            Self::Strong
        }
    }

    fn quote_pool(self) -> &'static [&'static str] {
        match self {
            Self::Weak => STRONG_ENCOURAGEMENT,
            Self::Medium => MEDIUM_ENCOURAGEMENT,
            Self::Strong => LOW_ENCOURAGEMENT,
        }
    }
}

impl std::fmt::Display for SignalBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Medium => write!(f, "medium"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

/// Pick a random encouragement quote for the given signal quality.
#[must_use]
pub fn encouragement(quality: u8) -> &'static str {
    let pool = SignalBand::from_quality(quality).quote_pool();
    pool.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_QUOTE)
}
