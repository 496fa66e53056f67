//! Engine and command configuration

use std::time::Duration;

/// Default inactivity window before a game expires
pub const DEFAULT_INACTIVITY_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Settings shared by every game in a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Time after the last accepted guess (or game start) before the game expires
    pub inactivity_window: Duration,
}

impl EngineConfig {
    #[must_use]
    pub const fn new(inactivity_window: Duration) -> Self {
        Self { inactivity_window }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INACTIVITY_WINDOW)
    }
}

/// How the start command turns its argument into a word length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPolicy {
    pub default: usize,
    pub min: usize,
    pub max: usize,
}

impl LengthPolicy {
    /// Create a policy
    ///
    /// # Panics
    /// Panics in debug mode if `min > max`
    #[must_use]
    pub const fn new(default: usize, min: usize, max: usize) -> Self {
        debug_assert!(min <= max, "LengthPolicy min must not exceed max");
        Self { default, min, max }
    }

    /// Resolve an optional start argument
    ///
    /// The argument is read like `parseInt`: leading whitespace, an optional
    /// sign, then the run of digits; anything after it is ignored. Arguments
    /// with no leading digits fall back to the default, numbers are clamped
    /// into `[min, max]`.
    ///
    /// # Examples
    /// ```
    /// use wordle_rooms::config::LengthPolicy;
    ///
    /// let policy = LengthPolicy::default();
    /// assert_eq!(policy.resolve(None), 5);
    /// assert_eq!(policy.resolve(Some("12")), 9);
    /// assert_eq!(policy.resolve(Some("7abc")), 7);
    /// assert_eq!(policy.resolve(Some("abc")), 5);
    /// ```
    #[must_use]
    pub fn resolve(&self, arg: Option<&str>) -> usize {
        arg.and_then(leading_integer)
            .map_or(self.default, |n| n.clamp(self.min, self.max))
    }
}

/// Leading integer of `raw`; negatives saturate to 0, overflow to `usize::MAX`
fn leading_integer(raw: &str) -> Option<usize> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    if negative {
        return Some(0);
    }

    Some(rest.as_bytes()[..digits].iter().fold(0usize, |acc, &d| {
        acc.saturating_mul(10).saturating_add(usize::from(d - b'0'))
    }))
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self::new(5, 3, 9)
    }
}
