// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// How an image is laid out inside the view before any user zoom or pan.
///
/// The layout produced by a fit mode is the *origin* transform: zoom level
/// `1.0` and zero pan are always measured relative to it.
/// See [`crate::origin_transform`] for the exact placement rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FitMode {
    /// Center the image at its intrinsic size, without scaling.
    #[default]
    Center,
    /// Scale uniformly so the image covers the whole view, then center it.
    CenterCrop,
    /// Center the image, scaling it down uniformly only when it does not fit.
    CenterInside,
    /// Scale uniformly so the image fits inside the view, then center it.
    FitCenter,
    /// Scale uniformly to fit and align with the view's top-left corner.
    FitStart,
    /// Scale uniformly to fit and align with the view's bottom-right corner.
    FitEnd,
    /// Stretch each axis independently so the image fills the view exactly.
    FitXy,
    /// Leave the image untransformed at the view origin.
    Identity,
}

/// How a zoom or pan limit is enforced.
///
/// Zoom and pan each carry their own policy; see [`crate::LimitConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LimitPolicy {
    /// Limits are never enforced.
    Unrestricted,
    /// Motion stops at the limit; any motion past it is dropped.
    Clamped,
    /// Live gestures may overrun the limit and are animated back once they end.
    ///
    /// Programmatic operations are clamped as with [`LimitPolicy::Clamped`].
    #[default]
    SpringBack,
}

impl LimitPolicy {
    /// Legacy flag: spring back after overrunning a limit.
    pub const SPRING_BACK: u32 = 1;
    /// Legacy flag: enforce the limit.
    pub const LIMIT: u32 = 2;
    /// Legacy flag: do not enforce the limit.
    pub const NO_LIMIT: u32 = 4;

    /// Decodes a bit-or combination of the legacy flags.
    ///
    /// Exactly one of [`LimitPolicy::LIMIT`] and [`LimitPolicy::NO_LIMIT`] must be
    /// set. [`LimitPolicy::SPRING_BACK`] only has an effect together with `LIMIT`.
    ///
    /// ```
    /// use understory_view2d::LimitPolicy;
    ///
    /// assert_eq!(LimitPolicy::from_flags(2), Ok(LimitPolicy::Clamped));
    /// assert_eq!(LimitPolicy::from_flags(3), Ok(LimitPolicy::SpringBack));
    /// assert_eq!(LimitPolicy::from_flags(5), Ok(LimitPolicy::Unrestricted));
    /// assert!(LimitPolicy::from_flags(6).is_err());
    /// ```
    pub fn from_flags(flags: u32) -> Result<Self, PolicyFlagsError> {
        match flags {
            0 | 1 => Err(PolicyFlagsError {
                flags,
                kind: PolicyFlagsErrorKind::MissingLimitFlag,
            }),
            2 => Ok(Self::Clamped),
            3 => Ok(Self::SpringBack),
            4 | 5 => Ok(Self::Unrestricted),
            _ => Err(PolicyFlagsError {
                flags,
                kind: PolicyFlagsErrorKind::ConflictingLimitFlags,
            }),
        }
    }

    /// Returns the canonical flag encoding of this policy.
    #[must_use]
    pub const fn to_flags(self) -> u32 {
        match self {
            Self::Unrestricted => Self::NO_LIMIT,
            Self::Clamped => Self::LIMIT,
            Self::SpringBack => Self::LIMIT | Self::SPRING_BACK,
        }
    }

    /// Whether live gesture motion is stopped at the limit.
    #[must_use]
    pub const fn clamps_live(self) -> bool {
        matches!(self, Self::Clamped)
    }

    /// Whether programmatic operations are stopped at the limit.
    #[must_use]
    pub const fn clamps_programmatic(self) -> bool {
        !matches!(self, Self::Unrestricted)
    }
}

impl TryFrom<u32> for LimitPolicy {
    type Error = PolicyFlagsError;

    fn try_from(flags: u32) -> Result<Self, Self::Error> {
        Self::from_flags(flags)
    }
}

/// Error returned when decoding an invalid legacy policy flag combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicyFlagsError {
    /// The rejected flag value.
    pub flags: u32,
    /// Why the value was rejected.
    pub kind: PolicyFlagsErrorKind,
}

/// The reason a [`PolicyFlagsError`] was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyFlagsErrorKind {
    /// Neither `LIMIT` nor `NO_LIMIT` was set.
    MissingLimitFlag,
    /// `LIMIT` and `NO_LIMIT` were both set, or unknown bits were present.
    ConflictingLimitFlags,
}

impl fmt::Display for PolicyFlagsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PolicyFlagsErrorKind::MissingLimitFlag => write!(
                f,
                "policy flags {:#x}: either LIMIT or NO_LIMIT must be selected",
                self.flags
            ),
            PolicyFlagsErrorKind::ConflictingLimitFlags => write!(
                f,
                "policy flags {:#x}: LIMIT and NO_LIMIT cannot be selected together",
                self.flags
            ),
        }
    }
}

impl core::error::Error for PolicyFlagsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_decode_like_the_legacy_setter() {
        assert_eq!(LimitPolicy::from_flags(2), Ok(LimitPolicy::Clamped));
        assert_eq!(LimitPolicy::from_flags(3), Ok(LimitPolicy::SpringBack));
        assert_eq!(LimitPolicy::from_flags(4), Ok(LimitPolicy::Unrestricted));
        assert_eq!(LimitPolicy::from_flags(5), Ok(LimitPolicy::Unrestricted));
    }

    #[test]
    fn invalid_flags_report_their_kind() {
        let err = LimitPolicy::from_flags(1).unwrap_err();
        assert_eq!(err.kind, PolicyFlagsErrorKind::MissingLimitFlag);
        let err = LimitPolicy::try_from(6).unwrap_err();
        assert_eq!(err.kind, PolicyFlagsErrorKind::ConflictingLimitFlags);
        assert_eq!(err.flags, 6);
    }

    #[test]
    fn canonical_flags_round_trip() {
        for policy in [
            LimitPolicy::Unrestricted,
            LimitPolicy::Clamped,
            LimitPolicy::SpringBack,
        ] {
            assert_eq!(LimitPolicy::from_flags(policy.to_flags()), Ok(policy));
        }
    }

    #[test]
    fn policies_choose_where_clamping_applies() {
        assert!(LimitPolicy::Clamped.clamps_live());
        assert!(!LimitPolicy::SpringBack.clamps_live());
        assert!(!LimitPolicy::Unrestricted.clamps_live());

        assert!(LimitPolicy::Clamped.clamps_programmatic());
        assert!(LimitPolicy::SpringBack.clamps_programmatic());
        assert!(!LimitPolicy::Unrestricted.clamps_programmatic());
    }
}
