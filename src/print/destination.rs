//! Destination mask selecting where a message is written

use std::ops::{BitOr, BitOrAssign};

const CONSOLE_BIT: u8 = 1;
const FILE_BIT: u8 = 2;
const DISABLED_BITS: u8 = 4;

/// Bit mask of message destinations
///
/// [`Destination::DISABLED`] is a sentinel rather than an empty mask: a sink
/// created with it ignores appends and writes nothing, so call sites can keep
/// building messages while output is switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination(u8);

impl Destination {
    /// Standard output
    pub const CONSOLE: Self = Self(CONSOLE_BIT);
    /// The active log file
    pub const FILE: Self = Self(FILE_BIT);
    /// Standard output and the active log file
    pub const CONSOLE_AND_FILE: Self = Self(CONSOLE_BIT | FILE_BIT);
    /// Suppress all output
    pub const DISABLED: Self = Self(DISABLED_BITS);

    /// Raw bit value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether messages go to the console
    pub const fn writes_console(self) -> bool {
        self.0 & CONSOLE_BIT != 0
    }

    /// Whether messages go to the log file
    pub const fn writes_file(self) -> bool {
        self.0 & FILE_BIT != 0
    }

    /// Whether this is exactly the disabled sentinel
    pub const fn is_disabled(self) -> bool {
        self.0 == DISABLED_BITS
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::CONSOLE
    }
}

impl BitOr for Destination {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Destination {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
