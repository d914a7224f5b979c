use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How one-element sets are written to the wire.
///
/// The protocol allows a set holding exactly one element to be sent as the
/// bare element. `Collapse` uses that short form wherever the column allows
/// it; `Tagged` always writes `["set", [..]]`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SetEncoding {
    /// Write singleton sets as their bare element.
    #[default]
    Collapse,
    /// Always write the two-part tagged form.
    Tagged,
}

impl SetEncoding {
    /// Returns the stricter of two policies.
    ///
    /// `Tagged` wins: a column or caller that forbids collapsing cannot be
    /// overridden by a more permissive setting.
    #[must_use]
    pub const fn restrict(self, other: Self) -> Self {
        match (self, other) {
            (Self::Collapse, Self::Collapse) => Self::Collapse,
            _ => Self::Tagged,
        }
    }
}

/// Errors encountered while parsing a [`SetEncoding`] from text.
pub type SetEncodingParseError = strum::ParseError;
