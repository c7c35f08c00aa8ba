//! Shared formatting types for DOCX (used in both reading and writing).

/// Underline styles for text.
///
/// `None` is Word's explicit "no underline" (`w:val="none"`), which is not
/// the same as an unset underline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnderlineStyle {
    None,
    Single,
    Words,
    Double,
    Thick,
    Dotted,
    Dashed,
    DotDash,
    DotDotDash,
    Wave,
}

impl UnderlineStyle {
    /// Parse a `w:u/@w:val` value. Unknown values read as `Single`.
    pub fn from_val(val: &[u8]) -> Self {
        match val {
            b"none" => Self::None,
            b"words" => Self::Words,
            b"double" => Self::Double,
            b"thick" => Self::Thick,
            b"dotted" => Self::Dotted,
            b"dash" => Self::Dashed,
            b"dotDash" => Self::DotDash,
            b"dotDotDash" => Self::DotDotDash,
            b"wave" => Self::Wave,
            _ => Self::Single,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Words => "words",
            Self::Double => "double",
            Self::Thick => "thick",
            Self::Dotted => "dotted",
            Self::Dashed => "dash",
            Self::DotDash => "dotDash",
            Self::DotDotDash => "dotDotDash",
            Self::Wave => "wave",
        }
    }

    /// Whether text with this style is drawn underlined.
    #[inline]
    pub fn is_underlined(&self) -> bool {
        !matches!(self, Self::None)
    }
}
