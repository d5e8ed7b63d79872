use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelError {
    #[error("color {0:?} is not a #RGB or #RRGGBB hex code")]
    MalformedColor(String),
    #[error("owner must not be empty")]
    EmptyOwner,
}

/// Coordinate pair, the unique key of a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelLoc {
    pub x: i64,
    pub y: i64,
}

impl std::fmt::Display for PixelLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A `#RGB` or `#RRGGBB` color code, kept in the spelling it was given.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(raw: impl Into<String>) -> Result<Self, PixelError> {
        let raw = raw.into();
        let valid = match raw.strip_prefix('#') {
            Some(digits) => {
                matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
            }
            None => false,
        };
        if valid {
            Ok(Self(raw))
        } else {
            Err(PixelError::MalformedColor(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of the user claiming a pixel. Never empty, never verified.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn new(name: impl Into<String>) -> Result<Self, PixelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PixelError::EmptyOwner);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixel {
    pub x: i64,
    pub y: i64,
    pub color: HexColor,
    pub owner: Owner,
}

impl Pixel {
    pub fn new(x: i64, y: i64, color: HexColor, owner: Owner) -> Self {
        Self { x, y, color, owner }
    }

    pub fn loc(&self) -> PixelLoc {
        PixelLoc {
            x: self.x,
            y: self.y,
        }
    }
}

/// Result of an upsert: whether the coordinate pair was claimed for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Created(Pixel),
    Updated(Pixel),
}

impl Upsert {
    pub fn pixel(&self) -> &Pixel {
        match self {
            Upsert::Created(pixel) | Upsert::Updated(pixel) => pixel,
        }
    }

    pub fn into_pixel(self) -> Pixel {
        match self {
            Upsert::Created(pixel) | Upsert::Updated(pixel) => pixel,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    #[serde(rename = "user")]
    pub owner: Owner,
    pub pixels: usize,
}
