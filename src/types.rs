use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Png,
    Jpeg,
    Unknown,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpeg",
            Format::Unknown => "unknown",
        }
    }

    pub fn mime(&self) -> Option<&'static str> {
        match self {
            Format::Png => Some("image/png"),
            Format::Jpeg => Some("image/jpeg"),
            Format::Unknown => None,
        }
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, Format::Unknown)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Outcome of running the detectors over one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseResult {
    pub format: Format,
    pub dimensions: Option<Dimensions>,
}

impl ParseResult {
    pub const UNKNOWN: ParseResult = ParseResult {
        format: Format::Unknown,
        dimensions: None,
    };

    pub const fn matched(format: Format, dimensions: Dimensions) -> Self {
        Self {
            format,
            dimensions: Some(dimensions),
        }
    }
}

/// The externally visible record for one inspected buffer.
///
/// Serializes as `{"format", "width", "height", "size", "mime"}` with absent
/// values written as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionResult {
    pub format: Format,
    pub dimensions: Option<Dimensions>,
    pub size: u64,
    pub mime: Option<String>,
}

impl InspectionResult {
    pub fn from_parse(parsed: ParseResult, size: u64) -> Self {
        Self {
            format: parsed.format,
            dimensions: parsed.dimensions,
            size,
            mime: parsed.format.mime().map(str::to_owned),
        }
    }

    pub fn width(&self) -> Option<u32> {
        self.dimensions.map(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions.map(|d| d.height)
    }
}

impl Serialize for InspectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InspectionResult", 5)?;
        state.serialize_field("format", &self.format)?;
        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("mime", &self.mime)?;
        state.end()
    }
}
