//! Named paper sizes and orientation handling
//!
//! All dimensions are in PostScript points (1/72 inch), the unit Chrome's
//! print API ultimately works in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Standard paper sizes understood by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    Letter,
    Legal,
    Tabloid,
    Ledger,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
}

impl PageSize {
    /// Every supported size, in table order
    pub const ALL: [PageSize; 11] = [
        PageSize::Letter,
        PageSize::Legal,
        PageSize::Tabloid,
        PageSize::Ledger,
        PageSize::A0,
        PageSize::A1,
        PageSize::A2,
        PageSize::A3,
        PageSize::A4,
        PageSize::A5,
        PageSize::A6,
    ];

    /// Lowercase key used in configuration
    pub fn key(self) -> &'static str {
        match self {
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
            PageSize::Tabloid => "tabloid",
            PageSize::Ledger => "ledger",
            PageSize::A0 => "a0",
            PageSize::A1 => "a1",
            PageSize::A2 => "a2",
            PageSize::A3 => "a3",
            PageSize::A4 => "a4",
            PageSize::A5 => "a5",
            PageSize::A6 => "a6",
        }
    }

    /// Portrait (width, height) in points
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            // ledger is tabloid stored sideways
            PageSize::Ledger => (1224.0, 792.0),
            PageSize::A0 => (2384.0, 3370.0),
            PageSize::A1 => (1684.0, 2384.0),
            PageSize::A2 => (1191.0, 1684.0),
            PageSize::A3 => (842.0, 1191.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::A5 => (420.0, 595.0),
            PageSize::A6 => (297.0, 420.0),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        PageSize::ALL
            .into_iter()
            .find(|size| size.key() == key)
            .ok_or_else(|| Error::invalid("page.size", s))
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn key(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(Error::invalid("page.orientation", s)),
        }
    }
}

/// A resolved page format in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width: f64,
    pub height: f64,
}

impl PageFormat {
    /// Format for a typed size and orientation; landscape swaps the pair.
    pub fn new(size: PageSize, orientation: Orientation) -> Self {
        let (width, height) = size.dimensions();
        match orientation {
            Orientation::Portrait => PageFormat { width, height },
            Orientation::Landscape => PageFormat {
                width: height,
                height: width,
            },
        }
    }

    /// Paper width in inches, as the DevTools protocol expects
    pub fn width_inches(&self) -> f64 {
        self.width / 72.0
    }

    /// Paper height in inches
    pub fn height_inches(&self) -> f64 {
        self.height / 72.0
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat::new(PageSize::A4, Orientation::Portrait)
    }
}

/// Resolve a size key and orientation string into a page format.
///
/// Both inputs are matched case-insensitively. An unknown size or an
/// orientation other than `portrait`/`landscape` fails with
/// [`Error::InvalidConfiguration`].
pub fn resolve(size: &str, orientation: &str) -> Result<PageFormat> {
    let size: PageSize = size.parse()?;
    let orientation: Orientation = orientation.parse()?;
    Ok(PageFormat::new(size, orientation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_size_resolves_to_table_values() {
        let expected = [
            ("letter", 612.0, 792.0),
            ("legal", 612.0, 1008.0),
            ("tabloid", 792.0, 1224.0),
            ("ledger", 1224.0, 792.0),
            ("a0", 2384.0, 3370.0),
            ("a1", 1684.0, 2384.0),
            ("a2", 1191.0, 1684.0),
            ("a3", 842.0, 1191.0),
            ("a4", 595.0, 842.0),
            ("a5", 420.0, 595.0),
            ("a6", 297.0, 420.0),
        ];
        for (key, width, height) in expected {
            let portrait = resolve(key, "portrait").unwrap();
            assert_eq!(portrait, PageFormat { width, height }, "{key}");
            let landscape = resolve(key, "landscape").unwrap();
            assert_eq!(landscape.width, portrait.height, "{key}");
            assert_eq!(landscape.height, portrait.width, "{key}");
        }
    }

    #[test]
    fn keys_are_case_insensitive() {
        assert_eq!(resolve("A4", "PORTRAIT").unwrap(), resolve("a4", "portrait").unwrap());
        assert_eq!(resolve("Legal", "Landscape").unwrap(), PageFormat { width: 1008.0, height: 612.0 });
    }

    #[test]
    fn unknown_size_is_rejected() {
        match resolve("bogus", "portrait") {
            Err(Error::InvalidConfiguration { field, value }) => {
                assert_eq!(field, "page.size");
                assert_eq!(value, "bogus");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn unknown_orientation_is_rejected() {
        match resolve("a4", "sideways") {
            Err(Error::InvalidConfiguration { field, value }) => {
                assert_eq!(field, "page.orientation");
                assert_eq!(value, "sideways");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for size in PageSize::ALL {
            assert_eq!(size.to_string().parse::<PageSize>().unwrap(), size);
        }
    }

    #[test]
    fn letter_is_eight_and_a_half_by_eleven_inches() {
        let f = resolve("letter", "portrait").unwrap();
        assert_eq!(f.width_inches(), 8.5);
        assert_eq!(f.height_inches(), 11.0);
    }
}
