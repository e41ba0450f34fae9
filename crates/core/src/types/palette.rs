//! Fixed color palette offered on the product form.

use serde::Serialize;

use super::list::DelimitedList;

/// A named color swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Swatch {
    pub name: &'static str,
    pub hex: &'static str,
}

/// The sixteen swatches, in display order.
pub const PALETTE: [Swatch; 16] = [
    Swatch { name: "Red", hex: "#F44336" },
    Swatch { name: "Green", hex: "#4CAF50" },
    Swatch { name: "Blue", hex: "#2196F3" },
    Swatch { name: "White", hex: "#FFFFFF" },
    Swatch { name: "Black", hex: "#000000" },
    Swatch { name: "Purple", hex: "#9C27B0" },
    Swatch { name: "Orange", hex: "#FF9800" },
    Swatch { name: "Indigo", hex: "#3F51B5" },
    Swatch { name: "Teal", hex: "#009688" },
    Swatch { name: "Grey", hex: "#9E9E9E" },
    Swatch { name: "Amber", hex: "#FFC107" },
    Swatch { name: "Cyan", hex: "#00BCD4" },
    Swatch { name: "Brown", hex: "#795548" },
    Swatch { name: "Lime", hex: "#CDDC39" },
    Swatch { name: "Pink", hex: "#E91E63" },
    Swatch { name: "Yellow", hex: "#FFEB3B" },
];

/// Position of a swatch in [`PALETTE`], or `None` for names outside it.
#[must_use]
pub fn palette_index(name: &str) -> Option<usize> {
    PALETTE.iter().position(|swatch| swatch.name == name)
}

/// Look up a swatch by exact name.
#[must_use]
pub fn swatch(name: &str) -> Option<&'static Swatch> {
    PALETTE.iter().find(|swatch| swatch.name == name)
}

/// Selected product colors with set semantics over an ordered list.
///
/// Names outside the palette (legacy rows) are kept where they are and
/// never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSelection(DelimitedList);

impl ColorSelection {
    #[must_use]
    pub const fn new(list: DelimitedList) -> Self {
        Self(list)
    }

    #[must_use]
    pub const fn as_list(&self) -> &DelimitedList {
        &self.0
    }

    #[must_use]
    pub fn into_list(self) -> DelimitedList {
        self.0
    }

    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Toggle a swatch on or off. Returns whether it is now selected.
    ///
    /// A swatch being switched on is inserted before the first selected
    /// palette color that comes after it, so toggling twice is a no-op for
    /// any list already in palette order.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.0.remove(name) {
            return false;
        }

        let position = palette_index(name).map_or(self.0.len(), |rank| {
            self.0
                .iter()
                .position(|existing| palette_index(existing).is_some_and(|other| other > rank))
                .unwrap_or(self.0.len())
        });
        self.0.insert_unique(position, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(stored: &str) -> ColorSelection {
        ColorSelection::new(DelimitedList::parse(stored))
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut colors = selection("Red");
        assert!(colors.toggle("Blue"));
        assert_eq!(colors.as_list().join(), "Red, Blue");
        assert!(!colors.toggle("Red"));
        assert_eq!(colors.as_list().join(), "Blue");
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        for original in ["", "Red", "Red, Blue", "Green, Black, Pink", "Red, Teal, Yellow"] {
            for swatch in PALETTE {
                let mut colors = selection(original);
                colors.toggle(swatch.name);
                colors.toggle(swatch.name);
                assert_eq!(colors.as_list().join(), original, "swatch {}", swatch.name);
            }
        }
    }

    #[test]
    fn test_legacy_names_stay_in_place() {
        let mut colors = selection("crimson, Blue");
        colors.toggle("Red");
        assert_eq!(colors.as_list().join(), "crimson, Red, Blue");
    }

    #[test]
    fn test_swatch_lookup() {
        assert_eq!(swatch("Teal").map(|s| s.hex), Some("#009688"));
        assert!(swatch("teal").is_none());
    }
}
