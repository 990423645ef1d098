//! Production names for palette colors.

use std::collections::BTreeMap;

/// Built-in known colors, keyed by normalized hex.
const DEFAULT_KNOWN_COLORS: &[(&str, &str)] = &[("FF0000", "PANTONE 186 C"), ("00FF00", "PANTONE 802 C")];

/// Normalize a hex color string to `RRGGBB`, uppercase, no `#`.
///
/// Three-digit shorthand is expanded. Anything else is only trimmed and
/// uppercased, so lookups of malformed input simply miss.
pub fn normalize_hex(hex: &str) -> String {
    let digits = hex.trim().trim_start_matches('#').to_ascii_uppercase();
    if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits
    }
}

/// Normalized hex to production ink name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownColorTable {
    entries: BTreeMap<String, String>,
}

impl Default for KnownColorTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.extend(DEFAULT_KNOWN_COLORS.iter().copied());
        table
    }
}

impl KnownColorTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an entry. The key is normalized first.
    pub fn insert(&mut self, hex: &str, name: impl Into<String>) {
        self.entries.insert(normalize_hex(hex), name.into());
    }

    /// Merge entries, later ones winning.
    pub fn extend<K, V, I>(&mut self, entries: I)
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (hex, name) in entries {
            self.insert(hex.as_ref(), name);
        }
    }

    pub fn get(&self, hex: &str) -> Option<&str> {
        self.entries.get(&normalize_hex(hex)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in hex order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Maps a palette color to the name printed on its separation.
#[derive(Debug, Clone)]
pub struct ColorNameResolver {
    table: KnownColorTable,
    use_known_colors: bool,
}

impl Default for ColorNameResolver {
    fn default() -> Self {
        Self::new(KnownColorTable::default(), true)
    }
}

impl ColorNameResolver {
    pub fn new(table: KnownColorTable, use_known_colors: bool) -> Self {
        Self {
            table,
            use_known_colors,
        }
    }

    pub fn table(&self) -> &KnownColorTable {
        &self.table
    }

    /// Name for the color `color_hex` at `palette_index`.
    ///
    /// A table hit returns the table name verbatim. Otherwise the name is
    /// generated from the 1-based index: `"Spot Color N"`, or `"Color N"`
    /// when known-color lookup is turned off.
    ///
    /// ```
    /// use spot_separation::ColorNameResolver;
    ///
    /// let resolver = ColorNameResolver::default();
    /// assert_eq!(resolver.resolve("#ff0000", 0), "PANTONE 186 C");
    /// assert_eq!(resolver.resolve("123456", 2), "Spot Color 3");
    /// ```
    pub fn resolve(&self, color_hex: &str, palette_index: usize) -> String {
        if !self.use_known_colors {
            return format!("Color {}", palette_index + 1);
        }
        match self.table.get(color_hex) {
            Some(name) => name.to_string(),
            None => format!("Spot Color {}", palette_index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("ff0000"), "FF0000");
        assert_eq!(normalize_hex("  #Ff0000 "), "FF0000");
        assert_eq!(normalize_hex("#f00"), "FF0000");
        assert_eq!(normalize_hex("0f0"), "00FF00");
        assert_eq!(normalize_hex("xyz1"), "XYZ1");
    }

    #[test]
    fn test_default_table_hits() {
        let resolver = ColorNameResolver::default();
        assert_eq!(resolver.resolve("FF0000", 0), "PANTONE 186 C");
        assert_eq!(resolver.resolve("FF0000", 7), "PANTONE 186 C");
        assert_eq!(resolver.resolve("00ff00", 1), "PANTONE 802 C");
        assert_eq!(resolver.resolve("#0F0", 1), "PANTONE 802 C");
    }

    #[test]
    fn test_fallback_uses_one_based_index() {
        let resolver = ColorNameResolver::default();
        let name = resolver.resolve("123456", 2);
        assert_eq!(name, "Spot Color 3");
        assert!(resolver.table().iter().all(|(_, known)| known != name));
    }

    #[test]
    fn test_known_colors_disabled() {
        let resolver = ColorNameResolver::new(KnownColorTable::default(), false);
        assert_eq!(resolver.resolve("FF0000", 0), "Color 1");
        assert_eq!(resolver.resolve("123456", 4), "Color 5");
    }

    #[test]
    fn test_extend_overrides_and_adds() {
        let mut table = KnownColorTable::default();
        table.extend([("#ff0000", "Warm Red"), ("0000ff", "Reflex Blue")]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("FF0000"), Some("Warm Red"));
        assert_eq!(table.get("#00f"), Some("Reflex Blue"));

        let resolver = ColorNameResolver::new(table, true);
        assert_eq!(resolver.resolve("0000FF", 5), "Reflex Blue");
    }

    #[test]
    fn test_empty_table_always_falls_back() {
        let resolver = ColorNameResolver::new(KnownColorTable::empty(), true);
        assert_eq!(resolver.resolve("FF0000", 0), "Spot Color 1");
    }
}
