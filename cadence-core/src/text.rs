//! Constant text tables
//!
//! Banners and prompts live in a fixed table of `&'static str` and are
//! addressed by index. On targets with a unified address space a static
//! string already sits in flash, so there is no separate program-memory
//! accessor.

/// Index into a [`TextTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextId(pub u8);

/// Read-only table of constant strings
#[derive(Debug, Clone, Copy)]
pub struct TextTable<'a> {
    entries: &'a [&'static str],
}

impl<'a> TextTable<'a> {
    /// Create a table over a static slice of strings
    pub const fn new(entries: &'a [&'static str]) -> Self {
        Self { entries }
    }

    /// Bytes of entry `id`, or `None` if the id is out of range
    pub fn get(&self, id: TextId) -> Option<&'static [u8]> {
        self.entries.get(id.0 as usize).map(|text| text.as_bytes())
    }

    /// Number of entries
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNERS: TextTable<'static> = TextTable::new(&["cadence\r\n", "> "]);

    #[test]
    fn test_lookup() {
        assert_eq!(BANNERS.get(TextId(0)), Some(&b"cadence\r\n"[..]));
        assert_eq!(BANNERS.get(TextId(1)), Some(&b"> "[..]));
        assert_eq!(BANNERS.get(TextId(2)), None);
        assert_eq!(BANNERS.len(), 2);
        assert!(!BANNERS.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let table = TextTable::new(&[]);
        assert!(table.is_empty());
        assert_eq!(table.get(TextId(0)), None);
    }
}
