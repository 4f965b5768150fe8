use crate::item::LineItem;

/// Ordered row ID -> line item mapping.
///
/// Carts hold a handful of lines, so lookups scan the vector; what matters
/// is that positions are stable and explicit.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Content {
    items: Vec<LineItem>,
}

impl Content {
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Content { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LineItem> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, row_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.row_id() == row_id)
    }

    pub fn get(&self, row_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.row_id() == row_id)
    }

    pub fn get_mut(&mut self, row_id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.row_id() == row_id)
    }

    /// Replace the entry with the same row ID in place, or append.
    pub fn put(&mut self, item: LineItem) {
        match self.position(item.row_id()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }

    /// Insert at `index`, clamped to the end.
    pub fn insert_at(&mut self, index: usize, item: LineItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Remove an entry, returning its former position.
    pub fn remove(&mut self, row_id: &str) -> Option<(usize, LineItem)> {
        let index = self.position(row_id)?;
        Some((index, self.items.remove(index)))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
