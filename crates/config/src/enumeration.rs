// Enumerations: ordered items with a stable value, a stable name and a display label.
// Only the value is ever persisted; labels follow the active locale.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItem {
    pub value: i64,
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    items: Vec<EnumItem>,
}

impl Enumeration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. Items with an already used value or name are ignored.
    pub fn with_item(mut self, value: i64, name: &str, label: &str) -> Self {
        if self.find_by_value(value).is_some() || self.find_by_name(name).is_some() {
            log::warn!("Enumeration item '{}' ({}) already present, ignored", name, value);
            return self;
        }
        self.items.push(EnumItem {
            value,
            name: name.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn items(&self) -> &[EnumItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: i64) -> bool {
        self.find_by_value(value).is_some()
    }

    pub fn find_by_value(&self, value: i64) -> Option<&EnumItem> {
        self.items.iter().find(|item| item.value == value)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&EnumItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Position of the item holding `value`
    pub fn index_of(&self, value: i64) -> Option<usize> {
        self.items.iter().position(|item| item.value == value)
    }
}
