//! Ordered tree of properties.
//!
//! A group owns its entries exclusively. Entry names are unique within a
//! group and insertion order is preserved (it drives display and persisted
//! order). The stable key of a property is the `/`-separated path of entry
//! names leading to it, e.g. `meshing/chordalDeflection`.

use crate::property::Property;

pub const KEY_SEPARATOR: char = '/';

#[derive(Debug)]
pub enum GroupEntry {
    Property(Box<dyn Property>),
    Group(PropertyGroup),
}

impl GroupEntry {
    pub fn name(&self) -> &str {
        match self {
            GroupEntry::Property(p) => p.name(),
            GroupEntry::Group(g) => g.name(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PropertyGroup {
    name: String,
    label: String,
    entries: Vec<GroupEntry>,
}

/// Join a parent key and an entry name
pub fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{name}")
    }
}

/// Split `a/b/c` into (`a/b`, `c`)
pub fn split_key(key: &str) -> (&str, &str) {
    match key.rfind(KEY_SEPARATOR) {
        Some(pos) => (&key[..pos], &key[pos + 1..]),
        None => ("", key),
    }
}

impl PropertyGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entries(&self) -> &[GroupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add_property<P: Property>(&mut self, property: P) {
        self.insert(GroupEntry::Property(Box::new(property)));
    }

    pub fn add_boxed_property(&mut self, property: Box<dyn Property>) {
        self.insert(GroupEntry::Property(property));
    }

    pub fn with_property<P: Property>(mut self, property: P) -> Self {
        self.add_property(property);
        self
    }

    /// Add a sub-group and return it for further filling
    pub fn add_group(&mut self, group: PropertyGroup) -> &mut PropertyGroup {
        let index = self.insert(GroupEntry::Group(group));
        match &mut self.entries[index] {
            GroupEntry::Group(g) => g,
            GroupEntry::Property(_) => unreachable!("entry was just inserted as a group"),
        }
    }

    pub fn with_group(mut self, group: PropertyGroup) -> Self {
        self.add_group(group);
        self
    }

    // An entry with the same name is replaced in place, keeping its position.
    fn insert(&mut self, entry: GroupEntry) -> usize {
        if let Some(index) = self.entries.iter().position(|e| e.name() == entry.name()) {
            log::warn!("Group '{}': entry '{}' replaced", self.name, entry.name());
            self.entries[index] = entry;
            index
        } else {
            self.entries.push(entry);
            self.entries.len() - 1
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<GroupEntry> {
        let index = self.entries.iter().position(|e| e.name() == name)?;
        Some(self.entries.remove(index))
    }

    /// Direct child property
    pub fn property(&self, name: &str) -> Option<&dyn Property> {
        for entry in &self.entries {
            if let GroupEntry::Property(p) = entry {
                if p.name() == name {
                    return Some(p.as_ref());
                }
            }
        }
        None
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut dyn Property> {
        for entry in &mut self.entries {
            if let GroupEntry::Property(p) = entry {
                if p.name() == name {
                    return Some(p.as_mut());
                }
            }
        }
        None
    }

    /// Direct child group
    pub fn group(&self, name: &str) -> Option<&PropertyGroup> {
        self.entries.iter().find_map(|e| match e {
            GroupEntry::Group(g) if g.name == name => Some(g),
            _ => None,
        })
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut PropertyGroup> {
        self.entries.iter_mut().find_map(|e| match e {
            GroupEntry::Group(g) if g.name == name => Some(g),
            _ => None,
        })
    }

    /// Nested group by path. An empty path is this group.
    pub fn find_group(&self, path: &str) -> Option<&PropertyGroup> {
        let mut group = self;
        for segment in path.split(KEY_SEPARATOR).filter(|s| !s.is_empty()) {
            group = group.group(segment)?;
        }
        Some(group)
    }

    pub fn find_group_mut(&mut self, path: &str) -> Option<&mut PropertyGroup> {
        let mut group = self;
        for segment in path.split(KEY_SEPARATOR).filter(|s| !s.is_empty()) {
            group = group.group_mut(segment)?;
        }
        Some(group)
    }

    /// Nested property by stable key, relative to this group
    pub fn find_property(&self, key: &str) -> Option<&dyn Property> {
        let (path, name) = split_key(key);
        self.find_group(path)?.property(name)
    }

    pub fn find_property_mut(&mut self, key: &str) -> Option<&mut dyn Property> {
        let (path, name) = split_key(key);
        self.find_group_mut(path)?.property_mut(name)
    }

    /// Typed lookup, None if absent or of another kind
    pub fn get<P: Property>(&self, key: &str) -> Option<&P> {
        self.find_property(key)?.downcast_ref::<P>()
    }

    pub fn get_mut<P: Property>(&mut self, key: &str) -> Option<&mut P> {
        self.find_property_mut(key)?.downcast_mut::<P>()
    }

    /// Depth-first visit of every property, in entry order, with its key
    pub fn visit_properties<F>(&self, mut f: F)
    where
        F: FnMut(&str, &dyn Property),
    {
        self.visit_inner("", &mut f);
    }

    fn visit_inner<F>(&self, prefix: &str, f: &mut F)
    where
        F: FnMut(&str, &dyn Property),
    {
        for entry in &self.entries {
            match entry {
                GroupEntry::Property(p) => f(&join_key(prefix, p.name()), p.as_ref()),
                GroupEntry::Group(g) => g.visit_inner(&join_key(prefix, &g.name), f),
            }
        }
    }

    pub fn visit_properties_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut dyn Property),
    {
        self.visit_inner_mut("", &mut f);
    }

    fn visit_inner_mut<F>(&mut self, prefix: &str, f: &mut F)
    where
        F: FnMut(&str, &mut dyn Property),
    {
        for entry in &mut self.entries {
            match entry {
                GroupEntry::Property(p) => {
                    let key = join_key(prefix, p.name());
                    f(&key, p.as_mut());
                }
                GroupEntry::Group(g) => {
                    let key = join_key(prefix, &g.name);
                    g.visit_inner_mut(&key, f);
                }
            }
        }
    }

    pub fn property_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.visit_properties(|key, _| keys.push(key.to_string()));
        keys
    }

    /// Restore defaults of every nested property
    pub fn reset_all(&mut self) {
        self.visit_properties_mut(|_, p| p.reset());
    }
}
