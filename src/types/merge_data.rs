//! Case-insensitive, insertion-ordered merge field map.

/// Merge field values keyed by field name.
///
/// Lookups ignore the case of the field name, so `"FirstName"` and
/// `"firstname"` address the same entry. Iteration yields entries in the order
/// they were first inserted; replacing a value keeps the entry's position and
/// its original spelling. The order matters: bulk requests serialize merge
/// fields positionally.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::types::MergeData;
///
/// let mut data = MergeData::new();
/// data.insert("FirstName", "Ada");
/// data.insert("Plan", "Pro");
/// data.insert("firstname", "Grace");
///
/// assert_eq!(data.get("FIRSTNAME"), Some("Grace"));
/// let fields: Vec<_> = data.iter().map(|(field, _)| field).collect();
/// assert_eq!(fields, vec!["FirstName", "Plan"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeData {
    entries: Vec<(String, String)>,
}

fn same_field(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl MergeData {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning the previous value if any.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let field = field.into();
        let value = value.into();

        match self.position(&field) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((field, value));
                None
            }
        }
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.position(field).map(|index| self.entries[index].1.as_str())
    }

    /// Whether the field is present.
    pub fn contains_key(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.position(field)
            .map(|index| self.entries.remove(index).1)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| same_field(existing, field))
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for MergeData {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (field, value) in iter {
            self.insert(field, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MergeData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = MergeData::new();
        data.extend(iter);
        data
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for MergeData {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
