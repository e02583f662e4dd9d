use indexmap::IndexMap;
use serde::Serialize;

/// An `AttributeName` represents the name of an attribute of an element.
pub type AttributeName = String;

/// An `AttributeValue` represents the value of an attribute of an element.
pub type AttributeValue = String;

/// The attributes of an element, in the order they were written.
///
/// Writing a key that is already present replaces its value but keeps the
/// position where the key was first seen.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<AttributeName, AttributeValue>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &AttributeValue)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert an attribute, returning the value it replaced.
    //
    // NOTE: This *will* overwrite an existing attribute with the same name.
    pub fn insert(
        &mut self,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Insert every attribute of `other`, in order.
    pub fn merge(&mut self, other: Attributes) {
        for (name, value) in other.0 {
            self.0.insert(name, value);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<N, V> FromIterator<(N, V)> for Attributes
where
    N: Into<AttributeName>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl IntoIterator for Attributes {
    type Item = (AttributeName, AttributeValue);
    type IntoIter = indexmap::map::IntoIter<AttributeName, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a AttributeName, &'a AttributeValue);
    type IntoIter = indexmap::map::Iter<'a, AttributeName, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
