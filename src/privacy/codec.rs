use serde::Serialize;

const SEPARATOR: char = ',';

/// Ordered set of package identifiers hidden from the task switcher.
///
/// Insertion order is kept. `insert` never adds a duplicate, but `decode`
/// takes the stored string literally, so a hand-edited value such as
/// `"a,,a"` decodes to three entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrivacySet {
    packages: Vec<String>,
}

impl PrivacySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted value. `None` and `""` both give an empty set.
    pub fn decode(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::new(),
            Some(raw) => Self {
                packages: raw.split(SEPARATOR).map(str::to_string).collect(),
            },
        }
    }

    /// Comma-join the set; an empty set encodes to `""`.
    pub fn encode(&self) -> String {
        self.packages.join(",")
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p == package)
    }

    /// Append `package` unless already present. Returns whether it was added.
    pub fn insert(&mut self, package: &str) -> bool {
        if self.contains(package) {
            return false;
        }
        self.packages.push(package.to_string());
        true
    }

    /// Remove the first occurrence of `package`. Returns whether it was present.
    pub fn remove(&mut self, package: &str) -> bool {
        match self.packages.iter().position(|p| p == package) {
            Some(idx) => {
                self.packages.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PrivacySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for package in iter {
            let package: String = package.into();
            set.insert(&package);
        }
        set
    }
}

/// Decode a raw settings value into a package set
pub fn decode(raw: Option<&str>) -> PrivacySet {
    PrivacySet::decode(raw)
}

/// Encode a package set into its settings value
pub fn encode(set: &PrivacySet) -> String {
    set.encode()
}
