//! Category registry.
//!
//! The closed table of everything the gateway is able to expose. An operator
//! opts into categories by name; each category contributes a fixed list of
//! path templates. Nothing outside this table can ever be routed upstream.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A named group of upstream API paths that can be allowed as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Containers,
    Images,
    Volumes,
    Networks,
    Services,
    Tasks,
    Events,
    Version,
    Info,
    Ping,
}

impl Category {
    /// Every recognized category, in registration order.
    pub const ALL: [Category; 10] = [
        Category::Containers,
        Category::Images,
        Category::Volumes,
        Category::Networks,
        Category::Services,
        Category::Tasks,
        Category::Events,
        Category::Version,
        Category::Info,
        Category::Ping,
    ];

    /// Configuration name of the category.
    pub fn name(self) -> &'static str {
        match self {
            Category::Containers => "containers",
            Category::Images => "images",
            Category::Volumes => "volumes",
            Category::Networks => "networks",
            Category::Services => "services",
            Category::Tasks => "tasks",
            Category::Events => "events",
            Category::Version => "version",
            Category::Info => "info",
            Category::Ping => "ping",
        }
    }

    /// Path templates exposed by this category.
    ///
    /// Templates are unversioned; the router mounts each one a second time
    /// under the `/v<major>.<minor>` prefix.
    pub fn templates(self) -> &'static [&'static str] {
        match self {
            Category::Containers => &["/containers/json", "/containers/{name}/json"],
            Category::Images => &[
                "/images/json",
                "/images/{name}/json",
                "/images/{name}/history",
            ],
            Category::Volumes => &["/volumes", "/volumes/{name}"],
            Category::Networks => &["/networks", "/networks/{name}"],
            Category::Services => &["/services", "/services/{name}"],
            Category::Tasks => &["/tasks", "/tasks/{name}"],
            Category::Events => &["/events"],
            Category::Version => &["/version"],
            Category::Info => &["/info"],
            Category::Ping => &["/_ping"],
        }
    }

    /// Comma separated list of every recognized name, for operator messages.
    pub fn known_names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| UnknownCategory(name.to_string()))
    }
}

/// The operator-selected subset of categories.
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedSet(BTreeSet<Category>);

impl AllowedSet {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self(categories.into_iter().collect())
    }

    /// Parse a list of names, collecting every unknown one.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, Vec<UnknownCategory>> {
        let mut set = BTreeSet::new();
        let mut unknown = Vec::new();
        for name in names {
            match name.as_ref().parse::<Category>() {
                Ok(category) => {
                    set.insert(category);
                }
                Err(e) => unknown.push(e),
            }
        }
        if unknown.is_empty() {
            Ok(Self(set))
        } else {
            Err(unknown)
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("Containers".parse::<Category>().is_err());
        assert_eq!(" ping ".parse::<Category>(), Ok(Category::Ping));
    }

    #[test]
    fn ping_maps_to_underscore_path() {
        assert_eq!(Category::Ping.templates(), &["/_ping"]);
    }

    #[test]
    fn images_expose_history() {
        assert!(Category::Images.templates().contains(&"/images/{name}/history"));
        assert!(!Category::Containers.templates().contains(&"/images/{name}/history"));
    }

    #[test]
    fn allowed_set_collects_all_unknown_names() {
        let err = AllowedSet::parse(&["ping", "secrets", "exec"]).unwrap_err();
        assert_eq!(
            err,
            vec![
                UnknownCategory("secrets".into()),
                UnknownCategory("exec".into())
            ]
        );
    }

    #[test]
    fn allowed_set_deduplicates() {
        let set = AllowedSet::parse(&["ping", "ping", "info"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Category::Ping));
        assert!(set.contains(Category::Info));
        assert!(!set.contains(Category::Containers));
    }
}
