//! Route lookup.
//!
//! # Responsibilities
//! - Compile the allowed categories into route tables
//! - Look up the matching route for a request path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Two independent tables built from the same template list: one for
//!   unversioned paths, one for paths under a `/v<major>.<minor>` prefix
//! - A versioned path is only looked up in the versioned table, so the two
//!   namespaces never compete for the same request
//! - Immutable after construction (thread-safe without locks)
//! - O(n) template scan (route counts are tiny)

use crate::routing::category::{AllowedSet, Category};
use crate::routing::matcher::{split_version_prefix, ApiVersion, PathTemplate};

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    pub category: Category,
    pub template: PathTemplate,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'p> {
    pub category: Category,
    pub template: &'static str,
    pub version: Option<ApiVersion>,
    pub params: Vec<(String, &'p str)>,
}

/// Allowlist router.
#[derive(Debug, Clone, Default)]
pub struct Router {
    unversioned: Vec<Route>,
    versioned: Vec<Route>,
}

impl Router {
    /// Compile route tables for every allowed category.
    pub fn new(allowed: &AllowedSet) -> Self {
        let mut unversioned = Vec::new();
        let mut versioned = Vec::new();

        for category in Category::ALL.into_iter().filter(|c| allowed.contains(*c)) {
            tracing::info!(category = %category, "Registering handlers");
            for template in category.templates() {
                let route = Route {
                    category,
                    template: PathTemplate::new(template),
                };
                versioned.push(route.clone());
                unversioned.push(route);
            }
        }

        Self {
            unversioned,
            versioned,
        }
    }

    /// Find the route for a request path.
    pub fn match_path<'p>(&self, path: &'p str) -> Option<RouteMatch<'p>> {
        let (version, table, rest) = match split_version_prefix(path) {
            Some((version, rest)) => (Some(version), &self.versioned, rest),
            None => (None, &self.unversioned, path),
        };

        table.iter().find_map(|route| {
            route.template.matches(rest).map(|params| RouteMatch {
                category: route.category,
                template: route.template.as_str(),
                version,
                params,
            })
        })
    }

    /// Registered unversioned patterns, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.unversioned.iter()
    }

    /// Number of patterns registered in each namespace.
    pub fn len(&self) -> usize {
        self.unversioned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unversioned.is_empty()
    }
}
