//! Viewer selectors
//!
//! A `FilterSpec` scopes what a viewer may see: one namespace, optionally
//! narrowed to a pod, a container within that pod, and a set of labels.
//! Empty optional fields are wildcards.
//!
//! `FilterRequest` is the raw form received from a sign-in request. It
//! becomes a `FilterSpec` only through `TryFrom`, which enforces:
//!
//! - `namespace` is non-empty
//! - `container` is only set when `pod` is set

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Label selector (all pairs must match)
pub type Labels = BTreeMap<String, String>;

/// Unvalidated selector, e.g. the body of a sign-in request
///
/// # Example
///
/// ```
/// use logurt_protocol::{FilterRequest, FilterSpec};
///
/// let spec = FilterSpec::try_from(
///     FilterRequest::new("prod").with_pod("web-1").with_container("app"),
/// )
/// .unwrap();
/// assert_eq!(spec.container(), "app");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    /// Namespace (required)
    pub namespace: String,
    /// Pod name (empty = any pod)
    pub pod: String,
    /// Container name (empty = any container)
    pub container: String,
    /// Required labels
    pub labels: Labels,
}

impl FilterRequest {
    /// Create a request scoped to a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Narrow to a pod
    pub fn with_pod(mut self, pod: impl Into<String>) -> Self {
        self.pod = pod.into();
        self
    }

    /// Narrow to a container
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Require a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Check the selector invariants without consuming the request
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.namespace.is_empty() {
            return Err(ValidationError::MissingNamespace);
        }
        if !self.container.is_empty() && self.pod.is_empty() {
            return Err(ValidationError::ContainerWithoutPod);
        }
        Ok(())
    }
}

/// Validated, immutable viewer selector
///
/// Deserialization goes through `FilterRequest`, so an invalid selector is
/// rejected wherever it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FilterRequest")]
pub struct FilterSpec {
    namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pod: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    container: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: Labels,
}

impl FilterSpec {
    /// Build a selector from its parts
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the namespace is empty or a container is
    /// given without a pod.
    pub fn new(
        namespace: impl Into<String>,
        pod: impl Into<String>,
        container: impl Into<String>,
        labels: Labels,
    ) -> Result<Self, ValidationError> {
        Self::try_from(FilterRequest {
            namespace: namespace.into(),
            pod: pod.into(),
            container: container.into(),
            labels,
        })
    }

    /// Namespace the viewer is scoped to
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Pod name, empty for any pod
    #[inline]
    pub fn pod(&self) -> &str {
        &self.pod
    }

    /// Container name, empty for any container
    #[inline]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Required labels
    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// True when only the namespace constrains matching
    pub fn is_namespace_wide(&self) -> bool {
        self.pod.is_empty() && self.container.is_empty() && self.labels.is_empty()
    }
}

impl TryFrom<FilterRequest> for FilterSpec {
    type Error = ValidationError;

    fn try_from(request: FilterRequest) -> Result<Self, Self::Error> {
        request.validate()?;
        Ok(Self {
            namespace: request.namespace,
            pod: request.pod,
            container: request.container,
            labels: request.labels,
        })
    }
}

impl From<FilterSpec> for FilterRequest {
    fn from(spec: FilterSpec) -> Self {
        Self {
            namespace: spec.namespace,
            pod: spec.pod,
            container: spec.container,
            labels: spec.labels,
        }
    }
}

/// Renders as `namespace/pod/container{k=v,...}`, using `*` for wildcards
impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.namespace,
            or_wildcard(&self.pod),
            or_wildcard(&self.container)
        )?;

        if !self.labels.is_empty() {
            let pairs: Vec<String> = self
                .labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "{{{}}}", pairs.join(","))?;
        }

        Ok(())
    }
}

fn or_wildcard(value: &str) -> &str {
    if value.is_empty() { "*" } else { value }
}
