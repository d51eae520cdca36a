use std::fmt;

/// Container image reference in `name:version` form.
///
/// # Examples
///
/// ```
/// use rollout_core::ImageTag;
///
/// let tag = ImageTag::new("demo", "abc123");
/// assert_eq!(tag.to_string(), "demo:abc123");
/// assert_eq!(tag.version(), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    name: String,
    version: String,
}

impl ImageTag {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The part after the colon; also the value handed to the chart.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}
