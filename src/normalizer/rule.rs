use crate::document::Points;

/// The requested font transformation.
///
/// An absolute size takes precedence over the delta when both are set. A
/// delta is subtracted from explicit sizes only and never drives a size below
/// [`Points::MIN`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontRule {
    font_name: Option<String>,
    absolute_size: Option<Points>,
    size_delta: Points,
}

impl FontRule {
    pub fn new(
        font_name: Option<String>,
        absolute_size: Option<Points>,
        size_delta: Points,
    ) -> Self {
        Self::default()
            .with_optional_font_name(font_name)
            .with_optional_absolute_size(absolute_size)
            .with_size_delta(size_delta)
    }

    /// Sets the replacement font name. An empty name means no replacement.
    pub fn with_font_name(self, name: impl Into<String>) -> Self {
        self.with_optional_font_name(Some(name.into()))
    }

    fn with_optional_font_name(mut self, name: Option<String>) -> Self {
        self.font_name = name.filter(|n| !n.trim().is_empty());
        self
    }

    /// Sets the target size. A zero size is treated as unset; anything else
    /// below [`Points::MIN`] is raised to it.
    pub fn with_absolute_size(self, size: Points) -> Self {
        self.with_optional_absolute_size(Some(size))
    }

    fn with_optional_absolute_size(mut self, size: Option<Points>) -> Self {
        self.absolute_size = size.filter(|s| !s.is_zero()).map(|s| s.max(Points::MIN));
        self
    }

    pub fn with_size_delta(mut self, delta: Points) -> Self {
        self.size_delta = delta;
        self
    }

    pub fn font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    pub fn absolute_size(&self) -> Option<Points> {
        self.absolute_size
    }

    pub fn size_delta(&self) -> Points {
        self.size_delta
    }

    /// True if applying the rule cannot change anything.
    pub fn is_empty(&self) -> bool {
        self.font_name.is_none() && self.absolute_size.is_none() && self.size_delta.is_zero()
    }
}
