use std::fmt;

/// One step of the content pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Analyze,
    Angles,
    Copy,
    Adapt,
    Advice,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Analyze => "analyze",
            Stage::Angles => "angles",
            Stage::Copy => "copy",
            Stage::Adapt => "adapt",
            Stage::Advice => "advice",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
