use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for tool IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for a tool.
/// Copy and cheap to compare; resolve with [`ToolId::as_str`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolId(Spur);

impl ToolId {
    /// Intern a tool name, or return the existing ID if already interned.
    pub fn intern(s: &str) -> Self {
        ToolId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to the tool name.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToolId({})", self.as_str())
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ToolId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ToolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ToolId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let a = ToolId::intern("vertex_tool");
        let b = ToolId::intern("vertex_tool");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "vertex_tool");
        assert_ne!(a, ToolId::intern("clip_tool"));
    }

    #[test]
    fn display_is_the_plain_name() {
        assert_eq!(ToolId::intern("move_objects").to_string(), "move_objects");
    }
}
