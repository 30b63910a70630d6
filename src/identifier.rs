use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter};

/// The key used to tell variables apart.
///
/// Only the first [`Identifier::MAX_LEN`] bytes of a name take part in
/// comparisons, so `"position_x"` and `"position_y"` are the *same*
/// identifier. A name is also cut short at its first NUL byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(SmolStr);

impl Identifier {
    /// The maximum number of bytes from a name which are kept.
    pub const MAX_LEN: usize = 8;

    pub fn new(name: &str) -> Self {
        let name = match name.find('\0') {
            Some(nul) => &name[..nul],
            None => name,
        };

        let mut len = name.len().min(Identifier::MAX_LEN);
        // never split a multi-byte character
        while !name.is_char_boundary(len) {
            len -= 1;
        }

        Identifier(SmolStr::new(&name[..len]))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self { Identifier::new(name) }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str { self.as_str() }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
