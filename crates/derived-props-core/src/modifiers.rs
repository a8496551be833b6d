//! Declaration modifiers.

use bitflags::bitflags;

bitflags! {
    /// Modifiers attached to a type or member declaration.
    ///
    /// ```rust
    /// use derived_props_core::Modifiers;
    ///
    /// let m = Modifiers::PUBLIC | Modifiers::PARTIAL;
    /// assert!(m.is_partial());
    /// assert_eq!(m.accessibility_keywords(), Some("public"));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL = 1 << 3;
        /// `file` local type.
        const FILE = 1 << 4;
        const STATIC = 1 << 5;
        const PARTIAL = 1 << 6;
        const SEALED = 1 << 7;
        const ABSTRACT = 1 << 8;
        const READONLY = 1 << 9;
        const CONST = 1 << 10;
        const VIRTUAL = 1 << 11;
        const OVERRIDE = 1 << 12;
        const NEW = 1 << 13;
        const EXTERN = 1 << 14;
        const UNSAFE = 1 << 15;
        const VOLATILE = 1 << 16;
        const ASYNC = 1 << 17;
        const REQUIRED = 1 << 18;
        const REF = 1 << 19;

        /// All accessibility modifiers.
        const ACCESSIBILITY = Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::PROTECTED.bits()
            | Self::INTERNAL.bits()
            | Self::FILE.bits();
    }
}

impl Modifiers {
    /// Map a modifier keyword to its flag.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let flag = match keyword {
            "public" => Self::PUBLIC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "internal" => Self::INTERNAL,
            "file" => Self::FILE,
            "static" => Self::STATIC,
            "partial" => Self::PARTIAL,
            "sealed" => Self::SEALED,
            "abstract" => Self::ABSTRACT,
            "readonly" => Self::READONLY,
            "const" => Self::CONST,
            "virtual" => Self::VIRTUAL,
            "override" => Self::OVERRIDE,
            "new" => Self::NEW,
            "extern" => Self::EXTERN,
            "unsafe" => Self::UNSAFE,
            "volatile" => Self::VOLATILE,
            "async" => Self::ASYNC,
            "required" => Self::REQUIRED,
            "ref" => Self::REF,
            _ => return None,
        };
        Some(flag)
    }

    /// Whether the `partial` modifier is present.
    #[inline]
    pub fn is_partial(self) -> bool {
        self.contains(Self::PARTIAL)
    }

    /// Whether the `const` modifier is present.
    #[inline]
    pub fn is_const(self) -> bool {
        self.contains(Self::CONST)
    }

    /// Declared accessibility as source keywords, if any was written.
    ///
    /// Compound forms (`protected internal`, `private protected`) come back
    /// in their canonical order.
    pub fn accessibility_keywords(self) -> Option<&'static str> {
        let access = self & Self::ACCESSIBILITY;
        let keywords = if access == Self::PUBLIC {
            "public"
        } else if access == Self::INTERNAL {
            "internal"
        } else if access == Self::PRIVATE {
            "private"
        } else if access == Self::PROTECTED {
            "protected"
        } else if access == Self::FILE {
            "file"
        } else if access == Self::PROTECTED | Self::INTERNAL {
            "protected internal"
        } else if access == Self::PRIVATE | Self::PROTECTED {
            "private protected"
        } else {
            return None;
        };
        Some(keywords)
    }
}
