use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by every id type; ids compare in O(1).
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter behind `generate()`. Shared so generated ids never
/// collide across id types either.
static COUNTER: AtomicU64 = AtomicU64::new(0);

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing handle.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a fresh id (e.g. `el_12`). Candidates already
            /// interned, e.g. by a loaded document, are skipped.
            pub fn generate() -> Self {
                loop {
                    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                    let candidate = format!("{}_{n}", $prefix);
                    if !INTERNER.contains(&candidate) {
                        return Self::intern(&candidate);
                    }
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Stable, opaque identifier of an element within a slide.
    ElementId,
    "el"
);

interned_id!(
    /// Identifier of a slide within a presentation.
    SlideId,
    "slide"
);

interned_id!(
    /// Identifier of a presentation (the document root).
    PresentationId,
    "deck"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("title_box");
        let b = ElementId::intern("title_box");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "title_box");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ElementId::generate();
        let b = ElementId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("el_"));
        assert!(SlideId::generate().as_str().starts_with("slide_"));
    }

    #[test]
    fn generate_skips_interned_names() {
        let next = COUNTER.load(Ordering::Relaxed);
        let taken: Vec<SlideId> = (next..next + 16)
            .map(|n| SlideId::intern(&format!("slide_{n}")))
            .collect();
        for _ in 0..16 {
            assert!(!taken.contains(&SlideId::generate()));
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = SlideId::intern("intro");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"intro\"");
        let back: SlideId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
