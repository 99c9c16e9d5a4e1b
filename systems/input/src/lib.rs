#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Key-binding input system that turns physical keys into heading requests.
//!
//! Physical keys are identified by the lowercased names the rendering
//! backend reports (`"arrowup"`, `"w"`, ...). The binding table is
//! enumerable and overridable from a TOML document; resolution is a pure
//! lookup, so the system can be driven synchronously in tests. Reversal
//! filtering intentionally stays in the session, where the committed heading
//! lives; this system only maps keys.

use std::collections::HashMap;

use pocket_snake_core::{Command, Heading};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_UP: &[&str] = &["arrowup", "w"];
const DEFAULT_DOWN: &[&str] = &["arrowdown", "s"];
const DEFAULT_LEFT: &[&str] = &["arrowleft", "a"];
const DEFAULT_RIGHT: &[&str] = &["arrowright", "d"];

/// Enumerable table mapping physical key identifiers to logical headings.
#[derive(Clone, Debug)]
pub struct Bindings {
    map: HashMap<String, Heading>,
}

impl Bindings {
    /// Parses a binding table from a TOML document.
    ///
    /// Directions omitted from the document keep their default keys. Every
    /// direction must keep at least one key, and no key may serve two
    /// directions.
    pub fn from_toml_str(contents: &str) -> Result<Self, BindingsError> {
        let file: BindingsFile = toml::from_str(contents)?;
        Self::from_key_lists([
            (Heading::North, file.up),
            (Heading::South, file.down),
            (Heading::West, file.left),
            (Heading::East, file.right),
        ])
    }

    fn from_key_lists(lists: [(Heading, Vec<String>); 4]) -> Result<Self, BindingsError> {
        let mut map = HashMap::new();
        for (heading, keys) in lists {
            if keys.is_empty() {
                return Err(BindingsError::UnboundDirection { heading });
            }
            for key in keys {
                let key = key.to_lowercase();
                if map.insert(key.clone(), heading).is_some() {
                    return Err(BindingsError::DuplicateKey { key });
                }
            }
        }
        Ok(Self { map })
    }

    /// Resolves a physical key to its bound heading, ignoring case.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<Heading> {
        self.map.get(&key.to_lowercase()).copied()
    }

    /// Number of physical keys contained in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Reports whether the table binds no keys at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        let owned = |keys: &[&str]| keys.iter().map(|key| (*key).to_owned()).collect();
        Self::from_key_lists([
            (Heading::North, owned(DEFAULT_UP)),
            (Heading::South, owned(DEFAULT_DOWN)),
            (Heading::West, owned(DEFAULT_LEFT)),
            (Heading::East, owned(DEFAULT_RIGHT)),
        ])
        .expect("default bindings are disjoint and complete")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BindingsFile {
    #[serde(default = "default_up")]
    up: Vec<String>,
    #[serde(default = "default_down")]
    down: Vec<String>,
    #[serde(default = "default_left")]
    left: Vec<String>,
    #[serde(default = "default_right")]
    right: Vec<String>,
}

fn default_up() -> Vec<String> {
    DEFAULT_UP.iter().map(|key| (*key).to_owned()).collect()
}

fn default_down() -> Vec<String> {
    DEFAULT_DOWN.iter().map(|key| (*key).to_owned()).collect()
}

fn default_left() -> Vec<String> {
    DEFAULT_LEFT.iter().map(|key| (*key).to_owned()).collect()
}

fn default_right() -> Vec<String> {
    DEFAULT_RIGHT.iter().map(|key| (*key).to_owned()).collect()
}

/// Errors produced while building a binding table.
#[derive(Debug, Error)]
pub enum BindingsError {
    /// The TOML document failed to parse.
    #[error("failed to parse bindings table: {0}")]
    Parse(#[from] toml::de::Error),
    /// One physical key was bound to more than one direction.
    #[error("key {key:?} is bound to more than one direction")]
    DuplicateKey {
        /// Key that appeared twice.
        key: String,
    },
    /// A direction was left without any bound key.
    #[error("direction {heading:?} has no keys bound")]
    UnboundDirection {
        /// Direction that became unreachable.
        heading: Heading,
    },
}

/// Pure system that maps pressed keys to heading-change commands.
#[derive(Clone, Debug, Default)]
pub struct Input {
    bindings: Bindings,
}

impl Input {
    /// Creates a new input system over the provided binding table.
    #[must_use]
    pub fn new(bindings: Bindings) -> Self {
        Self { bindings }
    }

    /// Provides read-only access to the binding table.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Emits a heading request for every recognized key, in press order.
    ///
    /// Unrecognized keys are ignored silently. The session buffers the
    /// requests, so only the last valid one survives until the next tick.
    pub fn handle(&self, pressed: &[&str], out: &mut Vec<Command>) {
        for key in pressed {
            if let Some(heading) = self.bindings.resolve(key) {
                out.push(Command::RequestHeading { heading });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_both_key_sets() {
        let bindings = Bindings::default();
        assert_eq!(bindings.len(), 8);
        assert_eq!(bindings.resolve("arrowup"), Some(Heading::North));
        assert_eq!(bindings.resolve("w"), Some(Heading::North));
        assert_eq!(bindings.resolve("arrowdown"), Some(Heading::South));
        assert_eq!(bindings.resolve("s"), Some(Heading::South));
        assert_eq!(bindings.resolve("arrowleft"), Some(Heading::West));
        assert_eq!(bindings.resolve("a"), Some(Heading::West));
        assert_eq!(bindings.resolve("arrowright"), Some(Heading::East));
        assert_eq!(bindings.resolve("d"), Some(Heading::East));
    }

    #[test]
    fn resolution_ignores_case() {
        let bindings = Bindings::default();
        assert_eq!(bindings.resolve("ArrowUp"), Some(Heading::North));
        assert_eq!(bindings.resolve("W"), Some(Heading::North));
    }

    #[test]
    fn unknown_keys_resolve_to_nothing() {
        assert_eq!(Bindings::default().resolve("enter"), None);
    }

    #[test]
    fn toml_overrides_replace_a_direction() {
        let bindings = Bindings::from_toml_str(r#"up = ["k"]"#).expect("valid table");
        assert_eq!(bindings.resolve("k"), Some(Heading::North));
        assert_eq!(bindings.resolve("arrowup"), None);
        // Directions left out of the document keep their defaults.
        assert_eq!(bindings.resolve("arrowdown"), Some(Heading::South));
        assert_eq!(bindings.len(), 7);
    }

    #[test]
    fn duplicate_keys_across_directions_are_rejected() {
        let error = Bindings::from_toml_str(
            r#"
            up = ["x"]
            down = ["x"]
            "#,
        )
        .expect_err("duplicate must be rejected");
        assert!(matches!(error, BindingsError::DuplicateKey { key } if key == "x"));
    }

    #[test]
    fn unbound_directions_are_rejected() {
        let error = Bindings::from_toml_str(r#"left = []"#).expect_err("empty list must fail");
        assert!(matches!(
            error,
            BindingsError::UnboundDirection {
                heading: Heading::West,
            }
        ));
    }

    #[test]
    fn unknown_table_fields_are_rejected() {
        assert!(matches!(
            Bindings::from_toml_str(r#"upp = ["w"]"#),
            Err(BindingsError::Parse(_))
        ));
    }

    #[test]
    fn handle_emits_requests_in_press_order() {
        let input = Input::default();
        let mut out = Vec::new();

        input.handle(&["w", "mystery", "ArrowLeft"], &mut out);

        assert_eq!(
            out,
            vec![
                Command::RequestHeading {
                    heading: Heading::North,
                },
                Command::RequestHeading {
                    heading: Heading::West,
                },
            ]
        );
    }
}
