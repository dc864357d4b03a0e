use std::collections::HashMap;

use super::{SerializeArgs, Serializer};

type Handler<'a, R> = Box<dyn Fn(&SerializeArgs<'_, R>) -> Option<R> + 'a>;

/// Per-type handlers keyed by node name.
///
/// Keys are storage names (`paragraph`, `hyperlink`, ...) except for the list
/// kinds, which use `list`, `oList`, `listItem` and `oListItem`.
pub struct MapSerializer<'a, R> {
    handlers: HashMap<String, Handler<'a, R>>,
}

impl<R> std::fmt::Debug for MapSerializer<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("MapSerializer").field("keys", &keys).finish()
    }
}

impl<R> Default for MapSerializer<'_, R> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<'a, R> MapSerializer<'a, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `name`, replacing any previous handler.
    pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&SerializeArgs<'_, R>) -> Option<R> + 'a,
    {
        self.insert(name, handler);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&SerializeArgs<'_, R>) -> Option<R> + 'a,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

/// A [`MapSerializer`] adapted to the single-function [`Serializer`] shape.
#[derive(Debug)]
pub struct WrappedMapSerializer<'a, R> {
    map: MapSerializer<'a, R>,
}

/// Adapts a lookup table into a serializer.
///
/// Kinds without a handler yield `None`, so the result composes with other
/// serializers that cover them.
pub fn wrap_map_serializer<R>(map: MapSerializer<'_, R>) -> WrappedMapSerializer<'_, R> {
    WrappedMapSerializer { map }
}

impl<R> Serializer<R> for WrappedMapSerializer<'_, R> {
    fn serialize(&self, args: &SerializeArgs<'_, R>) -> Option<R> {
        let handler = self.map.handlers.get(args.kind.map_key())?;
        handler(args)
    }
}
