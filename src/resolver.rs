//! Sprite resolver policies for the playback engine.
//!
//! Engines resolve visual resources (sprites, frames) by name while loading
//! a template. The node does not consume resources itself; it only defines
//! the function type an engine should accept and the two standard lookup
//! policies hosts use:
//!
//! - [`direct`] – resolve by the exact name the engine asks for
//! - [`by_basename`] – resolve the trailing path segment against a cache of
//!   pre-registered resources (engines often carry full relative paths
//!   while hosts register assets under short names)

use rustc_hash::FxHashMap;

/// Resolver function injected into a playback engine at construction.
///
/// Returns `None` when the resource is unknown; engines are expected to
/// tolerate that and skip the visual.
pub type SpriteResolver<R> = Box<dyn FnMut(&str) -> Option<R> + Send>;

/// Resolve resources by exact name through the given lookup.
pub fn direct<R, F>(mut lookup: F) -> SpriteResolver<R>
where
    F: FnMut(&str) -> Option<R> + Send + 'static,
{
    Box::new(move |name| lookup(name))
}

/// Resolve resources by the trailing `/`-segment of the requested name
/// against a pre-registered cache.
///
/// `"sprites/hero/walk.png"` resolves through the cache key `"walk.png"`.
/// A name with no `/` is looked up as-is.
pub fn by_basename<R>(cache: FxHashMap<String, R>) -> SpriteResolver<R>
where
    R: Clone + Send + 'static,
{
    Box::new(move |name| {
        let basename = name.rsplit('/').next().unwrap_or(name);
        cache.get(basename).cloned()
    })
}
