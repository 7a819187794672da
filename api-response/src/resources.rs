//! Item transformers for paginated responses
//!
//! A [`Mapper`] says how paginated items are turned into JSON before they are
//! embedded in the envelope. It is resolved once, at the call boundary:
//!
//! - [`Mapper::None`] - items are serialized as they are
//! - [`Mapper::Callable`] - a closure is applied to every item
//! - [`Mapper::Resource`] - a [`Transformer`] converts the whole collection
//! - [`Mapper::Named`] - a transformer looked up by name in a
//!   [`TransformerRegistry`]; unknown names fail with
//!   [`Error::InvalidMapper`]
//!
//! ## Example
//!
//! ```rust
//! use api_response::resources::{Mapper, Resource, TransformerRegistry};
//! use serde_json::{json, Value};
//!
//! struct UserResource;
//!
//! impl Resource for UserResource {
//!     const NAME: &'static str = "UserResource";
//!
//!     fn to_value(item: Value) -> Value {
//!         json!({ "name": item })
//!     }
//! }
//!
//! let registry = TransformerRegistry::new().with_resource::<UserResource>();
//! assert!(registry.contains("UserResource"));
//!
//! let _by_type: Mapper<String> = Mapper::resource::<UserResource>();
//! let _by_name: Mapper<String> = Mapper::named("UserResource");
//! let _by_closure: Mapper<String> = Mapper::callable(|name: &String| name.to_uppercase());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Converts a collection of serialized items
pub trait Transformer: Send + Sync {
    /// Transform every item. Implementations keep order and length.
    fn collection(&self, items: Vec<Value>) -> Vec<Value>;
}

impl<F> Transformer for F
where
    F: Fn(Vec<Value>) -> Vec<Value> + Send + Sync,
{
    fn collection(&self, items: Vec<Value>) -> Vec<Value> {
        self(items)
    }
}

/// A type that knows how to present one item as JSON
///
/// The static counterpart of [`Transformer`]. `NAME` is the key used when the
/// resource is registered in a [`TransformerRegistry`].
pub trait Resource {
    /// Registry name of the resource
    const NAME: &'static str;

    /// Present a single item
    fn to_value(item: Value) -> Value;

    /// Present a collection of items
    fn collection(items: Vec<Value>) -> Vec<Value> {
        items.into_iter().map(Self::to_value).collect()
    }
}

struct ResourceTransformer<R>(PhantomData<fn() -> R>);

impl<R: Resource> Transformer for ResourceTransformer<R> {
    fn collection(&self, items: Vec<Value>) -> Vec<Value> {
        R::collection(items)
    }
}

fn resource_transformer<R: Resource + 'static>() -> Arc<dyn Transformer> {
    Arc::new(ResourceTransformer::<R>(PhantomData))
}

// ============================================================================
// Registry
// ============================================================================

/// Named transformers available to [`Mapper::Named`]
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a [`Resource`] under its `NAME`
    pub fn register<R: Resource + 'static>(&mut self) {
        self.insert(R::NAME, resource_transformer::<R>());
    }

    /// Register a [`Resource`] under its `NAME`, builder style
    #[must_use]
    pub fn with_resource<R: Resource + 'static>(mut self) -> Self {
        self.register::<R>();
        self
    }

    /// Register an arbitrary transformer under `name`
    pub fn insert(&mut self, name: impl Into<String>, transformer: Arc<dyn Transformer>) {
        self.transformers.insert(name.into(), transformer);
    }

    /// Look up a transformer by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Transformer>> {
        self.transformers.get(name).cloned()
    }

    /// Check if a transformer is registered under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.transformers.contains_key(name)
    }

    /// Number of registered transformers
    #[must_use]
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TransformerRegistry")
            .field("transformers", &names)
            .finish()
    }
}

// ============================================================================
// Mapper
// ============================================================================

type ItemFn<T> = Box<dyn Fn(&T) -> serde_json::Result<Value> + Send + Sync>;

/// How paginated items of type `T` become JSON
pub enum Mapper<T> {
    /// Serialize items unchanged
    None,
    /// Apply a function to every item
    Callable(ItemFn<T>),
    /// Hand the serialized items to a transformer
    Resource(Arc<dyn Transformer>),
    /// Look up a transformer by name when the mapper is applied
    Named(String),
}

impl<T> Default for Mapper<T> {
    fn default() -> Self {
        Mapper::None
    }
}

impl<T> fmt::Debug for Mapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mapper::None => f.write_str("Mapper::None"),
            Mapper::Callable(_) => f.write_str("Mapper::Callable(..)"),
            Mapper::Resource(_) => f.write_str("Mapper::Resource(..)"),
            Mapper::Named(name) => f.debug_tuple("Mapper::Named").field(name).finish(),
        }
    }
}

impl<T> Mapper<T> {
    /// Map every item with `f`; the result only needs to be serializable
    pub fn callable<F, U>(f: F) -> Self
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
        U: Serialize,
    {
        Mapper::Callable(Box::new(move |item| serde_json::to_value(f(item))))
    }

    /// Transform items with the [`Resource`] type `R`
    pub fn resource<R: Resource + 'static>() -> Self {
        Mapper::Resource(resource_transformer::<R>())
    }

    /// Transform items with an arbitrary transformer
    pub fn transformer(transformer: impl Transformer + 'static) -> Self {
        Mapper::Resource(Arc::new(transformer))
    }

    /// Transform items with the transformer registered under `name`
    pub fn named(name: impl Into<String>) -> Self {
        Mapper::Named(name.into())
    }
}

impl<T: Serialize> Mapper<T> {
    /// Turn `items` into JSON values
    ///
    /// Named transformers are resolved before any item is touched, so an
    /// unknown name fails without doing work.
    pub fn apply(self, items: &[T], registry: &TransformerRegistry) -> Result<Vec<Value>> {
        match self {
            Mapper::None => to_values(items),
            Mapper::Callable(f) => items
                .iter()
                .map(|item| f(item).map_err(Error::from))
                .collect(),
            Mapper::Resource(transformer) => Ok(transformer.collection(to_values(items)?)),
            Mapper::Named(name) => {
                let Some(transformer) = registry.get(&name) else {
                    tracing::warn!(mapper = %name, "Invalid mapper provided");
                    return Err(Error::InvalidMapper(name));
                };
                Ok(transformer.collection(to_values(items)?))
            }
        }
    }
}

fn to_values<T: Serialize>(items: &[T]) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(Error::from))
        .collect()
}
