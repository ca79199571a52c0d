// src/asset.rs

//! Assets: observable pieces of state and the predicates that test them.
//!
//! An [`Asset`] pairs an opaque reference (a path, URL, in-memory slot --
//! anything a downstream task may want to address) with a zero-argument
//! readiness predicate. The predicate must be safe to call repeatedly and
//! must not mutate external state; the engine treats back-to-back calls as
//! independent queries.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Opaque, shareable asset reference.
pub type Ref = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub struct Asset {
    ref_: Ref,
    ready: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Asset {
    /// Create an asset from a reference value and a readiness predicate.
    pub fn new<R, F>(ref_: R, ready: F) -> Self
    where
        R: Any + Send + Sync,
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            ref_: Arc::new(ref_),
            ready: Arc::new(ready),
        }
    }

    /// A filesystem asset: the reference is the `PathBuf`, readiness is
    /// "a regular file exists at that path".
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let probe = path.clone();
        Self::new(path, move || probe.is_file())
    }

    /// A directory asset, for tasks whose product is a directory.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let probe = path.clone();
        Self::new(path, move || probe.is_dir())
    }

    /// Query the readiness predicate.
    pub fn ready(&self) -> bool {
        (self.ready)()
    }

    /// The opaque reference.
    pub fn ref_(&self) -> Ref {
        Arc::clone(&self.ref_)
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset").finish_non_exhaustive()
    }
}

/// Container of a task's assets. The shape (scalar, sequence, or mapping)
/// is part of the task's contract and is preserved by the [`Refs`]
/// projection.
#[derive(Clone, Debug, Default)]
pub enum Assets {
    #[default]
    Empty,
    One(Asset),
    List(Vec<Asset>),
    Map(BTreeMap<String, Asset>),
}

impl Assets {
    pub fn is_empty(&self) -> bool {
        match self {
            Assets::Empty => true,
            Assets::One(_) => false,
            Assets::List(assets) => assets.is_empty(),
            Assets::Map(assets) => assets.is_empty(),
        }
    }

    /// Collapse the container into a flat list, discarding shape.
    pub fn flatten(&self) -> Vec<Asset> {
        match self {
            Assets::Empty => Vec::new(),
            Assets::One(asset) => vec![asset.clone()],
            Assets::List(assets) => assets.clone(),
            Assets::Map(assets) => assets.values().cloned().collect(),
        }
    }

    /// Conjunction of the contained predicates. Empty containers are
    /// trivially ready.
    pub fn all_ready(&self) -> bool {
        self.flatten().iter().all(Asset::ready)
    }

    /// Shape-preserving projection onto the references.
    pub fn refs(&self) -> Refs {
        match self {
            Assets::Empty => Refs::Empty,
            Assets::One(asset) => Refs::One(asset.ref_()),
            Assets::List(assets) => Refs::List(assets.iter().map(Asset::ref_).collect()),
            Assets::Map(assets) => Refs::Map(
                assets
                    .iter()
                    .map(|(k, a)| (k.clone(), a.ref_()))
                    .collect(),
            ),
        }
    }
}

impl From<Asset> for Assets {
    fn from(asset: Asset) -> Self {
        Assets::One(asset)
    }
}

impl From<Vec<Asset>> for Assets {
    fn from(assets: Vec<Asset>) -> Self {
        Assets::List(assets)
    }
}

impl<const N: usize> From<[Asset; N]> for Assets {
    fn from(assets: [Asset; N]) -> Self {
        Assets::List(assets.into())
    }
}

impl From<BTreeMap<String, Asset>> for Assets {
    fn from(assets: BTreeMap<String, Asset>) -> Self {
        Assets::Map(assets)
    }
}

impl From<Option<Asset>> for Assets {
    fn from(asset: Option<Asset>) -> Self {
        match asset {
            Some(asset) => Assets::One(asset),
            None => Assets::Empty,
        }
    }
}

impl From<()> for Assets {
    fn from(_: ()) -> Self {
        Assets::Empty
    }
}

/// Asset references in the same shape as the assets they came from.
#[derive(Clone)]
pub enum Refs {
    Empty,
    One(Ref),
    List(Vec<Ref>),
    Map(BTreeMap<String, Ref>),
}

impl Refs {
    /// The scalar reference, if the container is scalar.
    pub fn one(&self) -> Option<Ref> {
        match self {
            Refs::One(r) => Some(Arc::clone(r)),
            _ => None,
        }
    }

    /// Positional lookup into a sequence-shaped container.
    pub fn at(&self, index: usize) -> Option<Ref> {
        match self {
            Refs::List(refs) => refs.get(index).map(Arc::clone),
            _ => None,
        }
    }

    /// Keyed lookup into a mapping-shaped container.
    pub fn get(&self, key: &str) -> Option<Ref> {
        match self {
            Refs::Map(refs) => refs.get(key).map(Arc::clone),
            _ => None,
        }
    }
}

impl fmt::Debug for Refs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refs::Empty => f.write_str("Refs::Empty"),
            Refs::One(_) => f.write_str("Refs::One(..)"),
            Refs::List(refs) => write!(f, "Refs::List(len={})", refs.len()),
            Refs::Map(refs) => {
                let keys: Vec<&str> = refs.keys().map(String::as_str).collect();
                write!(f, "Refs::Map(keys={keys:?})")
            }
        }
    }
}
