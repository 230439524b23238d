//! The [`Profunctor`] interface: types that consume `In` and produce `Out`.

use std::convert::identity;

/// A container that can be pre-composed on its input and post-composed on its
/// output at the same time.
///
/// [`dimap`](Profunctor::dimap) is the only required method; implementations
/// must satisfy
///
/// - identity: `p.dimap(Clone::clone, identity)` behaves like `p`;
/// - composition: `p.dimap(f1, g1).dimap(f2, g2)` behaves like
///   `p.dimap(|c| f1(&f2(c)), |b| g2(g1(b)))`.
pub trait Profunctor {
    type In: 'static;
    type Out: 'static;
    type Mapped<C: 'static, D: 'static>;

    fn dimap<C, D, F, G>(&self, f: F, g: G) -> Self::Mapped<C, D>
    where
        C: 'static,
        D: 'static,
        F: Fn(&C) -> Self::In + Send + Sync + 'static,
        G: Fn(Self::Out) -> D + Send + Sync + 'static;

    /// Pre-composes on the input only.
    fn lmap<C, F>(&self, f: F) -> Self::Mapped<C, Self::Out>
    where
        C: 'static,
        F: Fn(&C) -> Self::In + Send + Sync + 'static,
    {
        self.dimap(f, identity)
    }

    /// Post-composes on the output only.
    fn rmap<D, G>(&self, g: G) -> Self::Mapped<Self::In, D>
    where
        D: 'static,
        Self::In: Clone,
        G: Fn(Self::Out) -> D + Send + Sync + 'static,
    {
        self.dimap(<Self::In as Clone>::clone, g)
    }
}
