//! Visual identity bookkeeping across frame boundaries.

use image::Rgb;
use rand::Rng;

use crate::tracker::matching::Association;

/// Display colour attached to a tracked object.
pub type IdentityColor = Rgb<u8>;

/// Ordered identity tokens, one per object at the start of tracking.
///
/// Entry `i` belongs to the object at index `i` of the current region
/// sequence. The ledger is only ever reordered or shortened, never grown, so
/// later frames may carry more regions than identities.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityLedger<T = IdentityColor> {
    tokens: Vec<T>,
}

impl IdentityLedger<IdentityColor> {
    /// One random colour per object, components in `0..255`.
    pub fn random<R: Rng>(count: usize, rng: &mut R) -> Self {
        let tokens = (0..count)
            .map(|_| Rgb([rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255)]))
            .collect();
        Self { tokens }
    }
}

impl<T: Clone> IdentityLedger<T> {
    pub fn from_tokens(tokens: Vec<T>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Identity of the object at `index`, if it still has one.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.tokens.get(index)
    }

    /// Apply a continuity association of `truth_len` previous objects.
    ///
    /// When every previous object was paired the ledger is left alone.
    /// Otherwise it is rebuilt in candidate order: for each pair, sorted by
    /// candidate index, the token at the pair's truth index is kept. Tokens of
    /// unpaired objects are dropped. Returns whether the ledger changed.
    pub fn reconcile(&mut self, continuity: &Association, truth_len: usize) -> bool {
        if continuity.len() >= truth_len {
            return false;
        }

        let mut pairs = continuity.pairs.clone();
        pairs.sort_by_key(|&(_, cand)| cand);
        self.tokens = pairs
            .iter()
            .filter_map(|&(truth, _)| self.tokens.get(truth).cloned())
            .collect();
        true
    }
}
