//! PrefixTree: sequence map over owned nodes
//!
//! Each node owns its children in a small vector searched linearly with the
//! tree's comparer. A node holding a value marks the end of a stored
//! sequence. Removal unmarks the node and prunes the chain of nodes that no
//! longer lead anywhere, stopping at the first ancestor that still ends a
//! sequence or branches.
//!
//! Nodes are torn down iteratively, so very long sequences never recurse in
//! `Drop`.

use crate::hash_map::{DefaultComparer, EqualityComparer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::slice;

/// One node of a [`PrefixTree`].
pub struct PrefixNode<K, V> {
    key: Option<K>,
    value: Option<V>,
    children: Vec<PrefixNode<K, V>>,
}

impl<K, V> PrefixNode<K, V> {
    fn root() -> Self {
        Self {
            key: None,
            value: None,
            children: Vec::new(),
        }
    }

    fn with_key(key: K) -> Self {
        Self {
            key: Some(key),
            value: None,
            children: Vec::new(),
        }
    }

    /// Element leading to this node, `None` at the root.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Value of the sequence ending here.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Mutable value, present only on end markers.
    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    /// Whether a stored sequence ends at this node.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.value.is_some()
    }

    /// Child nodes, in no particular order.
    #[inline]
    pub fn children(&self) -> slice::Iter<'_, PrefixNode<K, V>> {
        self.children.iter()
    }

    /// Number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn position<C: EqualityComparer<K>>(&self, comparer: &C, key: &K) -> Option<usize> {
        self.children
            .iter()
            .position(|child| matches!(&child.key, Some(k) if comparer.equals(k, key)))
    }
}

impl<K, V> Drop for PrefixNode<K, V> {
    fn drop(&mut self) {
        let mut stack = mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PrefixNode<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixNode")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("children", &self.children.len())
            .finish()
    }
}

/// Map from sequences of `K` to `V`; use `V = ()` for a set of sequences.
///
/// # Examples
///
/// ```rust
/// use allocopt::PrefixTree;
///
/// let mut words = PrefixTree::new();
/// words.try_add("cat".chars(), ());
/// words.try_add("car".chars(), ());
///
/// assert!(words.remove("cat".chars()));
/// assert!(!words.contains("cat".chars()));
/// assert!(words.contains("car".chars()));
/// assert!(words.contains_prefix("ca".chars()));
/// ```
pub struct PrefixTree<K, V, C = DefaultComparer> {
    root: PrefixNode<K, V>,
    len: usize,
    nodes: usize,
    comparer: C,
}

impl<K: Hash + Eq, V> PrefixTree<K, V> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer::new())
    }
}

/// Walk `seq` from `node`, creating missing children. Free-standing so the
/// caller keeps access to the tree's other fields.
fn descend_or_create<'a, K, V, C, I>(
    mut node: &'a mut PrefixNode<K, V>,
    comparer: &C,
    nodes: &mut usize,
    seq: I,
) -> &'a mut PrefixNode<K, V>
where
    C: EqualityComparer<K>,
    I: IntoIterator<Item = K>,
{
    for key in seq {
        let index = match node.position(comparer, &key) {
            Some(index) => index,
            None => {
                node.children.push(PrefixNode::with_key(key));
                *nodes += 1;
                node.children.len() - 1
            }
        };
        node = &mut node.children[index];
    }
    node
}

impl<K, V, C: EqualityComparer<K>> PrefixTree<K, V, C> {
    /// Create an empty tree comparing elements through `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            root: PrefixNode::root(),
            len: 0,
            nodes: 0,
            comparer,
        }
    }

    /// Stored sequences.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no sequence is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nodes below the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// The root node, keyed by no element.
    #[inline]
    pub fn root(&self) -> &PrefixNode<K, V> {
        &self.root
    }

    /// Node at the end of `seq`, creating the path as needed and marking it
    /// as a stored sequence with `V::default()` if it was not one already.
    pub fn get_or_add<I>(&mut self, seq: I) -> &mut PrefixNode<K, V>
    where
        I: IntoIterator<Item = K>,
        V: Default,
    {
        let node = descend_or_create(&mut self.root, &self.comparer, &mut self.nodes, seq);
        if node.value.is_none() {
            node.value = Some(V::default());
            self.len += 1;
        }
        node
    }

    /// Store `seq` unless present; returns whether it was added.
    pub fn try_add<I>(&mut self, seq: I, value: V) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let node = descend_or_create(&mut self.root, &self.comparer, &mut self.nodes, seq);
        if node.value.is_some() {
            return false;
        }
        node.value = Some(value);
        self.len += 1;
        true
    }

    /// Store `seq` with `value`, returning the value it replaced.
    pub fn insert<I>(&mut self, seq: I, value: V) -> Option<V>
    where
        I: IntoIterator<Item = K>,
    {
        let node = descend_or_create(&mut self.root, &self.comparer, &mut self.nodes, seq);
        let old = node.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Node reached by `seq`, whether or not a sequence ends there.
    pub fn find<I>(&self, seq: I) -> Option<&PrefixNode<K, V>>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let mut node = &self.root;
        for key in seq {
            let index = node.position(&self.comparer, key.borrow())?;
            node = &node.children[index];
        }
        Some(node)
    }

    fn find_mut<I>(&mut self, seq: I) -> Option<&mut PrefixNode<K, V>>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let mut node = &mut self.root;
        for key in seq {
            let index = node.position(&self.comparer, key.borrow())?;
            node = &mut node.children[index];
        }
        Some(node)
    }

    /// Value stored for exactly `seq`.
    pub fn get<I>(&self, seq: I) -> Option<&V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.find(seq)?.value.as_ref()
    }

    /// Mutable value stored for `seq`.
    pub fn get_mut<I>(&mut self, seq: I) -> Option<&mut V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.find_mut(seq)?.value.as_mut()
    }

    /// Whether exactly `seq` is stored.
    pub fn contains<I>(&self, seq: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.get(seq).is_some()
    }

    /// Whether some stored sequence starts with `prefix`.
    pub fn contains_prefix<I>(&self, prefix: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        match self.find(prefix) {
            Some(node) => node.is_end() || !node.children.is_empty(),
            None => false,
        }
    }

    /// Remove `seq`; returns whether it was stored.
    pub fn remove<I>(&mut self, seq: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.take(seq).is_some()
    }

    /// Remove `seq` and return its value, pruning nodes left without purpose.
    pub fn take<I>(&mut self, seq: I) -> Option<V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        // Child positions along the path, and the depth of the deepest
        // ancestor that must survive: the root, an end marker, or a branch.
        let mut path = Vec::new();
        let mut keep = 0;
        let mut node = &self.root;
        for key in seq {
            if node.is_end() || node.children.len() > 1 {
                keep = path.len();
            }
            let index = node.position(&self.comparer, key.borrow())?;
            path.push(index);
            node = &node.children[index];
        }
        if !node.is_end() {
            return None;
        }

        let value = if !path.is_empty() && node.children.is_empty() {
            let mut anchor = &mut self.root;
            for &index in &path[..keep] {
                anchor = &mut anchor.children[index];
            }
            let mut detached = anchor.children.swap_remove(path[keep]);
            let mut tail = &mut detached;
            for &index in &path[keep + 1..] {
                tail = &mut tail.children[index];
            }
            let value = tail.value.take();
            self.nodes -= path.len() - keep;
            value
        } else {
            let mut target = &mut self.root;
            for &index in &path {
                target = &mut target.children[index];
            }
            target.value.take()
        };

        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    /// Remove every sequence.
    pub fn clear(&mut self) {
        self.root = PrefixNode::root();
        self.len = 0;
        self.nodes = 0;
    }

    /// Depth-first iteration over `(sequence, value)`.
    pub fn iter(&self) -> Iter<'_, K, V>
    where
        K: Clone,
    {
        Iter {
            stack: vec![(&self.root, 0)],
            path: Vec::new(),
            remaining: self.len,
        }
    }

    /// Depth-first iteration over stored sequences starting with `prefix`.
    pub fn iter_prefix<I>(&self, prefix: I) -> Iter<'_, K, V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
        K: Clone,
    {
        let mut path = Vec::new();
        let mut node = Some(&self.root);
        for key in prefix {
            let key = key.borrow();
            node = node.and_then(|n| n.position(&self.comparer, key).map(|i| &n.children[i]));
            path.push(key.clone());
        }
        let depth = path.len();
        Iter {
            stack: node.map(|n| (n, depth)).into_iter().collect(),
            path,
            remaining: if node.is_some() { self.len } else { 0 },
        }
    }
}

impl<K: Hash + Eq, V> Default for PrefixTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug + Clone, V: fmt::Debug, C: EqualityComparer<K>> fmt::Debug for PrefixTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, C> FromIterator<(S, V)> for PrefixTree<K, V, C>
where
    S: IntoIterator<Item = K>,
    C: EqualityComparer<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut tree = Self::with_comparer(C::default());
        for (seq, value) in iter {
            tree.insert(seq, value);
        }
        tree
    }
}

/// Depth-first iterator over a [`PrefixTree`].
///
/// Yields each stored sequence as an owned `Vec<K>` with its value.
pub struct Iter<'a, K, V> {
    stack: Vec<(&'a PrefixNode<K, V>, usize)>,
    path: Vec<K>,
    /// Upper bound; exact for whole-tree iteration.
    remaining: usize,
}

impl<'a, K: Clone, V> Iterator for Iter<'a, K, V> {
    type Item = (Vec<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            if depth > 0 {
                self.path.truncate(depth - 1);
                if let Some(key) = &node.key {
                    self.path.push(key.clone());
                }
            }
            self.stack
                .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
            if let Some(value) = &node.value {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((self.path.clone(), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
