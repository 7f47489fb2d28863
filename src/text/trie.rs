//! Prefix trie with unique-prefix detection.
//!
//! Every node tracks how many stored keys end strictly below it. A node whose
//! subtree holds exactly one key, or whose children hold none, is the shortest
//! prefix that tells its keys apart from the rest of the trie.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

struct Node<T> {
    children: BTreeMap<char, Node<T>>,
    terminal: bool,
    payload: Option<T>,
    /// Terminal nodes strictly below this one.
    terminal_descendants: usize,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            terminal: false,
            payload: None,
            terminal_descendants: 0,
        }
    }
}

impl<T> Node<T> {
    fn find(&self, key: &str) -> Option<&Node<T>> {
        key.chars()
            .try_fold(self, |node, c| node.children.get(&c))
    }

    /// Shortest-prefix condition used by [`Trie::prefixes`].
    fn is_unique_prefix(&self) -> bool {
        self.terminal_descendants == 1
            || self
                .children
                .values()
                .all(|child| child.terminal_descendants == 0)
    }
}

type Validator = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// An ordered prefix trie over `String` keys with an optional payload per key
pub struct Trie<T = ()> {
    root: Node<T>,
    len: usize,
    validator: Option<Validator>,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Trie<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries("")).finish()
    }
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
            validator: None,
        }
    }

    /// A trie that silently ignores keys for which `validator` returns false
    pub fn with_validation<F>(validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            validator: Some(Box::new(validator)),
            ..Self::new()
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = Node::default();
        self.len = 0;
    }

    fn accepts(&self, key: &str) -> bool {
        self.validator.as_ref().is_none_or(|valid| valid(key))
    }

    /// Store `key` without a payload. Returns true if the key is new.
    pub fn add(&mut self, key: &str) -> bool {
        // a key without a payload can never collide
        self.insert(key, None).unwrap_or(false)
    }

    /// Store `key`, attaching `payload` when given.
    ///
    /// Returns true if the key is new. Supplying a payload for a key that
    /// already carries one is a [`Error::DuplicateKey`] and leaves the trie
    /// unchanged. The empty key and keys rejected by the validator are
    /// ignored.
    pub fn insert(&mut self, key: &str, payload: Option<T>) -> Result<bool> {
        if key.is_empty() || !self.accepts(key) {
            return Ok(false);
        }

        let existing = self.root.find(key);
        if payload.is_some() && existing.is_some_and(|node| node.payload.is_some()) {
            return Err(Error::DuplicateKey(key.to_string()));
        }
        let is_new = !existing.is_some_and(|node| node.terminal);

        let mut node = &mut self.root;
        for c in key.chars() {
            if is_new {
                node.terminal_descendants += 1;
            }
            node = node.children.entry(c).or_default();
        }
        node.terminal = true;
        if payload.is_some() {
            node.payload = payload;
        }

        if is_new {
            self.len += 1;
        }
        Ok(is_new)
    }

    /// Remove `key` and its payload, pruning nodes left without keys.
    /// Returns true if the key was stored.
    pub fn remove(&mut self, key: &str) -> bool {
        let chars: Vec<char> = key.chars().collect();
        let removed = Self::remove_from(&mut self.root, &chars);
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn remove_from(node: &mut Node<T>, key: &[char]) -> bool {
        let Some((c, rest)) = key.split_first() else {
            if !node.terminal {
                return false;
            }
            node.terminal = false;
            node.payload = None;
            return true;
        };

        let Some(child) = node.children.get_mut(c) else {
            return false;
        };
        if !Self::remove_from(child, rest) {
            return false;
        }
        if !child.terminal && child.children.is_empty() {
            node.children.remove(c);
        }
        node.terminal_descendants -= 1;
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.root.find(key).is_some_and(|node| node.terminal)
    }

    /// Payload stored for `key`, if any
    pub fn get(&self, key: &str) -> Option<&T> {
        self.root
            .find(key)
            .filter(|node| node.terminal)
            .and_then(|node| node.payload.as_ref())
    }

    /// Stored keys under `prefix` in lexicographic order.
    ///
    /// An empty prefix covers the whole trie; an unknown prefix yields nothing.
    pub fn values<'a>(&'a self, prefix: &str) -> impl Iterator<Item = String> + use<'a, T> {
        self.walk(prefix, false).map(|(key, _)| key)
    }

    /// Stored keys under `prefix` paired with their payloads.
    pub fn entries<'a>(
        &'a self,
        prefix: &str,
    ) -> impl Iterator<Item = (String, Option<&'a T>)> + use<'a, T> {
        self.walk(prefix, false)
            .map(|(key, node)| (key, node.payload.as_ref()))
    }

    /// Payloads of the keys under `prefix`, skipping keys stored without one.
    pub fn payloads<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a T> + use<'a, T> {
        self.walk(prefix, false)
            .filter_map(|(_, node)| node.payload.as_ref())
    }

    /// Shortest unique prefixes under `prefix`, in lexicographic order.
    pub fn prefixes<'a>(&'a self, prefix: &str) -> impl Iterator<Item = String> + use<'a, T> {
        self.walk(prefix, true).map(|(key, _)| key)
    }

    fn walk<'a>(&'a self, prefix: &str, unique_prefixes: bool) -> Walk<'a, T> {
        let mut stack = Vec::new();
        if prefix.is_empty() {
            push_children(&mut stack, &self.root, "");
        } else if let Some(node) = self.root.find(prefix) {
            stack.push((prefix.to_string(), node));
        }
        Walk {
            stack,
            unique_prefixes,
        }
    }
}

fn push_children<'a, T>(stack: &mut Vec<(String, &'a Node<T>)>, node: &'a Node<T>, key: &str) {
    for (&c, child) in node.children.iter().rev() {
        let mut child_key = String::with_capacity(key.len() + c.len_utf8());
        child_key.push_str(key);
        child_key.push(c);
        stack.push((child_key, child));
    }
}

/// Depth-first pre-order traversal; children are visited in character order.
struct Walk<'a, T> {
    stack: Vec<(String, &'a Node<T>)>,
    unique_prefixes: bool,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = (String, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((key, node)) = self.stack.pop() {
            if self.unique_prefixes {
                if node.is_unique_prefix() {
                    return Some((key, node));
                }
                push_children(&mut self.stack, node, &key);
            } else {
                push_children(&mut self.stack, node, &key);
                if node.terminal {
                    return Some((key, node));
                }
            }
        }
        None
    }
}
