//! Crawl worklist
//!
//! A LIFO stack of `{path, depth}` entries. Children are pushed in reverse so
//! they pop in document order, giving the same visiting order as a
//! depth-first recursion over the page's links.

/// One unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub path: String,
    pub depth: u32,
}

/// Explicit depth-first worklist for a single domain
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding a single starting entry
    pub fn seeded(path: &str, depth: u32) -> Self {
        let mut frontier = Self::new();
        frontier.push(path.to_string(), depth);
        frontier
    }

    pub fn push(&mut self, path: String, depth: u32) {
        self.stack.push(FrontierEntry { path, depth });
    }

    /// Queues the links of one page so the first link is visited next
    pub fn push_children(&mut self, paths: Vec<String>, depth: u32) {
        for path in paths.into_iter().rev() {
            self.push(path, depth);
        }
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
