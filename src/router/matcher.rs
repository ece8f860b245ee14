//! Trie walk for request lookup
//!
//! At every level children are tried strictly in this order:
//!
//! 1. static child whose text equals the segment
//! 2. `Int` parameter child
//! 3. `Float` parameter child
//! 4. `String` parameter child
//! 5. wildcard (consumes the rest of the path)
//!
//! The first branch that reaches a terminal route exactly when the segments
//! run out wins; a dead end backtracks to the nearest ancestor with untried
//! alternatives. The walk keeps its own frame stack (one frame per consumed
//! segment), so stack usage does not grow with path depth.

// Hot path: no per-lookup String allocation
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::unnecessary_to_owned)]

use smallvec::SmallVec;

use super::pattern::{self, Constraint};
use super::radix::Node;

/// Segments kept inline before the walk spills to the heap
const INLINE_DEPTH: usize = 16;

/// Captured values before spilling, see [`super::core::MAX_INLINE_PARAMS`]
pub(crate) type Captures<'p> = SmallVec<[&'p str; super::core::MAX_INLINE_PARAMS]>;

/// A request path cut into segments, remembering where each one starts so a
/// wildcard can capture the raw remainder
pub(crate) struct PathSegments<'p> {
    body: &'p str,
    segments: SmallVec<[&'p str; INLINE_DEPTH]>,
    starts: SmallVec<[usize; INLINE_DEPTH]>,
}

impl<'p> PathSegments<'p> {
    pub(crate) fn new(path: &'p str) -> Self {
        let body = pattern::segment_body(path);
        let mut segments = SmallVec::new();
        let mut starts = SmallVec::new();
        let mut offset = 0;
        for segment in pattern::split_segments(path) {
            starts.push(offset);
            segments.push(segment);
            offset += segment.len() + 1;
        }
        Self {
            body,
            segments,
            starts,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    /// Raw text from segment `index` to the end of the path
    fn has_text_from(&self, index: usize) -> bool {
        self.segments
            .get(index..)
            .is_some_and(|rest| rest.iter().any(|segment| !segment.is_empty()))
    }

    fn rest(&self, index: usize) -> &'p str {
        &self.body[self.starts[index]..]
    }
}

/// Which alternative a frame tries next
#[derive(Debug, Clone, Copy)]
enum Next {
    Static,
    /// Index into [`Constraint::PRIORITY`]
    Param(usize),
    Wildcard,
    Exhausted,
}

struct Frame<'r> {
    node: &'r Node,
    next: Next,
    /// Capture count to restore when this frame is popped
    restore: usize,
}

impl<'r> Frame<'r> {
    fn enter(node: &'r Node, restore: usize) -> Self {
        Self {
            node,
            next: Next::Static,
            restore,
        }
    }
}

/// Successful walk: route index plus captured values in pattern order
#[derive(Debug)]
pub(crate) struct Found<'p> {
    pub(crate) route: usize,
    pub(crate) captures: Captures<'p>,
}

/// Walk the trie rooted at `root` for `path`
pub(crate) fn walk<'r, 'p>(root: &'r Node, path: &PathSegments<'p>) -> Option<Found<'p>> {
    let mut stack: SmallVec<[Frame<'r>; INLINE_DEPTH]> = SmallVec::new();
    stack.push(Frame::enter(root, 0));
    let mut captures = Captures::new();

    loop {
        let depth = stack.len().checked_sub(1)?;
        let frame = &mut stack[depth];
        let node = frame.node;

        if depth == path.len() {
            if let Some(route) = node.route {
                return Some(Found { route, captures });
            }
            let restore = frame.restore;
            stack.pop();
            captures.truncate(restore);
            continue;
        }

        let segment = path.segments[depth];
        match frame.next {
            Next::Static => {
                frame.next = Next::Param(0);
                if let Some(child) = node.statics.get(segment) {
                    stack.push(Frame::enter(child, captures.len()));
                }
            }
            Next::Param(i) => {
                frame.next = if i + 1 < Constraint::PRIORITY.len() {
                    Next::Param(i + 1)
                } else {
                    Next::Wildcard
                };
                let constraint = Constraint::PRIORITY[i];
                if let Some(child) = node.param_child(constraint) {
                    if constraint.accepts(segment) {
                        let restore = captures.len();
                        captures.push(segment);
                        stack.push(Frame::enter(child, restore));
                    }
                }
            }
            Next::Wildcard => {
                frame.next = Next::Exhausted;
                if let Some(route) = node.wildcard {
                    // at least one remaining segment must carry text
                    if path.has_text_from(depth) {
                        captures.push(path.rest(depth));
                        return Some(Found { route, captures });
                    }
                }
            }
            Next::Exhausted => {
                let restore = frame.restore;
                stack.pop();
                captures.truncate(restore);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::radix::RouteTable;

    fn root(routes: &[&str]) -> RouteTable<usize> {
        let mut table = RouteTable::default();
        for (id, pattern) in routes.iter().enumerate() {
            table.insert("GET".to_string(), None, pattern, id).unwrap();
        }
        table
    }

    fn find<'p>(table: &RouteTable<usize>, path: &'p str) -> Option<(usize, Vec<&'p str>)> {
        let node = &table.bucket("GET")?.any_host;
        walk(node, &PathSegments::new(path)).map(|f| (f.route, f.captures.to_vec()))
    }

    #[test]
    fn test_path_segments_rest() {
        let path = PathSegments::new("/files/a/b/c");
        assert_eq!(path.len(), 4);
        assert_eq!(path.rest(0), "files/a/b/c");
        assert_eq!(path.rest(1), "a/b/c");
        assert_eq!(path.rest(3), "c");
    }

    #[test]
    fn test_root_path() {
        let table = root(&["/"]);
        assert_eq!(find(&table, "/"), Some((0, vec![])));
        assert_eq!(find(&table, ""), Some((0, vec![])));
        assert_eq!(find(&table, "/x"), None);
    }

    #[test]
    fn test_priority_order() {
        let table = root(&["/v/*rest", "/v/:s", "/v/:f:float", "/v/:i:int", "/v/me"]);
        assert_eq!(find(&table, "/v/me"), Some((4, vec![])));
        assert_eq!(find(&table, "/v/42"), Some((3, vec!["42"])));
        assert_eq!(find(&table, "/v/4.2"), Some((2, vec!["4.2"])));
        assert_eq!(find(&table, "/v/abc"), Some((1, vec!["abc"])));
        assert_eq!(find(&table, "/v/a/b"), Some((0, vec!["a/b"])));
    }

    #[test]
    fn test_backtracks_out_of_static_branch() {
        // `/a/b/c` would take the static `b` first and dead-end at `c`
        let table = root(&["/a/b/d", "/a/:x/c"]);
        assert_eq!(find(&table, "/a/b/c"), Some((1, vec!["b"])));
        assert_eq!(find(&table, "/a/b/d"), Some((0, vec![])));
    }

    #[test]
    fn test_backtracking_drops_stale_captures() {
        let table = root(&["/:a:int/x/:b", "/:c/y"]);
        assert_eq!(find(&table, "/1/y"), Some((1, vec!["1"])));
        assert_eq!(find(&table, "/1/x/z"), Some((0, vec!["1", "z"])));
    }

    #[test]
    fn test_backtracks_into_wildcard() {
        let table = root(&["/files/:name/meta", "/files/*rest"]);
        assert_eq!(find(&table, "/files/a/b"), Some((1, vec!["a/b"])));
        assert_eq!(find(&table, "/files/a/meta"), Some((0, vec!["a"])));
    }

    #[test]
    fn test_wildcard_needs_a_non_empty_remainder() {
        let table = root(&["/files/*rest"]);
        assert_eq!(find(&table, "/files"), None);
        assert_eq!(find(&table, "/files/"), None);
        assert_eq!(find(&table, "/files//"), None);
        assert_eq!(find(&table, "/files///"), None);
        assert_eq!(find(&table, "/files/a/"), Some((0, vec!["a/"])));
        assert_eq!(find(&table, "/files//a"), Some((0, vec!["/a"])));
    }

    #[test]
    fn test_empty_segment_never_matches_param() {
        let table = root(&["/a/:x/b"]);
        assert_eq!(find(&table, "/a//b"), None);
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let table = root(&["/users"]);
        assert_eq!(find(&table, "/users"), Some((0, vec![])));
        assert_eq!(find(&table, "/users/"), None);

        let table = root(&["/users/"]);
        assert_eq!(find(&table, "/users/"), Some((0, vec![])));
        assert_eq!(find(&table, "/users"), None);
    }

    #[test]
    fn test_deep_path_does_not_overflow() {
        let pattern: String = (0..500).map(|i| format!("/:p{i}")).collect();
        let table = root(&[pattern.as_str()]);
        let path: String = (0..500).map(|i| format!("/{i}")).collect();
        let (route, captures) = find(&table, &path).unwrap();
        assert_eq!(route, 0);
        assert_eq!(captures.len(), 500);
        assert_eq!(captures[499], "499");
    }
}
