//! Mask state machine nodes.
//!
//! A compiled mask is a chain of states, one per character position of the
//! format, terminated by an end-of-line sentinel. The chain lives in an arena
//! (`Vec<StateNode>`) and states address each other by index; the terminal
//! node's `next` points to itself, as does the open-ended tail produced by an
//! ellipsis. Self-links are the designed "stop here forever" sentinel, not
//! genuine cycles, and they are what guarantees every traversal terminates.
//!
//! Visual layout for the format `"[00]:[0…]"`:
//!
//! ```text
//! root ─> Value(digit) ─> Value(digit) ─> Literal(':') ─> Value(digit) ─> Value(digit)┐
//!                                                                            ^────────┘
//!                                                                            (elliptical self-link)
//! ```
//!
//! Each state answers one question per input character via [`StateChain::accept`]:
//! reject (`None`), or accept with a [`Next`] record describing what to insert
//! into the formatted output, what to emit into the extracted value, and
//! whether the input character was consumed (`pass`).

use crate::engine::classifier::CharClass;

/// Index of a state inside its [`StateChain`] arena.
pub(crate) type StateId = usize;

/// Actions to take when a state accepts (or auto-handles) an input character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Next {
    /// State to move to.
    pub state: StateId,
    /// Character appended to the formatted output, if any.
    pub insert: Option<char>,
    /// Whether the input character was consumed. When `false`, the applier
    /// retries the same character against `state`.
    pub pass: bool,
    /// Character appended to the extracted value, if any.
    pub value: Option<char>,
}

/// The closed set of state kinds a format compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StateKind {
    /// A character outside of any block: rendered as itself, auto-inserted by
    /// the mask when the input doesn't line up. Not part of the extracted value.
    Literal { own: char },
    /// Open-ended tail (`[…]`): accepts any character and emits it to the
    /// extracted value.
    Free,
    /// A `[...]` position: accepts one character of `class`. Optional states
    /// may be skipped without consuming input.
    Value { class: CharClass, optional: bool },
    /// A `{...}` character: always rendered, skippable during backward
    /// deletion, never part of the extracted value.
    Fixed { own: char },
    /// Terminal sentinel: refuses all input, links to itself.
    EndOfLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateNode {
    pub kind: StateKind,
    pub next: StateId,
}

/// The compiled state arena plus the root index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateChain {
    nodes: Vec<StateNode>,
    root: StateId,
}

impl StateChain {
    pub fn new(nodes: Vec<StateNode>, root: StateId) -> Self {
        debug_assert!(root < nodes.len());
        debug_assert!(nodes.iter().all(|n| n.next < nodes.len()));
        StateChain { nodes, root }
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn kind(&self, id: StateId) -> &StateKind {
        &self.nodes[id].kind
    }

    pub fn next_of(&self, id: StateId) -> StateId {
        self.nodes[id].next
    }

    /// An open-ended (ellipsis) state: self-linked but not the terminal.
    pub fn is_elliptical(&self, id: StateId) -> bool {
        self.nodes[id].next == id && !matches!(self.nodes[id].kind, StateKind::EndOfLine)
    }

    /// Decide whether the state at `id` accepts `ch`.
    ///
    /// `None` means reject: the applier drops the character and stays put.
    /// Literal and fixed states never reject; a mismatch auto-inserts their
    /// own character without consuming input (`pass: false`), so the same
    /// input character is retried against the following state.
    pub fn accept(&self, id: StateId, ch: char) -> Option<Next> {
        let node = &self.nodes[id];
        match &node.kind {
            StateKind::Literal { own } | StateKind::Fixed { own } => Some(if ch == *own {
                Next { state: node.next, insert: Some(ch), pass: true, value: None }
            } else {
                Next { state: node.next, insert: Some(*own), pass: false, value: None }
            }),
            StateKind::Free => Some(Next { state: node.next, insert: Some(ch), pass: true, value: Some(ch) }),
            StateKind::Value { class, optional } => {
                if class.contains(ch) {
                    Some(Next { state: node.next, insert: Some(ch), pass: true, value: Some(ch) })
                } else if *optional && node.next != id {
                    // Skip the unmatched optional position; retry the character
                    // against the next state. Open-ended optional tails reject
                    // instead (skipping to self would never make progress).
                    Some(Next { state: node.next, insert: None, pass: false, value: None })
                } else {
                    None
                }
            }
            StateKind::EndOfLine => None,
        }
    }

    /// Advance without input: literal/fixed states insert their own character,
    /// optional value states step over silently, everything else stops the
    /// autocompletion. Self-linked states never autocomplete, which bounds the
    /// drain loop in the applier.
    pub fn autocomplete(&self, id: StateId) -> Option<Next> {
        let node = &self.nodes[id];
        if node.next == id {
            return None;
        }
        match &node.kind {
            StateKind::Literal { own } | StateKind::Fixed { own } => {
                Some(Next { state: node.next, insert: Some(*own), pass: false, value: None })
            }
            StateKind::Value { optional: true, .. } => {
                Some(Next { state: node.next, insert: None, pass: false, value: None })
            }
            _ => None,
        }
    }

    /// Placeholder glyph for one state; `None` for the terminal.
    pub fn placeholder_char(&self, id: StateId) -> Option<char> {
        match self.kind(id) {
            StateKind::Literal { own } | StateKind::Fixed { own } => Some(*own),
            StateKind::Free => Some('…'),
            StateKind::Value { class, .. } => Some(class.placeholder()),
            StateKind::EndOfLine => None,
        }
    }

    /// Walk the chain starting at `from`, yielding every state exactly once.
    /// Self-linked states (terminal or elliptical) are yielded and then the
    /// walk stops.
    pub fn walk_from(&self, from: StateId) -> impl Iterator<Item = StateId> + '_ {
        let mut cursor = Some(from);
        std::iter::from_fn(move || {
            let id = cursor?;
            let next = self.next_of(id);
            cursor = if next == id { None } else { Some(next) };
            Some(id)
        })
    }

    /// Walk the whole chain from the root.
    pub fn walk(&self) -> impl Iterator<Item = StateId> + '_ {
        self.walk_from(self.root)
    }

    /// Placeholder rendering of the chain suffix starting at `from`.
    pub fn placeholder_from(&self, from: StateId) -> String {
        self.walk_from(from).filter_map(|id| self.placeholder_char(id)).collect()
    }

    /// Human-readable chain rendering, for debug output:
    /// `"[0] -> [0] -> ':' -> EOL"`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for id in self.walk() {
            if !out.is_empty() {
                out.push_str(" -> ");
            }
            match self.kind(id) {
                StateKind::Literal { own } => out.push_str(&format!("'{own}'")),
                StateKind::Fixed { own } => out.push_str(&format!("{{{own}}}")),
                StateKind::Free => out.push_str("[…]"),
                StateKind::Value { class, optional } => {
                    let glyph = class.placeholder();
                    if *optional {
                        out.push_str(&format!("[{glyph}?]"));
                    } else {
                        out.push_str(&format!("[{glyph}]"));
                    }
                }
                StateKind::EndOfLine => out.push_str("EOL"),
            }
            if self.is_elliptical(id) {
                out.push('…');
            }
        }
        out
    }
}
