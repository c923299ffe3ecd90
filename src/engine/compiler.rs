//! Format string compilation.
//!
//! Compilation is a single left-to-right scan of the format string into a flat
//! list of per-position specifiers, followed by a right-to-left fold into the
//! state arena. The fold direction is forced by the data model: every state
//! carries the index of its successor, so the end-of-line sentinel is created
//! first and each preceding state is prepended.
//!
//! ```text
//! "+7 [00…]"  ── scan ──>  Literal('+') Literal('7') Literal(' ')
//!                          Value(digit) Value(digit) Ellipsis
//!             ── fold ──>  EOL, d…(self), d, d, ' ', '7', '+'   (arena, built tail-first)
//! ```
//!
//! Grammar, outside of blocks: any character is a literal position, `\` escapes
//! the following character (so `\[` is a literal bracket). `[...]` opens a
//! value block; inside it `0`/`A`/`_` are mandatory digit/letter/alphanumeric
//! positions, `9`/`a`/`-` their optional counterparts, `…` repeats the
//! preceding value class to the end of the line, and any registered notation
//! tag maps to its custom class. Mandatory positions are hoisted before
//! optional ones within each block (`[90]` ≡ `[09]`). `{...}` opens a fixed
//! block of always-rendered characters; `\` escapes inside it as well.
//!
//! Malformed formats fail with a typed [`CompileError`] carrying the offending
//! character position; the compiler never silently drops characters, which is
//! also why anything following an open-ended ellipsis tail is an error rather
//! than an unreachable appendix.

use crate::engine::classifier::CharClass;
use crate::model::notation::Notation;
use crate::model::state::{StateChain, StateId, StateKind, StateNode};

/// A malformed mask format. `position` is a character offset into the format
/// string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("value block opened at position {position} is never closed")]
    UnterminatedValueBlock { position: usize },
    #[error("fixed block opened at position {position} is never closed")]
    UnterminatedFixedBlock { position: usize },
    #[error("block opened inside another block at position {position}")]
    NestedBlock { position: usize },
    #[error("closing '{character}' at position {position} has no matching opening bracket")]
    UnbalancedClose { character: char, position: usize },
    #[error("'{character}' at position {position} is not a value class, notation tag or ellipsis")]
    UnknownClass { character: char, position: usize },
    #[error("escape at position {position} is not followed by a character")]
    DanglingEscape { position: usize },
    #[error("format continues at position {position} after an open-ended ellipsis tail")]
    TrailingAfterEllipsis { position: usize },
}

/// One per-position specifier produced by the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Spec {
    Literal(char),
    Fixed(char),
    Value { class: CharClass, optional: bool, elliptical: bool },
    Free,
}

#[derive(Debug, Clone, Copy)]
enum Block {
    None,
    Value { opened_at: usize },
    Fixed { opened_at: usize },
}

/// Compile `format` into a state chain. Notation tags are consulted after the
/// built-in class characters, so the core grammar cannot be overridden.
pub(crate) fn compile(format: &str, notations: &[Notation]) -> Result<StateChain, CompileError> {
    let specs = scan(format, notations)?;
    let chain = fold(&specs);

    if std::env::var_os("MASKLINE_DEBUG").is_some() {
        eprintln!("[compile] format={:?} chain={}", format, chain.describe());
    }

    Ok(chain)
}

fn scan(format: &str, notations: &[Notation]) -> Result<Vec<Spec>, CompileError> {
    let mut specs: Vec<Spec> = Vec::new();
    let mut block = Block::None;
    // Index into `specs` where the currently open value block started.
    let mut block_start = 0usize;
    // Number of value specifiers emitted by the block currently open; the
    // ellipsis repeats the last one of *this* block, never an earlier block's.
    let mut block_values = 0usize;
    // Once an ellipsis tail is emitted, only the closing ']' may follow.
    let mut sealed = false;
    let mut awaiting_close = false;

    let mut iter = format.chars().enumerate();
    while let Some((pos, ch)) = iter.next() {
        if sealed {
            if awaiting_close && ch == ']' {
                awaiting_close = false;
                block = Block::None;
                continue;
            }
            return Err(CompileError::TrailingAfterEllipsis { position: pos });
        }

        match block {
            Block::None => match ch {
                '[' => {
                    block = Block::Value { opened_at: pos };
                    block_start = specs.len();
                    block_values = 0;
                }
                '{' => block = Block::Fixed { opened_at: pos },
                ']' | '}' => return Err(CompileError::UnbalancedClose { character: ch, position: pos }),
                '\\' => {
                    let (_, escaped) =
                        iter.next().ok_or(CompileError::DanglingEscape { position: pos })?;
                    specs.push(Spec::Literal(escaped));
                }
                other => specs.push(Spec::Literal(other)),
            },
            Block::Value { .. } => match ch {
                ']' => {
                    // Within one block, mandatory positions always come first,
                    // whatever order they were written in: "[90]" and "[09]"
                    // compile identically, so a lone digit satisfies the
                    // mandatory slot and a following separator can skip the
                    // optional one.
                    specs[block_start..]
                        .sort_by_key(|s| matches!(s, Spec::Value { optional: true, .. }));
                    block = Block::None;
                }
                '[' | '{' => return Err(CompileError::NestedBlock { position: pos }),
                '…' => {
                    let tail = match specs.last() {
                        Some(Spec::Value { class, optional, .. }) if block_values > 0 => Spec::Value {
                            class: class.clone(),
                            optional: *optional,
                            elliptical: true,
                        },
                        _ => Spec::Free,
                    };
                    specs.push(tail);
                    sealed = true;
                    awaiting_close = true;
                }
                '0' => push_value(&mut specs, &mut block_values, CharClass::Digit, false),
                '9' => push_value(&mut specs, &mut block_values, CharClass::Digit, true),
                'A' => push_value(&mut specs, &mut block_values, CharClass::Letter, false),
                'a' => push_value(&mut specs, &mut block_values, CharClass::Letter, true),
                '_' => push_value(&mut specs, &mut block_values, CharClass::AlphaNumeric, false),
                '-' => push_value(&mut specs, &mut block_values, CharClass::AlphaNumeric, true),
                other => match notations.iter().find(|n| n.character == other) {
                    Some(notation) => push_value(
                        &mut specs,
                        &mut block_values,
                        CharClass::Custom { characters: notation.characters.clone() },
                        notation.is_optional,
                    ),
                    None => return Err(CompileError::UnknownClass { character: other, position: pos }),
                },
            },
            Block::Fixed { .. } => match ch {
                '}' => block = Block::None,
                '{' | '[' => return Err(CompileError::NestedBlock { position: pos }),
                '\\' => {
                    let (_, escaped) =
                        iter.next().ok_or(CompileError::DanglingEscape { position: pos })?;
                    specs.push(Spec::Fixed(escaped));
                }
                other => specs.push(Spec::Fixed(other)),
            },
        }
    }

    match block {
        Block::Value { opened_at } => Err(CompileError::UnterminatedValueBlock { position: opened_at }),
        Block::Fixed { opened_at } => Err(CompileError::UnterminatedFixedBlock { position: opened_at }),
        Block::None => Ok(specs),
    }
}

fn push_value(specs: &mut Vec<Spec>, block_values: &mut usize, class: CharClass, optional: bool) {
    specs.push(Spec::Value { class, optional, elliptical: false });
    *block_values += 1;
}

/// Build the arena tail-first: the terminal sentinel gets index 0, then every
/// specifier is prepended right-to-left, each linking to the previously built
/// state. Elliptical specifiers link to themselves.
fn fold(specs: &[Spec]) -> StateChain {
    let mut nodes: Vec<StateNode> = Vec::with_capacity(specs.len() + 1);
    nodes.push(StateNode { kind: StateKind::EndOfLine, next: 0 });

    let mut next_id: StateId = 0;
    for spec in specs.iter().rev() {
        let id = nodes.len();
        let node = match spec {
            Spec::Literal(own) => StateNode { kind: StateKind::Literal { own: *own }, next: next_id },
            Spec::Fixed(own) => StateNode { kind: StateKind::Fixed { own: *own }, next: next_id },
            Spec::Free => StateNode { kind: StateKind::Free, next: id },
            Spec::Value { class, optional, elliptical } => StateNode {
                kind: StateKind::Value { class: class.clone(), optional: *optional },
                next: if *elliptical { id } else { next_id },
            },
        };
        nodes.push(node);
        next_id = id;
    }

    StateChain::new(nodes, next_id)
}
