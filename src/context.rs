//! Structural state of a document being written.
//!
//! The [`ContextStack`] holds one [`Context`] per open scope. It never writes
//! tokens itself; each transition reports what the caller has to emit, which
//! keeps the stack independent of any encoding.
//!
//! Groups open their array lazily. A group that never receives a member
//! leaves no trace at all on the wire, so a reader cannot tell an empty
//! collection from a missing one:
//!
//! ```rust
//! use treedata::context::{ContextStack, NodeOpening, State};
//!
//! let mut stack = ContextStack::new();
//! stack.push_node("network");
//! stack.push_group("lines");
//! assert_eq!(stack.state(), State::InGroup);
//!
//! assert_eq!(stack.open_node(), NodeOpening::FirstMember("lines"));
//! assert_eq!(stack.open_node(), NodeOpening::Member);
//! assert_eq!(stack.pop_group().unwrap(), 2);
//! ```

use crate::{Error, Result};

/// An open structural scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// A named sequence of anonymous sibling nodes.
    Group {
        field_name: String,
        member_count: usize,
    },
    /// A single structured object.
    Node { field_name: String },
}

impl Context {
    /// The name this scope is attached under in its parent.
    #[must_use]
    pub fn field_name(&self) -> &str {
        match self {
            Context::Group { field_name, .. } | Context::Node { field_name } => field_name,
        }
    }
}

/// Which kind of scope is on top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Empty,
    InGroup,
    InNode,
}

/// What has to precede the start token of a node being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOpening<'a> {
    /// Nothing is open: this node is the document's top-level structure.
    Root,
    /// First member of a group: its field name and the array start come first.
    FirstMember(&'a str),
    /// Later member of a group whose array is already open.
    Member,
    /// Child of a node: the new node's own field name comes first.
    Child,
}

/// A last-in-first-out stack of open scopes.
#[derive(Debug, Default)]
pub struct ContextStack {
    contexts: Vec<Context>,
}

impl ContextStack {
    #[must_use]
    pub fn new() -> Self {
        ContextStack {
            contexts: Vec::with_capacity(16),
        }
    }

    #[must_use]
    pub fn state(&self) -> State {
        match self.contexts.last() {
            None => State::Empty,
            Some(Context::Group { .. }) => State::InGroup,
            Some(Context::Node { .. }) => State::InNode,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Context> {
        self.contexts.last()
    }

    pub fn push_group(&mut self, name: &str) {
        self.contexts.push(Context::Group {
            field_name: name.to_string(),
            member_count: 0,
        });
    }

    /// Closes the group on top and returns how many members it received.
    ///
    /// The stack is left untouched when the top is not a group.
    pub fn pop_group(&mut self) -> Result<usize> {
        match self.contexts.last() {
            Some(Context::Group { member_count, .. }) => {
                let count = *member_count;
                self.contexts.pop();
                Ok(count)
            }
            Some(Context::Node { field_name }) => Err(Error::contract(format!(
                "end_group called while node `{}` is open",
                field_name
            ))),
            None => Err(Error::contract("end_group called with no open group")),
        }
    }

    /// Registers a node about to be opened under the current top.
    ///
    /// Inside a group this counts the new member; the returned value tells
    /// whether the group's array has to be opened first.
    pub fn open_node(&mut self) -> NodeOpening<'_> {
        match self.contexts.last_mut() {
            None => NodeOpening::Root,
            Some(Context::Node { .. }) => NodeOpening::Child,
            Some(Context::Group {
                field_name,
                member_count,
            }) => {
                *member_count += 1;
                if *member_count == 1 {
                    NodeOpening::FirstMember(field_name.as_str())
                } else {
                    NodeOpening::Member
                }
            }
        }
    }

    pub fn push_node(&mut self, name: &str) {
        self.contexts.push(Context::Node {
            field_name: name.to_string(),
        });
    }

    /// Fails unless a node is open on top of the stack.
    pub fn check_node(&self) -> Result<()> {
        match self.contexts.last() {
            Some(Context::Node { .. }) => Ok(()),
            Some(Context::Group { field_name, .. }) => Err(Error::contract(format!(
                "attribute written directly inside group `{}`",
                field_name
            ))),
            None => Err(Error::contract("attribute written with no open node")),
        }
    }

    /// Closes the node on top.
    ///
    /// The stack is left untouched when the top is not a node.
    pub fn pop_node(&mut self) -> Result<()> {
        match self.contexts.last() {
            Some(Context::Node { .. }) => {
                self.contexts.pop();
                Ok(())
            }
            Some(Context::Group { field_name, .. }) => Err(Error::contract(format!(
                "end_node called while group `{}` is open",
                field_name
            ))),
            None => Err(Error::contract("end_node called with no open node")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack() {
        let mut stack = ContextStack::new();
        assert_eq!(stack.state(), State::Empty);
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.open_node(), NodeOpening::Root);
        assert!(stack.check_node().is_err());
    }

    #[test]
    fn test_group_without_members() {
        let mut stack = ContextStack::new();
        stack.push_node("network");
        stack.push_group("loads");
        assert_eq!(stack.pop_group().unwrap(), 0);
        assert_eq!(stack.state(), State::InNode);
    }

    #[test]
    fn test_first_member_opens_once() {
        let mut stack = ContextStack::new();
        stack.push_group("lines");
        let openings: Vec<_> = (0..3)
            .map(|_| {
                let opening = stack.open_node();
                matches!(opening, NodeOpening::FirstMember(_))
            })
            .collect();
        assert_eq!(openings, vec![true, false, false]);
        assert_eq!(
            stack.top(),
            Some(&Context::Group {
                field_name: "lines".to_string(),
                member_count: 3
            })
        );
    }

    #[test]
    fn test_child_of_node() {
        let mut stack = ContextStack::new();
        stack.push_node("network");
        assert_eq!(stack.open_node(), NodeOpening::Child);
        stack.push_node("substation");
        assert_eq!(stack.top().map(Context::field_name), Some("substation"));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_kind_mismatch_is_rejected_without_popping() {
        let mut stack = ContextStack::new();
        stack.push_node("network");
        assert!(stack.pop_group().unwrap_err().is_contract_violation());
        assert_eq!(stack.depth(), 1);

        stack.push_group("lines");
        assert!(stack.pop_node().is_err());
        assert!(stack.check_node().is_err());
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_pop_on_empty_stack() {
        let mut stack = ContextStack::new();
        assert!(stack.pop_group().is_err());
        assert!(stack.pop_node().is_err());
    }

    #[test]
    fn test_context_field_name() {
        let group = Context::Group {
            field_name: "g".to_string(),
            member_count: 0,
        };
        assert_eq!(group.field_name(), "g");
    }
}
