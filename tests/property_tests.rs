//! Property-based tests for the structural and elision guarantees.
//!
//! Random node trees are written through a token recorder, then the raw
//! token sequence is checked.

use proptest::prelude::*;
use treedata::{DocumentWriter, Token, TokenRecorder, TreeDataWriter};

#[derive(Debug, Clone)]
enum Child {
    Node(Tree),
    Group(Vec<Tree>),
}

#[derive(Debug, Clone)]
struct Tree {
    ints: Vec<i32>,
    children: Vec<Child>,
}

fn tree() -> impl Strategy<Value = Tree> {
    let leaf = prop::collection::vec(any::<i32>(), 0..3).prop_map(|ints| Tree {
        ints,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            prop::collection::vec(any::<i32>(), 0..3),
            prop::collection::vec(
                prop_oneof![
                    inner.clone().prop_map(Child::Node),
                    prop::collection::vec(inner, 0..4).prop_map(Child::Group),
                ],
                0..4,
            ),
        )
            .prop_map(|(ints, children)| Tree { ints, children })
    })
}

struct Written {
    tokens: Vec<Token>,
    groups: Vec<(String, usize)>,
}

fn write_tree(
    w: &mut DocumentWriter<TokenRecorder>,
    tree: &Tree,
    name: &str,
    counter: &mut usize,
    groups: &mut Vec<(String, usize)>,
) -> treedata::Result<()> {
    w.begin_node("", name)?;
    for (i, value) in tree.ints.iter().enumerate() {
        w.write_int_attribute(&format!("a{}", i), *value)?;
    }
    for child in &tree.children {
        *counter += 1;
        match child {
            Child::Node(node) => {
                let child_name = format!("n{}", counter);
                write_tree(w, node, &child_name, counter, groups)?;
            }
            Child::Group(members) => {
                let group_name = format!("g{}", counter);
                w.begin_group(&group_name)?;
                for member in members {
                    write_tree(w, member, "member", counter, groups)?;
                }
                w.end_group()?;
                groups.push((group_name, members.len()));
            }
        }
    }
    w.end_node()
}

fn write(tree: &Tree) -> Written {
    let mut writer = DocumentWriter::new(TokenRecorder::new(), "1.0");
    writer
        .set_extension_versions(Vec::<(String, String)>::new())
        .unwrap();
    let mut counter = 0;
    let mut groups = Vec::new();
    write_tree(&mut writer, tree, "root", &mut counter, &mut groups).unwrap();
    writer.close().unwrap();
    Written {
        tokens: writer.into_inner().into_tokens(),
        groups,
    }
}

fn single_attribute(write: impl FnOnce(&mut DocumentWriter<TokenRecorder>)) -> Vec<Token> {
    let mut writer = DocumentWriter::new(TokenRecorder::new(), "1.0");
    writer
        .set_extension_versions(Vec::<(String, String)>::new())
        .unwrap();
    writer.begin_node("", "n").unwrap();
    write(&mut writer);
    writer.end_node().unwrap();
    // StartObject, "version", "1.0", <attribute tokens>, EndObject
    let tokens = writer.into_inner().into_tokens();
    tokens[3..tokens.len() - 1].to_vec()
}

proptest! {
    #[test]
    fn prop_start_and_end_tokens_balance(tree in tree()) {
        let written = write(&tree);
        let starts = written.tokens.iter().filter(|t| t.is_start()).count();
        let ends = written.tokens.iter().filter(|t| t.is_end()).count();
        prop_assert_eq!(starts, ends);
        prop_assert_eq!(written.tokens.first(), Some(&Token::StartObject));
        prop_assert_eq!(written.tokens.last(), Some(&Token::EndObject));
    }

    #[test]
    fn prop_groups_open_one_array_only_when_populated(tree in tree()) {
        let written = write(&tree);
        for (name, members) in &written.groups {
            let field = Token::FieldName(name.clone());
            let occurrences = written.tokens.iter().filter(|t| **t == field).count();
            prop_assert_eq!(occurrences, usize::from(*members > 0));
        }
        let populated = written.groups.iter().filter(|(_, n)| *n > 0).count();
        let arrays = written.tokens.iter().filter(|t| **t == Token::StartArray).count();
        prop_assert_eq!(arrays, populated);
    }

    #[test]
    fn prop_group_members_are_anonymous(tree in tree()) {
        let written = write(&tree);
        let member_field = Token::FieldName("member".to_string());
        prop_assert!(!written.tokens.contains(&member_field));
    }

    #[test]
    fn prop_double_present_unless_nan(value in any::<f64>()) {
        let tokens = single_attribute(|w| w.write_double_attribute("p", value).unwrap());
        if value.is_nan() {
            prop_assert!(tokens.is_empty());
        } else {
            prop_assert_eq!(tokens, vec![Token::FieldName("p".to_string()), Token::F64(value)]);
        }
    }

    #[test]
    fn prop_float_present_unless_nan(value in any::<f32>()) {
        let tokens = single_attribute(|w| w.write_float_attribute("q", value).unwrap());
        prop_assert_eq!(tokens.is_empty(), value.is_nan());
    }

    #[test]
    fn prop_int_present_unless_absent(value in -3i32..3, absent in -3i32..3) {
        let tokens = single_attribute(|w| w.write_int_attribute_or("x", value, absent).unwrap());
        if value == absent {
            prop_assert!(tokens.is_empty());
        } else {
            prop_assert_eq!(tokens, vec![Token::FieldName("x".to_string()), Token::I32(value)]);
        }
    }

    #[test]
    fn prop_bool_present_unless_absent(value in any::<bool>(), absent in any::<bool>()) {
        let tokens = single_attribute(|w| w.write_bool_attribute_or("b", value, absent).unwrap());
        prop_assert_eq!(tokens.is_empty(), value == absent);
    }
}
