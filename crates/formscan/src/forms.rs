//! Form detection
//!
//! Groups classified inputs into form-like clusters by tree containment
//! alone (many login forms are plain `<div>`s), classifies each cluster,
//! and reduces overlapping clusters to the most specific ones.

use std::collections::HashSet;

use formscan_dom::{DomTree, NodeId};

use crate::inputs;
use crate::matchers::{match_attributes, match_fields, match_name, FORM_MATCHERS};
use crate::types::{Form, FormType, Input, InputType};

/// A candidate grouping: a common ancestor and the inputs below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub root: NodeId,
    pub inputs: Vec<Input>,
}

/// Map inputs to the common ancestors which potentially act as forms.
///
/// For each input, ancestors are visited from the nearest upwards until the
/// parent of `scan_root`. An ancestor is recorded the first time it holds at
/// least one later input. Nested wrappers therefore produce overlapping
/// contexts; [`get_forms`] filters them.
pub fn group(tree: &DomTree, scan_root: NodeId, inputs: &[Input]) -> Vec<Context> {
    let boundary = tree.parent(scan_root);
    let mut contexts: Vec<Context> = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();

    let Some((_, leading)) = inputs.split_last() else {
        return contexts;
    };

    for (i, &current) in leading.iter().enumerate() {
        let mut others: Vec<Input> = inputs[i + 1..].to_vec();
        let mut parent = tree.parent(current.element);

        while !others.is_empty() {
            let Some(ancestor) = parent else { break };
            if Some(ancestor) == boundary || seen.contains(&ancestor) {
                break;
            }

            let (matched, unmatched): (Vec<Input>, Vec<Input>) = others
                .into_iter()
                .partition(|other| tree.contains(ancestor, other.element));

            if !matched.is_empty() {
                let mut members = Vec::with_capacity(matched.len() + 1);
                members.push(current);
                members.extend(matched);
                seen.insert(ancestor);
                contexts.push(Context { root: ancestor, inputs: members });
            }

            others = unmatched;
            parent = tree.parent(ancestor);
        }
    }

    contexts
}

/// Determine the purpose of a single context.
pub fn classify(tree: &DomTree, context: &Context) -> Form {
    let root = context.root;
    let all = &context.inputs;

    let mut hidden = Vec::new();
    let mut submits = Vec::new();
    let mut maybe_submits = Vec::new();
    let mut matchable = Vec::new();

    for &input in all {
        match input.input_type {
            InputType::Unknown => {}
            InputType::Hidden => hidden.push(input),
            InputType::Submit => submits.push(input),
            InputType::MaybeSubmit => maybe_submits.push(input),
            _ => matchable.push(input),
        }
    }

    if hidden.len() == all.len() {
        return Form::new(root, FormType::Hidden, all.clone());
    }
    if (submits.is_empty() && maybe_submits.is_empty()) || matchable.is_empty() {
        return Form::new(root, FormType::Incomplete, all.clone());
    }

    // Definite submit elements win over speculative ones
    let matchable_form = |form_type: FormType| {
        let mut inputs = matchable.clone();
        inputs.extend_from_slice(&hidden);
        if submits.is_empty() {
            inputs.extend_from_slice(&maybe_submits);
        } else {
            inputs.extend_from_slice(&submits);
        }
        Form::new(root, form_type, inputs)
    };

    // 1. Name of the root element
    for (form_type, matcher) in FORM_MATCHERS.iter() {
        if match_name(tree, root, matcher.name.as_ref()) {
            tracing::debug!("Name match: {:?} on {}", matcher.name.as_ref().map(|r| r.as_str()), root);
            return matchable_form(*form_type);
        }
    }

    // 2. Attributes of the root element
    for (form_type, matcher) in FORM_MATCHERS.iter() {
        if match_attributes(matcher.attributes.as_deref(), |name| tree.get_attribute(root, name)) {
            tracing::debug!("Attributes match: {} on {}", form_type, root);
            return matchable_form(*form_type);
        }
    }

    // 3. Composition of the fields
    for (form_type, matcher) in FORM_MATCHERS.iter() {
        if match_fields(all, matcher.fields.as_deref()) {
            tracing::debug!("Fields match: {} on {}", form_type, root);
            return matchable_form(*form_type);
        }
    }

    matchable_form(FormType::Unknown)
}

/// Group, classify and de-overlap the inputs found below `scan_root`.
///
/// Incomplete clusters are dropped. When two candidates nest, the inner
/// one wins, so no two returned roots are ancestor and descendant.
pub fn get_forms(tree: &DomTree, scan_root: NodeId, inputs: &[Input]) -> Vec<Form> {
    let mut forms: Vec<Form> = Vec::new();

    for context in group(tree, scan_root, inputs) {
        let form = classify(tree, &context);
        if form.form_type == FormType::Incomplete {
            continue;
        }

        let mut should_add = true;
        for accepted in forms.iter_mut() {
            if tree.contains(accepted.root, form.root) {
                // More specific than an accepted parent: replace it
                *accepted = form.clone();
                should_add = false;
                break;
            } else if tree.contains(form.root, accepted.root) {
                should_add = false;
                break;
            }
        }
        if should_add {
            forms.push(form);
        }
    }

    forms
}

/// Classify and detect forms below `root` in one go.
pub fn scan(tree: &DomTree, root: NodeId) -> Vec<Form> {
    let found = inputs::classify(tree, root);
    let forms = get_forms(tree, root, &found);
    tracing::debug!("Scanned {}: {} inputs, {} forms", root, found.len(), forms.len());
    forms
}

#[cfg(test)]
mod tests {
    use super::*;
    use formscan_html::parse;

    fn body_forms(html: &str) -> (formscan_dom::Document, Vec<Form>) {
        let doc = parse(html).unwrap();
        let forms = scan(doc.tree(), doc.body());
        (doc, forms)
    }

    #[test]
    fn test_group_single_input_has_no_context() {
        let doc = parse("<form><input name=user type=text></form>").unwrap();
        let found = inputs::classify(doc.tree(), doc.body());
        assert_eq!(found.len(), 1);
        assert!(group(doc.tree(), doc.body(), &found).is_empty());
    }

    #[test]
    fn test_group_nested_wrappers_records_innermost() {
        let doc = parse(
            "<div id=outer><fieldset id=inner>\
             <input name=user type=text><input type=password><button>Go</button>\
             </fieldset></div>",
        )
        .unwrap();
        let tree = doc.tree();
        let found = inputs::classify(tree, doc.body());
        let contexts = group(tree, doc.body(), &found);

        // Only the innermost wrapper is recorded; the walk from the first
        // input stops once nothing is left to match
        let inner = doc.get_element_by_id("inner").unwrap();
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].root, inner);
        assert_eq!(contexts[0].inputs.len(), 3);
    }

    #[test]
    fn test_group_climbs_for_remaining_inputs() {
        let doc = parse(
            "<div id=outer><p id=first><input name=user type=text></p>\
             <p id=second><input type=password><button>Go</button></p></div>",
        )
        .unwrap();
        let tree = doc.tree();
        let found = inputs::classify(tree, doc.body());
        let contexts = group(tree, doc.body(), &found);

        let outer = doc.get_element_by_id("outer").unwrap();
        let second = doc.get_element_by_id("second").unwrap();
        let roots: Vec<NodeId> = contexts.iter().map(|c| c.root).collect();
        assert_eq!(roots, vec![outer, second]);
        assert_eq!(contexts[0].inputs.len(), 3);
        assert_eq!(contexts[1].inputs.len(), 2);
    }

    #[test]
    fn test_group_stops_at_scan_root_parent() {
        let doc = parse("<form id=f><input name=user type=text><input type=submit></form>").unwrap();
        let form = doc.get_element_by_id("f").unwrap();
        let found = inputs::classify(doc.tree(), form);
        let contexts = group(doc.tree(), form, &found);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].root, form);
    }

    #[test]
    fn test_all_hidden() {
        let (_, forms) = body_forms("<div><input type=hidden name=a><input type=hidden name=b></div>");
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form_type, FormType::Hidden);
        assert_eq!(forms[0].inputs.len(), 2);
    }

    #[test]
    fn test_incomplete_is_dropped() {
        // No submit-like element
        let (_, forms) = body_forms("<div><input name=user type=text><input type=password></div>");
        assert!(forms.is_empty());
        // Only submit and unknown
        let (_, forms) = body_forms("<div><input type=tel name=phone><button>Go</button></div>");
        assert!(forms.is_empty());
    }

    #[test]
    fn test_definite_submit_preferred() {
        let (_, forms) = body_forms(
            "<div><input name=user type=text><input type=password>\
             <a href=/login>Login</a><button type=submit>Go</button></div>",
        );
        assert_eq!(forms.len(), 1);
        let form = &forms[0];
        assert_eq!(form.form_type, FormType::Login);
        assert!(form.find(InputType::Submit).is_some());
        assert!(form.find(InputType::MaybeSubmit).is_none());
        assert_eq!(form.inputs.len(), 3);
    }

    #[test]
    fn test_maybe_submit_fallback() {
        let (_, forms) = body_forms(
            "<div><input name=user type=text><input type=password>\
             <a href=# class=btn>Sign in</a></div>",
        );
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form_type, FormType::Login);
        assert!(forms[0].find(InputType::MaybeSubmit).is_some());
    }

    #[test]
    fn test_name_pass_precedes_field_pass() {
        // Login fields, but the root announces a signup
        let (_, forms) = body_forms(
            "<form id=signup><input name=user type=text><input type=password>\
             <button>Go</button></form>",
        );
        assert_eq!(forms[0].form_type, FormType::Register);
    }

    #[test]
    fn test_search_form() {
        let (_, forms) = body_forms(
            "<div role=Search><input type=search name=q placeholder=Search><button>Go</button></div>",
        );
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form_type, FormType::Search);
    }

    #[test]
    fn test_newsletter_and_menu() {
        let (_, forms) = body_forms(
            "<form class=newsletter><input type=email name=email><button>Go</button></form>",
        );
        assert_eq!(forms[0].form_type, FormType::Newsletter);

        let (_, forms) = body_forms(
            "<nav class=main-menu><input type=text name=username><a href=/login>Login</a></nav>",
        );
        assert_eq!(forms[0].form_type, FormType::Menu);
    }

    #[test]
    fn test_sibling_forms_are_both_kept() {
        let (doc, forms) = body_forms(
            "<div id=page>\
             <form id=a><input name=user type=text><input type=password><button>Go</button></form>\
             <form id=b><input name=user type=text><input type=password><button>Go</button></form>\
             </div>",
        );
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        let roots: Vec<NodeId> = forms.iter().map(|f| f.root).collect();
        assert_eq!(roots, vec![a, b]);
    }

    #[test]
    fn test_unknown_keeps_matchable_and_submits() {
        let (_, forms) = body_forms(
            "<form><input type=tel name=phone><input type=password name=pw>\
             <input type=checkbox name=remember><button>Go</button></form>",
        );
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form_type, FormType::Unknown);
        let types: Vec<InputType> = forms[0].inputs.iter().map(|i| i.input_type).collect();
        assert_eq!(types, vec![InputType::Password, InputType::Submit]);
    }
}
