//! Comprehensive tests for formscan
//!
//! Classification scenarios and the invariants every scan result holds.

use formscan::dom::{Document, NodeId};
use formscan::html::parse;
use formscan::{forms, inputs, scan_document, Form, FormType, InputType};

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

fn types(form: &Form) -> Vec<InputType> {
    form.inputs.iter().map(|i| i.input_type).collect()
}

fn assert_forest(doc: &Document, forms: &[Form]) {
    let tree = doc.tree();
    for (i, a) in forms.iter().enumerate() {
        assert_ne!(a.form_type, FormType::Incomplete, "incomplete form surfaced");
        for input in &a.inputs {
            assert!(tree.contains(a.root, input.element), "input outside its form root");
        }
        for b in &forms[i + 1..] {
            assert!(
                !tree.contains(a.root, b.root) && !tree.contains(b.root, a.root),
                "forms {} and {} overlap",
                a.root,
                b.root
            );
        }
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_basic_login_form() {
    let doc = parse(
        r#"<form id="form">
             <input type="text" name="username" id="username">
             <input type="password" name="password" id="password">
             <button type="submit" id="submit">Log in</button>
           </form>"#,
    )
    .unwrap();

    let found = inputs::classify(doc.tree(), doc.body());
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].element, by_id(&doc, "username"));
    assert_eq!(found[0].input_type, InputType::Username);
    assert_eq!(found[1].input_type, InputType::Password);
    assert_eq!(found[2].input_type, InputType::Submit);

    let forms = forms::get_forms(doc.tree(), doc.body(), &found);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].root, by_id(&doc, "form"));
    assert_eq!(forms[0].form_type, FormType::Login);
    assert_eq!(forms[0].inputs, found);
}

#[test]
fn test_login_with_labels() {
    let doc = parse(
        r#"<form id="form">
             <label>User <input type="text" name="user"></label>
             <label>Password <input type="password" name="pass"></label>
             <input type="submit" value="Log in">
           </form>"#,
    )
    .unwrap();

    let forms = scan_document(&doc);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].root, by_id(&doc, "form"));
    assert_eq!(forms[0].form_type, FormType::Login);
    assert_eq!(
        types(&forms[0]),
        vec![InputType::Username, InputType::Password, InputType::Submit]
    );
}

#[test]
fn test_login_without_form_element() {
    let doc = parse(
        r#"<div class="box" id="div">
             <input type="email" name="email">
             <input type="password" name="password">
             <button type="submit">Continue</button>
           </div>"#,
    )
    .unwrap();

    let forms = scan_document(&doc);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].root, by_id(&doc, "div"));
    assert_eq!(forms[0].form_type, FormType::Login);
}

#[test]
fn test_phone_instead_of_username() {
    let doc = parse(
        r#"<form id="form">
             <input type="tel" name="phone" id="phone">
             <input type="password" name="password">
             <button type="submit">Log in</button>
           </form>"#,
    )
    .unwrap();

    let found = inputs::classify(doc.tree(), doc.body());
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].element, by_id(&doc, "phone"));
    assert_eq!(found[0].input_type, InputType::Unknown);

    let forms = forms::get_forms(doc.tree(), doc.body(), &found);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].form_type, FormType::Unknown);
    assert_eq!(types(&forms[0]), vec![InputType::Password, InputType::Submit]);
}

#[test]
fn test_register_form_with_retype() {
    let doc = parse(
        r#"<form>
             <input type="text" name="username">
             <input type="password" name="password">
             <input type="password" name="password_confirm">
             <button type="submit">Create</button>
           </form>"#,
    )
    .unwrap();

    let forms = scan_document(&doc);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].form_type, FormType::Register);
    assert_eq!(
        types(&forms[0]),
        vec![
            InputType::Username,
            InputType::Password,
            InputType::PasswordRetype,
            InputType::Submit
        ]
    );
}

#[test]
fn test_register_form_by_name() {
    let doc = parse(
        r#"<form id="signup-form">
             <input type="email" name="email">
             <input type="password" name="new">
             <input type="password" name="again">
             <input type="submit">
           </form>"#,
    )
    .unwrap();

    let forms = scan_document(&doc);
    assert_eq!(forms[0].form_type, FormType::Register);
}

#[test]
fn test_nested_wrappers_yield_one_form() {
    let doc = parse(
        r#"<div id="outer">
             <fieldset id="inner">
               <input type="text" name="login">
               <input type="password" name="secret">
               <button type="submit">Go</button>
             </fieldset>
           </div>"#,
    )
    .unwrap();

    let forms = scan_document(&doc);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].root, by_id(&doc, "inner"));
    assert_forest(&doc, &forms);
}

#[test]
fn test_hidden_input_kept_in_login() {
    let doc = parse(
        r#"<form>
             <input type="hidden" name="csrf" id="csrf">
             <input type="text" name="username">
             <input type="password" name="password">
             <button type="submit">Log in</button>
           </form>"#,
    )
    .unwrap();

    let forms = scan_document(&doc);
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].form_type, FormType::Login);
    let csrf = by_id(&doc, "csrf");
    assert!(forms[0]
        .inputs
        .iter()
        .any(|i| i.element == csrf && i.input_type == InputType::Hidden));
    // Matchable fields first, then hidden, then submits
    assert_eq!(
        types(&forms[0]),
        vec![
            InputType::Username,
            InputType::Password,
            InputType::Hidden,
            InputType::Submit
        ]
    );
}

#[test]
fn test_pincode_role_is_never_assigned() {
    // The password rule precedes the pincode rule with the same predicate
    let doc = parse(r#"<form><input type="password" name="pin"><input type="submit"></form>"#).unwrap();
    let found = inputs::classify(doc.tree(), doc.body());
    assert_eq!(found[0].input_type, InputType::Password);
}

#[test]
fn test_login_fill_inputs() {
    let doc = parse(
        r#"<form>
             <input type="hidden" name="csrf">
             <input type="text" name="username">
             <input type="password" name="password">
             <button type="submit">Log in</button>
           </form>"#,
    )
    .unwrap();
    let forms = scan_document(&doc);
    let fill: Vec<&str> = forms[0]
        .fill_inputs()
        .map(|i| i.input_type.field_name())
        .collect();
    assert_eq!(fill, vec!["username", "password"]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

const BUSY_PAGE: &str = r##"
<header>
  <nav id="nav" role="search">
    <a href="/">Home</a><a href="/login">Login</a>
    <input type="search" name="search" placeholder="Search">
    <button type="submit">Search</button>
  </nav>
</header>
<main id="main">
  <div id="columns">
    <section id="left">
      <form id="signin">
        <input type="text" name="user">
        <input type="password" name="pass">
        <a href="#" class="link">Forgot?</a>
        <button type="submit">Sign in</button>
      </form>
    </section>
    <section id="right">
      <div id="register-box">
        <input type="email" name="email">
        <input type="password" name="password">
        <input type="password" name="retype">
        <button type="button">Sign up</button>
      </div>
    </section>
  </div>
  <div id="lonely"><input type="text" name="comment"></div>
  <div id="tracking"><input type="hidden" name="a"><input type="hidden" name="b"></div>
</main>
<footer>
  <form class="newsletter" id="news"><input type="email" name="mail"><input type="submit"></form>
</footer>
"##;

#[test]
fn test_busy_page_classification() {
    let doc = parse(BUSY_PAGE).unwrap();
    let forms = scan_document(&doc);
    assert_forest(&doc, &forms);

    let kind = |id: &str| {
        let root = by_id(&doc, id);
        forms.iter().find(|f| f.root == root).map(|f| f.form_type)
    };
    assert_eq!(kind("nav"), Some(FormType::Search));
    assert_eq!(kind("signin"), Some(FormType::Login));
    assert_eq!(kind("register-box"), Some(FormType::Register));
    assert_eq!(kind("tracking"), Some(FormType::Hidden));
    assert_eq!(kind("news"), Some(FormType::Newsletter));
    assert_eq!(kind("lonely"), None);
}

#[test]
fn test_scan_is_idempotent() {
    let doc = parse(BUSY_PAGE).unwrap();
    let first = scan_document(&doc);
    let second = scan_document(&doc);
    assert_eq!(first, second);

    let a = inputs::classify(doc.tree(), doc.body());
    let b = inputs::classify(doc.tree(), doc.body());
    assert_eq!(a, b);
}

#[test]
fn test_identical_subtrees_classify_identically() {
    let block = r#"<form><input type="text" name="username"><input type="password" name="pw"><button>Go</button></form>"#;
    let doc = parse(&format!("{block}{block}")).unwrap();
    let forms = scan_document(&doc);
    assert_eq!(forms.len(), 2);
    assert_eq!(forms[0].form_type, forms[1].form_type);
    assert_eq!(types(&forms[0]), types(&forms[1]));
    assert_forest(&doc, &forms);
}

#[test]
fn test_detached_root_yields_nothing() {
    let mut doc = parse(BUSY_PAGE).unwrap();
    let main = by_id(&doc, "main");
    doc.remove(main).unwrap();

    assert!(inputs::classify(doc.tree(), main).is_empty());
    assert!(forms::scan(doc.tree(), main).is_empty());
    // The rest of the page is still scanned
    assert!(!scan_document(&doc).is_empty());
}
