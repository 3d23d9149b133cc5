//! End-to-end binding behavior over a mounted document.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;
use spark_bind::{
    mount, BindError, BindingFlags, Document, Element, Error, Event, Options, StoreError,
    SubscriberKind, ViewModel,
};

fn app(children: &[&Element]) -> Document {
    let root = Element::new("div").attr("id", "app");
    for child in children {
        root.append_child((*child).clone());
    }
    Document::new(Element::new("body").child(root))
}

fn mount_with(doc: &Document, data: serde_json::Value) -> ViewModel {
    mount(doc, Options::new("#app").data(data).unwrap()).unwrap()
}

#[test]
fn initial_paint() {
    let text = Element::new("p").text("Hi {{name}}");
    let link = Element::new("a").attr("bind:title", "name");
    let input = Element::new("input").attr("model", "name");
    let doc = app(&[&text, &link, &input]);

    mount_with(&doc, json!({ "name": "A" }));

    assert_eq!(text.inner_text(), "Hi A");
    assert_eq!(link.property("title"), Some(json!("A")));
    assert_eq!(input.value(), "A");
}

#[test]
fn change_propagates_to_every_subscriber() {
    let text = Element::new("div").attr("id", "x").text("Hi {{name}}");
    let other = Element::new("span").text("{{name}}!");
    let input = Element::new("input").attr("model", "name");
    let doc = app(&[&text, &other, &input]);
    let vm = mount_with(&doc, json!({ "name": "A" }));

    vm.set("name", "B").unwrap();

    assert_eq!(doc.query_selector("#x").unwrap().inner_text(), "Hi B");
    assert_eq!(other.inner_text(), "B!");
    assert_eq!(input.value(), "B");
}

#[test]
fn directives_render_before_texts() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let text = Element::new("p").text("{{n}}");
    let field = Element::new("input").attr("model", "n");
    let doc = app(&[&text, &field]);
    let vm = mount_with(&doc, json!({ "n": 1 }));

    // Observe render order through the store
    let o1 = order.clone();
    let text_probe = text.clone();
    let field_probe = field.clone();
    vm.store()
        .subscribe("n", SubscriberKind::Text, move |_, _| {
            o1.borrow_mut()
                .push((text_probe.inner_text(), field_probe.value()));
        })
        .unwrap();
    order.borrow_mut().clear();

    vm.set("n", 2).unwrap();
    // The probe is the last text subscriber: everything before it is done
    assert_eq!(*order.borrow(), vec![("2".to_string(), "2".to_string())]);
}

#[test]
fn equal_write_touches_nothing() {
    let text = Element::new("p").text("{{a}} {{b}}");
    let link = Element::new("a").attr("bind:href", "a");
    let doc = app(&[&text, &link]);
    let vm = mount_with(&doc, json!({ "a": "x", "b": "y" }));
    let before = (text.mutation_count(), link.mutation_count());

    assert_eq!(vm.set("a", "x").unwrap(), false);
    assert_eq!(vm.set_path("b", "y").unwrap(), false);

    assert_eq!((text.mutation_count(), link.mutation_count()), before);
}

#[test]
fn multi_key_text_merge() {
    let text = Element::new("p").text("{{a}}:{{b}}");
    let doc = app(&[&text]);
    let vm = mount_with(&doc, json!({ "a": "hello", "b": "world" }));

    assert_eq!(text.inner_text(), "hello:world");
    assert_eq!(text.bound_keys(), vec!["a", "b"]);

    vm.set("a", "bye").unwrap();
    assert_eq!(text.inner_text(), "bye:world");

    vm.set("b", "moon").unwrap();
    vm.set("a", "hi").unwrap();
    assert_eq!(text.inner_text(), "hi:moon");
}

#[test]
fn repeated_key_renders_every_occurrence() {
    let text = Element::new("p").text("{{a}} and {{a}}");
    let doc = app(&[&text]);
    let vm = mount_with(&doc, json!({ "a": 1 }));

    assert_eq!(vm.store().subscriber_count("a"), 1);
    vm.set("a", 2).unwrap();
    assert_eq!(text.inner_text(), "2 and 2");
}

#[test]
fn two_way_sync() {
    let input = Element::new("input").attr("model", "name");
    let mirror = Element::new("p").text("{{name}}");
    let doc = app(&[&input, &mirror]);
    let vm = mount_with(&doc, json!({ "name": "A" }));

    input.input_text("C");

    assert_eq!(vm.get("name"), Some(json!("C")));
    assert_eq!(mirror.inner_text(), "C");
    assert_eq!(input.value(), "C");

    vm.set("name", "D").unwrap();
    assert_eq!(input.value(), "D");
}

#[test]
fn two_way_textarea_writes_strings() {
    let area = Element::new("textarea").attr("model", "count");
    let doc = app(&[&area]);
    let vm = mount_with(&doc, json!({ "count": 3 }));

    assert_eq!(area.value(), "3");
    area.input_text("4");
    assert_eq!(vm.get("count"), Some(json!("4")));
}

#[test]
fn model_on_plain_element_is_ignored() {
    let div = Element::new("div").attr("model", "name");
    let doc = app(&[&div]);
    let vm = mount_with(&doc, json!({ "name": "A" }));

    assert_eq!(div.value(), "");
    assert_eq!(div.listener_count("input"), 0);
    assert!(div.flags().is_unbound());
    assert_eq!(vm.report().directive_bindings, 0);
}

#[test]
fn on_directive_calls_method_with_context() {
    let button = Element::new("button").attr("on:click", "inc").text("+");
    let label = Element::new("span").text("count: {{count}}");
    let doc = app(&[&button, &label]);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let options = Options::new("#app")
        .data(json!({ "count": 0 }))
        .unwrap()
        .method("inc", move |vm, event| {
            seen_clone.borrow_mut().push(event.name().to_string());
            let n = vm.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
            vm.set("count", n + 1).unwrap();
        });
    let vm = mount(&doc, options).unwrap();

    button.click();
    button.click();

    assert_eq!(vm.get("count"), Some(json!(2)));
    assert_eq!(label.inner_text(), "count: 2");
    assert_eq!(*seen.borrow(), vec!["click", "click"]);
}

#[test]
fn on_directive_with_missing_method_is_silent() {
    let button = Element::new("button").attr("on:click", "nothing");
    let doc = app(&[&button]);
    let vm = mount_with(&doc, json!({}));

    button.click();
    button.dispatch_event(&Event::new("click", button.clone()));

    assert_eq!(button.listener_count("click"), 1);
    assert!(!vm.has_method("nothing"));
}

#[test]
fn untouched_elements_and_unknown_attributes() {
    let plain = Element::new("p").attr("class", "note").text("static text");
    let doc = app(&[&plain]);
    mount_with(&doc, json!({ "a": 1 }));

    assert_eq!(plain.inner_text(), "static text");
    assert_eq!(plain.mutation_count(), 0);
    assert_eq!(plain.flags(), BindingFlags::NONE);
}

#[test]
fn only_direct_children_are_compiled() {
    let nested = Element::new("span").text("{{a}}");
    let wrapper = Element::new("div").child(nested.clone());
    let doc = app(&[&wrapper]);
    let vm = mount_with(&doc, json!({ "a": 1 }));

    assert_eq!(nested.inner_text(), "{{a}}");
    assert_eq!(vm.report().elements, 1);
}

#[test]
fn nested_paths_bind_and_siblings_stay_reactive() {
    let city = Element::new("p").text("{{ user.address.city }}");
    let title = Element::new("h1").text("{{title}}");
    let doc = app(&[&city, &title]);
    let vm = mount_with(
        &doc,
        json!({ "user": { "address": { "city": "X" } }, "title": "T" }),
    );

    assert_eq!(city.inner_text(), "X");
    vm.set("user", json!({ "address": { "city": "Y" } })).unwrap();
    vm.set("title", "U").unwrap();

    assert_eq!(city.inner_text(), "Y");
    assert_eq!(title.inner_text(), "U");
}

#[test]
fn recompiling_appends_subscribers_from_original_template() {
    let text = Element::new("p").text("Hi {{name}}");
    let doc = app(&[&text]);
    let vm = mount_with(&doc, json!({ "name": "A" }));

    let report = spark_bind::compile(&doc, "#app", &vm).unwrap();
    assert_eq!(report.text_bindings, 1);
    assert_eq!(vm.store().subscriber_count("name"), 2);

    vm.set("name", "B").unwrap();
    assert_eq!(text.inner_text(), "Hi B");
}

#[test]
fn report_counts_bindings() {
    let a = Element::new("p").text("{{a}} {{b}}");
    let b = Element::new("input").attr("model", "a").attr("bind:title", "b");
    let c = Element::new("button").attr("on:click", "go");
    let doc = app(&[&a, &b, &c]);
    let vm = mount_with(&doc, json!({ "a": 1, "b": 2 }));

    let report = vm.report();
    assert_eq!(report.elements, 3);
    assert_eq!(report.text_bindings, 2);
    assert_eq!(report.directive_bindings, 2);
    assert_eq!(report.listeners, 2);
    assert!(b.flags().contains(BindingFlags::MODEL | BindingFlags::PROPERTY));
}

fn mount_err(doc: &Document, data: serde_json::Value) -> Error {
    mount(doc, Options::new("#app").data(data).unwrap()).err().unwrap()
}

#[test]
fn bind_directive_with_unknown_key_fails_mount() {
    let link = Element::new("a").attr("bind:title", "missing");
    let doc = app(&[&link]);

    let err = mount_err(&doc, json!({ "name": "A" }));
    assert!(matches!(
        err,
        Error::Bind(BindError::UnknownKey { ref key, ref tag }) if key == "missing" && tag == "a"
    ));
}

#[test]
fn model_directive_with_unknown_key_fails_mount() {
    let input = Element::new("input").attr("model", "missing");
    let doc = app(&[&input]);

    let err = mount_err(&doc, json!({ "name": "A" }));
    assert!(matches!(
        err,
        Error::Bind(BindError::UnknownKey { ref key, ref tag })
            if key == "missing" && tag == "input"
    ));
    // Nothing was wired before the failure
    assert_eq!(input.listener_count("input"), 0);
}

#[test]
fn dotted_data_key_fails_mount() {
    let text = Element::new("p").text("{{a}}");
    let doc = app(&[&text]);

    let err = mount_err(&doc, json!({ "a.b": 1, "a": { "b": 2 } }));
    assert!(matches!(err, Error::Store(StoreError::InvalidKey(ref key)) if key == "a.b"));
    assert_eq!(text.inner_text(), "{{a}}");
}

#[test]
fn numerically_equal_write_touches_nothing() {
    let text = Element::new("p").text("{{n}}");
    let doc = app(&[&text]);
    let vm = mount_with(&doc, json!({ "n": 1 }));
    let before = text.mutation_count();

    assert_eq!(vm.set("n", 1.0).unwrap(), false);
    assert_eq!(vm.set_path("n", 1.0).unwrap(), false);

    assert_eq!(text.inner_text(), "1");
    assert_eq!(text.mutation_count(), before);
}

#[test]
fn object_write_renders_object_text_once() {
    let whole = Element::new("pre").text("{{user}}");
    let name = Element::new("p").text("{{user.name}}");
    let doc = app(&[&whole, &name]);
    let vm = mount_with(&doc, json!({ "user": { "name": "A", "age": 1 } }));
    let before = whole.mutation_count();

    vm.set("user", json!({ "name": "B", "age": 2 })).unwrap();

    assert_eq!(whole.mutation_count(), before + 1);
    assert_eq!(whole.inner_text(), r#"{"name":"B","age":2}"#);
    assert_eq!(name.inner_text(), "B");
}

#[test]
fn suppressed_reentrant_write_leaves_earlier_renders_stale() {
    let input = Element::new("input").attr("model", "name");
    let mirror = Element::new("p").text("{{name}}");
    let doc = app(&[&input, &mirror]);
    let vm = mount_with(&doc, json!({ "name": "ab" }));

    // Registered after the input's model directive, before any text
    vm.store()
        .subscribe("name", SubscriberKind::Directive, |value, store| {
            if let Some(name) = value.as_str() {
                let _ = store.set("name", json!(name.to_uppercase()));
            }
        })
        .unwrap();
    // First paint ran outside any cascade and reached everything
    assert_eq!(input.value(), "AB");
    assert_eq!(mirror.inner_text(), "AB");

    input.input_text("xy");

    assert_eq!(vm.get("name"), Some(json!("XY")));
    assert_eq!(mirror.inner_text(), "XY");
    assert_eq!(input.value(), "xy");
}
