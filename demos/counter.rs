//! Counter demo - text interpolation, two-way input and a click handler.
//!
//! Run with: `RUST_LOG=spark_bind=trace cargo run --example counter`

use serde_json::json;
use spark_bind::{mount, Document, Element, Options};
use tracing_subscriber::EnvFilter;

fn main() -> spark_bind::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let greeting = Element::new("h1").text("{{greeting}}, {{name}}!");
    let field = Element::new("input").attr("model", "name");
    let button = Element::new("button").attr("on:click", "inc").text("+1");
    let count = Element::new("p").attr("bind:title", "name").text("clicked {{count}} times");

    let doc = Document::new(
        Element::new("div")
            .attr("id", "app")
            .child(greeting.clone())
            .child(field.clone())
            .child(button.clone())
            .child(count.clone()),
    );

    let options = Options::new("#app")
        .data(json!({ "greeting": "Hello", "name": "world", "count": 0 }))?
        .method("inc", |vm, _event| {
            let n = vm.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
            if let Err(err) = vm.set("count", n + 1) {
                eprintln!("inc failed: {err}");
            }
        });

    let vm = mount(&doc, options)?;
    println!("{}", greeting.inner_text());

    field.input_text("Ada");
    println!("{}", greeting.inner_text());

    button.click();
    button.click();
    println!("{}", count.inner_text());

    vm.set("greeting", "Goodbye")?;
    println!("{}", greeting.inner_text());
    println!("{}", vm.data());

    Ok(())
}
