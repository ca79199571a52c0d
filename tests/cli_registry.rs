// tests/cli_registry.rs

use dagmake::cli;
use dagmake::registry;
use serde_json::json;

#[test]
fn reify_coerces_json_and_bare_words() {
    assert_eq!(cli::reify("42"), json!(42));
    assert_eq!(cli::reify("true"), json!(true));
    assert_eq!(cli::reify("[1, 2]"), json!([1, 2]));
    assert_eq!(cli::reify("{\"k\": 1}"), json!({"k": 1}));
    assert_eq!(cli::reify("/tmp/teatime"), json!("/tmp/teatime"));
    assert_eq!(cli::reify("\"quoted\""), json!("quoted"));
}

#[test]
fn registry_resolves_modules_and_tasks() {
    let module = registry::lookup("teatime").expect("demo module registered");
    assert!(module.task("a_cup_of_tea").is_ok());
    assert!(module.task("no_such_task").is_err());
    assert!(registry::lookup("no_such_module").is_err());
}

#[test]
fn every_registered_task_has_a_doc_line() {
    for module in registry::modules() {
        for task in module.tasks {
            assert!(
                !task.doc.is_empty(),
                "task {}::{} is missing a doc line for --show",
                module.name,
                task.name
            );
        }
    }
}
