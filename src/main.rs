use pubreg::Registry;
use pubreg::config::load_config;
use pubreg::utils::logging;
use serde_json::{Value, json};
use tracing::info;

fn main() {
    dotenvy::dotenv().ok();
    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.logging);

    let registry: Registry = Registry::with_settings(&config.registry);

    let alice_watcher = registry.subscribe("user:login", |data: &Value| {
        info!(name = %data["name"], "first subscriber saw login");
        Ok(())
    });
    let _audit = registry.subscribe("user:login", |data: &Value| {
        let name = data["name"].as_str().ok_or("login event without a name")?;
        info!(name, "audit subscriber recorded login");
        Ok(())
    });

    registry.publish("user:login", &json!({ "name": "Alice" }));

    alice_watcher.unsubscribe();
    registry.publish("user:login", &json!({ "name": "Bob" }));
    info!(
        subscribers = registry.subscriber_count("user:login"),
        "after unsubscribe"
    );

    // The audit subscriber rejects this one; the fault is logged and publishing carries on.
    registry.publish("user:login", &json!({}));

    registry.clear();
    info!(
        subscribers = registry.subscriber_count("user:login"),
        "after clear"
    );
    registry.publish("user:login", &json!({ "name": "Carol" }));
}
