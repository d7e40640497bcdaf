//! `weatherwise tools` — Print the tool catalogue sent to the model.

pub fn run() -> anyhow::Result<()> {
    let registry = weatherwise_tools::default_registry()?;

    for def in registry.definitions() {
        println!("{} — {}", def.name, def.description);
        println!("{}", serde_json::to_string_pretty(&def.parameters)?);
        println!();
    }

    Ok(())
}
