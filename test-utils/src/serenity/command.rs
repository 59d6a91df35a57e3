use serenity::all::CommandData;

/// Creates the data of a chat input command invocation.
///
/// # Arguments
/// - `name` - Top level command name
/// - `options` - Raw option tree as Discord sends it, e.g. a subcommand group holding a
///   subcommand holding the arguments
///
/// # Panics
/// - If the JSON cannot be deserialized into CommandData (indicates invalid test data)
pub fn create_test_command_data(name: &str, options: serde_json::Value) -> CommandData {
    let json = serde_json::json!({
        "id": "1100",
        "name": name,
        "type": 1,
        "options": options,
    });

    serde_json::from_value(json).expect("Failed to create test command data - invalid JSON structure")
}
