//! Prints the generation models available to the configured API key.

use anyhow::Context;

use inventory_chat::llm::GeminiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let client = GeminiClient::from_env().context("MODEL_API_KEY must be set to list models")?;

    let models = client
        .list_models()
        .await
        .context("failed to list models")?;

    println!("Available Models:\n");
    for model in models {
        println!("Model Name: {}", model.name);
        println!("Supported Methods: {:?}", model.supported_generation_methods);
        println!("{}", "-".repeat(50));
    }

    Ok(())
}
