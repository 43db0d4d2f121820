use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = std::env::var("GATEWAY_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    println!("Testing answer gateway at {}", base_url);

    // Test health check
    println!("\nHealth Check:");
    let health_response = client
        .get(format!("{}/health", base_url))
        .send()
        .await?;

    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    // Strict route
    println!("\nPOST /:");
    let root_response = client
        .post(format!("{}/", base_url))
        .json(&json!({ "question": "What is the return policy?" }))
        .send()
        .await?;

    println!("Status: {}", root_response.status());
    let root_json: serde_json::Value = root_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&root_json)?);

    // Permissive route, question omitted on purpose
    println!("\nPOST /query:");
    let query_response = client
        .post(format!("{}/query", base_url))
        .json(&json!({ "image": null }))
        .send()
        .await?;

    println!("Status: {}", query_response.status());
    let query_json: serde_json::Value = query_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&query_json)?);

    println!("\nClient test completed!");
    Ok(())
}
