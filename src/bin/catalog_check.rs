//! End-to-end smoke test against a running catalog service.
//!
//! Walks the public endpoints in a fixed order, checking each status code.
//! A failing step is reported and the run continues; the exit code is
//! non-zero when any step failed.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(author, version, about = "Smoke-test a running catalog service", long_about = None)]
struct Cli {
    /// Base URL of the service under test
    #[arg(long, env = "CATALOG_BASE_URL", default_value = "http://localhost:8001")]
    base_url: String,

    /// Expect 201 Created from the add step instead of 200
    #[arg(long)]
    expect_created: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

struct Checker {
    client: Client,
    base_url: String,
    create_status: StatusCode,
    tests_run: u32,
    tests_passed: u32,
    product_id: Option<String>,
}

impl Checker {
    fn new(client: Client, base_url: &str, create_status: StatusCode) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            create_status,
            tests_run: 0,
            tests_passed: 0,
            product_id: None,
        }
    }

    /// Run one request and compare its status. On success returns the JSON
    /// body, or an empty object when the body is empty or not JSON.
    async fn run_test(
        &mut self,
        name: &str,
        method: Method,
        endpoint: &str,
        expected: StatusCode,
        body: Option<&Value>,
    ) -> Option<Value> {
        self.tests_run += 1;
        println!("\n🔍 Testing {}...", name);

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                println!("❌ Failed - Error: {}", e);
                return None;
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status != expected {
            println!("❌ Failed - Expected {}, got {}", expected.as_u16(), status.as_u16());
            println!("Response: {}", text);
            return None;
        }

        self.tests_passed += 1;
        println!("✅ Passed - Status: {}", status.as_u16());
        Some(serde_json::from_str(&text).unwrap_or_else(|_| json!({})))
    }

    async fn test_get_products(&mut self) -> bool {
        let Some(response) = self
            .run_test("Get All Products", Method::GET, "/api/products", StatusCode::OK, None)
            .await
        else {
            return false;
        };

        let products = response.as_array().cloned().unwrap_or_default();
        println!("Found {} products", products.len());
        if let Some(first) = products.first() {
            self.product_id = first["id"].as_str().map(str::to_string);
            println!(
                "Sample product: {} - {}€",
                first["nom"].as_str().unwrap_or_default(),
                first["prix"]
            );
        }
        true
    }

    async fn test_get_categories(&mut self) -> bool {
        let Some(response) = self
            .run_test("Get Categories", Method::GET, "/api/categories", StatusCode::OK, None)
            .await
        else {
            return false;
        };

        if let Some(categories) = response["categories"].as_array() {
            let names: Vec<&str> = categories.iter().filter_map(Value::as_str).collect();
            println!("Categories: {}", names.join(", "));
        }
        true
    }

    async fn test_get_single_product(&mut self) -> bool {
        let Some(id) = self.product_id.clone() else {
            self.tests_run += 1;
            println!("❌ Cannot test single product - no product ID available");
            return false;
        };

        let endpoint = format!("/api/products/{}", id);
        let Some(response) = self
            .run_test("Get Single Product", Method::GET, &endpoint, StatusCode::OK, None)
            .await
        else {
            return false;
        };

        println!("Retrieved product: {}", response["nom"].as_str().unwrap_or_default());
        true
    }

    async fn test_add_product(&mut self) -> bool {
        let product = json!({
            "nom": format!("Produit Test {}", chrono::Local::now().format("%H:%M:%S")),
            "prix": 99.99,
            "image": "https://images.unsplash.com/photo-1505740420928-5e560c06d30e",
            "description": "Produit créé par le test automatique",
            "categorie": "Test",
        });

        let expected = self.create_status;
        let Some(response) = self
            .run_test("Add Product", Method::POST, "/api/products", expected, Some(&product))
            .await
        else {
            return false;
        };

        if let Some(id) = response["id"].as_str() {
            println!("Added product with ID: {}", id);
            self.product_id = Some(id.to_string());
        }
        true
    }

    async fn test_delete_product(&mut self) -> bool {
        let Some(id) = self.product_id.clone() else {
            self.tests_run += 1;
            println!("❌ Cannot test delete - no product ID available");
            return false;
        };

        let endpoint = format!("/api/products/{}", id);
        if self
            .run_test("Delete Product", Method::DELETE, &endpoint, StatusCode::OK, None)
            .await
            .is_none()
        {
            return false;
        }

        println!("Product deleted successfully");
        true
    }

    /// Run every step in order. Returns true when all of them passed.
    async fn run_all(&mut self) -> bool {
        // Each step runs regardless of how the previous ones went.
        let results = [
            self.test_get_products().await,
            self.test_get_categories().await,
            self.test_get_single_product().await,
            self.test_add_product().await,
            self.test_delete_product().await,
        ];
        results.iter().all(|ok| *ok) && self.tests_passed == self.tests_run
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let client = Client::builder()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let create_status = if cli.expect_created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    println!("🚀 Starting E-Commerce API Tests against {}", cli.base_url);
    println!("================================");

    let mut checker = Checker::new(client, &cli.base_url, create_status);
    let all_passed = checker.run_all().await;

    println!("\n📊 Test Results");
    println!("================================");
    println!("Tests passed: {}/{}", checker.tests_passed, checker.tests_run);

    if all_passed {
        println!("✅ All tests passed!");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("❌ {} tests failed", checker.tests_run - checker.tests_passed);
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::StatusCode as AxumStatus,
        routing::get,
        Json, Router,
    };

    const KNOWN_ID: &str = "11111111-1111-1111-1111-111111111111";
    const CREATED_ID: &str = "22222222-2222-2222-2222-222222222222";

    fn product(id: &str) -> Value {
        json!({
            "id": id,
            "nom": "Casque Audio Noir",
            "prix": 89.99,
            "image": "img",
            "description": "desc",
            "categorie": "Électronique",
            "date_ajout": "2024-01-01T00:00:00Z",
        })
    }

    fn conforming_router() -> Router {
        router(false)
    }

    fn router(empty_catalog: bool) -> Router {
        Router::new()
            .route(
                "/api/products",
                get(move || async move {
                    if empty_catalog {
                        Json(json!([]))
                    } else {
                        Json(json!([product(KNOWN_ID)]))
                    }
                })
                .post(|| async { Json(product(CREATED_ID)) }),
            )
            .route(
                "/api/products/:id",
                get(|Path(id): Path<String>| async move {
                    if id == KNOWN_ID {
                        Ok(Json(product(&id)))
                    } else {
                        Err(AxumStatus::NOT_FOUND)
                    }
                })
                .delete(|Path(id): Path<String>| async move {
                    if id == CREATED_ID {
                        Ok(Json(json!({ "message": "ok" })))
                    } else {
                        Err(AxumStatus::NOT_FOUND)
                    }
                }),
            )
            .route(
                "/api/categories",
                get(|| async { Json(json!({ "categories": ["Électronique"] })) }),
            )
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn checker(base_url: &str, create_status: StatusCode) -> Checker {
        Checker::new(Client::new(), base_url, create_status)
    }

    #[tokio::test]
    async fn conforming_service_passes_every_step() {
        let base = serve(conforming_router()).await;
        let mut checker = checker(&base, StatusCode::OK);

        assert!(checker.run_all().await);
        assert_eq!(checker.tests_run, 5);
        assert_eq!(checker.tests_passed, 5);
        assert_eq!(checker.product_id.as_deref(), Some(CREATED_ID));
    }

    #[tokio::test]
    async fn status_mismatch_fails_without_aborting_sequence() {
        let base = serve(conforming_router()).await;
        let mut checker = checker(&base, StatusCode::CREATED);

        assert!(!checker.run_all().await);
        // Add expected 201 and got 200, so no new id was captured and the
        // delete targets the listed product, which the server refuses.
        assert_eq!(checker.tests_run, 5);
        assert_eq!(checker.tests_passed, 3);
    }

    #[tokio::test]
    async fn empty_catalog_skips_single_product_lookup() {
        let base = serve(router(true)).await;
        let mut checker = checker(&base, StatusCode::OK);

        assert!(!checker.run_all().await);
        // The lookup step has no id, so it fails without issuing a request.
        assert_eq!(checker.tests_run, 5);
        assert_eq!(checker.tests_passed, 4);
        assert_eq!(checker.product_id.as_deref(), Some(CREATED_ID));
    }

    #[tokio::test]
    async fn unreachable_service_counts_every_request_as_failed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut checker = checker(&format!("http://{}", addr), StatusCode::OK);
        assert!(!checker.run_all().await);
        assert_eq!(checker.tests_passed, 0);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let checker = checker("http://localhost:8001/", StatusCode::OK);
        assert_eq!(checker.base_url, "http://localhost:8001");
    }
}
