//! The handler against a real backend on an ephemeral port.

use calcweb_client::{
    Calculator, HttpTransport, InteractionHandler, Outcome, TextDisplay, TextFields,
};
use calcweb_web::WebServer;
use tokio::net::TcpListener;

type LiveCalculator = Calculator<HttpTransport, TextFields, TextDisplay>;

async fn start_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(WebServer::default().serve_on(listener));
    format!("http://{}", addr)
}

fn calculator(base_url: &str, a: &str, b: &str) -> LiveCalculator {
    let transport = HttpTransport::new(base_url).unwrap();
    Calculator::new(InteractionHandler::new(
        transport,
        TextFields::new(a, b),
        TextDisplay::new(),
    ))
}

#[tokio::test]
async fn health_check() {
    let base_url = start_backend().await;
    let transport = HttpTransport::new(&base_url).unwrap();

    let health = transport.health().await.unwrap();
    assert!(health.is_ok());
}

#[tokio::test]
async fn four_operations() {
    let base_url = start_backend().await;
    let calculator = calculator(&base_url, "10", "4");

    let cases = [
        ("btn-add", "Result: 14"),
        ("btn-subtract", "Result: 6"),
        ("btn-multiply", "Result: 40"),
        ("btn-divide", "Result: 2.5"),
    ];
    for (button, expected) in cases {
        calculator.click(button).unwrap().await.unwrap();
        assert_eq!(calculator.handler().display().text(), expected, "{}", button);
    }
}

#[tokio::test]
async fn division_by_zero() {
    let base_url = start_backend().await;
    let calculator = calculator(&base_url, "1", "0");

    let outcome = calculator.click("btn-divide").unwrap().await.unwrap();

    assert_eq!(outcome, Outcome::Error("Division by zero".to_string()));
    assert_eq!(calculator.handler().display().text(), "Error: Division by zero");
}

#[tokio::test]
async fn non_numeric_field() {
    let base_url = start_backend().await;
    let calculator = calculator(&base_url, "abc", "4");

    calculator.click("btn-add").unwrap().await.unwrap();

    assert_eq!(
        calculator.handler().display().text(),
        "Error: Inputs must be numbers or numeric strings"
    );
}

#[tokio::test]
async fn overflow_and_infinite_fields() {
    let base_url = start_backend().await;
    let calculator = calculator(&base_url, "1e200", "1e200");

    let outcome = calculator.click("btn-multiply").unwrap().await.unwrap();
    assert_eq!(outcome, Outcome::Error("Result is not a finite number".to_string()));
    assert_eq!(
        calculator.handler().display().text(),
        "Error: Result is not a finite number"
    );

    calculator.handler().inputs().fill("Infinity", "1");
    calculator.click("btn-add").unwrap().await.unwrap();
    assert_eq!(
        calculator.handler().display().text(),
        "Error: Inputs must be numbers or numeric strings"
    );
}

#[tokio::test]
async fn field_edge_cases_follow_number_coercion() {
    let base_url = start_backend().await;
    let calculator = calculator(&base_url, "  0x10 ", "");

    calculator.click("btn-add").unwrap().await.unwrap();
    assert_eq!(calculator.handler().display().text(), "Result: 16");

    calculator.handler().inputs().fill("1e21", "1");
    calculator.click("btn-multiply").unwrap().await.unwrap();
    assert_eq!(calculator.handler().display().text(), "Result: 1e+21");
}

#[tokio::test]
async fn unreachable_backend() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let calculator = calculator(&format!("http://{}", addr), "10", "4");

    let outcome = calculator.click("btn-add").unwrap().await.unwrap();

    assert!(outcome.is_error());
    let text = calculator.handler().display().text();
    assert!(text.starts_with("Error: ") && text.len() > "Error: ".len(), "{}", text);
}
