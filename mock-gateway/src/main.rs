use mock_gateway::{GatewayState, DEFAULT_LOGIN, DEFAULT_PASSWORD};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let login = std::env::var("GATEWAY_LOGIN").unwrap_or_else(|_| DEFAULT_LOGIN.to_string());
    let password = std::env::var("GATEWAY_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());

    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    mock_gateway::run(listener, GatewayState::new(&login, &password)).await
}
