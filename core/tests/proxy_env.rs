//! Proxy variables in the environment must not reroute gateway traffic.
//!
//! Kept in its own test binary: it mutates process-wide environment
//! variables, which would race with tests running in parallel threads.

use gateway_core::{GatewayClient, GatewayConfig};
use mock_gateway::{GatewayState, DEFAULT_LOGIN, DEFAULT_PASSWORD};

#[test]
fn environment_proxy_is_ignored() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_gateway::run(listener, GatewayState::default()).await
        })
        .unwrap();
    });

    // Nothing listens on port 1; a client honoring these would fail to connect.
    for key in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        std::env::set_var(key, "http://127.0.0.1:1");
    }
    for key in ["NO_PROXY", "no_proxy"] {
        std::env::remove_var(key);
    }

    let config = GatewayConfig::new(&format!("http://{addr}"), DEFAULT_LOGIN, DEFAULT_PASSWORD).with_timeouts(5, 5);
    let auth = GatewayClient::new(config).authenticate().unwrap();
    assert!(!auth.token.is_empty());
}
