use ariston_net::AristonClient;

/// Run with: cargo test --test integration -- --ignored
/// Requires ARISTON_USERNAME and ARISTON_PASSWORD for a real account.
#[tokio::test]
#[ignore]
async fn login_discover_update() {
    let username = std::env::var("ARISTON_USERNAME").expect("ARISTON_USERNAME not set");
    let password = std::env::var("ARISTON_PASSWORD").expect("ARISTON_PASSWORD not set");

    let mut client = AristonClient::builder(username, password).build().unwrap();
    client.connect().await.expect("login failed");

    let plants = client.discover().await.expect("discovery failed");
    assert!(!plants.is_empty(), "account should have at least one plant");

    for mut device in client.devices().await.expect("resolve failed") {
        device.get_features().await.expect("features failed");
        device.update_state().await.expect("state failed");
        assert!(
            !device.state().is_empty(),
            "{} returned an empty state",
            device.gateway()
        );
        device.update_energy().await.expect("energy failed");
    }
}
