//! Ride Concierge server entry point.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ride_concierge::adapters::{
    webhook_router, GoogleGeocoder, GoogleGeocoderConfig, UberConfig, UberRideProvider,
    WebhookAppState,
};
use ride_concierge::application::FulfillmentRouter;
use ride_concierge::config::{AppConfig, LogFormat};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let geocoder = GoogleGeocoder::new(geocoder_config(&config))?;
    let provider = UberRideProvider::new(uber_config(&config))?;
    let router = FulfillmentRouter::new(Arc::new(geocoder), Arc::new(provider));

    let app = webhook_router(
        WebhookAppState::new(Arc::new(router)),
        config.server.turn_timeout(),
    );

    let addr = config.server.socket_addr()?;
    info!(
        %addr,
        turn_timeout_ms = config.server.turn_timeout_ms,
        sandbox = config.ride_provider.is_sandbox(),
        "Ride concierge listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));

    match config.server.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

fn geocoder_config(config: &AppConfig) -> GoogleGeocoderConfig {
    let geocoding = &config.geocoding;
    let mut adapter = GoogleGeocoderConfig::new()
        .with_base_url(geocoding.base_url.clone())
        .with_timeout(geocoding.timeout())
        .with_retry(geocoding.retry_policy());
    if let Some(key) = &geocoding.api_key {
        adapter = adapter.with_api_key(key.expose_secret().clone());
    }
    adapter
}

fn uber_config(config: &AppConfig) -> UberConfig {
    let ride = &config.ride_provider;
    UberConfig::new(ride.server_token.expose_secret().clone())
        .with_base_url(ride.base_url.clone())
        .with_locale(ride.locale.clone())
        .with_timeout(ride.timeout())
        .with_retry(ride.retry_policy())
}
