//! Seatcal HTTP server.
//!
//! Wires the PostgreSQL adapters, the in-process event bus, and the
//! WebSocket broadcast hub into the axum application and serves it.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatcal::adapters::auth::{JwtConfig, JwtTokenValidator};
use seatcal::adapters::events::InMemoryEventBus;
use seatcal::adapters::http::{
    auth_middleware, booking_routes, event_routes, AuthState, BookingHandlers, EventHandlers,
};
use seatcal::adapters::postgres::{PostgresBookingStore, PostgresEventRepository};
use seatcal::adapters::websocket::{live_router, BroadcastHub, ChangeNotifier, LiveState};
use seatcal::application::handlers::booking::{
    CancelBookingHandler, ListUserBookingsHandler, SubmitBookingHandler,
};
use seatcal::application::handlers::event::{
    CreateEventHandler, GetEventHandler, ListEventsHandler, UpdateEventHandler,
};
use seatcal::config::AppConfig;
use seatcal::ports::{BookingStore, EventPublisher, EventRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        environment = ?config.server.environment,
        "Starting seatcal server"
    );

    // Database
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    info!("Database pool connected");

    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        info!("Migrations applied");
    }

    // Ports
    let events: Arc<dyn EventRepository> = Arc::new(PostgresEventRepository::new(pool.clone()));
    let bookings: Arc<dyn BookingStore> = Arc::new(PostgresBookingStore::new(pool.clone()));
    let bus = Arc::new(InMemoryEventBus::new());
    let publisher: Arc<dyn EventPublisher> = bus.clone();

    // Live calendar fan-out
    let hub = Arc::new(BroadcastHub::new(config.booking.notify_channel_capacity));
    let notifier = ChangeNotifier::new_shared(hub.clone());
    notifier.register(bus.as_ref());

    // Application handlers
    let event_handlers = EventHandlers::new(
        Arc::new(CreateEventHandler::new(events.clone(), publisher.clone())),
        Arc::new(UpdateEventHandler::new(events.clone(), publisher.clone())),
        Arc::new(ListEventsHandler::new(events.clone())),
        Arc::new(GetEventHandler::new(events.clone())),
        bookings.clone(),
    );
    let booking_handlers = BookingHandlers::new(
        Arc::new(SubmitBookingHandler::new(
            events.clone(),
            bookings.clone(),
            publisher.clone(),
            config.booking.rebook_policy,
        )),
        Arc::new(CancelBookingHandler::new(bookings.clone(), publisher.clone())),
        Arc::new(ListUserBookingsHandler::new(bookings.clone())),
    );

    // Auth
    let mut jwt_config = JwtConfig::new(&config.auth.jwt_secret);
    if let Some(issuer) = &config.auth.issuer {
        jwt_config = jwt_config.with_issuer(issuer);
    }
    let validator: AuthState = Arc::new(JwtTokenValidator::new(&jwt_config));

    // Routers
    let api = Router::new()
        .nest("/events", event_routes(event_handlers))
        .nest("/bookings", booking_routes(booking_handlers))
        .merge(live_router().with_state(LiveState::new(hub.clone())));

    let app = Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(validator, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
