use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use blog_service::config::Config;
use blog_service::db::ContentStore;
use blog_service::handlers;
use blog_service::openapi::ApiDoc;
use blog_service::providers::{ChatCompletionClient, OnnxSentimentClassifier};
use blog_service::services::PipelineService;
use db_pool::create_pool;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn,ort=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn fatal(context: &str, err: impl std::fmt::Display) -> ! {
    tracing::error!("{}: {}", context, err);
    eprintln!("ERROR: {}: {}", context, err);
    std::process::exit(1);
}

/// Blog Service
///
/// Generates short posts from a topic through a remote chat-completion model,
/// classifies reader comments with a local sentiment model, and keeps both in
/// a SQLite file.
///
/// # Routes
///
/// - `GET /` - every post, newest first, with its comments
/// - `POST /generate-post` - generate and store a post
/// - `POST /comment` - classify and store a comment
/// - `/api/v1/health/*`, `/metrics`, `/api/v1/openapi.json`
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    // Container healthcheck: `blog-service healthcheck`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" {
                let port = std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "5000".into());
                let url = format!("http://127.0.0.1:{}/api/v1/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => fatal("Failed to load configuration", e),
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    config.database.log_config();
    let pool = match create_pool(config.database.clone()).await {
        Ok(pool) => pool,
        Err(e) => fatal("Failed to open content store", e),
    };
    let store = match ContentStore::open(pool).await {
        Ok(store) => store,
        Err(e) => fatal("Failed to prepare content store schema", e),
    };

    let generator = match ChatCompletionClient::new(&config.generation) {
        Ok(client) => client,
        Err(e) => fatal("Failed to build generation client", e),
    };
    tracing::info!(
        model = %config.generation.model,
        endpoint = %config.generation.endpoint,
        "Generation client ready"
    );

    let classifier = match OnnxSentimentClassifier::new(&config.classifier) {
        Ok(classifier) => classifier,
        Err(e) => fatal("Failed to load sentiment model", e),
    };

    let pipeline = web::Data::new(PipelineService::new(
        Arc::new(generator),
        Arc::new(classifier),
        store,
    ));
    let openapi_doc = web::Data::new(ApiDoc::openapi());

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(pipeline.clone())
            .app_data(openapi_doc.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .route(
                "/metrics",
                web::get().to(blog_service::metrics::serve_metrics),
            )
            .configure(handlers::configure_health)
            .configure(handlers::configure)
    })
    .workers(config.app.workers)
    .bind(&bind_address)?
    .disable_signals()
    .run();

    let server_handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, draining HTTP server");
        server_handle.stop(true).await;
    });

    server.await?;
    tracing::info!("blog-service stopped");
    Ok(())
}
