use mock_server::{Keys, MockCatalog};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_server=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let keys = match (
        std::env::var("MARVEL_PUBLIC_KEY"),
        std::env::var("MARVEL_PRIVATE_KEY"),
    ) {
        (Ok(public_key), Ok(private_key)) => Some(Keys {
            public_key,
            private_key,
        }),
        _ => None,
    };
    let catalog = MockCatalog {
        keys,
        ..MockCatalog::default()
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, authenticated = catalog.keys.is_some(), "listening");
    mock_server::run_with(listener, catalog).await
}
