use rowgraph_core::{driver::Connection, Result};

use url::Url;

/// Opens a connection with the driver matching the URL scheme.
pub(super) async fn connect(url: &str) -> Result<Box<dyn Connection>> {
    let url = Url::parse(url).map_err(anyhow::Error::from)?;

    match url.scheme() {
        "postgresql" | "postgres" => connect_postgresql(&url).await,
        "sqlite" => connect_sqlite(&url),
        scheme => Err(anyhow::anyhow!("unsupported database; scheme={scheme}; url={url}").into()),
    }
}

#[cfg(feature = "postgresql")]
async fn connect_postgresql(url: &Url) -> Result<Box<dyn Connection>> {
    let conn = rowgraph_driver_postgresql::PostgreSQL::connect(url.as_str()).await?;
    Ok(Box::new(conn))
}

#[cfg(not(feature = "postgresql"))]
async fn connect_postgresql(_url: &Url) -> Result<Box<dyn Connection>> {
    Err(anyhow::anyhow!("`postgresql` feature not enabled").into())
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &Url) -> Result<Box<dyn Connection>> {
    let conn = rowgraph_driver_sqlite::Sqlite::connect(url.as_str())?;
    Ok(Box::new(conn))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &Url) -> Result<Box<dyn Connection>> {
    Err(anyhow::anyhow!("`sqlite` feature not enabled").into())
}
