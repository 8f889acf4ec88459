//! Fetches a tar archive over HTTP and lists its contents.
//!
//! Usage: `cargo run --example fetch_archive -- <url>`

use ustar::FileFilter;
use ustar_loader::ArchiveLoader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .ok_or("usage: fetch_archive <url>")?;

    let loader = ArchiveLoader::new()?;
    let archive = loader.get_or_load(&url).await?;

    println!("{} file(s) in {url}", archive.len());
    for record in archive.select(&FileFilter::All) {
        println!(
            "  {}  {:>8} bytes  {}",
            record.modified_at().format("%Y-%m-%d %H:%M:%S"),
            record.content().len(),
            record.name()
        );
    }

    Ok(())
}
